//! Raster preview of a laid-out track, written as PNG.
use std::collections::HashMap;
use std::path::Path as FsPath;

use glam::DVec2;
use image::{Rgb, RgbImage};
use track_layout::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Image size, margins and colors for [`PngSink`].
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub margin: u32,
    pub background: [u8; 3],
    pub guide_color: [u8; 3],
    pub marker_color: [u8; 3],
    pub default_layer_color: [u8; 3],
    pub layer_colors: HashMap<LayerId, [u8; 3]>,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32)) -> Self {
        Self {
            image_size,
            margin: 24,
            background: [250, 250, 245],
            guide_color: [200, 200, 200],
            marker_color: [40, 40, 40],
            default_layer_color: [0, 0, 0],
            layer_colors: HashMap::new(),
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn set_layer_color(&mut self, layer: impl Into<LayerId>, color: [u8; 3]) -> &mut Self {
        self.layer_colors.insert(layer.into(), color);
        self
    }

    fn layer_color(&self, layer: &str) -> [u8; 3] {
        self.layer_colors
            .get(layer)
            .copied()
            .unwrap_or(self.default_layer_color)
    }
}

/// A [`TrackSink`] that buffers emissions and rasterizes them on [`PngSink::save`].
///
/// The drawing is scaled to fit the image, with +Y pointing up.
pub struct PngSink {
    config: RenderConfig,
    emissions: Vec<Emission>,
    guide: Vec<DVec2>,
}

impl PngSink {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            emissions: Vec::new(),
            guide: Vec::new(),
        }
    }

    /// Draws the guide path centerline underneath the emissions.
    pub fn with_guide(mut self, path: &Path) -> Self {
        let total = path.total_length();
        let steps = 512usize;
        self.guide = (0..=steps)
            .filter_map(|i| path.pose_at_distance(total * i as f64 / steps as f64).ok())
            .map(|pose| pose.position)
            .collect();
        self
    }

    pub fn emissions(&self) -> &[Emission] {
        &self.emissions
    }

    /// Renders everything received so far to `out`.
    pub fn save(&self, out: impl AsRef<FsPath>) -> anyhow::Result<()> {
        let (w, h) = self.config.image_size;
        let mut img = RgbImage::from_pixel(w, h, Rgb(self.config.background));
        let view = Viewport::fit(&self.bounds(), &self.config);

        for pair in self.guide.windows(2) {
            stroke(&mut img, &view, pair[0], pair[1], 0.0, self.config.guide_color);
        }

        for emission in &self.emissions {
            match emission {
                Emission::Line(line) => {
                    let color = self.config.layer_color(&line.layer);
                    stroke(&mut img, &view, line.start, line.end, line.width, color);
                }
                Emission::Arc(arc) => {
                    let color = self.config.layer_color(&arc.layer);
                    let points = arc_points(arc);
                    for pair in points.windows(2) {
                        stroke(&mut img, &view, pair[0], pair[1], arc.width, color);
                    }
                }
                Emission::Marker(marker) => {
                    let at = view.to_pixel(marker.position);
                    let pad = (marker.pad * 0.5 * view.scale).max(1.0);
                    let drill = marker.drill * 0.5 * view.scale;
                    fill_disc(&mut img, at, pad, self.config.marker_color);
                    fill_disc(&mut img, at, drill, self.config.background);
                }
            }
        }

        let out = out.as_ref();
        img.save(out)?;
        info!(
            "Wrote {} primitives to {}.",
            self.emissions.len(),
            out.display()
        );
        Ok(())
    }

    fn bounds(&self) -> (DVec2, DVec2) {
        let mut min = DVec2::splat(f64::INFINITY);
        let mut max = DVec2::splat(f64::NEG_INFINITY);
        let mut grow = |p: DVec2, pad: f64| {
            min = min.min(p - DVec2::splat(pad));
            max = max.max(p + DVec2::splat(pad));
        };
        for &p in &self.guide {
            grow(p, 0.0);
        }
        for emission in &self.emissions {
            match emission {
                Emission::Line(line) => {
                    grow(line.start, line.width * 0.5);
                    grow(line.end, line.width * 0.5);
                }
                Emission::Arc(arc) => {
                    for p in arc_points(arc) {
                        grow(p, arc.width * 0.5);
                    }
                }
                Emission::Marker(marker) => grow(marker.position, marker.pad * 0.5),
            }
        }
        if !min.is_finite() || !max.is_finite() {
            return (DVec2::ZERO, DVec2::ONE);
        }
        (min, max)
    }
}

impl TrackSink for PngSink {
    fn emit_line(&mut self, line: &LineSegment) -> SinkResult {
        self.emissions.push(Emission::Line(line.clone()));
        Ok(())
    }

    fn emit_arc(&mut self, arc: &ArcSegment) -> SinkResult {
        self.emissions.push(Emission::Arc(arc.clone()));
        Ok(())
    }

    fn emit_marker(&mut self, marker: &MarkerPoint) -> SinkResult {
        self.emissions.push(Emission::Marker(*marker));
        Ok(())
    }
}

/// World-to-pixel mapping.
struct Viewport {
    origin: DVec2,
    scale: f64,
    height: f64,
    offset: DVec2,
}

impl Viewport {
    fn fit((min, max): &(DVec2, DVec2), config: &RenderConfig) -> Self {
        let (w, h) = config.image_size;
        let margin = config.margin as f64;
        let avail = DVec2::new(w as f64 - 2.0 * margin, h as f64 - 2.0 * margin).max(DVec2::ONE);
        let extent = (*max - *min).max(DVec2::splat(1e-9));
        let scale = (avail.x / extent.x).min(avail.y / extent.y);
        let used = extent * scale;
        Self {
            origin: *min,
            scale,
            height: h as f64,
            offset: DVec2::splat(margin) + (avail - used) * 0.5,
        }
    }

    fn to_pixel(&self, p: DVec2) -> DVec2 {
        let local = (p - self.origin) * self.scale + self.offset;
        DVec2::new(local.x, self.height - local.y)
    }
}

fn arc_points(arc: &ArcSegment) -> Vec<DVec2> {
    let segments = ((arc.sweep().abs() / (2.0f64).to_radians()).ceil() as usize).max(2);
    (0..=segments)
        .map(|i| arc.point_at_angle(arc.start_angle + arc.sweep() * i as f64 / segments as f64))
        .collect()
}

fn stroke(img: &mut RgbImage, view: &Viewport, a: DVec2, b: DVec2, width: f64, color: [u8; 3]) {
    let (pa, pb) = (view.to_pixel(a), view.to_pixel(b));
    let radius = (width * 0.5 * view.scale).max(0.5);
    let steps = (pa.distance(pb) / 0.5).ceil().max(1.0) as usize;
    for i in 0..=steps {
        fill_disc(img, pa.lerp(pb, i as f64 / steps as f64), radius, color);
    }
}

fn fill_disc(img: &mut RgbImage, center: DVec2, radius: f64, color: [u8; 3]) {
    if radius <= 0.0 {
        return;
    }
    let (w, h) = (img.width() as i64, img.height() as i64);
    let x0 = ((center.x - radius).floor() as i64).max(0);
    let x1 = ((center.x + radius).ceil() as i64).min(w - 1);
    let y0 = ((center.y - radius).floor() as i64).max(0);
    let y1 = ((center.y + radius).ceil() as i64).min(h - 1);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let d = DVec2::new(x as f64 + 0.5, y as f64 + 0.5).distance(center);
            if d <= radius.max(0.5) {
                img.put_pixel(x as u32, y as u32, Rgb(color));
            }
        }
    }
}
