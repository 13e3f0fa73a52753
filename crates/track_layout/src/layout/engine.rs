//! Stamps a [`Pattern`] along a [`Path`] with a pitch adjusted to cover the path exactly.
//!
//! The whole layout is computed before anything reaches a sink, so input errors never leave
//! a half-drawn track behind. Emission order is repetition by repetition, then placement
//! order within a repetition, then path order for pieces split at element boundaries.
use std::f64::consts::FRAC_PI_2;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::geometry::Pose;
use crate::layout::config::LayoutConfig;
use crate::layout::emission::{ArcSegment, Emission, LineSegment, MarkerPoint};
use crate::layout::sink::TrackSink;
use crate::path::Path;
use crate::pattern::{ParallelLine, Pattern, Placement};

/// Largest repetition count a single layout accepts.
pub const MAX_REPETITIONS: usize = u32::MAX as usize;

/// Upper bound on the emission buffer reserved up front.
const MAX_PREALLOCATED_EMISSIONS: usize = 1 << 16;

/// Number of repetitions closest to the nominal pitch, at least one.
///
/// Fails with a domain error on `nominal_pitch` when the count is not finite or exceeds
/// [`MAX_REPETITIONS`].
pub fn repetition_count(total_length: f64, nominal_pitch: f64) -> Result<usize> {
    let count = (total_length / nominal_pitch).round();
    if !count.is_finite() || count > MAX_REPETITIONS as f64 {
        return Err(Error::domain(
            "nominal_pitch",
            format!(
                "pitch {nominal_pitch} over length {total_length} gives {count} repetitions, more than {MAX_REPETITIONS}"
            ),
        ));
    }
    Ok((count as usize).max(1))
}

/// Emission counts per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutStats {
    /// Straight segments, from straight spans and transverse lines.
    pub lines: usize,
    /// Offset arcs from curve spans.
    pub arcs: usize,
    /// Point markers.
    pub markers: usize,
}

/// A computed layout, ready to be dispatched to a sink.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct Layout {
    /// Number of pattern repetitions along the path.
    pub repetitions: usize,
    /// Pitch actually used: `total_length / repetitions`.
    pub effective_pitch: f64,
    /// Length of the path the layout covers.
    pub total_length: f64,
    /// Primitives in emission order.
    pub emissions: Vec<Emission>,
}

impl Layout {
    /// Path distance of `fraction` within repetition `repetition`.
    ///
    /// The end of the last repetition maps exactly onto the path length.
    pub fn position(&self, repetition: usize, fraction: f64) -> f64 {
        position(repetition, fraction, self.repetitions, self.total_length)
    }

    pub fn stats(&self) -> LayoutStats {
        self.emissions
            .iter()
            .fold(LayoutStats::default(), |mut stats, e| {
                match e {
                    Emission::Line(_) => stats.lines += 1,
                    Emission::Arc(_) => stats.arcs += 1,
                    Emission::Marker(_) => stats.markers += 1,
                }
                stats
            })
    }

    /// Sends every primitive to `sink` in order, stopping at the first rejection.
    pub fn emit_to(&self, sink: &mut dyn TrackSink) -> Result<()> {
        for (index, emission) in self.emissions.iter().enumerate() {
            sink.emit(emission).map_err(|source| Error::Emission {
                index,
                primitive: emission.kind_name(),
                source,
            })?;
        }
        Ok(())
    }
}

fn position(repetition: usize, fraction: f64, repetitions: usize, total_length: f64) -> f64 {
    (repetition as f64 + fraction) / repetitions as f64 * total_length
}

/// Computes the layout of `pattern` along `path` without emitting anything.
pub fn layout(path: &Path, pattern: &Pattern, config: &LayoutConfig) -> Result<Layout> {
    config.validate()?;
    pattern.validate()?;

    let total_length = path.total_length();
    if total_length <= 0.0 {
        return Err(Error::domain(
            "path",
            format!("total length must be > 0, got {total_length}"),
        ));
    }

    let repetitions = repetition_count(total_length, config.nominal_pitch)?;
    let effective_pitch = total_length / repetitions as f64;
    info!(
        "Laying out {} repetitions at pitch {:.6} (nominal {:.6}) over length {:.6}.",
        repetitions, effective_pitch, config.nominal_pitch, total_length
    );

    let gap = path
        .end_pose()
        .position
        .distance(path.start_pose().position);
    if gap > config.closure_tolerance && gap < effective_pitch * 0.01 {
        warn!(
            "Path ends are {:.3e} apart, above the closure tolerance {:.3e}; expect a seam.",
            gap, config.closure_tolerance
        );
    }

    let mut emissions = Vec::with_capacity(
        repetitions
            .saturating_mul(pattern.len())
            .min(MAX_PREALLOCATED_EMISSIONS),
    );
    for repetition in 0..repetitions {
        let at = |fraction: f64| position(repetition, fraction, repetitions, total_length);
        for (index, placement) in pattern.placements.iter().enumerate() {
            match placement {
                Placement::ParallelLine(line) => {
                    let (from, to) = (at(line.start), at(line.end));
                    if to - from <= config.min_span {
                        debug!(
                            "Skipping zero-length parallel line {} in repetition {}.",
                            index, repetition
                        );
                        continue;
                    }
                    lay_parallel(path, line, index, from, to, config.min_span, &mut emissions)?;
                }
                Placement::TransverseLine(line) => {
                    let pose = path.pose_at_distance(at(line.position))?;
                    emissions.push(Emission::Line(LineSegment {
                        start: pose.transform(0.0, line.start),
                        end: pose.transform(0.0, line.end),
                        width: line.width,
                        layer: line.layer.clone(),
                    }));
                }
                Placement::Marker(marker) => {
                    let pose = path.pose_at_distance(at(marker.position))?;
                    emissions.push(Emission::Marker(MarkerPoint {
                        position: pose.transform(0.0, marker.offset),
                        drill: marker.drill,
                        pad: marker.pad,
                    }));
                }
            }
        }
    }

    Ok(Layout {
        repetitions,
        effective_pitch,
        total_length,
        emissions,
    })
}

/// Emits one piece per path element covered by `[from, to]`: a line on straights, an
/// offset arc on curves.
fn lay_parallel(
    path: &Path,
    line: &ParallelLine,
    index: usize,
    from: f64,
    to: f64,
    min_span: f64,
    out: &mut Vec<Emission>,
) -> Result<()> {
    let Some(first) = path.span_index_at(from) else {
        return Ok(());
    };
    for span in &path.element_spans()[first..] {
        if span.start_distance >= to {
            break;
        }
        let a = from.max(span.start_distance);
        let b = to.min(span.end_distance);
        if b - a <= min_span {
            continue;
        }
        let (pa, pb) = (span.pose_at(a), span.pose_at(b));
        match span.curve() {
            None => out.push(Emission::Line(LineSegment {
                start: pa.transform(0.0, line.offset),
                end: pb.transform(0.0, line.offset),
                width: line.width,
                layer: line.layer.clone(),
            })),
            Some((center, radius, angle)) => {
                let turn = angle.signum();
                let offset_radius = radius - turn * line.offset;
                if offset_radius <= min_span {
                    return Err(Error::domain(
                        format!("placement[{index}].offset"),
                        format!(
                            "offset {} reaches the center of the turn at element[{}] (radius {})",
                            line.offset, span.index, radius
                        ),
                    ));
                }
                out.push(Emission::Arc(ArcSegment {
                    center,
                    radius: offset_radius,
                    start_angle: radial_angle(&pa, turn),
                    end_angle: radial_angle(&pb, turn),
                    width: line.width,
                    layer: line.layer.clone(),
                }));
            }
        }
    }
    Ok(())
}

/// Direction from the turn center to the path point at `pose`.
#[inline]
fn radial_angle(pose: &Pose, turn: f64) -> f64 {
    pose.heading - turn * FRAC_PI_2
}

/// Computes the layout and dispatches it to `sink`.
///
/// Input errors are reported before the first emission. A sink failure stops dispatch;
/// primitives already accepted stay emitted.
pub fn draw_path(
    path: &Path,
    pattern: &Pattern,
    config: &LayoutConfig,
    sink: &mut dyn TrackSink,
) -> Result<Layout> {
    let computed = layout(path, pattern, config)?;
    computed.emit_to(sink)?;
    Ok(computed)
}

/// Reusable pairing of a pattern and a layout configuration.
pub struct TrackBuilder {
    /// Layout configuration applied to every path.
    pub config: LayoutConfig,
    /// Pattern repeated along every path.
    pub pattern: Pattern,
}

impl TrackBuilder {
    pub fn try_new(config: LayoutConfig, pattern: Pattern) -> Result<Self> {
        config.validate()?;
        pattern.validate()?;
        Ok(Self { config, pattern })
    }

    /// Computes the layout for `path` without emitting.
    pub fn layout(&self, path: &Path) -> Result<Layout> {
        layout(path, &self.pattern, &self.config)
    }

    /// Lays the pattern along `path` into `sink`.
    pub fn draw(&self, path: &Path, sink: &mut dyn TrackSink) -> Result<Layout> {
        draw_path(path, &self.pattern, &self.config, sink)
    }
}
