//! Global-frame primitives produced by the layout engine.
use glam::DVec2;

use crate::pattern::LayerId;

/// Straight segment in global coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    /// First endpoint.
    pub start: DVec2,
    /// Second endpoint.
    pub end: DVec2,
    /// Stroke width.
    pub width: f64,
    /// Layer tag copied from the placement.
    pub layer: LayerId,
}

impl LineSegment {
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

/// Circular arc in global coordinates.
///
/// The arc is traversed from `start_angle` to `end_angle`; a positive `end_angle - start_angle`
/// runs counter-clockwise. Angles are in radians and are not wrapped.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcSegment {
    /// Circle center.
    pub center: DVec2,
    /// Circle radius, always positive.
    pub radius: f64,
    /// Angle of the first endpoint as seen from `center`.
    pub start_angle: f64,
    /// Angle of the second endpoint as seen from `center`.
    pub end_angle: f64,
    /// Stroke width.
    pub width: f64,
    /// Layer tag copied from the placement.
    pub layer: LayerId,
}

impl ArcSegment {
    /// Signed sweep in radians, positive counter-clockwise.
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn length(&self) -> f64 {
        self.sweep().abs() * self.radius
    }

    pub fn point_at_angle(&self, angle: f64) -> DVec2 {
        self.center + DVec2::from_angle(angle) * self.radius
    }

    pub fn start_point(&self) -> DVec2 {
        self.point_at_angle(self.start_angle)
    }

    /// Point halfway along the arc, for sinks that describe arcs by three points.
    pub fn mid_point(&self) -> DVec2 {
        self.point_at_angle(self.start_angle + self.sweep() * 0.5)
    }

    pub fn end_point(&self) -> DVec2 {
        self.point_at_angle(self.end_angle)
    }
}

/// Point marker in global coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPoint {
    /// Marker center.
    pub position: DVec2,
    /// Hole diameter.
    pub drill: f64,
    /// Pad diameter.
    pub pad: f64,
}

/// One primitive handed to a [`crate::layout::sink::TrackSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum Emission {
    Line(LineSegment),
    Arc(ArcSegment),
    Marker(MarkerPoint),
}

impl Emission {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Emission::Line(_) => "line",
            Emission::Arc(_) => "arc",
            Emission::Marker(_) => "marker",
        }
    }

    pub fn as_line(&self) -> Option<&LineSegment> {
        match self {
            Emission::Line(line) => Some(line),
            _ => None,
        }
    }

    pub fn as_arc(&self) -> Option<&ArcSegment> {
        match self {
            Emission::Arc(arc) => Some(arc),
            _ => None,
        }
    }

    pub fn as_marker(&self) -> Option<&MarkerPoint> {
        match self {
            Emission::Marker(marker) => Some(marker),
            _ => None,
        }
    }
}
