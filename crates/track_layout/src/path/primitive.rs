//! Raw drafting primitives as exported by CAD tools.
//!
//! Primitives carry no order and no travel direction. Arcs follow the drafting convention:
//! counter-clockwise from `start_angle` to `end_angle`, angles in radians.
use std::f64::consts::{FRAC_PI_2, PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::DVec2;

use crate::error::{Error, Result};
use crate::path::PathElement;

/// Sweeps below this are read as a full circle.
const FULL_CIRCLE_EPS: f64 = 1e-12;

/// An unordered line or arc as found in a drawing.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawPrimitive {
    Line {
        a: DVec2,
        b: DVec2,
    },
    /// Counter-clockwise arc. Equal start and end angles describe a full circle.
    Arc {
        center: DVec2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
}

/// A polyline vertex with the bulge of the segment that leaves it.
///
/// Bulge is the tangent of a quarter of the included angle; positive bulges run
/// counter-clockwise and zero means a straight segment.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolylineVertex {
    /// Vertex location.
    pub position: DVec2,
    /// Bulge of the outgoing segment.
    pub bulge: f64,
}

impl PolylineVertex {
    pub fn new(position: impl Into<DVec2>, bulge: f64) -> Self {
        Self {
            position: position.into(),
            bulge,
        }
    }
}

impl RawPrimitive {
    pub fn line(a: impl Into<DVec2>, b: impl Into<DVec2>) -> Self {
        RawPrimitive::Line {
            a: a.into(),
            b: b.into(),
        }
    }

    pub fn arc(center: impl Into<DVec2>, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        RawPrimitive::Arc {
            center: center.into(),
            radius,
            start_angle,
            end_angle,
        }
    }

    /// Converts one polyline segment from `p0` to `p1` into a line or an arc.
    pub fn from_bulge(p0: impl Into<DVec2>, p1: impl Into<DVec2>, bulge: f64) -> Result<Self> {
        let (p0, p1) = (p0.into(), p1.into());
        if !bulge.is_finite() {
            return Err(Error::domain("bulge", "must be finite"));
        }
        if bulge == 0.0 {
            return Ok(RawPrimitive::line(p0, p1));
        }
        let chord = p1 - p0;
        let d = chord.length();
        if d <= 0.0 {
            return Err(Error::domain(
                "bulge",
                "an arc segment needs two distinct vertices",
            ));
        }
        let included = 4.0 * bulge.abs().atan();
        let half = included * 0.5;
        let radius = d / (2.0 * half.sin());
        let apothem = (d * 0.5) / half.tan();
        let center = (p0 + p1) * 0.5 + chord.perp() / d * apothem * bulge.signum();
        let (from, to) = if bulge > 0.0 { (p0, p1) } else { (p1, p0) };
        Ok(RawPrimitive::arc(
            center,
            radius,
            (from - center).to_angle(),
            (to - center).to_angle(),
        ))
    }

    /// Converts a polyline into primitives. A closed polyline adds the segment from the last
    /// vertex back to the first.
    pub fn from_polyline(vertices: &[PolylineVertex], closed: bool) -> Result<Vec<Self>> {
        let n = vertices.len();
        let segments = if closed { n } else { n.saturating_sub(1) };
        (0..segments)
            .map(|i| {
                let from = vertices[i];
                let to = vertices[(i + 1) % n];
                RawPrimitive::from_bulge(from.position, to.position, from.bulge)
            })
            .collect()
    }

    /// Short name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            RawPrimitive::Line { .. } => "line",
            RawPrimitive::Arc { .. } => "arc",
        }
    }

    /// Counter-clockwise sweep of an arc in `(0, 2PI]`; zero for lines.
    pub fn sweep(&self) -> f64 {
        match *self {
            RawPrimitive::Line { .. } => 0.0,
            RawPrimitive::Arc {
                start_angle,
                end_angle,
                ..
            } => {
                let sweep = (end_angle - start_angle).rem_euclid(TAU);
                if sweep < FULL_CIRCLE_EPS || TAU - sweep < FULL_CIRCLE_EPS {
                    TAU
                } else {
                    sweep
                }
            }
        }
    }

    pub fn length(&self) -> f64 {
        match *self {
            RawPrimitive::Line { a, b } => a.distance(b),
            RawPrimitive::Arc { radius, .. } => radius * self.sweep(),
        }
    }

    /// Endpoints in the primitive's natural direction.
    pub fn endpoints(&self) -> (DVec2, DVec2) {
        match *self {
            RawPrimitive::Line { a, b } => (a, b),
            RawPrimitive::Arc {
                center,
                radius,
                start_angle,
                ..
            } => (
                center + DVec2::from_angle(start_angle) * radius,
                center + DVec2::from_angle(start_angle + self.sweep()) * radius,
            ),
        }
    }

    /// Headings on entry and exit when traversed forwards, or backwards if `reversed`.
    pub fn headings(&self, reversed: bool) -> (f64, f64) {
        let (entry, exit) = match *self {
            RawPrimitive::Line { a, b } => {
                let h = (b - a).to_angle();
                (h, h)
            }
            RawPrimitive::Arc { start_angle, .. } => (
                start_angle + FRAC_PI_2,
                start_angle + self.sweep() + FRAC_PI_2,
            ),
        };
        if reversed {
            (exit + PI, entry + PI)
        } else {
            (entry, exit)
        }
    }

    /// Path element covering this primitive in the requested direction.
    pub fn to_element(&self, reversed: bool) -> PathElement {
        match *self {
            RawPrimitive::Line { .. } => PathElement::straight(self.length()),
            RawPrimitive::Arc { radius, .. } => {
                let sweep = self.sweep();
                PathElement::curve(if reversed { -sweep } else { sweep }, radius)
            }
        }
    }

    pub(crate) fn validate(&self, index: usize) -> Result<()> {
        let field = |name: &str| format!("primitive[{index}].{name}");
        match *self {
            RawPrimitive::Line { a, b } => {
                if !(a.is_finite() && b.is_finite()) {
                    return Err(Error::domain(field("endpoints"), "must be finite"));
                }
                if a == b {
                    return Err(Error::domain(field("endpoints"), "line has zero length"));
                }
            }
            RawPrimitive::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => {
                if !center.is_finite() {
                    return Err(Error::domain(field("center"), "must be finite"));
                }
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(Error::domain(
                        field("radius"),
                        format!("must be finite and > 0, got {radius}"),
                    ));
                }
                if !(start_angle.is_finite() && end_angle.is_finite()) {
                    return Err(Error::domain(field("angles"), "must be finite"));
                }
            }
        }
        Ok(())
    }
}
