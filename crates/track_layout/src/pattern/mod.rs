//! The repeating motif laid along a path.
//!
//! Along-path positions are fractions in `[0, 1]` of one repetition; cross-path offsets are
//! absolute distances, positive to the left of travel.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Opaque layer or style tag passed through to the sink unchanged.
pub type LayerId = String;

pub const DEFAULT_MARKER_DRILL: f64 = 0.3;
pub const DEFAULT_MARKER_PAD: f64 = 0.6;

/// A line running parallel to the path at a fixed cross offset.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelLine {
    /// Along-path fraction where the line begins.
    pub start: f64,
    /// Along-path fraction where the line ends.
    pub end: f64,
    /// Cross-path offset, positive to the left.
    pub offset: f64,
    /// Stroke width.
    pub width: f64,
    /// Layer tag passed through to the sink.
    pub layer: LayerId,
}

/// A line running across the path at one along-path position.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TransverseLine {
    /// Along-path fraction of the line.
    pub position: f64,
    /// Cross-path offset of the first endpoint.
    pub start: f64,
    /// Cross-path offset of the second endpoint.
    pub end: f64,
    /// Stroke width.
    pub width: f64,
    /// Layer tag passed through to the sink.
    pub layer: LayerId,
}

/// A point feature such as a via.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Along-path fraction of the marker.
    pub position: f64,
    /// Cross-path offset, positive to the left.
    pub offset: f64,
    /// Hole diameter.
    pub drill: f64,
    /// Pad diameter.
    pub pad: f64,
}

/// One entry of a [`Pattern`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    ParallelLine(ParallelLine),
    TransverseLine(TransverseLine),
    Marker(Marker),
}

impl Placement {
    pub fn parallel_line(
        start: f64,
        end: f64,
        offset: f64,
        width: f64,
        layer: impl Into<LayerId>,
    ) -> Self {
        Placement::ParallelLine(ParallelLine {
            start,
            end,
            offset,
            width,
            layer: layer.into(),
        })
    }

    pub fn transverse_line(
        position: f64,
        start: f64,
        end: f64,
        width: f64,
        layer: impl Into<LayerId>,
    ) -> Self {
        Placement::TransverseLine(TransverseLine {
            position,
            start,
            end,
            width,
            layer: layer.into(),
        })
    }

    /// Marker with the default via drill and pad diameters.
    pub fn marker(position: f64, offset: f64) -> Self {
        Self::marker_sized(position, offset, DEFAULT_MARKER_DRILL, DEFAULT_MARKER_PAD)
    }

    pub fn marker_sized(position: f64, offset: f64, drill: f64, pad: f64) -> Self {
        Placement::Marker(Marker {
            position,
            offset,
            drill,
            pad,
        })
    }

    /// Checks fractions, offsets and sizes; `index` is used to name the offending field.
    pub fn validate(&self, index: usize) -> Result<()> {
        let field = |name: &str| format!("placement[{index}].{name}");
        match self {
            Placement::ParallelLine(line) => {
                check_fraction(line.start, || field("start"))?;
                check_fraction(line.end, || field("end"))?;
                if line.start > line.end {
                    return Err(Error::domain(
                        field("start"),
                        format!("start {} is after end {}", line.start, line.end),
                    ));
                }
                check_finite(line.offset, || field("offset"))?;
                check_size(line.width, || field("width"))?;
            }
            Placement::TransverseLine(line) => {
                check_fraction(line.position, || field("position"))?;
                check_finite(line.start, || field("start"))?;
                check_finite(line.end, || field("end"))?;
                check_size(line.width, || field("width"))?;
            }
            Placement::Marker(marker) => {
                check_fraction(marker.position, || field("position"))?;
                check_finite(marker.offset, || field("offset"))?;
                check_size(marker.drill, || field("drill"))?;
                check_size(marker.pad, || field("pad"))?;
            }
        }
        Ok(())
    }
}

fn check_fraction(value: f64, field: impl FnOnce() -> String) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::domain(
            field(),
            format!("fraction {value} is outside [0, 1]"),
        ))
    }
}

fn check_finite(value: f64, field: impl FnOnce() -> String) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::domain(field(), "must be finite"))
    }
}

fn check_size(value: f64, field: impl FnOnce() -> String) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::domain(
            field(),
            format!("must be finite and >= 0, got {value}"),
        ))
    }
}

/// Ordered list of placements making up one repetition.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
#[non_exhaustive]
pub struct Pattern {
    /// Placements in emission order.
    pub placements: Vec<Placement>,
}

impl Pattern {
    /// Create a new empty pattern.
    pub fn new() -> Self {
        Self {
            placements: Vec::new(),
        }
    }

    /// Add a single placement to the pattern.
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placements.push(placement);
        self
    }

    /// Add multiple placements to the pattern.
    pub fn with_placements(mut self, placements: Vec<Placement>) -> Self {
        self.placements.extend(placements);
        self
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Validates every placement in order, stopping at the first violation.
    pub fn validate(&self) -> Result<()> {
        self.placements
            .iter()
            .enumerate()
            .try_for_each(|(index, placement)| placement.validate(index))
    }
}

impl From<Vec<Placement>> for Pattern {
    fn from(placements: Vec<Placement>) -> Self {
        Self { placements }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_placement_order() {
        let pattern = Pattern::new()
            .with_placement(Placement::marker(0.5, 0.0))
            .with_placements(vec![
                Placement::parallel_line(0.0, 1.0, 1.0, 0.2, "F.Cu"),
                Placement::transverse_line(0.25, -1.0, 1.0, 0.2, "B.Cu"),
            ]);
        assert_eq!(pattern.len(), 3);
        assert!(matches!(pattern.placements[0], Placement::Marker(_)));
        assert!(matches!(pattern.placements[2], Placement::TransverseLine(_)));
        assert!(pattern.validate().is_ok());
    }

    #[test]
    fn marker_defaults_to_via_sizes() {
        let Placement::Marker(marker) = Placement::marker(0.1, 2.0) else {
            panic!("expected marker");
        };
        assert_eq!(marker.drill, DEFAULT_MARKER_DRILL);
        assert_eq!(marker.pad, DEFAULT_MARKER_PAD);
    }

    #[test]
    fn fraction_outside_unit_interval_is_rejected() {
        let pattern = Pattern::from(vec![
            Placement::marker(0.5, 0.0),
            Placement::transverse_line(1.5, 0.0, 1.0, 0.1, "F.Cu"),
        ]);
        match pattern.validate() {
            Err(Error::Domain { field, .. }) => assert_eq!(field, "placement[1].position"),
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    #[test]
    fn reversed_span_is_rejected() {
        let err = Placement::parallel_line(0.8, 0.2, 0.0, 0.1, "F.Cu")
            .validate(0)
            .unwrap_err();
        assert!(matches!(err, Error::Domain { ref field, .. } if field == "placement[0].start"));
    }

    #[test]
    fn nan_offset_is_rejected() {
        assert!(Placement::marker(0.5, f64::NAN).validate(0).is_err());
        assert!(Placement::marker_sized(0.5, 0.0, -0.1, 0.6)
            .validate(0)
            .is_err());
    }
}
