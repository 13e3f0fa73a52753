//! Guide paths built from straight runs and tangent-continuous circular turns.
//!
//! A [`Path`] is an ordered list of [`PathElement`]s: exactly one [`PathElement::Start`]
//! followed by any number of [`PathElement::Straight`] and [`PathElement::Curve`] elements.
//! Poses along the path are always computed from the elements via
//! [`Path::pose_at_distance`]; nothing is accumulated through mutation.
//!
//! Paths are built either literally with [`Path::new`] or recovered from an unordered bag of
//! drafting primitives with [`reconstruct::reconstruct`].
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::DVec2;

use crate::error::{Error, Result};
use crate::geometry::{curve_center, pose_on_curve, pose_on_straight, Pose};
use crate::path::primitive::RawPrimitive;

pub mod primitive;
pub mod reconstruct;

/// Relative slack allowed when querying a pose just outside `[0, total_length]`.
const RANGE_SLACK: f64 = 1e-9;

/// One element of a guide path.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathElement {
    /// Absolute origin pose of the path.
    Start { location: DVec2, heading: f64 },
    /// Straight run of the given length along the current heading.
    Straight { length: f64 },
    /// Circular turn. Positive `angle` turns left (counter-clockwise), negative turns right.
    Curve { angle: f64, radius: f64 },
}

impl PathElement {
    pub fn start(location: impl Into<DVec2>, heading: f64) -> Self {
        PathElement::Start {
            location: location.into(),
            heading,
        }
    }

    pub fn straight(length: f64) -> Self {
        PathElement::Straight { length }
    }

    pub fn curve(angle: f64, radius: f64) -> Self {
        PathElement::Curve { angle, radius }
    }

    /// Arc length covered by this element.
    pub fn length(&self) -> f64 {
        match *self {
            PathElement::Start { .. } => 0.0,
            PathElement::Straight { length } => length,
            PathElement::Curve { angle, radius } => angle.abs() * radius,
        }
    }

    /// Pose reached after travelling `local_distance` into this element from `entry`.
    ///
    /// A `Start` element ignores `entry` and is only defined at distance zero.
    pub fn pose_at(&self, entry: &Pose, local_distance: f64) -> Result<Pose> {
        let length = self.length();
        if local_distance < 0.0 || local_distance > length * (1.0 + RANGE_SLACK) + RANGE_SLACK {
            return Err(Error::OutOfRange {
                distance: local_distance,
                length,
            });
        }
        let d = local_distance.min(length);
        Ok(match *self {
            PathElement::Start { location, heading } => Pose::new(location, heading),
            PathElement::Straight { .. } => pose_on_straight(entry, d),
            PathElement::Curve { angle, radius } => pose_on_curve(entry, radius, angle, d),
        })
    }

    fn validate(&self, index: usize) -> Result<()> {
        let field = |name: &str| format!("element[{index}].{name}");
        match *self {
            PathElement::Start { location, heading } => {
                if !location.is_finite() {
                    return Err(Error::domain(field("location"), "must be finite"));
                }
                if !heading.is_finite() {
                    return Err(Error::domain(field("heading"), "must be finite"));
                }
            }
            PathElement::Straight { length } => {
                if !(length.is_finite() && length >= 0.0) {
                    return Err(Error::domain(
                        field("length"),
                        format!("must be finite and >= 0, got {length}"),
                    ));
                }
            }
            PathElement::Curve { angle, radius } => {
                if !angle.is_finite() {
                    return Err(Error::domain(field("angle"), "must be finite"));
                }
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(Error::domain(
                        field("radius"),
                        format!("must be finite and > 0, got {radius}"),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// A non-zero-length element placed along the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementSpan {
    /// Index of the element within [`Path::elements`].
    pub index: usize,
    /// Cumulative distance at which the element begins.
    pub start_distance: f64,
    /// Cumulative distance at which the element ends.
    pub end_distance: f64,
    /// Pose on entry to the element.
    pub entry: Pose,
    /// The element itself.
    pub element: PathElement,
}

impl ElementSpan {
    pub fn length(&self) -> f64 {
        self.end_distance - self.start_distance
    }

    /// Pose at a cumulative path distance inside this span.
    pub fn pose_at(&self, distance: f64) -> Pose {
        let local = (distance - self.start_distance).clamp(0.0, self.length());
        match self.element {
            PathElement::Curve { angle, radius } => pose_on_curve(&self.entry, radius, angle, local),
            _ => pose_on_straight(&self.entry, local),
        }
    }

    /// Turn center, radius and signed turn angle of a curve span; `None` for straight spans.
    pub fn curve(&self) -> Option<(DVec2, f64, f64)> {
        match self.element {
            PathElement::Curve { angle, radius } => {
                Some((curve_center(&self.entry, radius, angle), radius, angle))
            }
            _ => None,
        }
    }
}

/// Validated guide path.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    elements: Vec<PathElement>,
    start: Pose,
    spans: Vec<ElementSpan>,
    total_length: f64,
}

impl Path {
    /// Builds a path from literal elements.
    ///
    /// The first element must be the only `Start`; every length and radius must be in domain.
    pub fn new(elements: Vec<PathElement>) -> Result<Self> {
        match elements.first() {
            None => return Err(Error::domain("elements", "a path needs a Start element")),
            Some(PathElement::Start { .. }) => {}
            Some(_) => return Err(Error::domain("element[0]", "first element must be Start")),
        }
        for (index, element) in elements.iter().enumerate() {
            if index > 0 && matches!(element, PathElement::Start { .. }) {
                return Err(Error::domain(
                    format!("element[{index}]"),
                    "only the first element may be Start",
                ));
            }
            element.validate(index)?;
        }

        let mut spans = Vec::with_capacity(elements.len().saturating_sub(1));
        let start = elements[0].pose_at(&Pose::new(DVec2::ZERO, 0.0), 0.0)?;
        let mut pose = start;
        let mut distance = 0.0;
        for (index, element) in elements.iter().enumerate().skip(1) {
            let length = element.length();
            if length <= 0.0 {
                continue;
            }
            let span = ElementSpan {
                index,
                start_distance: distance,
                end_distance: distance + length,
                entry: pose,
                element: *element,
            };
            pose = span.pose_at(span.end_distance);
            distance = span.end_distance;
            spans.push(span);
        }

        Ok(Self {
            elements,
            start,
            spans,
            total_length: distance,
        })
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Number of elements, including the `Start`.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// A path always has its `Start`; this reports whether it has no travel elements.
    pub fn is_empty(&self) -> bool {
        self.elements.len() <= 1
    }

    /// Non-zero-length elements with their cumulative distances and entry poses.
    pub fn element_spans(&self) -> &[ElementSpan] {
        &self.spans
    }

    /// Sum of element arc lengths.
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    pub fn start_pose(&self) -> Pose {
        self.start
    }

    /// Pose after traversing every element in order.
    pub fn end_pose(&self) -> Pose {
        match self.spans.last() {
            Some(span) => span.pose_at(span.end_distance),
            None => self.start_pose(),
        }
    }

    /// Index into [`Self::element_spans`] of the span containing `distance`.
    ///
    /// A distance exactly on a boundary belongs to the later span. `distance` is expected
    /// to be clamped already; returns `None` only for paths without travel.
    pub fn span_index_at(&self, distance: f64) -> Option<usize> {
        if self.spans.is_empty() {
            return None;
        }
        let after = self.spans.partition_point(|s| s.start_distance <= distance);
        Some(after.saturating_sub(1))
    }

    /// Global pose at cumulative arc length `distance`.
    ///
    /// Distances a hair outside `[0, total_length]` are clamped; anything further fails.
    pub fn pose_at_distance(&self, distance: f64) -> Result<Pose> {
        let distance = self.clamp_distance(distance)?;
        Ok(match self.span_index_at(distance) {
            Some(i) => self.spans[i].pose_at(distance),
            None => self.start_pose(),
        })
    }

    /// True if the end location lies within `tolerance` of the start location.
    pub fn is_closed(&self, tolerance: f64) -> bool {
        self.end_pose()
            .position
            .distance(self.start_pose().position)
            <= tolerance
    }

    /// Converts the path back into drafting primitives, one per non-zero-length element.
    ///
    /// Lines keep the travel direction; arcs are expressed counter-clockwise as drafting
    /// formats store them.
    pub fn to_primitives(&self) -> Vec<RawPrimitive> {
        self.spans
            .iter()
            .map(|span| match span.curve() {
                None => RawPrimitive::line(
                    span.entry.position,
                    span.pose_at(span.end_distance).position,
                ),
                Some((center, radius, angle)) => {
                    let from = (span.entry.position - center).to_angle();
                    let to = from + angle;
                    if angle >= 0.0 {
                        RawPrimitive::arc(center, radius, from, to)
                    } else {
                        RawPrimitive::arc(center, radius, to, from)
                    }
                }
            })
            .collect()
    }

    pub(crate) fn clamp_distance(&self, distance: f64) -> Result<f64> {
        let slack = RANGE_SLACK * self.total_length.max(1.0);
        if !distance.is_finite() || distance < -slack || distance > self.total_length + slack {
            return Err(Error::OutOfRange {
                distance,
                length: self.total_length,
            });
        }
        Ok(distance.clamp(0.0, self.total_length))
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;

    const EPS: f64 = 1e-9;

    /// Closed racetrack: two 100-long straights joined by two half turns of radius 20.
    fn racetrack() -> Path {
        Path::new(vec![
            PathElement::start((0.0, 0.0), 0.0),
            PathElement::straight(100.0),
            PathElement::curve(PI, 20.0),
            PathElement::straight(100.0),
            PathElement::curve(PI, 20.0),
        ])
        .expect("valid racetrack")
    }

    #[test]
    fn total_length_sums_elements() {
        let path = racetrack();
        assert!((path.total_length() - (200.0 + 40.0 * PI)).abs() < EPS);
        assert_eq!(path.len(), 5);
        assert_eq!(path.element_spans().len(), 4);
    }

    #[test]
    fn pose_at_zero_is_start_pose() {
        let path = Path::new(vec![
            PathElement::start((3.0, 4.0), 0.5),
            PathElement::straight(10.0),
        ])
        .unwrap();
        assert_eq!(path.pose_at_distance(0.0).unwrap(), path.start_pose());
    }

    #[test]
    fn pose_at_total_length_is_end_of_traversal() {
        let path = racetrack();
        let end = path.pose_at_distance(path.total_length()).unwrap();
        assert!(end.position.distance(DVec2::ZERO) < 1e-9);
        assert!((end.heading - 2.0 * PI).abs() < 1e-9);
        assert!(path.is_closed(1e-6));
    }

    #[test]
    fn boundary_distance_uses_later_element() {
        let path = racetrack();
        assert_eq!(path.span_index_at(100.0), Some(1));
        let pose = path.pose_at_distance(100.0).unwrap();
        assert!(pose.position.distance(DVec2::new(100.0, 0.0)) < EPS);
    }

    #[test]
    fn quarter_way_round_first_turn() {
        let path = racetrack();
        let pose = path.pose_at_distance(100.0 + 20.0 * FRAC_PI_2).unwrap();
        assert!(pose.position.distance(DVec2::new(120.0, 20.0)) < 1e-9);
        assert!((pose.heading - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn out_of_range_distances_fail_but_tiny_overshoot_clamps() {
        let path = racetrack();
        let len = path.total_length();
        assert!(matches!(
            path.pose_at_distance(-1.0),
            Err(Error::OutOfRange { .. })
        ));
        assert!(matches!(
            path.pose_at_distance(len + 1.0),
            Err(Error::OutOfRange { .. })
        ));
        assert!(path.pose_at_distance(len + 1e-12).is_ok());
    }

    #[test]
    fn zero_length_elements_are_skipped() {
        let path = Path::new(vec![
            PathElement::start((0.0, 0.0), 0.0),
            PathElement::straight(0.0),
            PathElement::curve(0.0, 5.0),
            PathElement::straight(10.0),
        ])
        .unwrap();
        assert_eq!(path.element_spans().len(), 1);
        assert_eq!(path.element_spans()[0].index, 3);
        let pose = path.pose_at_distance(0.0).unwrap();
        assert_eq!(pose.position, DVec2::ZERO);
    }

    #[test]
    fn start_only_path_has_zero_length() {
        let path = Path::new(vec![PathElement::start((1.0, 1.0), 0.0)]).unwrap();
        assert!(path.is_empty());
        assert_eq!(path.total_length(), 0.0);
        assert_eq!(path.pose_at_distance(0.0).unwrap().position, DVec2::ONE);
    }

    #[test]
    fn invalid_literals_are_rejected() {
        assert!(Path::new(Vec::new()).is_err());
        assert!(Path::new(vec![PathElement::straight(1.0)]).is_err());
        let two_starts = Path::new(vec![
            PathElement::start((0.0, 0.0), 0.0),
            PathElement::start((1.0, 0.0), 0.0),
        ]);
        assert!(matches!(two_starts, Err(Error::Domain { .. })));
        let bad_radius = Path::new(vec![
            PathElement::start((0.0, 0.0), 0.0),
            PathElement::curve(1.0, 0.0),
        ]);
        assert!(matches!(bad_radius, Err(Error::Domain { ref field, .. }) if field == "element[1].radius"));
        let negative = Path::new(vec![
            PathElement::start((0.0, 0.0), 0.0),
            PathElement::straight(-2.0),
        ]);
        assert!(negative.is_err());
    }

    #[test]
    fn start_element_pose_is_only_defined_at_zero() {
        let start = PathElement::start((1.0, 2.0), 0.3);
        let entry = Pose::new(DVec2::ZERO, 0.0);
        assert_eq!(
            start.pose_at(&entry, 0.0).unwrap(),
            Pose::new((1.0, 2.0), 0.3)
        );
        assert!(start.pose_at(&entry, 1.0).is_err());
    }

    #[test]
    fn curve_element_rejects_overlong_local_distance() {
        let curve = PathElement::curve(FRAC_PI_2, 2.0);
        let entry = Pose::new(DVec2::ZERO, 0.0);
        assert!(curve.pose_at(&entry, PI).is_ok());
        assert!(curve.pose_at(&entry, 4.0).is_err());
    }

    #[test]
    fn to_primitives_traces_the_same_course() {
        let path = Path::new(vec![
            PathElement::start((0.0, 0.0), 0.0),
            PathElement::straight(10.0),
            PathElement::curve(-FRAC_PI_2, 5.0),
        ])
        .unwrap();
        let prims = path.to_primitives();
        assert_eq!(prims.len(), 2);
        let (a, b) = prims[1].endpoints();
        assert!(a.distance(DVec2::new(15.0, -5.0)) < 1e-9);
        assert!(b.distance(DVec2::new(10.0, 0.0)) < 1e-9);
    }
}
