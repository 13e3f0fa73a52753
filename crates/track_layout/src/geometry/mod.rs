//! Pose geometry for straight runs and circular turns.
//!
//! A [`Pose`] is a location plus a heading in radians, measured counter-clockwise from +X.
//! Local offsets are expressed as `(along, perp)` where `perp` is positive to the left of
//! the direction of travel.
use std::f64::consts::{PI, TAU};

use glam::DVec2;

/// Half-angle below which a curve step is treated as its chord length.
const SMALL_HALF_ANGLE: f64 = 1e-9;

/// Location and heading at a point on a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Global location.
    pub position: DVec2,
    /// Heading in radians, counter-clockwise from +X. Not normalized.
    pub heading: f64,
}

impl Pose {
    pub fn new(position: impl Into<DVec2>, heading: f64) -> Self {
        Self {
            position: position.into(),
            heading,
        }
    }

    /// Unit vector pointing along the heading.
    #[inline]
    pub fn direction(&self) -> DVec2 {
        DVec2::from_angle(self.heading)
    }

    /// Unit vector pointing to the left of the heading.
    #[inline]
    pub fn left(&self) -> DVec2 {
        self.direction().perp()
    }

    /// Maps a local `(along, perp)` offset into global coordinates.
    #[inline]
    pub fn transform(&self, along: f64, perp: f64) -> DVec2 {
        transform_point(self, along, perp)
    }

    /// Returns true if both location and heading agree within the given tolerances.
    pub fn approx_eq(&self, other: &Pose, distance_tolerance: f64, angle_tolerance: f64) -> bool {
        self.position.distance(other.position) <= distance_tolerance
            && angle_between(self.heading, other.heading).abs() <= angle_tolerance
    }
}

/// Rotates the local offset `(along, perp)` by the pose heading and translates by its location.
#[inline]
pub fn transform_point(origin: &Pose, along: f64, perp: f64) -> DVec2 {
    origin.position + origin.direction() * along + origin.left() * perp
}

/// Pose reached after travelling `distance` straight ahead from `origin`.
#[inline]
pub fn pose_on_straight(origin: &Pose, distance: f64) -> Pose {
    Pose {
        position: origin.position + origin.direction() * distance,
        heading: origin.heading,
    }
}

/// Pose reached after travelling `distance` along a circular turn of `radius` starting at `origin`.
///
/// `turn_sign` selects the direction: positive turns left (counter-clockwise), negative turns
/// right. The position is computed from the chord, which stays exact as `radius` grows large.
pub fn pose_on_curve(origin: &Pose, radius: f64, turn_sign: f64, distance: f64) -> Pose {
    let swept = turn_sign.signum() * distance / radius;
    let half = distance / (2.0 * radius);
    let chord = if half.abs() < SMALL_HALF_ANGLE {
        distance
    } else {
        2.0 * radius * half.sin()
    };
    let chord_heading = origin.heading + swept * 0.5;
    Pose {
        position: origin.position + DVec2::from_angle(chord_heading) * chord,
        heading: origin.heading + swept,
    }
}

/// Center of the circle a curve leaving `origin` turns around.
#[inline]
pub fn curve_center(origin: &Pose, radius: f64, turn_sign: f64) -> DVec2 {
    origin.position + origin.left() * (radius * turn_sign.signum())
}

/// Wraps an angle into `(-PI, PI]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Signed smallest rotation taking heading `from` to heading `to`.
#[inline]
pub fn angle_between(from: f64, to: f64) -> f64 {
    normalize_angle(to - from)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(a: DVec2, b: DVec2) {
        assert!(a.distance(b) < EPS, "expected {b}, got {a}");
    }

    #[test]
    fn transform_point_offsets_left_of_travel() {
        let pose = Pose::new((0.0, 0.0), 0.0);
        assert_close(transform_point(&pose, 2.0, 5.0), DVec2::new(2.0, 5.0));

        let north = Pose::new((1.0, 1.0), FRAC_PI_2);
        assert_close(transform_point(&north, 2.0, 1.0), DVec2::new(0.0, 3.0));
    }

    #[test]
    fn straight_advances_along_heading() {
        let pose = Pose::new((1.0, 2.0), PI);
        let moved = pose_on_straight(&pose, 3.0);
        assert_close(moved.position, DVec2::new(-2.0, 2.0));
        assert_eq!(moved.heading, PI);
    }

    #[test]
    fn quarter_turn_left_ends_on_circle() {
        let pose = Pose::new((0.0, 0.0), 0.0);
        let radius = 10.0;
        let end = pose_on_curve(&pose, radius, 1.0, radius * FRAC_PI_2);
        assert_close(end.position, DVec2::new(10.0, 10.0));
        assert!((end.heading - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn quarter_turn_right_mirrors_left() {
        let pose = Pose::new((0.0, 0.0), 0.0);
        let end = pose_on_curve(&pose, 4.0, -1.0, 4.0 * FRAC_PI_2);
        assert_close(end.position, DVec2::new(4.0, -4.0));
        assert!((end.heading + FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn huge_radius_behaves_like_straight() {
        let pose = Pose::new((0.0, 0.0), 0.3);
        let curved = pose_on_curve(&pose, 1e15, 1.0, 25.0);
        let straight = pose_on_straight(&pose, 25.0);
        assert!(curved.position.distance(straight.position) < 1e-9);
        assert!(curved.position.is_finite());
    }

    #[test]
    fn zero_distance_is_identity() {
        let pose = Pose::new((3.0, -1.0), 1.2);
        assert_eq!(pose_on_curve(&pose, 5.0, -1.0, 0.0).position, pose.position);
        assert_eq!(pose_on_straight(&pose, 0.0), pose);
    }

    #[test]
    fn curve_center_sits_on_turn_side() {
        let pose = Pose::new((0.0, 0.0), 0.0);
        assert_close(curve_center(&pose, 2.0, 1.0), DVec2::new(0.0, 2.0));
        assert_close(curve_center(&pose, 2.0, -1.0), DVec2::new(0.0, -2.0));
    }

    #[test]
    fn normalize_angle_wraps_into_half_open_range() {
        assert!((normalize_angle(3.0 * PI + 0.5) - (0.5 - PI)).abs() < EPS);
        assert!((normalize_angle(-PI) - PI).abs() < EPS);
        assert!(normalize_angle(TAU).abs() < EPS);
        assert!((angle_between(0.1, TAU - 0.1) + 0.2).abs() < EPS);
    }
}
