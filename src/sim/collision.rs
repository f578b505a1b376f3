//! Boundary collision detection and response
//!
//! Two ways of locating the moment a ball crosses the unit circle:
//! - `crossing_fraction`: linear interpolation of distance-from-centre over the
//!   tick (cheap, approximate for long or tangential moves)
//! - `exit_time`: analytic intersection of the motion segment with the circle
//!
//! Reflection mirrors the incoming direction across the radius at the contact
//! point, which is specular reflection about the local tangent.

use glam::DVec2;

use crate::cartesian_to_polar;
use crate::consts::BOUNDARY_RADIUS;
use crate::settings::BouncePolicy;

/// Fraction of the tick spent before reaching the boundary
///
/// Interpolates the scalar distance from the centre between the start and end
/// of the tick. Returns `None` when the estimate is degenerate (distance not
/// increasing, or a non-finite ratio); callers treat that as no collision.
#[inline]
pub fn crossing_fraction(prev_dist: f64, new_dist: f64) -> Option<f64> {
    let before_edge = BOUNDARY_RADIUS - prev_dist;
    let total_distance = new_dist - prev_dist;
    if !(total_distance > 0.0) {
        return None;
    }
    let fraction = before_edge / total_distance;
    fraction.is_finite().then_some(fraction)
}

/// Time at which `pos + t * vel` leaves the boundary
///
/// Solves `|pos + t * vel| = 1` for the larger root. `pos` must be on or inside
/// the boundary; the result is then non-negative. Returns `None` for a ball
/// that is not moving.
pub fn exit_time(pos: DVec2, vel: DVec2) -> Option<f64> {
    let a = vel.length_squared();
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * pos.dot(vel);
    let c = pos.length_squared() - BOUNDARY_RADIUS * BOUNDARY_RADIUS;
    // c <= 0 keeps the discriminant non-negative; max guards rounding
    let disc = (b * b - 4.0 * a * c).max(0.0);
    let t = (-b + disc.sqrt()) / (2.0 * a);
    Some(t.max(0.0))
}

/// Outgoing velocity for a ball touching the boundary at `pos`
pub fn reflect_off_boundary(pos: DVec2, vel: DVec2, policy: &BouncePolicy) -> DVec2 {
    let (_, reflect_across) = cartesian_to_polar(pos);
    let (old_magnitude, ball_angle) = cartesian_to_polar(vel);
    let new_angle = reflect_across + (reflect_across - ball_angle);
    let speed = policy.outgoing_speed(old_magnitude);
    DVec2::new(-new_angle.cos() * speed, -new_angle.sin() * speed)
}
