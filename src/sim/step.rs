//! Per-tick physics update
//!
//! Each ball is advanced independently: gravity first, then semi-implicit
//! Euler integration, then boundary collision and reflection.

use super::collision::{crossing_fraction, exit_time, reflect_off_boundary};
use super::state::Ball;
use crate::consts::BOUNDARY_RADIUS;
use crate::settings::{BouncePolicy, CollisionMode, PhysicsConfig};

/// What a tick did to one ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallOutcome {
    /// dt was zero, negative or non-finite
    Skipped,
    /// Moved without touching the boundary
    Free,
    /// Bounced off the boundary this many times
    Bounced(u32),
    /// State went non-finite and the ball was put back at the origin
    Reset,
}

/// Summary of a step across all balls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub bounces: u32,
    pub resets: u32,
}

impl StepStats {
    pub fn record(&mut self, outcome: BallOutcome) {
        match outcome {
            BallOutcome::Bounced(n) => self.bounces += n,
            BallOutcome::Reset => self.resets += 1,
            BallOutcome::Skipped | BallOutcome::Free => {}
        }
    }

    pub fn merge(&mut self, other: StepStats) {
        self.bounces += other.bounces;
        self.resets += other.resets;
    }
}

#[inline]
fn is_usable_dt(dt: f64) -> bool {
    dt > 0.0 && dt.is_finite()
}

/// Advance every ball by one tick of `dt` seconds
pub fn step(balls: &mut [Ball], dt: f64, physics: &PhysicsConfig) -> StepStats {
    let mut stats = StepStats::default();
    if !is_usable_dt(dt) {
        return stats;
    }
    for ball in balls.iter_mut() {
        stats.record(step_ball(ball, dt, physics));
    }
    stats
}

/// Advance a single ball by one tick
pub fn step_ball(ball: &mut Ball, dt: f64, physics: &PhysicsConfig) -> BallOutcome {
    if !is_usable_dt(dt) {
        return BallOutcome::Skipped;
    }
    if !ball.is_finite() {
        log::warn!("Non-finite ball {:?} before step, resetting", ball);
        ball.reset();
        return BallOutcome::Reset;
    }

    // Gravity goes into velocity before the displacement uses it
    ball.vel.y += dt * physics.gravity;

    let outcome = match physics.collision {
        CollisionMode::Linear => advance_linear(ball, dt, &physics.bounce),
        CollisionMode::Exact { max_bounces } => {
            advance_exact(ball, dt, &physics.bounce, max_bounces)
        }
    };

    if !ball.is_finite() {
        log::warn!("Non-finite ball {:?} after step, resetting", ball);
        ball.reset();
        return BallOutcome::Reset;
    }
    outcome
}

/// One bounce at most, contact time from interpolated distance-from-centre
fn advance_linear(ball: &mut Ball, dt: f64, policy: &BouncePolicy) -> BallOutcome {
    let new_pos = ball.pos + ball.vel * dt;
    let prev_dist = ball.distance();
    let new_dist = new_pos.length();

    if new_dist <= BOUNDARY_RADIUS {
        ball.pos = new_pos;
        return BallOutcome::Free;
    }

    let Some(fraction) = crossing_fraction(prev_dist, new_dist) else {
        ball.pos = new_pos;
        return BallOutcome::Free;
    };

    let dt_before = dt * fraction;
    ball.pos += ball.vel * dt_before;

    // At the edge, no clamp onto the circle
    ball.vel = reflect_off_boundary(ball.pos, ball.vel, policy);
    log::trace!("Bounce at {:?} -> vel {:?}", ball.pos, ball.vel);

    let dt_after = dt - dt_before;
    ball.pos += ball.vel * dt_after;

    // The remainder can graze back out past the wall (tangential hits); the
    // second crossing is not resolved, the ball is put back on the boundary
    let dist = ball.distance();
    if dist > BOUNDARY_RADIUS {
        log::trace!("Remainder left the boundary at {dist}, projecting");
        ball.pos *= BOUNDARY_RADIUS / dist;
    }
    BallOutcome::Bounced(1)
}

/// Analytic crossings, repeated until the tick is used up or the budget runs out
fn advance_exact(
    ball: &mut Ball,
    dt: f64,
    policy: &BouncePolicy,
    max_bounces: u32,
) -> BallOutcome {
    // A ball that starts outside is brought onto the boundary first
    if ball.distance() > BOUNDARY_RADIUS {
        ball.pos = ball.pos.normalize() * BOUNDARY_RADIUS;
    }

    let mut remaining = dt;
    let mut bounces = 0;
    while bounces < max_bounces {
        let end = ball.pos + ball.vel * remaining;
        if end.length() <= BOUNDARY_RADIUS {
            ball.pos = end;
            return bounce_outcome(bounces);
        }
        let Some(t) = exit_time(ball.pos, ball.vel) else {
            break;
        };
        // Sliding along the wall: no progress left to make, let the projection finish
        if bounces > 0 && t <= f64::EPSILON {
            break;
        }
        let t = t.min(remaining);
        ball.pos += ball.vel * t;
        ball.vel = reflect_off_boundary(ball.pos, ball.vel, policy);
        log::trace!("Bounce {} at {:?} -> vel {:?}", bounces + 1, ball.pos, ball.vel);
        remaining -= t;
        bounces += 1;
    }

    // Out of bounces: finish the tick but stay on the boundary
    let end = ball.pos + ball.vel * remaining;
    ball.pos = if end.length() > BOUNDARY_RADIUS {
        end.normalize() * BOUNDARY_RADIUS
    } else {
        end
    };
    bounce_outcome(bounces)
}

#[inline]
fn bounce_outcome(bounces: u32) -> BallOutcome {
    if bounces == 0 {
        BallOutcome::Free
    } else {
        BallOutcome::Bounced(bounces)
    }
}
