//! Ball state and the world record passed into each step
//!
//! Coordinates are normalized: the boundary is the unit circle at the origin
//! and +y points down, so positive gravity pulls balls toward +y.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::step::{StepStats, step};
use crate::consts::BOUNDARY_RADIUS;
use crate::polar_to_cartesian;
use crate::settings::{PhysicsConfig, Spawn};

/// Fraction of the boundary radius scattered balls may start within
const SCATTER_RADIUS: f64 = 0.9;

/// A point-mass ball
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ball {
    /// Position (x, y)
    pub pos: DVec2,
    /// Velocity (dx, dy) in units per second
    pub vel: DVec2,
}

impl Ball {
    pub fn new(x: f64, y: f64, dx: f64, dy: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
            vel: DVec2::new(dx, dy),
        }
    }

    pub fn from_vectors(pos: DVec2, vel: DVec2) -> Self {
        Self { pos, vel }
    }

    pub fn at_rest(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, 0.0)
    }

    /// Distance from the boundary centre
    #[inline]
    pub fn distance(&self) -> f64 {
        self.pos.length()
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.vel.length()
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }

    /// Within the boundary, allowing `epsilon` of floating-point slack
    pub fn is_contained(&self, epsilon: f64) -> bool {
        self.distance() <= BOUNDARY_RADIUS + epsilon
    }

    /// Put the ball back at rest on the origin
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Initial ball state as written in settings
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BallSpawn {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
}

impl BallSpawn {
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.dx.is_finite() && self.dy.is_finite()
    }
}

impl From<BallSpawn> for Ball {
    fn from(spawn: BallSpawn) -> Self {
        Ball::new(spawn.x, spawn.y, spawn.dx, spawn.dy)
    }
}

/// Complete simulation state (fixed-size ball collection plus counters)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct World {
    /// Balls in stable render order
    pub balls: Vec<Ball>,
    /// Completed ticks with a positive dt
    pub time_ticks: u64,
    /// Simulated seconds
    pub elapsed: f64,
}

impl World {
    pub fn new(balls: Vec<Ball>) -> Self {
        Self {
            balls,
            time_ticks: 0,
            elapsed: 0.0,
        }
    }

    /// Build the initial world from spawn settings
    pub fn from_spawn(spawn: &Spawn) -> Self {
        match spawn {
            Spawn::List { balls } => Self::new(balls.iter().copied().map(Ball::from).collect()),
            Spawn::Scatter { count, seed } => Self::scattered(*seed, *count),
        }
    }

    /// `count` balls at rest, reproducibly placed inside the boundary
    pub fn scattered(seed: u64, count: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let balls = (0..count)
            .map(|_| {
                // sqrt keeps the placement uniform over the disk
                let r = SCATTER_RADIUS * rng.random::<f64>().sqrt();
                let theta = rng.random_range(0.0..std::f64::consts::TAU);
                Ball::from_vectors(polar_to_cartesian(r, theta), DVec2::ZERO)
            })
            .collect();
        Self::new(balls)
    }

    /// Advance every ball by one tick
    pub fn advance(&mut self, dt: f64, physics: &PhysicsConfig) -> StepStats {
        let stats = step(&mut self.balls, dt, physics);
        if dt > 0.0 && dt.is_finite() {
            self.time_ticks += 1;
            self.elapsed += dt;
        }
        stats
    }

    /// Largest distance from the centre over all balls
    pub fn max_distance(&self) -> f64 {
        self.balls.iter().map(Ball::distance).fold(0.0, f64::max)
    }
}
