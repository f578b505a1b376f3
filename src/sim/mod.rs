//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Balls never interact, so iteration order has no effect on results
//! - No allocation inside a step
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod state;
pub mod step;

pub use clock::{Driver, FrameClock, FrameReport};
pub use collision::{crossing_fraction, exit_time, reflect_off_boundary};
pub use state::{Ball, BallSpawn, World};
pub use step::{BallOutcome, StepStats, step, step_ball};
