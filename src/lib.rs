//! Ring Bounce - balls falling under gravity inside a circular boundary
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball state, boundary collision, step, frame clock)
//! - `settings`: Tunable physics and frame-loop configuration
//! - `viewport`: Mapping from normalized coordinates to pixels for renderers

pub mod settings;
pub mod sim;
pub mod viewport;

pub use settings::{ConfigError, Preset, Settings};
pub use viewport::Viewport;

use glam::DVec2;

/// Simulation configuration constants
pub mod consts {
    /// Gravity (normalized units/s², +y points down)
    pub const GRAVITY: f64 = 9.8;
    /// Boundary is the unit circle centred on the origin
    pub const BOUNDARY_RADIUS: f64 = 1.0;

    /// Largest frame delta the host clock hands to the simulation (seconds)
    pub const MAX_FRAME_DT: f64 = 0.1;
    /// Upper bound accepted for `max_frame_dt` in settings
    pub const MAX_FRAME_DT_LIMIT: f64 = 0.3;

    /// Fixed timestep when the driver runs in fixed mode (120 Hz)
    pub const FIXED_DT: f64 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Post-bounce speed ceiling of the renormalizing bounce policy
    pub const RENORMALIZE_CAP: f64 = 0.9999999999999;
    /// Speed the renormalizing bounce policy pulls toward
    pub const RENORMALIZE_TARGET: f64 = 7.0;

    /// Bounces resolved per tick by the exact collision mode
    pub const MAX_BOUNCES_PER_TICK: u32 = 4;
    /// Largest configurable bounce budget
    pub const MAX_BOUNCES_LIMIT: u32 = 64;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: DVec2) -> (f64, f64) {
    (pos.length(), pos.y.atan2(pos.x))
}
