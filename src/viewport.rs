//! Renderer boundary: normalized coordinates to pixels
//!
//! The boundary circle is drawn at a fixed share of the smaller canvas side,
//! centred on the canvas. Balls are fixed-radius disks.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Boundary radius as a share of the smaller canvas dimension
pub const ARENA_FILL: f64 = 0.4375;
/// Drawn ball radius (pixels)
pub const BALL_RADIUS_PX: f64 = 10.0;

/// Canvas size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Boundary radius in pixels
    #[inline]
    pub fn radius_px(&self) -> f64 {
        self.width.min(self.height) * ARENA_FILL
    }

    /// Radius of the drawn container ring, padded so ball disks sit inside it
    pub fn ring_radius_px(&self) -> f64 {
        self.radius_px() + BALL_RADIUS_PX
    }

    /// Map a normalized position to pixel coordinates
    #[inline]
    pub fn to_pixel(&self, pos: DVec2) -> DVec2 {
        self.center() + pos * self.radius_px()
    }
}
