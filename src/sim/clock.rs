//! Host-side frame clock and loop driver
//!
//! The host owns real time. `FrameClock` turns animation-frame timestamps into
//! clamped deltas; `Driver` feeds those deltas into the world either as one
//! tick per frame or as fixed ticks drawn from an accumulator.

use super::state::World;
use super::step::StepStats;
use crate::settings::{FrameConfig, PhysicsConfig, Settings, Timestep};

/// Derives per-frame `dt` from host timestamps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    /// Timestamp of the previous frame (ms), unset until the first frame
    last_ms: Option<f64>,
    max_dt: f64,
}

impl FrameClock {
    pub fn new(max_dt: f64) -> Self {
        Self {
            last_ms: None,
            max_dt,
        }
    }

    pub fn is_started(&self) -> bool {
        self.last_ms.is_some()
    }

    /// Seconds since the previous frame, clamped to `max_dt`
    ///
    /// The first frame only records the timestamp and yields 0. Time running
    /// backwards also yields 0. Non-finite timestamps are ignored.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        if !now_ms.is_finite() {
            log::warn!("Ignoring non-finite frame timestamp {now_ms}");
            return 0.0;
        }
        let Some(last) = self.last_ms.replace(now_ms) else {
            return 0.0;
        };
        let dt = (now_ms - last) / 1000.0;
        if dt <= 0.0 {
            return 0.0;
        }
        if dt > self.max_dt {
            log::debug!("Frame gap {dt:.3}s clamped to {:.3}s", self.max_dt);
            return self.max_dt;
        }
        dt
    }

    /// Forget the previous timestamp (e.g. after the host was suspended)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Result of one host frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    /// Clamped frame delta (seconds)
    pub dt: f64,
    /// Physics ticks run this frame
    pub steps: u32,
    pub stats: StepStats,
}

/// Game loop: owns the clock and advances the world once per host frame
#[derive(Debug, Clone)]
pub struct Driver {
    pub world: World,
    clock: FrameClock,
    physics: PhysicsConfig,
    timestep: Timestep,
    accumulator: f64,
}

impl Driver {
    /// A fixed timestep that could never advance (`dt <= 0`, non-finite, or
    /// zero substeps) runs as a variable timestep instead
    pub fn new(world: World, physics: PhysicsConfig, frame: FrameConfig) -> Self {
        let timestep = match frame.timestep {
            Timestep::Fixed { dt, max_substeps }
                if !(dt > 0.0 && dt.is_finite()) || max_substeps == 0 =>
            {
                log::warn!(
                    "Unusable fixed timestep (dt {dt}, {max_substeps} substeps), using variable"
                );
                Timestep::Variable
            }
            timestep => timestep,
        };
        Self {
            world,
            clock: FrameClock::new(frame.max_frame_dt),
            physics,
            timestep,
            accumulator: 0.0,
        }
    }

    pub fn timestep(&self) -> Timestep {
        self.timestep
    }

    /// Driver with the world built from the settings' spawn list
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            World::from_spawn(&settings.spawn),
            settings.physics,
            settings.frame,
        )
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    /// Run one host frame at timestamp `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> FrameReport {
        let dt = self.clock.tick(now_ms);
        let mut report = FrameReport {
            dt,
            ..Default::default()
        };

        match self.timestep {
            Timestep::Variable => {
                if dt > 0.0 {
                    report.stats = self.world.advance(dt, &self.physics);
                    report.steps = 1;
                }
            }
            Timestep::Fixed {
                dt: step_dt,
                max_substeps,
            } => {
                self.accumulator += dt;
                while self.accumulator >= step_dt && report.steps < max_substeps {
                    let stats = self.world.advance(step_dt, &self.physics);
                    report.stats.merge(stats);
                    self.accumulator -= step_dt;
                    report.steps += 1;
                }
                if self.accumulator >= step_dt {
                    log::warn!(
                        "Dropping {:.3}s of simulation backlog after {} substeps",
                        self.accumulator,
                        report.steps
                    );
                    self.accumulator %= step_dt;
                }
            }
        }

        if report.stats.resets > 0 {
            log::warn!("{} ball(s) reset this frame", report.stats.resets);
        }
        report
    }

    /// Restart timing without touching the world (next frame yields dt = 0)
    pub fn suspend(&mut self) {
        self.clock.reset();
        self.accumulator = 0.0;
    }
}
