//! Simulation settings
//!
//! Physics tunables, frame-loop behaviour and initial ball placement.
//! Loaded from JSON by the host; every field has a default matching the
//! reference behaviour (single elastic ball dropped from the origin).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::BallSpawn;

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Speed assigned to a ball after it bounces off the boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BouncePolicy {
    /// Outgoing speed equals incoming speed
    #[default]
    Elastic,
    /// Counteracts floating-point energy drift:
    /// `min(cap, (target / speed + 1) / 2 * speed)`
    Renormalize { cap: f64, target: f64 },
}

impl BouncePolicy {
    /// Renormalize with the stock constants
    pub fn renormalize() -> Self {
        BouncePolicy::Renormalize {
            cap: RENORMALIZE_CAP,
            target: RENORMALIZE_TARGET,
        }
    }

    /// Outgoing speed for a given incoming speed
    #[inline]
    pub fn outgoing_speed(&self, incoming: f64) -> f64 {
        match *self {
            BouncePolicy::Elastic => incoming,
            BouncePolicy::Renormalize { cap, target } => {
                if incoming == 0.0 {
                    return 0.0;
                }
                cap.min((target / incoming + 1.0) / 2.0 * incoming)
            }
        }
    }
}

/// How boundary crossings are resolved inside one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollisionMode {
    /// Linear interpolation of distance-from-centre, at most one bounce per tick
    #[default]
    Linear,
    /// Analytic segment/circle intersection, repeated up to `max_bounces` per tick
    Exact { max_bounces: u32 },
}

/// Physics tunables passed into every step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Acceleration added to `dy` per second
    pub gravity: f64,
    pub bounce: BouncePolicy,
    pub collision: CollisionMode,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            bounce: BouncePolicy::Elastic,
            collision: CollisionMode::Linear,
        }
    }
}

/// How the driver turns frame deltas into physics ticks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Timestep {
    /// One tick per frame covering the whole (clamped) frame delta
    #[default]
    Variable,
    /// Accumulate frame time and run fixed ticks
    Fixed { dt: f64, max_substeps: u32 },
}

/// Host frame-loop settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Clamp for wall-clock gaps (pauses, background tabs)
    pub max_frame_dt: f64,
    pub timestep: Timestep,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frame_dt: MAX_FRAME_DT,
            timestep: Timestep::Variable,
        }
    }
}

/// Initial ball placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Spawn {
    /// Explicit list of initial states
    List { balls: Vec<BallSpawn> },
    /// `count` balls at rest, placed by a seeded RNG
    Scatter { count: usize, seed: u64 },
}

impl Default for Spawn {
    fn default() -> Self {
        Spawn::List {
            balls: vec![BallSpawn::default()],
        }
    }
}

/// Preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    /// Elastic bounce, linear crossing estimate, one tick per frame
    #[default]
    Reference,
    /// Renormalizing bounce to keep long runs bounded
    Stable,
    /// Exact crossings on a fixed 120 Hz timestep
    Accurate,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Reference => "Reference",
            Preset::Stable => "Stable",
            Preset::Accurate => "Accurate",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reference" | "ref" => Some(Preset::Reference),
            "stable" => Some(Preset::Stable),
            "accurate" => Some(Preset::Accurate),
            _ => None,
        }
    }
}

/// Complete settings document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsConfig,
    pub frame: FrameConfig,
    pub spawn: Spawn,
}

impl Settings {
    /// Create settings from a preset
    pub fn from_preset(preset: Preset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a preset (physics and timestep only, spawn is left alone)
    pub fn apply_preset(&mut self, preset: Preset) {
        match preset {
            Preset::Reference => {
                self.physics = PhysicsConfig::default();
                self.frame.timestep = Timestep::Variable;
            }
            Preset::Stable => {
                self.physics.bounce = BouncePolicy::renormalize();
                self.physics.collision = CollisionMode::Linear;
                self.frame.timestep = Timestep::Variable;
            }
            Preset::Accurate => {
                self.physics.bounce = BouncePolicy::Elastic;
                self.physics.collision = CollisionMode::Exact {
                    max_bounces: MAX_BOUNCES_PER_TICK,
                };
                self.frame.timestep = Timestep::Fixed {
                    dt: FIXED_DT,
                    max_substeps: MAX_SUBSTEPS,
                };
            }
        }
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate().map_err(ConfigError::Invalid)?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every field, reporting the first bad one
    pub fn validate(&self) -> Result<(), String> {
        let physics = &self.physics;
        if !physics.gravity.is_finite() {
            return Err(format!("gravity must be finite, got {}", physics.gravity));
        }
        if let BouncePolicy::Renormalize { cap, target } = physics.bounce {
            if !(cap.is_finite() && cap > 0.0) {
                return Err(format!("renormalize cap must be positive, got {cap}"));
            }
            if !(target.is_finite() && target > 0.0) {
                return Err(format!("renormalize target must be positive, got {target}"));
            }
        }
        if let CollisionMode::Exact { max_bounces } = physics.collision {
            if max_bounces == 0 || max_bounces > MAX_BOUNCES_LIMIT {
                return Err(format!(
                    "exact collision max_bounces must be in 1..={MAX_BOUNCES_LIMIT}, got {max_bounces}"
                ));
            }
        }

        let frame = &self.frame;
        if !(frame.max_frame_dt > 0.0 && frame.max_frame_dt <= MAX_FRAME_DT_LIMIT) {
            return Err(format!(
                "max_frame_dt must be in (0, {MAX_FRAME_DT_LIMIT}], got {}",
                frame.max_frame_dt
            ));
        }
        if let Timestep::Fixed { dt, max_substeps } = frame.timestep {
            if !(dt.is_finite() && dt > 0.0) {
                return Err(format!("fixed timestep must be positive, got {dt}"));
            }
            if max_substeps == 0 {
                return Err("fixed timestep needs max_substeps >= 1".to_string());
            }
        }

        match &self.spawn {
            Spawn::List { balls } => {
                if balls.is_empty() {
                    return Err("spawn list needs at least one ball".to_string());
                }
                if let Some(i) = balls.iter().position(|b| !b.is_finite()) {
                    return Err(format!("spawn ball {i} has a non-finite component"));
                }
            }
            Spawn::Scatter { count, .. } => {
                if *count == 0 {
                    return Err("scatter spawn needs count >= 1".to_string());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference() {
        let settings = Settings::default();
        assert_eq!(settings.physics.gravity, 9.8);
        assert_eq!(settings.physics.bounce, BouncePolicy::Elastic);
        assert_eq!(settings.physics.collision, CollisionMode::Linear);
        assert_eq!(settings.frame.timestep, Timestep::Variable);
        assert!(settings.validate().is_ok());
        match settings.spawn {
            Spawn::List { ref balls } => {
                assert_eq!(balls.len(), 1);
                assert_eq!(balls[0], BallSpawn::default());
            }
            _ => panic!("default spawn should be a list"),
        }
    }

    #[test]
    fn test_renormalize_speed() {
        let policy = BouncePolicy::renormalize();
        // (7 / 4 + 1) / 2 * 4 = 5.5, capped
        assert_eq!(policy.outgoing_speed(4.0), RENORMALIZE_CAP);
        assert_eq!(policy.outgoing_speed(0.0), 0.0);

        let loose = BouncePolicy::Renormalize {
            cap: 100.0,
            target: 7.0,
        };
        assert!((loose.outgoing_speed(4.0) - 5.5).abs() < 1e-12);
        assert!((loose.outgoing_speed(9.0) - 8.0).abs() < 1e-12);
        assert_eq!(BouncePolicy::Elastic.outgoing_speed(3.25), 3.25);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "physics": { "gravity": 4.9 } }"#).unwrap();
        assert_eq!(settings.physics.gravity, 4.9);
        assert_eq!(settings.physics.bounce, BouncePolicy::Elastic);
        assert_eq!(settings.frame.max_frame_dt, MAX_FRAME_DT);
    }

    #[test]
    fn test_tagged_json() {
        let json = r#"{
            "physics": {
                "bounce": { "kind": "renormalize", "cap": 0.5, "target": 7.0 },
                "collision": { "kind": "exact", "max_bounces": 3 }
            },
            "frame": { "timestep": { "kind": "fixed", "dt": 0.01, "max_substeps": 4 } },
            "spawn": { "kind": "scatter", "count": 5, "seed": 42 }
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(
            settings.physics.bounce,
            BouncePolicy::Renormalize {
                cap: 0.5,
                target: 7.0
            }
        );
        assert_eq!(
            settings.physics.collision,
            CollisionMode::Exact { max_bounces: 3 }
        );
        assert_eq!(settings.spawn, Spawn::Scatter { count: 5, seed: 42 });
    }

    #[test]
    fn test_json_round_trip_of_preset() {
        let settings = Settings::from_preset(Preset::Accurate);
        let json = settings.to_json().unwrap();
        let parsed = Settings::from_json(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_validation_failures() {
        let mut settings = Settings::default();
        settings.frame.max_frame_dt = 0.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.frame.max_frame_dt = 5.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.physics.collision = CollisionMode::Exact { max_bounces: 0 };
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.physics.collision = CollisionMode::Exact {
            max_bounces: MAX_BOUNCES_LIMIT + 1,
        };
        assert!(settings.validate().is_err());
        settings.physics.collision = CollisionMode::Exact {
            max_bounces: MAX_BOUNCES_LIMIT,
        };
        assert!(settings.validate().is_ok());

        let mut settings = Settings::default();
        settings.physics.gravity = f64::NAN;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.spawn = Spawn::Scatter { count: 0, seed: 1 };
        assert!(settings.validate().is_err());

        // Empty list is as unusable as an empty scatter
        let mut settings = Settings::default();
        settings.spawn = Spawn::List { balls: Vec::new() };
        assert!(settings.validate().is_err());
        let err = Settings::from_json(r#"{ "spawn": { "kind": "list", "balls": [] } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = Settings::from_json(r#"{ "frame": { "max_frame_dt": -1.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_preset_names() {
        for preset in [Preset::Reference, Preset::Stable, Preset::Accurate] {
            assert_eq!(Preset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(Preset::from_str("ref"), Some(Preset::Reference));
        assert_eq!(Preset::from_str("bogus"), None);
    }
}
