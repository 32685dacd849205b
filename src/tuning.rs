//! Game balance and behavior policies
//!
//! Loaded from JSON (every field optional, missing fields keep their
//! defaults) or built from `Tuning::default()`.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// What happens to vertical velocity when the player lands on a platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LandingResponse {
    /// Zero vertical velocity and stay grounded until the jump key is pressed
    #[default]
    Snap,
    /// Launch with the jump impulse immediately, no input needed
    Bounce,
}

/// Horizontal viewport edge handling for the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// Leave one side, reappear on the other
    #[default]
    Wrap,
    /// Stop at the edge
    Clamp,
}

impl LandingResponse {
    pub fn as_str(&self) -> &'static str {
        match self {
            LandingResponse::Snap => "snap",
            LandingResponse::Bounce => "bounce",
        }
    }
}

impl BoundsPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundsPolicy::Wrap => "wrap",
            BoundsPolicy::Clamp => "clamp",
        }
    }
}

/// Player kinematics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: f32,
    /// Negative (up)
    pub jump_impulse: f32,
    pub move_speed: f32,
    pub player_half_extents: Vec2,
    pub landing: LandingResponse,
    pub horizontal_bounds: BoundsPolicy,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            move_speed: MOVE_SPEED,
            player_half_extents: Vec2::new(PLAYER_HALF_WIDTH, PLAYER_HALF_HEIGHT),
            landing: LandingResponse::Snap,
            horizontal_bounds: BoundsPolicy::Wrap,
        }
    }
}

impl PhysicsTuning {
    /// Highest the player can rise above its take-off point
    pub fn jump_apex(&self) -> f32 {
        self.jump_impulse * self.jump_impulse / (2.0 * self.gravity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformTuning {
    pub width: f32,
    pub height: f32,
    pub moving_speed: f32,
    pub disappear_duration: f32,
}

impl Default for PlatformTuning {
    fn default() -> Self {
        Self {
            width: PLATFORM_WIDTH,
            height: PLATFORM_HEIGHT,
            moving_speed: MOVING_PLATFORM_SPEED,
            disappear_duration: DISAPPEAR_DURATION,
        }
    }
}

/// Level generator placement and difficulty ramp
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationTuning {
    pub min_gap: f32,
    pub max_gap: f32,
    pub max_horizontal_reach: f32,
    pub moving_score_threshold: u64,
    pub moving_chance: f64,
    pub destructible_score_threshold: u64,
    pub destructible_chance: f64,
    pub lookahead: f32,
}

impl Default for GenerationTuning {
    fn default() -> Self {
        Self {
            min_gap: MIN_PLATFORM_GAP,
            max_gap: MAX_PLATFORM_GAP,
            max_horizontal_reach: MAX_HORIZONTAL_REACH,
            moving_score_threshold: MOVING_SCORE_THRESHOLD,
            moving_chance: MOVING_CHANCE,
            destructible_score_threshold: DESTRUCTIBLE_SCORE_THRESHOLD,
            destructible_chance: DESTRUCTIBLE_CHANCE,
            lookahead: GENERATION_LOOKAHEAD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    pub score_per_unit: f32,
    /// Bottom of the visible window acts as ground instead of resetting
    pub viewport_floor: bool,
    pub seed_platform_margin: f32,
    pub seed: u64,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            score_per_unit: SCORE_PER_UNIT,
            viewport_floor: false,
            seed_platform_margin: SEED_PLATFORM_MARGIN,
            seed: DEFAULT_SEED,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub platforms: PlatformTuning,
    pub generation: GenerationTuning,
    pub session: SessionTuning,
}

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}

impl Tuning {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Tuning with a different RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.session.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let p = &self.physics;
        positive("physics.gravity", p.gravity)?;
        if !(p.jump_impulse.is_finite() && p.jump_impulse < 0.0) {
            return Err(invalid("physics.jump_impulse", "must be finite and negative (upward)"));
        }
        positive("physics.move_speed", p.move_speed)?;
        positive("physics.player_half_extents.x", p.player_half_extents.x)?;
        positive("physics.player_half_extents.y", p.player_half_extents.y)?;

        let pl = &self.platforms;
        positive("platforms.width", pl.width)?;
        positive("platforms.height", pl.height)?;
        positive("platforms.moving_speed", pl.moving_speed)?;
        non_negative("platforms.disappear_duration", pl.disappear_duration)?;

        let g = &self.generation;
        positive("generation.min_gap", g.min_gap)?;
        positive("generation.max_gap", g.max_gap)?;
        if g.min_gap > g.max_gap {
            return Err(invalid(
                "generation.max_gap",
                format!("{} is below min_gap {}", g.max_gap, g.min_gap),
            ));
        }
        let apex = p.jump_apex();
        if !apex.is_finite() || g.max_gap > apex {
            return Err(invalid(
                "generation.max_gap",
                format!(
                    "{} exceeds jump apex {:.1}, platforms would be unreachable",
                    g.max_gap, apex
                ),
            ));
        }
        positive("generation.max_horizontal_reach", g.max_horizontal_reach)?;
        if !(0.0..=1.0).contains(&g.moving_chance) {
            return Err(invalid("generation.moving_chance", "must be within 0..=1"));
        }
        if !(0.0..=1.0).contains(&g.destructible_chance) {
            return Err(invalid("generation.destructible_chance", "must be within 0..=1"));
        }
        non_negative("generation.lookahead", g.lookahead)?;

        let s = &self.session;
        positive("session.score_per_unit", s.score_per_unit)?;
        non_negative("session.seed_platform_margin", s.seed_platform_margin)?;

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} must be finite and positive", value)))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} must be finite and not negative", value)))
    }
}
