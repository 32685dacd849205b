//! Sky Hop - simulation core of an endless vertical platformer
//!
//! Core modules:
//! - `sim`: Simulation (player physics, platforms, level generation, session)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, input polling and windowing live outside this crate. The core
//! consumes a per-frame delta time, a held-key snapshot and the viewport size,
//! and exposes player/platform state for drawing.

pub mod sim;
pub mod tuning;

pub use tuning::{BoundsPolicy, LandingResponse, Tuning, TuningError};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = 1200.0;
    /// Vertical velocity applied on jump (negative is up)
    pub const JUMP_IMPULSE: f32 = -600.0;
    /// Horizontal speed while a direction is held (units/s)
    pub const MOVE_SPEED: f32 = 350.0;

    /// Player collision box (72 x 88, sprite is 4x scaled 18 x 22)
    pub const PLAYER_HALF_WIDTH: f32 = 36.0;
    pub const PLAYER_HALF_HEIGHT: f32 = 44.0;

    /// Platform defaults
    pub const PLATFORM_WIDTH: f32 = 96.0;
    pub const PLATFORM_HEIGHT: f32 = 16.0;
    pub const MOVING_PLATFORM_SPEED: f32 = 120.0;
    /// Seconds between first contact and a destructible platform vanishing
    pub const DISAPPEAR_DURATION: f32 = 0.5;

    /// Vertical spacing between consecutive platforms
    pub const MIN_PLATFORM_GAP: f32 = 60.0;
    pub const MAX_PLATFORM_GAP: f32 = 130.0;
    /// Maximum lateral distance between consecutive platform centers
    pub const MAX_HORIZONTAL_REACH: f32 = 180.0;
    /// Frontier is kept at least this far above the top of the window
    pub const GENERATION_LOOKAHEAD: f32 = 120.0;

    pub const MOVING_SCORE_THRESHOLD: u64 = 500;
    pub const MOVING_CHANCE: f64 = 0.15;
    pub const DESTRUCTIBLE_SCORE_THRESHOLD: u64 = 1000;
    pub const DESTRUCTIBLE_CHANCE: f64 = 0.1;

    /// Score awarded per world unit of height gained
    pub const SCORE_PER_UNIT: f32 = 1.0;
    /// Seed platform top sits this far above the bottom of the viewport
    pub const SEED_PLATFORM_MARGIN: f32 = 64.0;
    pub const DEFAULT_SEED: u64 = 0x5EED;

    /// Slack on the "was above" half of the landing sweep
    pub const LANDING_EPSILON: f32 = 0.5;

    pub const DEFAULT_VIEWPORT_WIDTH: u32 = 480;
    pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 800;
}

/// Visible window size in pixels. May change between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: consts::DEFAULT_VIEWPORT_WIDTH,
            height: consts::DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn width_f32(&self) -> f32 {
        self.width as f32
    }

    #[inline]
    pub fn height_f32(&self) -> f32 {
        self.height as f32
    }
}

/// Axis-aligned box, `pos` is the top-left corner, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Box centered on `center` with the given half extents
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            pos: center - half,
            size: half * 2.0,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    /// Open-interval overlap of the horizontal spans
    #[inline]
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        right > self.left() && left < self.right()
    }
}
