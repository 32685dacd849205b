//! Platform entities and their per-kind behavior
//!
//! Each platform is a box plus a small state machine selected by a closed
//! tag. `Platform::update` dispatches on the tag once per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;

/// Stable identifier, never reused within a session
pub type PlatformId = u32;

/// Platform type tag (for rendering and generation policy)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformKind {
    Static,
    Moving,
    Destructible,
}

impl PlatformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKind::Static => "static",
            PlatformKind::Moving => "moving",
            PlatformKind::Destructible => "destructible",
        }
    }
}

/// Destructible lifecycle, one-way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestructiblePhase {
    Intact,
    /// Stepped on, counting down
    Hit,
    /// Gone: invisible and non-collidable until pruned
    Disappeared,
}

/// Kind-specific state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlatformBehavior {
    Static,
    Moving {
        speed: f32,
        /// +1.0 right, -1.0 left
        direction: f32,
        /// Fractional distance not yet applied to the whole-unit position
        remainder: f32,
        /// Horizontal distance actually moved by the last update
        last_step: f32,
    },
    Destructible {
        phase: DestructiblePhase,
        /// Time spent in `Hit`
        elapsed: f32,
        duration: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    pub rect: Rect,
    pub behavior: PlatformBehavior,
}

impl Platform {
    pub fn new_static(id: PlatformId, rect: Rect) -> Self {
        Self {
            id,
            rect,
            behavior: PlatformBehavior::Static,
        }
    }

    pub fn new_moving(id: PlatformId, rect: Rect, speed: f32, direction: f32) -> Self {
        Self {
            id,
            rect,
            behavior: PlatformBehavior::Moving {
                speed: speed.abs(),
                direction: if direction < 0.0 { -1.0 } else { 1.0 },
                remainder: 0.0,
                last_step: 0.0,
            },
        }
    }

    pub fn new_destructible(id: PlatformId, rect: Rect, duration: f32) -> Self {
        Self {
            id,
            rect,
            behavior: PlatformBehavior::Destructible {
                phase: DestructiblePhase::Intact,
                elapsed: 0.0,
                duration,
            },
        }
    }

    pub fn kind(&self) -> PlatformKind {
        match self.behavior {
            PlatformBehavior::Static => PlatformKind::Static,
            PlatformBehavior::Moving { .. } => PlatformKind::Moving,
            PlatformBehavior::Destructible { .. } => PlatformKind::Destructible,
        }
    }

    /// Current velocity (non-zero only for moving platforms)
    pub fn velocity(&self) -> Vec2 {
        match self.behavior {
            PlatformBehavior::Moving {
                speed, direction, ..
            } => Vec2::new(speed * direction, 0.0),
            _ => Vec2::ZERO,
        }
    }

    /// Distance moved by the last `update`, for carrying riders
    pub fn last_displacement(&self) -> Vec2 {
        match self.behavior {
            PlatformBehavior::Moving { last_step, .. } => Vec2::new(last_step, 0.0),
            _ => Vec2::ZERO,
        }
    }

    pub fn destructible_phase(&self) -> Option<DestructiblePhase> {
        match self.behavior {
            PlatformBehavior::Destructible { phase, .. } => Some(phase),
            _ => None,
        }
    }

    /// Whether the player can land on or stand on this platform
    pub fn is_collidable(&self) -> bool {
        self.destructible_phase() != Some(DestructiblePhase::Disappeared)
    }

    /// Whether the platform should be drawn
    pub fn is_visible(&self) -> bool {
        self.is_collidable()
    }

    /// Player landed on this platform.
    ///
    /// Starts the countdown on an intact destructible platform. Returns true
    /// only on that transition.
    pub fn notify_contact(&mut self) -> bool {
        if let PlatformBehavior::Destructible { phase, elapsed, .. } = &mut self.behavior {
            if *phase == DestructiblePhase::Intact {
                *phase = DestructiblePhase::Hit;
                *elapsed = 0.0;
                return true;
            }
        }
        false
    }

    /// Advance local state by `dt`. Returns true if the platform vanished
    /// during this update.
    pub fn update(&mut self, dt: f32, viewport_width: f32) -> bool {
        match &mut self.behavior {
            PlatformBehavior::Static => false,
            PlatformBehavior::Moving {
                speed,
                direction,
                remainder,
                last_step,
            } => {
                let max_x = (viewport_width - self.rect.size.x).max(0.0);

                *remainder += *speed * *direction * dt;
                let step = remainder.trunc();
                *remainder -= step;

                let mut x = self.rect.pos.x + step;
                if x <= 0.0 {
                    x = 0.0;
                    if *direction < 0.0 {
                        *direction = 1.0;
                        *remainder = 0.0;
                    }
                }
                if x >= max_x {
                    x = max_x;
                    if *direction > 0.0 {
                        *direction = -1.0;
                        *remainder = 0.0;
                    }
                }
                *last_step = x - self.rect.pos.x;
                self.rect.pos.x = x;
                false
            }
            PlatformBehavior::Destructible {
                phase,
                elapsed,
                duration,
            } => {
                if *phase != DestructiblePhase::Hit {
                    return false;
                }
                *elapsed += dt;
                if *elapsed >= *duration {
                    *phase = DestructiblePhase::Disappeared;
                    log::debug!("Platform {} vanished", self.id);
                    return true;
                }
                false
            }
        }
    }
}
