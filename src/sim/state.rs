//! Session state
//!
//! Owns the player, the platform collection and the generator, plus the
//! camera/score bookkeeping that ties them together.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::generator::LevelGenerator;
use super::platform::{Platform, PlatformId};
use super::player::Player;
use super::tick::TickInput;
use crate::tuning::{Tuning, TuningError};
use crate::{Rect, Viewport};

/// Things that happened during a tick, for audio/UI outside the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Landed { platform: PlatformId },
    Bounced { platform: PlatformId },
    Jumped,
    /// Destructible platform started its countdown
    PlatformHit { platform: PlatformId },
    PlatformVanished { platform: PlatformId },
    /// Player fell out of the window; carries the score of the life that ended
    SessionReset { score: u64 },
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Viewport used by the most recent tick
    pub viewport: Viewport,
    pub player: Player,
    /// Active platforms, in generation order (lowest first)
    pub platforms: Vec<Platform>,
    pub generator: LevelGenerator,
    /// Upward scroll; screen y = world y + camera_offset. Never decreases within a life.
    pub camera_offset: f32,
    pub score: u64,
    /// Best score across lives this session (in memory only)
    pub best_score: u64,
    /// Smallest player y reached this life
    pub highest_y: f32,
    /// Player y at the start of this life
    pub spawn_y: f32,
    /// Most recently generated (highest) platform
    pub frontier: PlatformId,
    pub time_ticks: u64,
    pub resets: u32,
    /// Raw input from the previous tick, for jump edge detection
    pub last_input: TickInput,
    events: Vec<GameEvent>,
    next_id: PlatformId,
}

impl GameState {
    /// Start a session: seed platform, player standing on it, frontier
    /// generated past the top of the window.
    pub fn new(tuning: Tuning, viewport: Viewport) -> Result<Self, TuningError> {
        tuning.validate()?;

        let half_extents = tuning.physics.player_half_extents;
        let generator = LevelGenerator::new(tuning.session.seed);
        let mut state = Self {
            tuning,
            viewport,
            player: Player::new(Vec2::ZERO, half_extents),
            platforms: Vec::new(),
            generator,
            camera_offset: 0.0,
            score: 0,
            best_score: 0,
            highest_y: 0.0,
            spawn_y: 0.0,
            frontier: 0,
            time_ticks: 0,
            resets: 0,
            last_input: TickInput::default(),
            events: Vec::new(),
            next_id: 1,
        };
        state.reset_world();
        Ok(state)
    }

    /// Allocate a new platform ID
    pub fn next_entity_id(&mut self) -> PlatformId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// World y to screen y
    #[inline]
    pub fn to_screen(&self, world_y: f32) -> f32 {
        world_y + self.camera_offset
    }

    /// World y of the bottom edge of the visible window
    #[inline]
    pub fn visible_bottom(&self) -> f32 {
        self.viewport.height_f32() - self.camera_offset
    }

    /// Platforms worth drawing: visible and at least partly on screen
    pub fn visible_platforms(&self) -> impl Iterator<Item = &Platform> + '_ {
        let top = -self.camera_offset;
        let bottom = self.visible_bottom();
        self.platforms
            .iter()
            .filter(move |p| p.is_visible() && p.rect.bottom() >= top && p.rect.top() <= bottom)
    }

    pub fn platform(&self, id: PlatformId) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    pub fn frontier_rect(&self) -> Option<Rect> {
        self.platform(self.frontier).map(|p| p.rect)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Follow upward progress and award score for new height
    pub fn update_camera(&mut self) {
        let target = -self.player.pos.y + self.viewport.height_f32() / 2.0;
        let camera_advanced = target > self.camera_offset;
        if camera_advanced {
            self.camera_offset = target;
        }

        if camera_advanced && self.player.pos.y < self.highest_y {
            self.highest_y = self.player.pos.y;
            let climbed = (self.spawn_y - self.highest_y).max(0.0);
            let score = (climbed * self.tuning.session.score_per_unit) as u64;
            self.score = self.score.max(score);
            self.best_score = self.best_score.max(self.score);
        }
    }

    /// Generate until the frontier sits `lookahead` above the top of the
    /// window. Returns how many platforms were added.
    pub fn fill_frontier(&mut self) -> usize {
        let lookahead = self.tuning.generation.lookahead;
        let width = self.viewport.width_f32();
        let mut added = 0;

        loop {
            let Some(frontier) = self.frontier_rect() else {
                log::warn!("Frontier platform {} missing, rebuilding level", self.frontier);
                self.reset_world();
                return added;
            };
            if self.to_screen(frontier.top()) <= -lookahead {
                return added;
            }

            let id = self.next_entity_id();
            let platform = self
                .generator
                .extend_frontier(id, &frontier, self.score, width, &self.tuning);
            self.platforms.push(platform);
            self.frontier = id;
            added += 1;
        }
    }

    /// Drop platforms whose top has scrolled below the window. Clears the
    /// player's support if it pointed at one of them.
    pub fn prune_platforms(&mut self) -> usize {
        let bottom = self.visible_bottom();
        let before = self.platforms.len();
        let player = &mut self.player;
        self.platforms.retain(|p| {
            let keep = p.rect.top() <= bottom;
            if !keep {
                player.forget_platform(p.id);
            }
            keep
        });
        let pruned = before - self.platforms.len();
        if pruned > 0 {
            log::debug!("Pruned {} platforms, {} active", pruned, self.platforms.len());
        }
        pruned
    }

    /// Whether the whole player has dropped below the window
    pub fn player_fell_out(&self) -> bool {
        self.to_screen(self.player.top()) > self.viewport.height_f32()
    }

    /// Fall-out transition: end the life and rebuild from a seed platform
    pub fn reset(&mut self) {
        log::info!(
            "Player fell at tick {}, score {} (best {})",
            self.time_ticks,
            self.score,
            self.best_score
        );
        self.push_event(GameEvent::SessionReset { score: self.score });
        self.resets += 1;
        self.reset_world();
    }

    fn reset_world(&mut self) {
        self.platforms.clear();
        self.camera_offset = 0.0;
        self.score = 0;

        let id = self.next_entity_id();
        let seed = self.generator.seed_platform(
            id,
            self.viewport.width_f32(),
            self.viewport.height_f32(),
            &self.tuning,
        );
        self.player.place_on(&seed);
        self.platforms.push(seed);
        self.frontier = id;

        self.spawn_y = self.player.pos.y;
        self.highest_y = self.player.pos.y;

        self.fill_frontier();
    }
}
