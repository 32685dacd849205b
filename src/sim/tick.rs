//! Variable timestep simulation tick
//!
//! One ordered pass per rendered frame: camera/score, platforms, player,
//! generation, pruning, fall-out.

use super::player::Controls;
use super::state::{GameEvent, GameState};
use crate::Viewport;

/// Raw held-key snapshot for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump key held (edge detection happens in the core)
    pub jump: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

impl TickInput {
    /// Controls for this tick given the previous tick's snapshot
    pub fn controls(&self, previous: &TickInput) -> Controls {
        Controls::new(self.left, self.right, self.jump && !previous.jump)
    }
}

/// Advance the session by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, viewport: Viewport, dt: f32) {
    let dt = if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        log::warn!("Ignoring invalid delta time {}", dt);
        0.0
    };

    if viewport.width == 0 || viewport.height == 0 {
        log::warn!(
            "Ignoring empty viewport {}x{}, keeping {}x{}",
            viewport.width,
            viewport.height,
            state.viewport.width,
            state.viewport.height
        );
    } else {
        state.viewport = viewport;
    }
    let viewport = state.viewport;

    let input = if input.idle_mode {
        autopilot(state)
    } else {
        *input
    };
    let controls = input.controls(&state.last_input);
    state.last_input = input;

    state.time_ticks += 1;

    state.update_camera();

    let width = viewport.width_f32();
    let mut vanished = Vec::new();
    for platform in &mut state.platforms {
        if platform.update(dt, width) {
            vanished.push(platform.id);
        }
    }
    for platform in vanished {
        state.push_event(GameEvent::PlatformVanished { platform });
    }

    let floor_y = state
        .tuning
        .session
        .viewport_floor
        .then(|| state.visible_bottom());
    let step = state.player.update(
        dt,
        &controls,
        &mut state.platforms,
        viewport,
        floor_y,
        &state.tuning.physics,
    );
    if let Some(platform) = step.platform_hit {
        state.push_event(GameEvent::PlatformHit { platform });
    }
    if let Some(platform) = step.landed {
        if step.bounced {
            state.push_event(GameEvent::Bounced { platform });
        } else {
            state.push_event(GameEvent::Landed { platform });
        }
    }
    if step.jumped {
        state.push_event(GameEvent::Jumped);
    }

    state.fill_frontier();
    state.prune_platforms();

    if state.player_fell_out() {
        state.reset();
    }
}

/// Demo controller: aim for the highest platform under the predicted apex
/// of the current (or next) jump, jump whenever grounded.
fn autopilot(state: &GameState) -> TickInput {
    let player = &state.player;
    let physics = &state.tuning.physics;
    let feet = player.bottom();

    // Discrete integration peaks a few units below the analytic apex
    let apex_feet = if player.grounded {
        feet - physics.jump_apex() + 12.0
    } else if player.vel.y < 0.0 {
        feet - player.vel.y * player.vel.y / (2.0 * physics.gravity) + 12.0
    } else {
        feet
    };

    let target = state
        .platforms
        .iter()
        .filter(|p| p.is_collidable() && p.rect.top() >= apex_feet)
        .min_by(|a, b| a.rect.top().total_cmp(&b.rect.top()));

    let mut input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    if let Some(platform) = target {
        let dx = platform.rect.center_x() - player.pos.x;
        let dead_zone = platform.rect.size.x / 4.0;
        input.left = dx < -dead_zone;
        input.right = dx > dead_zone;
    }
    // Release and re-press so every grounded tick yields a fresh edge
    input.jump = player.grounded && !state.last_input.jump;
    input
}
