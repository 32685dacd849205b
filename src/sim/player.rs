//! Player kinematics
//!
//! Arcade horizontal control (velocity assigned, not accelerated), Euler
//! gravity while airborne, and landing via the collision resolver.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Sweep, find_landing, reaches_floor};
use super::platform::{Platform, PlatformId};
use crate::tuning::{BoundsPolicy, LandingResponse, PhysicsTuning};
use crate::{Rect, Viewport};

/// Per-tick player intent, already edge-detected
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Controls {
    /// -1.0 left, 0.0 none (or both), +1.0 right
    pub axis: f32,
    /// Jump key went down this tick
    pub jump_pressed: bool,
}

impl Controls {
    pub fn new(left: bool, right: bool, jump_pressed: bool) -> Self {
        let axis = match (left, right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        Self { axis, jump_pressed }
    }
}

/// What happened to the player during one update
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerStep {
    /// Touched down on a platform it was not already standing on
    pub landed: Option<PlatformId>,
    /// The landing launched the player (bounce response)
    pub bounced: bool,
    pub jumped: bool,
    /// A destructible platform started its countdown
    pub platform_hit: Option<PlatformId>,
    /// Grounded on the viewport floor
    pub on_floor: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center of the collision box
    pub pos: Vec2,
    pub vel: Vec2,
    pub grounded: bool,
    /// Platform currently standing on (looked up by id, never owned)
    pub support: Option<PlatformId>,
    pub half_extents: Vec2,
}

impl Player {
    pub fn new(pos: Vec2, half_extents: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            grounded: false,
            support: None,
            half_extents,
        }
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::from_center(self.pos, self.half_extents)
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.half_extents.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.half_extents.y
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x - self.half_extents.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.half_extents.x
    }

    /// Stand the player on top of `platform` at rest
    pub fn place_on(&mut self, platform: &Platform) {
        self.pos = Vec2::new(
            platform.rect.center_x(),
            platform.rect.top() - self.half_extents.y,
        );
        self.vel = Vec2::ZERO;
        self.grounded = true;
        self.support = Some(platform.id);
    }

    /// Drop ground contact (support platform removed or unusable)
    pub fn release_support(&mut self) {
        self.grounded = false;
        self.support = None;
    }

    /// Clear the support reference if it points at `id`
    pub fn forget_platform(&mut self, id: PlatformId) {
        if self.support == Some(id) {
            self.release_support();
        }
    }

    /// Advance one tick.
    ///
    /// `floor_y` is the world-space ground plane, if any. Destructible
    /// platforms landed on are notified through `platforms`.
    pub fn update(
        &mut self,
        dt: f32,
        controls: &Controls,
        platforms: &mut [Platform],
        viewport: Viewport,
        floor_y: Option<f32>,
        physics: &PhysicsTuning,
    ) -> PlayerStep {
        let mut step = PlayerStep::default();
        let was_grounded = self.grounded;
        let prev_bottom = self.bottom();

        self.vel.x = controls.axis * physics.move_speed;

        if !self.grounded {
            self.vel.y += physics.gravity * dt;
        }

        // Ride a moving platform by the distance it actually moved this tick
        if self.grounded {
            if let Some(carrier) = self.find_support(platforms) {
                self.pos.x += carrier.last_displacement().x;
            }
        }

        self.pos += self.vel * dt;

        self.apply_horizontal_bounds(viewport.width_f32(), physics.horizontal_bounds);

        // Support vanished, was pruned, or we walked off its edge
        if self.support.is_some() {
            let (left, right) = (self.left(), self.right());
            let still_supported = self
                .find_support(platforms)
                .is_some_and(|p| p.is_collidable() && p.rect.overlaps_x(left, right));
            if !still_supported {
                self.release_support();
            }
        }

        let prev_support = self.support;
        self.grounded = false;
        self.support = None;

        let sweep = Sweep {
            prev_bottom,
            bottom: self.bottom(),
            left: self.left(),
            right: self.right(),
        };

        if let Some(landing) = find_landing(&sweep, self.vel.y, platforms) {
            self.pos.y = landing.surface_y - self.half_extents.y;

            if platforms[landing.index].notify_contact() {
                step.platform_hit = Some(landing.platform);
            }

            match physics.landing {
                LandingResponse::Snap => {
                    self.vel.y = 0.0;
                    self.grounded = true;
                    self.support = Some(landing.platform);
                    if !was_grounded || prev_support != Some(landing.platform) {
                        step.landed = Some(landing.platform);
                    }
                }
                LandingResponse::Bounce => {
                    self.vel.y = physics.jump_impulse;
                    step.landed = Some(landing.platform);
                    step.bounced = true;
                }
            }
        } else if let Some(floor_y) = floor_y {
            if reaches_floor(&sweep, floor_y) {
                self.pos.y = floor_y - self.half_extents.y;
                if self.vel.y > 0.0 {
                    self.vel.y = 0.0;
                }
                self.grounded = true;
                step.on_floor = true;
            }
        }

        if controls.jump_pressed && self.grounded {
            self.vel.y = physics.jump_impulse;
            self.grounded = false;
            self.support = None;
            step.jumped = true;
        }

        step
    }

    fn find_support<'a>(&self, platforms: &'a [Platform]) -> Option<&'a Platform> {
        let id = self.support?;
        platforms.iter().find(|p| p.id == id)
    }

    fn apply_horizontal_bounds(&mut self, width: f32, policy: BoundsPolicy) {
        let half_w = self.half_extents.x;
        match policy {
            BoundsPolicy::Wrap => {
                if self.pos.x < -half_w {
                    self.pos.x = width + half_w;
                } else if self.pos.x > width + half_w {
                    self.pos.x = -half_w;
                }
            }
            BoundsPolicy::Clamp => {
                let max_x = (width - half_w).max(half_w);
                if self.pos.x < half_w {
                    self.pos.x = half_w;
                    self.vel.x = 0.0;
                }
                if self.pos.x > max_x {
                    self.pos.x = max_x;
                    self.vel.x = 0.0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 0.016;

    fn view() -> Viewport {
        Viewport::new(480, 800)
    }

    fn physics() -> PhysicsTuning {
        PhysicsTuning::default()
    }

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(Vec2::new(x, y), Vec2::new(36.0, 44.0))
    }

    fn still() -> Controls {
        Controls::default()
    }

    #[test]
    fn test_controls_axis() {
        assert_eq!(Controls::new(true, false, false).axis, -1.0);
        assert_eq!(Controls::new(false, true, false).axis, 1.0);
        assert_eq!(Controls::new(true, true, false).axis, 0.0);
        assert_eq!(Controls::new(false, false, true).axis, 0.0);
    }

    #[test]
    fn test_rest_on_static_platform_is_stable() {
        let mut platforms = vec![Platform::new_static(1, Rect::new(192.0, 600.0, 96.0, 16.0))];
        let mut player = player_at(0.0, 0.0);
        player.place_on(&platforms[0]);
        let start = player.pos;

        for _ in 0..10 {
            let step = player.update(DT, &still(), &mut platforms, view(), None, &physics());
            assert!(step.landed.is_none());
        }

        assert!((player.pos - start).length() < 1e-4);
        assert_eq!(player.vel, Vec2::ZERO);
        assert!(player.grounded);
        assert_eq!(player.support, Some(1));
    }

    #[test]
    fn test_free_fall_one_second() {
        let mut player = player_at(240.0, -10_000.0);
        for _ in 0..60 {
            player.update(1.0 / 60.0, &still(), &mut [], view(), None, &physics());
        }
        assert!((player.vel.y - 1200.0).abs() < 0.1, "vel.y = {}", player.vel.y);
        assert!(!player.grounded);
    }

    #[test]
    fn test_horizontal_velocity_is_assigned() {
        let mut player = player_at(240.0, 0.0);
        let right = Controls::new(false, true, false);
        player.update(DT, &right, &mut [], view(), None, &physics());
        assert_eq!(player.vel.x, 350.0);
        player.update(DT, &right, &mut [], view(), None, &physics());
        assert_eq!(player.vel.x, 350.0);
        player.update(DT, &still(), &mut [], view(), None, &physics());
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_lands_and_snaps() {
        let mut platforms = vec![Platform::new_static(7, Rect::new(192.0, 600.0, 96.0, 16.0))];
        // Bottom at 550, falling at 600/s
        let mut player = player_at(240.0, 506.0);
        player.vel.y = 600.0;

        let mut landed = None;
        for _ in 0..20 {
            let step = player.update(DT, &still(), &mut platforms, view(), None, &physics());
            if step.landed.is_some() {
                landed = step.landed;
                break;
            }
        }

        assert_eq!(landed, Some(7));
        assert!(player.grounded);
        assert_eq!(player.vel.y, 0.0);
        assert_eq!(player.bottom(), 600.0);
    }

    #[test]
    fn test_jump_needs_ground_and_edge() {
        let mut platforms = vec![Platform::new_static(1, Rect::new(192.0, 600.0, 96.0, 16.0))];
        let mut player = player_at(0.0, 0.0);
        player.place_on(&platforms[0]);

        let jump = Controls::new(false, false, true);
        let step = player.update(DT, &jump, &mut platforms, view(), None, &physics());
        assert!(step.jumped);
        assert_eq!(player.vel.y, -600.0);
        assert!(!player.grounded);
        assert!(player.support.is_none());

        // Airborne: another press does nothing
        let step = player.update(DT, &jump, &mut platforms, view(), None, &physics());
        assert!(!step.jumped);
        assert!(player.vel.y > -600.0);
    }

    #[test]
    fn test_rising_passes_through_platform() {
        let mut platforms = vec![Platform::new_static(1, Rect::new(192.0, 500.0, 96.0, 16.0))];
        // Bottom just below the platform top, moving up fast
        let mut player = player_at(240.0, 460.0);
        player.vel.y = -600.0;
        player.update(DT, &still(), &mut platforms, view(), None, &physics());
        assert!(!player.grounded);
        assert!(player.vel.y < 0.0);
    }

    #[test]
    fn test_bounce_landing() {
        let mut physics = physics();
        physics.landing = LandingResponse::Bounce;
        let mut platforms = vec![Platform::new_static(3, Rect::new(192.0, 600.0, 96.0, 16.0))];
        let mut player = player_at(240.0, 552.0);
        player.vel.y = 300.0;

        let step = player.update(DT, &still(), &mut platforms, view(), None, &physics);
        assert_eq!(step.landed, Some(3));
        assert!(step.bounced);
        assert_eq!(player.vel.y, -600.0);
        assert!(!player.grounded);
        assert_eq!(player.bottom(), 600.0);
    }

    #[test]
    fn test_carried_by_moving_platform() {
        let mut platforms = vec![Platform::new_moving(
            1,
            Rect::new(100.0, 600.0, 96.0, 16.0),
            120.0,
            1.0,
        )];
        let mut player = player_at(0.0, 0.0);
        player.place_on(&platforms[0]);
        let x0 = player.pos.x;

        // 120 * 0.05 = 6 whole units
        platforms[0].update(0.05, 480.0);
        player.update(0.05, &still(), &mut platforms, view(), None, &physics());
        assert!((player.pos.x - (x0 + 6.0)).abs() < 1e-3);
        assert!(player.grounded);
    }

    #[test]
    fn test_rider_stays_locked_through_reflection() {
        // Starts 10 units from the right edge, reflects within a few ticks
        let mut platforms = vec![Platform::new_moving(
            1,
            Rect::new(374.0, 600.0, 96.0, 16.0),
            120.0,
            1.0,
        )];
        let mut player = player_at(0.0, 0.0);
        player.place_on(&platforms[0]);
        let offset = player.pos.x - platforms[0].rect.pos.x;

        for _ in 0..2000 {
            platforms[0].update(DT, 480.0);
            player.update(DT, &still(), &mut platforms, view(), None, &physics());
            assert!(player.grounded);
            assert!((player.pos.x - platforms[0].rect.pos.x - offset).abs() < 1e-3);
        }
    }

    #[test]
    fn test_walk_off_edge_falls() {
        let mut platforms = vec![Platform::new_static(1, Rect::new(192.0, 600.0, 96.0, 16.0))];
        let mut player = player_at(0.0, 0.0);
        player.place_on(&platforms[0]);

        let right = Controls::new(false, true, false);
        // 350 * 0.25 = 87.5: player left edge ends past the platform right edge
        player.update(0.25, &right, &mut platforms, view(), None, &physics());
        assert!(!player.grounded);
        assert!(player.support.is_none());

        player.update(DT, &still(), &mut platforms, view(), None, &physics());
        assert!(player.vel.y > 0.0);
    }

    #[test]
    fn test_vanished_support_drops_player() {
        let mut platforms = vec![Platform::new_destructible(
            1,
            Rect::new(192.0, 600.0, 96.0, 16.0),
            0.5,
        )];
        let mut player = player_at(240.0, 552.0);
        player.vel.y = 300.0;

        let step = player.update(DT, &still(), &mut platforms, view(), None, &physics());
        assert_eq!(step.platform_hit, Some(1));
        assert!(player.grounded);

        // Countdown runs out
        platforms[0].update(0.5, 480.0);
        assert!(!platforms[0].is_collidable());

        player.update(DT, &still(), &mut platforms, view(), None, &physics());
        assert!(!player.grounded);
        assert!(player.support.is_none());
    }

    #[test]
    fn test_dangling_support_is_released() {
        let platform = Platform::new_static(9, Rect::new(192.0, 600.0, 96.0, 16.0));
        let mut player = player_at(0.0, 0.0);
        player.place_on(&platform);

        // Platform no longer in the collection
        player.update(DT, &still(), &mut [], view(), None, &physics());
        assert!(!player.grounded);
        assert!(player.support.is_none());
    }

    #[test]
    fn test_wrap_left_to_right() {
        let mut player = player_at(-30.0, 0.0);
        let left = Controls::new(true, false, false);
        // Moves 350 * 0.1 = 35 left: -65 < -36
        player.update(0.1, &left, &mut [], view(), None, &physics());
        assert_eq!(player.pos.x, 480.0 + 36.0);
    }

    #[test]
    fn test_wrap_right_to_left() {
        let mut player = player_at(500.0, 0.0);
        let right = Controls::new(false, true, false);
        player.update(0.1, &right, &mut [], view(), None, &physics());
        assert_eq!(player.pos.x, -36.0);
    }

    #[test]
    fn test_clamp_policy() {
        let mut physics = physics();
        physics.horizontal_bounds = BoundsPolicy::Clamp;
        let mut player = player_at(40.0, 0.0);
        let left = Controls::new(true, false, false);
        player.update(0.1, &left, &mut [], view(), None, &physics);
        assert_eq!(player.pos.x, 36.0);
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_floor_fallback() {
        let mut player = player_at(240.0, 750.0);
        player.vel.y = 400.0;
        let step = player.update(DT, &still(), &mut [], view(), Some(800.0), &physics());
        assert!(step.on_floor);
        assert!(player.grounded);
        assert_eq!(player.bottom(), 800.0);
        assert_eq!(player.vel.y, 0.0);
        assert!(player.support.is_none());

        let jump = Controls::new(false, false, true);
        let step = player.update(DT, &jump, &mut [], view(), Some(800.0), &physics());
        assert!(step.jumped);
    }

    proptest! {
        #[test]
        fn prop_gravity_accumulates_additively(
            steps in prop::collection::vec(0.0f32..0.05, 1..120),
        ) {
            let mut player = player_at(240.0, -100_000.0);
            let mut expected = 0.0f32;
            for dt in steps {
                let before = player.vel.y;
                player.update(dt, &still(), &mut [], view(), None, &physics());
                prop_assert!((player.vel.y - (before + 1200.0 * dt)).abs() < 1e-3);
                expected += 1200.0 * dt;
            }
            prop_assert!((player.vel.y - expected).abs() < 1e-2);
        }
    }
}
