//! Endless level generation
//!
//! Each new platform is placed above the current frontier (the highest
//! platform) within jump reach, so the sequence is always climbable.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::platform::{Platform, PlatformId, PlatformKind};
use crate::Rect;
use crate::tuning::{GenerationTuning, Tuning};

/// Seeded platform generator
#[derive(Debug, Clone)]
pub struct LevelGenerator {
    seed: u64,
    rng: Pcg32,
}

impl LevelGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Static platform centered horizontally near the bottom of the viewport
    pub fn seed_platform(
        &self,
        id: PlatformId,
        viewport_width: f32,
        viewport_height: f32,
        tuning: &Tuning,
    ) -> Platform {
        let w = tuning.platforms.width;
        let h = tuning.platforms.height;
        let top = viewport_height - tuning.session.seed_platform_margin;
        Platform::new_static(id, Rect::new(viewport_width / 2.0 - w / 2.0, top, w, h))
    }

    /// Place the next platform above `frontier`
    pub fn extend_frontier(
        &mut self,
        id: PlatformId,
        frontier: &Rect,
        score: u64,
        viewport_width: f32,
        tuning: &Tuning,
    ) -> Platform {
        let generation = &tuning.generation;
        let w = tuning.platforms.width;
        let h = tuning.platforms.height;

        let gap = self
            .rng
            .random_range(generation.min_gap..=generation.max_gap);
        let y = frontier.top() - gap;

        let (lo, hi) = placement_window(
            frontier.center_x(),
            viewport_width,
            w,
            generation.max_horizontal_reach,
        );
        let center = if hi > lo {
            self.rng.random_range(lo..hi)
        } else {
            lo
        };
        let rect = Rect::new(center - w / 2.0, y, w, h);

        let kind = self.choose_kind(score, generation);
        let platform = match kind {
            PlatformKind::Static => Platform::new_static(id, rect),
            PlatformKind::Moving => {
                let direction = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
                Platform::new_moving(id, rect, tuning.platforms.moving_speed, direction)
            }
            PlatformKind::Destructible => {
                Platform::new_destructible(id, rect, tuning.platforms.disappear_duration)
            }
        };

        log::debug!(
            "Generated {} platform {} at ({:.1}, {:.1}), score {}",
            kind.as_str(),
            id,
            rect.left(),
            rect.top(),
            score
        );

        platform
    }

    /// Score-gated kind roll. Moving is rolled first.
    fn choose_kind(&mut self, score: u64, generation: &GenerationTuning) -> PlatformKind {
        if score > generation.moving_score_threshold
            && self.rng.random_bool(generation.moving_chance.clamp(0.0, 1.0))
        {
            return PlatformKind::Moving;
        }
        if score > generation.destructible_score_threshold
            && self
                .rng
                .random_bool(generation.destructible_chance.clamp(0.0, 1.0))
        {
            return PlatformKind::Destructible;
        }
        PlatformKind::Static
    }
}

/// Range of allowed platform centers given the previous center.
///
/// Bounded by `reach` on both sides and by the viewport. When the two
/// bounds cross (viewport narrower than a platform, or the previous center
/// left far outside a shrunk viewport) a window around the viewport center
/// is used instead.
pub fn placement_window(
    prev_center: f32,
    viewport_width: f32,
    platform_width: f32,
    reach: f32,
) -> (f32, f32) {
    let half = platform_width / 2.0;
    let lo = (prev_center - reach).max(half);
    let hi = (prev_center + reach).min(viewport_width - half);
    if lo < hi {
        return (lo, hi);
    }

    let mid = viewport_width / 2.0;
    let span = (reach / 2.0)
        .min((viewport_width - platform_width) / 2.0)
        .max(0.0);
    log::warn!(
        "Placement window collapsed ({:.1} >= {:.1}), using centered window ±{:.1}",
        lo,
        hi,
        span
    );
    (mid - span, mid + span)
}
