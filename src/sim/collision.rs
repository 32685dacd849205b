//! Landing detection
//!
//! A one-tick swept test on the player's bottom edge against platform tops.
//! The vertical sweep covers prev..current bottom, but the horizontal span
//! is only sampled at the end of the tick, so a fast diagonal fall can pass
//! a narrow platform without landing.

use super::platform::{Platform, PlatformId};
use crate::consts::LANDING_EPSILON;

/// Player's vertical sweep and horizontal span for one tick
#[derive(Debug, Clone, Copy)]
pub struct Sweep {
    /// Bottom edge at the start of the tick
    pub prev_bottom: f32,
    /// Bottom edge at the candidate position
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

/// A qualifying landing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    /// Index into the platform slice
    pub index: usize,
    pub platform: PlatformId,
    /// Y the player's bottom edge snaps to
    pub surface_y: f32,
}

/// True when the sweep crosses `top` from above
#[inline]
pub fn crosses_surface(sweep: &Sweep, top: f32) -> bool {
    let was_above = sweep.prev_bottom <= top + LANDING_EPSILON;
    let now_below = sweep.bottom >= top;
    was_above && now_below
}

/// Find the platform the player lands on this tick.
///
/// Only tested while falling or at rest (`vel_y >= 0`), so jumping up through
/// a platform never catches its underside. Platforms are checked in slice
/// order and the first match wins.
pub fn find_landing(sweep: &Sweep, vel_y: f32, platforms: &[Platform]) -> Option<Landing> {
    if vel_y < 0.0 {
        return None;
    }

    platforms
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_collidable())
        .find(|(_, p)| {
            crosses_surface(sweep, p.rect.top()) && p.rect.overlaps_x(sweep.left, sweep.right)
        })
        .map(|(index, p)| Landing {
            index,
            platform: p.id,
            surface_y: p.rect.top(),
        })
}

/// Ground-plane fallback: the bottom edge reached `floor_y`
#[inline]
pub fn reaches_floor(sweep: &Sweep, floor_y: f32) -> bool {
    sweep.bottom >= floor_y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;

    fn sweep(prev_bottom: f32, bottom: f32, left: f32) -> Sweep {
        Sweep {
            prev_bottom,
            bottom,
            left,
            right: left + 72.0,
        }
    }

    fn platform(id: PlatformId, x: f32, y: f32) -> Platform {
        Platform::new_static(id, Rect::new(x, y, 96.0, 16.0))
    }

    #[test]
    fn test_lands_when_crossing_top() {
        let platforms = vec![platform(1, 100.0, 500.0)];
        let landing = find_landing(&sweep(495.0, 505.0, 120.0), 300.0, &platforms).unwrap();
        assert_eq!(landing.platform, 1);
        assert_eq!(landing.index, 0);
        assert_eq!(landing.surface_y, 500.0);
    }

    #[test]
    fn test_no_landing_while_rising() {
        let platforms = vec![platform(1, 100.0, 500.0)];
        assert!(find_landing(&sweep(495.0, 505.0, 120.0), -10.0, &platforms).is_none());
    }

    #[test]
    fn test_no_landing_from_below() {
        // Already below the top at the start of the tick
        let platforms = vec![platform(1, 100.0, 500.0)];
        assert!(find_landing(&sweep(510.0, 520.0, 120.0), 300.0, &platforms).is_none());
    }

    #[test]
    fn test_no_landing_without_horizontal_overlap() {
        let platforms = vec![platform(1, 100.0, 500.0)];
        // Player span 0..72 vs platform 100..196
        assert!(find_landing(&sweep(495.0, 505.0, 0.0), 300.0, &platforms).is_none());
        // Touching edge only
        assert!(find_landing(&sweep(495.0, 505.0, 28.0), 300.0, &platforms).is_none());
    }

    #[test]
    fn test_resting_exactly_on_top_relands() {
        let platforms = vec![platform(1, 100.0, 500.0)];
        assert!(find_landing(&sweep(500.0, 500.0, 120.0), 0.0, &platforms).is_some());
    }

    #[test]
    fn test_first_in_order_wins() {
        // Both tops inside the sweep; the lower one comes first in the list
        let platforms = vec![platform(1, 100.0, 520.0), platform(2, 100.0, 505.0)];
        let landing = find_landing(&sweep(500.0, 530.0, 120.0), 300.0, &platforms).unwrap();
        assert_eq!(landing.platform, 1);
    }

    #[test]
    fn test_skips_vanished_platforms() {
        let mut gone = Platform::new_destructible(1, Rect::new(100.0, 500.0, 96.0, 16.0), 0.0);
        gone.notify_contact();
        gone.update(0.0, 480.0);
        assert!(!gone.is_collidable());
        let platforms = vec![gone, platform(2, 100.0, 510.0)];
        let landing = find_landing(&sweep(495.0, 515.0, 120.0), 300.0, &platforms).unwrap();
        assert_eq!(landing.platform, 2);
        assert_eq!(landing.index, 1);
    }

    #[test]
    fn test_large_vertical_step_still_lands() {
        // The sweep is the whole prev..current interval
        let platforms = vec![platform(1, 100.0, 500.0)];
        assert!(find_landing(&sweep(100.0, 900.0, 120.0), 5000.0, &platforms).is_some());
    }

    #[test]
    fn test_known_limitation_diagonal_tunneling() {
        // Horizontal span is only checked at the end position: a fast fall
        // that was over the platform mid-tick but ends beside it misses.
        let platforms = vec![platform(1, 100.0, 500.0)];
        assert!(find_landing(&sweep(400.0, 600.0, 300.0), 5000.0, &platforms).is_none());
    }

    #[test]
    fn test_floor() {
        assert!(reaches_floor(&sweep(790.0, 800.0, 0.0), 800.0));
        assert!(!reaches_floor(&sweep(780.0, 790.0, 0.0), 800.0));
    }
}
