//! Levelling curve over cumulative points

/// Points needed to reach each level; index 0 is level 1
pub const LEVEL_THRESHOLDS: [u64; 20] = [
    0, 50, 150, 300, 500, 800, 1200, 1700, 2300, 3000, 4000, 5000, 6500, 8000, 10000, 13000,
    16000, 20000, 25000, 30000,
];

/// Highest reachable level
pub const MAX_LEVEL: u32 = LEVEL_THRESHOLDS.len() as u32;

/// Where a point total sits on the curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelProgress {
    pub level: u32,
    /// Fraction of the way to the next level, 1.0 at the cap
    pub progress: f64,
    /// Points still needed for the next level
    pub remaining: u64,
    pub current: u64,
    /// Threshold of the next level, `None` at the cap
    pub next: Option<u64>,
}

/// Level for a point total, saturating at [`MAX_LEVEL`]
pub fn calc_level(points: u64) -> u32 {
    LEVEL_THRESHOLDS.iter().take_while(|&&t| points >= t).count() as u32
}

pub fn level_progress(points: u64) -> LevelProgress {
    let level = calc_level(points);
    let floor = LEVEL_THRESHOLDS[(level - 1) as usize];

    match LEVEL_THRESHOLDS.get(level as usize) {
        Some(&next) => LevelProgress {
            level,
            progress: ((points - floor) as f64 / (next - floor) as f64).min(1.0),
            remaining: next - points,
            current: points,
            next: Some(next),
        },
        None => LevelProgress { level, progress: 1.0, remaining: 0, current: points, next: None },
    }
}

/// The new level when moving from `prev` to `new` points crosses a threshold
pub fn check_level_up(prev: u64, new: u64) -> Option<u32> {
    let (before, after) = (calc_level(prev), calc_level(new));
    (after > before).then_some(after)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn thresholds_map_to_levels() {
        assert_eq!(calc_level(0), 1);
        assert_eq!(calc_level(49), 1);
        assert_eq!(calc_level(50), 2);
        assert_eq!(calc_level(2999), 9);
        assert_eq!(calc_level(3000), 10);
        assert_eq!(calc_level(30000), 20);
        assert_eq!(calc_level(1_000_000), 20);
    }

    #[test]
    fn progress_within_level() {
        let p = level_progress(100);
        assert_eq!(p.level, 2);
        assert_eq!(p.next, Some(150));
        assert_eq!(p.remaining, 50);
        assert!((p.progress - 0.5).abs() < 1e-9);
    }

    #[test]
    fn progress_at_cap() {
        let p = level_progress(45_000);
        assert_eq!(p.level, MAX_LEVEL);
        assert_eq!(p.next, None);
        assert_eq!(p.remaining, 0);
        assert_eq!(p.progress, 1.0);
    }

    #[test]
    fn level_up_only_on_increase() {
        assert_eq!(check_level_up(40, 60), Some(2));
        assert_eq!(check_level_up(40, 400), Some(4));
        assert_eq!(check_level_up(60, 70), None);
        assert_eq!(check_level_up(400, 40), None);
        assert_eq!(check_level_up(30000, 40000), None);
    }

    proptest! {
        #[test]
        fn level_is_monotonic(a in 0u64..50_000, b in 0u64..50_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(calc_level(lo) <= calc_level(hi));
            prop_assert!((1..=MAX_LEVEL).contains(&calc_level(hi)));
        }

        #[test]
        fn progress_fraction_in_range(points in 0u64..50_000) {
            let p = level_progress(points);
            prop_assert!((0.0..=1.0).contains(&p.progress));
            if let Some(next) = p.next {
                prop_assert_eq!(p.remaining, next - points);
            }
        }
    }
}
