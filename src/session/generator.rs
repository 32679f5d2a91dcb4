//! Procedural platform placement above the visible window.
//!
//! Width shrinks and breakable odds grow linearly with score until
//! `difficulty_span`, after which both stay at their final values.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::Tuning;
use crate::model::{BreakState, EntityId, Platform, PlatformKind, Spring};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Batch {
    pub platforms: Vec<Platform>,
    pub springs: Vec<Spring>,
    /// Top of the highest platform in the batch, or the input frontier when
    /// nothing was generated.
    pub frontier: f64,
}

#[derive(Clone, Debug)]
pub struct LevelGenerator {
    rng: SmallRng,
    next_id: u64,
}

impl LevelGenerator {
    pub fn new(seed: u64) -> Self {
        Self { rng: SmallRng::seed_from_u64(seed), next_id: 0 }
    }

    fn alloc(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }

    /// Full-width floor at the bottom of the window.
    pub fn floor(&mut self, tuning: &Tuning) -> Platform {
        Platform {
            id: self.alloc(),
            x: 0.0,
            y: tuning.screen_height - tuning.floor_height,
            width: tuning.screen_width,
            height: tuning.floor_height,
            kind: PlatformKind::Normal,
        }
    }

    /// Full-width platform carrying the king, one maximum gap above `frontier`.
    pub fn king_platform(&mut self, frontier: f64, tuning: &Tuning) -> Platform {
        Platform {
            id: self.alloc(),
            x: 0.0,
            y: frontier - tuning.gap_max,
            width: tuning.screen_width,
            height: tuning.king_platform_height,
            kind: PlatformKind::Normal,
        }
    }

    pub fn platform_width(&mut self, score: f64, tuning: &Tuning) -> f64 {
        let t = tuning.difficulty(score);
        let base = tuning.platform_base_width
            - (tuning.platform_base_width - tuning.platform_min_width) * t;
        let jitter = if tuning.width_jitter > 0.0 {
            self.rng.gen_range(-tuning.width_jitter..=tuning.width_jitter)
        } else {
            0.0
        };
        (base + jitter)
            .max(tuning.platform_min_width)
            .min(tuning.screen_width)
    }

    pub fn breakable_chance(score: f64, tuning: &Tuning) -> f64 {
        let t = tuning.difficulty(score);
        tuning.breakable_min_chance + (tuning.breakable_max_chance - tuning.breakable_min_chance) * t
    }

    /// Generates upward from `frontier` until it reaches `-generation_buffer`.
    pub fn extend_above(&mut self, frontier: f64, score: f64, tuning: &Tuning) -> Batch {
        let target = -tuning.generation_buffer;
        let mut batch = Batch { frontier, ..Default::default() };
        while batch.frontier > target {
            let gap = self.rng.gen_range(tuning.gap_min..=tuning.gap_max);
            let y = batch.frontier - gap;
            let width = self.platform_width(score, tuning);
            let x = self.rng.gen_range(0.0..=(tuning.screen_width - width).max(0.0));
            let breakable = self
                .rng
                .gen_bool(Self::breakable_chance(score, tuning).clamp(0.0, 1.0));
            let kind = if breakable {
                PlatformKind::Breakable(BreakState::Intact)
            } else {
                PlatformKind::Normal
            };
            let platform = Platform {
                id: self.alloc(),
                x,
                y,
                width,
                height: tuning.platform_height,
                kind,
            };
            if !breakable
                && score > tuning.spring_score_threshold
                && self.rng.gen_bool(tuning.spring_chance.clamp(0.0, 1.0))
            {
                let spring = self.spring_on(&platform, tuning);
                batch.springs.push(spring);
            }
            batch.platforms.push(platform);
            batch.frontier = y;
        }
        batch
    }

    /// Spring resting on `platform`, centred somewhere in its middle third.
    fn spring_on(&mut self, platform: &Platform, tuning: &Tuning) -> Spring {
        let third = platform.width / 3.0;
        let centre = self
            .rng
            .gen_range(platform.x + third..=platform.x + 2.0 * third);
        Spring {
            id: self.alloc(),
            platform: platform.id,
            x: centre - tuning.spring_width / 2.0,
            y: platform.y - tuning.spring_height,
            width: tuning.spring_width,
            height: tuning.spring_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_to_buffer_with_gaps_in_band() {
        let tuning = Tuning::default();
        let mut generator = LevelGenerator::new(7);
        let batch = generator.extend_above(tuning.screen_height, 0.0, &tuning);
        assert!(batch.frontier <= -tuning.generation_buffer);
        assert!(batch.frontier > -tuning.generation_buffer - tuning.gap_max);
        let mut prev = tuning.screen_height;
        for p in &batch.platforms {
            let gap = prev - p.y;
            assert!(gap >= tuning.gap_min && gap <= tuning.gap_max, "gap {gap}");
            assert!(p.x >= 0.0 && p.x + p.width <= tuning.screen_width);
            prev = p.y;
        }
        assert_eq!(batch.frontier, prev);
    }

    #[test]
    fn nothing_generated_when_frontier_is_already_high() {
        let tuning = Tuning::default();
        let mut generator = LevelGenerator::new(7);
        let batch = generator.extend_above(-500.0, 0.0, &tuning);
        assert!(batch.platforms.is_empty());
        assert_eq!(batch.frontier, -500.0);
    }

    #[test]
    fn width_shrinks_with_score_but_not_below_floor() {
        let tuning = Tuning::default();
        let mut generator = LevelGenerator::new(3);
        for _ in 0..200 {
            let easy = generator.platform_width(0.0, &tuning);
            assert!(easy >= 55.0 && easy <= 65.0, "easy {easy}");
            let hard = generator.platform_width(5000.0, &tuning);
            assert!(hard >= tuning.platform_min_width && hard <= 35.0, "hard {hard}");
        }
    }

    #[test]
    fn breakable_chance_ramps_between_bounds() {
        let tuning = Tuning::default();
        assert_eq!(LevelGenerator::breakable_chance(0.0, &tuning), 0.125);
        assert!((LevelGenerator::breakable_chance(1000.0, &tuning) - 0.1875).abs() < 1e-12);
        assert_eq!(LevelGenerator::breakable_chance(9000.0, &tuning), 0.25);
    }

    #[test]
    fn springs_only_after_threshold_and_on_normal_platforms() {
        let tuning = Tuning { spring_chance: 1.0, ..Tuning::default() };
        let mut generator = LevelGenerator::new(11);
        let early = generator.extend_above(tuning.screen_height, 0.0, &tuning);
        assert!(early.springs.is_empty());

        let late = generator.extend_above(tuning.screen_height, 600.0, &tuning);
        assert!(!late.springs.is_empty());
        for s in &late.springs {
            let p = late.platforms.iter().find(|p| p.id == s.platform).unwrap();
            assert_eq!(p.kind, PlatformKind::Normal);
            let centre = s.x + s.width / 2.0;
            assert!(centre >= p.x + p.width / 3.0 - 1e-9);
            assert!(centre <= p.x + 2.0 * p.width / 3.0 + 1e-9);
            assert!((s.y + s.height - p.y).abs() < 1e-9);
        }
        let normals = late.platforms.iter().filter(|p| p.kind == PlatformKind::Normal).count();
        assert_eq!(late.springs.len(), normals);
    }

    #[test]
    fn ids_follow_creation_order() {
        let tuning = Tuning::default();
        let mut generator = LevelGenerator::new(5);
        let floor = generator.floor(&tuning);
        let batch = generator.extend_above(floor.y, 0.0, &tuning);
        assert!(batch.platforms.iter().all(|p| p.id > floor.id));
        assert!(batch.platforms.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(floor.width, tuning.screen_width);
    }
}
