//! Monsters, breakable fall animation and the king objective.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::Tuning;
use crate::model::{Facing, King, Monster, Platform, PlayerBody, Spring};

/// Score-gated monster spawn schedule.
#[derive(Clone, Debug)]
pub struct MonsterSpawner {
    rng: SmallRng,
    next_spawn_at: f64,
}

impl MonsterSpawner {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            next_spawn_at: tuning.monster_score_floor,
        }
    }

    #[cfg(test)]
    pub fn next_spawn_at(&self) -> f64 {
        self.next_spawn_at
    }

    /// Spawns one monster above `frontier` when the schedule allows it.
    pub fn maybe_spawn(
        &mut self,
        score: f64,
        spring_boost: bool,
        frontier: f64,
        tuning: &Tuning,
    ) -> Option<Monster> {
        if spring_boost {
            return None;
        }
        if score <= tuning.monster_score_floor || score < self.next_spawn_at {
            return None;
        }
        let half_w = tuning.monster_half_width;
        let half_h = tuning.monster_half_height;
        let x = self
            .rng
            .gen_range(half_w..=(tuning.screen_width - half_w).max(half_w));
        let speed = self
            .rng
            .gen_range(tuning.monster_speed_min..=tuning.monster_speed_max);
        let direction = if self.rng.gen_bool(0.5) { Facing::Left } else { Facing::Right };
        self.next_spawn_at = score
            + self
                .rng
                .gen_range(tuning.monster_spawn_jitter_min..=tuning.monster_spawn_jitter_max);
        log::debug!("monster spawned at score {:.0}, next at {:.0}", score, self.next_spawn_at);
        Some(Monster {
            x,
            y: frontier - 2.0 * half_h,
            speed,
            direction,
            half_width: half_w,
            half_height: half_h,
        })
    }
}

/// Horizontal patrol, turning around at the screen edges.
pub fn patrol(monsters: &mut [Monster], tuning: &Tuning) {
    for m in monsters.iter_mut() {
        m.x += m.direction.sign() * m.speed;
        if m.x - m.half_width <= 0.0 {
            m.x = m.half_width;
            m.direction = Facing::Right;
        } else if m.x + m.half_width >= tuning.screen_width {
            m.x = tuning.screen_width - m.half_width;
            m.direction = Facing::Left;
        }
    }
}

/// Activated breakables start falling; falling ones drift down and are
/// dropped, with their springs, once they leave the window.
pub fn advance_breakables(platforms: &mut Vec<Platform>, springs: &mut Vec<Spring>, tuning: &Tuning) {
    for p in platforms.iter_mut() {
        if p.is_falling() {
            p.y += tuning.fall_speed;
        } else {
            p.begin_fall();
        }
    }
    let before = platforms.len();
    platforms.retain(|p| !(p.is_falling() && p.top() > tuning.screen_height));
    if platforms.len() != before {
        springs.retain(|s| platforms.iter().any(|p| p.id == s.platform));
    }
}

/// Index of the first monster overlapping the body.
pub fn monster_hit(body: &PlayerBody, monsters: &[Monster]) -> Option<usize> {
    let b = body.bounds();
    monsters.iter().position(|m| m.bounds().overlaps(&b))
}

/// King centred on top of its platform.
pub fn place_king(platform: &Platform, image: &str, tuning: &Tuning) -> King {
    King {
        platform: platform.id,
        x: platform.x + platform.width / 2.0,
        y: platform.top() - tuning.king_half_height,
        half_width: tuning.king_half_width,
        half_height: tuning.king_half_height,
        image: image.to_string(),
        collected: false,
    }
}

pub fn king_reached(body: &PlayerBody, king: &King) -> bool {
    !king.collected && king.bounds().overlaps(&body.bounds())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BreakState, EntityId, PlatformKind};

    fn monster(x: f64, direction: Facing) -> Monster {
        Monster { x, y: 100.0, speed: 2.0, direction, half_width: 20.0, half_height: 20.0 }
    }

    #[test]
    fn spawn_is_gated_by_score_and_boost() {
        let tuning = Tuning::default();
        let mut spawner = MonsterSpawner::new(1, &tuning);
        assert!(spawner.maybe_spawn(900.0, false, -150.0, &tuning).is_none());
        assert!(spawner.maybe_spawn(1000.0, false, -150.0, &tuning).is_none());
        assert!(spawner.maybe_spawn(1200.0, true, -150.0, &tuning).is_none());

        let m = spawner.maybe_spawn(1200.0, false, -150.0, &tuning).unwrap();
        assert!(m.y < -150.0);
        assert!(m.x - m.half_width >= 0.0 && m.x + m.half_width <= tuning.screen_width);
        assert!(m.speed >= 1.0 && m.speed <= 3.0);

        let next = spawner.next_spawn_at();
        assert!(next >= 1700.0 && next <= 2200.0, "next {next}");
        assert!(spawner.maybe_spawn(next - 1.0, false, -150.0, &tuning).is_none());
        assert!(spawner.maybe_spawn(next, false, -150.0, &tuning).is_some());
    }

    #[test]
    fn patrol_reflects_at_edges() {
        let tuning = Tuning::default();
        let mut monsters = vec![monster(21.0, Facing::Left), monster(378.0, Facing::Right)];
        patrol(&mut monsters, &tuning);
        assert_eq!(monsters[0].direction, Facing::Right);
        assert_eq!(monsters[0].x, 20.0);
        assert_eq!(monsters[1].direction, Facing::Left);
        assert_eq!(monsters[1].x, 380.0);
        patrol(&mut monsters, &tuning);
        assert_eq!(monsters[0].x, 22.0);
        assert_eq!(monsters[1].x, 378.0);
    }

    #[test]
    fn activated_platform_falls_then_disappears_with_its_spring() {
        let tuning = Tuning::default();
        let mut platforms = vec![Platform {
            id: EntityId(4),
            x: 10.0,
            y: tuning.screen_height - 6.0,
            width: 50.0,
            height: 10.0,
            kind: PlatformKind::Breakable(BreakState::Activated),
        }];
        let mut springs = vec![Spring {
            id: EntityId(5),
            platform: EntityId(4),
            x: 20.0,
            y: 0.0,
            width: 20.0,
            height: 12.0,
        }];
        advance_breakables(&mut platforms, &mut springs, &tuning);
        assert!(platforms[0].is_falling());
        assert_eq!(platforms[0].y, tuning.screen_height - 6.0);
        advance_breakables(&mut platforms, &mut springs, &tuning);
        assert_eq!(platforms[0].y, tuning.screen_height - 2.0);
        advance_breakables(&mut platforms, &mut springs, &tuning);
        assert!(platforms.is_empty());
        assert!(springs.is_empty());
    }

    #[test]
    fn king_sits_on_its_platform_and_is_reached_by_overlap() {
        let tuning = Tuning::default();
        let platform = Platform {
            id: EntityId(9),
            x: 0.0,
            y: 100.0,
            width: tuning.screen_width,
            height: 20.0,
            kind: PlatformKind::Normal,
        };
        let king = place_king(&platform, "king.png", &tuning);
        assert_eq!(king.platform, EntityId(9));
        assert_eq!(king.y + king.half_height, 100.0);

        let mut body = PlayerBody::new(king.x, 300.0, &tuning);
        assert!(!king_reached(&body, &king));
        body.y = king.y + 10.0;
        assert!(king_reached(&body, &king));
    }

    #[test]
    fn monster_overlap_is_aabb() {
        let tuning = Tuning::default();
        let monsters = vec![monster(200.0, Facing::Left)];
        let mut body = PlayerBody::new(200.0 + 35.0, 100.0, &tuning);
        assert_eq!(monster_hit(&body, &monsters), None);
        body.x = 200.0 + 34.0;
        assert_eq!(monster_hit(&body, &monsters), Some(0));
    }
}
