//! One-way landing resolution.
//!
//! A landing needs four things at once: the body's central third overlaps the
//! target horizontally, the feet line is below the target's top, last tick's
//! feet line (`feet - vy`) was at or above it, and the body is descending.
//! Springs are tried before platforms and the first match in creation order
//! wins, so a tick registers at most one landing.

use crate::config::Tuning;
use crate::model::{EntityId, Platform, PlatformKind, PlayerBody, Spring};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionOutcome {
    None,
    Spring(EntityId),
    Platform(EntityId),
    /// An intact breakable was hit and is now activated.
    Breakable(EntityId),
}

fn lands_on(body: &PlayerBody, top: f64, span: (f64, f64)) -> bool {
    if body.vy <= 0.0 {
        return false;
    }
    let (core_l, core_r) = body.core_span();
    let (left, right) = span;
    let feet = body.feet();
    core_r > left && core_l < right && feet > top && feet - body.vy <= top
}

pub fn resolve(
    body: &mut PlayerBody,
    platforms: &mut [Platform],
    springs: &mut Vec<Spring>,
    spring_boost: &mut bool,
    tuning: &Tuning,
) -> CollisionOutcome {
    if body.vy <= 0.0 {
        return CollisionOutcome::None;
    }

    if let Some(s) = springs.iter().find(|s| lands_on(body, s.top(), s.span())) {
        body.vy = tuning.spring_strength;
        *spring_boost = true;
        return CollisionOutcome::Spring(s.id);
    }

    let Some(p) = platforms
        .iter_mut()
        .find(|p| p.is_solid() && lands_on(body, p.top(), p.span()))
    else {
        return CollisionOutcome::None;
    };

    body.vy = tuning.jump_strength;
    *spring_boost = false;
    match p.kind {
        PlatformKind::Normal => CollisionOutcome::Platform(p.id),
        PlatformKind::Breakable(_) => {
            p.activate();
            let id = p.id;
            springs.retain(|s| s.platform != id);
            CollisionOutcome::Breakable(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BreakState;

    fn platform(id: u64, x: f64, y: f64, width: f64, kind: PlatformKind) -> Platform {
        Platform { id: EntityId(id), x, y, width, height: 10.0, kind }
    }

    fn spring_on(id: u64, p: &Platform) -> Spring {
        Spring {
            id: EntityId(id),
            platform: p.id,
            x: p.x + p.width / 2.0 - 10.0,
            y: p.y - 12.0,
            width: 20.0,
            height: 12.0,
        }
    }

    /// A body whose feet moved from `top - 2` to `top + 3` this tick.
    fn falling_onto(top: f64, x: f64) -> PlayerBody {
        let tuning = Tuning::default();
        let mut body = PlayerBody::new(x, 0.0, &tuning);
        body.vy = 5.0;
        body.y = top + 3.0 - body.height() / 3.0;
        body
    }

    #[test]
    fn lands_only_when_crossing_from_above() {
        let tuning = Tuning::default();
        let mut platforms = vec![platform(1, 80.0, 300.0, 60.0, PlatformKind::Normal)];
        let mut springs = Vec::new();
        let mut boost = true;

        let mut body = falling_onto(300.0, 110.0);
        let out = resolve(&mut body, &mut platforms, &mut springs, &mut boost, &tuning);
        assert_eq!(out, CollisionOutcome::Platform(EntityId(1)));
        assert_eq!(body.vy, tuning.jump_strength);
        assert!(!boost, "platform landing disarms spring boost");

        // Feet already below the top last tick: passing up through or
        // sinking beside it is not a landing.
        let mut body = falling_onto(300.0, 110.0);
        body.y += 20.0;
        let out = resolve(&mut body, &mut platforms, &mut springs, &mut boost, &tuning);
        assert_eq!(out, CollisionOutcome::None);
        assert_eq!(body.vy, 5.0);
    }

    #[test]
    fn rising_body_passes_through() {
        let tuning = Tuning::default();
        let mut platforms = vec![platform(1, 80.0, 300.0, 60.0, PlatformKind::Normal)];
        let mut body = falling_onto(300.0, 110.0);
        body.vy = -5.0;
        let out = resolve(&mut body, &mut platforms, &mut Vec::new(), &mut false, &tuning);
        assert_eq!(out, CollisionOutcome::None);
        assert_eq!(body.vy, -5.0);
    }

    #[test]
    fn only_the_central_third_counts() {
        let tuning = Tuning::default();
        let mut platforms = vec![platform(1, 80.0, 300.0, 60.0, PlatformKind::Normal)];
        // Core span is x±5; platform spans 80..140. Sprite overlaps, core does not.
        let mut body = falling_onto(300.0, 72.0);
        let out = resolve(&mut body, &mut platforms, &mut Vec::new(), &mut false, &tuning);
        assert_eq!(out, CollisionOutcome::None);

        let mut body = falling_onto(300.0, 76.0);
        let out = resolve(&mut body, &mut platforms, &mut Vec::new(), &mut false, &tuning);
        assert_eq!(out, CollisionOutcome::Platform(EntityId(1)));
    }

    #[test]
    fn overlapping_platforms_register_one_landing() {
        let tuning = Tuning::default();
        let mut platforms = vec![
            platform(1, 80.0, 300.0, 60.0, PlatformKind::Normal),
            platform(2, 90.0, 301.0, 60.0, PlatformKind::Breakable(BreakState::Intact)),
        ];
        let mut body = falling_onto(300.0, 110.0);
        let out = resolve(&mut body, &mut platforms, &mut Vec::new(), &mut false, &tuning);
        assert_eq!(out, CollisionOutcome::Platform(EntityId(1)));
        assert_eq!(platforms[1].kind, PlatformKind::Breakable(BreakState::Intact));
    }

    #[test]
    fn spring_beats_platform_in_same_tick() {
        let tuning = Tuning::default();
        let mut platforms = vec![platform(1, 80.0, 300.0, 60.0, PlatformKind::Normal)];
        // Spring top placed at the same height so both tests pass this tick.
        let mut s = spring_on(7, &platforms[0]);
        s.y = 300.0;
        let mut springs = vec![s];
        let mut boost = false;
        let mut body = falling_onto(300.0, 110.0);
        let out = resolve(&mut body, &mut platforms, &mut springs, &mut boost, &tuning);
        assert_eq!(out, CollisionOutcome::Spring(EntityId(7)));
        assert_eq!(body.vy, tuning.spring_strength);
        assert!(boost);
        assert!(tuning.spring_strength < tuning.jump_strength);
        assert_eq!(springs.len(), 1, "springs are reusable");
    }

    #[test]
    fn breakable_activates_once_and_drops_its_spring() {
        let tuning = Tuning::default();
        let mut platforms =
            vec![platform(3, 80.0, 300.0, 60.0, PlatformKind::Breakable(BreakState::Intact))];
        let mut springs = vec![spring_on(9, &platforms[0])];
        springs[0].y = 400.0; // out of reach, still mounted
        let mut body = falling_onto(300.0, 110.0);
        let out = resolve(&mut body, &mut platforms, &mut springs, &mut false, &tuning);
        assert_eq!(out, CollisionOutcome::Breakable(EntityId(3)));
        assert_eq!(body.vy, tuning.jump_strength);
        assert_eq!(platforms[0].kind, PlatformKind::Breakable(BreakState::Activated));
        assert!(springs.is_empty());

        let mut body = falling_onto(300.0, 110.0);
        let out = resolve(&mut body, &mut platforms, &mut springs, &mut false, &tuning);
        assert_eq!(out, CollisionOutcome::None);
        assert_eq!(body.vy, 5.0);
        assert_eq!(platforms[0].kind, PlatformKind::Breakable(BreakState::Activated));
    }
}
