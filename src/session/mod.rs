//! Single play of one country: the per-frame climber loop.
//!
//! A `Session` owns every entity of one play and is dropped when the play
//! ends. The view drives it through the yew reducer, one `Tick` per animation
//! frame, and renders from [`Session::snapshot`].

pub mod collision;
pub mod entities;
pub mod generator;
pub mod physics;

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use yew::Reducible;

use crate::config::{LevelCatalog, LevelConfig, Tuning};
use crate::error::{GameError, Result};
use crate::model::{Facing, InputState, King, Monster, Platform, PlayerBody, Spring};
use collision::CollisionOutcome;
use entities::MonsterSpawner;
use generator::LevelGenerator;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the first directional input.
    Idle,
    Running,
    Won,
    Lost,
    /// Outcome reported, entities released.
    Terminated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Pending,
    Won,
    Lost,
}

/// Read-only view of one frame for the renderer.
#[derive(Clone, Copy, Debug)]
pub struct SessionSnapshot<'a> {
    pub phase: SessionPhase,
    pub country: &'a str,
    pub body: &'a PlayerBody,
    pub platforms: &'a [Platform],
    pub springs: &'a [Spring],
    pub monsters: &'a [Monster],
    pub king: Option<&'a King>,
    pub score: f64,
    pub level_length: f64,
    pub spring_boost: bool,
    pub backdrop_offset: f64,
    /// What the body landed on this tick.
    pub landing: CollisionOutcome,
}

impl SessionSnapshot<'_> {
    /// Climb progress toward the king, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        (self.score / self.level_length).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug)]
pub struct Session {
    tuning: Tuning,
    level: LevelConfig,
    phase: SessionPhase,
    outcome: Outcome,
    body: PlayerBody,
    platforms: Vec<Platform>,
    springs: Vec<Spring>,
    monsters: Vec<Monster>,
    king: Option<King>,
    score: f64,
    spring_boost: bool,
    /// Top of the highest generated platform.
    frontier: f64,
    generator: LevelGenerator,
    spawner: MonsterSpawner,
    backdrop_offset: f64,
    ticks: u64,
    last_collision: CollisionOutcome,
}

impl Session {
    /// Resolves the country through the catalog; a missing or incomplete
    /// entry is an error, never a default.
    pub fn start(catalog: &LevelCatalog, country: &str, tuning: Tuning, seed: u64) -> Result<Self> {
        let level = catalog.lookup(country)?;
        Self::new(level, tuning, seed)
    }

    pub fn new(level: LevelConfig, tuning: Tuning, seed: u64) -> Result<Self> {
        if !level.level_length.is_finite() || level.level_length <= 0.0 {
            return Err(GameError::ConfigurationMissing {
                country: level.country,
                reason: "level length must be positive".into(),
            });
        }
        if level.king_image.trim().is_empty() {
            return Err(GameError::ConfigurationMissing {
                country: level.country,
                reason: "king image not set".into(),
            });
        }
        tuning.validate()?;

        let mut generator = LevelGenerator::new(seed);
        let spawner = MonsterSpawner::new(seed.rotate_left(32) ^ 0x9e37_79b9_7f4a_7c15, &tuning);
        let floor = generator.floor(&tuning);
        let body = PlayerBody::new(
            tuning.screen_width / 2.0,
            floor.top() - 3.0 * tuning.player_half_height,
            &tuning,
        );
        let batch = generator.extend_above(floor.top(), 0.0, &tuning);
        let mut platforms = vec![floor];
        platforms.extend(batch.platforms);

        log::info!(
            "session for {} ready: length {}, {} platforms",
            level.country,
            level.level_length,
            platforms.len()
        );

        Ok(Self {
            tuning,
            level,
            phase: SessionPhase::Idle,
            outcome: Outcome::Pending,
            body,
            platforms,
            springs: batch.springs,
            monsters: Vec::new(),
            king: None,
            score: 0.0,
            spring_boost: false,
            frontier: batch.frontier,
            generator,
            spawner,
            backdrop_offset: 0.0,
            ticks: 0,
            last_collision: CollisionOutcome::None,
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            phase: self.phase,
            country: &self.level.country,
            body: &self.body,
            platforms: &self.platforms,
            springs: &self.springs,
            monsters: &self.monsters,
            king: self.king.as_ref(),
            score: self.score,
            level_length: self.level.level_length,
            spring_boost: self.spring_boost,
            backdrop_offset: self.backdrop_offset,
            landing: self.last_collision,
        }
    }

    /// Advances one frame. Idle sessions wait for a direction; terminal
    /// sessions ignore ticks.
    pub fn tick(&mut self, input: InputState) -> SessionPhase {
        let intent = input.intent();
        match self.phase {
            SessionPhase::Idle => {
                if intent.is_none() {
                    return self.phase;
                }
                self.phase = SessionPhase::Running;
                self.body.vy = self.tuning.jump_strength;
                log::info!("climb started in {}", self.level.country);
            }
            SessionPhase::Running => {}
            SessionPhase::Won | SessionPhase::Lost | SessionPhase::Terminated => {
                return self.phase;
            }
        }
        self.ticks += 1;
        self.step(intent);
        self.phase
    }

    // Order matters: integrate, resolve, move entities, terminal overlaps,
    // scroll, generate, then the fall check.
    fn step(&mut self, intent: Option<Facing>) {
        let tuning = &self.tuning;

        self.body.tick(tuning, intent);
        self.last_collision = collision::resolve(
            &mut self.body,
            &mut self.platforms,
            &mut self.springs,
            &mut self.spring_boost,
            tuning,
        );

        entities::advance_breakables(&mut self.platforms, &mut self.springs, tuning);
        entities::patrol(&mut self.monsters, tuning);

        if let Some(king) = self.king.as_mut() {
            if entities::king_reached(&self.body, king) {
                king.collected = true;
                self.finish(Outcome::Won);
                return;
            }
        }
        if !self.spring_boost {
            if let Some(i) = entities::monster_hit(&self.body, &self.monsters) {
                self.monsters.remove(i);
                self.finish(Outcome::Lost);
                return;
            }
        }

        self.scroll();
        self.populate();

        if self.body.bounds().bottom > self.tuning.screen_height {
            self.finish(Outcome::Lost);
        }
    }

    /// Pins the body at the vertical midpoint and moves the world down by
    /// the distance it rose past it. That distance is the only source of
    /// score.
    fn scroll(&mut self) {
        let mid = self.tuning.screen_height / 2.0;
        if self.body.y < mid {
            let offset = mid - self.body.y;
            self.body.y = mid;
            for p in &mut self.platforms {
                p.y += offset;
            }
            for s in &mut self.springs {
                s.y += offset;
            }
            for m in &mut self.monsters {
                m.y += offset;
            }
            if let Some(king) = self.king.as_mut() {
                king.y += offset;
            }
            self.frontier += offset;
            self.backdrop_offset = (self.backdrop_offset + offset * self.tuning.parallax_factor)
                .rem_euclid(self.tuning.screen_height);
            self.score += offset;
        }
        self.cull();
    }

    fn cull(&mut self) {
        let bottom = self.tuning.screen_height;
        self.platforms.retain(|p| p.top() <= bottom);
        let platforms = &self.platforms;
        self.springs
            .retain(|s| s.top() <= bottom && platforms.iter().any(|p| p.id == s.platform));
        self.monsters.retain(|m| m.bounds().top <= bottom);
    }

    /// King spawn, then platform generation and monster spawns until the
    /// king exists.
    fn populate(&mut self) {
        if self.king.is_none() && self.score >= self.level.level_length {
            let platform = self.generator.king_platform(self.frontier, &self.tuning);
            let king = entities::place_king(&platform, &self.level.king_image, &self.tuning);
            log::info!("king of {} appeared at score {:.0}", self.level.country, self.score);
            self.frontier = platform.top();
            self.platforms.push(platform);
            self.king = Some(king);
        }
        if self.king.is_some() {
            return;
        }

        let batch = self
            .generator
            .extend_above(self.frontier, self.score, &self.tuning);
        self.frontier = batch.frontier;
        self.platforms.extend(batch.platforms);
        self.springs.extend(batch.springs);

        if let Some(monster) =
            self.spawner
                .maybe_spawn(self.score, self.spring_boost, self.frontier, &self.tuning)
        {
            self.monsters.push(monster);
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = outcome;
        self.phase = match outcome {
            Outcome::Won => SessionPhase::Won,
            Outcome::Lost => SessionPhase::Lost,
            Outcome::Pending => return,
        };
        log::info!(
            "session for {} ended: {:?} at score {:.0} after {} ticks",
            self.level.country,
            outcome,
            self.score,
            self.ticks
        );
    }

    /// Releases every entity and reports the outcome. Only the first call
    /// after Won/Lost returns it.
    pub fn terminate(&mut self) -> Option<Outcome> {
        if !matches!(self.phase, SessionPhase::Won | SessionPhase::Lost) {
            return None;
        }
        self.platforms = Vec::new();
        self.springs = Vec::new();
        self.monsters = Vec::new();
        self.king = None;
        self.phase = SessionPhase::Terminated;
        Some(self.outcome)
    }
}

// ---------------- Reducer & Actions -----------------
#[derive(Clone, Copy, Debug)]
pub enum SessionAction {
    Tick(InputState),
    Terminate,
}

impl Reducible for Session {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            SessionAction::Tick(input) => {
                let idle_without_input =
                    self.phase == SessionPhase::Idle && input.intent().is_none();
                let terminal = !matches!(self.phase, SessionPhase::Idle | SessionPhase::Running);
                if idle_without_input || terminal {
                    return self;
                }
                let mut new = (*self).clone();
                new.tick(input);
                Rc::new(new)
            }
            SessionAction::Terminate => {
                if !matches!(self.phase, SessionPhase::Won | SessionPhase::Lost) {
                    return self;
                }
                let mut new = (*self).clone();
                new.terminate();
                Rc::new(new)
            }
        }
    }
}
