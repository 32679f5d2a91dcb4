//! Core data models for Country Climber.
//! Pure collision/physics data; the canvas renderer only ever reads these.

use serde::{Deserialize, Serialize};

use crate::config::Tuning;

/// Creation-ordered identifier for platforms and springs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f64 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// The two directional signals, sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
}

impl InputState {
    /// Holding both directions cancels out.
    pub fn intent(self) -> Option<Facing> {
        match (self.left, self.right) {
            (true, false) => Some(Facing::Left),
            (false, true) => Some(Facing::Right),
            _ => None,
        }
    }
}

/// Axis-aligned box, y grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn centered(x: f64, y: f64, half_w: f64, half_h: f64) -> Self {
        Self { left: x - half_w, top: y - half_h, right: x + half_w, bottom: y + half_h }
    }

    /// Touching edges do not count as overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Centre position.
    pub x: f64,
    pub y: f64,
    pub vy: f64,
    pub facing: Facing,
    pub half_width: f64,
    pub half_height: f64,
}

impl PlayerBody {
    pub fn new(x: f64, y: f64, tuning: &Tuning) -> Self {
        Self {
            x,
            y,
            vy: 0.0,
            facing: Facing::Right,
            half_width: tuning.player_half_width,
            half_height: tuning.player_half_height,
        }
    }

    pub fn width(&self) -> f64 {
        self.half_width * 2.0
    }

    pub fn height(&self) -> f64 {
        self.half_height * 2.0
    }

    /// Line used for landings: one third of the height below the centre.
    pub fn feet(&self) -> f64 {
        self.y + self.height() / 3.0
    }

    /// Horizontal span of the central third of the sprite.
    pub fn core_span(&self) -> (f64, f64) {
        let inset = self.width() / 3.0;
        (self.x - self.half_width + inset, self.x + self.half_width - inset)
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.x, self.y, self.half_width, self.half_height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakState {
    Intact,
    Activated,
    Falling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    Normal,
    Breakable(BreakState),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: EntityId,
    /// Top-left corner; `y` is the landing surface.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn span(&self) -> (f64, f64) {
        (self.x, self.x + self.width)
    }

    /// Intact breakables and every normal platform accept landings.
    pub fn is_solid(&self) -> bool {
        matches!(
            self.kind,
            PlatformKind::Normal | PlatformKind::Breakable(BreakState::Intact)
        )
    }

    /// Intact -> Activated. Returns false for anything else.
    pub fn activate(&mut self) -> bool {
        if self.kind == PlatformKind::Breakable(BreakState::Intact) {
            self.kind = PlatformKind::Breakable(BreakState::Activated);
            true
        } else {
            false
        }
    }

    /// Activated -> Falling. Returns false for anything else.
    pub fn begin_fall(&mut self) -> bool {
        if self.kind == PlatformKind::Breakable(BreakState::Activated) {
            self.kind = PlatformKind::Breakable(BreakState::Falling);
            true
        } else {
            false
        }
    }

    pub fn is_falling(&self) -> bool {
        self.kind == PlatformKind::Breakable(BreakState::Falling)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub id: EntityId,
    /// Platform the spring rests on; the spring never outlives it.
    pub platform: EntityId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Spring {
    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn span(&self) -> (f64, f64) {
        (self.x, self.x + self.width)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub direction: Facing,
    pub half_width: f64,
    pub half_height: f64,
}

impl Monster {
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.x, self.y, self.half_width, self.half_height)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct King {
    pub platform: EntityId,
    pub x: f64,
    pub y: f64,
    pub half_width: f64,
    pub half_height: f64,
    pub image: String,
    pub collected: bool,
}

impl King {
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.x, self.y, self.half_width, self.half_height)
    }
}
