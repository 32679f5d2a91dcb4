use crate::config::Tuning;
use crate::model::{Facing, PlayerBody};

impl PlayerBody {
    /// One integration step: gravity, vertical move, then a fixed
    /// horizontal step when an intent is held. Horizontal motion has no
    /// momentum.
    pub fn tick(&mut self, tuning: &Tuning, intent: Option<Facing>) {
        self.vy += tuning.gravity;
        self.y += self.vy;
        if let Some(dir) = intent {
            self.x += dir.sign() * tuning.horizontal_step;
            self.facing = dir;
        }
        self.wrap(tuning.screen_width);
    }

    /// Leaving one edge fully re-enters from the other.
    fn wrap(&mut self, screen_width: f64) {
        if self.x - self.half_width > screen_width {
            self.x = -self.half_width;
        } else if self.x + self.half_width < 0.0 {
            self.x = screen_width + self.half_width;
        }
    }
}
