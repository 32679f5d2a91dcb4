//! Tunable constants and the level catalog.
//!
//! `Tuning` carries every physics and generation constant used by a session.
//! Defaults are the canonical values; a partial JSON override may be stored
//! under [`TUNING_KEY`] in local storage for playtesting.
//! The level catalog is embedded at build time and resolved per country.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::util::local_storage;

pub const TUNING_KEY: &str = "cc_tuning";

const EMBEDDED_LEVELS: &str = include_str!("../assets/levels.json");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub screen_width: f64,
    pub screen_height: f64,

    pub gravity: f64,
    /// Velocity applied on a platform landing (negative is upward).
    pub jump_strength: f64,
    /// Velocity applied on a spring landing.
    pub spring_strength: f64,
    pub horizontal_step: f64,
    pub player_half_width: f64,
    pub player_half_height: f64,

    pub floor_height: f64,
    pub platform_height: f64,
    pub gap_min: f64,
    pub gap_max: f64,
    pub platform_base_width: f64,
    pub platform_min_width: f64,
    pub width_jitter: f64,
    /// Score over which width and breakable odds ramp to their final values.
    pub difficulty_span: f64,
    pub breakable_min_chance: f64,
    pub breakable_max_chance: f64,
    pub spring_score_threshold: f64,
    pub spring_chance: f64,
    pub spring_width: f64,
    pub spring_height: f64,
    /// Generation keeps the frontier at least this far above the window top.
    pub generation_buffer: f64,
    pub fall_speed: f64,

    pub monster_score_floor: f64,
    pub monster_spawn_jitter_min: f64,
    pub monster_spawn_jitter_max: f64,
    pub monster_half_width: f64,
    pub monster_half_height: f64,
    pub monster_speed_min: f64,
    pub monster_speed_max: f64,

    pub king_half_width: f64,
    pub king_half_height: f64,
    pub king_platform_height: f64,

    pub parallax_factor: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: 400.0,
            screen_height: 600.0,
            gravity: 0.5,
            jump_strength: -13.5,
            spring_strength: -25.0,
            horizontal_step: 5.0,
            player_half_width: 15.0,
            player_half_height: 15.0,
            floor_height: 30.0,
            platform_height: 10.0,
            gap_min: 70.0,
            gap_max: 120.0,
            platform_base_width: 60.0,
            platform_min_width: 30.0,
            width_jitter: 5.0,
            difficulty_span: 2000.0,
            breakable_min_chance: 1.0 / 8.0,
            breakable_max_chance: 1.0 / 4.0,
            spring_score_threshold: 500.0,
            spring_chance: 0.1,
            spring_width: 20.0,
            spring_height: 12.0,
            generation_buffer: 120.0,
            fall_speed: 4.0,
            monster_score_floor: 1000.0,
            monster_spawn_jitter_min: 500.0,
            monster_spawn_jitter_max: 1000.0,
            monster_half_width: 20.0,
            monster_half_height: 20.0,
            monster_speed_min: 1.0,
            monster_speed_max: 3.0,
            king_half_width: 25.0,
            king_half_height: 30.0,
            king_platform_height: 20.0,
            parallax_factor: 0.5,
        }
    }
}

impl Tuning {
    pub fn from_json(raw: &str) -> Result<Self> {
        let tuning: Self = serde_json::from_str(raw)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Rejects values the generator and spawner cannot sample from. A gap
    /// band must be positive or generation never reaches its target.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(GameError::InvalidTuning(msg.to_string()));
        if !(self.screen_width > 0.0 && self.screen_height > 0.0) {
            return invalid("screen size must be positive");
        }
        if !(self.gap_min > 0.0) {
            return invalid("gap_min must be positive");
        }
        if self.gap_min > self.gap_max {
            return invalid("gap_min exceeds gap_max");
        }
        if !(self.platform_min_width > 0.0 && self.platform_base_width > 0.0) {
            return invalid("platform widths must be positive");
        }
        if self.platform_min_width > self.platform_base_width {
            return invalid("platform_min_width exceeds platform_base_width");
        }
        if self.monster_speed_min > self.monster_speed_max {
            return invalid("monster_speed_min exceeds monster_speed_max");
        }
        if self.monster_spawn_jitter_min > self.monster_spawn_jitter_max {
            return invalid("monster_spawn_jitter_min exceeds monster_spawn_jitter_max");
        }
        Ok(())
    }

    /// Defaults overlaid with the stored override, if any.
    pub fn load() -> Self {
        let Some(store) = local_storage() else {
            return Self::default();
        };
        match store.get_item(TUNING_KEY) {
            Ok(Some(raw)) => match Self::from_json(&raw) {
                Ok(t) => {
                    log::info!("using tuning override from {}", TUNING_KEY);
                    t
                }
                Err(e) => {
                    log::warn!("ignoring invalid tuning override: {}", e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    /// Fraction of the difficulty ramp reached at `score`, in `[0, 1]`.
    pub fn difficulty(&self, score: f64) -> f64 {
        if self.difficulty_span <= 0.0 {
            return 1.0;
        }
        (score / self.difficulty_span).clamp(0.0, 1.0)
    }
}

/// Immutable per-session level parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub country: String,
    pub level_length: f64,
    pub king_image: String,
}

/// One catalog row. Length and image stay optional here so a missing value
/// surfaces as `ConfigurationMissing` at lookup instead of a parse failure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CountryEntry {
    #[serde(rename = "Country")]
    pub name: String,
    #[serde(rename = "Level Length", default)]
    pub level_length: Option<f64>,
    #[serde(rename = "King Image", default)]
    pub king_image: Option<String>,
    /// Label position on the map, in percent of the map size.
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub neighbors: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelCatalog {
    pub countries: Vec<CountryEntry>,
}

impl LevelCatalog {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_LEVELS)
    }

    pub fn country(&self, name: &str) -> Option<&CountryEntry> {
        self.countries.iter().find(|c| c.name == name)
    }

    pub fn lookup(&self, country: &str) -> Result<LevelConfig> {
        let missing = |reason: &str| GameError::ConfigurationMissing {
            country: country.to_string(),
            reason: reason.to_string(),
        };
        let entry = self
            .country(country)
            .ok_or_else(|| missing("country not in catalog"))?;
        let level_length = entry
            .level_length
            .ok_or_else(|| missing("level length not set"))?;
        if !level_length.is_finite() || level_length <= 0.0 {
            return Err(missing("level length must be positive"));
        }
        let king_image = entry
            .king_image
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| missing("king image not set"))?;
        Ok(LevelConfig {
            country: entry.name.clone(),
            level_length,
            king_image: king_image.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{"countries":[
        {"Country":"France","Level Length":3000,"King Image":"king_fr.png","x":48,"y":32,"neighbors":["Spain"]},
        {"Country":"Spain","King Image":"king_es.png","x":44,"y":38},
        {"Country":"Italy","Level Length":-5,"King Image":"king_it.png","x":52,"y":38},
        {"Country":"Portugal","Level Length":1500,"King Image":"  ","x":40,"y":39}
    ]}"#;

    fn catalog() -> LevelCatalog {
        LevelCatalog::from_json(CATALOG).unwrap()
    }

    #[test]
    fn lookup_resolves_complete_entry() {
        let level = catalog().lookup("France").unwrap();
        assert_eq!(level.country, "France");
        assert_eq!(level.level_length, 3000.0);
        assert_eq!(level.king_image, "king_fr.png");
    }

    #[test]
    fn lookup_never_defaults_missing_fields() {
        let cat = catalog();
        for name in ["Atlantis", "Spain", "Italy", "Portugal"] {
            match cat.lookup(name) {
                Err(GameError::ConfigurationMissing { country, .. }) => assert_eq!(country, name),
                other => panic!("expected ConfigurationMissing for {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn embedded_catalog_is_complete() {
        let cat = LevelCatalog::embedded().unwrap();
        assert!(!cat.countries.is_empty());
        for c in &cat.countries {
            assert!(cat.lookup(&c.name).is_ok(), "{} has no usable level", c.name);
            for n in &c.neighbors {
                assert!(cat.country(n).is_some(), "{} lists unknown neighbor {}", c.name, n);
            }
        }
    }

    #[test]
    fn partial_tuning_override_keeps_defaults() {
        let t = Tuning::from_json(r#"{"spring_strength": -28.0}"#).unwrap();
        assert_eq!(t.spring_strength, -28.0);
        assert_eq!(t.jump_strength, Tuning::default().jump_strength);
    }

    #[test]
    fn unusable_tuning_override_is_rejected() {
        assert!(Tuning::default().validate().is_ok());
        for raw in [
            r#"{"gap_min": 150.0}"#,
            r#"{"gap_min": 0.0, "gap_max": 0.0}"#,
            r#"{"screen_width": 0.0}"#,
            r#"{"platform_min_width": 80.0}"#,
            r#"{"monster_speed_min": 5.0}"#,
            r#"{"monster_spawn_jitter_min": 2000.0}"#,
        ] {
            assert!(
                matches!(Tuning::from_json(raw), Err(GameError::InvalidTuning(_))),
                "accepted {raw}"
            );
        }
    }

    #[test]
    fn difficulty_ramps_and_saturates() {
        let t = Tuning::default();
        assert_eq!(t.difficulty(0.0), 0.0);
        assert_eq!(t.difficulty(1000.0), 0.5);
        assert_eq!(t.difficulty(10_000.0), 1.0);
    }
}
