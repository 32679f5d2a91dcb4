//! World-map rules: which countries a profile may attack next.

use crate::config::{CountryEntry, LevelCatalog};
use crate::profile::PlayerProfile;

/// Result of clicking a country on the map.
#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    /// First pick of a fresh profile: the country is taken without a climb.
    ClaimStart(String),
    /// Start a climb; the session resolves the level itself.
    Play(String),
    AlreadyConquered,
    NotConquerable,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WorldMap {
    catalog: LevelCatalog,
}

impl WorldMap {
    pub fn new(catalog: LevelCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn countries(&self) -> &[CountryEntry] {
        &self.catalog.countries
    }

    /// A country is playable when it is free and borders the profile's
    /// territory. A profile with no territory may claim any country.
    pub fn is_conquerable(&self, profile: &PlayerProfile, name: &str) -> bool {
        if profile.has_conquered(name) {
            return false;
        }
        let Some(entry) = self.catalog.country(name) else {
            return false;
        };
        if profile.conquered.is_empty() {
            return true;
        }
        entry.neighbors.iter().any(|n| profile.has_conquered(n))
            || self
                .countries()
                .iter()
                .any(|c| profile.has_conquered(&c.name) && c.neighbors.iter().any(|n| n == name))
    }

    pub fn conquerable<'a>(&'a self, profile: &PlayerProfile) -> Vec<&'a str> {
        self.countries()
            .iter()
            .filter(|c| self.is_conquerable(profile, &c.name))
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn select(&self, profile: &PlayerProfile, name: &str) -> Selection {
        if profile.has_conquered(name) {
            Selection::AlreadyConquered
        } else if !self.is_conquerable(profile, name) {
            Selection::NotConquerable
        } else if profile.conquered.is_empty() {
            Selection::ClaimStart(name.to_string())
        } else {
            Selection::Play(name.to_string())
        }
    }

    /// Every catalog country conquered.
    pub fn is_complete(&self, profile: &PlayerProfile) -> bool {
        !self.countries().is_empty() && self.countries().iter().all(|c| profile.has_conquered(&c.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use crate::error::GameError;
    use crate::session::Session;

    const CATALOG: &str = r#"{"countries":[
        {"Country":"Spain","Level Length":2000,"King Image":"king_es.png","x":44,"y":38,"neighbors":["France","Portugal"]},
        {"Country":"Portugal","Level Length":1800,"King Image":"king_pt.png","x":40,"y":39,"neighbors":["Spain"]},
        {"Country":"France","King Image":"king_fr.png","x":48,"y":32,"neighbors":["Spain"]},
        {"Country":"Poland","Level Length":2500,"King Image":"king_pl.png","x":62,"y":26}
    ]}"#;

    fn map() -> WorldMap {
        WorldMap::new(LevelCatalog::from_json(CATALOG).unwrap())
    }

    fn profile(conquered: &[&str]) -> PlayerProfile {
        let mut p = PlayerProfile::new("ada");
        for c in conquered {
            p.conquer(c);
        }
        p
    }

    #[test]
    fn fresh_profile_claims_any_country() {
        let map = map();
        let p = profile(&[]);
        assert_eq!(map.conquerable(&p).len(), 4);
        assert_eq!(map.select(&p, "Poland"), Selection::ClaimStart("Poland".into()));
        assert_eq!(map.select(&p, "Atlantis"), Selection::NotConquerable);
    }

    #[test]
    fn only_neighbors_of_territory_are_playable() {
        let map = map();
        let p = profile(&["Portugal"]);
        assert_eq!(map.conquerable(&p), vec!["Spain"]);
        assert_eq!(map.select(&p, "Portugal"), Selection::AlreadyConquered);
        assert_eq!(map.select(&p, "Poland"), Selection::NotConquerable);
        assert_eq!(map.select(&p, "Spain"), Selection::Play("Spain".into()));
    }

    #[test]
    fn adjacency_counts_in_either_direction() {
        let mut cat = LevelCatalog::from_json(CATALOG).unwrap();
        cat.countries[1].neighbors.clear();
        let map = WorldMap::new(cat);
        // Spain lists Portugal, Portugal no longer lists Spain.
        assert!(map.is_conquerable(&profile(&["Spain"]), "Portugal"));
        assert!(map.is_conquerable(&profile(&["Portugal"]), "Spain"));
    }

    #[test]
    fn incomplete_level_fails_when_the_climb_starts() {
        let map = map();
        let p = profile(&["Spain"]);
        assert_eq!(map.select(&p, "France"), Selection::Play("France".into()));
        assert!(matches!(
            Session::start(map.catalog(), "France", Tuning::default(), 1),
            Err(GameError::ConfigurationMissing { .. })
        ));
        assert!(Session::start(map.catalog(), "Portugal", Tuning::default(), 1).is_ok());
    }

    #[test]
    fn completion_needs_every_country() {
        let map = map();
        assert!(!map.is_complete(&profile(&["Spain", "Portugal", "France"])));
        assert!(map.is_complete(&profile(&["Spain", "Portugal", "France", "Poland"])));
    }
}
