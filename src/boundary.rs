//! Hands a finished session back to the meta-game.
//!
//! The session only reports `Won` or `Lost`; applying that to the profile
//! and persisting it happens here, once per terminated session.

use crate::config::LevelConfig;
use crate::profile::{PlayerProfile, ProfileStore};
use crate::session::Outcome;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionReport {
    pub country: String,
    pub outcome: Outcome,
    /// The country was added to the profile by this report.
    pub newly_conquered: bool,
    /// False when the store rejected the write; the in-memory profile still
    /// carries the change.
    pub persisted: bool,
}

/// Saves the profile, logging instead of failing.
pub fn persist(store: &dyn ProfileStore, profile: &PlayerProfile) -> bool {
    match store.save(profile) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("could not save profile {}: {}", profile.username, e);
            false
        }
    }
}

/// Marks a fresh profile's starting country. `None` when the profile
/// already has territory, otherwise whether the claim was saved.
pub fn claim_start(
    store: &dyn ProfileStore,
    profile: &mut PlayerProfile,
    country: &str,
) -> Option<bool> {
    if !profile.conquered.is_empty() || !profile.conquer(country) {
        return None;
    }
    log::info!("{} starts from {}", profile.username, country);
    Some(persist(store, profile))
}

pub fn on_terminate(
    outcome: Outcome,
    level: &LevelConfig,
    profile: &mut PlayerProfile,
    store: &dyn ProfileStore,
) -> SessionReport {
    let mut report = SessionReport {
        country: level.country.clone(),
        outcome,
        newly_conquered: false,
        persisted: true,
    };
    match outcome {
        Outcome::Won => {
            if profile.conquer(&level.country) {
                report.newly_conquered = true;
                report.persisted = persist(store, profile);
                log::info!("{} conquered {}", profile.username, level.country);
            }
        }
        Outcome::Lost => {
            log::info!("{} failed to conquer {}", profile.username, level.country);
        }
        Outcome::Pending => {
            log::warn!("session for {} ended without an outcome", level.country);
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::MemoryProfileStore;

    fn level(country: &str) -> LevelConfig {
        LevelConfig { country: country.into(), level_length: 2000.0, king_image: "k.png".into() }
    }

    #[test]
    fn win_conquers_and_saves_once() {
        let store = MemoryProfileStore::new();
        let mut profile = PlayerProfile::new("ada");
        profile.conquer("Spain");

        let report = on_terminate(Outcome::Won, &level("France"), &mut profile, &store);
        assert!(report.newly_conquered && report.persisted);
        assert_eq!(store.saves(), 1);

        let again = on_terminate(Outcome::Won, &level("France"), &mut profile, &store);
        assert!(!again.newly_conquered);
        assert_eq!(store.saves(), 1);
        assert_eq!(profile.conquered.len(), 2);
        assert_eq!(store.load("ada").unwrap(), profile);
    }

    #[test]
    fn loss_leaves_profile_untouched() {
        let store = MemoryProfileStore::new();
        let mut profile = PlayerProfile::new("ada");
        let report = on_terminate(Outcome::Lost, &level("France"), &mut profile, &store);
        assert_eq!(report.outcome, Outcome::Lost);
        assert!(!report.newly_conquered);
        assert!(profile.conquered.is_empty());
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn failed_save_keeps_the_conquest_in_memory() {
        let store = MemoryProfileStore::new();
        store.set_fail_writes(true);
        let mut profile = PlayerProfile::new("ada");
        profile.conquer("Spain");
        let report = on_terminate(Outcome::Won, &level("France"), &mut profile, &store);
        assert!(report.newly_conquered);
        assert!(!report.persisted);
        assert!(profile.has_conquered("France"));
    }

    #[test]
    fn start_claim_only_applies_to_fresh_profiles() {
        let store = MemoryProfileStore::new();
        let mut profile = PlayerProfile::new("ada");
        assert_eq!(claim_start(&store, &mut profile, "Poland"), Some(true));
        assert_eq!(claim_start(&store, &mut profile, "Spain"), None);
        assert_eq!(profile.conquered.len(), 1);
        assert_eq!(store.saves(), 1);
    }

    #[test]
    fn start_claim_reports_a_failed_save() {
        let store = MemoryProfileStore::new();
        store.set_fail_writes(true);
        let mut profile = PlayerProfile::new("ada");
        assert_eq!(claim_start(&store, &mut profile, "Poland"), Some(false));
        assert!(profile.has_conquered("Poland"));
        assert_eq!(store.saves(), 0);
    }
}
