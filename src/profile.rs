//! Player profiles and their persistence.
//!
//! Profiles are kept as one JSON document in local storage, keyed by
//! username. Only the conquered-country set is persisted.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::util::local_storage;

pub const PROFILES_KEY: &str = "cc_profiles";
pub const CURRENT_USER_KEY: &str = "cc_current_user";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub username: String,
    #[serde(rename = "conqueredCountries", default)]
    pub conquered: BTreeSet<String>,
}

impl PlayerProfile {
    pub fn new(username: impl Into<String>) -> Self {
        Self { username: username.into(), conquered: BTreeSet::new() }
    }

    /// Adds the country; returns false when it was already conquered.
    pub fn conquer(&mut self, country: &str) -> bool {
        self.conquered.insert(country.to_string())
    }

    pub fn has_conquered(&self, country: &str) -> bool {
        self.conquered.contains(country)
    }
}

pub trait ProfileStore {
    fn usernames(&self) -> Result<Vec<String>>;
    fn load(&self, username: &str) -> Result<PlayerProfile>;
    fn save(&self, profile: &PlayerProfile) -> Result<()>;
    fn current_user(&self) -> Option<String>;
    fn set_current_user(&self, username: &str) -> Result<()>;
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct ProfileDoc {
    #[serde(rename = "conqueredCountries", default)]
    conquered: BTreeSet<String>,
}

/// Profiles persisted in `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageProfileStore;

impl LocalStorageProfileStore {
    pub fn is_available() -> bool {
        local_storage().is_some()
    }

    fn read_all(&self) -> Result<BTreeMap<String, ProfileDoc>> {
        let store = local_storage().ok_or(GameError::StorageUnavailable)?;
        match store.get_item(PROFILES_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw)
                .map_err(|e| GameError::Persistence(format!("corrupt {}: {}", PROFILES_KEY, e))),
            Ok(None) => Ok(BTreeMap::new()),
            Err(_) => Err(GameError::Persistence(format!("cannot read {}", PROFILES_KEY))),
        }
    }

    fn write_all(&self, docs: &BTreeMap<String, ProfileDoc>) -> Result<()> {
        let store = local_storage().ok_or(GameError::StorageUnavailable)?;
        let raw = serde_json::to_string(docs).map_err(|e| GameError::Persistence(e.to_string()))?;
        store
            .set_item(PROFILES_KEY, &raw)
            .map_err(|_| GameError::Persistence(format!("cannot write {}", PROFILES_KEY)))
    }
}

impl ProfileStore for LocalStorageProfileStore {
    fn usernames(&self) -> Result<Vec<String>> {
        Ok(self.read_all()?.into_keys().collect())
    }

    fn load(&self, username: &str) -> Result<PlayerProfile> {
        let doc = self
            .read_all()?
            .remove(username)
            .ok_or_else(|| GameError::UnknownUser(username.to_string()))?;
        Ok(PlayerProfile { username: username.to_string(), conquered: doc.conquered })
    }

    fn save(&self, profile: &PlayerProfile) -> Result<()> {
        let mut docs = self.read_all()?;
        docs.insert(
            profile.username.clone(),
            ProfileDoc { conquered: profile.conquered.clone() },
        );
        self.write_all(&docs)
    }

    fn current_user(&self) -> Option<String> {
        local_storage()?
            .get_item(CURRENT_USER_KEY)
            .ok()
            .flatten()
            .filter(|u| !u.is_empty())
    }

    fn set_current_user(&self, username: &str) -> Result<()> {
        let store = local_storage().ok_or(GameError::StorageUnavailable)?;
        store
            .set_item(CURRENT_USER_KEY, username)
            .map_err(|_| GameError::Persistence(format!("cannot write {}", CURRENT_USER_KEY)))
    }
}

/// In-process store, used when local storage is blocked and in tests.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: RefCell<BTreeMap<String, PlayerProfile>>,
    current: RefCell<Option<String>>,
    fail_writes: Cell<bool>,
    saves: Cell<usize>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `save` fail, to exercise recovery paths.
    #[cfg(test)]
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Number of successful saves so far.
    #[cfg(test)]
    pub fn saves(&self) -> usize {
        self.saves.get()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn usernames(&self) -> Result<Vec<String>> {
        Ok(self.profiles.borrow().keys().cloned().collect())
    }

    fn load(&self, username: &str) -> Result<PlayerProfile> {
        self.profiles
            .borrow()
            .get(username)
            .cloned()
            .ok_or_else(|| GameError::UnknownUser(username.to_string()))
    }

    fn save(&self, profile: &PlayerProfile) -> Result<()> {
        if self.fail_writes.get() {
            return Err(GameError::Persistence("write rejected".into()));
        }
        self.profiles
            .borrow_mut()
            .insert(profile.username.clone(), profile.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn current_user(&self) -> Option<String> {
        self.current.borrow().clone()
    }

    fn set_current_user(&self, username: &str) -> Result<()> {
        *self.current.borrow_mut() = Some(username.to_string());
        Ok(())
    }
}

/// Local storage when the browser allows it, memory otherwise.
pub fn browser_store() -> Rc<dyn ProfileStore> {
    if LocalStorageProfileStore::is_available() {
        Rc::new(LocalStorageProfileStore)
    } else {
        log::warn!("local storage unavailable, progress will not survive a reload");
        Rc::new(MemoryProfileStore::new())
    }
}

/// Creates, stores and selects a new profile.
pub fn create_profile(store: &dyn ProfileStore, username: &str) -> Result<PlayerProfile> {
    let username = username.trim();
    if username.is_empty() {
        return Err(GameError::EmptyUsername);
    }
    if store.usernames()?.iter().any(|u| u == username) {
        return Err(GameError::DuplicateUsername(username.to_string()));
    }
    let profile = PlayerProfile::new(username);
    store.save(&profile)?;
    store.set_current_user(username)?;
    log::info!("created profile {}", username);
    Ok(profile)
}

/// Loads and selects an existing profile.
pub fn select_profile(store: &dyn ProfileStore, username: &str) -> Result<PlayerProfile> {
    let profile = store.load(username)?;
    store.set_current_user(username)?;
    Ok(profile)
}
