//=========================================================================
// Game State Accessor
//=========================================================================
//
// Generation-bound view of the state store handed to handlers and hooks.
//
// Reads always go through to the live store so a resumed continuation
// sees current values. Writes from a superseded generation are dropped.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{StateStore, Value};
use crate::core::scene::{Generation, GenerationTracker};

//=== GameState ===========================================================

/// State accessor bound to the scene session that created it.
#[derive(Clone)]
pub struct GameState {
    store: StateStore,
    tracker: GenerationTracker,
    generation: Generation,
}

impl GameState {
    pub(crate) fn new(store: StateStore, tracker: GenerationTracker, generation: Generation) -> Self {
        Self {
            store,
            tracker,
            generation,
        }
    }

    /// Generation this accessor belongs to.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns true while the owning scene session is still live.
    pub fn is_live(&self) -> bool {
        self.tracker.is_current(self.generation)
    }

    /// See [`StateStore::get`].
    pub fn get(&self, key: &str) -> Option<Value> {
        self.store.get(key)
    }

    /// See [`StateStore::get_bool`].
    pub fn get_bool(&self, key: &str) -> bool {
        self.store.get_bool(key)
    }

    /// See [`StateStore::has`].
    pub fn has(&self, key: &str) -> bool {
        self.store.has(key)
    }

    /// See [`StateStore::set`]. Ignored once the session is superseded.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        if !self.is_live() {
            debug!("Dropping write to '{}' from stale generation {}", key, self.generation);
            return;
        }
        self.store.set(key, value);
    }

    /// See [`StateStore::toggle`].
    ///
    /// Once the session is superseded the value is left alone and the
    /// current value is returned.
    pub fn toggle(&self, key: impl Into<String>) -> bool {
        let key = key.into();
        if !self.is_live() {
            debug!("Dropping toggle of '{}' from stale generation {}", key, self.generation);
            return self.store.get_bool(&key);
        }
        self.store.toggle(key)
    }
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("generation", &self.generation)
            .field("live", &self.is_live())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
