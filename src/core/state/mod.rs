//=========================================================================
// State Store
//=========================================================================
//
// The single key/value mapping consulted by visibility conditions and
// authored logic.
//
// Architecture:
//   StateStore (Rc handle)
//     ├─ values: HashMap<String, Value>
//     └─ listeners: Vec<(SubscriptionId, Listener)>
//
// The store never requests a re-render on its own. Callers either
// `reload()` or rely on the next scene transition.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use log::debug;

//=== Module Declarations =================================================

mod game_state;

//=== Public API ==========================================================

pub use game_state::GameState;
pub use serde_json::Value;

/// Ordered, serializable copy of the whole mapping.
pub type StateSnapshot = BTreeMap<String, Value>;

//=== StateChange =========================================================

/// Notification delivered to subscribers after a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct StateChange {
    /// Key that was written.
    pub key: String,
    /// Value before the write (`None` if the key was unset).
    pub previous: Option<Value>,
    /// Value after the write (`None` if a restore removed the key).
    pub current: Option<Value>,
}

/// Handle returned by [`StateStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&StateChange)>;

//=== StoreInner ==========================================================

#[derive(Default)]
struct StoreInner {
    values: HashMap<String, Value>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

//=== StateStore ==========================================================

/// Global mutable state of one game instance.
///
/// Cheap to clone; clones share the same mapping. Unknown keys read as
/// `None` and no operation ever fails.
#[derive(Clone, Default)]
pub struct StateStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl StateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Reads ------------------------------------------------------------

    /// Returns a copy of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.borrow().values.get(key).cloned()
    }

    /// Returns true only if `key` holds the boolean `true`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.inner
            .borrow()
            .values
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Returns true if `key` has been set.
    pub fn has(&self, key: &str) -> bool {
        self.inner.borrow().values.contains_key(key)
    }

    /// Number of keys currently set.
    pub fn len(&self) -> usize {
        self.inner.borrow().values.len()
    }

    /// Returns true if nothing has been set yet.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().values.is_empty()
    }

    //--- Writes -----------------------------------------------------------

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();

        let previous = self
            .inner
            .borrow_mut()
            .values
            .insert(key.clone(), value.clone());

        self.notify(&StateChange {
            key,
            previous,
            current: Some(value),
        });
    }

    /// Flips the boolean under `key` and returns the new value.
    ///
    /// A missing or non-boolean value counts as `false`.
    pub fn toggle(&self, key: impl Into<String>) -> bool {
        let key = key.into();
        let flipped = !self.get_bool(&key);
        self.set(key, flipped);
        flipped
    }

    //--- Change Notification ---------------------------------------------

    /// Registers a listener called after every mutation.
    pub fn subscribe(&self, listener: impl Fn(&StateChange) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        inner.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(existing, _)| *existing != id);
        inner.listeners.len() != before
    }

    // Listeners are cloned out so they can read the store themselves.
    fn notify(&self, change: &StateChange) {
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in listeners {
            listener(change);
        }
    }

    //--- Snapshots --------------------------------------------------------

    /// Returns an ordered copy of every key and value.
    pub fn snapshot(&self) -> StateSnapshot {
        self.inner
            .borrow()
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Replaces the whole mapping with `snapshot`.
    ///
    /// Subscribers hear about every key whose value changed, including
    /// keys the snapshot does not contain.
    pub fn restore(&self, snapshot: StateSnapshot) {
        let replaced: HashMap<String, Value> = snapshot.into_iter().collect();
        let previous = std::mem::replace(&mut self.inner.borrow_mut().values, replaced.clone());

        let mut changes: Vec<StateChange> = Vec::new();
        for (key, current) in &replaced {
            let before = previous.get(key);
            if before != Some(current) {
                changes.push(StateChange {
                    key: key.clone(),
                    previous: before.cloned(),
                    current: Some(current.clone()),
                });
            }
        }
        for (key, before) in &previous {
            if !replaced.contains_key(key) {
                changes.push(StateChange {
                    key: key.clone(),
                    previous: Some(before.clone()),
                    current: None,
                });
            }
        }
        changes.sort_by(|a, b| a.key.cmp(&b.key));

        debug!("State restored ({} keys, {} changed)", replaced.len(), changes.len());

        for change in &changes {
            self.notify(change);
        }
    }

    /// Serializes a snapshot to JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.snapshot())
    }

    /// Restores the mapping from JSON produced by [`StateStore::to_json`].
    pub fn restore_json(&self, json: &str) -> serde_json::Result<()> {
        let snapshot: StateSnapshot = serde_json::from_str(json)?;
        self.restore(snapshot);
        Ok(())
    }
}

impl fmt::Debug for StateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStore")
            .field("values", &self.snapshot())
            .field("listeners", &self.inner.borrow().listeners.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
