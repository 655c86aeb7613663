//=========================================================================
// Action Registry
//=========================================================================
//
// Maps action names to handlers. Last registration wins.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{ActionHandler, ActionRef};
use crate::core::error::GameError;

//=== ActionRegistry ======================================================

/// Named action handlers.
#[derive(Default)]
pub struct ActionRegistry {
    handlers: HashMap<String, ActionHandler>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`, replacing any earlier handler.
    pub fn register(&mut self, name: impl Into<String>, handler: ActionHandler) {
        let name = name.into();
        if self.handlers.insert(name.clone(), handler).is_some() {
            debug!("Action '{}' re-registered, previous handler replaced", name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Resolves an action reference to a diagnostic label and its handler.
    pub fn resolve(&self, action: &ActionRef) -> Result<(String, ActionHandler), GameError> {
        match action {
            ActionRef::Named(name) => self
                .handlers
                .get(name)
                .map(|handler| (name.clone(), Rc::clone(handler)))
                .ok_or_else(|| GameError::UnknownAction(name.clone())),
            ActionRef::Inline(handler) => Ok(("<inline>".to_owned(), Rc::clone(handler))),
        }
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("ActionRegistry").field("actions", &names).finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
