//=========================================================================
// Scene Session
//=========================================================================
//
// Current scene plus the generation tag used to invalidate stale work.
//
// The generation advances once per transition, after the outgoing
// scene's exit hook has completed. Anything holding an older tag must
// treat its continuation as a no-op.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

//=== Generation ==========================================================

/// Monotonic tag identifying one scene session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Raw counter value.
    pub const fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== GenerationTracker ===================================================

/// Shared view of the current generation.
///
/// Cloned into every capability handle so a suspended continuation can
/// check whether it still belongs to the live session.
#[derive(Debug, Clone, Default)]
pub(crate) struct GenerationTracker {
    current: Rc<Cell<Generation>>,
}

impl GenerationTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn current(&self) -> Generation {
        self.current.get()
    }

    pub(crate) fn is_current(&self, generation: Generation) -> bool {
        self.current.get() == generation
    }

    /// Advances to the next generation and returns it.
    pub(crate) fn advance(&self) -> Generation {
        let next = self.current.get().next();
        self.current.set(next);
        next
    }
}

//=== SceneSession ========================================================

/// Runtime record of the scene currently on stage.
///
/// Replaced wholesale on every transition, never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSession {
    /// Identifier of the scene on stage.
    pub scene: String,
    /// Generation the session was created under.
    pub generation: Generation,
}

//=========================================================================
// Unit Tests
//=========================================================================
