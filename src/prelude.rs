//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use diorama_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Game facade
pub use crate::engine::{Game, GameBuilder};

// Authoring
pub use crate::core::action::{handler, hook, ActionApi, ActionRef, Dispatch, IgnoreReason};
pub use crate::core::dialogue::{ChoiceOption, DialogueLine, PromptKind};
pub use crate::core::scene::{
    Layer, MountedObject, ObjectHandle, ObjectSpec, Position, PresentationFragment,
    SceneDefinition, ScenePhase,
};
pub use crate::core::state::{GameState, StateStore, Value};

// Host integration
pub use crate::core::clock::{Clock, ManualClock, SystemClock};
pub use crate::core::config::GameConfig;
pub use crate::core::error::GameError;
pub use crate::core::player_bridge::{PlayerEvent, TickControl};
pub use crate::core::presentation::{CursorHint, PresentationPort, RecordingPresenter};
