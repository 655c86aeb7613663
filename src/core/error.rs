//=========================================================================
// Game Errors
//=========================================================================
//
// Error taxonomy for the orchestration core.
//
// Only authoring-logic errors are surfaced here. Rendering failures are
// the presentation port's concern and never cross back into the core.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== GameError ===========================================================

/// Errors raised by scene transitions, dispatch and handler capabilities.
#[derive(Debug, Error)]
pub enum GameError {
    /// A `start`/`go` target is not registered. The current scene is kept.
    #[error("unknown scene '{0}'")]
    UnknownScene(String),

    /// A clicked object references an action name nobody registered.
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    /// An authored handler or lifecycle hook failed mid-execution.
    #[error("action '{action}' failed: {reason}")]
    HandlerExecution {
        /// Action name, or a description of the inline handler/hook.
        action: String,
        /// Rendered error chain of the failure.
        reason: String,
    },

    /// `start` was called after the game already started.
    #[error("game already started in scene '{0}'")]
    AlreadyStarted(String),

    /// An operation needing a current scene ran before `start`.
    #[error("game has not been started")]
    NotStarted,

    /// A `say`/`choice` was issued while another prompt is outstanding.
    #[error("a {0} prompt is already pending")]
    PromptPending(&'static str),

    /// `choice` was called without any options to pick from.
    #[error("choice '{0}' has no options")]
    EmptyChoice(String),

    /// The caller's scene session was superseded by a transition.
    #[error("scene generation {0} is no longer current")]
    StaleGeneration(u64),

    /// The executor backing the game has been torn down.
    #[error("game runtime has shut down")]
    ShutDown,
}

impl GameError {
    /// Builds a `HandlerExecution` error from an authored failure.
    pub fn handler(action: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::HandlerExecution {
            action: action.into(),
            reason: format!("{err:#}"),
        }
    }

    /// Returns true if this error only signals superseded work.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleGeneration(_))
    }
}

/// Returns true if an authored failure is a superseded-generation signal.
pub(crate) fn is_stale_failure(err: &anyhow::Error) -> bool {
    err.downcast_ref::<GameError>()
        .map(GameError::is_stale)
        .unwrap_or(false)
}

//=========================================================================
// Unit Tests
//=========================================================================
