//=========================================================================
// Action System
//=========================================================================
//
// Authored handlers, the registry that names them, and the runtime that
// invokes them on click.
//
// Actions: Named handlers resolved at dispatch time, or inline handlers
// carried directly on an object.
// Capabilities: Every invocation receives an `ActionApi` bound to the
// scene session that was live when the click happened.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};

//=== Internal Dependencies ===============================================

use crate::core::state::GameState;

//=== Module Declarations =================================================

mod api;
mod registry;
pub(crate) mod runtime;

//=== Public API ==========================================================

pub use api::ActionApi;
pub use registry::ActionRegistry;
pub use runtime::{Dispatch, IgnoreReason};

//=== Handler Types =======================================================

/// Boxed future returned by handlers and hooks.
pub type ActionFuture = LocalBoxFuture<'static, anyhow::Result<()>>;

/// Click handler: receives the state accessor and the capability bundle.
pub type ActionHandler = Rc<dyn Fn(GameState, ActionApi) -> ActionFuture>;

/// Scene lifecycle hook: receives the capability bundle.
pub type HookHandler = Rc<dyn Fn(ActionApi) -> ActionFuture>;

/// Boxes an async closure into an [`ActionHandler`].
///
/// ```
/// use diorama_engine::prelude::*;
///
/// let open_chest = handler(|state, api| async move {
///     state.set("hasKey", true);
///     api.say(["A rusty key!"]).await?;
///     api.go("gate")?;
///     Ok(())
/// });
/// # let _ = open_chest;
/// ```
pub fn handler<F, Fut>(f: F) -> ActionHandler
where
    F: Fn(GameState, ActionApi) -> Fut + 'static,
    Fut: Future<Output = anyhow::Result<()>> + 'static,
{
    Rc::new(move |state, api| f(state, api).boxed_local())
}

/// Boxes an async closure into a [`HookHandler`].
pub fn hook<F, Fut>(f: F) -> HookHandler
where
    F: Fn(ActionApi) -> Fut + 'static,
    Fut: Future<Output = anyhow::Result<()>> + 'static,
{
    Rc::new(move |api| f(api).boxed_local())
}

//=== ActionRef ===========================================================

/// How an object refers to its action.
#[derive(Clone)]
pub enum ActionRef {
    /// Resolved against the action registry at dispatch time.
    Named(String),

    /// Handler carried on the object itself.
    Inline(ActionHandler),
}

impl ActionRef {
    /// Wraps an async closure as an inline action.
    pub fn inline<F, Fut>(f: F) -> Self
    where
        F: Fn(GameState, ActionApi) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        Self::Inline(handler(f))
    }
}

impl From<&str> for ActionRef {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

impl From<String> for ActionRef {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<ActionHandler> for ActionRef {
    fn from(handler: ActionHandler) -> Self {
        Self::Inline(handler)
    }
}

impl fmt::Debug for ActionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Inline(_) => f.write_str("Inline(..)"),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
