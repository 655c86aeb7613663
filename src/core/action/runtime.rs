//=========================================================================
// Action Runtime
//=========================================================================
//
// Click dispatch with single-flight execution.
//
// Flow:
//   click(handle) → admission checks → resolve ActionRef
//                 → spawn handler task → in_flight until it settles
//
// Only one handler runs at a time. Clicks arriving while one is in flight,
// or while a transition runs, are ignored rather than queued.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::{debug, error};

//=== Internal Dependencies ===============================================

use super::ActionFuture;
use crate::core::error::{is_stale_failure, GameError};
use crate::core::globals::GameContext;
use crate::core::scene::ObjectHandle;

//=== Dispatch ============================================================

/// Outcome of a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The object's handler was started.
    Started,

    /// The click was dropped without running anything.
    Ignored(IgnoreReason),
}

/// Why a click was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No scene has been started yet.
    NotStarted,

    /// A scene transition is queued or running.
    Transitioning,

    /// The handle belongs to a scene session that is gone.
    StaleHandle,

    /// The object is hidden or does not exist in the current scene.
    NotMounted,

    /// Another handler is still in flight.
    Busy,
}

//=== ActionRuntime =======================================================

#[derive(Debug)]
struct InFlight {
    label: String,
    handle: ObjectHandle,
}

/// Tracks the in-flight handler and retained failures.
#[derive(Debug, Default)]
pub(crate) struct ActionRuntime {
    in_flight: Option<InFlight>,
    errors: Vec<GameError>,
}

impl ActionRuntime {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Keeps a failure for the host to collect.
    pub(crate) fn record(&mut self, failure: GameError) {
        self.errors.push(failure);
    }

    pub(crate) fn take_errors(&mut self) -> Vec<GameError> {
        std::mem::take(&mut self.errors)
    }
}

//=== Dispatch ============================================================

/// Runs the action of the object behind `handle`, if the click is admitted.
///
/// Returns `Err` only when the object names an action nobody registered.
pub(crate) fn dispatch(ctx: &Rc<GameContext>, handle: ObjectHandle) -> Result<Dispatch, GameError> {
    if let Some(reason) = admission(ctx, handle) {
        debug!("Click on object {} ({}) ignored: {:?}", handle.index, handle.generation, reason);
        return Ok(Dispatch::Ignored(reason));
    }

    // Resolve against the staged definition; re-registration applies on next entry.
    let Some(scene) = ctx.controller.borrow().active_definition() else {
        return Ok(Dispatch::Ignored(IgnoreReason::NotStarted));
    };
    let scene_id = scene.id.as_str();
    let Some(object) = scene.objects.get(handle.index) else {
        return Ok(Dispatch::Ignored(IgnoreReason::NotMounted));
    };

    let resolved = ctx.actions.borrow().resolve(&object.action);
    let (label, handler) = match resolved {
        Ok(resolved) => resolved,
        Err(err) => {
            error!("Click on '{}' object {}: {}", scene_id, handle.index, err);
            return Err(err);
        }
    };

    debug!("Dispatching '{}' in scene '{}'", label, scene_id);
    ctx.runtime.borrow_mut().in_flight = Some(InFlight {
        label: label.clone(),
        handle,
    });
    ctx.refresh_cursor();

    let task = handler(ctx.game_state(handle.generation), ctx.api(handle.generation));
    if let Err(err) = ctx.spawn(run_handler(Rc::clone(ctx), label, task)) {
        ctx.runtime.borrow_mut().in_flight = None;
        return Err(err);
    }
    Ok(Dispatch::Started)
}

/// Finds the current-session handle of the object with stable id `id`.
pub(crate) fn handle_for_id(ctx: &GameContext, id: &str) -> Option<ObjectHandle> {
    let controller = ctx.controller.borrow();
    let session = controller.session()?;
    let index = controller.active_definition()?.object_index(id)?;
    Some(ObjectHandle {
        generation: session.generation,
        index,
    })
}

fn admission(ctx: &GameContext, handle: ObjectHandle) -> Option<IgnoreReason> {
    let controller = ctx.controller.borrow();
    if !controller.has_started() {
        return Some(IgnoreReason::NotStarted);
    }
    if !controller.is_settled() {
        return Some(IgnoreReason::Transitioning);
    }
    if !ctx.generations.is_current(handle.generation) {
        return Some(IgnoreReason::StaleHandle);
    }
    if controller.mounted_object(handle).is_none() {
        return Some(IgnoreReason::NotMounted);
    }
    if let Some(in_flight) = &ctx.runtime.borrow().in_flight {
        debug!(
            "'{}' (object {}) is still running",
            in_flight.label, in_flight.handle.index
        );
        return Some(IgnoreReason::Busy);
    }
    None
}

async fn run_handler(ctx: Rc<GameContext>, label: String, task: ActionFuture) {
    match task.await {
        Ok(()) => debug!("Action '{}' finished", label),
        Err(err) if is_stale_failure(&err) => {
            debug!("Action '{}' ended with its scene superseded", label);
        }
        Err(err) => {
            let failure = GameError::handler(&label, &err);
            error!("{}", failure);
            ctx.runtime.borrow_mut().record(failure);
        }
    }

    ctx.runtime.borrow_mut().in_flight = None;
    ctx.refresh_cursor();
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_runtime_is_idle() {
        let mut runtime = ActionRuntime::new();
        assert!(!runtime.is_busy());
        assert!(runtime.take_errors().is_empty());
    }

    #[test]
    fn recorded_failures_are_taken_once() {
        let mut runtime = ActionRuntime::new();
        runtime.record(GameError::UnknownAction("ghost".into()));
        runtime.record(GameError::NotStarted);

        let errors = runtime.take_errors();
        assert_eq!(errors.len(), 2);
        assert!(matches!(&errors[0], GameError::UnknownAction(name) if name == "ghost"));
        assert!(runtime.take_errors().is_empty());
    }
}
