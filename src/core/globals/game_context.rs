//=========================================================================
// Game Context
//=========================================================================
//
// Shared, single-threaded context behind one game instance.
//
// Everything lives behind `RefCell`s on one thread. No borrow is ever
// held across an `.await` or across a call into authored code.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures::executor::LocalSpawner;
use futures::task::LocalSpawnExt;
use log::error;

//=== Internal Dependencies ===============================================

use crate::core::action::runtime::ActionRuntime;
use crate::core::action::{ActionApi, ActionRegistry};
use crate::core::clock::Clock;
use crate::core::dialogue::DialogueChannel;
use crate::core::effects::EffectTimers;
use crate::core::error::GameError;
use crate::core::presentation::{CursorHint, CursorTracker, PresentationPort};
use crate::core::scene::controller::SceneController;
use crate::core::scene::{Generation, GenerationTracker, SceneRegistry};
use crate::core::state::{GameState, StateStore};

//=== GameContext =========================================================

pub(crate) struct GameContext {
    pub(crate) state: StateStore,
    pub(crate) generations: GenerationTracker,
    pub(crate) scenes: RefCell<SceneRegistry>,
    pub(crate) actions: RefCell<ActionRegistry>,
    pub(crate) controller: RefCell<SceneController>,
    pub(crate) runtime: RefCell<ActionRuntime>,
    pub(crate) dialogue: RefCell<DialogueChannel>,
    pub(crate) effects: RefCell<EffectTimers>,
    pub(crate) cursor: RefCell<CursorTracker>,
    pub(crate) port: RefCell<Box<dyn PresentationPort>>,
    pub(crate) clock: Rc<dyn Clock>,
    spawner: LocalSpawner,
}

impl GameContext {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(
        port: Box<dyn PresentationPort>,
        clock: Rc<dyn Clock>,
        spawner: LocalSpawner,
    ) -> Self {
        Self {
            state: StateStore::new(),
            generations: GenerationTracker::new(),
            scenes: RefCell::new(SceneRegistry::new()),
            actions: RefCell::new(ActionRegistry::new()),
            controller: RefCell::new(SceneController::new()),
            runtime: RefCell::new(ActionRuntime::new()),
            dialogue: RefCell::new(DialogueChannel::new()),
            effects: RefCell::new(EffectTimers::new()),
            cursor: RefCell::new(CursorTracker::default()),
            port: RefCell::new(port),
            clock,
            spawner,
        }
    }

    //--- Capabilities -----------------------------------------------------

    /// Capability bundle bound to `generation`.
    pub(crate) fn api(self: &Rc<Self>, generation: Generation) -> ActionApi {
        ActionApi::new(Rc::clone(self), generation)
    }

    /// State accessor bound to `generation`.
    pub(crate) fn game_state(&self, generation: Generation) -> GameState {
        GameState::new(self.state.clone(), self.generations.clone(), generation)
    }

    //--- Presentation -----------------------------------------------------

    /// Runs one instruction against the presentation port.
    pub(crate) fn present<R>(&self, f: impl FnOnce(&mut dyn PresentationPort) -> R) -> R {
        let mut port = self.port.borrow_mut();
        f(port.as_mut())
    }

    /// Recomputes the cursor affordance and sends it if it changed.
    pub(crate) fn refresh_cursor(&self) {
        let busy = self.runtime.borrow().is_busy() || !self.controller.borrow().is_settled();

        let hint = if busy {
            CursorHint::Busy
        } else {
            let hovered = self.cursor.borrow().hovered();
            match hovered.and_then(|handle| self.controller.borrow().mounted_object(handle).cloned()) {
                Some(object) => CursorHint::Interactive {
                    label: object.label,
                },
                None => CursorHint::Idle,
            }
        };

        let changed = self.cursor.borrow_mut().update(hint);
        if let Some(hint) = changed {
            self.present(|port| port.set_cursor(&hint));
        }
    }

    //--- Scheduling -------------------------------------------------------

    /// Schedules a task on the game's cooperative executor.
    pub(crate) fn spawn(&self, task: impl Future<Output = ()> + 'static) -> Result<(), GameError> {
        self.spawner.spawn_local(task).map_err(|err| {
            error!("Failed to schedule game task: {}", err);
            GameError::ShutDown
        })
    }
}
