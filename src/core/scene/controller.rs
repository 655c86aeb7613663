//=========================================================================
// Scene Controller
//=========================================================================
//
// Stages scenes: mounting, lifecycle hooks and queued transitions.
//
// Transitions are queued and applied strictly in issuance order by a
// single driver task. The driver exists only while the queue is being
// worked off; the first enqueue spawns it.
//
// Lifecycle:
//   Idle → TransitioningIn → Entering → Active
//   Active → Exiting → TransitioningOut → TransitioningIn → Entering → Active
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::{debug, error, info};

//=== Internal Dependencies ===============================================

use super::{
    visible_objects, Generation, MountedObject, ObjectHandle, SceneDefinition, SceneSession,
    SceneTransition, TransitionQueue,
};
use crate::core::action::HookHandler;
use crate::core::error::{is_stale_failure, GameError};
use crate::core::globals::GameContext;

//=== ScenePhase ==========================================================

/// Where the controller is in a scene's lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScenePhase {
    /// Nothing has been started yet.
    #[default]
    Idle,

    /// Layers and objects of the incoming scene are being mounted.
    TransitioningIn,

    /// The incoming scene's `on_enter` hook is running.
    Entering,

    /// The scene is settled and accepts clicks.
    Active,

    /// The outgoing scene's `on_exit` hook is running.
    Exiting,

    /// The outgoing scene is being unmounted.
    TransitioningOut,
}

impl ScenePhase {
    /// Returns true while objects are on stage and may be re-rendered.
    pub fn has_objects_mounted(self) -> bool {
        matches!(self, Self::Entering | Self::Active)
    }
}

//=== SceneController =====================================================

#[derive(Debug, Default)]
pub(crate) struct SceneController {
    phase: ScenePhase,
    session: Option<SceneSession>,
    /// Definition the session was staged from; re-registration never reaches it.
    definition: Option<Rc<SceneDefinition>>,
    queue: TransitionQueue,
    mounted: Vec<MountedObject>,
    driver_running: bool,
    started: Option<String>,
}

impl SceneController {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self::default()
    }

    //--- Accessors --------------------------------------------------------

    pub(crate) fn phase(&self) -> ScenePhase {
        self.phase
    }

    pub(crate) fn session(&self) -> Option<&SceneSession> {
        self.session.as_ref()
    }

    /// Definition of the scene on stage, as it was when it was entered.
    pub(crate) fn active_definition(&self) -> Option<Rc<SceneDefinition>> {
        self.definition.clone()
    }

    pub(crate) fn mounted(&self) -> &[MountedObject] {
        &self.mounted
    }

    /// The mounted object `handle` points at, if it is on stage now.
    pub(crate) fn mounted_object(&self, handle: ObjectHandle) -> Option<&MountedObject> {
        self.mounted.iter().find(|object| object.handle == handle)
    }

    pub(crate) fn has_started(&self) -> bool {
        self.started.is_some()
    }

    /// Returns true when no transition is queued or running.
    pub(crate) fn is_settled(&self) -> bool {
        self.phase == ScenePhase::Active && !self.driver_running && self.queue.is_empty()
    }

    pub(crate) fn pending_transitions(&self) -> usize {
        self.queue.len()
    }

    //--- Driver bookkeeping -----------------------------------------------

    /// Queues `transition`; returns true if a driver must be spawned.
    fn enqueue(&mut self, transition: SceneTransition) -> bool {
        self.queue.push(transition);
        if self.driver_running {
            false
        } else {
            self.driver_running = true;
            true
        }
    }

    /// Pops the next transition, or retires the driver when none is left.
    fn next_transition(&mut self) -> Option<SceneTransition> {
        let next = self.queue.pop();
        if next.is_none() {
            self.driver_running = false;
        }
        next
    }
}

//=== Requests ============================================================

/// Validates and queues the initial scene.
pub(crate) fn request_start(ctx: &Rc<GameContext>, scene_id: &str) -> Result<(), GameError> {
    if let Some(started) = &ctx.controller.borrow().started {
        return Err(GameError::AlreadyStarted(started.clone()));
    }
    ctx.scenes.borrow().require(scene_id)?;

    ctx.controller.borrow_mut().started = Some(scene_id.to_owned());
    enqueue(ctx, SceneTransition::Enter(scene_id.to_owned()))
}

/// Validates and queues a transition to `scene_id`.
///
/// An unknown target leaves the current scene in place.
pub(crate) fn request_go(ctx: &Rc<GameContext>, scene_id: &str) -> Result<(), GameError> {
    if !ctx.controller.borrow().has_started() {
        return Err(GameError::NotStarted);
    }
    ctx.scenes.borrow().require(scene_id)?;

    debug!("Queued transition to scene '{}'", scene_id);
    enqueue(ctx, SceneTransition::Go(scene_id.to_owned()))
}

fn enqueue(ctx: &Rc<GameContext>, transition: SceneTransition) -> Result<(), GameError> {
    let spawn_driver = ctx.controller.borrow_mut().enqueue(transition);
    ctx.refresh_cursor();
    if spawn_driver {
        ctx.spawn(drive_transitions(Rc::clone(ctx)))?;
    }
    Ok(())
}

//=== Driver ==============================================================

/// Applies queued transitions one at a time until the queue is empty.
async fn drive_transitions(ctx: Rc<GameContext>) {
    loop {
        let next = ctx.controller.borrow_mut().next_transition();
        let Some(transition) = next else {
            break;
        };

        let scene = match ctx.scenes.borrow().require(transition.target()) {
            Ok(scene) => scene,
            Err(err) => {
                error!("Dropping transition: {}", err);
                continue;
            }
        };

        match transition {
            SceneTransition::Enter(_) => enter_initial(&ctx, scene).await,
            SceneTransition::Go(_) => transition_to(&ctx, scene).await,
        }
    }
    ctx.refresh_cursor();
}

/// Stages the first scene. No exit hook runs.
async fn enter_initial(ctx: &Rc<GameContext>, scene: Rc<SceneDefinition>) {
    let generation = ctx.generations.advance();
    enter(ctx, &scene, generation).await;
    info!("Started in scene '{}' ({})", scene.id, generation);
}

/// Replaces the current scene with `scene`.
async fn transition_to(ctx: &Rc<GameContext>, scene: Rc<SceneDefinition>) {
    let (outgoing, definition) = {
        let controller = ctx.controller.borrow();
        (controller.session.clone(), controller.active_definition())
    };

    if let Some(outgoing) = &outgoing {
        ctx.controller.borrow_mut().phase = ScenePhase::Exiting;
        if let Some(on_exit) = definition.and_then(|d| d.on_exit.clone()) {
            let label = format!("{}::on_exit", outgoing.scene);
            run_hook(ctx, &on_exit, outgoing.generation, &label).await;
        }
    }

    let generation = ctx.generations.advance();
    let prompt_on_screen = ctx.dialogue.borrow_mut().discard_stale(generation);

    ctx.controller.borrow_mut().phase = ScenePhase::TransitioningOut;
    ctx.present(|port| {
        if prompt_on_screen {
            port.dismiss_prompt();
        }
        port.unmount_all();
    });
    ctx.controller.borrow_mut().mounted.clear();

    enter(ctx, &scene, generation).await;

    match outgoing {
        Some(outgoing) => info!(
            "Transitioned '{}' → '{}' ({})",
            outgoing.scene, scene.id, generation
        ),
        None => info!("Entered scene '{}' ({})", scene.id, generation),
    }
}

/// Mounts `scene` under `generation`, runs its entry hook and settles.
async fn enter(ctx: &Rc<GameContext>, scene: &Rc<SceneDefinition>, generation: Generation) {
    {
        let mut controller = ctx.controller.borrow_mut();
        controller.phase = ScenePhase::TransitioningIn;
        controller.session = Some(SceneSession {
            scene: scene.id.clone(),
            generation,
        });
        controller.definition = Some(Rc::clone(scene));
    }

    let objects = visible_objects(scene, &ctx.state, generation);
    ctx.present(|port| {
        port.mount_layers(&scene.id, &scene.layers);
        port.mount_objects(&objects);
    });

    {
        let mut controller = ctx.controller.borrow_mut();
        controller.mounted = objects;
        controller.phase = ScenePhase::Entering;
    }

    if let Some(on_enter) = scene.on_enter.clone() {
        let label = format!("{}::on_enter", scene.id);
        run_hook(ctx, &on_enter, generation, &label).await;
    }

    ctx.controller.borrow_mut().phase = ScenePhase::Active;
}

/// Runs a lifecycle hook. Failures are logged and recorded, never fatal.
async fn run_hook(ctx: &Rc<GameContext>, hook: &HookHandler, generation: Generation, label: &str) {
    let api = ctx.api(generation);
    if let Err(err) = hook(api).await {
        if is_stale_failure(&err) {
            debug!("Hook '{}' ended with its scene superseded", label);
        } else {
            let failure = GameError::handler(label, &err);
            error!("{}", failure);
            ctx.runtime.borrow_mut().record(failure);
        }
    }
}

//=== Reload ==============================================================

/// Re-evaluates visibility of the current scene.
///
/// Returns true if the port received a new object list. No hooks run and
/// the generation is unchanged.
pub(crate) fn reload(ctx: &Rc<GameContext>, generation: Generation) -> Result<bool, GameError> {
    if !ctx.generations.is_current(generation) {
        return Err(GameError::StaleGeneration(generation.value()));
    }

    let (phase, scene) = {
        let controller = ctx.controller.borrow();
        (controller.phase, controller.active_definition())
    };
    let Some(scene) = scene.filter(|_| phase.has_objects_mounted()) else {
        debug!("Reload ignored in phase {:?}", phase);
        return Ok(false);
    };

    let objects = visible_objects(&scene, &ctx.state, generation);
    {
        let mut controller = ctx.controller.borrow_mut();
        if controller.mounted == objects {
            return Ok(false);
        }
        controller.mounted = objects.clone();
    }

    ctx.present(|port| port.mount_objects(&objects));
    ctx.refresh_cursor();
    Ok(true)
}

//=========================================================================
// Unit Tests
//=========================================================================
