//=========================================================================
// Diorama Engine
//
// Host-facing entry point: builds a game and drives it.
//
// Architecture:
// ```text
//     GameBuilder  ──build(port)──>  Game  ──pump()──>  [LocalPool]
//         │                           │
//         ├─ with_config()            ├─ register_scene() / action()
//         ├─ with_clock()             ├─ start() / go() / reload()
//         └─ with_channel_capacity()  └─ click() / advance() / choose()
// ```
//
// Every host call runs the cooperative executor until it stalls, so
// handlers, hooks and transitions progress as far as they can before
// control returns to the host.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::future::Future;
use std::rc::Rc;
use std::time::Instant;

use crossbeam_channel::{bounded, Sender};
use futures::executor::LocalPool;
use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::action::runtime::{self, Dispatch, IgnoreReason};
use crate::core::action::{handler, ActionApi, ActionHandler};
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::GameConfig;
use crate::core::dialogue::PromptKind;
use crate::core::error::GameError;
use crate::core::globals::GameContext;
use crate::core::player_bridge::{EventCollector, PlayerEvent, TickControl};
use crate::core::presentation::PresentationPort;
use crate::core::scene::{
    controller, Generation, MountedObject, ObjectHandle, SceneDefinition, ScenePhase, SceneSession,
};
use crate::core::state::{GameState, StateStore};

//=== GameBuilder =========================================================

/// Builder for configuring and constructing a [`Game`].
///
/// # Default Values
///
/// - **Config**: [`GameConfig::default`]
/// - **Clock**: [`SystemClock`]
/// - **Channel capacity**: 128 player events
///
/// # Examples
///
/// ```
/// use diorama_engine::prelude::*;
///
/// let presenter = RecordingPresenter::new();
/// let mut game = GameBuilder::new()
///     .with_channel_capacity(32)
///     .build(presenter.clone());
///
/// game.register_scene(SceneDefinition::new("forest").with_layer(Layer::new(-100.0)));
/// game.start("forest").unwrap();
///
/// assert_eq!(game.current_scene().as_deref(), Some("forest"));
/// ```
pub struct GameBuilder {
    config: GameConfig,
    clock: Option<Rc<dyn Clock>>,
    channel_capacity: usize,
}

impl GameBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            clock: None,
            channel_capacity: 128,
        }
    }

    /// Sets the rendering options forwarded to the presentation port.
    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the clock used to time effects.
    ///
    /// Default: [`SystemClock`]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Rc::new(clock));
        self
    }

    /// Sets the capacity of the host → game player event channel.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Builds the game around `port`.
    ///
    /// The port receives the configuration before anything is mounted.
    pub fn build(self, port: impl PresentationPort + 'static) -> Game {
        info!("Building game (channel: {})", self.channel_capacity);

        let mut port: Box<dyn PresentationPort> = Box::new(port);
        port.configure(&self.config);

        let clock = self.clock.unwrap_or_else(|| Rc::new(SystemClock));
        let pool = LocalPool::new();
        let ctx = Rc::new(GameContext::new(port, clock, pool.spawner()));
        let (sender, receiver) = bounded(self.channel_capacity);

        Game {
            ctx,
            pool,
            sender,
            collector: EventCollector::new(receiver),
            config: self.config,
        }
    }
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Game ================================================================

/// One running game: state store, registries, scene controller and the
/// executor their tasks run on.
///
/// Single-threaded. Hosts either call the input methods directly or send
/// [`PlayerEvent`]s through [`Game::sender`] and call [`Game::pump`] once
/// per frame.
pub struct Game {
    ctx: Rc<GameContext>,
    pool: LocalPool,
    sender: Sender<PlayerEvent>,
    collector: EventCollector,
    config: GameConfig,
}

impl Game {
    //--- Construction -----------------------------------------------------

    /// Builds a game with default settings around `port`.
    pub fn new(port: impl PresentationPort + 'static) -> Self {
        GameBuilder::new().build(port)
    }

    //--- Registration -----------------------------------------------------

    /// Registers a scene. Re-registering an id replaces the definition for
    /// later entries; the scene on stage is unaffected until it is re-entered.
    pub fn register_scene(&self, scene: SceneDefinition) {
        self.ctx.scenes.borrow_mut().register(scene);
    }

    /// Registers `f` under `name`. The last registration wins.
    pub fn action<F, Fut>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(GameState, ActionApi) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        self.register_action(name, handler(f));
    }

    /// Registers an already boxed handler under `name`.
    pub fn register_action(&self, name: impl Into<String>, action: ActionHandler) {
        self.ctx.actions.borrow_mut().register(name, action);
    }

    //--- Scenes -----------------------------------------------------------

    /// Stages the first scene.
    pub fn start(&mut self, scene_id: &str) -> Result<(), GameError> {
        controller::request_start(&self.ctx, scene_id)?;
        self.settle();
        Ok(())
    }

    /// Transitions to `scene_id` once queued transitions ahead of it ran.
    pub fn go(&mut self, scene_id: &str) -> Result<(), GameError> {
        controller::request_go(&self.ctx, scene_id)?;
        self.settle();
        Ok(())
    }

    /// Re-evaluates visibility of the current scene's objects.
    ///
    /// Returns true if the presentation port received a new object list.
    pub fn reload(&mut self) -> Result<bool, GameError> {
        let changed = controller::reload(&self.ctx, self.ctx.generations.current())?;
        self.settle();
        Ok(changed)
    }

    //--- Player Input -----------------------------------------------------

    /// Dispatches a click on a mounted object.
    pub fn click(&mut self, handle: ObjectHandle) -> Result<Dispatch, GameError> {
        let dispatch = runtime::dispatch(&self.ctx, handle)?;
        self.settle();
        Ok(dispatch)
    }

    /// Dispatches a click on the current scene's object with stable id `id`.
    pub fn click_id(&mut self, id: &str) -> Result<Dispatch, GameError> {
        match runtime::handle_for_id(&self.ctx, id) {
            Some(handle) => self.click(handle),
            None if !self.ctx.controller.borrow().has_started() => {
                Ok(Dispatch::Ignored(IgnoreReason::NotStarted))
            }
            None => {
                debug!("Click on unknown object id '{}' ignored", id);
                Ok(Dispatch::Ignored(IgnoreReason::NotMounted))
            }
        }
    }

    /// Acknowledges the dialogue line on screen.
    ///
    /// Returns false if no line was waiting.
    pub fn advance(&mut self) -> bool {
        let acknowledged = self.ctx.dialogue.borrow_mut().acknowledge();
        self.settle();
        acknowledged
    }

    /// Picks option `index` of the choice menu on screen.
    ///
    /// Returns false if no menu was waiting or `index` is out of range.
    pub fn choose(&mut self, index: usize) -> bool {
        let chosen = self.ctx.dialogue.borrow_mut().choose(index);
        self.settle();
        chosen
    }

    /// Reports the object under the pointer, or `None` when it left.
    pub fn hover(&mut self, handle: Option<ObjectHandle>) {
        self.ctx.cursor.borrow_mut().hover(handle);
        self.ctx.refresh_cursor();
    }

    //--- Host Loop --------------------------------------------------------

    /// Sender for hosts that feed input through the player event channel.
    pub fn sender(&self) -> Sender<PlayerEvent> {
        self.sender.clone()
    }

    /// Applies queued player events, runs pending work and fires due
    /// effect timers.
    ///
    /// Returns [`TickControl::Exit`] once the host sent
    /// [`PlayerEvent::Shutdown`] or every sender is gone.
    pub fn pump(&mut self) -> TickControl {
        let control = self.collector.collect_frame();

        for event in self.collector.take_events() {
            self.apply(event);
        }
        self.settle();

        if control == TickControl::Exit {
            info!("Game loop exiting");
        }
        control
    }

    /// Earliest instant at which a pending effect completes.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.ctx.effects.borrow().next_deadline()
    }

    fn apply(&mut self, event: PlayerEvent) {
        let outcome = match event {
            PlayerEvent::Click(handle) => self.click(handle).map(drop),
            PlayerEvent::ClickId(id) => self.click_id(&id).map(drop),
            PlayerEvent::Advance => {
                self.advance();
                Ok(())
            }
            PlayerEvent::Choose(index) => {
                self.choose(index);
                Ok(())
            }
            PlayerEvent::Hover(handle) => {
                self.hover(handle);
                Ok(())
            }
            PlayerEvent::Shutdown => Ok(()),
        };

        if let Err(err) = outcome {
            debug!("Player event rejected: {}", err);
        }
    }

    /// Runs the executor until no task can progress, firing due timers in
    /// between.
    fn settle(&mut self) {
        loop {
            self.pool.run_until_stalled();

            let now = self.ctx.clock.now();
            if self.ctx.effects.borrow_mut().fire_due(now) == 0 {
                break;
            }
        }
    }

    //--- Inspection -------------------------------------------------------

    /// Host-level view of the state store.
    ///
    /// Writes through this handle are never generation-checked.
    pub fn state(&self) -> StateStore {
        self.ctx.state.clone()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn current_scene(&self) -> Option<String> {
        self.session().map(|session| session.scene)
    }

    pub fn session(&self) -> Option<SceneSession> {
        self.ctx.controller.borrow().session().cloned()
    }

    pub fn phase(&self) -> ScenePhase {
        self.ctx.controller.borrow().phase()
    }

    pub fn generation(&self) -> Generation {
        self.ctx.generations.current()
    }

    /// Objects currently on stage, in paint order.
    pub fn mounted_objects(&self) -> Vec<MountedObject> {
        self.ctx.controller.borrow().mounted().to_vec()
    }

    /// Handle of the mounted object with stable id `id`.
    pub fn object_handle(&self, id: &str) -> Option<ObjectHandle> {
        self.ctx
            .controller
            .borrow()
            .mounted()
            .iter()
            .find(|object| object.id.as_deref() == Some(id))
            .map(|object| object.handle)
    }

    /// Kind of the prompt waiting for the player, if any.
    pub fn pending_prompt(&self) -> Option<PromptKind> {
        self.ctx.dialogue.borrow().pending_kind()
    }

    /// Returns true while a click handler is in flight.
    pub fn is_busy(&self) -> bool {
        self.ctx.runtime.borrow().is_busy()
    }

    /// Returns true once no transition is queued or running.
    pub fn is_settled(&self) -> bool {
        self.ctx.controller.borrow().is_settled()
    }

    /// Drains handler and hook failures recorded since the last call.
    pub fn take_errors(&self) -> Vec<GameError> {
        self.ctx.runtime.borrow_mut().take_errors()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests;
