//=========================================================================
// Action API
//=========================================================================
//
// Capability bundle handed to every handler and lifecycle hook.
//
// Each bundle is bound to the scene generation that was live when it was
// created. Once a transition supersedes that generation every capability
// fails with `StaleGeneration` without reaching the presentation port.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::dialogue::{ChoiceOption, DialogueLine, PromptKind};
use crate::core::error::GameError;
use crate::core::globals::GameContext;
use crate::core::scene::{controller, Generation};
use crate::core::state::{GameState, Value};

//=== ActionApi ===========================================================

/// Scene, dialogue and effect capabilities of one handler invocation.
#[derive(Clone)]
pub struct ActionApi {
    ctx: Rc<GameContext>,
    generation: Generation,
}

impl ActionApi {
    pub(crate) fn new(ctx: Rc<GameContext>, generation: Generation) -> Self {
        Self { ctx, generation }
    }

    /// Generation this bundle is bound to.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns true while the bound scene session is still on stage.
    pub fn is_live(&self) -> bool {
        self.ctx.generations.is_current(self.generation)
    }

    /// State accessor bound to the same generation.
    pub fn state(&self) -> GameState {
        self.ctx.game_state(self.generation)
    }

    //--- Scenes -----------------------------------------------------------

    /// Queues a transition to `scene_id`.
    ///
    /// Returns as soon as the transition is queued. It runs once the
    /// current handler yields or finishes.
    pub fn go(&self, scene_id: &str) -> Result<(), GameError> {
        self.ensure_live()?;
        controller::request_go(&self.ctx, scene_id)
    }

    /// Re-evaluates object visibility after state changes.
    ///
    /// Returns true if the mounted object list changed.
    pub fn reload(&self) -> Result<bool, GameError> {
        controller::reload(&self.ctx, self.generation)
    }

    //--- Dialogue ---------------------------------------------------------

    /// Shows `lines` one at a time, each waiting for the player to advance.
    ///
    /// Resolves after the last line is acknowledged. Fails with
    /// `PromptPending` if another `say` or `choice` is outstanding.
    pub async fn say<I>(&self, lines: I) -> Result<(), GameError>
    where
        I: IntoIterator,
        I::Item: Into<DialogueLine>,
    {
        self.ensure_live()?;
        let lines: Vec<DialogueLine> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            return Ok(());
        }

        let call = PromptCall::begin(&self.ctx, PromptKind::Line, self.generation)?;
        for line in &lines {
            self.ensure_live()?;
            let acknowledged = self
                .ctx
                .dialogue
                .borrow_mut()
                .issue_line(call.token, self.generation);
            self.ctx.present(|port| port.show_line(line));

            if acknowledged.await.is_err() {
                return Err(self.stale());
            }
        }
        call.finish();
        Ok(())
    }

    /// Shows a menu and resolves with the value of the picked option.
    pub async fn choice<I>(&self, prompt: impl Into<String>, options: I) -> Result<Value, GameError>
    where
        I: IntoIterator<Item = ChoiceOption>,
    {
        self.ensure_live()?;
        let prompt = prompt.into();
        let options: Vec<ChoiceOption> = options.into_iter().collect();
        if options.is_empty() {
            return Err(GameError::EmptyChoice(prompt));
        }

        let call = PromptCall::begin(&self.ctx, PromptKind::Choice, self.generation)?;
        let values = options.iter().map(|option| option.value.clone()).collect();
        let selection = self
            .ctx
            .dialogue
            .borrow_mut()
            .issue_choice(call.token, self.generation, values);
        self.ctx.present(|port| port.show_choice(&prompt, &options));

        let value = selection.await.map_err(|_| self.stale())?;
        call.finish();
        Ok(value)
    }

    //--- Effects ----------------------------------------------------------

    /// Overlays `color` and resolves once `duration` has elapsed.
    pub async fn flash(&self, color: &str, duration: Duration) -> Result<(), GameError> {
        self.ensure_live()?;
        let deadline = self.ctx.clock.now() + duration;
        let elapsed = self.ctx.effects.borrow_mut().schedule(deadline);
        self.ctx.present(|port| port.flash(color, duration));

        elapsed.await.map_err(|_| GameError::ShutDown)?;
        self.ensure_live()
    }

    //--- Helpers ----------------------------------------------------------

    fn ensure_live(&self) -> Result<(), GameError> {
        if self.is_live() {
            Ok(())
        } else {
            Err(self.stale())
        }
    }

    fn stale(&self) -> GameError {
        GameError::StaleGeneration(self.generation.value())
    }
}

impl fmt::Debug for ActionApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionApi")
            .field("generation", &self.generation)
            .field("live", &self.is_live())
            .finish()
    }
}

//=== PromptCall ==========================================================

/// Holds the dialogue channel for one `say`/`choice`.
///
/// Releases the channel on drop, including when the awaiting handler is
/// dropped mid-prompt, and hides the dialogue box if it is still showing.
struct PromptCall {
    ctx: Rc<GameContext>,
    token: u64,
    resolved: bool,
}

impl PromptCall {
    fn begin(ctx: &Rc<GameContext>, kind: PromptKind, generation: Generation) -> Result<Self, GameError> {
        let token = ctx.dialogue.borrow_mut().begin_call(kind, generation)?;
        Ok(Self {
            ctx: Rc::clone(ctx),
            token,
            resolved: false,
        })
    }

    fn finish(mut self) {
        self.resolved = true;
    }
}

impl Drop for PromptCall {
    fn drop(&mut self) {
        let abandoned = match self.ctx.dialogue.try_borrow_mut() {
            Ok(mut dialogue) => dialogue.end_call(self.token),
            Err(_) => false,
        };
        if self.resolved || abandoned {
            if let Ok(mut port) = self.ctx.port.try_borrow_mut() {
                port.dismiss_prompt();
            }
        }
    }
}
