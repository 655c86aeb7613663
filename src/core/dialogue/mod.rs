//=========================================================================
// Dialogue / Choice Channel
//=========================================================================
//
// Suspend/resume primitive behind `say` and `choice`.
//
// Architecture:
//   ActionApi::say/choice ──begin_call()──> DialogueChannel
//                          ──issue_*()────> PendingPrompt (oneshot)
//   Player input ─────────acknowledge()/choose()──> resolves responder
//   Scene transition ─────discard_stale()──> drops responder
//
// At most one prompt is outstanding. Dropping a responder wakes the
// awaiting call with a cancellation, which it reports as stale work.
//
//=========================================================================

//=== External Dependencies ===============================================

use futures::channel::oneshot;
use log::debug;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::error::GameError;
use crate::core::scene::Generation;
use crate::core::state::Value;

//=== DialogueLine ========================================================

/// One line of narration or speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub speaker: Option<String>,
    pub text: String,
}

impl DialogueLine {
    /// Narration without a speaker.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            speaker: None,
            text: text.into(),
        }
    }

    /// A line attributed to `speaker`.
    pub fn spoken(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: Some(speaker.into()),
            text: text.into(),
        }
    }
}

impl From<&str> for DialogueLine {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for DialogueLine {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<(&str, &str)> for DialogueLine {
    fn from((speaker, text): (&str, &str)) -> Self {
        Self::spoken(speaker, text)
    }
}

//=== ChoiceOption ========================================================

/// One selectable option of a choice menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub text: String,
    /// Returned from `choice` when this option is picked.
    pub value: Value,
}

impl ChoiceOption {
    pub fn new(text: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }
}

//=== PromptKind ==========================================================

/// Kind of prompt awaiting the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Line,
    Choice,
}

impl PromptKind {
    fn label(self) -> &'static str {
        match self {
            Self::Line => "dialogue",
            Self::Choice => "choice",
        }
    }
}

//=== PendingPrompt =======================================================

enum Responder {
    Line(oneshot::Sender<()>),
    Choice {
        values: Vec<Value>,
        sender: oneshot::Sender<Value>,
    },
}

/// The prompt currently on screen.
struct PendingPrompt {
    call: u64,
    generation: Generation,
    responder: Responder,
}

impl PendingPrompt {
    fn kind(&self) -> PromptKind {
        match self.responder {
            Responder::Line(_) => PromptKind::Line,
            Responder::Choice { .. } => PromptKind::Choice,
        }
    }
}

struct ActiveCall {
    token: u64,
    kind: PromptKind,
    generation: Generation,
}

//=== DialogueChannel =====================================================

/// Tracks the single outstanding `say`/`choice` call and its prompt.
///
/// A call spans every line of a `say`; the prompt is the one line (or
/// menu) currently waiting for input.
#[derive(Default)]
pub(crate) struct DialogueChannel {
    active: Option<ActiveCall>,
    pending: Option<PendingPrompt>,
    next_token: u64,
}

impl DialogueChannel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Claims the channel for a new call.
    pub(crate) fn begin_call(
        &mut self,
        kind: PromptKind,
        generation: Generation,
    ) -> Result<u64, GameError> {
        if let Some(active) = &self.active {
            return Err(GameError::PromptPending(active.kind.label()));
        }
        self.next_token += 1;
        let token = self.next_token;
        self.active = Some(ActiveCall {
            token,
            kind,
            generation,
        });
        Ok(token)
    }

    /// Releases the channel. Returns true if the call's prompt was still
    /// on screen (the call was abandoned mid-prompt).
    pub(crate) fn end_call(&mut self, token: u64) -> bool {
        if self.active.as_ref().map(|a| a.token) == Some(token) {
            self.active = None;
        }
        if self.pending.as_ref().map(|p| p.call) == Some(token) {
            self.pending = None;
            return true;
        }
        false
    }

    /// Puts a line on hold until the player acknowledges it.
    pub(crate) fn issue_line(&mut self, token: u64, generation: Generation) -> oneshot::Receiver<()> {
        let (sender, receiver) = oneshot::channel();
        self.pending = Some(PendingPrompt {
            call: token,
            generation,
            responder: Responder::Line(sender),
        });
        receiver
    }

    /// Puts a choice menu on hold until the player selects an option.
    pub(crate) fn issue_choice(
        &mut self,
        token: u64,
        generation: Generation,
        values: Vec<Value>,
    ) -> oneshot::Receiver<Value> {
        let (sender, receiver) = oneshot::channel();
        self.pending = Some(PendingPrompt {
            call: token,
            generation,
            responder: Responder::Choice { values, sender },
        });
        receiver
    }

    /// Kind of the prompt awaiting input, if any.
    pub(crate) fn pending_kind(&self) -> Option<PromptKind> {
        self.pending.as_ref().map(PendingPrompt::kind)
    }

    /// Player acknowledged the current line.
    pub(crate) fn acknowledge(&mut self) -> bool {
        match self.pending.take() {
            Some(PendingPrompt {
                responder: Responder::Line(sender),
                ..
            }) => sender.send(()).is_ok(),
            other => {
                if other.is_some() {
                    debug!("Acknowledge ignored: a choice is pending");
                } else {
                    debug!("Acknowledge ignored: no prompt pending");
                }
                self.pending = other;
                false
            }
        }
    }

    /// Player selected option `index` of the current menu.
    ///
    /// Out-of-range indices and selections with no menu pending are
    /// ignored. Once an option is chosen the menu is gone, so later
    /// selections are ignored too.
    pub(crate) fn choose(&mut self, index: usize) -> bool {
        let in_range = matches!(
            &self.pending,
            Some(PendingPrompt { responder: Responder::Choice { values, .. }, .. }) if index < values.len()
        );
        if !in_range {
            debug!("Selection {} ignored: no matching choice pending", index);
            return false;
        }

        match self.pending.take() {
            Some(PendingPrompt {
                responder: Responder::Choice { mut values, sender },
                ..
            }) => sender.send(values.swap_remove(index)).is_ok(),
            _ => false,
        }
    }

    /// Drops any prompt or call that does not belong to `current`.
    ///
    /// Returns true if a prompt was on screen and should be dismissed.
    pub(crate) fn discard_stale(&mut self, current: Generation) -> bool {
        if self.active.as_ref().is_some_and(|a| a.generation != current) {
            self.active = None;
        }
        match &self.pending {
            Some(prompt) if prompt.generation != current => {
                debug!(
                    "Discarding {} prompt from stale generation {}",
                    prompt.kind().label(),
                    prompt.generation
                );
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
