//=========================================================================
// Effect Timers
//=========================================================================
//
// Deadlines for timed presentation effects (screen flashes).
//
// The presentation port draws the effect; the core only decides when the
// awaiting call may resume. Timers fire when the host pumps the game and
// the clock has reached their deadline.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Instant;

use futures::channel::oneshot;

//=== EffectTimers ========================================================

struct PendingEffect {
    deadline: Instant,
    done: oneshot::Sender<()>,
}

/// Outstanding effect deadlines.
#[derive(Default)]
pub(crate) struct EffectTimers {
    pending: Vec<PendingEffect>,
}

impl EffectTimers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a deadline; the receiver resolves once it has passed.
    pub(crate) fn schedule(&mut self, deadline: Instant) -> oneshot::Receiver<()> {
        let (done, receiver) = oneshot::channel();
        self.pending.push(PendingEffect { deadline, done });
        receiver
    }

    /// Resolves every timer due at `now`. Returns how many fired.
    pub(crate) fn fire_due(&mut self, now: Instant) -> usize {
        let (due, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|effect| effect.deadline <= now);
        self.pending = waiting;

        let fired = due.len();
        for effect in due {
            // The awaiting call may already be gone; nothing to resume then.
            let _ = effect.done.send(());
        }
        fired
    }

    /// Earliest outstanding deadline.
    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|effect| effect.deadline).min()
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
