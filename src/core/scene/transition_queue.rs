//=========================================================================
// Transition Queue
//=========================================================================
//
// FIFO of requested scene transitions.
//
// Handlers and hooks push here synchronously. The controller's driver
// task pops one transition at a time and runs it to completion before
// taking the next, so transitions apply exactly in issuance order.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

//=== Scene Transition ====================================================

/// A requested change of the scene on stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneTransition {
    /// Enter the first scene. No exit hook runs.
    Enter(String),

    /// Leave the current scene for another one.
    Go(String),
}

impl SceneTransition {
    /// Target scene of the transition.
    pub fn target(&self) -> &str {
        match self {
            Self::Enter(id) | Self::Go(id) => id,
        }
    }
}

//=== Transition Queue ====================================================

/// Queue for scene transitions awaiting the controller.
#[derive(Debug, Default)]
pub struct TransitionQueue {
    queue: VecDeque<SceneTransition>,
}

impl TransitionQueue {
    /// Creates a new empty transition queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a transition behind any already waiting.
    pub fn push(&mut self, transition: SceneTransition) {
        self.queue.push_back(transition);
    }

    /// Takes the oldest queued transition.
    pub fn pop(&mut self) -> Option<SceneTransition> {
        self.queue.pop_front()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of queued transitions.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
