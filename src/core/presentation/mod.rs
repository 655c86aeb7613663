//=========================================================================
// Presentation Port
//=========================================================================
//
// Core-to-renderer contract.
//
// The core instructs; the port renders. Player responses to prompts come
// back through the player bridge, and effect timing is kept by the core
// clock, so every port method is a plain synchronous instruction.
//
// Components:
// - `PresentationPort`: the trait implemented by renderers
// - `CursorHint`: cursor affordance requested by the core
// - `recording`: a port that records instructions (headless hosts, tests)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::config::GameConfig;
use crate::core::dialogue::{ChoiceOption, DialogueLine};
use crate::core::scene::{Layer, MountedObject, ObjectHandle};

//=== Module Declarations =================================================

mod recording;

//=== Public API ==========================================================

pub use recording::{PresenterCall, RecordingPresenter};

//=== CursorHint ==========================================================

/// Cursor affordance the core asks the port to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorHint {
    /// Nothing interactive under the pointer.
    Idle,

    /// Pointer is over a clickable object.
    Interactive { label: Option<String> },

    /// A handler or transition is running; clicks are ignored.
    Busy,
}

//=== PresentationPort ====================================================

/// External collaborator that renders what the core instructs.
///
/// Implementations must not call back into the game from these methods.
pub trait PresentationPort {
    /// Receives the construction options once, before anything is mounted.
    fn configure(&mut self, _config: &GameConfig) {}

    /// Mounts the layers of `scene`, farthest first as declared.
    fn mount_layers(&mut self, scene: &str, layers: &[Layer]);

    /// Replaces the mounted objects with `objects`, in paint order.
    fn mount_objects(&mut self, objects: &[MountedObject]);

    /// Removes every layer and object of the outgoing scene.
    fn unmount_all(&mut self);

    /// Shows one dialogue line and waits for the player to acknowledge it.
    fn show_line(&mut self, line: &DialogueLine);

    /// Shows a choice menu and waits for the player to pick an option.
    fn show_choice(&mut self, prompt: &str, options: &[ChoiceOption]);

    /// Hides the dialogue box once a prompt is resolved or discarded.
    fn dismiss_prompt(&mut self);

    /// Overlays `color` for `duration`, then fades it out.
    fn flash(&mut self, color: &str, duration: Duration);

    /// Updates the cursor affordance.
    fn set_cursor(&mut self, cursor: &CursorHint);
}

//=== CursorTracker =======================================================

/// Remembers the hovered object and the cursor last sent to the port.
#[derive(Debug, Default)]
pub(crate) struct CursorTracker {
    hovered: Option<ObjectHandle>,
    shown: Option<CursorHint>,
}

impl CursorTracker {
    pub(crate) fn hover(&mut self, handle: Option<ObjectHandle>) {
        self.hovered = handle;
    }

    pub(crate) fn hovered(&self) -> Option<ObjectHandle> {
        self.hovered
    }

    /// Records `hint` and returns it if it differs from what is shown.
    pub(crate) fn update(&mut self, hint: CursorHint) -> Option<CursorHint> {
        if self.shown.as_ref() == Some(&hint) {
            return None;
        }
        self.shown = Some(hint.clone());
        Some(hint)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_suppresses_repeated_hints() {
        let mut tracker = CursorTracker::default();
        assert_eq!(tracker.update(CursorHint::Busy), Some(CursorHint::Busy));
        assert_eq!(tracker.update(CursorHint::Busy), None);
        assert_eq!(tracker.update(CursorHint::Idle), Some(CursorHint::Idle));
    }

    #[test]
    fn tracker_remembers_hover() {
        let mut tracker = CursorTracker::default();
        assert_eq!(tracker.hovered(), None);

        let handle = ObjectHandle {
            generation: Default::default(),
            index: 2,
        };
        tracker.hover(Some(handle));
        assert_eq!(tracker.hovered(), Some(handle));
    }
}
