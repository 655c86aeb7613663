//=========================================================================
// Recording Presenter
//=========================================================================
//
// Presentation port that renders nothing and records every instruction.
//
// Clones share one log, so a host can hand one clone to the game and
// inspect the other.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use log::trace;

//=== Internal Dependencies ===============================================

use super::{CursorHint, PresentationPort};
use crate::core::config::GameConfig;
use crate::core::dialogue::{ChoiceOption, DialogueLine};
use crate::core::scene::{Layer, MountedObject};

//=== PresenterCall =======================================================

/// One recorded port instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterCall {
    Configure(GameConfig),
    MountLayers { scene: String, layers: Vec<Layer> },
    MountObjects(Vec<MountedObject>),
    UnmountAll,
    ShowLine(DialogueLine),
    ShowChoice { prompt: String, options: Vec<ChoiceOption> },
    DismissPrompt,
    Flash { color: String, duration: Duration },
    SetCursor(CursorHint),
}

//=== RecordingPresenter ==================================================

/// Port that keeps an in-memory log of instructions.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    log: Rc<RefCell<Vec<PresenterCall>>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every instruction so far.
    pub fn calls(&self) -> Vec<PresenterCall> {
        self.log.borrow().clone()
    }

    /// Drains the log.
    pub fn take(&self) -> Vec<PresenterCall> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    /// Number of recorded instructions matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&PresenterCall) -> bool) -> usize {
        self.log.borrow().iter().filter(|call| predicate(call)).count()
    }

    /// Stable ids of the most recent `mount_objects` call, if any.
    ///
    /// An `unmount_all` after it yields an empty list.
    pub fn mounted_ids(&self) -> Vec<String> {
        for call in self.log.borrow().iter().rev() {
            match call {
                PresenterCall::MountObjects(objects) => {
                    return objects.iter().filter_map(|o| o.id.clone()).collect();
                }
                PresenterCall::UnmountAll => return Vec::new(),
                _ => {}
            }
        }
        Vec::new()
    }

    /// Text of every line shown so far.
    pub fn spoken_lines(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|call| match call {
                PresenterCall::ShowLine(line) => Some(line.text.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, call: PresenterCall) {
        trace!("Presenter: {:?}", call);
        self.log.borrow_mut().push(call);
    }
}

impl PresentationPort for RecordingPresenter {
    fn configure(&mut self, config: &GameConfig) {
        self.record(PresenterCall::Configure(config.clone()));
    }

    fn mount_layers(&mut self, scene: &str, layers: &[Layer]) {
        self.record(PresenterCall::MountLayers {
            scene: scene.to_owned(),
            layers: layers.to_vec(),
        });
    }

    fn mount_objects(&mut self, objects: &[MountedObject]) {
        self.record(PresenterCall::MountObjects(objects.to_vec()));
    }

    fn unmount_all(&mut self) {
        self.record(PresenterCall::UnmountAll);
    }

    fn show_line(&mut self, line: &DialogueLine) {
        self.record(PresenterCall::ShowLine(line.clone()));
    }

    fn show_choice(&mut self, prompt: &str, options: &[ChoiceOption]) {
        self.record(PresenterCall::ShowChoice {
            prompt: prompt.to_owned(),
            options: options.to_vec(),
        });
    }

    fn dismiss_prompt(&mut self) {
        self.record(PresenterCall::DismissPrompt);
    }

    fn flash(&mut self, color: &str, duration: Duration) {
        self.record(PresenterCall::Flash {
            color: color.to_owned(),
            duration,
        });
    }

    fn set_cursor(&mut self, cursor: &CursorHint) {
        self.record(PresenterCall::SetCursor(cursor.clone()));
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
