//=========================================================================
// Scene System
//=========================================================================
//
// Declarative scene definitions and the controller that stages them.
//
// Architecture:
//   SceneRegistry
//     └─ scenes: HashMap<String, Rc<SceneDefinition>>
//   SceneController
//     ├─ session: SceneSession (scene + generation)
//     ├─ queue: TransitionQueue (FIFO of requested transitions)
//     └─ mounted: Vec<MountedObject>
//
// Flow:
//   go() → TransitionQueue → drive_transitions()
//        → on_exit → advance generation → unmount
//        → mount layers → visible_objects() → on_enter → Active
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::action::{hook, ActionApi, ActionRef, HookHandler};
use crate::core::state::StateStore;

//=== Module Declarations =================================================

pub(crate) mod controller;
mod registry;
mod session;
mod transition_queue;
mod visibility;

//=== Public API ==========================================================

pub use controller::ScenePhase;
pub use registry::SceneRegistry;
pub use session::{Generation, SceneSession};
pub use transition_queue::{SceneTransition, TransitionQueue};
pub use visibility::visible_objects;

pub(crate) use session::GenerationTracker;

//=== PresentationFragment ================================================

/// Opaque visual payload forwarded verbatim to the presentation port.
///
/// The core never parses or validates any of these fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PresentationFragment {
    /// Markup fragment.
    pub html: Option<String>,
    /// Inline style fragment.
    pub style: Option<String>,
    /// Class list.
    pub class_name: Option<String>,
}

impl PresentationFragment {
    /// Returns true if every field is empty.
    pub fn is_empty(&self) -> bool {
        self.html.is_none() && self.style.is_none() && self.class_name.is_none()
    }
}

//=== Position ============================================================

/// One axis of an object's position. Interpreted by the presentation port.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Coordinate {
    /// Percentage of the container.
    Percent(f64),
    /// Absolute units.
    Pixels(f64),
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::Percent(0.0)
    }
}

/// 2-D placement of an object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: Coordinate,
    pub y: Coordinate,
}

impl Position {
    /// Position in container percentages.
    pub const fn percent(x: f64, y: f64) -> Self {
        Self {
            x: Coordinate::Percent(x),
            y: Coordinate::Percent(y),
        }
    }

    /// Position in absolute units.
    pub const fn pixels(x: f64, y: f64) -> Self {
        Self {
            x: Coordinate::Pixels(x),
            y: Coordinate::Pixels(y),
        }
    }
}

//=== Layer ===============================================================

/// Depth-tagged, non-interactive slice of a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// More negative is farther from the viewer. A rendering hint only.
    pub depth: f64,
    pub content: PresentationFragment,
}

impl Layer {
    pub fn new(depth: f64) -> Self {
        Self {
            depth,
            content: PresentationFragment::default(),
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.content.html = Some(html.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.content.style = Some(style.into());
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.content.class_name = Some(class_name.into());
        self
    }
}

//=== ObjectSpec ==========================================================

/// Visibility predicate evaluated against the state store on every render.
pub type Condition = Rc<dyn Fn(&StateStore) -> bool>;

/// Declaration of a clickable object.
#[derive(Clone)]
pub struct ObjectSpec {
    pub id: Option<String>,
    pub depth: f64,
    pub position: Position,
    pub content: PresentationFragment,
    /// Hover label.
    pub label: Option<String>,
    pub action: ActionRef,
    /// Absent means always visible.
    pub condition: Option<Condition>,
}

impl ObjectSpec {
    /// Creates an object bound to `action` (a registered name or an inline handler).
    pub fn new(action: impl Into<ActionRef>) -> Self {
        Self {
            id: None,
            depth: 0.0,
            position: Position::default(),
            content: PresentationFragment::default(),
            label: None,
            action: action.into(),
            condition: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = depth;
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.content.html = Some(html.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.content.style = Some(style.into());
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.content.class_name = Some(class_name.into());
        self
    }

    /// Only include this object while `condition` holds.
    pub fn visible_when<F>(mut self, condition: F) -> Self
    where
        F: Fn(&StateStore) -> bool + 'static,
    {
        self.condition = Some(Rc::new(condition));
        self
    }

    /// Evaluates the visibility condition against `state`.
    pub fn is_visible(&self, state: &StateStore) -> bool {
        self.condition.as_ref().map_or(true, |condition| condition(state))
    }
}

impl fmt::Debug for ObjectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectSpec")
            .field("id", &self.id)
            .field("depth", &self.depth)
            .field("position", &self.position)
            .field("label", &self.label)
            .field("action", &self.action)
            .field("conditional", &self.condition.is_some())
            .finish()
    }
}

//=== ObjectHandle & MountedObject ========================================

/// Identifies one mounted object within one scene session.
///
/// `index` is the object's position in the scene's declared object list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    pub generation: Generation,
    pub index: usize,
}

/// Visual view of a visible object, as handed to the presentation port.
#[derive(Debug, Clone, PartialEq)]
pub struct MountedObject {
    /// Handle to report back on click or hover.
    pub handle: ObjectHandle,
    pub id: Option<String>,
    pub depth: f64,
    pub position: Position,
    pub content: PresentationFragment,
    pub label: Option<String>,
}

impl MountedObject {
    pub(crate) fn from_spec(handle: ObjectHandle, spec: &ObjectSpec) -> Self {
        Self {
            handle,
            id: spec.id.clone(),
            depth: spec.depth,
            position: spec.position,
            content: spec.content.clone(),
            label: spec.label.clone(),
        }
    }
}

//=== SceneDefinition =====================================================

/// Declarative scene: layers, objects and optional lifecycle hooks.
///
/// Immutable once registered; the registry shares it behind an `Rc`.
#[derive(Clone)]
pub struct SceneDefinition {
    pub id: String,
    pub layers: Vec<Layer>,
    pub objects: Vec<ObjectSpec>,
    pub on_enter: Option<HookHandler>,
    pub on_exit: Option<HookHandler>,
}

impl SceneDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            layers: Vec::new(),
            objects: Vec::new(),
            on_enter: None,
            on_exit: None,
        }
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Adds an object. Declaration order is paint order at equal depth.
    pub fn with_object(mut self, object: ObjectSpec) -> Self {
        self.objects.push(object);
        self
    }

    /// Hook run after the scene's layers and objects are mounted.
    pub fn on_enter<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(ActionApi) -> Fut + 'static,
        Fut: std::future::Future<Output = anyhow::Result<()>> + 'static,
    {
        self.on_enter = Some(hook(f));
        self
    }

    /// Hook run before the scene is torn down by a transition.
    pub fn on_exit<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(ActionApi) -> Fut + 'static,
        Fut: std::future::Future<Output = anyhow::Result<()>> + 'static,
    {
        self.on_exit = Some(hook(f));
        self
    }

    /// Finds the declared index of the object with stable id `id`.
    pub fn object_index(&self, id: &str) -> Option<usize> {
        self.objects
            .iter()
            .position(|object| object.id.as_deref() == Some(id))
    }
}

impl fmt::Debug for SceneDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneDefinition")
            .field("id", &self.id)
            .field("layers", &self.layers)
            .field("objects", &self.objects)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
