//=========================================================================
// Visibility
//=========================================================================
//
// Recomputes which objects of a scene are on stage.
//
// Objects are filtered, never mutated: every render builds a fresh list
// in declaration order, which is also the paint order handed to the
// presentation port.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{Generation, MountedObject, ObjectHandle, SceneDefinition};
use crate::core::state::StateStore;

/// Returns the visible objects of `scene` under `state`, in declaration order.
pub fn visible_objects(
    scene: &SceneDefinition,
    state: &StateStore,
    generation: Generation,
) -> Vec<MountedObject> {
    scene
        .objects
        .iter()
        .enumerate()
        .filter(|(_, spec)| spec.is_visible(state))
        .map(|(index, spec)| MountedObject::from_spec(ObjectHandle { generation, index }, spec))
        .collect()
}

//=========================================================================
// Unit Tests
//=========================================================================
