//=========================================================================
// Scene Registry
//=========================================================================
//
// Maps scene identifiers to their immutable definitions.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::SceneDefinition;
use crate::core::error::GameError;

//=== SceneRegistry =======================================================

/// Owns every registered scene for the lifetime of the game.
#[derive(Debug, Default)]
pub struct SceneRegistry {
    scenes: HashMap<String, Rc<SceneDefinition>>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a scene under its own id.
    ///
    /// Registering the same id twice replaces the earlier definition. A
    /// scene already on stage keeps the definition it was entered with.
    pub fn register(&mut self, scene: SceneDefinition) {
        let id = scene.id.clone();
        debug!(
            "Registering scene '{}' ({} layers, {} objects)",
            id,
            scene.layers.len(),
            scene.objects.len()
        );
        if self.scenes.insert(id.clone(), Rc::new(scene)).is_some() {
            warn!("Scene '{}' was already registered and has been replaced", id);
        }
    }

    /// Looks up a scene definition.
    pub fn get(&self, id: &str) -> Option<Rc<SceneDefinition>> {
        self.scenes.get(id).cloned()
    }

    /// Looks up a scene definition, failing with `UnknownScene`.
    pub fn require(&self, id: &str) -> Result<Rc<SceneDefinition>, GameError> {
        self.get(id)
            .ok_or_else(|| GameError::UnknownScene(id.to_owned()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.scenes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::ObjectSpec;

    #[test]
    fn register_and_lookup() {
        let mut registry = SceneRegistry::new();
        registry.register(SceneDefinition::new("forest"));

        assert!(registry.contains("forest"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("forest").unwrap().id, "forest");
    }

    #[test]
    fn require_unknown_scene_fails() {
        let registry = SceneRegistry::new();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.require("gate"),
            Err(GameError::UnknownScene(id)) if id == "gate"
        ));
    }

    #[test]
    fn re_registration_replaces_definition() {
        let mut registry = SceneRegistry::new();
        registry.register(SceneDefinition::new("forest"));
        registry.register(SceneDefinition::new("forest").with_object(ObjectSpec::new("look")));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("forest").unwrap().objects.len(), 1);
    }

    #[test]
    fn lookups_share_the_same_definition() {
        let mut registry = SceneRegistry::new();
        registry.register(SceneDefinition::new("gate"));

        let a = registry.get("gate").unwrap();
        let b = registry.get("gate").unwrap();
        assert!(Rc::ptr_eq(&a, &b));
    }
}
