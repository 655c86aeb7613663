//=========================================================================
// Global Game State
//=========================================================================
//
// The shared context every handler, hook and driver task closes over.
//
// Architecture:
//   Game (host facade, owns the executor)
//     └─ Rc<GameContext>
//          ├─ data: StateStore + GenerationTracker
//          ├─ registries: SceneRegistry + ActionRegistry
//          ├─ systems: SceneController + ActionRuntime
//          │           + DialogueChannel + EffectTimers
//          └─ port: Box<dyn PresentationPort>
//
//=========================================================================

//=== Module Declarations =================================================

mod game_context;

//=== Internal API ========================================================

pub(crate) use game_context::GameContext;
