//=========================================================================
// Core Systems
//
// Everything behind the `Game` facade.
//
// Responsibilities:
// - Hold narrative state and notify observers of changes
// - Stage scenes and apply queued transitions in issuance order
// - Dispatch clicks to authored handlers, one at a time
// - Suspend handlers on dialogue, choice menus and timed effects
// - Instruct the presentation port; never render anything itself
//
// Notes:
// All systems run on the host's thread under one cooperative executor.
// A scene transition advances the generation tag, which is how work
// started under the previous scene finds out it has been superseded.
//
//=========================================================================

//=== Public Modules ======================================================

pub mod action;
pub mod clock;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod player_bridge;
pub mod presentation;
pub mod scene;
pub mod state;

//=== Internal Modules ====================================================

pub(crate) mod effects;
pub(crate) mod globals;
