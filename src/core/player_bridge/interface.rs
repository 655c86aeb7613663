//=========================================================================
// Player Bridge Interface
//=========================================================================
//
// Host-to-core input events.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::scene::ObjectHandle;

//=== PlayerEvent =========================================================

/// Discrete player input, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// A mounted object was clicked.
    Click(ObjectHandle),

    /// The object with this stable id was clicked.
    ClickId(String),

    /// The current dialogue line was acknowledged.
    Advance,

    /// Option `n` of the current choice menu was selected.
    Choose(usize),

    /// The pointer entered an object, or left all objects.
    Hover(Option<ObjectHandle>),

    /// The host is tearing the game down.
    Shutdown,
}
