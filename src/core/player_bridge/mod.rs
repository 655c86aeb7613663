//=========================================================================
// Player Bridge
//=========================================================================
//
// Bridges host input (clicks, prompt responses) into the game.
//
// Hosts either call the `Game` methods directly or push `PlayerEvent`s
// into a bounded channel that `Game::pump()` drains once per frame.
//
// Components:
// - `interface`: Event types crossing from host to core (the contract)
// - `event_collector`: Core-side bounded draining of the channel
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Public API ==========================================================

pub use event_collector::TickControl;
pub use interface::PlayerEvent;

pub(crate) use event_collector::EventCollector;
