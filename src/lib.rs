//=========================================================================
// Diorama Engine — Library Root
//
// Runtime for layered, point-and-click narrative scenes.
//
// Responsibilities:
// - Expose the host-facing facade (`Game`, `GameBuilder`)
// - Expose the authoring types (scenes, objects, actions, dialogue)
// - Keep scheduling and bookkeeping internal to the crate
//
// Typical usage:
// ```
// use diorama_engine::prelude::*;
//
// let mut game = Game::new(RecordingPresenter::new());
// game.register_scene(
//     SceneDefinition::new("forest")
//         .with_object(ObjectSpec::new("openChest").with_id("chest")),
// );
// game.action("openChest", |state, _api| async move {
//     state.set("hasKey", true);
//     Ok(())
// });
//
// game.start("forest").unwrap();
// game.click_id("chest").unwrap();
// assert!(game.state().get_bool("hasKey"));
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the state store, scene controller, action runtime, dialogue
// channel and presentation contract. Most hosts only need the prelude.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` defines the `Game` facade and its builder.
//
mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{Game, GameBuilder};
