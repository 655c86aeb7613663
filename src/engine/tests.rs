//=========================================================================
// Game Scenario Tests
//=========================================================================
//
// End-to-end behaviour of `Game` against a recording presenter.
//
//=========================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use serde_json::json;

use super::*;
use crate::core::action::ActionRef;
use crate::core::clock::ManualClock;
use crate::core::dialogue::ChoiceOption;
use crate::core::presentation::{CursorHint, PresenterCall, RecordingPresenter};
use crate::core::scene::{Layer, ObjectSpec};

//=== Fixtures ============================================================

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn setup() -> (Game, RecordingPresenter) {
    init_logger();
    let presenter = RecordingPresenter::new();
    let game = GameBuilder::new().build(presenter.clone());
    (game, presenter)
}

fn setup_with_clock() -> (Game, RecordingPresenter, ManualClock) {
    init_logger();
    let presenter = RecordingPresenter::new();
    let clock = ManualClock::new();
    let game = GameBuilder::new()
        .with_clock(clock.clone())
        .build(presenter.clone());
    (game, presenter, clock)
}

/// Forest with a chest holding the key, and a gate that needs it.
///
/// Returns the number of times the gate has been entered.
fn forest_and_gate(game: &Game) -> Rc<Cell<u32>> {
    let gate_entries = Rc::new(Cell::new(0));
    let entries = Rc::clone(&gate_entries);
    game.register_scene(
        SceneDefinition::new("forest")
            .with_layer(Layer::new(-200.0).with_class("sky"))
            .with_layer(Layer::new(-50.0).with_class("trees"))
            .with_object(
                ObjectSpec::new("openChest")
                    .with_id("chest")
                    .with_label("Old chest"),
            ),
    );
    game.register_scene(
        SceneDefinition::new("gate")
            .with_object(
                ObjectSpec::new("unlockGate")
                    .with_id("gate")
                    .visible_when(|state| state.get_bool("hasKey")),
            )
            .on_enter(move |_api| {
                entries.set(entries.get() + 1);
                async { Ok(()) }
            }),
    );
    game.action("openChest", |state, api| async move {
        state.set("hasKey", true);
        api.say(["A rusty key!"]).await?;
        api.go("gate")?;
        Ok(())
    });
    gate_entries
}

fn single_object_scene(id: &str, action: impl Into<ActionRef>) -> SceneDefinition {
    SceneDefinition::new(id).with_object(ObjectSpec::new(action).with_id("thing"))
}

fn position_of(calls: &[PresenterCall], wanted: &PresenterCall) -> Option<usize> {
    calls.iter().position(|call| call == wanted)
}

fn last_cursor(presenter: &RecordingPresenter) -> Option<CursorHint> {
    presenter.calls().into_iter().rev().find_map(|call| match call {
        PresenterCall::SetCursor(hint) => Some(hint),
        _ => None,
    })
}

type Trace = Rc<RefCell<Vec<String>>>;

/// Scene whose hooks append `enter <id>` / `exit <id>` to `trace`.
fn traced_scene(id: &str, trace: &Trace) -> SceneDefinition {
    let enter_trace = Rc::clone(trace);
    let exit_trace = Rc::clone(trace);
    let enter_entry = format!("enter {id}");
    let exit_entry = format!("exit {id}");

    SceneDefinition::new(id)
        .with_object(ObjectSpec::new("hop").with_id("door"))
        .on_enter(move |_api| {
            let trace = Rc::clone(&enter_trace);
            let entry = enter_entry.clone();
            async move {
                trace.borrow_mut().push(entry);
                Ok(())
            }
        })
        .on_exit(move |_api| {
            let trace = Rc::clone(&exit_trace);
            let entry = exit_entry.clone();
            async move {
                trace.borrow_mut().push(entry);
                Ok(())
            }
        })
}

//=========================================================================
// GameBuilder Tests
//=========================================================================

#[test]
fn builder_defaults() {
    let builder = GameBuilder::new();
    assert_eq!(builder.channel_capacity, 128);
    assert_eq!(builder.config, GameConfig::default());
    assert!(builder.clock.is_none());
}

#[test]
#[should_panic(expected = "Channel capacity must be positive")]
fn builder_with_channel_capacity_panics_on_zero() {
    GameBuilder::new().with_channel_capacity(0);
}

#[test]
fn build_forwards_config_to_port_first() {
    init_logger();
    let presenter = RecordingPresenter::new();
    let config = GameConfig {
        cursor_color: "#ff0000".into(),
        ..GameConfig::default()
    };
    let game = GameBuilder::new()
        .with_config(config.clone())
        .build(presenter.clone());

    assert_eq!(presenter.calls(), [PresenterCall::Configure(config.clone())]);
    assert_eq!(game.config(), &config);
    assert_eq!(game.phase(), ScenePhase::Idle);
}

//=========================================================================
// Scene Lifecycle Tests
//=========================================================================

#[test]
fn start_mounts_layers_then_visible_objects() {
    let (mut game, presenter) = setup();
    forest_and_gate(&game);

    game.start("forest").unwrap();

    assert_eq!(game.current_scene().as_deref(), Some("forest"));
    assert_eq!(game.phase(), ScenePhase::Active);
    assert_eq!(game.generation().value(), 1);
    assert!(game.is_settled());

    let calls = presenter.calls();
    let layers = calls
        .iter()
        .position(|call| matches!(call, PresenterCall::MountLayers { scene, .. } if scene == "forest"))
        .unwrap();
    let objects = calls
        .iter()
        .position(|call| matches!(call, PresenterCall::MountObjects(_)))
        .unwrap();
    assert!(layers < objects);
    assert_eq!(presenter.mounted_ids(), ["chest"]);
    assert_eq!(last_cursor(&presenter), Some(CursorHint::Idle));
}

#[test]
fn start_and_go_validate_their_targets() {
    let (mut game, _presenter) = setup();
    forest_and_gate(&game);

    assert!(matches!(game.go("gate"), Err(GameError::NotStarted)));
    assert!(matches!(game.start("nowhere"), Err(GameError::UnknownScene(id)) if id == "nowhere"));
    assert_eq!(game.phase(), ScenePhase::Idle);

    game.start("forest").unwrap();
    assert!(matches!(game.start("gate"), Err(GameError::AlreadyStarted(id)) if id == "forest"));

    assert!(matches!(game.go("nowhere"), Err(GameError::UnknownScene(_))));
    assert_eq!(game.current_scene().as_deref(), Some("forest"));
    assert_eq!(game.generation().value(), 1);
}

#[test]
fn queued_transitions_run_in_order_with_exit_before_enter() {
    let (mut game, _presenter) = setup();
    let trace: Trace = Rc::default();
    game.register_scene(traced_scene("a", &trace));
    game.register_scene(traced_scene("b", &trace));
    game.register_scene(traced_scene("c", &trace));
    game.action("hop", |_state, api| async move {
        api.go("b")?;
        api.go("c")?;
        Ok(())
    });

    game.start("a").unwrap();
    assert_eq!(game.click_id("door").unwrap(), Dispatch::Started);

    assert_eq!(
        *trace.borrow(),
        ["enter a", "exit a", "enter b", "exit b", "enter c"]
    );
    assert_eq!(game.current_scene().as_deref(), Some("c"));
    assert_eq!(game.generation().value(), 3);
    assert!(game.is_settled());
}

#[test]
fn transition_unmounts_before_mounting_next_scene() {
    let (mut game, presenter) = setup();
    forest_and_gate(&game);
    game.start("forest").unwrap();
    presenter.take();

    game.go("gate").unwrap();

    let calls = presenter.calls();
    let unmount = position_of(&calls, &PresenterCall::UnmountAll).unwrap();
    let mount = calls
        .iter()
        .position(|call| matches!(call, PresenterCall::MountLayers { scene, .. } if scene == "gate"))
        .unwrap();
    assert!(unmount < mount);
    assert!(presenter.mounted_ids().is_empty());
}

#[test]
fn entry_hook_dialogue_holds_scene_in_entering() {
    let (mut game, presenter) = setup();
    game.register_scene(
        SceneDefinition::new("intro")
            .with_object(ObjectSpec::new("look").with_id("window"))
            .on_enter(|api| async move {
                api.say([("Narrator", "Long ago...")]).await?;
                Ok(())
            }),
    );

    game.start("intro").unwrap();
    assert_eq!(game.phase(), ScenePhase::Entering);
    assert_eq!(game.pending_prompt(), Some(PromptKind::Line));
    assert_eq!(
        game.click_id("window").unwrap(),
        Dispatch::Ignored(IgnoreReason::Transitioning)
    );

    assert!(game.advance());
    assert_eq!(game.phase(), ScenePhase::Active);
    assert_eq!(presenter.spoken_lines(), ["Long ago..."]);
    assert_eq!(presenter.count(|call| *call == PresenterCall::DismissPrompt), 1);
}

#[test]
fn failing_hook_is_recorded_and_scene_settles() {
    let (mut game, _presenter) = setup();
    game.register_scene(
        SceneDefinition::new("forest").on_enter(|_api| async move { anyhow::bail!("no trees") }),
    );

    game.start("forest").unwrap();

    assert_eq!(game.phase(), ScenePhase::Active);
    let errors = game.take_errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        GameError::HandlerExecution { action, reason }
            if action == "forest::on_enter" && reason.contains("no trees")
    ));
}

#[test]
fn clicks_during_exit_hook_are_ignored() {
    let (mut game, _presenter, clock) = setup_with_clock();
    forest_and_gate(&game);
    game.register_scene(
        SceneDefinition::new("forest")
            .with_object(ObjectSpec::new("openChest").with_id("chest"))
            .on_exit(|api| async move {
                api.flash("#000000", Duration::from_millis(500)).await?;
                Ok(())
            }),
    );
    game.start("forest").unwrap();

    game.go("gate").unwrap();
    assert_eq!(game.phase(), ScenePhase::Exiting);
    assert_eq!(
        game.click_id("chest").unwrap(),
        Dispatch::Ignored(IgnoreReason::Transitioning)
    );

    clock.advance(Duration::from_millis(500));
    assert_eq!(game.pump(), TickControl::Continue);
    assert_eq!(game.current_scene().as_deref(), Some("gate"));
    assert_eq!(game.phase(), ScenePhase::Active);
}

//=========================================================================
// Visibility Tests
//=========================================================================

#[test]
fn has_key_condition_and_reload() {
    let (mut game, presenter) = setup();
    forest_and_gate(&game);

    game.start("gate").unwrap();
    assert!(presenter.mounted_ids().is_empty());

    game.state().set("hasKey", true);
    assert!(presenter.mounted_ids().is_empty());

    assert!(game.reload().unwrap());
    assert_eq!(presenter.mounted_ids(), ["gate"]);
    assert_eq!(game.generation().value(), 1);

    assert!(!game.reload().unwrap());
    assert_eq!(
        presenter.count(|call| matches!(call, PresenterCall::MountObjects(_))),
        2
    );
}

#[test]
fn reload_before_start_is_a_no_op() {
    let (mut game, presenter) = setup();
    forest_and_gate(&game);
    presenter.take();

    assert!(!game.reload().unwrap());
    assert!(presenter.calls().is_empty());
}

#[test]
fn handler_reload_reveals_objects_without_transition() {
    let (mut game, presenter) = setup();
    let trace: Trace = Rc::default();
    game.register_scene(
        traced_scene("cellar", &trace)
            .with_object(
                ObjectSpec::new("lightLamp")
                    .with_id("lamp"),
            )
            .with_object(
                ObjectSpec::new("lightLamp")
                    .with_id("shadow")
                    .visible_when(|state| state.get_bool("lit")),
            ),
    );
    game.action("lightLamp", |state, api| async move {
        state.set("lit", true);
        api.reload()?;
        Ok(())
    });

    game.start("cellar").unwrap();
    assert_eq!(presenter.mounted_ids(), ["door", "lamp"]);

    game.click_id("lamp").unwrap();
    assert_eq!(presenter.mounted_ids(), ["door", "lamp", "shadow"]);
    assert_eq!(*trace.borrow(), ["enter cellar"]);
    assert_eq!(game.generation().value(), 1);
}

//=========================================================================
// Action Dispatch Tests
//=========================================================================

#[test]
fn forest_chest_gate_scenario() {
    let (mut game, presenter) = setup();
    let gate_entries = forest_and_gate(&game);
    game.start("forest").unwrap();

    assert_eq!(game.click_id("chest").unwrap(), Dispatch::Started);
    assert!(game.is_busy());
    assert!(game.state().get_bool("hasKey"));
    assert_eq!(game.pending_prompt(), Some(PromptKind::Line));
    assert_eq!(presenter.spoken_lines(), ["A rusty key!"]);
    assert_eq!(game.current_scene().as_deref(), Some("forest"));

    assert_eq!(gate_entries.get(), 0);
    assert!(game.advance());

    assert_eq!(game.current_scene().as_deref(), Some("gate"));
    assert_eq!(game.generation().value(), 2);
    assert_eq!(gate_entries.get(), 1);
    assert_eq!(presenter.mounted_ids(), ["gate"]);
    let mounted = game.mounted_objects();
    assert!(mounted.iter().all(|object| object.id.as_deref() != Some("chest")));
    assert_eq!(mounted.len(), 1);
    assert!(!game.is_busy());
    assert!(game.take_errors().is_empty());

    let calls = presenter.calls();
    let dismiss = position_of(&calls, &PresenterCall::DismissPrompt).unwrap();
    let unmount = position_of(&calls, &PresenterCall::UnmountAll).unwrap();
    assert!(dismiss < unmount);
}

#[test]
fn re_registered_scene_applies_on_next_entry() {
    let (mut game, presenter) = setup();
    game.register_scene(single_object_scene("attic", "openChest").with_object(
        ObjectSpec::new("openChest").with_id("chest"),
    ));
    game.action("openChest", |state, _api| async move {
        state.set("opened", true);
        Ok(())
    });
    game.action("burn", |state, _api| async move {
        state.set("burned", true);
        Ok(())
    });
    game.start("attic").unwrap();
    let chest = game.object_handle("chest").unwrap();

    game.register_scene(
        SceneDefinition::new("attic")
            .with_object(ObjectSpec::new("burn").with_id("torch"))
            .with_object(ObjectSpec::new("burn").with_id("rug")),
    );

    assert_eq!(game.object_handle("chest"), Some(chest));
    assert!(game.object_handle("torch").is_none());
    assert_eq!(game.click(chest).unwrap(), Dispatch::Started);
    assert!(game.state().get_bool("opened"));
    assert!(!game.state().has("burned"));

    game.state().set("opened", false);
    assert!(!game.reload().unwrap());
    assert_eq!(presenter.mounted_ids(), ["thing", "chest"]);

    game.go("attic").unwrap();
    assert_eq!(presenter.mounted_ids(), ["torch", "rug"]);
    let torch = game.object_handle("torch").unwrap();
    assert_eq!(game.click(torch).unwrap(), Dispatch::Started);
    assert!(game.state().get_bool("burned"));
}

#[test]
fn second_click_while_handler_in_flight_is_ignored() {
    let (mut game, presenter) = setup();
    game.register_scene(single_object_scene("hall", "talk"));
    game.action("talk", |_state, api| async move {
        api.say(["Hello", "Again"]).await?;
        Ok(())
    });
    game.start("hall").unwrap();
    let thing = game.object_handle("thing").unwrap();

    assert_eq!(game.click(thing).unwrap(), Dispatch::Started);
    assert_eq!(game.click(thing).unwrap(), Dispatch::Ignored(IgnoreReason::Busy));
    assert_eq!(presenter.spoken_lines(), ["Hello"]);

    assert!(game.advance());
    assert_eq!(presenter.spoken_lines(), ["Hello", "Again"]);
    assert_eq!(game.click(thing).unwrap(), Dispatch::Ignored(IgnoreReason::Busy));

    assert!(game.advance());
    assert!(!game.is_busy());
    assert_eq!(game.click(thing).unwrap(), Dispatch::Started);
    assert_eq!(presenter.spoken_lines(), ["Hello", "Again", "Hello"]);
}

#[test]
fn click_admission_reasons() {
    let (mut game, _presenter) = setup();
    forest_and_gate(&game);

    assert_eq!(
        game.click_id("chest").unwrap(),
        Dispatch::Ignored(IgnoreReason::NotStarted)
    );

    game.start("gate").unwrap();
    assert_eq!(
        game.click_id("gate").unwrap(),
        Dispatch::Ignored(IgnoreReason::NotMounted)
    );
    assert_eq!(
        game.click_id("missing").unwrap(),
        Dispatch::Ignored(IgnoreReason::NotMounted)
    );

    let stale = ObjectHandle {
        generation: Generation::default(),
        index: 0,
    };
    assert_eq!(game.click(stale).unwrap(), Dispatch::Ignored(IgnoreReason::StaleHandle));
}

#[test]
fn inline_actions_run_without_registry() {
    let (mut game, _presenter) = setup();
    game.register_scene(single_object_scene(
        "study",
        ActionRef::inline(|state, _api| async move {
            state.toggle("lamp");
            Ok(())
        }),
    ));
    game.start("study").unwrap();

    game.click_id("thing").unwrap();
    assert_eq!(game.state().get("lamp"), Some(json!(true)));
    game.click_id("thing").unwrap();
    assert_eq!(game.state().get("lamp"), Some(json!(false)));
}

#[test]
fn unknown_action_is_reported() {
    let (mut game, _presenter) = setup();
    game.register_scene(single_object_scene("void", "ghost"));
    game.start("void").unwrap();

    assert!(matches!(
        game.click_id("thing"),
        Err(GameError::UnknownAction(name)) if name == "ghost"
    ));
    assert!(!game.is_busy());
}

#[test]
fn actions_resolve_at_dispatch_time() {
    let (mut game, _presenter) = setup();
    game.register_scene(single_object_scene("hall", "ring"));
    game.start("hall").unwrap();

    game.action("ring", |state, _api| async move {
        state.set("bell", "first");
        Ok(())
    });
    game.action("ring", |state, _api| async move {
        state.set("bell", "second");
        Ok(())
    });

    game.click_id("thing").unwrap();
    assert_eq!(game.state().get("bell"), Some(json!("second")));
}

#[test]
fn handler_failure_is_recorded_and_input_continues() {
    let (mut game, _presenter) = setup();
    game.register_scene(single_object_scene("forest", "force"));
    game.action("force", |state, _api| async move {
        state.set("tried", true);
        anyhow::bail!("lid is stuck")
    });
    game.start("forest").unwrap();

    assert_eq!(game.click_id("thing").unwrap(), Dispatch::Started);

    let errors = game.take_errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        GameError::HandlerExecution { action, reason }
            if action == "force" && reason.contains("lid is stuck")
    ));
    assert!(game.state().get_bool("tried"));
    assert_eq!(game.current_scene().as_deref(), Some("forest"));
    assert!(!game.is_busy());
    assert_eq!(game.click_id("thing").unwrap(), Dispatch::Started);
}

//=========================================================================
// Cancellation Tests
//=========================================================================

#[test]
fn superseded_handler_is_suppressed() {
    let (mut game, presenter) = setup();
    forest_and_gate(&game);
    let outcomes: Rc<RefCell<Vec<bool>>> = Rc::default();
    let seen = Rc::clone(&outcomes);
    game.register_scene(single_object_scene("forest", "linger"));
    game.action("linger", move |state, api| {
        let seen = Rc::clone(&seen);
        async move {
            let said = api.say(["Wait..."]).await;
            seen.borrow_mut().push(said.is_err_and(|err| err.is_stale()));

            state.set("late", true);
            let went = api.go("forest");
            seen.borrow_mut().push(went.is_err_and(|err| err.is_stale()));

            let flashed = api.flash("#ffffff", Duration::ZERO).await;
            seen.borrow_mut().push(flashed.is_err_and(|err| err.is_stale()));

            seen.borrow_mut().push(api.reload().is_err_and(|err| err.is_stale()));
            Ok(())
        }
    });
    game.start("forest").unwrap();
    let old_handle = game.object_handle("thing").unwrap();

    game.click(old_handle).unwrap();
    assert_eq!(game.pending_prompt(), Some(PromptKind::Line));

    game.go("gate").unwrap();

    assert_eq!(*outcomes.borrow(), [true, true, true, true]);
    assert!(!game.state().has("late"));
    assert_eq!(game.current_scene().as_deref(), Some("gate"));
    assert_eq!(game.pending_prompt(), None);
    assert!(!game.is_busy());
    assert!(game.take_errors().is_empty());

    assert_eq!(presenter.count(|call| matches!(call, PresenterCall::ShowLine(_))), 1);
    assert_eq!(presenter.count(|call| *call == PresenterCall::DismissPrompt), 1);
    assert_eq!(presenter.count(|call| matches!(call, PresenterCall::Flash { .. })), 0);

    assert_eq!(
        game.click(old_handle).unwrap(),
        Dispatch::Ignored(IgnoreReason::StaleHandle)
    );
}

#[test]
fn stale_prompt_propagated_with_question_mark_is_not_a_failure() {
    let (mut game, _presenter) = setup();
    forest_and_gate(&game);
    game.register_scene(single_object_scene("forest", "linger"));
    game.action("linger", |_state, api| async move {
        api.say(["Wait..."]).await?;
        Ok(())
    });
    game.start("forest").unwrap();

    game.click_id("thing").unwrap();
    game.go("gate").unwrap();

    assert!(game.take_errors().is_empty());
    assert!(!game.is_busy());
}

//=========================================================================
// Dialogue & Choice Tests
//=========================================================================

#[test]
fn choice_resolves_with_selected_value() {
    let (mut game, presenter) = setup();
    game.register_scene(single_object_scene("crossroads", "fork"));
    game.action("fork", |state, api| async move {
        let picked = api
            .choice(
                "Which way?",
                [ChoiceOption::new("Left", "left"), ChoiceOption::new("Right", "right")],
            )
            .await?;
        state.set("path", picked);
        Ok(())
    });
    game.start("crossroads").unwrap();

    game.click_id("thing").unwrap();
    assert_eq!(game.pending_prompt(), Some(PromptKind::Choice));
    assert!(!game.advance());
    assert!(!game.choose(7));

    assert!(game.choose(1));
    assert!(!game.choose(0));
    assert_eq!(game.state().get("path"), Some(json!("right")));
    assert_eq!(presenter.count(|call| *call == PresenterCall::DismissPrompt), 1);
    assert!(presenter
        .calls()
        .iter()
        .any(|call| matches!(call, PresenterCall::ShowChoice { prompt, options } if prompt == "Which way?" && options.len() == 2)));
}

#[test]
fn overlapping_prompt_is_rejected() {
    let (mut game, presenter) = setup();
    let rejected: Rc<RefCell<Option<bool>>> = Rc::default();
    let seen = Rc::clone(&rejected);
    game.register_scene(single_object_scene("hall", "babble"));
    game.action("babble", move |_state, api| {
        let seen = Rc::clone(&seen);
        async move {
            let (first, second) = futures::future::join(
                api.say(["first"]),
                api.choice("second?", [ChoiceOption::new("ok", 1)]),
            )
            .await;
            first?;
            *seen.borrow_mut() = Some(matches!(second, Err(GameError::PromptPending("dialogue"))));
            Ok(())
        }
    });
    game.start("hall").unwrap();

    game.click_id("thing").unwrap();
    assert!(game.advance());

    assert_eq!(*rejected.borrow(), Some(true));
    assert_eq!(presenter.spoken_lines(), ["first"]);
    assert_eq!(presenter.count(|call| matches!(call, PresenterCall::ShowChoice { .. })), 0);
}

#[test]
fn empty_say_resolves_and_empty_choice_fails() {
    let (mut game, presenter) = setup();
    game.register_scene(single_object_scene("hall", "mute"));
    game.action("mute", |_state, api| async move {
        api.say(Vec::<&str>::new()).await?;
        api.choice("Nothing?", Vec::<ChoiceOption>::new()).await?;
        Ok(())
    });
    game.start("hall").unwrap();

    game.click_id("thing").unwrap();

    let errors = game.take_errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        GameError::HandlerExecution { reason, .. } if reason.contains("has no options")
    ));
    assert!(presenter.spoken_lines().is_empty());
    assert_eq!(presenter.count(|call| *call == PresenterCall::DismissPrompt), 0);
}

//=========================================================================
// Effect Tests
//=========================================================================

#[test]
fn flash_resolves_when_clock_reaches_deadline() {
    let (mut game, presenter, clock) = setup_with_clock();
    game.register_scene(single_object_scene("lab", "zap"));
    game.action("zap", |state, api| async move {
        api.flash("#ffffff", Duration::from_millis(300)).await?;
        state.set("zapped", true);
        Ok(())
    });
    game.start("lab").unwrap();

    game.click_id("thing").unwrap();
    assert!(game.next_deadline().is_some());
    assert_eq!(
        presenter.count(|call| matches!(call, PresenterCall::Flash { color, duration }
            if color == "#ffffff" && *duration == Duration::from_millis(300))),
        1
    );

    clock.advance(Duration::from_millis(200));
    game.pump();
    assert!(!game.state().has("zapped"));
    assert!(game.is_busy());

    clock.advance(Duration::from_millis(100));
    game.pump();
    assert!(game.state().get_bool("zapped"));
    assert!(!game.is_busy());
    assert!(game.next_deadline().is_none());
}

//=========================================================================
// Player Bridge Tests
//=========================================================================

#[test]
fn pump_applies_channel_events_in_order() {
    let (mut game, _presenter) = setup();
    forest_and_gate(&game);
    game.start("forest").unwrap();
    let sender = game.sender();

    sender.send(PlayerEvent::ClickId("chest".into())).unwrap();
    sender.send(PlayerEvent::Advance).unwrap();
    assert_eq!(game.pump(), TickControl::Continue);

    assert_eq!(game.current_scene().as_deref(), Some("gate"));
    assert!(game.state().get_bool("hasKey"));

    sender.send(PlayerEvent::Shutdown).unwrap();
    assert_eq!(game.pump(), TickControl::Exit);
}

#[test]
fn hover_drives_cursor_affordance() {
    let (mut game, presenter) = setup();
    forest_and_gate(&game);
    game.start("forest").unwrap();
    let chest = game.object_handle("chest").unwrap();

    game.hover(Some(chest));
    assert_eq!(
        last_cursor(&presenter),
        Some(CursorHint::Interactive {
            label: Some("Old chest".into())
        })
    );

    game.hover(None);
    assert_eq!(last_cursor(&presenter), Some(CursorHint::Idle));

    game.hover(Some(chest));
    game.click(chest).unwrap();
    assert_eq!(last_cursor(&presenter), Some(CursorHint::Busy));

    let before = presenter.count(|call| matches!(call, PresenterCall::SetCursor(_)));
    game.hover(Some(chest));
    assert_eq!(
        presenter.count(|call| matches!(call, PresenterCall::SetCursor(_))),
        before
    );
}
