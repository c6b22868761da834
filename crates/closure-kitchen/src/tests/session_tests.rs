// ABOUTME: Session surface scenarios: status broadcast, unload, layout settings and preview relay
// ABOUTME: Also covers editor routing and the queued dispatch path

use std::sync::Arc;

use kitchen_core::store::{KEY_JS, KEY_TUTORIAL};
use kitchen_core::{DurableStore, MemoryStore, UnavailableStore};
use kitchen_events::{Action, ActionId, ActionQueue, ActionSink};
use kitchen_logging::Level;
use kitchen_types::{Buffer, HistoryDepth, HttpMethod, Locale, UserRole};

use super::support::{ConsoleEntry, Harness, ScriptedTransport, capture_logs, startup};
use crate::config::KitchenConfig;
use crate::log_relay::ConsoleLogSink;
use tracing_subscriber::prelude::*;

#[tokio::test]
async fn test_subscriber_receives_status_on_every_dispatch() {
    let mut h = Harness::new(UserRole::User, &startup("user", Some("u_1")));
    assert_eq!(h.status.count(), 1);

    h.app.dispatch(Action::About);
    h.app.dispatch(Action::CurrentProjectChanged);
    assert_eq!(h.status.count(), 3);

    let latest = h.status.latest().unwrap();
    assert!(latest.app_status().is_modified);
    assert!(latest.app_status().is_private);
    assert!(latest.is_enabled(ActionId::SaveCurrentProject));
    assert_eq!(&latest, h.app.status());
}

#[tokio::test]
async fn test_guest_status_disables_saving() {
    let mut h = Harness::new(UserRole::Guest, &startup("guest", None));
    h.app.dispatch(Action::CurrentProjectChanged);

    let status = h.app.status();
    assert!(!status.app_status().is_user);
    assert!(!status.is_enabled(ActionId::SaveCurrentProject));
    assert!(!status.is_visible(ActionId::PublishCurrentProject));
}

#[tokio::test]
async fn test_status_follows_editor_history() {
    let mut h = Harness::new(UserRole::User, &startup("user", Some("u_1")));
    assert!(!h.app.status().is_enabled(ActionId::Undo));

    h.editor.0.lock().history = HistoryDepth { undo: 2, redo: 0 };
    h.app.dispatch(Action::TabChanged);

    assert!(h.app.status().is_enabled(ActionId::Undo));
    assert!(!h.app.status().is_enabled(ActionId::Redo));
}

#[tokio::test]
async fn test_dispatch_while_updating_warns_and_skips_broadcast() {
    let mut h = Harness::new(UserRole::User, &startup("user", Some("u_1")));
    let (logs, _guard) = capture_logs();
    let broadcasts = h.status.count();

    h.app.updating = true;
    h.app.dispatch(Action::About);
    h.app.update_components();
    h.app.updating = false;

    assert!(logs.contains(Level::WARN, "ABOUT action is invoked in updating"));
    assert!(logs.contains(Level::WARN, "update_components is called recursively"));
    assert_eq!(h.status.count(), broadcasts);
    assert_eq!(h.editor.calls(), vec!["about".to_string()]);
}

#[tokio::test]
async fn test_editor_actions_are_routed_to_the_editor() {
    let mut h = Harness::new(UserRole::User, &startup("user", Some("u_1")));

    for action in [
        Action::Undo,
        Action::Redo,
        Action::FindNext("x".into()),
        Action::FindPrev("y".into()),
        Action::Search("goog.dom".into()),
        Action::TabChanged,
        Action::About,
    ] {
        h.app.dispatch(action);
    }

    assert_eq!(
        h.editor.calls(),
        vec![
            "undo",
            "redo",
            "find_next:x",
            "find_prev:y",
            "search:goog.dom",
            "tab_changed",
            "about",
        ]
    );
    assert!(h.transport.requests().is_empty());
}

#[tokio::test]
async fn test_queued_actions_dispatch_in_order() {
    let mut h = Harness::new(UserRole::User, &startup("user", Some("u_1")));
    let queue = ActionQueue::new();
    queue.dispatch(Action::CurrentProjectChanged);
    queue.dispatch(Action::SaveCurrentProject);

    h.app.dispatch_queued(&queue);
    h.app.settle().await;

    assert!(queue.is_empty());
    assert!(!h.app.is_modified());
    assert_eq!(h.transport.count(HttpMethod::Put, "/projects?id=u_1"), 1);
}

#[tokio::test]
async fn test_confirmation_uses_configured_locale() {
    let mut config = KitchenConfig::default();
    config.session.locale = Locale::Ja;
    let mut h = Harness::with(
        config,
        UserRole::User,
        &startup("user", Some("u_1")),
        MemoryStore::new(),
    );

    h.app.dispatch(Action::CurrentProjectChanged);
    h.app.dispatch(Action::NewProject);

    assert_eq!(
        *h.dialogs.confirms.lock(),
        vec!["プロジェクトの変更を破棄しますか？".to_string()]
    );
}

#[tokio::test]
async fn test_rename_prompt_default_uses_configured_locale() {
    let mut config = KitchenConfig::default();
    config.session.locale = Locale::Ja;
    let mut h = Harness::with(
        config,
        UserRole::User,
        &startup("user", None),
        MemoryStore::new(),
    );

    h.app.dispatch(Action::CurrentProjectChanged);
    h.app.dispatch(Action::SaveCurrentProject);

    assert_eq!(
        *h.dialogs.prompts.lock(),
        vec!["新規プロジェクト".to_string()]
    );
}

#[tokio::test]
async fn test_unload_asks_only_when_modified() {
    let mut h = Harness::new(UserRole::User, &startup("user", Some("u_1")));
    assert_eq!(h.app.on_unload(), None);

    h.editor.type_code(Buffer::Js, "edited();");
    h.app.dispatch(Action::CurrentProjectChanged);
    let message = h.app.on_unload().unwrap();
    assert!(message.ends_with("Discard anyway?"));

    // Signed-in users rely on saving, not on local storage
    assert_eq!(h.store.get(KEY_JS).unwrap(), None);
}

#[tokio::test]
async fn test_unload_prompt_can_be_disabled() {
    let mut config = KitchenConfig::default();
    config.session.confirm_unload = false;
    let mut h = Harness::with(
        config,
        UserRole::User,
        &startup("user", Some("u_1")),
        MemoryStore::new(),
    );

    h.app.dispatch(Action::CurrentProjectChanged);
    assert_eq!(h.app.on_unload(), None);
}

#[tokio::test]
async fn test_guest_buffers_survive_unload() {
    let mut h = Harness::new(UserRole::Guest, &startup("guest", None));
    h.editor.type_code(Buffer::Js, "draft();");

    h.app.on_unload();

    assert_eq!(h.store.get(KEY_JS).unwrap().as_deref(), Some("draft();"));

    // The next guest session starts from the saved draft
    let next = Harness::with(
        KitchenConfig::default(),
        UserRole::Guest,
        &startup("guest", None),
        h.store.clone(),
    );
    assert_eq!(next.editor.js(), "draft();");
}

#[tokio::test]
async fn test_split_positions_round_trip() {
    let h = Harness::new(UserRole::User, &startup("user", None));
    assert_eq!(h.app.split_positions(), (0.0, 0.0));

    h.app.save_split_positions(0.25, 0.6);
    assert_eq!(h.app.split_positions(), (0.25, 0.6));
}

#[tokio::test]
async fn test_tutorial_flag() {
    let h = Harness::new(UserRole::Guest, &startup("guest", None));
    assert!(!h.app.tutorial_seen());

    h.app.mark_tutorial_seen();
    assert!(h.app.tutorial_seen());
    assert_eq!(h.store.get(KEY_TUTORIAL).unwrap().as_deref(), Some("1"));
}

#[tokio::test]
async fn test_unavailable_storage_degrades_to_defaults() {
    let (logs, _guard) = capture_logs();
    let mut h = Harness::with_store(
        KitchenConfig::default(),
        UserRole::Guest,
        &startup("guest", None),
        MemoryStore::new(),
        Arc::new(UnavailableStore),
        ScriptedTransport::new(),
    );

    assert!(logs.contains(Level::ERROR, "Failed to fetch the locally saved project"));
    assert_eq!(h.editor.js(), "");
    assert_eq!(h.app.split_positions(), (0.0, 0.0));
    assert!(!h.app.tutorial_seen());

    h.app.dispatch(Action::UpdatePreview);
    assert!(logs.contains(Level::ERROR, "Failed to save the project locally"));
    h.app.settle().await;
    assert_eq!(h.preview.documents().len(), 1);
}

#[tokio::test]
async fn test_preview_messages_are_relayed_to_console() {
    let mut h = Harness::new(UserRole::User, &startup("user", None));
    let (logs, _guard) = capture_logs();

    h.app
        .relay_from_preview(r#"{"type": "log", "level": "WARNING", "msg": "careful", "loggerName": "preview"}"#);
    h.app
        .relay_from_preview(r#"{"type": "exception", "line": 4, "message": "x is undefined"}"#);
    h.app.relay_from_preview("not a message");

    assert_eq!(
        h.console.entries(),
        vec![
            ConsoleEntry {
                level: Level::WARN,
                message: "careful".into(),
                logger: "preview".into(),
            },
            ConsoleEntry {
                level: Level::ERROR,
                message: "line 4 : x is undefined".into(),
                logger: "uncaught exception".into(),
            },
        ]
    );
    assert!(logs.contains(Level::WARN, "Ignoring malformed preview message"));

    h.app.dispatch(Action::ClearConsole);
    assert!(h.console.entries().is_empty());
    assert_eq!(*h.console.clears.lock(), 1);
}

#[tokio::test]
async fn test_relayed_logs_reach_the_console_pane() {
    let mut h = Harness::new(UserRole::Guest, &startup("guest", None));
    let (sink, receiver) = ConsoleLogSink::channel();
    let relay = kitchen_logging::relay_layer(&KitchenConfig::default().logging, sink);
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(relay));
    h.app.attach_log_relay(receiver);

    h.app.dispatch(Action::SaveCurrentProject);

    let entries = h.console.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, Level::ERROR);
    assert!(entries[0].message.contains("SAVE_CURRENT_PROJECT command by guest"));
    assert_eq!(entries[0].logger, "closure_kitchen::app");
}
