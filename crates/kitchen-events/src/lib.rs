// ABOUTME: Action protocol shared by the app controller and its UI collaborators
// ABOUTME: Typed action identifiers, their metadata catalog and the action queue

pub mod action;
pub mod event_bus;
pub mod metadata;

pub use action::{Action, ActionError, ActionId};
pub use event_bus::{ActionQueue, ActionSink};
pub use metadata::{ActionKind, ActionMetaData, shortcut_for};
