// ABOUTME: Core application state shared by the controller and its collaborators
// ABOUTME: Status bundles, capability traits, durable local state and preview composition

pub mod capabilities;
pub mod compile_cache;
pub mod preview;
pub mod status;
pub mod store;

pub use capabilities::{
    ConsoleSurface, DialogHost, EditorSurface, PreviewSurface, ProjectListing, StatusSubscriber,
};
pub use compile_cache::{CompileCache, normalize_source};
pub use preview::{
    BRIDGE_SCRIPT, BridgeMessage, CompileReport, ConsoleLine, Diagnostic, compose_document,
    escape_script_end,
};
pub use status::{ActionStatus, AppStatus, StatusBundle};
pub use store::{
    COOKIE_MAX_AGE, COOKIE_PROJECT_ID, DurableStore, FileStore, MemoryStore, StoreError,
    UnavailableStore,
};
