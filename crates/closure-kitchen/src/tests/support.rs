// ABOUTME: Recording collaborators and a scripted transport for controller scenarios
// ABOUTME: Every double shares its state through an Arc so tests can inspect it after handing it over

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use kitchen_core::{
    ConsoleSurface, DialogHost, DurableStore, EditorSurface, MemoryStore,
    PreviewSurface, ProjectListing, StatusBundle, StatusSubscriber,
};
use kitchen_logging::{Level, MemorySink, RelayLayer};
use kitchen_project::{RequestSpec, Response, Transport, TransportError};
use kitchen_types::{
    Buffer, HistoryDepth, HttpMethod, ProjectId, ProjectValues, StartupInfo, UserRole,
};
use tracing_subscriber::prelude::*;

use crate::app::{App, Collaborators};
use crate::config::KitchenConfig;

#[derive(Debug, Default)]
pub struct EditorState {
    pub js: String,
    pub html: String,
    pub name: Option<String>,
    pub history: HistoryDepth,
    pub calls: Vec<String>,
}

#[derive(Clone, Default)]
pub struct RecordingEditor(pub Arc<Mutex<EditorState>>);

impl RecordingEditor {
    /// Simulate the user typing into a buffer
    pub fn type_code(&self, buffer: Buffer, code: &str) {
        let mut state = self.0.lock();
        match buffer {
            Buffer::Js => state.js = code.to_string(),
            Buffer::Html => state.html = code.to_string(),
        }
    }

    pub fn js(&self) -> String {
        self.0.lock().js.clone()
    }

    pub fn name(&self) -> Option<String> {
        self.0.lock().name.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().calls.clone()
    }
}

impl EditorSurface for RecordingEditor {
    fn code(&self, buffer: Buffer) -> String {
        let state = self.0.lock();
        match buffer {
            Buffer::Js => state.js.clone(),
            Buffer::Html => state.html.clone(),
        }
    }

    fn set_code(&mut self, buffer: Buffer, code: &str) {
        self.type_code(buffer, code);
        self.0.lock().history = HistoryDepth::default();
    }

    fn history_depth(&self) -> HistoryDepth {
        self.0.lock().history
    }

    fn undo(&mut self) {
        self.0.lock().calls.push("undo".into());
    }

    fn redo(&mut self) {
        self.0.lock().calls.push("redo".into());
    }

    fn find_next(&mut self, query: &str) {
        self.0.lock().calls.push(format!("find_next:{query}"));
    }

    fn find_prev(&mut self, query: &str) {
        self.0.lock().calls.push(format!("find_prev:{query}"));
    }

    fn search_reference(&mut self, query: &str) {
        self.0.lock().calls.push(format!("search:{query}"));
    }

    fn focus(&mut self) {
        self.0.lock().calls.push("focus".into());
    }

    fn set_project_name(&mut self, name: Option<&str>) {
        self.0.lock().name = name.map(str::to_string);
    }

    fn display_project_name(&self) -> Option<String> {
        self.0.lock().name.clone()
    }

    fn tab_changed(&mut self) {
        self.0.lock().calls.push("tab_changed".into());
    }

    fn show_about(&mut self) {
        self.0.lock().calls.push("about".into());
    }
}

#[derive(Clone, Default)]
pub struct RecordingPreview(pub Arc<Mutex<Vec<String>>>);

impl RecordingPreview {
    pub fn documents(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

impl PreviewSurface for RecordingPreview {
    fn set_content(&mut self, html: &str) {
        self.0.lock().push(html.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleEntry {
    pub level: Level,
    pub message: String,
    pub logger: String,
}

#[derive(Clone, Default)]
pub struct RecordingConsole {
    pub entries: Arc<Mutex<Vec<ConsoleEntry>>>,
    pub clears: Arc<Mutex<usize>>,
}

impl RecordingConsole {
    pub fn entries(&self) -> Vec<ConsoleEntry> {
        self.entries.lock().clone()
    }
}

impl ConsoleSurface for RecordingConsole {
    fn add_log(&mut self, level: Level, message: &str, logger: &str) {
        self.entries.lock().push(ConsoleEntry {
            level,
            message: message.to_string(),
            logger: logger.to_string(),
        });
    }

    fn clear(&mut self) {
        self.entries.lock().clear();
        *self.clears.lock() += 1;
    }
}

#[derive(Clone, Default)]
pub struct RecordingListing {
    pub applied: Arc<Mutex<Vec<(ProjectId, String, bool)>>>,
    pub deleted: Arc<Mutex<Vec<ProjectId>>>,
}

impl ProjectListing for RecordingListing {
    fn apply_project(&mut self, id: &ProjectId, name: &str, private: bool) {
        self.applied
            .lock()
            .push((id.clone(), name.to_string(), private));
    }

    fn delete_project(&mut self, id: &ProjectId) {
        self.deleted.lock().push(id.clone());
    }
}

#[derive(Clone, Default)]
pub struct RecordingDialogs {
    pub confirms: Arc<Mutex<Vec<String>>>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl DialogHost for RecordingDialogs {
    fn confirm_discard(&mut self, message: &str) {
        self.confirms.lock().push(message.to_string());
    }

    fn prompt_project_name(&mut self, default_name: &str) {
        self.prompts.lock().push(default_name.to_string());
    }
}

#[derive(Clone, Default)]
pub struct RecordingStatus(pub Arc<Mutex<Vec<StatusBundle>>>);

impl RecordingStatus {
    pub fn latest(&self) -> Option<StatusBundle> {
        self.0.lock().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.0.lock().len()
    }
}

impl StatusSubscriber for RecordingStatus {
    fn apply_status(&mut self, bundle: &StatusBundle) {
        self.0.lock().push(bundle.clone());
    }
}

/// Backend double answering like the real service and recording every exchange
#[derive(Default)]
pub struct ScriptedTransport {
    requests: Mutex<Vec<RequestSpec>>,
    bodies: Mutex<HashMap<String, String>>,
    failing: Mutex<Vec<String>>,
    next_id: Mutex<u32>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer `uri` with `body` instead of the default
    pub fn answer(&self, uri: &str, body: &str) {
        self.bodies.lock().insert(uri.to_string(), body.to_string());
    }

    /// Answer `uri` with a 500
    pub fn fail(&self, uri: &str) {
        self.failing.lock().push(uri.to_string());
    }

    pub fn requests(&self) -> Vec<RequestSpec> {
        self.requests.lock().clone()
    }

    pub fn count(&self, method: HttpMethod, uri_prefix: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.uri.starts_with(uri_prefix))
            .count()
    }

    fn default_body(&self, request: &RequestSpec) -> String {
        match (request.method, request.uri.as_str()) {
            (HttpMethod::Post, "/projects") => {
                let mut next_id = self.next_id.lock();
                *next_id += 1;
                let id = *next_id;
                format!(r#"while(1);{{"id": "u_new{id}"}}"#)
            }
            (HttpMethod::Post, "/compile") => serde_json::json!({
                "compiledCode": format!("/*compiled*/{}", request.body.clone().unwrap_or_default())
            })
            .to_string(),
            _ => "{}".to_string(),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn exchange(&self, request: &RequestSpec) -> Result<Response, TransportError> {
        self.requests.lock().push(request.clone());

        if self.failing.lock().iter().any(|uri| *uri == request.uri) {
            return Err(TransportError::status(&request.uri, 500, "broken".to_string()));
        }

        let body = self
            .bodies
            .lock()
            .get(&request.uri)
            .cloned()
            .unwrap_or_else(|| self.default_body(request));
        Ok(Response::ok(body))
    }
}

fn values(name: &str, code: Option<(&str, &str)>) -> ProjectValues {
    ProjectValues {
        id: None,
        name: Some(name.to_string()),
        js: code.map(|(js, _)| js.to_string()),
        html: code.map(|(_, html)| html.to_string()),
    }
}

/// Startup payload: private `u_1`, public `s_1` without code and public `s_2` with code
pub fn startup(user_type: &str, project_id: Option<&str>) -> StartupInfo {
    let projects = BTreeMap::from([(
        "u_1".to_string(),
        values("mine", Some(("mine();", "<p>{{script}}</p>"))),
    )]);
    let samples = BTreeMap::from([
        ("s_1".to_string(), values("sample one", None)),
        (
            "s_2".to_string(),
            values("sample two", Some(("sample();", "<i>{{ script }}</i>"))),
        ),
    ]);

    StartupInfo {
        user_type: user_type.to_string(),
        project_id: project_id.map(str::to_string),
        projects,
        samples,
    }
}

pub struct Harness {
    pub app: App,
    pub editor: RecordingEditor,
    pub preview: RecordingPreview,
    pub console: RecordingConsole,
    pub listing: RecordingListing,
    pub dialogs: RecordingDialogs,
    pub status: RecordingStatus,
    pub store: MemoryStore,
    pub transport: Arc<ScriptedTransport>,
}

impl Harness {
    pub fn new(user: UserRole, startup: &StartupInfo) -> Self {
        Self::with(KitchenConfig::default(), user, startup, MemoryStore::new())
    }

    pub fn with(
        config: KitchenConfig,
        user: UserRole,
        startup: &StartupInfo,
        store: MemoryStore,
    ) -> Self {
        let transport = ScriptedTransport::new();
        Self::with_store(config, user, startup, store.clone(), Arc::new(store), transport)
    }

    pub fn with_store(
        config: KitchenConfig,
        user: UserRole,
        startup: &StartupInfo,
        store: MemoryStore,
        durable: Arc<dyn DurableStore>,
        transport: Arc<ScriptedTransport>,
    ) -> Self {
        let editor = RecordingEditor::default();
        let preview = RecordingPreview::default();
        let console = RecordingConsole::default();
        let listing = RecordingListing::default();
        let dialogs = RecordingDialogs::default();
        let status = RecordingStatus::default();

        let collaborators = Collaborators {
            editor: Box::new(editor.clone()),
            preview: Box::new(preview.clone()),
            console: Box::new(console.clone()),
            listing: Box::new(listing.clone()),
            dialogs: Box::new(dialogs.clone()),
            store: durable,
        };

        let mut app = App::new(config, user, startup, transport.clone(), collaborators);
        app.add_status_subscriber(Box::new(status.clone()));

        Self {
            app,
            editor,
            preview,
            console,
            listing,
            dialogs,
            status,
            store,
            transport,
        }
    }

    pub fn open(&mut self, id: &str) {
        self.app
            .dispatch(kitchen_events::Action::OpenProject(ProjectId::new(id)));
    }
}

/// Capture WARN and above on the current thread while the guard lives
pub fn capture_logs() -> (MemorySink, tracing::subscriber::DefaultGuard) {
    let sink = MemorySink::new();
    let subscriber =
        tracing_subscriber::registry().with(RelayLayer::new(sink.clone(), Level::WARN));
    let guard = tracing::subscriber::set_default(subscriber);
    (sink, guard)
}
