// ABOUTME: The application controller: routes every action, drives the repository and UI collaborators
// ABOUTME: Request completions arrive over a channel and are applied on the controller's own task

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;

use kitchen_core::store::{
    COOKIE_MAX_AGE, COOKIE_PROJECT_ID, KEY_HPOS, KEY_HTML, KEY_JS, KEY_TUTORIAL, KEY_VPOS,
};
use kitchen_core::{
    AppStatus, BridgeMessage, CompileCache, CompileReport, ConsoleSurface, DialogHost,
    DurableStore, EditorSurface, PreviewSurface, ProjectListing, StatusBundle, StatusSubscriber,
    StoreError, compose_document, normalize_source,
};
use kitchen_events::{Action, ActionQueue};
use kitchen_logging::{Level, debug, error, info, warn};
use kitchen_project::{Project, ProjectKey, ProjectRepository, Request, RequestOutcome, Transport};
use kitchen_types::{
    Buffer, Format, PreviewMode, ProjectId, ProjectType, ProjectValues, StartupInfo, UserRole,
};

use crate::config::KitchenConfig;
use crate::error::Result;
use crate::log_relay::ConsoleLogReceiver;
use crate::messages::Messages;

/// Logger name for lines the controller writes to the console pane
const APP_LOGGER: &str = "app";

/// UI collaborators and local state the controller drives
pub struct Collaborators {
    pub editor: Box<dyn EditorSurface>,
    pub preview: Box<dyn PreviewSurface>,
    pub console: Box<dyn ConsoleSurface>,
    pub listing: Box<dyn ProjectListing>,
    pub dialogs: Box<dyn DialogHost>,
    pub store: Arc<dyn DurableStore>,
}

/// What to do once a request's outcome has been applied to the repository
#[derive(Debug)]
enum Continuation {
    Store,
    Open,
    Rename,
    Preview { source: String },
}

#[derive(Debug)]
struct Completion {
    outcome: RequestOutcome,
    then: Continuation,
}

#[derive(Debug)]
struct RenameTarget {
    key: ProjectKey,
    default_name: String,
    /// Committing the name stores a new project for the first time
    saves: bool,
}

/// A prompt waiting for the user's answer
#[derive(Debug)]
enum PendingDialog {
    Confirm(Action),
    Rename(RenameTarget),
}

pub struct App {
    config: KitchenConfig,
    user: UserRole,
    messages: Messages,
    repo: ProjectRepository,
    transport: Arc<dyn Transport>,

    editor: Box<dyn EditorSurface>,
    preview: Box<dyn PreviewSurface>,
    console: Box<dyn ConsoleSurface>,
    listing: Box<dyn ProjectListing>,
    dialogs: Box<dyn DialogHost>,
    store: Arc<dyn DurableStore>,
    subscribers: Vec<Box<dyn StatusSubscriber>>,

    current: ProjectKey,
    is_modified: bool,
    pub(crate) updating: bool,
    dialog: Option<PendingDialog>,
    compile_cache: CompileCache,
    /// Normalized sources with a compile request outstanding
    compiling: HashSet<String>,
    pending: usize,
    status: StatusBundle,

    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    log_relay: Option<ConsoleLogReceiver>,
}

impl App {
    /// Build the controller with the transport the configuration selects
    pub fn connect(
        config: KitchenConfig,
        user: UserRole,
        startup: &StartupInfo,
        collaborators: Collaborators,
    ) -> anyhow::Result<Self> {
        let transport = kitchen_project::transport_for(&config.server)
            .context("Failed to create the backend transport")?;
        Ok(Self::new(config, user, startup, transport, collaborators))
    }

    /// Build the controller and open the startup project.
    ///
    /// Panics when the startup listings contain duplicate ids.
    pub fn new(
        config: KitchenConfig,
        user: UserRole,
        startup: &StartupInfo,
        transport: Arc<dyn Transport>,
        collaborators: Collaborators,
    ) -> Self {
        let Collaborators {
            editor,
            preview,
            console,
            listing,
            dialogs,
            store,
        } = collaborators;

        let mut repo = ProjectRepository::new();
        repo.initialize(&startup.projects, &startup.samples);

        let startup_project = startup
            .project_id
            .as_deref()
            .filter(|_| user.is_user())
            .and_then(|id| repo.find_by_id(&ProjectId::new(id)));

        let current = match startup_project {
            Some(key) => key,
            None => {
                let key = repo.create(ProjectType::Private, Self::locally_saved_values(&*store));
                if let Err(err) = store.remove_cookie(COOKIE_PROJECT_ID) {
                    error!(error = %err, "Failed to remove the project cookie");
                }
                key
            }
        };

        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let messages = Messages::new(config.session.locale);
        let compile_cache = CompileCache::new(config.preview.cache_size.max(1));

        info!(
            user = ?user,
            private_projects = startup.projects.len(),
            samples = startup.samples.len(),
            "Starting Closure Kitchen"
        );

        let mut app = Self {
            config,
            user,
            messages,
            repo,
            transport,
            editor,
            preview,
            console,
            listing,
            dialogs,
            store,
            subscribers: Vec::new(),
            current,
            is_modified: false,
            updating: false,
            dialog: None,
            compile_cache,
            compiling: HashSet::new(),
            pending: 0,
            status: StatusBundle::build(AppStatus::default()),
            completions_tx,
            completions_rx,
            log_relay: None,
        };

        if app.repo.get(current).is_fetched() {
            app.import_from_project(current);
        } else {
            let request = app.repo.fetch(current);
            app.submit(request, Continuation::Open);
        }
        app.update_components();
        app
    }

    fn locally_saved_values(store: &dyn DurableStore) -> ProjectValues {
        let read = || -> std::result::Result<ProjectValues, StoreError> {
            Ok(ProjectValues::with_code(
                store.get(KEY_JS)?.unwrap_or_default(),
                store.get(KEY_HTML)?.unwrap_or_default(),
            ))
        };
        read().unwrap_or_else(|err| {
            error!(error = %err, "Failed to fetch the locally saved project");
            ProjectValues::with_code("", "")
        })
    }

    // Accessors

    pub fn user(&self) -> UserRole {
        self.user
    }

    pub fn repository(&self) -> &ProjectRepository {
        &self.repo
    }

    pub fn current_key(&self) -> ProjectKey {
        self.current
    }

    pub fn current_project(&self) -> &Project {
        self.repo.get(self.current)
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Requests sent whose completion has not been applied yet
    pub fn pending_requests(&self) -> usize {
        self.pending
    }

    /// Whether a confirm or rename prompt is waiting for an answer
    pub fn has_pending_dialog(&self) -> bool {
        self.dialog.is_some()
    }

    /// The most recently broadcast status
    pub fn status(&self) -> &StatusBundle {
        &self.status
    }

    /// Register a status subscriber; it immediately receives the current status
    pub fn add_status_subscriber(&mut self, mut subscriber: Box<dyn StatusSubscriber>) {
        subscriber.apply_status(&self.status);
        self.subscribers.push(subscriber);
    }

    // Dispatch

    /// Dispatch every action queued by the UI, oldest first
    pub fn dispatch_queued(&mut self, queue: &ActionQueue) {
        for action in queue.drain() {
            self.dispatch(action);
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        if self.updating {
            warn!(action = %action, "{} action is invoked in updating", action.id());
        } else {
            info!(action = %action, "{} action is invoked", action.id());
        }

        if action.may_discard_edits() && self.is_modified {
            self.open_dialog(PendingDialog::Confirm(action));
            self.dialogs.confirm_discard(self.messages.confirm_discard());
        } else {
            self.route(action);
        }

        if !self.updating {
            self.update_components();
        }
    }

    fn route(&mut self, action: Action) {
        match action {
            Action::CurrentProjectChanged => self.is_modified = true,
            Action::NewProject => {
                let key = self
                    .repo
                    .create(ProjectType::Private, ProjectValues::with_code("", ""));
                self.open_project(key);
                self.is_modified = false;
            }
            Action::OpenProject(id) => self.action_open_project(&id),
            Action::RenameProject(id) => self.action_rename_project(&id),
            Action::DeleteProject(id) => self.action_delete_project(&id),
            Action::CloneCurrentProject => self.action_clone_current_project(),
            Action::SaveCurrentProject => self.action_save_current_project(),
            Action::RenameCurrentProject => self.action_rename_current_project(),
            Action::PublishCurrentProject => self.action_publish_current_project(),
            Action::UpdatePreview => self.action_update_preview(),
            Action::ClearConsole => self.console.clear(),
            Action::Undo => self.editor.undo(),
            Action::Redo => self.editor.redo(),
            Action::Search(query) => self.editor.search_reference(&query),
            Action::FindNext(query) => self.editor.find_next(&query),
            Action::FindPrev(query) => self.editor.find_prev(&query),
            Action::About => self.editor.show_about(),
            Action::TabChanged => self.editor.tab_changed(),
        }
    }

    fn open_dialog(&mut self, dialog: PendingDialog) {
        if let Some(previous) = self.dialog.replace(dialog) {
            warn!(previous = ?previous, "Replacing an unanswered dialog");
        }
    }

    /// Answer the discard confirmation; a parked action runs only when accepted
    pub fn resolve_confirm(&mut self, accepted: bool) {
        match self.dialog.take() {
            Some(PendingDialog::Confirm(action)) => {
                if accepted {
                    info!(action = %action, "Discarding modifications");
                    self.route(action);
                } else {
                    debug!(action = %action, "Discard declined");
                }
            }
            other => {
                self.dialog = other;
                warn!("No confirmation is waiting for an answer");
                return;
            }
        }

        if !self.updating {
            self.update_components();
        }
    }

    /// Answer the project name prompt; `None` means cancelled.
    ///
    /// The name is committed only when it is non-empty and differs from the default shown.
    pub fn resolve_rename(&mut self, text: Option<&str>) {
        let target = match self.dialog.take() {
            Some(PendingDialog::Rename(target)) => target,
            other => {
                self.dialog = other;
                warn!("No rename prompt is waiting for an answer");
                return;
            }
        };

        match text.filter(|name| !name.is_empty() && *name != target.default_name) {
            None => debug!("Project name unchanged"),
            Some(_) if !self.repo.contains(target.key) => {
                debug!("Renamed project no longer exists")
            }
            Some(name) => {
                self.repo.set_name(target.key, Some(name));
                if target.saves {
                    self.is_modified = false;
                }
                let request = self.repo.put(target.key, Format::Rename);
                self.submit(request, Continuation::Rename);
            }
        }

        if !self.updating {
            self.update_components();
        }
    }

    /// The editor header's name, or the localized placeholder when it shows none
    fn shown_project_name(&self) -> String {
        self.editor
            .display_project_name()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.messages.new_project().to_string())
    }

    fn prompt_rename(&mut self, key: ProjectKey, default_name: String, saves: bool) {
        self.dialogs.prompt_project_name(&default_name);
        self.open_dialog(PendingDialog::Rename(RenameTarget {
            key,
            default_name,
            saves,
        }));
    }

    // Action handlers

    fn action_open_project(&mut self, id: &ProjectId) {
        let key = self
            .repo
            .find_by_id(id)
            .unwrap_or_else(|| panic!("Invoked OPEN_PROJECT action with an invalid id ({id})"));
        self.open_project(key);
        self.is_modified = false;
    }

    fn action_rename_project(&mut self, id: &ProjectId) {
        let key = self
            .repo
            .find_by_id(id)
            .unwrap_or_else(|| panic!("Invoked RENAME_PROJECT action with an invalid id ({id})"));

        if !self.user.is_user() {
            error!("Invoked RENAME_PROJECT command by guest");
            return;
        }

        let project = self.repo.get(key);
        if !self.user.is_admin() && !project.is_private() {
            return;
        }

        let default_name = project.name().unwrap_or_default().to_string();
        self.prompt_rename(key, default_name, false);
    }

    fn action_delete_project(&mut self, id: &ProjectId) {
        let key = self
            .repo
            .find_by_id(id)
            .unwrap_or_else(|| panic!("DELETE_PROJECT action invoked with an invalid id ({id})"));

        if key == self.current {
            let fresh = self
                .repo
                .create(ProjectType::Private, ProjectValues::with_code("", ""));
            self.open_project(fresh);
            self.is_modified = false;
        }

        if let Some(request) = self.repo.del(key) {
            self.submit(request, Continuation::Store);
        }
        self.listing.delete_project(id);
    }

    fn action_clone_current_project(&mut self) {
        let values = ProjectValues {
            id: None,
            name: self.current_project().name().map(str::to_string),
            js: Some(self.editor.code(Buffer::Js)),
            html: Some(self.editor.code(Buffer::Html)),
        };
        let copy = self.repo.create(ProjectType::Private, values);
        self.open_project(copy);
        self.is_modified = true;
    }

    fn action_save_current_project(&mut self) {
        if !self.user.is_user() {
            error!("Invoked SAVE_CURRENT_PROJECT command by guest");
            return;
        }

        self.ensure_private_copy();
        self.export_to_project(self.current);
        self.persist_locally(self.current);

        if self.current_project().is_new() {
            let default_name = self.shown_project_name();
            self.prompt_rename(self.current, default_name, true);
        } else {
            let request = self.repo.put(self.current, Format::All);
            self.submit(request, Continuation::Store);
            self.is_modified = false;
        }
    }

    fn action_rename_current_project(&mut self) {
        if !self.current_project().is_fetched() {
            return;
        }
        if !self.user.is_user() {
            error!("Invoked RENAME_CURRENT_PROJECT command by guest");
            return;
        }

        self.ensure_private_copy();
        self.export_to_project(self.current);
        self.persist_locally(self.current);

        let default_name = self.shown_project_name();
        self.prompt_rename(self.current, default_name, false);
    }

    fn action_publish_current_project(&mut self) {
        if !self.user.is_admin() {
            error!("Invoked PUBLISH_CURRENT_PROJECT command without admin privilege");
            return;
        }

        self.export_to_project(self.current);
        self.persist_locally(self.current);
        let request = self.repo.post(self.current, Format::Publish);
        self.submit(request, Continuation::Store);
    }

    fn action_update_preview(&mut self) {
        self.export_to_project(self.current);
        self.persist_locally(self.current);

        let source = self.current_project().js_code().to_string();
        if let Some(compiled) = self.compile_cache.get(&source) {
            info!("Skip the compile request since the js code is cached");
            let html = self.current_project().html_code().to_string();
            self.update_preview(&compiled, &source, &html);
            return;
        }

        if !self.compiling.insert(normalize_source(&source)) {
            info!("Skip the compile request since an identical one is in flight");
            return;
        }

        let format = match self.config.preview.mode {
            PreviewMode::Compile => Format::Compile,
            PreviewMode::Requires => Format::Requires,
        };
        let request = self.repo.post(self.current, format);
        self.submit(request, Continuation::Preview { source });
    }

    // Project switching and local state

    /// A public project edited by a non-admin is saved as a private copy
    fn ensure_private_copy(&mut self) {
        if !self.user.is_admin() && !self.current_project().is_private() {
            let copy = self.repo.duplicate_as_private(self.current);
            info!("Switching to a private copy of the public project");
            self.open_project(copy);
        }
    }

    fn open_project(&mut self, key: ProjectKey) {
        if key != self.current
            && self.repo.contains(self.current)
            && self.repo.get(self.current).is_new()
        {
            debug!("Discarding the unsaved scratch project");
            self.repo.discard(self.current);
        }

        self.current = key;
        let request = self.repo.fetch(key);
        self.submit(request, Continuation::Open);
    }

    fn export_to_project(&mut self, key: ProjectKey) {
        let js = self.editor.code(Buffer::Js);
        let html = self.editor.code(Buffer::Html);
        self.repo.set_js_code(key, Some(&js));
        self.repo.set_html_code(key, Some(&html));
    }

    fn import_from_project(&mut self, key: ProjectKey) {
        let project = self.repo.get(key);
        self.editor.set_code(Buffer::Js, project.js_code());
        self.editor.set_code(Buffer::Html, project.html_code());
        self.editor.set_project_name(project.name());
    }

    fn persist_locally(&self, key: ProjectKey) {
        if let Err(err) = self.write_local(self.repo.get(key)) {
            error!(error = %err, "Failed to save the project locally");
        }
    }

    fn write_local(&self, project: &Project) -> Result<()> {
        match project.id() {
            Some(id) => {
                self.store
                    .set_cookie(COOKIE_PROJECT_ID, id.as_str(), COOKIE_MAX_AGE)?;
                info!(project_id = %id, "Set cookie {COOKIE_PROJECT_ID}");
            }
            None => {
                self.store.remove_cookie(COOKIE_PROJECT_ID)?;
                info!("Remove cookie {COOKIE_PROJECT_ID}");
            }
        }
        self.store.set(KEY_JS, project.js_code())?;
        self.store.set(KEY_HTML, project.html_code())?;
        Ok(())
    }

    fn update_preview(&mut self, compiled: &str, source: &str, html: &str) {
        self.compile_cache.insert(source, compiled);
        self.preview.set_content(&compose_document(compiled, html));
    }

    // Status

    fn app_status(&self) -> AppStatus {
        let exists = self.repo.contains(self.current);
        let history = self.editor.history_depth();
        AppStatus {
            is_user: self.user.is_user(),
            is_admin: self.user.is_admin(),
            is_private: exists && self.repo.get(self.current).is_private(),
            is_modified: self.is_modified,
            exists,
            can_undo: history.can_undo(),
            can_redo: history.can_redo(),
        }
    }

    /// Rebuild the status bundle and hand it to every subscriber
    pub(crate) fn update_components(&mut self) {
        if self.updating {
            warn!("update_components is called recursively");
            return;
        }

        self.updating = true;
        self.drain_log_relay();
        let bundle = StatusBundle::build(self.app_status());
        for subscriber in &mut self.subscribers {
            subscriber.apply_status(&bundle);
        }
        self.status = bundle;
        self.updating = false;
    }

    /// Show relayed log records in the console pane from now on
    pub fn attach_log_relay(&mut self, receiver: ConsoleLogReceiver) {
        self.log_relay = Some(receiver);
        self.drain_log_relay();
    }

    fn drain_log_relay(&mut self) {
        let Some(receiver) = self.log_relay.as_mut() else {
            return;
        };
        while let Ok(record) = receiver.try_recv() {
            self.console
                .add_log(record.level, &record.message, &record.target);
        }
    }

    // Requests and completions

    fn submit(&mut self, request: Request, then: Continuation) {
        let transport = Arc::clone(&self.transport);
        let completions = self.completions_tx.clone();
        self.pending += 1;

        debug!(
            method = %request.method(),
            format = %request.format(),
            local = request.is_local(),
            "Sending request"
        );

        tokio::spawn(async move {
            let outcome = request.send(transport.as_ref()).await;
            let _ = completions.send(Completion { outcome, then });
        });
    }

    /// Apply every completion that has already arrived. Returns how many were applied.
    pub fn process_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Wait until every request sent so far has completed and been applied
    pub async fn settle(&mut self) {
        while self.pending > 0 {
            match self.completions_rx.recv().await {
                Some(completion) => self.apply(completion),
                None => break,
            }
        }
    }

    fn apply(&mut self, completion: Completion) {
        self.pending = self.pending.saturating_sub(1);

        let Completion { outcome, then } = completion;
        if let Err(err) = self.complete(&outcome, then) {
            error!(
                error = %err,
                method = %outcome.method,
                format = %outcome.format,
                "Failed to apply a request completion"
            );
        }

        if !self.updating {
            self.update_components();
        }
    }

    fn complete(&mut self, outcome: &RequestOutcome, then: Continuation) -> Result<()> {
        if let Continuation::Preview { source } = &then {
            self.compiling.remove(&normalize_source(source));
        }

        self.repo.complete(outcome)?;

        match then {
            Continuation::Store => Ok(()),
            Continuation::Open => {
                self.open_completed(outcome);
                Ok(())
            }
            Continuation::Rename => {
                self.rename_completed(outcome);
                Ok(())
            }
            Continuation::Preview { source } => self.preview_completed(outcome, &source),
        }
    }

    fn open_completed(&mut self, outcome: &RequestOutcome) {
        let key = outcome.key;
        if key != self.current {
            debug!("Ignoring a fetch for a project that is no longer current");
            return;
        }

        if outcome.is_success() {
            self.import_from_project(key);
            self.persist_locally(key);
            return;
        }

        let name = self
            .repo
            .get(key)
            .name()
            .unwrap_or(self.messages.new_project())
            .to_string();
        let fresh = self
            .repo
            .create(ProjectType::Private, ProjectValues::with_code("", ""));
        self.open_project(fresh);
        self.console
            .add_log(Level::ERROR, &self.messages.failed_to_load(&name), APP_LOGGER);
    }

    fn rename_completed(&mut self, outcome: &RequestOutcome) {
        if !outcome.is_success() || !self.repo.contains(outcome.key) {
            return;
        }

        let project = self.repo.get(outcome.key);
        let name = project.name().unwrap_or_default().to_string();
        if let Some(id) = project.id() {
            self.listing.apply_project(id, &name, project.is_private());
        }

        if outcome.key == self.current {
            self.editor.set_project_name(Some(&name));
            self.persist_locally(self.current);
        }
    }

    fn preview_completed(&mut self, outcome: &RequestOutcome, source: &str) -> Result<()> {
        let body = match &outcome.result {
            Ok(response) => &response.body,
            Err(err) => {
                warn!(error = %err, "Preview request failed");
                return Ok(());
            }
        };

        let value = kitchen_project::parse_value(body, outcome.format)?;
        let report = match outcome.format {
            Format::Requires => CompileReport::from_requires(&value, source),
            _ => CompileReport::from_compile(&value),
        };

        if outcome.key != self.current {
            debug!("Ignoring a preview for a project that is no longer current");
            self.compile_cache.insert(source, &report.code);
            return Ok(());
        }

        for line in report.console_lines() {
            self.console.add_log(line.level, &line.message, &line.logger);
        }

        let html = self.current_project().html_code().to_string();
        self.update_preview(&report.code, source, &html);
        Ok(())
    }

    // Session surface

    /// Forward a message posted from inside the preview frame to the console pane
    pub fn relay_from_preview(&mut self, raw: &str) {
        match BridgeMessage::parse(raw) {
            Ok(message) => {
                let line = message.into_console_line();
                self.console.add_log(line.level, &line.message, &line.logger);
            }
            Err(err) => warn!(error = %err, "Ignoring malformed preview message"),
        }
    }

    /// Called when the page is about to unload; `Some` asks the user to confirm leaving
    pub fn on_unload(&mut self) -> Option<String> {
        if !self.user.is_user() && self.config.session.persist_guest_on_unload {
            self.export_to_project(self.current);
            self.persist_locally(self.current);
        }

        (self.is_modified && self.config.session.confirm_unload)
            .then(|| self.messages.confirm_discard().to_string())
    }

    pub fn save_split_positions(&self, hpos: f64, vpos: f64) {
        let write = || -> Result<()> {
            self.store.set(KEY_HPOS, &hpos.to_string())?;
            self.store.set(KEY_VPOS, &vpos.to_string())?;
            Ok(())
        };
        match write() {
            Ok(()) => info!(hpos, vpos, "Save the split positions"),
            Err(err) => error!(error = %err, "Failed to save the split positions"),
        }
    }

    /// Saved split positions, `(0.0, 0.0)` when unknown
    pub fn split_positions(&self) -> (f64, f64) {
        let read = |key: &str| -> Result<f64> {
            Ok(self
                .store
                .get(key)?
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(0.0))
        };
        match (read(KEY_HPOS), read(KEY_VPOS)) {
            (Ok(hpos), Ok(vpos)) => (hpos, vpos),
            (Err(err), _) | (_, Err(err)) => {
                error!(error = %err, "Failed to fetch the locally saved settings");
                (0.0, 0.0)
            }
        }
    }

    pub fn tutorial_seen(&self) -> bool {
        match self.store.get(KEY_TUTORIAL) {
            Ok(value) => value.is_some_and(|v| v == "1"),
            Err(err) => {
                error!(error = %err, "Failed to read the tutorial flag");
                false
            }
        }
    }

    pub fn mark_tutorial_seen(&self) {
        if let Err(err) = self.store.set(KEY_TUTORIAL, "1") {
            error!(error = %err, "Failed to save the tutorial flag");
        }
    }
}
