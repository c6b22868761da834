// ABOUTME: Capability traits for the UI collaborators the app controller drives
// ABOUTME: Editor, preview, console, listing, dialogs and status subscribers sit behind these

use kitchen_logging::Level;
use kitchen_types::{Buffer, HistoryDepth, ProjectId};

use crate::status::StatusBundle;

/// Code editor capabilities
pub trait EditorSurface {
    /// Current text of a buffer
    fn code(&self, buffer: Buffer) -> String;

    /// Replace the text of a buffer, resetting its history
    fn set_code(&mut self, buffer: Buffer, code: &str);

    /// Undo/redo depth of the active buffer
    fn history_depth(&self) -> HistoryDepth;

    fn undo(&mut self);

    fn redo(&mut self);

    fn find_next(&mut self, query: &str);

    fn find_prev(&mut self, query: &str);

    /// Look a term up in the API reference
    fn search_reference(&mut self, query: &str);

    fn focus(&mut self);

    /// Show the project name in the editor header
    fn set_project_name(&mut self, name: Option<&str>);

    /// Name as currently shown in the header, `None` while it shows none
    fn display_project_name(&self) -> Option<String> {
        None
    }

    /// The active buffer tab switched
    fn tab_changed(&mut self) {}

    fn show_about(&mut self) {}
}

/// Preview frame capabilities
pub trait PreviewSurface {
    /// Replace the frame with a complete HTML document
    fn set_content(&mut self, html: &str);
}

/// Console pane capabilities
pub trait ConsoleSurface {
    /// Append a record; `logger` names its origin ("error", "uncaught exception", ...)
    fn add_log(&mut self, level: Level, message: &str, logger: &str);

    fn clear(&mut self);
}

/// Project tree/listing capabilities
pub trait ProjectListing {
    /// Insert or refresh the entry for a saved project
    fn apply_project(&mut self, id: &ProjectId, name: &str, private: bool);

    fn delete_project(&mut self, id: &ProjectId);
}

/// Modal dialog capabilities
///
/// Both prompts are answered asynchronously through the controller's
/// `resolve_confirm` / `resolve_rename`.
pub trait DialogHost {
    fn confirm_discard(&mut self, message: &str);

    fn prompt_project_name(&mut self, default_name: &str);
}

/// Anything that renders from a status snapshot (toolbar, menus, tree)
pub trait StatusSubscriber {
    fn apply_status(&mut self, bundle: &StatusBundle);
}
