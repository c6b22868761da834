// ABOUTME: Static metadata catalog for every action id
// ABOUTME: Drives toolbar/menu construction: kind, label and tooltip per action

use crate::action::ActionId;

/// How a UI control bound to an action behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Fires once per activation
    OneShot,
    /// Carries a checked state
    Toggle,
    /// Carries a selected value
    Select,
    /// Carries free text (search box)
    Text,
}

/// Read-only description of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionMetaData {
    pub kind: ActionKind,
    pub label: &'static str,
    pub tooltip: &'static str,
}

const fn one_shot(label: &'static str, tooltip: &'static str) -> ActionMetaData {
    ActionMetaData {
        kind: ActionKind::OneShot,
        label,
        tooltip,
    }
}

impl ActionMetaData {
    /// Metadata of an action
    pub fn of(id: ActionId) -> &'static ActionMetaData {
        static NEW_PROJECT: ActionMetaData = one_shot("New Project", "Create a new project.");
        static OPEN_PROJECT: ActionMetaData = one_shot("Open", "Open this project.");
        static RENAME_PROJECT: ActionMetaData =
            one_shot("Rename", "Change the name of this project.");
        static DELETE_PROJECT: ActionMetaData = one_shot("Delete", "Delete this project.");
        static CLONE: ActionMetaData = one_shot(
            "Clone",
            "Create a new project with this javascript / html code.",
        );
        static SAVE: ActionMetaData = one_shot("Save", "Save this project.");
        static RENAME_CURRENT: ActionMetaData =
            one_shot("Rename", "Change the name of this project.");
        static PUBLISH: ActionMetaData = one_shot("Publish", "Publish this project.");
        static UNDO: ActionMetaData = one_shot("Undo", "Undo last action.");
        static REDO: ActionMetaData = one_shot("Redo", "Do again the last undone action.");
        static UPDATE_PREVIEW: ActionMetaData =
            one_shot("Reload", "Reload and update preview.");
        static CLEAR_CONSOLE: ActionMetaData = one_shot("Clear", "Clear debug console.");
        static SEARCH: ActionMetaData = ActionMetaData {
            kind: ActionKind::Text,
            label: "Search",
            tooltip: "Search the reference.",
        };
        static FIND_NEXT: ActionMetaData = one_shot("Next", "Find the next occurrence.");
        static FIND_PREV: ActionMetaData = one_shot("Previous", "Find the previous occurrence.");
        static ABOUT: ActionMetaData = one_shot("About", "About Closure Kitchen.");
        static CHANGED: ActionMetaData = one_shot("Modified", "");
        static TAB_CHANGED: ActionMetaData = one_shot("Tab", "");

        match id {
            ActionId::NewProject => &NEW_PROJECT,
            ActionId::OpenProject => &OPEN_PROJECT,
            ActionId::RenameProject => &RENAME_PROJECT,
            ActionId::DeleteProject => &DELETE_PROJECT,
            ActionId::CloneCurrentProject => &CLONE,
            ActionId::SaveCurrentProject => &SAVE,
            ActionId::RenameCurrentProject => &RENAME_CURRENT,
            ActionId::PublishCurrentProject => &PUBLISH,
            ActionId::Undo => &UNDO,
            ActionId::Redo => &REDO,
            ActionId::UpdatePreview => &UPDATE_PREVIEW,
            ActionId::ClearConsole => &CLEAR_CONSOLE,
            ActionId::Search => &SEARCH,
            ActionId::FindNext => &FIND_NEXT,
            ActionId::FindPrev => &FIND_PREV,
            ActionId::About => &ABOUT,
            ActionId::CurrentProjectChanged => &CHANGED,
            ActionId::TabChanged => &TAB_CHANGED,
        }
    }
}

/// Global keyboard shortcut bound to an action, if any
pub fn shortcut_for(id: ActionId) -> Option<&'static str> {
    match id {
        ActionId::SaveCurrentProject => Some("ctrl+s"),
        _ => None,
    }
}
