// ABOUTME: User-intent identifiers and the actions dispatched through the app controller
// ABOUTME: Actions carry their payload so dispatch is an exhaustive match

use kitchen_types::ProjectId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier of a user action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionId {
    NewProject,
    OpenProject,
    RenameProject,
    DeleteProject,
    CloneCurrentProject,
    SaveCurrentProject,
    RenameCurrentProject,
    PublishCurrentProject,
    Undo,
    Redo,
    UpdatePreview,
    ClearConsole,
    Search,
    FindNext,
    FindPrev,
    About,
    CurrentProjectChanged,
    TabChanged,
}

impl ActionId {
    /// Every action id, in toolbar order
    pub const ALL: [ActionId; 18] = [
        ActionId::NewProject,
        ActionId::OpenProject,
        ActionId::RenameProject,
        ActionId::DeleteProject,
        ActionId::CloneCurrentProject,
        ActionId::SaveCurrentProject,
        ActionId::RenameCurrentProject,
        ActionId::PublishCurrentProject,
        ActionId::Undo,
        ActionId::Redo,
        ActionId::UpdatePreview,
        ActionId::ClearConsole,
        ActionId::Search,
        ActionId::FindNext,
        ActionId::FindPrev,
        ActionId::About,
        ActionId::CurrentProjectChanged,
        ActionId::TabChanged,
    ];

    /// Wire name used by UI components
    pub fn as_str(self) -> &'static str {
        match self {
            ActionId::NewProject => "NEW_PROJECT",
            ActionId::OpenProject => "OPEN_PROJECT",
            ActionId::RenameProject => "RENAME_PROJECT",
            ActionId::DeleteProject => "DELETE_PROJECT",
            ActionId::CloneCurrentProject => "CLONE_CURRENT_PROJECT",
            ActionId::SaveCurrentProject => "SAVE_CURRENT_PROJECT",
            ActionId::RenameCurrentProject => "RENAME_CURRENT_PROJECT",
            ActionId::PublishCurrentProject => "PUBLISH_CURRENT_PROJECT",
            ActionId::Undo => "UNDO",
            ActionId::Redo => "REDO",
            ActionId::UpdatePreview => "UPDATE_PREVIEW",
            ActionId::ClearConsole => "CLEAR_CONSOLE",
            ActionId::Search => "SEARCH",
            ActionId::FindNext => "FIND_NEXT",
            ActionId::FindPrev => "FIND_PREV",
            ActionId::About => "ABOUT",
            ActionId::CurrentProjectChanged => "CURRENT_PROJECT_CHANGED",
            ActionId::TabChanged => "TAB_CHANGED",
        }
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionId {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ActionError::UnknownAction {
                name: s.to_string(),
            })
    }
}

/// Errors raised while decoding an action coming from a UI component
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("Unknown action id '{name}'")]
    UnknownAction { name: String },

    #[error("Action {id} requires an argument")]
    MissingArgument { id: ActionId },
}

/// A dispatched user intent together with its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NewProject,
    OpenProject(ProjectId),
    RenameProject(ProjectId),
    DeleteProject(ProjectId),
    CloneCurrentProject,
    SaveCurrentProject,
    RenameCurrentProject,
    PublishCurrentProject,
    Undo,
    Redo,
    UpdatePreview,
    ClearConsole,
    Search(String),
    FindNext(String),
    FindPrev(String),
    About,
    CurrentProjectChanged,
    TabChanged,
}

impl Action {
    /// Decode an action from its wire id and optional payload
    pub fn from_wire(id: ActionId, data: Option<String>) -> Result<Self, ActionError> {
        let project = |data: Option<String>| {
            data.filter(|d| !d.is_empty())
                .map(ProjectId::new)
                .ok_or(ActionError::MissingArgument { id })
        };

        Ok(match id {
            ActionId::NewProject => Action::NewProject,
            ActionId::OpenProject => Action::OpenProject(project(data)?),
            ActionId::RenameProject => Action::RenameProject(project(data)?),
            ActionId::DeleteProject => Action::DeleteProject(project(data)?),
            ActionId::CloneCurrentProject => Action::CloneCurrentProject,
            ActionId::SaveCurrentProject => Action::SaveCurrentProject,
            ActionId::RenameCurrentProject => Action::RenameCurrentProject,
            ActionId::PublishCurrentProject => Action::PublishCurrentProject,
            ActionId::Undo => Action::Undo,
            ActionId::Redo => Action::Redo,
            ActionId::UpdatePreview => Action::UpdatePreview,
            ActionId::ClearConsole => Action::ClearConsole,
            ActionId::Search => Action::Search(data.unwrap_or_default()),
            ActionId::FindNext => Action::FindNext(data.unwrap_or_default()),
            ActionId::FindPrev => Action::FindPrev(data.unwrap_or_default()),
            ActionId::About => Action::About,
            ActionId::CurrentProjectChanged => Action::CurrentProjectChanged,
            ActionId::TabChanged => Action::TabChanged,
        })
    }

    pub fn id(&self) -> ActionId {
        match self {
            Action::NewProject => ActionId::NewProject,
            Action::OpenProject(_) => ActionId::OpenProject,
            Action::RenameProject(_) => ActionId::RenameProject,
            Action::DeleteProject(_) => ActionId::DeleteProject,
            Action::CloneCurrentProject => ActionId::CloneCurrentProject,
            Action::SaveCurrentProject => ActionId::SaveCurrentProject,
            Action::RenameCurrentProject => ActionId::RenameCurrentProject,
            Action::PublishCurrentProject => ActionId::PublishCurrentProject,
            Action::Undo => ActionId::Undo,
            Action::Redo => ActionId::Redo,
            Action::UpdatePreview => ActionId::UpdatePreview,
            Action::ClearConsole => ActionId::ClearConsole,
            Action::Search(_) => ActionId::Search,
            Action::FindNext(_) => ActionId::FindNext,
            Action::FindPrev(_) => ActionId::FindPrev,
            Action::About => ActionId::About,
            Action::CurrentProjectChanged => ActionId::CurrentProjectChanged,
            Action::TabChanged => ActionId::TabChanged,
        }
    }

    /// Actions that may throw away unsaved edits and therefore pass the confirmation gate
    pub fn may_discard_edits(&self) -> bool {
        matches!(
            self,
            Action::NewProject
                | Action::OpenProject(_)
                | Action::CloneCurrentProject
                | Action::DeleteProject(_)
        )
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::OpenProject(id) | Action::RenameProject(id) | Action::DeleteProject(id) => {
                write!(f, "{}({})", self.id(), id)
            }
            Action::Search(text) | Action::FindNext(text) | Action::FindPrev(text) => {
                write!(f, "{}({:?})", self.id(), text)
            }
            _ => write!(f, "{}", self.id()),
        }
    }
}
