// ABOUTME: Application status snapshot and the per-action visibility/enablement it implies
// ABOUTME: StatusBundle::build is the single place permission rules are written down

use std::collections::HashMap;

use kitchen_events::ActionId;

/// Inputs to the permission rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppStatus {
    pub is_user: bool,
    pub is_admin: bool,
    /// The current project is private
    pub is_private: bool,
    pub is_modified: bool,
    /// A current project exists
    pub exists: bool,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// How a control bound to one action should render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionStatus {
    pub visible: bool,
    pub enabled: bool,
    pub value: Option<String>,
}

impl ActionStatus {
    fn new(visible: bool, enabled: bool) -> Self {
        Self {
            visible,
            enabled,
            value: None,
        }
    }
}

/// Immutable snapshot handed to every status subscriber
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBundle {
    app: AppStatus,
    actions: HashMap<ActionId, ActionStatus>,
}

impl StatusBundle {
    pub fn build(status: AppStatus) -> Self {
        let AppStatus {
            is_user,
            is_admin,
            is_private,
            is_modified,
            exists,
            can_undo,
            can_redo,
        } = status;
        let owns = is_admin || is_private;

        let mut actions = HashMap::with_capacity(ActionId::ALL.len());
        for id in ActionId::ALL {
            let entry = match id {
                ActionId::NewProject | ActionId::OpenProject | ActionId::UpdatePreview => {
                    ActionStatus::new(true, exists)
                }
                ActionId::RenameProject => ActionStatus::new(true, exists && is_user && owns),
                ActionId::DeleteProject => ActionStatus::new(is_user, exists && owns),
                ActionId::CloneCurrentProject => ActionStatus::new(true, exists),
                ActionId::SaveCurrentProject => {
                    ActionStatus::new(true, exists && is_user && is_modified)
                }
                ActionId::RenameCurrentProject => ActionStatus::new(is_user, is_user),
                ActionId::PublishCurrentProject => ActionStatus::new(is_admin, is_admin && is_private),
                ActionId::Undo => ActionStatus::new(true, can_undo),
                ActionId::Redo => ActionStatus::new(true, can_redo),
                ActionId::ClearConsole
                | ActionId::Search
                | ActionId::FindNext
                | ActionId::FindPrev
                | ActionId::About => ActionStatus::new(true, true),
                ActionId::CurrentProjectChanged | ActionId::TabChanged => {
                    ActionStatus::new(false, true)
                }
            };
            actions.insert(id, entry);
        }

        Self {
            app: status,
            actions,
        }
    }

    /// Status of one action; every action has one
    pub fn status(&self, id: ActionId) -> &ActionStatus {
        &self.actions[&id]
    }

    pub fn is_enabled(&self, id: ActionId) -> bool {
        self.status(id).enabled
    }

    pub fn is_visible(&self, id: ActionId) -> bool {
        self.status(id).visible
    }

    pub fn app_status(&self) -> AppStatus {
        self.app
    }
}
