// ABOUTME: Bootstrap payload embedded in the page by the backend
// ABOUTME: Carries the user type, last opened project and project listings

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::project::ProjectValues;

/// Startup information handed to the app controller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupInfo {
    /// `guest`, `user` or `admin`
    #[serde(default)]
    pub user_type: String,

    /// Project reopened from the `ck_pid` cookie, if any
    #[serde(default)]
    pub project_id: Option<String>,

    /// Private projects of the signed-in user, keyed by id
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectValues>,

    /// Public sample projects, keyed by id
    #[serde(default)]
    pub samples: BTreeMap<String, ProjectValues>,
}

impl StartupInfo {
    /// Parse the JSON payload the page embeds
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
