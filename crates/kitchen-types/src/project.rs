// ABOUTME: Project identity, classification and request format types
// ABOUTME: Shared by the repository, the transports and the app controller

use serde::{Deserialize, Serialize};

/// Opaque project identifier assigned by the backend (e.g. "u_1a2b", "s_ff")
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Create a new project id
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ProjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ProjectId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ownership class of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Owned by the signed-in user
    Private,
    /// Sample/template project shared with everyone
    Public,
}

/// Named projection of a project's fields for one request purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Format {
    All,
    Rename,
    Publish,
    Compile,
    Requires,
}

impl Format {
    /// Formats whose responses carry project state back into the model
    pub fn syncs_state(self) -> bool {
        matches!(self, Format::All | Format::Rename)
    }

    /// Content type of a request body serialized in this format
    pub fn content_type(self) -> &'static str {
        match self {
            Format::Compile => "text/javascript",
            _ => "application/json",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Format::All => "ALL",
            Format::Rename => "RENAME",
            Format::Publish => "PUBLISH",
            Format::Compile => "COMPILE",
            Format::Requires => "REQUIRES",
        };
        f.write_str(name)
    }
}

/// HTTP-like verb of a repository request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this verb carry a body
    pub fn has_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field values of a project as exchanged with the backend (`{id, n, j, h}`)
///
/// Only string-typed fields are honoured; anything else deserializes to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectValues {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(rename = "n", default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "j", default, deserialize_with = "lenient_string")]
    pub js: Option<String>,
    #[serde(rename = "h", default, deserialize_with = "lenient_string")]
    pub html: Option<String>,
}

impl ProjectValues {
    pub fn with_code(js: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            js: Some(js.into()),
            html: Some(html.into()),
            ..Default::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}
