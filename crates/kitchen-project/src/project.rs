// ABOUTME: The project model: identity, classification and possibly-unfetched code fields
// ABOUTME: Instances live in the repository arena and are addressed by ProjectKey

use kitchen_types::{ProjectId, ProjectType, ProjectValues};

use crate::codec::Fields;

slotmap::new_key_type! {
    /// Arena handle of a live project object
    pub struct ProjectKey;
}

/// A JavaScript/HTML snippet pair with an optional backend identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub(crate) kind: ProjectType,
    pub(crate) id: Option<ProjectId>,
    pub(crate) name: Option<String>,
    pub(crate) js: Option<String>,
    pub(crate) html: Option<String>,
    pub(crate) delete_requested: bool,
}

impl Project {
    /// Build an unsaved project; any id in `values` is ignored
    pub(crate) fn new(kind: ProjectType, values: ProjectValues) -> Self {
        Self {
            kind,
            id: None,
            name: values.name,
            js: values.js,
            html: values.html,
            delete_requested: false,
        }
    }

    pub fn id(&self) -> Option<&ProjectId> {
        self.id.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn project_type(&self) -> ProjectType {
        self.kind
    }

    pub fn is_private(&self) -> bool {
        self.kind == ProjectType::Private
    }

    /// JavaScript source, empty when not fetched
    pub fn js_code(&self) -> &str {
        self.js.as_deref().unwrap_or_default()
    }

    /// HTML source, empty when not fetched
    pub fn html_code(&self) -> &str {
        self.html.as_deref().unwrap_or_default()
    }

    /// Never stored on the backend
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn is_fetched(&self) -> bool {
        self.is_new() || (self.js.is_some() && self.html.is_some())
    }

    pub(crate) fn fields(&self) -> Fields<'_> {
        Fields {
            is_new: self.is_new(),
            name: self.name.as_deref(),
            js: self.js.as_deref(),
            html: self.html.as_deref(),
        }
    }

    /// Apply only the fields the backend sent as strings
    pub(crate) fn merge(&mut self, values: &ProjectValues) {
        if let Some(name) = &values.name {
            self.name = Some(name.clone());
        }
        if let Some(js) = &values.js {
            self.js = Some(js.clone());
        }
        if let Some(html) = &values.html {
            self.html = Some(html.clone());
        }
    }
}
