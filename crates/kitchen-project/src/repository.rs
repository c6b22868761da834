// ABOUTME: Arena of live projects plus the id index of the ones stored on the backend
// ABOUTME: Builds requests for projects and applies their outcomes back onto the model

use slotmap::SlotMap;
use std::collections::{BTreeMap, HashMap};

use kitchen_types::{Format, HttpMethod, ProjectId, ProjectType, ProjectValues};

use crate::codec;
use crate::error::Result;
use crate::project::{Project, ProjectKey};
use crate::request::{Request, RequestOutcome};
use crate::transport::RequestSpec;

/// Owns every project object of the session
#[derive(Debug, Default)]
pub struct ProjectRepository {
    projects: SlotMap<ProjectKey, Project>,
    index: HashMap<ProjectId, ProjectKey>,
    initialized: bool,
}

impl ProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the index from the startup listings. Must be called exactly once.
    ///
    /// Panics when an id appears twice across both sets.
    pub fn initialize(
        &mut self,
        private: &BTreeMap<String, ProjectValues>,
        public: &BTreeMap<String, ProjectValues>,
    ) {
        assert!(!self.initialized, "Project repository is already initialized");
        self.initialized = true;

        for (set, kind) in [(public, ProjectType::Public), (private, ProjectType::Private)] {
            for (id, values) in set {
                if id.is_empty() {
                    continue;
                }
                let id = ProjectId::new(id.as_str());
                assert!(
                    !self.index.contains_key(&id),
                    "There are 2 or more projects with the id '{id}'"
                );

                let mut project = Project::new(kind, values.clone());
                project.id = Some(id.clone());
                let key = self.projects.insert(project);
                self.index.insert(id, key);
            }
        }

        kitchen_logging::info!(
            private = private.len(),
            public = public.len(),
            indexed = self.index.len(),
            "Project repository initialized"
        );
    }

    pub fn find_by_id(&self, id: &ProjectId) -> Option<ProjectKey> {
        self.index.get(id).copied()
    }

    /// Whether the key still addresses a live project
    pub fn contains(&self, key: ProjectKey) -> bool {
        self.projects.contains_key(key)
    }

    /// Panics when the project has been deleted
    pub fn get(&self, key: ProjectKey) -> &Project {
        self.projects
            .get(key)
            .unwrap_or_else(|| panic!("Project {key:?} used after delete"))
    }

    fn get_mut(&mut self, key: ProjectKey) -> &mut Project {
        self.projects
            .get_mut(key)
            .unwrap_or_else(|| panic!("Project {key:?} used after delete"))
    }

    /// Indexed (saved) projects, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (ProjectKey, &Project)> + '_ {
        self.index.values().map(|&key| (key, &self.projects[key]))
    }

    /// Number of indexed projects
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Construct an unsaved project. Never touches the index.
    pub fn create(&mut self, kind: ProjectType, values: ProjectValues) -> ProjectKey {
        self.projects.insert(Project::new(kind, values))
    }

    /// Unsaved private copy of a project's name and code
    pub fn duplicate_as_private(&mut self, key: ProjectKey) -> ProjectKey {
        let source = self.get(key);
        let values = ProjectValues {
            id: None,
            name: source.name.clone(),
            js: source.js.clone(),
            html: source.html.clone(),
        };
        self.create(ProjectType::Private, values)
    }

    pub fn set_name(&mut self, key: ProjectKey, name: Option<&str>) {
        self.get_mut(key).name = Some(name.unwrap_or_default().to_string());
    }

    pub fn set_js_code(&mut self, key: ProjectKey, js: Option<&str>) {
        self.get_mut(key).js = Some(js.unwrap_or_default().to_string());
    }

    pub fn set_html_code(&mut self, key: ProjectKey, html: Option<&str>) {
        self.get_mut(key).html = Some(html.unwrap_or_default().to_string());
    }

    /// Forget the code so the next fetch goes to the backend
    pub fn unfetch(&mut self, key: ProjectKey) {
        let project = self.get_mut(key);
        project.js = None;
        project.html = None;
    }

    pub fn serialize(&self, key: ProjectKey, format: Format) -> String {
        codec::serialize(self.get(key).fields(), format)
    }

    /// Apply a response body. Only ALL and RENAME responses carry state.
    ///
    /// Panics when the response assigns an id that is already indexed.
    pub fn load(&mut self, key: ProjectKey, raw: &str, format: Format) -> Result<()> {
        if !format.syncs_state() {
            return Ok(());
        }

        let values = codec::parse_values(raw, format)?;
        let project = self.get_mut(key);
        project.merge(&values);

        if let (Some(id), true) = (values.id, project.is_new()) {
            let id = ProjectId::new(id);
            assert!(
                !self.index.contains_key(&id),
                "Project id '{id}' must be unique"
            );
            self.get_mut(key).id = Some(id.clone());
            self.index.insert(id.clone(), key);
            kitchen_logging::debug!(project_id = %id, "Project indexed");
        }

        Ok(())
    }

    fn uri_for(project: &Project, format: Format) -> String {
        match format {
            Format::Requires => "/js".to_string(),
            Format::Publish => "/publish".to_string(),
            Format::Compile => "/compile".to_string(),
            Format::All | Format::Rename => match &project.id {
                None => "/projects".to_string(),
                Some(id) => {
                    let encoded: String =
                        url::form_urlencoded::byte_serialize(id.as_str().as_bytes()).collect();
                    format!("/projects?id={encoded}")
                }
            },
        }
    }

    fn build(&self, key: ProjectKey, method: HttpMethod, format: Format) -> Request {
        let project = self.get(key);
        let (body, content_type) = if method.has_body() {
            (
                Some(codec::serialize(project.fields(), format)),
                Some(format.content_type()),
            )
        } else {
            (None, None)
        };

        Request::remote(
            key,
            RequestSpec {
                uri: Self::uri_for(project, format),
                method,
                body,
                content_type,
                format,
            },
        )
    }

    /// GET the project's code. Already-fetched projects are answered with `{}` locally.
    pub fn fetch(&mut self, key: ProjectKey) -> Request {
        let request = if self.get(key).is_fetched() {
            Request::local(key, HttpMethod::Get, Format::All, "{}")
        } else {
            self.build(key, HttpMethod::Get, Format::All)
        };

        // Buffers read as empty while the fetch is in flight; a failure unfetches again
        let project = self.get_mut(key);
        project.js.get_or_insert_with(String::new);
        project.html.get_or_insert_with(String::new);

        request
    }

    /// Store the project: POST when unsaved, PUT otherwise
    pub fn put(&self, key: ProjectKey, format: Format) -> Request {
        let method = if self.get(key).is_new() {
            HttpMethod::Post
        } else {
            HttpMethod::Put
        };
        self.build(key, method, format)
    }

    /// POST the project to a format endpoint (`/compile`, `/js`, `/publish`)
    pub fn post(&self, key: ProjectKey, format: Format) -> Request {
        self.build(key, HttpMethod::Post, format)
    }

    /// DELETE the project. `None` when it is already deleted or a delete is in flight;
    /// there is nothing left to send in either case.
    pub fn del(&mut self, key: ProjectKey) -> Option<Request> {
        let Some(project) = self.projects.get_mut(key) else {
            kitchen_logging::debug!("Delete of an already removed project skipped");
            return None;
        };
        if project.delete_requested {
            return None;
        }
        project.delete_requested = true;

        if project.is_new() {
            Some(Request::local(key, HttpMethod::Delete, Format::All, "{}"))
        } else {
            Some(self.build(key, HttpMethod::Delete, Format::All))
        }
    }

    /// Drop an unsaved project that is no longer referenced
    pub fn discard(&mut self, key: ProjectKey) {
        assert!(
            self.get(key).is_new(),
            "Only unsaved projects can be discarded"
        );
        self.projects.remove(key);
    }

    fn remove(&mut self, key: ProjectKey) {
        if let Some(project) = self.projects.remove(key) {
            if let Some(id) = project.id {
                self.index.remove(&id);
                kitchen_logging::info!(project_id = %id, "Project removed from index");
            }
        }
    }

    /// Apply a request outcome to the model
    pub fn complete(&mut self, outcome: &RequestOutcome) -> Result<()> {
        if !self.contains(outcome.key) {
            kitchen_logging::debug!(
                method = %outcome.method,
                format = %outcome.format,
                "Outcome for a removed project ignored"
            );
            return Ok(());
        }

        match (&outcome.result, outcome.method) {
            (Ok(response), HttpMethod::Get | HttpMethod::Post) => {
                self.load(outcome.key, &response.body, outcome.format)
            }
            (Ok(_), HttpMethod::Delete) => {
                self.remove(outcome.key);
                Ok(())
            }
            (Ok(_), HttpMethod::Put) => Ok(()),
            (Err(_), HttpMethod::Get) => {
                self.unfetch(outcome.key);
                Ok(())
            }
            (Err(_), _) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProjectError, TransportError};
    use crate::transport::{OfflineTransport, Response};

    fn listing(entries: &[(&str, Option<&str>)]) -> BTreeMap<String, ProjectValues> {
        entries
            .iter()
            .map(|(id, js)| {
                let values = ProjectValues {
                    name: Some(format!("name of {id}")),
                    js: js.map(str::to_string),
                    html: js.map(|_| "<p/>".to_string()),
                    ..Default::default()
                };
                (id.to_string(), values)
            })
            .collect()
    }

    fn seeded() -> ProjectRepository {
        let mut repo = ProjectRepository::new();
        repo.initialize(
            &listing(&[("u_1", Some("mine()")), ("", Some("skipped"))]),
            &listing(&[("s_1", None)]),
        );
        repo
    }

    fn outcome(
        request: &Request,
        result: std::result::Result<Response, TransportError>,
    ) -> RequestOutcome {
        RequestOutcome {
            key: request.key(),
            method: request.method(),
            format: request.format(),
            result,
        }
    }

    #[test]
    fn test_initialize_indexes_both_sets() {
        let repo = seeded();
        assert_eq!(repo.len(), 2);

        let mine = repo.find_by_id(&ProjectId::new("u_1")).unwrap();
        assert!(repo.get(mine).is_private());
        assert!(repo.get(mine).is_fetched());

        let sample = repo.find_by_id(&ProjectId::new("s_1")).unwrap();
        assert_eq!(repo.get(sample).project_type(), ProjectType::Public);
        assert!(!repo.get(sample).is_fetched());
        assert!(repo.find_by_id(&ProjectId::new("")).is_none());
    }

    #[test]
    #[should_panic(expected = "2 or more projects")]
    fn test_initialize_rejects_duplicates() {
        let mut repo = ProjectRepository::new();
        repo.initialize(&listing(&[("x_1", None)]), &listing(&[("x_1", None)]));
    }

    #[test]
    #[should_panic(expected = "already initialized")]
    fn test_initialize_twice() {
        let mut repo = seeded();
        repo.initialize(&BTreeMap::new(), &BTreeMap::new());
    }

    #[test]
    fn test_create_never_indexes() {
        let mut repo = seeded();
        let values = ProjectValues {
            id: Some("u_1".into()),
            ..Default::default()
        };
        let key = repo.create(ProjectType::Private, values);
        assert!(repo.get(key).is_new());
        assert_ne!(repo.find_by_id(&ProjectId::new("u_1")), Some(key));
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn test_duplicate_as_private() {
        let mut repo = seeded();
        let sample = repo.find_by_id(&ProjectId::new("s_1")).unwrap();
        repo.set_js_code(sample, Some("copy()"));
        repo.set_html_code(sample, None);

        let copy = repo.duplicate_as_private(sample);
        let project = repo.get(copy);
        assert!(project.is_private());
        assert!(project.is_new());
        assert_eq!(project.name(), Some("name of s_1"));
        assert_eq!(project.js_code(), "copy()");
        assert_eq!(project.html_code(), "");
        assert_eq!(repo.get(sample).project_type(), ProjectType::Public);
    }

    #[test]
    fn test_duplicate_of_private_project_is_a_new_private_project() {
        let mut repo = seeded();
        let mine = repo.find_by_id(&ProjectId::new("u_1")).unwrap();

        let copy = repo.duplicate_as_private(mine);
        assert_ne!(copy, mine);
        let project = repo.get(copy);
        assert!(project.is_private());
        assert!(project.is_new());
        assert_eq!(project.name(), Some("name of u_1"));
        assert_eq!(project.js_code(), "mine()");
        assert_eq!(project.html_code(), "<p/>");

        // The source keeps its id and index entry
        assert_eq!(repo.find_by_id(&ProjectId::new("u_1")), Some(mine));
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn test_setters_normalize_absent() {
        let mut repo = ProjectRepository::new();
        let key = repo.create(ProjectType::Private, ProjectValues::default());
        repo.set_name(key, None);
        assert_eq!(repo.get(key).name(), Some(""));
        repo.set_js_code(key, None);
        assert_eq!(repo.serialize(key, Format::All), r#"{"n":"","j":"","h":null}"#);
    }

    #[test]
    fn test_load_assigns_id_once() {
        let mut repo = seeded();
        let key = repo.create(ProjectType::Private, ProjectValues::with_code("a", "b"));

        repo.load(key, r#"while(1);{"id":"u_2","n":"named"}"#, Format::All)
            .unwrap();
        assert_eq!(repo.get(key).id(), Some(&ProjectId::new("u_2")));
        assert_eq!(repo.get(key).name(), Some("named"));
        assert_eq!(repo.find_by_id(&ProjectId::new("u_2")), Some(key));

        // A saved project keeps its id
        repo.load(key, r#"{"id":"u_3"}"#, Format::All).unwrap();
        assert_eq!(repo.get(key).id(), Some(&ProjectId::new("u_2")));
        assert!(repo.find_by_id(&ProjectId::new("u_3")).is_none());
    }

    #[test]
    #[should_panic(expected = "must be unique")]
    fn test_load_rejects_colliding_id() {
        let mut repo = seeded();
        let key = repo.create(ProjectType::Private, ProjectValues::default());
        let _ = repo.load(key, r#"{"id":"u_1"}"#, Format::All);
    }

    #[test]
    fn test_load_ignores_stateless_formats() {
        let mut repo = ProjectRepository::new();
        let key = repo.create(ProjectType::Private, ProjectValues::default());
        for format in [Format::Publish, Format::Compile, Format::Requires] {
            repo.load(key, r#"{"id":"u_9","n":"no"}"#, format).unwrap();
        }
        assert!(repo.get(key).is_new());
        assert_eq!(repo.get(key).name(), None);
    }

    #[test]
    fn test_load_malformed_json() {
        let mut repo = ProjectRepository::new();
        let key = repo.create(ProjectType::Private, ProjectValues::default());
        let err = repo.load(key, "not json", Format::All).unwrap_err();
        assert!(matches!(err, ProjectError::Json { format: Format::All, .. }));
    }

    #[test]
    fn test_request_shapes() {
        let mut repo = seeded();
        let saved = repo.find_by_id(&ProjectId::new("u_1")).unwrap();
        let fresh = repo.create(ProjectType::Private, ProjectValues::with_code("x()", ""));

        let put = repo.put(saved, Format::Rename);
        let spec = put.spec().unwrap();
        assert_eq!(spec.method, HttpMethod::Put);
        assert_eq!(spec.uri, "/projects?id=u_1");
        assert_eq!(spec.body.as_deref(), Some(r#"{"n":"name of u_1"}"#));
        assert_eq!(spec.content_type, Some("application/json"));

        let post = repo.put(fresh, Format::All);
        assert_eq!(post.spec().unwrap().method, HttpMethod::Post);
        assert_eq!(post.spec().unwrap().uri, "/projects");

        let compile = repo.post(fresh, Format::Compile);
        let spec = compile.spec().unwrap();
        assert_eq!(spec.uri, "/compile");
        assert_eq!(spec.body.as_deref(), Some("x()"));
        assert_eq!(spec.content_type, Some("text/javascript"));

        assert_eq!(repo.post(fresh, Format::Requires).spec().unwrap().uri, "/js");
        assert_eq!(repo.post(fresh, Format::Publish).spec().unwrap().uri, "/publish");
    }

    #[test]
    fn test_uri_encodes_id() {
        let mut repo = ProjectRepository::new();
        let mut private = BTreeMap::new();
        private.insert("a b&c".to_string(), ProjectValues::default());
        repo.initialize(&private, &BTreeMap::new());
        let key = repo.find_by_id(&ProjectId::new("a b&c")).unwrap();

        let request = repo.fetch(key);
        assert_eq!(request.spec().unwrap().uri, "/projects?id=a+b%26c");
        assert_eq!(request.spec().unwrap().body, None);
    }

    #[tokio::test]
    async fn test_fetch_short_circuits_when_fetched() {
        let mut repo = seeded();
        let mine = repo.find_by_id(&ProjectId::new("u_1")).unwrap();

        let request = repo.fetch(mine);
        assert!(request.is_local());
        let outcome = request.send(&OfflineTransport::new()).await;
        assert_eq!(outcome.body(), Some("{}"));
        repo.complete(&outcome).unwrap();
        assert_eq!(repo.get(mine).js_code(), "mine()");
    }

    #[test]
    fn test_fetch_failure_unfetches() {
        let mut repo = seeded();
        let sample = repo.find_by_id(&ProjectId::new("s_1")).unwrap();

        let request = repo.fetch(sample);
        assert!(!request.is_local());
        assert!(repo.get(sample).is_fetched());

        repo.complete(&outcome(
            &request,
            Err(TransportError::status("/projects?id=s_1", 404, "")),
        ))
        .unwrap();
        assert!(!repo.get(sample).is_fetched());
    }

    #[test]
    fn test_fetch_success_loads_code() {
        let mut repo = seeded();
        let sample = repo.find_by_id(&ProjectId::new("s_1")).unwrap();

        let request = repo.fetch(sample);
        repo.complete(&outcome(
            &request,
            Ok(Response::ok(r#"while(1);{"j":"sample()","h":"<div/>"}"#)),
        ))
        .unwrap();
        assert_eq!(repo.get(sample).js_code(), "sample()");
        assert_eq!(repo.get(sample).html_code(), "<div/>");
    }

    #[test]
    fn test_delete_removes_from_index_and_arena() {
        let mut repo = seeded();
        let mine = repo.find_by_id(&ProjectId::new("u_1")).unwrap();

        let request = repo.del(mine).unwrap();
        assert_eq!(request.spec().unwrap().method, HttpMethod::Delete);
        assert!(repo.del(mine).is_none());

        repo.complete(&outcome(&request, Ok(Response::ok("{}"))))
            .unwrap();
        assert!(!repo.contains(mine));
        assert!(repo.find_by_id(&ProjectId::new("u_1")).is_none());

        // Late outcomes for the removed project are ignored
        repo.complete(&outcome(&request, Ok(Response::ok("{}"))))
            .unwrap();
    }

    #[test]
    fn test_delete_unsaved_is_local() {
        let mut repo = ProjectRepository::new();
        let key = repo.create(ProjectType::Private, ProjectValues::default());
        let request = repo.del(key).unwrap();
        assert!(request.is_local());
    }

    #[test]
    fn test_delete_after_removal_is_a_no_op() {
        let mut repo = ProjectRepository::new();
        let key = repo.create(ProjectType::Private, ProjectValues::with_code("a", "b"));

        let request = repo.del(key).unwrap();
        repo.complete(&outcome(&request, Ok(Response::ok("{}"))))
            .unwrap();
        assert!(!repo.contains(key));

        assert!(repo.del(key).is_none());
        assert!(repo.del(key).is_none());
    }

    #[test]
    #[should_panic(expected = "used after delete")]
    fn test_use_after_delete_panics() {
        let mut repo = ProjectRepository::new();
        let key = repo.create(ProjectType::Private, ProjectValues::default());
        repo.discard(key);
        let _ = repo.get(key);
    }

    #[tokio::test]
    async fn test_offline_create_assigns_id() {
        let mut repo = seeded();
        let key = repo.create(ProjectType::Private, ProjectValues::with_code("a", "b"));

        let outcome = repo.put(key, Format::All).send(&OfflineTransport::new()).await;
        repo.complete(&outcome).unwrap();

        let id = repo.get(key).id().cloned().unwrap();
        assert_eq!(repo.find_by_id(&id), Some(key));
    }

    #[test]
    fn test_rename_round_trip_keeps_code() {
        let mut repo = seeded();
        let mine = repo.find_by_id(&ProjectId::new("u_1")).unwrap();
        repo.set_name(mine, Some("renamed"));

        let body = repo.serialize(mine, Format::Rename);
        let mut other = ProjectRepository::new();
        let copy = other.create(ProjectType::Private, ProjectValues::with_code("keep", "me"));
        other.load(copy, &body, Format::Rename).unwrap();

        assert_eq!(other.get(copy).name(), Some("renamed"));
        assert_eq!(other.get(copy).js_code(), "keep");
    }

    #[test]
    fn test_serialized_project_loads_into_an_equal_one() {
        let mut repo = seeded();
        let mine = repo.find_by_id(&ProjectId::new("u_1")).unwrap();
        repo.set_name(mine, Some("quotes \" and\nnewlines"));
        repo.set_html_code(mine, Some("<script>{{script}}</script>"));

        let body = repo.serialize(mine, Format::All);
        let mut other = ProjectRepository::new();
        let copy = other.create(ProjectType::Private, ProjectValues::default());
        other.load(copy, &body, Format::All).unwrap();

        let (source, loaded) = (repo.get(mine), other.get(copy));
        assert_eq!(loaded.name(), source.name());
        assert_eq!(loaded.js_code(), source.js_code());
        assert_eq!(loaded.html_code(), source.html_code());
        assert!(loaded.is_fetched());
    }
}
