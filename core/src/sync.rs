//! Remote collection synchronizer.
//!
//! # Design
//! `Synchronizer` is the explicit context object UI handlers receive. It owns
//! the response cache and the todo overlay, and drives an [`ApiClient`]
//! through a host-supplied [`Transport`].
//!
//! Reads are read-through: a cached body is decoded and returned without a
//! request. Writes never patch the cache. A successful mutation drops every
//! cached collection and entity of its resource type so the next read
//! refetches; a failed one leaves the cache untouched.
//!
//! Cached bodies are stored as untyped JSON and decoded on each hit, which
//! lets one map hold every resource type.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use tracing::{debug, debug_span, info, warn};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::FetchError;
use crate::http::{HttpRequest, HttpResponse};
use crate::overlay::{TodoFilter, TodoOverlay, TodoSummary};
use crate::resource::{Action, CacheKey, Operation, ResourceType};
use crate::stats::DashboardStats;
use crate::transport::Transport;
use crate::types::{Album, Mutable, Nested, Post, Resource, Todo, User};

pub struct Synchronizer<T> {
    client: ApiClient,
    transport: T,
    cache: HashMap<CacheKey, serde_json::Value>,
    todos: TodoOverlay,
}

impl<T: Transport> Synchronizer<T> {
    pub fn new(client: ApiClient, transport: T) -> Self {
        Self {
            client,
            transport,
            cache: HashMap::new(),
            todos: TodoOverlay::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// The full collection of `R`, from cache when present.
    pub fn list<R: Resource>(&mut self) -> Result<Vec<R>, FetchError> {
        let op = Operation::new(Action::List, R::KIND);
        let request = self.client.build_list(R::KIND);
        self.read_through(op, CacheKey::Collection(R::KIND), request)
    }

    pub fn get<R: Resource>(&mut self, id: u64) -> Result<R, FetchError> {
        let op = Operation::new(Action::Get, R::KIND);
        let request = self.client.build_get(R::KIND, id);
        self.read_through(op, CacheKey::Entity(R::KIND, id), request)
    }

    /// Items of `R` under one parent, e.g. `children::<Comment>(post_id)`.
    pub fn children<R: Nested>(&mut self, parent_id: u64) -> Result<Vec<R>, FetchError> {
        let op = Operation::new(Action::Children, R::KIND);
        let request = self.client.build_children(R::PARENT, parent_id, R::KIND);
        let key = CacheKey::Children {
            parent: R::PARENT,
            id: parent_id,
            child: R::KIND,
        };
        self.read_through(op, key, request)
    }

    /// Drop cached entries for `R` and fetch the collection again.
    pub fn refresh<R: Resource>(&mut self) -> Result<Vec<R>, FetchError> {
        self.invalidate(R::KIND);
        self.list()
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Create from a draft; the server assigns the id.
    pub fn create<R: Mutable>(&mut self, draft: &R::Draft) -> Result<R, FetchError> {
        let op = Operation::new(Action::Create, R::KIND);
        let request = self.client.build_create(R::KIND, draft)?;
        self.mutate(op, request)
    }

    /// Full replace of the entity at `id`.
    pub fn update<R: Mutable>(&mut self, id: u64, draft: &R::Draft) -> Result<R, FetchError> {
        let op = Operation::new(Action::Update, R::KIND);
        let request = self.client.build_update(R::KIND, id, draft)?;
        self.mutate(op, request)
    }

    pub fn patch<R: Mutable>(&mut self, id: u64, patch: &R::Patch) -> Result<R, FetchError> {
        let op = Operation::new(Action::Patch, R::KIND);
        let request = self.client.build_patch(R::KIND, id, patch)?;
        self.mutate(op, request)
    }

    pub fn remove<R: Mutable>(&mut self, id: u64) -> Result<(), FetchError> {
        let op = Operation::new(Action::Delete, R::KIND);
        let request = self.client.build_delete(R::KIND, id);
        let response = self.execute(op, request)?;
        self.client.parse_delete(R::KIND, response)?;
        self.invalidate(R::KIND);
        info!(%op, id, "removed");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Cache
    // -----------------------------------------------------------------------

    /// Drop every cached collection and entity of `resource`.
    pub fn invalidate(&mut self, resource: ResourceType) {
        let before = self.cache.len();
        self.cache.retain(|key, _| key.resource() != resource);
        debug!(%resource, dropped = before - self.cache.len(), "cache invalidated");
    }

    pub fn is_cached(&self, key: &CacheKey) -> bool {
        self.cache.contains_key(key)
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    // -----------------------------------------------------------------------
    // Todos and the local overlay
    // -----------------------------------------------------------------------

    /// Flip the local completion mark of a todo. Nothing is sent.
    pub fn toggle_todo(&mut self, id: u64) -> bool {
        self.todos.toggle(id)
    }

    /// All todos with effective completion applied.
    pub fn todos(&mut self) -> Result<Vec<Todo>, FetchError> {
        let remote = self.list::<Todo>()?;
        Ok(self.todos.apply_all(&remote))
    }

    pub fn todos_filtered(&mut self, filter: TodoFilter) -> Result<Vec<Todo>, FetchError> {
        let mut todos = self.todos()?;
        todos.retain(|t| filter.matches(t));
        Ok(todos)
    }

    pub fn todo_summary(&mut self) -> Result<TodoSummary, FetchError> {
        let remote = self.list::<Todo>()?;
        Ok(TodoSummary::of(&remote, &self.todos))
    }

    /// Counts for the admin dashboard. Fails on the first collection that
    /// cannot be fetched.
    pub fn dashboard(&mut self) -> Result<DashboardStats, FetchError> {
        let posts = self.list::<Post>()?.len();
        let albums = self.list::<Album>()?.len();
        let todos = self.list::<Todo>()?;
        let users = self.list::<User>()?.len();
        Ok(DashboardStats::new(posts, albums, &todos, users))
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn read_through<V: DeserializeOwned>(
        &mut self,
        op: Operation,
        key: CacheKey,
        request: HttpRequest,
    ) -> Result<V, FetchError> {
        if let Some(value) = self.cache.get(&key) {
            debug!(%op, ?key, "cache hit");
            return self.client.decode(op, value.clone());
        }
        let response = self.execute(op, request)?;
        let value = self.client.parse_json(op, response)?;
        let decoded = self.client.decode(op, value.clone())?;
        self.cache.insert(key, value);
        Ok(decoded)
    }

    fn mutate<R: Resource>(
        &mut self,
        op: Operation,
        request: HttpRequest,
    ) -> Result<R, FetchError> {
        let response = self.execute(op, request)?;
        let entity: R = self.client.parse(op, response)?;
        self.invalidate(op.resource);
        info!(%op, id = entity.id(), "mutation applied");
        Ok(entity)
    }

    fn execute(&self, op: Operation, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let span = debug_span!(
            "request",
            request_id = %Uuid::new_v4(),
            %op,
            method = %request.method,
            url = %request.url,
        );
        let _guard = span.enter();
        let response = self.transport.execute(request).map_err(|e| {
            warn!(error = %e, "no response");
            FetchError::new(op)
        })?;
        debug!(status = response.status, "response received");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::error::TransportError;
    use crate::http::HttpMethod;
    use crate::types::{PostDraft, PostPatch};

    /// Replays canned responses in order and records every request.
    #[derive(Default)]
    struct Scripted {
        replies: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn reply(self, status: u16, body: &str) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Ok(HttpResponse::new(status, body)));
            self
        }

        fn fail(self) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Err(TransportError::new("connection refused")));
            self
        }

        fn requests(&self) -> Vec<(HttpMethod, String)> {
            self.seen
                .borrow()
                .iter()
                .map(|r| (r.method, r.url.clone()))
                .collect()
        }
    }

    impl Transport for Scripted {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.borrow_mut().push(request);
            self.replies
                .borrow_mut()
                .pop_front()
                .expect("no scripted reply left")
        }
    }

    const POSTS: &str = r#"[{"id":1,"userId":1,"title":"first","body":"x"}]"#;

    fn sync(transport: &Scripted) -> Synchronizer<&Scripted> {
        Synchronizer::new(ApiClient::new("http://api"), transport)
    }

    #[test]
    fn list_is_read_through() {
        let t = Scripted::default().reply(200, POSTS);
        let mut s = sync(&t);
        let first: Vec<Post> = s.list().unwrap();
        let second: Vec<Post> = s.list().unwrap();
        assert_eq!(first, second);
        assert_eq!(t.requests().len(), 1);
        assert!(s.is_cached(&CacheKey::Collection(ResourceType::Posts)));
    }

    #[test]
    fn create_invalidates_collection() {
        let t = Scripted::default()
            .reply(200, POSTS)
            .reply(201, r#"{"id":101,"userId":1,"title":"A","body":"B"}"#)
            .reply(200, POSTS);
        let mut s = sync(&t);
        s.list::<Post>().unwrap();
        let draft = PostDraft {
            user_id: 1,
            title: "A".to_string(),
            body: "B".to_string(),
        };
        let created: Post = s.create(&draft).unwrap();
        assert_eq!(created.id, 101);
        assert!(!s.is_cached(&CacheKey::Collection(ResourceType::Posts)));
        s.list::<Post>().unwrap();
        assert_eq!(
            t.requests(),
            vec![
                (HttpMethod::Get, "http://api/posts".to_string()),
                (HttpMethod::Post, "http://api/posts".to_string()),
                (HttpMethod::Get, "http://api/posts".to_string()),
            ]
        );
    }

    #[test]
    fn update_drops_entity_cache_too() {
        let t = Scripted::default()
            .reply(200, POSTS)
            .reply(200, r#"{"id":1,"userId":1,"title":"first","body":"x"}"#)
            .reply(200, r#"{"id":1,"userId":1,"title":"new","body":"x"}"#);
        let mut s = sync(&t);
        s.list::<Post>().unwrap();
        s.get::<Post>(1).unwrap();
        assert_eq!(s.cached_entries(), 2);

        let draft = PostDraft {
            user_id: 1,
            title: "new".to_string(),
            body: "x".to_string(),
        };
        s.update::<Post>(1, &draft).unwrap();
        assert_eq!(s.cached_entries(), 0);
    }

    #[test]
    fn invalidation_is_scoped_to_resource_type() {
        let t = Scripted::default()
            .reply(200, POSTS)
            .reply(200, "[]")
            .reply(200, "{}");
        let mut s = sync(&t);
        s.list::<Post>().unwrap();
        s.list::<User>().unwrap();
        s.remove::<User>(1).unwrap();
        assert!(s.is_cached(&CacheKey::Collection(ResourceType::Posts)));
        assert!(!s.is_cached(&CacheKey::Collection(ResourceType::Users)));
    }

    #[test]
    fn failed_mutation_leaves_cache_alone() {
        let t = Scripted::default().reply(200, POSTS).reply(500, "boom");
        let mut s = sync(&t);
        s.list::<Post>().unwrap();
        let err = s.remove::<Post>(1).unwrap_err();
        assert_eq!(err.to_string(), "Failed to delete post");
        assert!(s.is_cached(&CacheKey::Collection(ResourceType::Posts)));
    }

    #[test]
    fn failed_writes_keep_collection_and_entity_cached() {
        let t = Scripted::default()
            .reply(200, POSTS)
            .reply(200, r#"{"id":1,"userId":1,"title":"first","body":"x"}"#)
            .reply(500, "boom")
            .fail()
            .reply(404, "{}");
        let mut s = sync(&t);
        s.list::<Post>().unwrap();
        s.get::<Post>(1).unwrap();
        let collection = CacheKey::Collection(ResourceType::Posts);
        let entity = CacheKey::Entity(ResourceType::Posts, 1);
        let draft = PostDraft {
            user_id: 1,
            title: "new".to_string(),
            body: "x".to_string(),
        };

        let err = s.update::<Post>(1, &draft).unwrap_err();
        assert_eq!(err.to_string(), "Failed to update post");
        assert!(s.is_cached(&collection) && s.is_cached(&entity));

        let err = s.create::<Post>(&draft).unwrap_err();
        assert_eq!(err.to_string(), "Failed to create post");
        assert!(s.is_cached(&collection) && s.is_cached(&entity));

        let err = s.patch::<Post>(1, &PostPatch::default()).unwrap_err();
        assert_eq!(err.to_string(), "Failed to patch post");
        assert!(s.is_cached(&collection) && s.is_cached(&entity));

        // Reads still come from the cache.
        s.list::<Post>().unwrap();
        s.get::<Post>(1).unwrap();
        assert_eq!(t.requests().len(), 5);
    }

    #[test]
    fn failed_read_caches_nothing() {
        let t = Scripted::default().reply(503, "").fail();
        let mut s = sync(&t);
        assert!(s.list::<Todo>().is_err());
        let err = s.list::<Todo>().unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch todos");
        assert_eq!(s.cached_entries(), 0);
    }

    #[test]
    fn transport_failure_on_create_is_fetch_error() {
        let t = Scripted::default().fail();
        let mut s = sync(&t);
        let err = s
            .create::<Post>(&PostDraft {
                user_id: 1,
                title: "A".to_string(),
                body: "B".to_string(),
            })
            .unwrap_err();
        assert_eq!(err.operation, Operation::new(Action::Create, ResourceType::Posts));
    }

    #[test]
    fn todos_apply_overlay_without_requests() {
        let t = Scripted::default().reply(
            200,
            r#"[{"id":1,"userId":1,"title":"a","completed":false},
                {"id":2,"userId":1,"title":"b","completed":true}]"#,
        );
        let mut s = sync(&t);
        s.toggle_todo(1);
        let todos = s.todos().unwrap();
        assert!(todos.iter().all(|t| t.completed));
        let pending = s.todos_filtered(TodoFilter::Pending).unwrap();
        assert!(pending.is_empty());
        assert_eq!(s.todo_summary().unwrap().completed, 2);
        assert_eq!(t.requests().len(), 1);
    }

    #[test]
    fn refresh_refetches() {
        let t = Scripted::default().reply(200, POSTS).reply(200, "[]");
        let mut s = sync(&t);
        assert_eq!(s.list::<Post>().unwrap().len(), 1);
        assert!(s.refresh::<Post>().unwrap().is_empty());
        assert_eq!(t.requests().len(), 2);
    }
}
