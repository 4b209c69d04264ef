//! In-memory stand-in for the public demo REST API.
//!
//! Serves posts (with comments), albums (with photos), todos, and users over
//! the same routes and status codes the board client expects. Ids assigned
//! on create are one past the current maximum.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub mod config;
pub mod seed;

pub use config::{Config, Persistence};

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub post_id: u64,
    pub name: String,
    pub email: String,
    pub body: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: u64,
    pub album_id: u64,
    pub title: String,
    pub url: String,
    pub thumbnail_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub completed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub company: Company,
    pub address: Address,
}

/// Body of `POST /posts` and `PUT /posts/{id}`. An `id` in a `PUT` body is
/// ignored in favour of the path.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    pub user_id: Option<u64>,
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Deserialize)]
pub struct UserInput {
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub company: Company,
    pub address: Address,
}

#[derive(Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub company: Option<Company>,
    pub address: Option<Address>,
}

impl Post {
    fn from_input(id: u64, input: PostInput) -> Self {
        Post {
            id,
            user_id: input.user_id,
            title: input.title,
            body: input.body,
        }
    }

    fn apply(&mut self, patch: PostPatch) {
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
    }
}

impl User {
    fn from_input(id: u64, input: UserInput) -> Self {
        User {
            id,
            name: input.name,
            username: input.username,
            email: input.email,
            phone: input.phone,
            website: input.website,
            company: input.company,
            address: input.address,
        }
    }

    fn apply(&mut self, patch: UserPatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.username {
            self.username = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.phone {
            self.phone = v;
        }
        if let Some(v) = patch.website {
            self.website = v;
        }
        if let Some(v) = patch.company {
            self.company = v;
        }
        if let Some(v) = patch.address {
            self.address = v;
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct Store {
    pub posts: BTreeMap<u64, Post>,
    pub comments: Vec<Comment>,
    pub albums: BTreeMap<u64, Album>,
    pub photos: Vec<Photo>,
    pub todos: BTreeMap<u64, Todo>,
    pub users: BTreeMap<u64, User>,
}

fn next_id<T>(items: &BTreeMap<u64, T>) -> u64 {
    items.last_key_value().map_or(1, |(id, _)| id + 1)
}

#[derive(Clone)]
pub struct AppState {
    db: Arc<RwLock<Store>>,
    persistence: Persistence,
}

impl AppState {
    pub fn new(store: Store, persistence: Persistence) -> Self {
        Self {
            db: Arc::new(RwLock::new(store)),
            persistence,
        }
    }

    fn durable(&self) -> bool {
        self.persistence == Persistence::Durable
    }
}

type Handled<T> = Result<T, StatusCode>;

/// Router over freshly seeded data with durable writes.
pub fn app() -> Router {
    app_with(seed::seed(), Persistence::Durable)
}

/// Router over an empty store, for tests that want to count from zero.
pub fn empty_app() -> Router {
    app_with(Store::default(), Persistence::Durable)
}

pub fn app_with(store: Store, persistence: Persistence) -> Router {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post)
                .put(update_post)
                .patch(patch_post)
                .delete(delete_post),
        )
        .route("/posts/{id}/comments", get(post_comments))
        .route("/albums", get(list_albums))
        .route("/albums/{id}/photos", get(album_photos))
        .route("/todos", get(list_todos))
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user)
                .put(update_user)
                .patch(patch_user)
                .delete(delete_user),
        )
        .with_state(AppState::new(store, persistence))
}

/// Serve freshly seeded data until the listener fails.
pub async fn run(listener: TcpListener, persistence: Persistence) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(seed::seed(), persistence)).await
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

async fn list_posts(State(state): State<AppState>) -> Json<Vec<Post>> {
    let db = state.db.read().await;
    Json(db.posts.values().cloned().collect())
}

async fn get_post(State(state): State<AppState>, Path(id): Path<u64>) -> Handled<Json<Post>> {
    let db = state.db.read().await;
    db.posts.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// Unknown posts have no comments rather than a 404, as upstream behaves.
async fn post_comments(State(state): State<AppState>, Path(id): Path<u64>) -> Json<Vec<Comment>> {
    let db = state.db.read().await;
    Json(db.comments.iter().filter(|c| c.post_id == id).cloned().collect())
}

async fn create_post(
    State(state): State<AppState>,
    Json(input): Json<PostInput>,
) -> (StatusCode, Json<Post>) {
    let mut db = state.db.write().await;
    let post = Post::from_input(next_id(&db.posts), input);
    if state.durable() {
        db.posts.insert(post.id, post.clone());
    }
    info!(id = post.id, "post created");
    (StatusCode::CREATED, Json(post))
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<PostInput>,
) -> Handled<Json<Post>> {
    let mut db = state.db.write().await;
    if !db.posts.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let post = Post::from_input(id, input);
    if state.durable() {
        db.posts.insert(id, post.clone());
    }
    info!(id, "post replaced");
    Ok(Json(post))
}

async fn patch_post(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(patch): Json<PostPatch>,
) -> Handled<Json<Post>> {
    let mut db = state.db.write().await;
    let mut post = db.posts.get(&id).cloned().ok_or(StatusCode::NOT_FOUND)?;
    post.apply(patch);
    if state.durable() {
        db.posts.insert(id, post.clone());
    }
    info!(id, "post patched");
    Ok(Json(post))
}

async fn delete_post(State(state): State<AppState>, Path(id): Path<u64>) -> Handled<Json<Value>> {
    let mut db = state.db.write().await;
    if !db.posts.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    if state.durable() {
        db.posts.remove(&id);
        db.comments.retain(|c| c.post_id != id);
    }
    info!(id, "post deleted");
    Ok(Json(json!({})))
}

// ---------------------------------------------------------------------------
// Albums and todos
// ---------------------------------------------------------------------------

async fn list_albums(State(state): State<AppState>) -> Json<Vec<Album>> {
    let db = state.db.read().await;
    Json(db.albums.values().cloned().collect())
}

async fn album_photos(State(state): State<AppState>, Path(id): Path<u64>) -> Json<Vec<Photo>> {
    let db = state.db.read().await;
    Json(db.photos.iter().filter(|p| p.album_id == id).cloned().collect())
}

async fn list_todos(State(state): State<AppState>) -> Json<Vec<Todo>> {
    let db = state.db.read().await;
    Json(db.todos.values().cloned().collect())
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    let db = state.db.read().await;
    Json(db.users.values().cloned().collect())
}

async fn get_user(State(state): State<AppState>, Path(id): Path<u64>) -> Handled<Json<User>> {
    let db = state.db.read().await;
    db.users.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<UserInput>,
) -> (StatusCode, Json<User>) {
    let mut db = state.db.write().await;
    let user = User::from_input(next_id(&db.users), input);
    if state.durable() {
        db.users.insert(user.id, user.clone());
    }
    info!(id = user.id, "user created");
    (StatusCode::CREATED, Json(user))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<UserInput>,
) -> Handled<Json<User>> {
    let mut db = state.db.write().await;
    if !db.users.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let user = User::from_input(id, input);
    if state.durable() {
        db.users.insert(id, user.clone());
    }
    info!(id, "user replaced");
    Ok(Json(user))
}

async fn patch_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(patch): Json<UserPatch>,
) -> Handled<Json<User>> {
    let mut db = state.db.write().await;
    let mut user = db.users.get(&id).cloned().ok_or(StatusCode::NOT_FOUND)?;
    user.apply(patch);
    if state.durable() {
        db.users.insert(id, user.clone());
    }
    info!(id, "user patched");
    Ok(Json(user))
}

async fn delete_user(State(state): State<AppState>, Path(id): Path<u64>) -> Handled<Json<Value>> {
    let mut db = state.db.write().await;
    if !db.users.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    if state.durable() {
        db.users.remove(&id);
    }
    info!(id, "user deleted");
    Ok(Json(json!({})))
}
