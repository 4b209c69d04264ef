//! Domain DTOs for the board API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently,
//! so integration tests catch any schema drift between the two crates. Wire
//! names are camelCase; Rust fields are snake_case.
//!
//! Each entity implements [`Resource`], which ties it to its
//! [`ResourceType`] and exposes its server-assigned id. Only posts and users
//! implement [`Mutable`]; the rest are read-only on this client.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::resource::ResourceType;

/// A remote record addressable by id.
pub trait Resource: DeserializeOwned + Clone {
    const KIND: ResourceType;

    fn id(&self) -> u64;
}

/// A resource the client may create, replace, patch, and delete.
pub trait Mutable: Resource {
    /// Full payload without a server-assigned id.
    type Draft: Serialize;
    /// Partial payload; absent fields are left unchanged by the server.
    type Patch: Serialize;
}

/// A read-only resource listed under a parent, e.g. `/posts/{id}/comments`.
pub trait Nested: Resource {
    const PARENT: ResourceType;
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Post {
    /// The draft that would recreate this post's content.
    pub fn to_draft(&self) -> PostDraft {
        PostDraft {
            user_id: self.user_id,
            title: self.title.clone(),
            body: self.body.clone(),
        }
    }
}

impl Resource for Post {
    const KIND: ResourceType = ResourceType::Posts;

    fn id(&self) -> u64 {
        self.id
    }
}

impl Mutable for Post {
    type Draft = PostDraft;
    type Patch = PostPatch;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub post_id: u64,
    pub name: String,
    pub email: String,
    pub body: String,
}

impl Resource for Comment {
    const KIND: ResourceType = ResourceType::Comments;

    fn id(&self) -> u64 {
        self.id
    }
}

impl Nested for Comment {
    const PARENT: ResourceType = ResourceType::Posts;
}

// ---------------------------------------------------------------------------
// Albums and photos
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
}

impl Resource for Album {
    const KIND: ResourceType = ResourceType::Albums;

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: u64,
    pub album_id: u64,
    pub title: String,
    pub url: String,
    pub thumbnail_url: String,
}

impl Resource for Photo {
    const KIND: ResourceType = ResourceType::Photos;

    fn id(&self) -> u64 {
        self.id
    }
}

impl Nested for Photo {
    const PARENT: ResourceType = ResourceType::Albums;
}

// ---------------------------------------------------------------------------
// Todos
// ---------------------------------------------------------------------------

/// A todo as the server reports it. Local completion overrides live in
/// [`crate::overlay::TodoOverlay`], never here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub completed: bool,
}

impl Resource for Todo {
    const KIND: ResourceType = ResourceType::Todos;

    fn id(&self) -> u64 {
        self.id
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

impl Default for Geo {
    fn default() -> Self {
        Self {
            lat: "0".to_string(),
            lng: "0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
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

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub company: Company,
    pub address: Address,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl User {
    pub fn to_draft(&self) -> UserDraft {
        UserDraft {
            name: self.name.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            website: self.website.clone(),
            company: self.company.clone(),
            address: self.address.clone(),
        }
    }
}

impl Resource for User {
    const KIND: ResourceType = ResourceType::Users;

    fn id(&self) -> u64 {
        self.id
    }
}

impl Mutable for User {
    type Draft = UserDraft;
    type Patch = UserPatch;
}

/// Serializes a draft with the target id merged in, as `PUT` bodies require.
#[derive(Serialize)]
pub(crate) struct WithId<'a, D: Serialize> {
    pub id: u64,
    #[serde(flatten)]
    pub draft: &'a D,
}
