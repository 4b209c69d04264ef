//! Resource types, operations, and cache keys.
//!
//! An [`Operation`] pairs an [`Action`] with a [`ResourceType`]. It names
//! every remote call the client makes and supplies the fixed failure message
//! a [`crate::FetchError`] carries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the remote collections exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Posts,
    Comments,
    Albums,
    Photos,
    Todos,
    Users,
}

impl ResourceType {
    /// URL path segment, e.g. `posts`.
    pub fn path(self) -> &'static str {
        match self {
            ResourceType::Posts => "posts",
            ResourceType::Comments => "comments",
            ResourceType::Albums => "albums",
            ResourceType::Photos => "photos",
            ResourceType::Todos => "todos",
            ResourceType::Users => "users",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            ResourceType::Posts => "post",
            ResourceType::Comments => "comment",
            ResourceType::Albums => "album",
            ResourceType::Photos => "photo",
            ResourceType::Todos => "todo",
            ResourceType::Users => "user",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    List,
    Get,
    Children,
    Create,
    Update,
    Patch,
    Delete,
}

/// A single remote call, e.g. "create user".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation {
    pub action: Action,
    pub resource: ResourceType,
}

impl Operation {
    pub fn new(action: Action, resource: ResourceType) -> Self {
        Self { action, resource }
    }

    /// The user-facing message reported when this operation fails.
    pub fn failure_message(&self) -> String {
        let r = self.resource;
        match self.action {
            Action::List | Action::Children => format!("Failed to fetch {}", r.path()),
            Action::Get => format!("Failed to fetch {}", r.singular()),
            Action::Create => format!("Failed to create {}", r.singular()),
            Action::Update => format!("Failed to update {}", r.singular()),
            Action::Patch => format!("Failed to patch {}", r.singular()),
            Action::Delete => format!("Failed to delete {}", r.singular()),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.action {
            Action::List => "list",
            Action::Get => "get",
            Action::Children => "children",
            Action::Create => "create",
            Action::Update => "update",
            Action::Patch => "patch",
            Action::Delete => "delete",
        };
        write!(f, "{verb} {}", self.resource)
    }
}

/// Key under which the synchronizer caches a decoded response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// `GET /{resource}`
    Collection(ResourceType),
    /// `GET /{resource}/{id}`
    Entity(ResourceType, u64),
    /// `GET /{parent}/{id}/{child}`
    Children {
        parent: ResourceType,
        id: u64,
        child: ResourceType,
    },
}

impl CacheKey {
    /// The resource type whose mutations make this entry stale.
    pub fn resource(&self) -> ResourceType {
        match *self {
            CacheKey::Collection(r) | CacheKey::Entity(r, _) => r,
            CacheKey::Children { child, .. } => child,
        }
    }
}
