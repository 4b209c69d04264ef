//! Client core for the board API (posts, albums, todos, users).
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). On top of that sits the
//! [`Synchronizer`]: a read-through cache per resource type, invalidated
//! wholesale after every successful mutation, plus a local-only todo
//! completion overlay.
//!
//! # Design
//! - `ApiClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and `parse*`
//!   (consumes response), so the I/O boundary is explicit.
//! - The host supplies a [`Transport`]; the synchronizer never blocks on
//!   anything else.
//! - Every remote failure is a single [`FetchError`] with a fixed message.
//! - Form validation is local and runs before any request is built.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod overlay;
pub mod resource;
pub mod stats;
pub mod sync;
pub mod transport;
pub mod types;
pub mod validation;

pub use client::ApiClient;
pub use error::{FetchError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use overlay::{TodoFilter, TodoOverlay, TodoSummary};
pub use resource::{Action, CacheKey, Operation, ResourceType};
pub use stats::DashboardStats;
pub use sync::Synchronizer;
pub use transport::Transport;
pub use types::{
    Address, Album, Comment, Company, Geo, Mutable, Nested, Photo, Post, PostDraft, PostPatch,
    Resource, Todo, User, UserDraft, UserPatch,
};
pub use validation::{PostForm, UserForm, ValidationErrors};
