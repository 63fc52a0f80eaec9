//! Entity Access Layer: typed wrappers over the backend's REST resources.
//!
//! Each resource module exposes free functions taking an [`ApiClient`]. None of
//! them cache anything; callers own refetching after a mutation.

pub mod auth;
pub mod client;
pub mod error;
pub mod permissions;
pub mod role_permissions;
pub mod roles;
pub mod user_roles;
pub mod users;

pub use client::ApiClient;
pub use error::{Action, ApiError, Target};
