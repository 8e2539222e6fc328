//! # blog-graphql-gateway
//!
//! GraphQL gateway in front of the blog REST fixture service.
//!
//! ## Features
//!
//! - **REST client** - typed GETs against the upstream service
//! - **DataLoader** - per-request coalescing of user lookups (N+1 prevention)
//! - **Resolvers** - `posts`, `post(slug)` and the nested `Post.user`
//! - **Server** - axum handler that builds a fresh loader for every request
//!
//! ## Usage
//!
//! ```rust,no_run
//! use blog_graphql_gateway::{build_schema, execute, RestClient};
//!
//! # async fn example() {
//! let client = RestClient::new("http://localhost:3101".parse().unwrap());
//! let schema = build_schema();
//! let response = execute(&schema, &client, "{ posts(limit: 1) { title } }").await;
//! # }
//! ```

pub mod config;
pub mod dataloaders;
pub mod pagination;
pub mod resolvers;
pub mod rest;
pub mod server;
pub mod types;

pub use config::Config;
pub use dataloaders::{DataLoader, Loader, UserLoader};
pub use pagination::PageArgs;
pub use resolvers::{build_schema, execute, GatewaySchema, QueryRoot, RequestContext};
pub use rest::{QueryParams, RestClient};
pub use server::{graphql_handler, router, serve, AppState};
pub use types::{Comment, Job, Post, PostRef, User, UserRef};

use async_graphql::ErrorExtensions;
use thiserror::Error;

/// Gateway errors
///
/// Cloneable so a single failed upstream lookup can be handed to every
/// caller waiting on the same loader key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("upstream request to {path} failed: {message}")]
    Upstream {
        path: String,
        status: Option<u16>,
        message: String,
    },

    #[error("no record with id {id:?} at {path}")]
    NotFound { path: String, id: String },

    #[error("unexpected payload from {path}: {message}")]
    Decode { path: String, message: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl GatewayError {
    /// Machine readable code placed in the GraphQL error extensions
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Upstream { .. } => "UPSTREAM_ERROR",
            GatewayError::NotFound { .. } => "NOT_FOUND",
            GatewayError::Decode { .. } => "BAD_UPSTREAM_PAYLOAD",
            GatewayError::InvalidArgument(_) => "BAD_USER_INPUT",
        }
    }

    /// True for failures that say the record does not exist upstream
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound { .. })
    }
}

impl ErrorExtensions for GatewayError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.code());
            match self {
                GatewayError::Upstream { path, status, .. } => {
                    e.set("path", path.as_str());
                    if let Some(status) = status {
                        e.set("status", *status);
                    }
                }
                GatewayError::NotFound { path, .. } | GatewayError::Decode { path, .. } => {
                    e.set("path", path.as_str());
                }
                GatewayError::InvalidArgument(_) => {}
            }
        })
    }
}

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
