//! Record schemas for the upstream REST service
//!
//! Upstream JSON is parsed into these at the client boundary; a record that
//! is missing a required field fails decoding instead of leaking into the
//! GraphQL layer half-populated.

use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};

/// Narrow user reference embedded by the REST service in posts and comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub handle: String,
}

/// Narrow post reference embedded in comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRef {
    pub id: String,
    pub title: String,
}

/// Blog post
///
/// `user` is resolved through the request's user loader, see
/// [`crate::resolvers`].
#[derive(SimpleObject, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[graphql(complex)]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub text: String,
    #[graphql(skip)]
    #[serde(rename = "user")]
    pub author: UserRef,
}

/// Job description attached to generated users
#[derive(SimpleObject, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub title: String,
    pub area: String,
    #[serde(rename = "type")]
    #[graphql(name = "type")]
    pub kind: String,
    pub company_name: String,
}

/// Full user record, fetched by id
#[derive(SimpleObject, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub handle: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub job: Option<Job>,
}

/// Comment on a post. Present in the fixture data, not exposed in the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub post: PostRef,
    pub user: UserRef,
}
