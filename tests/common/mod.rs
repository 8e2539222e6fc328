#![allow(dead_code)]

use blog_graphql_gateway::{build_schema, execute, RestClient};
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

pub fn users_fixture() -> Value {
    json!([
        {
            "id": "user0",
            "handle": "user0-handle",
            "firstName": "user0-firstName",
            "lastName": "user0-lastName"
        },
        {
            "id": "user1",
            "handle": "user1-handle",
            "firstName": "user1-firstName",
            "lastName": "user1-lastName"
        }
    ])
}

pub fn posts_fixture() -> Value {
    json!([
        {
            "id": "post0",
            "title": "Hello world",
            "slug": "hello-world",
            "text": "First post.",
            "user": { "id": "user0", "handle": "user0-handle" }
        },
        {
            "id": "post1",
            "title": "Hello world again",
            "slug": "hello-world-again",
            "text": "Second post.",
            "user": { "id": "user1", "handle": "user1-handle" }
        }
    ])
}

pub async fn mount_posts(server: &MockServer, body: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Answers `GET /users?id=<id>` the way json-server does: a one-element list
pub async fn mount_user(server: &MockServer, user: Value, expected_calls: u64) {
    let id = user["id"].as_str().unwrap().to_string();
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("id", id.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([user])))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Run `query` against the gateway with `server` as the upstream, returning the JSON envelope
pub async fn run(server: &MockServer, query: &str) -> Value {
    run_against(&server.uri(), query).await
}

/// Run `query` with `base_url` as the upstream
pub async fn run_against(base_url: &str, query: &str) -> Value {
    let client = RestClient::new(base_url.parse().unwrap());
    let schema = build_schema();
    let response = execute(&schema, &client, query).await;
    serde_json::to_value(&response).unwrap()
}
