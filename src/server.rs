//! HTTP surface of the gateway
//!
//! `POST /` executes a GraphQL request, `GET /` serves GraphiQL. Every POST
//! gets its own [`RequestContext`](crate::RequestContext), see [`execute`].

use async_graphql::http::GraphiQLSource;
use async_graphql::{Request, Response};
use axum::{
    extract::Extension,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::resolvers::{execute, GatewaySchema};
use crate::rest::RestClient;

/// Shared, request-independent state: the schema and the upstream client
#[derive(Clone)]
pub struct AppState {
    pub schema: GatewaySchema,
    pub client: RestClient,
}

impl AppState {
    pub fn new(schema: GatewaySchema, client: RestClient) -> Self {
        Self { schema, client }
    }
}

/// GraphQL handler
///
/// Builds the per-request context from the shared client and executes the
/// request against the schema.
pub async fn graphql_handler(Extension(state): Extension<AppState>, req: Json<Request>) -> Json<Response> {
    let request = req.0;
    if let Some(operation) = request.operation_name.as_deref() {
        debug!(operation, "executing GraphQL request");
    }

    let response = execute(&state.schema, &state.client, request).await;

    Json(response)
}

/// GraphiQL IDE pointed at the gateway endpoint
pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/").finish())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(graphiql).post(graphql_handler))
        .layer(Extension(state))
}

/// Serve the gateway on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(
        "GraphQL server is running on http://{addr} (upstream {})",
        state.client.base_url()
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
