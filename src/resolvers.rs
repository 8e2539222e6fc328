//! Query resolvers and schema construction
//!
//! Resolvers never reach for process-wide state: everything they need comes
//! from the [`RequestContext`] attached to the request being executed.

use async_graphql::{
    ComplexObject, Context, EmptyMutation, EmptySubscription, ErrorExtensions, Object, Request, Response, ResultExt,
    Schema,
};
use tracing::{debug, warn};

use crate::dataloaders::UserDataLoader;
use crate::pagination::PageArgs;
use crate::rest::{QueryParams, RestClient};
use crate::types::{Post, User};

const POSTS_PATH: &str = "/posts";

pub type GatewaySchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// Per-execution state handed to every resolver
///
/// Built when a request starts and dropped with it, so the user loader's
/// cache never outlives one execution.
pub struct RequestContext {
    client: RestClient,
    users: UserDataLoader,
}

impl RequestContext {
    pub fn new(client: RestClient) -> Self {
        Self {
            users: UserDataLoader::from(client.clone()),
            client,
        }
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }

    pub fn users(&self) -> &UserDataLoader {
        &self.users
    }
}

pub struct QueryRoot;

#[Object(name = "Query")]
impl QueryRoot {
    /// Posts from the REST service, optionally paged
    async fn posts(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        skip: Option<i32>,
    ) -> async_graphql::Result<Vec<Post>> {
        let request = ctx.data::<RequestContext>()?;
        let query = PageArgs::new(limit, skip).to_query().extend()?;

        request.client().fetch_collection(POSTS_PATH, &query).await.extend()
    }

    /// Post with the given slug, or null when there is none
    async fn post(&self, ctx: &Context<'_>, slug: String) -> async_graphql::Result<Option<Post>> {
        let request = ctx.data::<RequestContext>()?;
        let posts: Vec<Post> = request
            .client()
            .fetch_collection(POSTS_PATH, &QueryParams::new())
            .await
            .extend()?;

        Ok(posts.into_iter().find(|post| post.slug == slug))
    }
}

#[ComplexObject]
impl Post {
    /// Author of the post
    ///
    /// Nullable: a failed lookup nulls this field only and is reported in
    /// the response errors.
    async fn user(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<User>> {
        let request = ctx.data::<RequestContext>()?;
        match request.users().load(self.author.id.clone()).await {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                if e.is_not_found() {
                    debug!(post = %self.id, user = %self.author.id, "author not found");
                } else {
                    warn!(post = %self.id, user = %self.author.id, error = %e, "author lookup failed");
                }
                // Returning Err would drop the key from the parent object; record
                // the error here and resolve to an explicit null instead.
                ctx.add_error(ctx.set_error_path(e.extend().into_server_error(ctx.item.pos)));
                Ok(None)
            }
        }
    }
}

pub fn build_schema() -> GatewaySchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription).finish()
}

/// Execute one GraphQL request with a freshly built [`RequestContext`]
pub async fn execute(schema: &GatewaySchema, client: &RestClient, request: impl Into<Request>) -> Response {
    let context = RequestContext::new(client.clone());
    let users = context.users().clone();
    let response = schema.execute(request.into().data(context)).await;

    let distinct_users = users.distinct_keys().await;
    debug!(
        distinct_users,
        errors = response.errors.len(),
        "request finished"
    );

    response
}
