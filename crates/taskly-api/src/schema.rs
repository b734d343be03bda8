//! GraphQL schema: `myTaskLists`, `me`, `signUp`, `signIn`

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Object, Schema};

use crate::handlers::{self, ApiError};
use crate::identity::RequestContext;
use crate::models::*;
use crate::AppState;

pub type TasklySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema; `state` is available to every resolver
pub fn build_schema(state: AppState) -> TasklySchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .finish()
}

/// SDL of the public schema
pub fn schema_sdl() -> String {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .finish()
        .sdl()
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        let message = if self.is_internal() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let code = self.code();

        async_graphql::Error::new(message).extend_with(|_, e| e.set("code", code))
    }
}

fn current_user<'a>(ctx: &'a Context<'_>) -> Option<&'a taskly_store::User> {
    ctx.data_opt::<RequestContext>()
        .and_then(|request| request.user.as_ref())
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn my_task_lists(&self, ctx: &Context<'_>) -> Vec<TaskList> {
        handlers::my_task_lists(current_user(ctx)).await
    }

    /// The authenticated user, or null for anonymous requests
    async fn me(&self, ctx: &Context<'_>) -> Option<UserObject> {
        current_user(ctx).cloned().map(UserObject::from)
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn sign_up(
        &self,
        ctx: &Context<'_>,
        input: SignUpInput,
    ) -> async_graphql::Result<AuthUser> {
        let state = ctx.data::<AppState>()?;
        let session = handlers::sign_up(state, input)
            .await
            .map_err(|e| e.extend())?;

        Ok(session.into())
    }

    async fn sign_in(
        &self,
        ctx: &Context<'_>,
        input: SignInInput,
    ) -> async_graphql::Result<AuthUser> {
        let state = ctx.data::<AppState>()?;
        let session = handlers::sign_in(state, input)
            .await
            .map_err(|e| e.extend())?;

        Ok(session.into())
    }
}
