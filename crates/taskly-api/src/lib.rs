pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod schema;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    response::{Html, IntoResponse},
    routing::get,
    Extension, Router,
};
use std::{net::SocketAddr, sync::Arc};
use taskly_auth::TokenCodec;
use taskly_store::UserStore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub use handlers::{ApiError, AuthSession};
pub use identity::{bearer_token, resolve_identity, RequestContext};
pub use schema::{build_schema, schema_sdl, TasklySchema};

/// Application state shared across handlers and resolvers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub codec: Arc<TokenCodec>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, codec: TokenCodec) -> Self {
        Self {
            store,
            codec: Arc::new(codec),
        }
    }
}

/// API server configuration
pub struct ApiServerConfig {
    /// Address to bind the API server
    pub bind_addr: SocketAddr,
    /// Enable CORS for local development origins
    pub enable_cors: bool,
    /// Secret used to sign and verify session tokens
    pub jwt_secret: String,
}

/// API Server
pub struct ApiServer {
    config: ApiServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: ApiServerConfig, store: Arc<dyn UserStore>) -> Self {
        let codec = TokenCodec::new(config.jwt_secret.as_bytes());
        let state = Arc::new(AppState::new(store, codec));

        Self { config, state }
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let schema = build_schema(self.state.as_ref().clone());

        // Every GraphQL request gets its identity resolved first
        let graphql_router = Router::new()
            .route("/graphql", get(graphiql).post(graphql_handler))
            .layer(axum_middleware::from_fn_with_state(
                self.state.clone(),
                middleware::attach_identity,
            ))
            .layer(Extension(schema))
            .with_state(self.state.clone());

        let router = Router::new()
            .route("/health", get(handlers::health_check))
            .merge(graphql_router);

        let cors = if self.config.enable_cors {
            use tower_http::cors::AllowOrigin;

            let cors_layer = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
                    // Allow common development origins
                    let origin_str = origin.to_str().unwrap_or("");
                    origin_str.starts_with("http://localhost:")
                        || origin_str.starts_with("http://127.0.0.1:")
                        || origin_str.starts_with("https://localhost:")
                        || origin_str.starts_with("https://127.0.0.1:")
                }));

            Some(cors_layer)
        } else {
            None
        };

        let mut router = router.layer(TraceLayer::new_for_http());

        if let Some(cors) = cors {
            router = router.layer(cors);
        }

        router
    }

    /// Start the API server
    pub async fn start(self) -> Result<(), anyhow::Error> {
        let router = self.build_router();

        info!("Starting API server on {}", self.config.bind_addr);
        info!("GraphQL endpoint: http://{}/graphql", self.config.bind_addr);

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        axum::serve(listener, router)
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        Ok(())
    }
}

/// Convenience function to create and start an API server
pub async fn run_api_server(
    config: ApiServerConfig,
    store: Arc<dyn UserStore>,
) -> Result<(), anyhow::Error> {
    ApiServer::new(config, store).start().await
}

async fn graphql_handler(
    Extension(schema): Extension<TasklySchema>,
    Extension(context): Extension<RequestContext>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(request.into_inner().data(context)).await.into()
}

/// GraphiQL IDE
async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
