/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use dailytask_api::{app::{build_router, AppState}, config::Config};
/// use dailytask_shared::store::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(MemoryStore::new(), config)?;
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use chrono::Duration;
use dailytask_shared::{
    auth::{credentials::CredentialStore, jwt::TokenIssuer, middleware::require_auth},
    store::Storage,
    tasks::TaskRepository,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{config::Config, routes};

/// Shared application state
///
/// Cloned into every handler. Each service receives the store it needs at
/// construction; nothing is reached through globals.
#[derive(Clone)]
pub struct AppState {
    /// Registration and login
    pub credentials: CredentialStore,

    /// Owner-scoped task operations
    pub tasks: TaskRepository,

    /// Session token issuer
    pub tokens: TokenIssuer,

    /// Backing store, for health checks
    pub storage: Arc<dyn Storage>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires every service to `store`
    ///
    /// # Errors
    ///
    /// Fails if the token lifetime is out of range or the login dummy hash
    /// cannot be built.
    pub fn new<S: Storage + 'static>(store: S, config: Config) -> anyhow::Result<Self> {
        let store = Arc::new(store);
        let ttl = Duration::try_hours(config.jwt.ttl_hours)
            .context("JWT_TTL_HOURS is out of range")?;

        Ok(Self {
            credentials: CredentialStore::new(store.clone())
                .context("failed to initialise the credential store")?,
            tasks: TaskRepository::new(store.clone()),
            tokens: TokenIssuer::new(&config.jwt.secret, ttl),
            storage: store,
            config: Arc::new(config),
        })
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET    /              # Welcome message (public)
/// ├── GET    /health        # Health check (public)
/// ├── /auth/                # Authentication (public)
/// │   ├── POST /register
/// │   └── POST /login
/// └── /tasks/               # Tasks (bearer token)
///     ├── GET    /
///     ├── POST   /
///     ├── PUT    /:id
///     └── DELETE /:id
/// ```
///
/// Layers, outermost first: CORS, request tracing, then the authorization
/// gate on the task routes only.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.tokens.clone(),
            require_auth,
        ));

    Router::new()
        .route("/", get(routes::health::welcome))
        .route("/health", get(routes::health::health_check))
        .nest("/auth", auth_routes)
        .nest("/tasks", task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.api.cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[HeaderValue]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(origins.to_vec())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}
