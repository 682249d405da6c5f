//! Router assembly.

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{require_identity, PasswordHasher, TokenIssuer};
use crate::chat::{
    ChatOrchestrator, HealthContextAssembler, HttpAnswerGenerator, HttpContextRetriever,
    RetryPolicy,
};
use crate::config::{AppConfig, AuthConfig, UpstreamConfig};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::handlers;
use crate::services::{
    AccountService, HealthRecordService, HealthRecordStore, ImageService, PgHealthRecordStore,
    PgUserStore,
};
use crate::state::AppState;

/// Multipart overhead allowed on top of the image size limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Everything the routers need, built once at startup.
#[derive(Clone)]
pub struct Services {
    pub issuer: Arc<TokenIssuer>,
    pub accounts: AccountService,
    pub health_records: HealthRecordService,
    pub images: ImageService,
    pub chat: ChatOrchestrator,
}

impl Services {
    /// Wire services against PostgreSQL and the HTTP upstreams.
    pub fn build(
        pool: DbPool,
        jwt_secret: &str,
        auth: &AuthConfig,
        upstream: &UpstreamConfig,
    ) -> AppResult<Self> {
        let issuer = Arc::new(TokenIssuer::new(jwt_secret.as_bytes(), auth.token_ttl())?);
        let hasher = Arc::new(PasswordHasher::from_config(auth)?);

        let accounts = AccountService::new(
            Arc::new(PgUserStore::new(pool.clone())),
            hasher,
            issuer.clone(),
        )?;
        let store: Arc<dyn HealthRecordStore> = Arc::new(PgHealthRecordStore::new(pool.clone()));

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;
        let retry = RetryPolicy::from_config(upstream);
        let chat = ChatOrchestrator::new(
            Arc::new(HttpContextRetriever::new(
                http.clone(),
                &upstream.retrieval_url,
                retry.clone(),
            )),
            HealthContextAssembler::new(store.clone()),
            Arc::new(HttpAnswerGenerator::new(http, &upstream.generation_url, retry)),
        );

        Ok(Self {
            accounts,
            health_records: HealthRecordService::new(store),
            images: ImageService::new(pool),
            issuer,
            chat,
        })
    }
}

/// CORS for the configured browser origins.
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    tracing::info!(origins = ?config.cors_origins(), "CORS allowed origins");

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400))
}

/// Build the application router with all routes.
pub fn build_router(state: AppState, services: Services) -> Router {
    let cors = cors_layer(&state.config);
    let gate = middleware::from_fn_with_state(services.issuer.clone(), require_identity);

    // Health check routes (no auth required)
    let health_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/health", get(handlers::api_health))
        .with_state(state);

    let public_account_routes = Router::new()
        .route("/api/signup", post(handlers::account::signup))
        .route("/api/login", post(handlers::account::login))
        .route("/api/logout", post(handlers::account::logout))
        .with_state(services.accounts.clone());

    let account_routes = Router::new()
        .route(
            "/api/profile",
            get(handlers::account::profile).put(handlers::account::update_profile),
        )
        .route(
            "/api/user/update",
            post(handlers::account::update_personal_info),
        )
        .route(
            "/api/user/password",
            put(handlers::account::change_password),
        )
        .route_layer(gate.clone())
        .with_state(services.accounts);

    let health_record_routes = Router::new()
        .route(
            "/api/healthdata",
            post(handlers::health_records::add).get(handlers::health_records::list),
        )
        .route(
            "/api/healthdata/{id}",
            axum::routing::delete(handlers::health_records::delete),
        )
        .route(
            "/api/healthdata/store",
            post(handlers::health_records::store_extracted),
        )
        .route(
            "/api/health-concerns",
            post(handlers::health_records::store_concerns),
        )
        .route_layer(gate.clone())
        .with_state(services.health_records);

    let image_routes = Router::new()
        .route("/api/images", get(handlers::images::list))
        .route("/api/images/upload", post(handlers::images::upload))
        .route(
            "/api/images/{id}",
            get(handlers::images::get).delete(handlers::images::delete),
        )
        .route_layer(gate.clone())
        .layer(DefaultBodyLimit::max(
            crate::services::image::MAX_IMAGE_BYTES + MULTIPART_OVERHEAD,
        ))
        .with_state(services.images);

    let chat_routes = Router::new()
        .route("/api/chatbot", post(handlers::chat::ask))
        .route_layer(gate)
        .with_state(services.chat);

    // Combine all routes
    Router::new()
        .merge(health_routes)
        .merge(public_account_routes)
        .merge(account_routes)
        .merge(health_record_routes)
        .merge(image_routes)
        .merge(chat_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
