mod api;
mod config;
mod db;
mod models;
mod schema;
mod store;

use axum::extract::MatchedPath;
use axum::http::Request;
use axum::Router;
use notebook_core::{PhotoSettings, RecipeStore};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::ServerConfig;
use crate::store::SqliteRecipeStore;

/// Everything a handler needs: where recipes live and how photos are normalized.
pub struct AppContext {
    pub store: Arc<dyn RecipeStore>,
    pub photo_settings: PhotoSettings,
}

/// Application state shared across all handlers
pub type AppState = Arc<AppContext>;

/// Console logging, filtered by RUST_LOG (defaults to info).
fn init_telemetry() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        return match api::openapi().to_pretty_json() {
            Ok(spec) => {
                println!("{}", spec);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to render OpenAPI spec: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    dotenvy::dotenv().ok();
    init_telemetry();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let pool = match db::create_pool(&config.database_url, config.pool_size) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to open recipe database {}: {}", config.database_url, e);
            return ExitCode::FAILURE;
        }
    };

    let state: AppState = Arc::new(AppContext {
        store: Arc::new(SqliteRecipeStore::new(pool)),
        photo_settings: config.photo,
    });

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    let app = Router::new()
        .merge(api::router(state))
        .merge(swagger_ui)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %matched_path,
                    )
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &Span| {
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        );

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", config.bind_addr, e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        database = %config.database_url,
        max_dimension = config.photo.max_dimension,
        quality = config.photo.quality,
        "Server listening on {}",
        config.bind_addr
    );
    tracing::info!("Swagger UI available at /swagger-ui/");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
