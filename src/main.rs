// src/main.rs
use axum::{extract::Extension, http::Uri, middleware, routing::get, Json, Router};
use dotenv::dotenv;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod canvas;
mod common;
mod cyride;
mod dashboard;
mod outlook;
mod rate_limit_middleware;
mod services;
mod workday;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use auth::oauth::MicrosoftOAuth;
use auth::token::TokenCodec;
use canvas::services::CanvasService;
use common::config::AppConfig;
use common::{response, set_dev_mode, ApiError, AppState};
use cyride::services::CyrideService;
use dashboard::services::{
    CanvasSource, CyrideSource, DashboardService, OutlookSource, WorkdaySource,
};
use outlook::services::OutlookService;
use rate_limit_middleware::rate_limit_middleware;
use services::RateLimitService;
use workday::services::WorkdayService;

const HTTP_TIMEOUT_SECONDS: u64 = 10;
const RATE_LIMIT_CLEANUP_INTERVAL_SECONDS: u64 = 300;

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = Arc::new(AppConfig::from_env());
    set_dev_mode(config.server.is_development());
    info!(
        environment = %config.server.environment,
        port = config.server.port,
        "Configuration loaded"
    );

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let http = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECONDS))
        .build()?;

    let token_codec = Arc::new(TokenCodec::new(config.jwt.secret.clone()));
    let oauth = Arc::new(MicrosoftOAuth::new(config.microsoft.clone(), http.clone()));

    let canvas = Arc::new(CanvasService::new(config.canvas.clone(), http.clone()));
    let outlook = Arc::new(OutlookService::new(http.clone()));
    let workday = Arc::new(WorkdayService::new());
    let cyride = Arc::new(CyrideService::new());

    let dashboard_service = Arc::new(DashboardService::new(
        Arc::clone(&canvas) as Arc<dyn CanvasSource>,
        Arc::clone(&outlook) as Arc<dyn OutlookSource>,
        Arc::clone(&workday) as Arc<dyn WorkdaySource>,
        Arc::clone(&cyride) as Arc<dyn CyrideSource>,
    ));

    let rate_limit_service = Arc::new(RateLimitService::new());

    let state = Arc::new(AppState {
        config: Arc::clone(&config),
        token_codec,
        oauth,
        canvas,
        outlook,
        workday,
        cyride,
        dashboard: dashboard_service,
    });

    // ========================================================================
    // BACKGROUND TASKS
    // ========================================================================

    {
        let rate_limit_service = Arc::clone(&rate_limit_service);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(
                RATE_LIMIT_CLEANUP_INTERVAL_SECONDS,
            ));
            loop {
                interval.tick().await;
                rate_limit_service
                    .cleanup_expired(rate_limit_service.window_duration())
                    .await;
            }
        });
    }

    // ========================================================================
    // ROUTER ASSEMBLY
    // ========================================================================

    let cors = build_cors_layer(&config.server.cors_origins);

    let app = Router::new()
        .merge(auth::auth_routes())
        .merge(canvas::canvas_routes())
        .merge(outlook::outlook_routes())
        .merge(workday::workday_routes())
        .merge(cyride::cyride_routes())
        .merge(dashboard::dashboard_routes())
        .route("/health", get(health))
        .fallback(not_found)
        .layer(middleware::from_fn(rate_limit_middleware))
        .layer(Extension(rate_limit_service))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<_> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ])
        .allow_credentials(true)
}

/// GET /health
async fn health(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    response::ok(json!({
        "status": "healthy",
        "environment": state.config.server.environment,
    }))
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Route {} not found", uri.path()))
}
