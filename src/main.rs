mod config;
mod cors;
mod dto;
mod handler;
mod service;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use std::sync::Arc;

use service::MailService;

pub fn build_router(service: Arc<MailService>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/send-email", post(handler::send_email))
        .route("/", get(handler::health_check))
        .with_state(service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(cors::preflight))
}

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt().init();

    // Load config
    let cfg = config::load_config().expect("failed to locate or load config file");
    tracing::info!("Successfully loaded contact service config");

    // Secrets come from the environment only; missing values are reported
    // per request, the server still starts
    let credentials = config::load_credentials();
    if !credentials.is_configured() {
        tracing::warn!(
            "EMAIL_USERNAME or EMAIL_PASSWORD is not set, send requests will be rejected"
        );
    }

    // Setup service
    let service = MailService::new(cfg.clone(), credentials);
    let service_ptr = Arc::new(service);

    let cors = cors::cors_layer(&cfg.allowed_origin).expect("invalid allowed origin in config");
    let router = build_router(service_ptr, cors);

    // Start server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", cfg.port))
        .await
        .expect("Failed to bind to address");
    let addr = listener.local_addr().unwrap();

    tracing::info!("Contact service starting, listening on {}", addr);

    axum::serve(listener, router)
        .await
        .expect("Failed to start server");
}
