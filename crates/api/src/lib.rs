//! # Bookwise API
//!
//! The API crate provides the web server implementation for the bookwise
//! appointment engine. It exposes the availability queries, the booking
//! lifecycle operations, schedule exception handling with cascade
//! cancellation, and the auto-completion job trigger.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Orchestrate repository reads and the pure engine logic
//! - **Middleware**: Provide cross-cutting concerns like error handling
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx for database interactions;
//! the slot/conflict/eligibility computations live in `bookwise-core`.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement the engine operations
pub mod handlers;
/// Middleware for logging and error handling
pub mod middleware;
/// Best-effort client notification client
pub mod notify;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::Router;
use eyre::Result;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::handlers::jobs::CompletionSettings;
use crate::notify::{CancellationNotifier, MailerClient, NoopNotifier};

/// Shared application state that is accessible to all request handlers.
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,
    /// Outbound client notifications; a no-op when no mailer is configured
    pub notifier: Arc<dyn CancellationNotifier>,
    /// Settings for the auto-completion job
    pub completion: CompletionSettings,
}

/// Starts the API server with the provided configuration and database
/// connection: initializes logging, wires up the shared state, builds the
/// router and serves it.
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let notifier: Arc<dyn CancellationNotifier> = match &config.mailer_url {
        Some(url) => Arc::new(MailerClient::new(url.clone())),
        None => Arc::new(NoopNotifier),
    };

    // Create shared state with dependencies
    let state = Arc::new(ApiState {
        db_pool,
        notifier,
        completion: config.completion_settings(),
    });

    // Build the application router with all routes
    let app = Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Availability queries
        .merge(routes::availability::routes())
        // Booking lifecycle endpoints
        .merge(routes::booking::routes())
        // Weekly schedule management
        .merge(routes::schedule::routes())
        // Schedule exceptions and cascade cancellation
        .merge(routes::exception::routes())
        // Background job triggers
        .merge(routes::jobs::routes())
        // Attach shared state to all routes
        .with_state(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(
                origins
                    .iter()
                    .map(|origin| origin.parse().unwrap())
                    .collect::<Vec<_>>(),
            )
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .timeout(std::time::Duration::from_secs(config.request_timeout))
            .into_inner(),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
