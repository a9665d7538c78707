//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the bookwise
//! API server. It retrieves configuration values from environment variables
//! and provides defaults where appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//! - `MAILER_URL`: Base URL of the external email service; notifications are
//!   skipped when unset
//! - `AUTO_COMPLETE_WINDOW_DAYS`: How far back the completion job looks
//!   (default: 30)
//! - `AUTO_COMPLETE_BATCH_SIZE`: Candidate rows per run (default: 200)
//! - `AUTO_COMPLETE_SAFETY_BUFFER_SECONDS`: Grace period before a booking's
//!   end counts as past (default: 30)

use eyre::{Result, WrapErr};
use std::env;
use tracing::Level;

use crate::handlers::jobs::CompletionSettings;

/// Configuration for the bookwise API server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Base URL of the external email service (optional)
    pub mailer_url: Option<String>,

    /// Historical window for auto-completion candidates, in days
    pub completion_window_days: i64,

    /// Maximum candidate rows per auto-completion run
    pub completion_batch_size: i64,

    /// Safety buffer before a booking's end counts as past, in seconds
    pub completion_safety_buffer_secs: u32,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables, providing
    /// sensible defaults where possible. DATABASE_URL is required.
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        // Logging settings
        let log_level = match env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string())
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS")
            .ok()
            .map(|origins| origins.split(',').map(|s| s.trim().to_string()).collect());

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Notification settings
        let mailer_url = env::var("MAILER_URL").ok();

        // Auto-completion job settings
        let completion_window_days = env::var("AUTO_COMPLETE_WINDOW_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);
        let completion_batch_size = env::var("AUTO_COMPLETE_BATCH_SIZE")
            .unwrap_or_else(|_| "200".to_string())
            .parse()
            .unwrap_or(200);
        let completion_safety_buffer_secs = env::var("AUTO_COMPLETE_SAFETY_BUFFER_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            mailer_url,
            completion_window_days,
            completion_batch_size,
            completion_safety_buffer_secs,
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:8080").
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings bundle handed to the auto-completion job.
    pub fn completion_settings(&self) -> CompletionSettings {
        CompletionSettings {
            window_days: self.completion_window_days,
            batch_size: self.completion_batch_size,
            safety_buffer_secs: self.completion_safety_buffer_secs,
        }
    }
}
