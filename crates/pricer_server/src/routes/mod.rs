//! Route modules for the pricer server
//!
//! This module contains endpoint group-specific routers:
//! - pricing: Heston Monte Carlo option pricing
//! - health: Health check and readiness endpoints

pub mod health;
pub mod pricing;

use axum::{http::Method, Router};
use pricer_pricing::mc::HestonPricer;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
    /// Pricing engine, limited to the configured compute timeout
    pub pricer: HestonPricer,
}

impl AppState {
    /// Create a new AppState
    pub fn new(config: Arc<ServerConfig>) -> Self {
        let pricer = HestonPricer::new().with_time_limit(config.compute_timeout());
        Self {
            config,
            start_time: std::time::Instant::now(),
            pricer,
        }
    }
}

/// Build the main application router by merging all route modules
pub fn build_router(config: Arc<ServerConfig>) -> Router {
    let state = AppState::new(config);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .merge(health::routes())
        .merge(pricing::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
