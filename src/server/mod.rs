//! Axum-based HTTP server implementation for bria-proxy.
//!
//! This module is responsible for setting up the HTTP server, configuring routes,
//! and turning browser requests into calls on the forwarders.
//!
//! # Components
//!
//! - `handlers`: Implementation of individual endpoints (prompt, image, removebg, health, metrics).
//! - `middleware`: Request ID tracking and per-route metrics.
//! - `routes`: The main router configuration that ties everything together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::{HealthCheck, HealthResponse, HealthStatus};
pub use routes::{create_router, AppState};
