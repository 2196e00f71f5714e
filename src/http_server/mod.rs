//! # HTTP Server Module
//!
//! Axum server exposing the draw service to a browser front end.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/*` - Pool, draws, forfeits, redraws and exports
//! - `/api/prizes/*` - Prize configuration
//! - `/observability/*` - Metrics

pub mod config;
pub mod draw_routes;
pub mod observability_routes;
pub mod prize_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use server::HttpServer;
