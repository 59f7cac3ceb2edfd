//! API Module
//!
//! HTTP handlers and routing for the price dashboard JSON API.
//!
//! # Endpoints
//! - `GET /api/mapping` - Item catalogue
//! - `GET /api/prices?ids=&win=` - Latest and windowed prices
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
