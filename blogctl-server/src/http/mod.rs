//! HTTP layer - axum router, handlers, error mapping

pub mod error;
pub mod routes;
pub mod server;
