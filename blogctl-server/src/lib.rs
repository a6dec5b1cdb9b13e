//! blogctl-server: HTTP API for the blog backend
//!
//! Exposes post and category CRUD over HTTP, backed by PostgreSQL.
//! Layering:
//! - `models` - request validation at construction (newtypes)
//! - `db` - connection pool, migrations, repositories
//! - `http` - axum router, handlers, error mapping

pub mod db;
pub mod http;
pub mod models;

pub use http::server::{run_server, AppState, ServerConfig};
