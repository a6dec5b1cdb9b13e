//! Database layer - connection pool and repositories
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections) - no Arc<Mutex<Connection>>
//! - Category aggregation in application code - two queries, no N+1
//! - Slug probes are best-effort; unique constraints settle races
//! - Transactions for multi-step mutations

pub mod migrations;
pub mod pool;
pub mod repos;
pub mod seed;

pub use pool::create_pool;
pub use repos::*;
pub use sqlx::PgPool;
