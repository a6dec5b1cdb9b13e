//! blogctl-core: domain logic shared by the blogctl server and CLI
//!
//! Keeps the pure pieces (slug generation, configuration) free of any
//! HTTP or database dependency so they stay trivially testable.

pub mod config;
pub mod slug;

pub use config::BlogConfig;
pub use slug::slugify;
