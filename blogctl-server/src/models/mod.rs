//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod category;
pub mod list_query;
pub mod post;
pub mod slug;
pub mod validation;

pub use category::CategoryName;
pub use list_query::ListQuery;
pub use post::{Content, Title};
pub use slug::Slug;
pub use validation::ValidationError;
