//! Slug validation
//!
//! Slug format: lowercase alphanumerics separated by single hyphens.
//! `blogctl_core::slugify` always produces this shape; client-supplied
//! slugs must match it too so URLs stay predictable.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for slugs, matching the VARCHAR(255) column.
const MAX_SLUG_LEN: usize = 255;

/// Hyphen-separated groups of lowercase alphanumerics. Rules out
/// leading/trailing hyphens and doubled hyphens in one pattern.
static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("invalid slug regex"));

/// Validated slug for posts and categories
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    /// Create a new slug, validating format.
    ///
    /// # Rules
    /// - Non-empty, max 255 characters
    /// - Lowercase alphanumerics and hyphens only
    /// - No leading, trailing, or repeated hyphens
    ///
    /// # Example
    /// ```
    /// use blogctl_server::models::Slug;
    ///
    /// assert!(Slug::new("hello-world-2").is_ok());
    /// assert!(Slug::new("Hello-World").is_err()); // uppercase
    /// assert!(Slug::new("-hello").is_err()); // leading hyphen
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "slug" });
        }

        if s.len() > MAX_SLUG_LEN {
            return Err(ValidationError::TooLong {
                field: "slug",
                max: MAX_SLUG_LEN,
            });
        }

        if !SLUG_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "slug",
                reason: "must be lowercase alphanumerics separated by single hyphens",
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Get the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_slugs() {
        assert!(Slug::new("hello").is_ok());
        assert!(Slug::new("hello-world").is_ok());
        assert!(Slug::new("top-10-crates").is_ok());
        assert!(Slug::new("a").is_ok());
        assert!(Slug::new("42").is_ok());
    }

    #[test]
    fn rejects_empty() {
        let err = Slug::new("").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn rejects_uppercase() {
        let err = Slug::new("Hello-World").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn rejects_bad_hyphenation() {
        assert!(Slug::new("-hello").is_err());
        assert!(Slug::new("hello-").is_err());
        assert!(Slug::new("hello--world").is_err());
    }

    #[test]
    fn rejects_spaces_and_underscores() {
        assert!(Slug::new("hello world").is_err());
        assert!(Slug::new("hello_world").is_err());
    }

    #[test]
    fn max_length() {
        let slug_255 = "a".repeat(255);
        assert!(Slug::new(&slug_255).is_ok());

        let slug_256 = "a".repeat(256);
        let err = Slug::new(&slug_256).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 255, .. }));
    }

    #[test]
    fn accepts_slugify_output() {
        for input in ["Hello, World!", "Top 10 Crates of 2025", "Rust & Web"] {
            let slug = blogctl_core::slugify(input);
            assert!(Slug::new(&slug).is_ok(), "rejected {:?}", slug);
        }
    }
}
