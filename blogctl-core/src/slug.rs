//! URL-safe slug generation from free-form titles and names.
//!
//! Produces the base slug only. Uniqueness against the store is the
//! repositories' job; the database unique constraint is the final
//! arbiter when two requests race for the same slug.

/// Generate a URL-safe slug from free-form text.
///
/// Rules:
/// - lowercase everything
/// - any run of non-alphanumeric characters becomes a single hyphen
/// - no leading or trailing hyphen
///
/// # Example
/// ```
/// use blogctl_core::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  Rust & Web  "), "rust-web");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Build the nth collision candidate for a base slug: `base-n`.
///
/// Counter starts at 1, matching the probe order used by the
/// repositories ("hello", "hello-1", "hello-2", ...).
pub fn numbered(base: &str, counter: u32) -> String {
    format!("{}-{}", base, counter)
}
