//! Category slug derivation.
//!
//! A slug is the URL-safe public key of a category. It is recomputed from the
//! name on every save, so it must be a pure function of the name.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Runs of anything that is not an ASCII lowercase letter or digit.
pub const SEPARATOR_PATTERN: &str = r"[^a-z0-9]+";

static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SEPARATOR_PATTERN).expect("valid regex"));

/// Slugs taken by static segments under `/categories`.
pub const RESERVED_SLUGS: &[&str] = &["homepage", "reorder"];

/// Derive a slug from a category name.
///
/// Lowercases, collapses every non-alphanumeric run into a single `-`, and
/// strips leading/trailing hyphens.
///
/// ```
/// use catalog_core::slug::slugify;
///
/// assert_eq!(slugify("Summer  Shoes & Sandals!"), "summer-shoes-sandals");
/// ```
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    SEPARATOR_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Derive a slug and reject names that produce an empty or reserved one.
pub fn slug_for_name(name: &str) -> Result<String, CoreError> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(CoreError::Validation(format!(
            "name '{name}' must contain at least one letter or digit"
        )));
    }
    if RESERVED_SLUGS.contains(&slug.as_str()) {
        return Err(CoreError::Validation(format!(
            "name '{name}' is reserved, choose another category name"
        )));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Shoes"), "shoes");
        assert_eq!(slugify("Running Shoes"), "running-shoes");
    }

    #[test]
    fn collapses_runs_and_trims() {
        assert_eq!(slugify("  --Men's   T-Shirts!!  "), "men-s-t-shirts");
        assert_eq!(slugify("a___b"), "a-b");
    }

    #[test]
    fn non_ascii_letters_become_separators() {
        assert_eq!(slugify("Café Crème"), "caf-cr-me");
    }

    #[test]
    fn deterministic_and_idempotent() {
        let once = slugify("New Arrivals 2024");
        assert_eq!(once, slugify("New Arrivals 2024"));
        assert_eq!(slugify(&once), once);
    }

    #[test]
    fn empty_slug_is_rejected() {
        assert!(slug_for_name("!!!").is_err());
        assert!(slug_for_name("").is_err());
        assert_eq!(slug_for_name("Bags").unwrap(), "bags");
    }

    #[test]
    fn reserved_slugs_are_rejected() {
        for name in ["Homepage", " REORDER! ", "homepage"] {
            assert!(matches!(slug_for_name(name), Err(CoreError::Validation(_))));
        }
        assert_eq!(slug_for_name("Homepage Picks").unwrap(), "homepage-picks");
    }
}
