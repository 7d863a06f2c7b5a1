//! URL slug derivation and validation.
//!
//! Slugs are assigned once, on first save, and are never recomputed when the
//! source title or name changes afterwards. Uniqueness is left to the
//! database (`uq_*_slug` constraints); a collision is rejected, not suffixed.

use crate::error::CoreError;

/// Maximum stored slug length.
pub const MAX_SLUG_LEN: usize = 255;

/// Derive a URL-safe slug from a title or name.
///
/// Transliterates to ASCII (diacritics stripped), lowercases, turns every run
/// of whitespace or punctuation into a single hyphen and trims hyphens from
/// both ends.
pub fn derive_slug(source: &str) -> String {
    let ascii = deunicode::deunicode(source).to_lowercase();

    let mut result = String::with_capacity(ascii.len());
    let mut prev_hyphen = false;
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            result.push('-');
            prev_hyphen = true;
        }
    }

    let trimmed = result.trim_matches('-');
    let mut slug = trimmed.to_string();
    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        slug = slug.trim_end_matches('-').to_string();
    }
    slug
}

/// Validate a slug (non-empty, only lowercase alphanumeric + hyphens).
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".into()));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "Slug must be at most {MAX_SLUG_LEN} characters"
        )));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(
            "Slug must contain only lowercase alphanumeric characters and hyphens".into(),
        ));
    }
    Ok(())
}

/// Resolve the slug for a record being created.
///
/// An explicitly supplied slug is validated and kept; otherwise one is
/// derived from `source`. Fails when nothing usable can be derived (e.g. a
/// title made only of punctuation).
pub fn resolve_new_slug(supplied: Option<&str>, source: &str) -> Result<String, CoreError> {
    let slug = match supplied.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => derive_slug(source),
    };
    validate_slug(&slug)?;
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_basic_title() {
        assert_eq!(derive_slug("Annual Report 2024"), "annual-report-2024");
    }

    #[test]
    fn slug_special_characters() {
        assert_eq!(
            derive_slug("Roads & Bridges: Phase (II)"),
            "roads-bridges-phase-ii"
        );
    }

    #[test]
    fn slug_strips_diacritics() {
        assert_eq!(derive_slug("Café Résumé à Accra"), "cafe-resume-a-accra");
    }

    #[test]
    fn slug_collapses_and_trims_hyphens() {
        assert_eq!(derive_slug("--foo---bar--"), "foo-bar");
        assert_eq!(derive_slug("  spaced   out  "), "spaced-out");
    }

    #[test]
    fn slug_is_deterministic() {
        let title = "Groundbreaking: New Regional Hospital";
        assert_eq!(derive_slug(title), derive_slug(title));
    }

    #[test]
    fn slug_truncated_to_column_width() {
        let long = "word ".repeat(100);
        let slug = derive_slug(&long);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn validate_accepts_derived_slugs() {
        assert!(validate_slug("annual-report-2024").is_ok());
    }

    #[test]
    fn validate_rejects_bad_slugs() {
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Hello-World").is_err());
        assert!(validate_slug("with space").is_err());
    }

    #[test]
    fn resolve_prefers_supplied_slug() {
        assert_eq!(
            resolve_new_slug(Some("custom-slug"), "Ignored Title").unwrap(),
            "custom-slug"
        );
    }

    #[test]
    fn resolve_derives_when_blank() {
        assert_eq!(
            resolve_new_slug(Some("  "), "Office Complex").unwrap(),
            "office-complex"
        );
        assert_eq!(resolve_new_slug(None, "Office Complex").unwrap(), "office-complex");
    }

    #[test]
    fn resolve_rejects_underivable_title() {
        assert!(resolve_new_slug(None, "!!!").is_err());
    }

    #[test]
    fn resolve_validates_supplied_slug() {
        assert!(resolve_new_slug(Some("Not Valid"), "Title").is_err());
    }
}
