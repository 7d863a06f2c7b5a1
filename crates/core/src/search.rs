//! Pagination bounds and `ILIKE` filter patterns for list endpoints.

/// Default page size when the caller gives none.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp a user-provided limit into `1..=max`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Page bounds for a list query, with the default limits applied.
pub fn page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    (
        clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        clamp_offset(offset),
    )
}

/// Escape `%`, `_` and `\` so they match literally in a `LIKE` pattern.
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive substring pattern for a `?search=` filter. Blank
/// filters mean "no filter".
pub fn contains_pattern(filter: Option<&str>) -> Option<String> {
    let trimmed = filter.map(str::trim).filter(|s| !s.is_empty())?;
    Some(format!("%{}%", escape_like(trimmed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_bounds() {
        assert_eq!(clamp_limit(None, 20, 100), 20);
        assert_eq!(clamp_limit(Some(500), 20, 100), 100);
        assert_eq!(clamp_limit(Some(0), 20, 100), 1);
        assert_eq!(clamp_limit(Some(-3), 20, 100), 1);
        assert_eq!(clamp_limit(Some(42), 20, 100), 42);
    }

    #[test]
    fn offset_never_negative() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(-10)), 0);
        assert_eq!(clamp_offset(Some(40)), 40);
    }

    #[test]
    fn page_applies_defaults() {
        assert_eq!(page(None, None), (DEFAULT_PAGE_LIMIT, 0));
        assert_eq!(page(Some(1000), Some(5)), (MAX_PAGE_LIMIT, 5));
    }

    #[test]
    fn search_patterns_escape_wildcards() {
        assert_eq!(contains_pattern(Some("  Mensah ")), Some("%Mensah%".into()));
        assert_eq!(contains_pattern(Some("50%_off")), Some("%50\\%\\_off%".into()));
        assert_eq!(contains_pattern(Some("   ")), None);
        assert_eq!(contains_pattern(None), None);
    }
}
