//! Publication documents: download content types and type filtering.

use crate::search::escape_like;

/// Content type served for a stored document, guessed from its extension.
///
/// Unknown extensions fall back to `application/octet-stream`.
pub fn content_type_for(path: &str) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Filename offered to the browser for a stored document (the final path
/// segment).
pub fn download_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Normalize a `?type=` filter into a case-insensitive prefix pattern for
/// `ILIKE`. Blank filters mean "no filter". `%`, `_` and `\` are escaped so
/// they match literally.
pub fn type_prefix_pattern(filter: Option<&str>) -> Option<String> {
    let trimmed = filter.map(str::trim).filter(|s| !s.is_empty())?;
    Some(format!("{}%", escape_like(trimmed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types() {
        assert_eq!(content_type_for("publications/report-1a2b3c4d.pdf"), "application/pdf");
        assert_eq!(content_type_for("publications/covers/c.jpg"), "image/jpeg");
        assert_eq!(
            content_type_for("publications/blob-1a2b3c4d"),
            "application/octet-stream"
        );
    }

    #[test]
    fn download_names() {
        assert_eq!(download_name("publications/report.pdf"), "report.pdf");
        assert_eq!(download_name("report.pdf"), "report.pdf");
    }

    #[test]
    fn type_prefix() {
        assert_eq!(type_prefix_pattern(None), None);
        assert_eq!(type_prefix_pattern(Some("  ")), None);
        assert_eq!(type_prefix_pattern(Some("Journal")).as_deref(), Some("Journal%"));
        assert_eq!(type_prefix_pattern(Some("100%_")).as_deref(), Some("100\\%\\_%"));
    }
}
