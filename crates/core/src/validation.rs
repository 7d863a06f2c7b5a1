//! Field-level checks shared by every entity's create/update path.
//!
//! Email and URL syntax is delegated to the `validator` crate; the rest are
//! plain length rules. Columns are unbounded `TEXT`, so limits live here.

use validator::{ValidateEmail, ValidateUrl};

use crate::error::CoreError;

/// Limit for short names (categories, roles).
pub const SHORT_NAME_LEN: usize = 100;

/// Limit for general single-line text fields.
pub const NAME_LEN: usize = 255;

/// Require a non-blank value of at most `max` characters.
pub fn require_text(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    limit_text(field, value, max)
}

/// Allow blank, but cap the length at `max` characters.
pub fn limit_text(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Require a syntactically valid email address.
pub fn require_email(field: &str, value: &str) -> Result<(), CoreError> {
    if !value.validate_email() {
        return Err(CoreError::Validation(format!(
            "{field} must be a valid email address"
        )));
    }
    Ok(())
}

/// Optional URL: blank is accepted, anything else must parse as a URL.
pub fn optional_url(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() || value.validate_url() {
        return Ok(());
    }
    Err(CoreError::Validation(format!("{field} must be a valid URL")))
}

/// Optional email: blank is accepted.
pub fn optional_email(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    require_email(field, value)
}

/// Latitude/longitude pair of a branch office. Both or neither.
pub fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), CoreError> {
    match (latitude, longitude) {
        (None, None) => Ok(()),
        (Some(lat), Some(lng)) => {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(CoreError::Validation(
                    "latitude must be between -90 and 90".into(),
                ));
            }
            if !(-180.0..=180.0).contains(&lng) {
                return Err(CoreError::Validation(
                    "longitude must be between -180 and 180".into(),
                ));
            }
            Ok(())
        }
        _ => Err(CoreError::Validation(
            "latitude and longitude must be given together".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn require_text_rules() {
        assert!(require_text("name", "Roads", SHORT_NAME_LEN).is_ok());
        assert_matches!(
            require_text("name", "  ", SHORT_NAME_LEN),
            Err(CoreError::Validation(msg)) if msg.contains("name")
        );
        assert!(require_text("name", &"x".repeat(101), SHORT_NAME_LEN).is_err());
    }

    #[test]
    fn limit_text_allows_blank() {
        assert!(limit_text("grade", "", NAME_LEN).is_ok());
        assert!(limit_text("grade", &"x".repeat(256), NAME_LEN).is_err());
    }

    #[test]
    fn email_checks() {
        assert!(require_email("email", "head@example.com").is_ok());
        assert!(require_email("email", "not-an-email").is_err());
        assert!(optional_email("email", "").is_ok());
        assert!(optional_email("email", "nope").is_err());
    }

    #[test]
    fn url_checks() {
        assert!(optional_url("linkedin", "").is_ok());
        assert!(optional_url("linkedin", "https://linkedin.com/in/jane").is_ok());
        assert!(optional_url("linkedin", "linkedin jane").is_err());
    }

    #[test]
    fn coordinates_pairing() {
        assert!(validate_coordinates(None, None).is_ok());
        assert!(validate_coordinates(Some(5.6), Some(-0.19)).is_ok());
        assert!(validate_coordinates(Some(5.6), None).is_err());
        assert!(validate_coordinates(Some(91.0), Some(0.0)).is_err());
        assert!(validate_coordinates(Some(0.0), Some(-181.0)).is_err());
    }
}
