//! Input checks shared by the services.

use crate::error::{Result, ServiceError};

/// Trimmed `value`, or `Validation` naming `field` when it is blank.
pub fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Trimmed optional text; blank becomes `None`.
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Loose shape check: one `@` with something on both sides and a dot in
/// the domain.
pub fn email(value: &str) -> Result<String> {
    let trimmed = value.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !trimmed.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ServiceError::Validation(format!(
            "{trimmed:?} is not an email address"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims() {
        assert_eq!(required("name", "  Bread ").unwrap(), "Bread");
        assert!(matches!(
            required("name", "   "),
            Err(ServiceError::Validation(m)) if m == "name is required"
        ));
    }

    #[test]
    fn optional_drops_blank() {
        assert_eq!(optional(Some(" hi ")), Some("hi".to_string()));
        assert_eq!(optional(Some("  ")), None);
        assert_eq!(optional(None), None);
    }

    #[test]
    fn email_shapes() {
        assert!(email("alice@example.com").is_ok());
        assert!(email(" bob@mail.example.my ").is_ok());
        for bad in ["", "alice", "@example.com", "alice@", "alice@example", "a@b@c.com", "a b@c.com"] {
            assert!(email(bad).is_err(), "{bad} should be rejected");
        }
    }
}
