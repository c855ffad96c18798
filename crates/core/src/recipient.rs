//! Validation for tracked-email create input.
//!
//! The recipient address only gets a basic format check; nothing here
//! verifies that the mailbox exists.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Longest accepted recipient address (RFC 5321 path limit).
pub const MAX_ADDRESS_LEN: usize = 320;

/// Longest accepted description label.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Longest accepted signature name for snippet rendering.
pub const MAX_SIGNATURE_NAME_LEN: usize = 200;

/// Validate a (trimmed) recipient address.
pub fn validate_recipient_address(address: &str) -> Result<(), CoreError> {
    if address.is_empty() {
        return Err(CoreError::Validation(
            "recipient_address is required".into(),
        ));
    }
    if address.len() > MAX_ADDRESS_LEN {
        return Err(CoreError::Validation(format!(
            "recipient_address must be at most {MAX_ADDRESS_LEN} characters"
        )));
    }
    let candidate = address.to_string();
    if !candidate.validate_email() {
        return Err(CoreError::Validation(format!(
            "'{address}' is not a valid email address"
        )));
    }
    Ok(())
}

/// Validate a (trimmed) description label.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.is_empty() {
        return Err(CoreError::Validation("description is required".into()));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate an optional (trimmed) signature name.
pub fn validate_signature_name(name: Option<&str>) -> Result<(), CoreError> {
    match name {
        Some(name) if name.chars().count() > MAX_SIGNATURE_NAME_LEN => {
            Err(CoreError::Validation(format!(
                "signature_name must be at most {MAX_SIGNATURE_NAME_LEN} characters"
            )))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn accepts_plain_address() {
        assert!(validate_recipient_address("a@x.com").is_ok());
    }

    #[test]
    fn rejects_missing_at_sign() {
        assert_matches!(
            validate_recipient_address("not-an-email"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn rejects_empty_address() {
        assert_matches!(
            validate_recipient_address(""),
            Err(CoreError::Validation(msg)) if msg.contains("required")
        );
    }

    #[test]
    fn rejects_overlong_address() {
        let address = format!("{}@x.com", "a".repeat(MAX_ADDRESS_LEN));
        assert_matches!(
            validate_recipient_address(&address),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn description_must_not_be_empty() {
        assert!(validate_description("invoice").is_ok());
        assert_matches!(validate_description(""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn description_length_counts_characters() {
        let at_limit = "é".repeat(MAX_DESCRIPTION_LEN);
        assert!(validate_description(&at_limit).is_ok());

        let over = "é".repeat(MAX_DESCRIPTION_LEN + 1);
        assert_matches!(validate_description(&over), Err(CoreError::Validation(_)));
    }

    #[test]
    fn signature_name_is_optional() {
        assert!(validate_signature_name(None).is_ok());
        assert!(validate_signature_name(Some("Ada")).is_ok());
        let long = "a".repeat(MAX_SIGNATURE_NAME_LEN + 1);
        assert!(validate_signature_name(Some(&long)).is_err());
    }
}
