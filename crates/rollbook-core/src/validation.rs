//! Field-level validation errors.
//!
//! `validator` reports failures as a map keyed by field; the API reports them
//! as a flat, field-sorted list so responses are stable.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

/// One failed field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Flattens `validator` output into [`FieldError`]s.
///
/// Constraints without an explicit message fall back to `"<field> is invalid"`.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut flattened: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field)),
            })
        })
        .collect();

    flattened.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    flattened
}

/// Runs `validate` and returns the flattened failures (empty when valid).
pub fn check<T: Validate + ?Sized>(value: &T) -> Vec<FieldError> {
    match value.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => field_errors(&errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn test_check_valid() {
        let sample = Sample {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        };
        assert!(check(&sample).is_empty());
    }

    #[test]
    fn test_check_uses_message_or_fallback() {
        let sample = Sample {
            name: String::new(),
            email: "not-an-email".to_string(),
        };
        let errors = check(&sample);

        assert_eq!(
            errors,
            vec![
                FieldError {
                    field: "email".to_string(),
                    message: "email is invalid".to_string(),
                },
                FieldError {
                    field: "name".to_string(),
                    message: "name is required".to_string(),
                },
            ]
        );
    }
}
