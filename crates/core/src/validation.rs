//! Input validation helpers shared by request DTOs.
//!
//! DTOs derive [`validator::Validate`]; [`validate_input`] runs the derived
//! checks and flattens the result into a single [`CoreError::Validation`]
//! message that names every failing field.

use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::CoreError;

/// Product sizes accepted on create.
pub const VALID_SIZES: &[&str] = &["XS", "S", "M", "L", "XL", "XXL"];

/// Run the derived validators and convert failures into a domain error.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(describe(&errors)))
}

/// Render validation errors as `field: message; field: message`, sorted by
/// field name so the output is stable.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut parts = Vec::new();
    collect(errors, "", &mut parts);
    parts.sort();
    parts.join("; ")
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let message = err
                        .message
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| err.code.to_string());
                    out.push(format!("{path}: {message}"));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

/// Reject strings that are empty or only whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

/// Require at least one entry and no blank entries.
pub fn non_empty_references(values: &[String]) -> Result<(), ValidationError> {
    if values.is_empty() {
        return Err(ValidationError::new("empty")
            .with_message("at least one image reference is required".into()));
    }
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(ValidationError::new("blank")
            .with_message("image references must not be blank".into()));
    }
    Ok(())
}

/// Every entry must be one of [`VALID_SIZES`].
pub fn known_sizes(values: &[String]) -> Result<(), ValidationError> {
    match values.iter().find(|v| !VALID_SIZES.contains(&v.as_str())) {
        Some(bad) => Err(ValidationError::new("size").with_message(
            format!("unknown size '{bad}', expected one of {}", VALID_SIZES.join(", ")).into(),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use validator::Validate;

    use super::*;

    #[derive(Debug, Validate)]
    struct Sample {
        #[validate(custom(function = "not_blank"))]
        name: String,
        #[validate(custom(function = "non_empty_references"))]
        images: Vec<String>,
        #[validate(range(min = 0.0, message = "price must be a non-negative number"))]
        price: f64,
    }

    fn valid() -> Sample {
        Sample {
            name: "Shoes".into(),
            images: vec!["img1".into()],
            price: 10.0,
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(validate_input(&valid()).is_ok());
    }

    #[test]
    fn blank_name_is_reported_by_field() {
        let input = Sample {
            name: "   ".into(),
            ..valid()
        };
        let err = validate_input(&input).unwrap_err();
        assert_matches!(err, CoreError::Validation(ref msg) if msg.contains("name: must not be blank"));
    }

    #[test]
    fn empty_images_are_rejected() {
        let input = Sample {
            images: vec![],
            ..valid()
        };
        assert!(validate_input(&input).is_err());

        let input = Sample {
            images: vec!["ok".into(), " ".into()],
            ..valid()
        };
        assert!(validate_input(&input).is_err());
    }

    #[test]
    fn negative_price_is_rejected() {
        let input = Sample {
            price: -0.01,
            ..valid()
        };
        let err = validate_input(&input).unwrap_err();
        assert_matches!(err, CoreError::Validation(ref msg) if msg.starts_with("price:"));
    }

    #[test]
    fn multiple_failures_are_sorted() {
        let input = Sample {
            name: String::new(),
            images: vec![],
            price: -1.0,
        };
        let CoreError::Validation(msg) = validate_input(&input).unwrap_err() else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = msg.split("; ").map(|p| p.split(':').next().unwrap()).collect();
        assert_eq!(fields, vec!["images", "name", "price"]);
    }

    #[test]
    fn sizes_must_be_known() {
        assert!(known_sizes(&["S".into(), "XL".into()]).is_ok());
        assert!(known_sizes(&[]).is_ok());
        assert!(known_sizes(&["XXXL".into()]).is_err());
    }
}
