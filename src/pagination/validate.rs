//! Validation of pagination options

use super::types::PaginationOptions;
use crate::config::PagePolicy;
use crate::error::{Error, FieldViolation, Result};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

const MUST_BE_POSITIVE: &str = "must be greater than 0";

/// Check `options` against the given page policy
///
/// Every violated field is reported, sorted by field name.
pub fn validate_options(
    options: &PaginationOptions,
    policy: PagePolicy,
) -> Result<&PaginationOptions> {
    let mut errors = options
        .validate()
        .err()
        .unwrap_or_else(ValidationErrors::new);

    if policy == PagePolicy::Strict && options.page <= 0 {
        let mut error = ValidationError::new("range");
        error.message = Some(Cow::Borrowed(MUST_BE_POSITIVE));
        errors.add("page", error);
    }

    let violations = into_violations(&errors);
    if violations.is_empty() {
        Ok(options)
    } else {
        Err(Error::validation(violations))
    }
}

fn into_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map_or_else(|| e.code.to_string(), ToString::to_string);
                FieldViolation::new(field.clone(), message)
            })
        })
        .collect();

    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}
