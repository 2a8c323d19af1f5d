//! Validation Traits
//!
//! Presence checks for request fields, shared by the route handlers.

use crate::error::{ApiError, ApiResult};

/// Trait for validating non-empty strings.
///
/// # Example
/// ```ignore
/// use stockroom_api::validation::ValidateNonEmpty;
///
/// req.product_name.validate_non_empty("productName")?;
/// ```
pub trait ValidateNonEmpty {
    /// Returns `ApiError::missing_field` if the value is absent, empty or
    /// whitespace-only.
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()>;
}

impl ValidateNonEmpty for str {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        if self.trim().is_empty() {
            return Err(ApiError::missing_field(field_name));
        }
        Ok(())
    }
}

impl ValidateNonEmpty for String {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        self.as_str().validate_non_empty(field_name)
    }
}

impl<T: ValidateNonEmpty> ValidateNonEmpty for Option<T> {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        match self {
            Some(value) => value.validate_non_empty(field_name),
            None => Err(ApiError::missing_field(field_name)),
        }
    }
}

/// Unwrap a required string field, failing like `validate_non_empty`.
pub fn require<'a>(value: &'a Option<String>, field_name: &str) -> ApiResult<&'a str> {
    value.validate_non_empty(field_name)?;
    Ok(value.as_deref().unwrap_or_default())
}
