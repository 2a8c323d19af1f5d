//! API Request and Response Types
//!
//! Wire shapes that exist only at the HTTP boundary. Record bodies
//! themselves (`Component`, `Product`, ...) come from stockroom-core.

use serde::{Deserialize, Serialize};
use stockroom_core::{Component, Product, ProductDraft};

use crate::error::ApiResult;
use crate::validation::require;

// ============================================================================
// ROOT
// ============================================================================

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StatusMessage {
    pub message: String,
}

pub const ROOT_MESSAGE: &str = "Inventory Backend is running";

// ============================================================================
// COMPONENT TYPES
// ============================================================================

/// Query string for `GET /components`.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ComponentSearchParams {
    /// Case-insensitive match on item name or manufacturer part number
    pub q: Option<String>,
}

/// Confirmation returned by `DELETE /components/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DeletedComponentResponse {
    pub message: String,
    pub component: Component,
}

impl DeletedComponentResponse {
    pub fn new(component: Component) -> Self {
        Self {
            message: "Deleted".to_string(),
            component,
        }
    }
}

// ============================================================================
// PRODUCT TYPES
// ============================================================================

/// Body of `POST /products`.
///
/// Fields are optional on the wire so a missing one is reported as
/// MISSING_FIELD rather than a generic parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[cfg_attr(feature = "openapi", schema(example = "Widget"))]
    pub product_name: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "10V"))]
    pub specifications: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "ISRO"))]
    pub category: Option<String>,
}

impl CreateProductRequest {
    pub fn into_draft(self) -> ApiResult<ProductDraft> {
        let product_name = require(&self.product_name, "productName")?;
        let specifications = require(&self.specifications, "specifications")?;
        let category = require(&self.category, "category")?;
        Ok(ProductDraft::new(product_name, specifications, category)?)
    }
}

/// Body of `PUT /products/{id}`. Only name and specifications change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub product_name: Option<String>,
    pub specifications: Option<String>,
}

/// Confirmation returned by `DELETE /products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DeletedProductResponse {
    pub message: String,
    pub product: Product,
}

impl DeletedProductResponse {
    pub fn new(product: Product) -> Self {
        Self {
            message: "Product deleted".to_string(),
            product,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use stockroom_core::Category;

    #[test]
    fn test_create_request_into_draft() -> Result<(), Box<dyn std::error::Error>> {
        let req: CreateProductRequest = serde_json::from_value(serde_json::json!({
            "productName": " Widget ",
            "specifications": "10V",
            "category": "Test and Measurements-Power Supplies"
        }))?;
        let draft = req.into_draft()?;
        assert_eq!(draft.product_name(), "Widget");
        assert_eq!(draft.category(), Category::PowerSupplies);
        Ok(())
    }

    #[test]
    fn test_create_request_missing_fields() {
        let err = CreateProductRequest::default().into_draft().err();
        assert_eq!(err.map(|e| e.code), Some(ErrorCode::MissingField));

        let req = CreateProductRequest {
            product_name: Some("Widget".to_string()),
            specifications: Some("10V".to_string()),
            category: Some("Toys".to_string()),
        };
        let err = req.into_draft().err();
        assert_eq!(err.map(|e| e.code), Some(ErrorCode::ValidationFailed));
    }

    #[test]
    fn test_deleted_component_shape() -> Result<(), serde_json::Error> {
        let component = Component::create(Default::default());
        let json = serde_json::to_value(DeletedComponentResponse::new(component.clone()))?;
        assert_eq!(json["message"], "Deleted");
        assert_eq!(json["component"]["_id"], component.id.to_string());
        Ok(())
    }
}
