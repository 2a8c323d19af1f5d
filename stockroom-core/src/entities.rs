//! Record types: library components, products, and the component entries
//! products embed.

use serde::{Deserialize, Serialize};

use crate::coerce::{opt_price, opt_quantity};
use crate::dates;
use crate::enums::Category;
use crate::error::ValidationError;
use crate::identity::{ComponentId, EntryId, ProductId, RecordIdType};

// ============================================================================
// SHARED FIELD SET
// ============================================================================

/// Attributes shared by library components and product component entries.
///
/// Every attribute is optional; absent ones are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ComponentFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    /// Component value, e.g. "10k" or "100nF".
    #[serde(rename = "component", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ppm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_size: Option<String>,
    /// Manufacturer part number.
    #[serde(rename = "manuf", default, skip_serializing_if = "Option::is_none")]
    pub manufacturer_part: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(
        default,
        deserialize_with = "opt_quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub stock_quantity: Option<u64>,
    #[serde(
        default,
        deserialize_with = "opt_quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub ordered_quantity: Option<u64>,
    /// Unit price in INR.
    #[serde(
        default,
        deserialize_with = "opt_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_inr: Option<f64>,
}

impl ComponentFields {
    /// Stock on hand, absent counted as zero.
    pub fn stock_or_zero(&self) -> u64 {
        self.stock_quantity.unwrap_or(0)
    }

    pub fn ordered_or_zero(&self) -> u64 {
        self.ordered_quantity.unwrap_or(0)
    }

    /// Re-check numeric invariants for values built in code rather than
    /// deserialized.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(price) = self.price_inr {
            if !price.is_finite() || price < 0.0 {
                return Err(ValidationError::invalid(
                    "priceInr",
                    "must be a non-negative number",
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// STANDALONE COMPONENT
// ============================================================================

/// Mutable content of a library component: everything except its id.
///
/// This is both the create/replace request body and the stored payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ComponentInput {
    #[serde(
        default,
        deserialize_with = "opt_quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub sl_no: Option<u64>,
    #[serde(flatten)]
    pub fields: ComponentFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// A component in the top-level parts library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Component {
    #[serde(rename = "_id")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "65a1f0c2b3d4e5f60718293a"))]
    pub id: ComponentId,
    #[serde(flatten)]
    pub data: ComponentInput,
}

impl Component {
    /// New library component with a freshly generated id.
    pub fn create(data: ComponentInput) -> Self {
        Self {
            id: ComponentId::generate(),
            data,
        }
    }

    /// Full replace of everything but the id.
    pub fn replace(&mut self, data: ComponentInput) {
        self.data = data;
    }

    pub fn fields(&self) -> &ComponentFields {
        &self.data.fields
    }
}

// ============================================================================
// PRODUCT AND EMBEDDED ENTRIES
// ============================================================================

/// A component record owned by a product.
///
/// Has its own id, unique within the owning product, but no lifecycle
/// outside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ComponentEntry {
    #[serde(rename = "_id")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "65a1f0c2b3d4e5f60718293b"))]
    pub id: EntryId,
    #[serde(flatten)]
    pub fields: ComponentFields,
    #[serde(default)]
    pub date_added: String,
}

impl ComponentEntry {
    /// Stamp a fresh id and today's date onto a field set.
    pub fn stamp(fields: ComponentFields) -> Self {
        Self {
            id: EntryId::generate(),
            fields,
            date_added: dates::today(),
        }
    }
}

/// Validated input for a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    product_name: String,
    specifications: String,
    category: Category,
}

impl ProductDraft {
    /// Trim and validate. Name and specifications must be non-empty after
    /// trimming; category must be one of the fixed set.
    pub fn new(
        product_name: &str,
        specifications: &str,
        category: &str,
    ) -> Result<Self, ValidationError> {
        let (product_name, specifications) = trimmed_metadata(product_name, specifications)?;
        let category = category.parse::<Category>()?;
        Ok(Self {
            product_name,
            specifications,
            category,
        })
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn specifications(&self) -> &str {
        &self.specifications
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

/// Trim product name and specifications, failing if either ends up empty.
pub fn trimmed_metadata(
    product_name: &str,
    specifications: &str,
) -> Result<(String, String), ValidationError> {
    let product_name = product_name.trim();
    if product_name.is_empty() {
        return Err(ValidationError::missing("productName"));
    }
    let specifications = specifications.trim();
    if specifications.is_empty() {
        return Err(ValidationError::missing("specifications"));
    }
    Ok((product_name.to_string(), specifications.to_string()))
}

/// A catalog product owning an ordered list of component entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "65a1f0c2b3d4e5f60718293c"))]
    pub id: ProductId,
    pub product_name: String,
    pub specifications: String,
    pub category: Category,
    pub date_added: String,
    #[serde(default)]
    pub components: Vec<ComponentEntry>,
}

impl Product {
    /// New product with a generated id, today's date and no components.
    pub fn create(draft: ProductDraft) -> Self {
        Self {
            id: ProductId::generate(),
            product_name: draft.product_name,
            specifications: draft.specifications,
            category: draft.category,
            date_added: dates::today(),
            components: Vec::new(),
        }
    }

    /// Append a new entry built from `fields` and return its id.
    ///
    /// Ids are regenerated until unique within this product.
    pub fn add_component(&mut self, fields: ComponentFields) -> EntryId {
        let mut entry = ComponentEntry::stamp(fields);
        while self.entry(entry.id).is_some() {
            entry.id = EntryId::generate();
        }
        let id = entry.id;
        self.components.push(entry);
        id
    }

    /// Remove the entry with `entry_id`. Returns false if no entry matched.
    pub fn remove_component(&mut self, entry_id: EntryId) -> bool {
        let before = self.components.len();
        self.components.retain(|entry| entry.id != entry_id);
        self.components.len() != before
    }

    pub fn entry(&self, entry_id: EntryId) -> Option<&ComponentEntry> {
        self.components.iter().find(|entry| entry.id == entry_id)
    }

    /// Replace name and specifications. Category and entries are untouched.
    pub fn update_metadata(
        &mut self,
        product_name: &str,
        specifications: &str,
    ) -> Result<(), ValidationError> {
        let (name, specs) = trimmed_metadata(product_name, specifications)?;
        self.product_name = name;
        self.specifications = specs;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resistor() -> ComponentFields {
        ComponentFields {
            item_name: Some("R1".to_string()),
            price_inr: Some(0.5),
            stock_quantity: Some(100),
            ..Default::default()
        }
    }

    fn widget() -> Result<Product, ValidationError> {
        Ok(Product::create(ProductDraft::new("Widget", "10V", "ISRO")?))
    }

    #[test]
    fn test_component_wire_format() -> Result<(), serde_json::Error> {
        let json = serde_json::json!({
            "slNo": "3",
            "itemName": "Resistor",
            "component": "10k",
            "manuf": "RC0603FR-0710KL",
            "stockQuantity": "25",
            "orderedQuantity": "",
            "priceInr": 1.25,
            "lastUpdated": "01/02/2024"
        });
        let input: ComponentInput = serde_json::from_value(json)?;
        assert_eq!(input.sl_no, Some(3));
        assert_eq!(input.fields.value.as_deref(), Some("10k"));
        assert_eq!(input.fields.manufacturer_part.as_deref(), Some("RC0603FR-0710KL"));
        assert_eq!(input.fields.stock_quantity, Some(25));
        assert_eq!(input.fields.ordered_quantity, None);

        let component = Component::create(input);
        let out = serde_json::to_value(&component)?;
        assert_eq!(out["_id"], serde_json::json!(component.id.to_string()));
        assert_eq!(out["component"], "10k");
        assert_eq!(out["slNo"], 3);
        assert!(out.get("orderedQuantity").is_none());
        assert!(out.get("tolerance").is_none());
        Ok(())
    }

    #[test]
    fn test_component_rejects_bad_numbers() {
        let bad = serde_json::json!({ "itemName": "C1", "stockQuantity": -4 });
        assert!(serde_json::from_value::<ComponentInput>(bad).is_err());
        let bad = serde_json::json!({ "priceInr": "free" });
        assert!(serde_json::from_value::<ComponentInput>(bad).is_err());
    }

    #[test]
    fn test_replace_keeps_id() {
        let mut component = Component::create(ComponentInput::default());
        let id = component.id;
        component.replace(ComponentInput {
            sl_no: Some(9),
            ..Default::default()
        });
        assert_eq!(component.id, id);
        assert_eq!(component.data.sl_no, Some(9));
    }

    #[test]
    fn test_product_draft_trims_and_validates() -> Result<(), ValidationError> {
        let draft = ProductDraft::new("  Widget ", " 10V ", "ISRO")?;
        assert_eq!(draft.product_name(), "Widget");
        assert_eq!(draft.specifications(), "10V");
        assert_eq!(draft.category(), Category::Isro);

        assert_eq!(
            ProductDraft::new("   ", "10V", "ISRO"),
            Err(ValidationError::missing("productName"))
        );
        assert_eq!(
            ProductDraft::new("Widget", "\t\n", "ISRO"),
            Err(ValidationError::missing("specifications"))
        );
        assert!(ProductDraft::new("Widget", "10V", "Toys").is_err());
        Ok(())
    }

    #[test]
    fn test_new_product_is_empty_and_dated() -> Result<(), ValidationError> {
        let product = widget()?;
        assert!(product.components.is_empty());
        assert!(!product.date_added.is_empty());
        Ok(())
    }

    #[test]
    fn test_add_and_remove_component() -> Result<(), ValidationError> {
        let mut product = widget()?;
        let first = product.add_component(resistor());
        let second = product.add_component(resistor());
        assert_ne!(first, second);
        assert_eq!(product.components.len(), 2);
        assert_eq!(product.components[0].id, first);

        assert!(product.remove_component(first));
        assert_eq!(product.components.len(), 1);
        assert!(!product.remove_component(first));
        assert_eq!(product.components.len(), 1);
        Ok(())
    }

    #[test]
    fn test_update_metadata_leaves_category_and_entries() -> Result<(), ValidationError> {
        let mut product = widget()?;
        product.add_component(resistor());
        let before = product.components.clone();

        product.update_metadata(" Gadget ", "12V")?;
        assert_eq!(product.product_name, "Gadget");
        assert_eq!(product.category, Category::Isro);
        assert_eq!(product.components, before);

        assert!(product.update_metadata("", "12V").is_err());
        assert_eq!(product.product_name, "Gadget");
        Ok(())
    }

    #[test]
    fn test_entry_ignores_client_supplied_id_and_date() -> Result<(), serde_json::Error> {
        let json = serde_json::json!({
            "_id": "000000000000000000000000",
            "dateAdded": "01/01/1970",
            "itemName": "R1"
        });
        let fields: ComponentFields = serde_json::from_value(json)?;
        let entry = ComponentEntry::stamp(fields);
        assert_ne!(entry.id.to_string(), "000000000000000000000000");
        assert_ne!(entry.date_added, "01/01/1970");
        Ok(())
    }
}
