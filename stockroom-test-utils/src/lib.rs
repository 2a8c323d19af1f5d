//! Stockroom Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - Proptest generators for records and request payloads
//! - Fixtures for common scenarios

pub use stockroom_storage::InMemoryRecordStore;

pub use stockroom_core::{
    Category, Component, ComponentEntry, ComponentFields, ComponentId, ComponentInput, EntryId,
    Product, ProductDraft, ProductId, RecordId, RecordIdType, ValidationError,
};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for stockroom records.

    use super::*;
    use proptest::prelude::*;

    // === Identity ===

    pub fn arb_record_id() -> impl Strategy<Value = RecordId> {
        any::<[u8; 12]>().prop_map(RecordId::from_bytes)
    }

    pub fn arb_product_id() -> impl Strategy<Value = ProductId> {
        arb_record_id().prop_map(ProductId::new)
    }

    pub fn arb_entry_id() -> impl Strategy<Value = EntryId> {
        arb_record_id().prop_map(EntryId::new)
    }

    // === Text ===

    /// Short printable text with no leading or trailing whitespace.
    pub fn arb_text() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 ./%-]{0,14}[A-Za-z0-9]"
    }

    /// Empty or whitespace-only strings.
    pub fn arb_blank_string() -> impl Strategy<Value = String> {
        prop::collection::vec(prop_oneof![Just(' '), Just('\t'), Just('\n')], 0..6)
            .prop_map(|chars| chars.into_iter().collect())
    }

    /// A `dd/mm/yyyy` stamp.
    pub fn arb_date_stamp() -> impl Strategy<Value = String> {
        (1u32..=28, 1u32..=12, 2000u32..=2035)
            .prop_map(|(d, m, y)| format!("{:02}/{:02}/{}", d, m, y))
    }

    // === Enums ===

    pub fn arb_category() -> impl Strategy<Value = Category> {
        prop::sample::select(Category::ALL.to_vec())
    }

    // === Records ===

    pub fn arb_component_fields() -> impl Strategy<Value = ComponentFields> {
        (
            (
                prop::option::of(arb_text()),
                prop::option::of(arb_text()),
                prop::option::of(arb_text()),
                prop::option::of(arb_text()),
                prop::option::of(arb_text()),
                prop::option::of(arb_text()),
            ),
            (
                prop::option::of(arb_text()),
                prop::option::of(arb_text()),
                prop::option::of(arb_text()),
                prop::option::of(0u64..100_000),
                prop::option::of(0u64..100_000),
                prop::option::of((0u32..1_000_000).prop_map(|paise| f64::from(paise) / 100.0)),
            ),
        )
            .prop_map(
                |(
                    (item_name, value, tolerance, ppm, package, package_size),
                    (manufacturer_part, source_origin, vendor, stock, ordered, price),
                )| ComponentFields {
                    item_name,
                    value,
                    tolerance,
                    ppm,
                    package,
                    package_size,
                    manufacturer_part,
                    source_origin,
                    vendor,
                    stock_quantity: stock,
                    ordered_quantity: ordered,
                    price_inr: price,
                },
            )
    }

    /// A library component payload. `lastUpdated` is always present so a
    /// stored copy can be compared with the payload as-is.
    pub fn arb_component_input() -> impl Strategy<Value = ComponentInput> {
        (
            prop::option::of(0u64..10_000),
            arb_component_fields(),
            arb_date_stamp(),
        )
            .prop_map(|(sl_no, fields, stamp)| ComponentInput {
                sl_no,
                fields,
                last_updated: Some(stamp),
            })
    }

    pub fn arb_product_draft() -> impl Strategy<Value = ProductDraft> {
        (arb_text(), arb_text(), arb_category()).prop_filter_map(
            "draft must validate",
            |(name, specs, category)| ProductDraft::new(&name, &specs, category.as_str()).ok(),
        )
    }

    /// A product carrying up to `max_entries` component entries.
    pub fn arb_product(max_entries: usize) -> impl Strategy<Value = Product> {
        (
            arb_product_draft(),
            prop::collection::vec(arb_component_fields(), 0..=max_entries),
        )
            .prop_map(|(draft, entries)| {
                let mut product = Product::create(draft);
                for fields in entries {
                    product.add_component(fields);
                }
                product
            })
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Ready-made records for scenario tests.

    use super::*;

    /// The "Widget" product request body.
    pub fn widget_request() -> serde_json::Value {
        serde_json::json!({
            "productName": "Widget",
            "specifications": "10V",
            "category": "ISRO"
        })
    }

    /// The resistor entry request body.
    pub fn resistor_entry_request() -> serde_json::Value {
        serde_json::json!({
            "itemName": "R1",
            "priceInr": 0.5,
            "stockQuantity": 100
        })
    }

    pub fn resistor_fields() -> ComponentFields {
        ComponentFields {
            item_name: Some("Resistor 10k".to_string()),
            value: Some("10k".to_string()),
            tolerance: Some("1%".to_string()),
            package: Some("SMD".to_string()),
            package_size: Some("0603".to_string()),
            manufacturer_part: Some("RC0603FR-0710KL".to_string()),
            vendor: Some("Mouser".to_string()),
            stock_quantity: Some(250),
            ordered_quantity: Some(0),
            price_inr: Some(0.75),
            ..Default::default()
        }
    }

    pub fn resistor_input() -> ComponentInput {
        ComponentInput {
            sl_no: Some(1),
            fields: resistor_fields(),
            last_updated: Some("01/02/2024".to_string()),
        }
    }

    pub fn widget_draft() -> Result<ProductDraft, ValidationError> {
        ProductDraft::new("Widget", "10V", "ISRO")
    }

    /// A memory store holding one library component and one product with
    /// a single entry.
    pub async fn seeded_store(
    ) -> Result<(InMemoryRecordStore, Component, Product), Box<dyn std::error::Error>> {
        use stockroom_storage::RecordStore;

        let store = InMemoryRecordStore::new();
        let component = Component::create(resistor_input());
        store.component_insert(&component).await?;

        let mut product = Product::create(widget_draft()?);
        product.add_component(resistor_fields());
        store.product_insert(&product).await?;

        Ok((store, component, product))
    }
}
