//! Pure projections from flat API results to the views the browser renders.
//!
//! Nothing here performs I/O. The client re-fetches after each mutation and
//! feeds the fresh lists through these functions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::{Component, Product};
use crate::enums::Category;
use crate::identity::ProductId;

/// Stock levels strictly below this count as low.
pub const LOW_STOCK_THRESHOLD: u64 = 10;

/// Products keyed by category, input order preserved within each group.
pub type CategoryView = BTreeMap<Category, Vec<Product>>;

/// Group a flat product list by category.
pub fn group_by_category(products: &[Product]) -> CategoryView {
    let mut view = CategoryView::new();
    for product in products {
        view.entry(product.category)
            .or_default()
            .push(product.clone());
    }
    view
}

/// Library search: case-insensitive substring match on item name or
/// manufacturer part number. A blank query matches everything.
pub fn filter_components<'a>(components: &'a [Component], query: &str) -> Vec<&'a Component> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return components.iter().collect();
    }
    components
        .iter()
        .filter(|component| {
            let fields = component.fields();
            [&fields.item_name, &fields.manufacturer_part]
                .into_iter()
                .flatten()
                .any(|text| text.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Splice a product returned by a mutation into a grouped view.
///
/// Any stale copy is removed first, so a product whose category changed
/// moves groups. Position within the group is kept when the product was
/// already present there.
pub fn apply_product_update(view: &mut CategoryView, product: &Product) {
    let mut kept_position = false;
    for (category, group) in view.iter_mut() {
        if let Some(index) = group.iter().position(|p| p.id == product.id) {
            if *category == product.category {
                group[index] = product.clone();
                kept_position = true;
            } else {
                group.remove(index);
            }
        }
    }
    if !kept_position {
        view.entry(product.category)
            .or_default()
            .push(product.clone());
    }
    view.retain(|_, group| !group.is_empty());
}

/// Drop a deleted product from a grouped view. Returns whether it was present.
pub fn remove_product(view: &mut CategoryView, product_id: ProductId) -> bool {
    let mut removed = false;
    for group in view.values_mut() {
        let before = group.len();
        group.retain(|p| p.id != product_id);
        removed |= group.len() != before;
    }
    view.retain(|_, group| !group.is_empty());
    removed
}

// ============================================================================
// DASHBOARD SUMMARY
// ============================================================================

/// Per-category product count on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: Category,
    pub products: usize,
}

/// Dashboard totals over the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    pub total_products: usize,
    pub total_components: usize,
    /// Library components with fewer than ten in stock (absent counts as 0).
    pub low_stock_components: usize,
    pub components_on_order: usize,
    /// Every category in declaration order, including empty ones.
    pub categories: Vec<CategoryCount>,
}

impl CatalogSummary {
    pub fn compute(products: &[Product], components: &[Component]) -> Self {
        let categories = Category::ALL
            .iter()
            .map(|category| CategoryCount {
                category: *category,
                products: products.iter().filter(|p| p.category == *category).count(),
            })
            .collect();

        Self {
            total_products: products.len(),
            total_components: components.len(),
            low_stock_components: components
                .iter()
                .filter(|c| c.fields().stock_or_zero() < LOW_STOCK_THRESHOLD)
                .count(),
            components_on_order: components
                .iter()
                .filter(|c| c.fields().ordered_or_zero() > 0)
                .count(),
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ComponentFields, ComponentInput, ProductDraft};
    use crate::error::ValidationError;

    fn product(name: &str, category: &str) -> Result<Product, ValidationError> {
        Ok(Product::create(ProductDraft::new(name, "spec", category)?))
    }

    fn part(name: &str, manuf: Option<&str>, stock: Option<u64>, ordered: Option<u64>) -> Component {
        Component::create(ComponentInput {
            fields: ComponentFields {
                item_name: Some(name.to_string()),
                manufacturer_part: manuf.map(str::to_string),
                stock_quantity: stock,
                ordered_quantity: ordered,
                ..Default::default()
            },
            ..Default::default()
        })
    }

    #[test]
    fn test_group_preserves_order_within_category() -> Result<(), ValidationError> {
        let a = product("A", "ISRO")?;
        let b = product("B", "Defense Product")?;
        let c = product("C", "ISRO")?;
        let view = group_by_category(&[a.clone(), b.clone(), c.clone()]);

        assert_eq!(view.len(), 2);
        let isro: Vec<_> = view[&Category::Isro].iter().map(|p| p.id).collect();
        assert_eq!(isro, vec![a.id, c.id]);
        assert_eq!(view[&Category::DefenseProduct][0].id, b.id);
        Ok(())
    }

    #[test]
    fn test_filter_matches_name_or_part_number() {
        let parts = vec![
            part("Resistor 10k", Some("RC0603"), None, None),
            part("Capacitor", Some("GRM188R71"), None, None),
            part("Diode", None, None, None),
        ];
        assert_eq!(filter_components(&parts, "").len(), 3);
        assert_eq!(filter_components(&parts, "  ").len(), 3);

        let hits = filter_components(&parts, "RESIS");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, parts[0].id);

        let hits = filter_components(&parts, "grm");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, parts[1].id);

        assert!(filter_components(&parts, "inductor").is_empty());
    }

    #[test]
    fn test_apply_update_replaces_in_place() -> Result<(), ValidationError> {
        let a = product("A", "ISRO")?;
        let b = product("B", "ISRO")?;
        let mut view = group_by_category(&[a.clone(), b.clone()]);

        let mut renamed = a.clone();
        renamed.update_metadata("A2", "spec")?;
        apply_product_update(&mut view, &renamed);

        let group = &view[&Category::Isro];
        assert_eq!(group.len(), 2);
        assert_eq!(group[0].product_name, "A2");
        assert_eq!(group[1].id, b.id);
        Ok(())
    }

    #[test]
    fn test_apply_update_moves_between_categories() -> Result<(), ValidationError> {
        let a = product("A", "ISRO")?;
        let mut view = group_by_category(&[a.clone()]);

        let mut moved = a.clone();
        moved.category = Category::PowerSupplies;
        apply_product_update(&mut view, &moved);

        assert!(!view.contains_key(&Category::Isro));
        assert_eq!(view[&Category::PowerSupplies][0].id, a.id);

        let fresh = product("New", "ISRO")?;
        apply_product_update(&mut view, &fresh);
        assert_eq!(view[&Category::Isro][0].id, fresh.id);
        Ok(())
    }

    #[test]
    fn test_remove_product_from_view() -> Result<(), ValidationError> {
        let a = product("A", "ISRO")?;
        let b = product("B", "Defense Product")?;
        let mut view = group_by_category(&[a.clone(), b.clone()]);

        assert!(remove_product(&mut view, a.id));
        assert!(!view.contains_key(&Category::Isro));
        assert!(!remove_product(&mut view, a.id));
        assert_eq!(view.len(), 1);
        Ok(())
    }

    #[test]
    fn test_summary_counts() -> Result<(), ValidationError> {
        let products = vec![
            product("A", "ISRO")?,
            product("B", "ISRO")?,
            product("C", "Bio-Medical Instruments")?,
        ];
        let parts = vec![
            part("a", None, Some(3), Some(5)),
            part("b", None, None, None),
            part("c", None, Some(10), Some(0)),
            part("d", None, Some(50), Some(1)),
        ];
        let summary = CatalogSummary::compute(&products, &parts);

        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.total_components, 4);
        assert_eq!(summary.low_stock_components, 2);
        assert_eq!(summary.components_on_order, 2);
        assert_eq!(summary.categories.len(), Category::ALL.len());

        let isro = summary
            .categories
            .iter()
            .find(|c| c.category == Category::Isro)
            .map(|c| c.products);
        assert_eq!(isro, Some(2));
        Ok(())
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_products() -> impl Strategy<Value = Vec<Product>> {
            prop::collection::vec(prop::sample::select(Category::ALL.to_vec()), 0..24).prop_map(
                |categories| {
                    categories
                        .into_iter()
                        .filter_map(|c| ProductDraft::new("P", "S", c.as_str()).ok())
                        .map(Product::create)
                        .collect()
                },
            )
        }

        proptest! {
            #[test]
            fn prop_grouping_keeps_every_product_in_order(products in arb_products()) {
                let view = group_by_category(&products);
                let total: usize = view.values().map(Vec::len).sum();
                prop_assert_eq!(total, products.len());

                for (category, group) in &view {
                    prop_assert!(!group.is_empty());
                    let expected: Vec<_> = products
                        .iter()
                        .filter(|p| p.category == *category)
                        .map(|p| p.id)
                        .collect();
                    let actual: Vec<_> = group.iter().map(|p| p.id).collect();
                    prop_assert_eq!(actual, expected);
                }
            }

            #[test]
            fn prop_remove_then_apply_restores_membership(
                products in arb_products(),
                pick in any::<prop::sample::Index>(),
            ) {
                prop_assume!(!products.is_empty());
                let target = pick.get(&products).clone();
                let mut view = group_by_category(&products);

                prop_assert!(remove_product(&mut view, target.id));
                let total: usize = view.values().map(Vec::len).sum();
                prop_assert_eq!(total, products.len() - 1);

                apply_product_update(&mut view, &target);
                let total: usize = view.values().map(Vec::len).sum();
                prop_assert_eq!(total, products.len());
            }
        }
    }
}
