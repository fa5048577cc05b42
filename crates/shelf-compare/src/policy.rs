//! Whether a labelled detection sitting in a cell counts as the wrong product.
//!
//! Detector labels are coarse categories, not product identities, so every
//! policy here is a heuristic and `Misplaced` results are a hint only.

use std::collections::HashMap;

use shelf_proto::Product;

pub trait MisplacementPolicy {
    /// Called only for detections that carry a non-empty label.
    fn is_misplaced(&self, detection_label: &str, expected_product_id: &str) -> bool;
}

/// Misplaced whenever the label differs from the product id string.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelMismatch;

impl MisplacementPolicy for LabelMismatch {
    fn is_misplaced(&self, detection_label: &str, expected_product_id: &str) -> bool {
        detection_label != expected_product_id
    }
}

/// Compares the label with the expected product's catalog category,
/// ignoring ASCII case. Products without a known category fall back to
/// [`LabelMismatch`].
#[derive(Debug, Clone, Default)]
pub struct CategoryMismatch {
    categories: HashMap<String, String>,
}

impl CategoryMismatch {
    pub fn from_products<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        let categories = products
            .into_iter()
            .filter_map(|p| {
                let cat = p.category.as_deref()?.trim();
                (!cat.is_empty()).then(|| (p.id.clone(), cat.to_string()))
            })
            .collect();
        Self { categories }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl MisplacementPolicy for CategoryMismatch {
    fn is_misplaced(&self, detection_label: &str, expected_product_id: &str) -> bool {
        match self.categories.get(expected_product_id) {
            Some(cat) => !cat.eq_ignore_ascii_case(detection_label.trim()),
            None => LabelMismatch.is_misplaced(detection_label, expected_product_id),
        }
    }
}

impl<F> MisplacementPolicy for F
where
    F: Fn(&str, &str) -> bool,
{
    fn is_misplaced(&self, detection_label: &str, expected_product_id: &str) -> bool {
        self(detection_label, expected_product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, category: Option<&str>) -> Product {
        Product {
            id: id.into(),
            sku: id.into(),
            name: id.into(),
            upc: None,
            brand: None,
            category: category.map(Into::into),
            width_mm: 100,
            height_mm: None,
            depth_mm: None,
            image_url: None,
        }
    }

    #[test]
    fn label_mismatch_is_plain_string_inequality() {
        assert!(LabelMismatch.is_misplaced("dairy", "bread-123"));
        assert!(!LabelMismatch.is_misplaced("bread-123", "bread-123"));
        assert!(LabelMismatch.is_misplaced("Bread-123", "bread-123"));
    }

    #[test]
    fn category_policy_uses_catalog() {
        let products = [product("milk", Some("Food")), product("shirt", Some(" Fashion ")), product("x", None)];
        let policy = CategoryMismatch::from_products(&products);
        assert_eq!(policy.len(), 2);

        assert!(!policy.is_misplaced("food", "milk"));
        assert!(policy.is_misplaced("Fashion", "milk"));
        assert!(!policy.is_misplaced("Fashion", "shirt"));
        // unknown category: label heuristic
        assert!(policy.is_misplaced("Food", "x"));
        assert!(!policy.is_misplaced("x", "x"));
    }

    #[test]
    fn closures_are_policies() {
        let never = |_: &str, _: &str| false;
        assert!(!never.is_misplaced("dairy", "bread"));
        let prefix = |label: &str, product: &str| !product.starts_with(label);
        assert!(!prefix.is_misplaced("bread", "bread-123"));
        assert!(prefix.is_misplaced("dairy", "bread-123"));
    }
}
