//! Product Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Product Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
    pub category: String,
    pub sku: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
    pub category: String,
    pub sku: String,
}

/// Product Update Model
///
/// Empty strings and non-positive numbers leave the stored value unchanged.
/// The SKU is fixed at creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
    pub category: String,
}

impl ProductUpdate {
    /// Overlay the populated fields onto `product`.
    pub(crate) fn apply(self, product: &mut Product) {
        if !self.name.is_empty() {
            product.name = self.name;
        }

        if !self.description.is_empty() {
            product.description = self.description;
        }

        if self.price > 0.0 {
            product.price = self.price;
        }

        if self.quantity > 0 {
            product.quantity = self.quantity;
        }

        if !self.category.is_empty() {
            product.category = self.category;
        }
    }
}

/// Product listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Substring of name, description or SKU.
    pub search: String,

    /// Substring of the category.
    pub category: String,
}

/// Product listing request, before page clamping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub page: i64,
    pub limit: i64,
    pub filter: ProductFilter,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        let now = Timestamp::now();

        Product {
            uuid: ProductUuid::new(),
            name: "Hammer".to_string(),
            description: "Claw hammer".to_string(),
            price: 12.5,
            quantity: 4,
            category: "tools".to_string(),
            sku: "HAM-1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_update_changes_nothing() {
        let original = product();
        let mut updated = original.clone();

        ProductUpdate::default().apply(&mut updated);

        assert_eq!(updated, original);
    }

    #[test]
    fn populated_fields_overwrite() {
        let mut updated = product();

        ProductUpdate {
            price: 20.0,
            quantity: 9,
            ..ProductUpdate::default()
        }
        .apply(&mut updated);

        assert!((updated.price - 20.0).abs() < f64::EPSILON, "price should change");
        assert_eq!(updated.quantity, 9);
        assert_eq!(updated.name, "Hammer");
        assert_eq!(updated.sku, "HAM-1");
    }

    #[test]
    fn non_positive_numbers_are_ignored() {
        let mut updated = product();

        ProductUpdate {
            price: -1.0,
            quantity: 0,
            ..ProductUpdate::default()
        }
        .apply(&mut updated);

        assert!((updated.price - 12.5).abs() < f64::EPSILON, "price should stay");
        assert_eq!(updated.quantity, 4);
    }
}
