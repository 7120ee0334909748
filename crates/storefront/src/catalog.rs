//! Static product catalog.
//!
//! Rosewood sells a single tee; the catalog is compiled in rather than
//! fetched. Orders snapshot product data at placement time, so later catalog
//! edits never alter historical orders.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rosewood_core::ProductId;

/// A sellable size option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeOption {
    pub label: String,
    pub value: String,
    pub available: bool,
}

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in whole currency units.
    pub price: Decimal,
    pub description: String,
    pub image_url: String,
    pub sizes: Vec<SizeOption>,
}

/// The store catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build the default single-product catalog.
    #[must_use]
    pub fn rosewood() -> Self {
        let sizes = ["XS", "S", "M", "L", "XL"]
            .iter()
            .map(|label| SizeOption {
                label: (*label).to_string(),
                value: label.to_lowercase(),
                available: true,
            })
            .collect();

        Self {
            products: vec![Product {
                id: ProductId::from("rosewood-love"),
                name: "'ROSEWOOD LOVE' T-shirt".to_string(),
                price: Decimal::from(3500),
                description: "100% cotton, 250 gsm, screen print, oversized fit.".to_string(),
                image_url: "/static/rosewood-love-front.png".to_string(),
                sizes,
            }],
        }
    }

    /// Build a catalog from explicit products (used by tests).
    #[must_use]
    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// All products.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_the_tee() {
        let catalog = Catalog::rosewood();
        let product = catalog
            .by_id(&ProductId::from("rosewood-love"))
            .expect("tee present");
        assert_eq!(product.price, Decimal::from(3500));
        assert_eq!(product.sizes.len(), 5);
    }

    #[test]
    fn test_unknown_product_is_none() {
        let catalog = Catalog::rosewood();
        assert!(catalog.by_id(&ProductId::from("hoodie")).is_none());
    }
}
