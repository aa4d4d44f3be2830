//! Product recommendations attached to fresh diagnoses.
//!
//! [`StaticCatalog`] returns the first `limit` products of its list and
//! ignores the diagnosis text. Callers that want category matching
//! implement [`ProductCatalog`] themselves.

use crate::types::Product;

/// Default number of products recommended per diagnosis.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 3;

/// Source of product recommendations for a diagnosis.
pub trait ProductCatalog: Send + Sync {
    fn recommended_products(&self, diagnosis: &str) -> Vec<Product>;
}

/// Fixed product list, sliced to `limit`.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    products: Vec<Product>,
    limit: usize,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            limit: DEFAULT_RECOMMENDATION_LIMIT,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new(default_products())
    }
}

impl ProductCatalog for StaticCatalog {
    // TODO: filter by category once product categories are mapped to diagnoses
    fn recommended_products(&self, _diagnosis: &str) -> Vec<Product> {
        self.products.iter().take(self.limit).cloned().collect()
    }
}

/// Built-in poultry-health catalog.
pub fn default_products() -> Vec<Product> {
    vec![
        Product::new("amprolium-20", "Amprolium 20%")
            .category("anticoccidien")
            .description("Traitement et prévention de la coccidiose, dans l'eau de boisson.")
            .price(3500),
        Product::new("oxytetracycline-20", "Oxytétracycline 20%")
            .category("antibiotique")
            .description("Antibiotique à large spectre pour les infections respiratoires et digestives.")
            .price(4000),
        Product::new("vitamines-ad3e", "Vitamines AD3E")
            .category("complément")
            .description("Soutien de l'immunité et de la récupération après traitement.")
            .price(2500),
        Product::new("vaccin-newcastle-hb1", "Vaccin Newcastle HB1")
            .category("vaccin")
            .description("Vaccin vivant contre la maladie de Newcastle.")
            .price(6000),
        Product::new("virkon-s", "Virkon S")
            .category("désinfectant")
            .description("Désinfectant des bâtiments et du matériel d'élevage.")
            .price(8500),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_first_slice_regardless_of_diagnosis() {
        let catalog = StaticCatalog::default();
        let a = catalog.recommended_products("Coccidiose");
        let b = catalog.recommended_products("Maladie de Newcastle");
        assert_eq!(a.len(), DEFAULT_RECOMMENDATION_LIMIT);
        assert_eq!(a, b);
        assert_eq!(a[0].id, "amprolium-20");
    }

    #[test]
    fn limit_larger_than_list_returns_everything() {
        let catalog = StaticCatalog::new(vec![Product::new("p1", "One")]).limit(10);
        assert_eq!(catalog.recommended_products("x").len(), 1);
    }
}
