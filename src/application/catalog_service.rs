use std::sync::Arc;

use crate::domain::catalog::{Category, Product};
use crate::domain::errors::DomainError;
use crate::domain::ports::{CategoryRepository, ProductRepository};

#[derive(Clone)]
pub struct CatalogService {
    categories: Arc<dyn CategoryRepository>,
    products: Arc<dyn ProductRepository>,
}

impl CatalogService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        products: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            categories,
            products,
        }
    }

    pub fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.categories.find_all()
    }

    pub fn get_category(&self, id: i32) -> Result<Category, DomainError> {
        self.categories.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        self.products.find_all()
    }

    /// Products of an existing category; an unknown category is `NotFound`.
    pub fn products_in_category(&self, category_id: i32) -> Result<Vec<Product>, DomainError> {
        self.get_category(category_id)?;
        self.products.find_by_category(category_id)
    }

    pub fn get_product(&self, id: i32) -> Result<Product, DomainError> {
        self.products.find_by_id(id)?.ok_or(DomainError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::catalog::{NewCategory, NewProduct};
    use crate::infrastructure::InMemoryStore;

    fn service() -> (Arc<InMemoryStore>, CatalogService) {
        let store = Arc::new(InMemoryStore::new());
        let service = CatalogService::new(store.clone(), store.clone());
        (store, service)
    }

    #[test]
    fn unknown_category_is_not_found() {
        let (_store, catalog) = service();
        assert!(matches!(catalog.get_category(1), Err(DomainError::NotFound)));
        assert!(matches!(
            catalog.products_in_category(1),
            Err(DomainError::NotFound)
        ));
    }

    #[test]
    fn products_are_filtered_by_category() {
        let (store, catalog) = service();
        let legumes = CategoryRepository::create(
            store.as_ref(),
            NewCategory {
                name: "Légumes".to_string(),
                description: None,
            },
        )
        .expect("create");
        ProductRepository::create(
            store.as_ref(),
            NewProduct {
                category_id: Some(legumes.id),
                name: "Poireaux".to_string(),
                description: None,
                price: BigDecimal::from_str("2.10").expect("valid decimal"),
                unit: Some("botte".to_string()),
                weight: None,
                image: None,
                origin: None,
                contents: Vec::new(),
            },
        )
        .expect("create");

        let products = catalog.products_in_category(legumes.id).expect("list");
        assert_eq!(products.len(), 1);
        assert_eq!(catalog.get_product(products[0].id).expect("get").name, "Poireaux");
    }
}
