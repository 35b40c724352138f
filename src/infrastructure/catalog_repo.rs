use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::catalog::{Category, NewCategory, NewProduct, Product};
use crate::domain::errors::DomainError;
use crate::domain::ports::{CategoryRepository, ProductRepository};
use crate::schema::{categories, products};

use super::models::{contents_to_json, CategoryRow, NewCategoryRow, NewProductRow, ProductRow};

pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CategoryRepository for DieselCategoryRepository {
    fn create(&self, category: NewCategory) -> Result<Category, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(categories::table)
            .values(&NewCategoryRow {
                name: category.name,
                description: category.description,
            })
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn find_all(&self) -> Result<Vec<Category>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = categories::table
            .select(CategoryRow::as_select())
            .order(categories::name.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Category>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = categories::table
            .filter(categories::id.eq(id))
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Category::from))
    }
}

pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductRepository for DieselProductRepository {
    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(products::table)
            .values(&NewProductRow {
                category_id: product.category_id,
                name: product.name,
                description: product.description,
                price: product.price,
                unit: product.unit,
                weight: product.weight,
                image: product.image,
                origin: product.origin,
                contents: contents_to_json(&product.contents),
            })
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn find_all(&self) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = products::table
            .select(ProductRow::as_select())
            .order(products::name.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = products::table
            .filter(products::id.eq(id))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Product::from))
    }

    fn find_by_category(&self, category_id: i32) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = products::table
            .filter(products::category_id.eq(category_id))
            .select(ProductRow::as_select())
            .order(products::name.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::{DieselCategoryRepository, DieselProductRepository};
    use crate::domain::catalog::{BundleItem, NewCategory, NewProduct};
    use crate::domain::ports::{CategoryRepository, ProductRepository};
    use crate::infrastructure::test_db::setup_db;

    fn product(category_id: Option<i32>, name: &str) -> NewProduct {
        NewProduct {
            category_id,
            name: name.to_string(),
            description: None,
            price: BigDecimal::from_str("3.20").expect("valid decimal"),
            unit: Some("kg".to_string()),
            weight: None,
            image: None,
            origin: Some("France".to_string()),
            contents: Vec::new(),
        }
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn products_are_found_by_category() {
        let (_container, pool) = setup_db().await;
        let categories = DieselCategoryRepository::new(pool.clone());
        let products = DieselProductRepository::new(pool);

        let fruits = categories
            .create(NewCategory {
                name: "Fruits".to_string(),
                description: None,
            })
            .expect("create category");
        products.create(product(Some(fruits.id), "Pommes")).expect("create");
        products.create(product(None, "Miel")).expect("create");

        let in_fruits = products.find_by_category(fruits.id).expect("find");
        assert_eq!(in_fruits.len(), 1);
        assert_eq!(in_fruits[0].name, "Pommes");
        assert_eq!(products.find_all().expect("find all").len(), 2);
        assert_eq!(categories.find_all().expect("find all").len(), 1);
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn bundle_contents_are_persisted() {
        let (_container, pool) = setup_db().await;
        let products = DieselProductRepository::new(pool);

        let mut bundle = product(None, "Panier de saison");
        bundle.contents = vec![BundleItem {
            name: "Poireaux".to_string(),
            quantity: Some("3".to_string()),
            origin: None,
        }];
        let created = products.create(bundle).expect("create");

        let found = products
            .find_by_id(created.id)
            .expect("find")
            .expect("product should exist");
        assert!(found.is_bundle());
        assert_eq!(found.contents[0].name, "Poireaux");
        assert!(products.find_by_id(created.id + 100).expect("find").is_none());
    }
}
