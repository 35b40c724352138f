use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a composite (bundle) product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleItem {
    pub name: String,
    pub quantity: Option<String>,
    pub origin: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: i32,
    pub category_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub unit: Option<String>,
    pub weight: Option<BigDecimal>,
    pub image: Option<String>,
    pub origin: Option<String>,
    pub contents: Vec<BundleItem>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn is_bundle(&self) -> bool {
        !self.contents.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub unit: Option<String>,
    pub weight: Option<BigDecimal>,
    pub image: Option<String>,
    pub origin: Option<String>,
    pub contents: Vec<BundleItem>,
}
