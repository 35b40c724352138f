use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

use crate::domain::catalog::{BundleItem, Category, Product};
use crate::domain::customer::Customer;
use crate::domain::delivery::DeliveryDayConfig;
use crate::domain::order::OrderItemView;
use crate::schema::{categories, customers, delivery_hours, order_items, orders, products};

/// Composite contents are stored as a JSON array; anything else reads as empty.
pub(crate) fn contents_from_json(value: Option<Value>) -> Vec<BundleItem> {
    value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

pub(crate) fn contents_to_json(items: &[BundleItem]) -> Option<Value> {
    if items.is_empty() {
        return None;
    }
    serde_json::to_value(items).ok()
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = categories)]
pub struct NewCategoryRow {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = products)]
#[diesel(belongs_to(CategoryRow, foreign_key = category_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i32,
    pub category_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub unit: Option<String>,
    pub weight: Option<BigDecimal>,
    pub image: Option<String>,
    pub origin: Option<String>,
    pub contents: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            category_id: row.category_id,
            name: row.name,
            description: row.description,
            price: row.price,
            unit: row.unit,
            weight: row.weight,
            image: row.image,
            origin: row.origin,
            contents: contents_from_json(row.contents),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub category_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub unit: Option<String>,
    pub weight: Option<BigDecimal>,
    pub image: Option<String>,
    pub origin: Option<String>,
    pub contents: Option<Value>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomerRow {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            postal_code: row.postal_code,
            city: row.city,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = customers)]
pub struct NewCustomerRow {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = orders)]
#[diesel(belongs_to(CustomerRow, foreign_key = customer_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i32,
    pub customer_id: i32,
    pub total: BigDecimal,
    pub pickup_date: NaiveDate,
    pub pickup_time: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub customer_id: i32,
    pub total: BigDecimal,
    pub pickup_date: NaiveDate,
    pub pickup_time: String,
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: i32,
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub name: String,
    pub price: BigDecimal,
    pub quantity: BigDecimal,
    pub unit: Option<String>,
    pub weight: Option<BigDecimal>,
    pub contents: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl From<OrderItemRow> for OrderItemView {
    fn from(row: OrderItemRow) -> Self {
        OrderItemView {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            name: row.name,
            price: row.price,
            quantity: row.quantity,
            unit: row.unit,
            weight: row.weight,
            contents: contents_from_json(row.contents),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub name: String,
    pub price: BigDecimal,
    pub quantity: BigDecimal,
    pub unit: Option<String>,
    pub weight: Option<BigDecimal>,
    pub contents: Option<Value>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = delivery_hours)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DeliveryHourRow {
    pub id: i32,
    pub day: String,
    pub day_of_week: i32,
    pub is_open: bool,
    pub morning_enabled: bool,
    pub morning_start: Option<String>,
    pub morning_end: Option<String>,
    pub afternoon_enabled: bool,
    pub afternoon_start: Option<String>,
    pub afternoon_end: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DeliveryHourRow> for DeliveryDayConfig {
    fn from(row: DeliveryHourRow) -> Self {
        DeliveryDayConfig {
            day: row.day,
            // Guarded by the `day_of_week BETWEEN 0 AND 6` check constraint.
            day_of_week: row.day_of_week.unsigned_abs(),
            is_open: row.is_open,
            morning_enabled: row.morning_enabled,
            morning_start: row.morning_start,
            morning_end: row.morning_end,
            afternoon_enabled: row.afternoon_enabled,
            afternoon_start: row.afternoon_start,
            afternoon_end: row.afternoon_end,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = delivery_hours)]
pub struct NewDeliveryHourRow {
    pub day: String,
    pub day_of_week: i32,
    pub is_open: bool,
    pub morning_enabled: bool,
    pub morning_start: Option<String>,
    pub morning_end: Option<String>,
    pub afternoon_enabled: bool,
    pub afternoon_start: Option<String>,
    pub afternoon_end: Option<String>,
}
