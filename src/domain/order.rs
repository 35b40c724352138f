use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::cart::CartLine;
use super::catalog::BundleItem;
use super::customer::CustomerDetails;
use super::errors::DomainError;

pub const STATUS_PENDING: &str = "pending";

/// Payload handed to the order gateway at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSubmission {
    pub items: Vec<CartLine>,
    pub total: BigDecimal,
    /// ISO calendar date, `YYYY-MM-DD`.
    pub pickup_date: String,
    /// Time slot identifier, e.g. `08:00–12:00`.
    pub pickup_time: String,
    pub customer: CustomerDetails,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: i32,
    pub total: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Option<i32>,
    pub name: String,
    pub price: BigDecimal,
    pub quantity: BigDecimal,
    pub unit: Option<String>,
    pub weight: Option<BigDecimal>,
    pub contents: Vec<BundleItem>,
}

impl From<&CartLine> for NewOrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            price: line.price.clone(),
            quantity: line.effective_quantity(),
            unit: line.unit.clone(),
            weight: line.weight.clone(),
            contents: line.contents.clone(),
        }
    }
}

/// An order ready to be persisted together with its customer and items.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer: CustomerDetails,
    pub total: BigDecimal,
    pub pickup_date: NaiveDate,
    pub pickup_time: String,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub id: i32,
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub name: String,
    pub price: BigDecimal,
    pub quantity: BigDecimal,
    pub unit: Option<String>,
    pub weight: Option<BigDecimal>,
    pub contents: Vec<BundleItem>,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: i32,
    pub customer_id: i32,
    pub total: BigDecimal,
    pub pickup_date: NaiveDate,
    pub pickup_time: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<OrderView>,
    pub total: i64,
}

/// Rows to skip before `page` (1-based) when pages hold `limit` rows.
pub fn page_offset(page: i64, limit: i64) -> Result<i64, DomainError> {
    page.checked_sub(1)
        .and_then(|skipped| skipped.checked_mul(limit))
        .filter(|offset| *offset >= 0)
        .ok_or_else(|| DomainError::InvalidInput(format!("page {} is out of range", page)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(page_offset(1, 20).expect("offset"), 0);
        assert_eq!(page_offset(3, 20).expect("offset"), 40);
    }

    #[test]
    fn overflowing_page_is_invalid_input() {
        assert!(matches!(
            page_offset(i64::MAX, 100),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            page_offset(i64::MIN, 100),
            Err(DomainError::InvalidInput(_))
        ));
    }
}
