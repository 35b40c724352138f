use std::sync::Arc;

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::NaiveDate;

use crate::domain::cart::order_total;
use crate::domain::checkout::{GatewayError, OrderGateway};
use crate::domain::delivery::TimeSlot;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    ListResult, NewOrder, NewOrderItem, OrderItemView, OrderReceipt, OrderSubmission, OrderView,
};
use crate::domain::ports::{OrderItemRepository, OrderRepository};

use super::delivery_service::DeliveryService;

/// Bounds of a `NUMERIC(precision, scale)` column.
struct DecimalColumn {
    scale: i64,
    integer_digits: u32,
}

/// `orders.total` and `order_items.price`
const MONEY: DecimalColumn = DecimalColumn {
    scale: 2,
    integer_digits: 8,
};

/// `order_items.quantity` and `order_items.weight`
const MEASURE: DecimalColumn = DecimalColumn {
    scale: 3,
    integer_digits: 7,
};

impl DecimalColumn {
    fn holds(&self, value: &BigDecimal) -> bool {
        let (_, scale) = value.normalized().as_bigint_and_exponent();
        scale <= self.scale && value.abs() < BigDecimal::from(10_i64.pow(self.integer_digits))
    }

    fn check(&self, field: &str, line: &str, value: &BigDecimal) -> Result<(), DomainError> {
        if self.holds(value) {
            return Ok(());
        }
        Err(DomainError::InvalidInput(format!(
            "{} of '{}' must have at most {} decimals and {} integer digits, got {}",
            field, line, self.scale, self.integer_digits, value
        )))
    }
}

#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    items: Arc<dyn OrderItemRepository>,
    delivery: DeliveryService,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        items: Arc<dyn OrderItemRepository>,
        delivery: DeliveryService,
    ) -> Self {
        Self {
            orders,
            items,
            delivery,
        }
    }

    /// Validates a checkout submission and persists it.
    ///
    /// The total is recomputed from the items and rounded to the cent; the
    /// pickup slot must be one the delivery configuration offers on the
    /// pickup date.
    pub fn place_order(&self, submission: OrderSubmission) -> Result<OrderReceipt, DomainError> {
        validate_submission(&submission)?;

        let pickup_date = NaiveDate::parse_from_str(&submission.pickup_date, "%Y-%m-%d")
            .map_err(|_| {
                DomainError::InvalidInput(format!(
                    "invalid pickup date '{}'",
                    submission.pickup_date
                ))
            })?;
        let slot: TimeSlot = submission.pickup_time.parse()?;
        if !self.delivery.slots_for(pickup_date)?.contains(&slot) {
            return Err(DomainError::InvalidInput(format!(
                "time slot {} is not available on {}",
                slot, pickup_date
            )));
        }

        let total =
            order_total(&submission.items).with_scale_round(MONEY.scale, RoundingMode::HalfUp);
        if !MONEY.holds(&total) {
            return Err(DomainError::InvalidInput(format!(
                "order total {} is too large",
                total
            )));
        }
        if total != submission.total {
            log::warn!(
                "Submitted total {} differs from computed total {}, using the latter",
                submission.total,
                total
            );
        }

        let mut customer = submission.customer;
        customer.email = customer.email.trim().to_lowercase();

        let order_id = self.orders.create(NewOrder {
            customer,
            total: total.clone(),
            pickup_date,
            pickup_time: slot.label(),
            items: submission.items.iter().map(NewOrderItem::from).collect(),
        })?;

        log::info!(
            "Order {} created for pickup on {} {} (total {})",
            order_id,
            pickup_date,
            slot,
            total
        );
        Ok(OrderReceipt { order_id, total })
    }

    pub fn get_order(&self, id: i32) -> Result<Option<OrderView>, DomainError> {
        self.orders.find_by_id(id)
    }

    pub fn order_items(&self, order_id: i32) -> Result<Vec<OrderItemView>, DomainError> {
        self.items.find_by_order(order_id)
    }

    pub fn list_orders(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        self.orders.list(page, limit)
    }
}

fn validate_submission(submission: &OrderSubmission) -> Result<(), DomainError> {
    if submission.items.is_empty() {
        return Err(DomainError::InvalidInput("order has no items".to_string()));
    }
    if submission.token.trim().is_empty() {
        return Err(DomainError::InvalidInput(
            "verification token is missing".to_string(),
        ));
    }

    let missing = submission.customer.missing_fields();
    if !missing.is_empty() {
        return Err(DomainError::InvalidInput(format!(
            "missing customer fields: {}",
            missing.join(", ")
        )));
    }

    let zero = BigDecimal::from(0);
    for item in &submission.items {
        if item.price < zero {
            return Err(DomainError::InvalidInput(format!(
                "price of '{}' must not be negative",
                item.name
            )));
        }
        if item.effective_quantity() <= zero {
            return Err(DomainError::InvalidInput(format!(
                "quantity of '{}' must be positive",
                item.name
            )));
        }
        MONEY.check("price", &item.name, &item.price)?;
        MEASURE.check("quantity", &item.name, &item.effective_quantity())?;
        if let Some(weight) = &item.weight {
            MEASURE.check("weight", &item.name, weight)?;
        }
    }
    Ok(())
}

impl OrderGateway for OrderService {
    fn create_order(&self, submission: &OrderSubmission) -> Result<OrderReceipt, GatewayError> {
        self.place_order(submission.clone()).map_err(|e| match e {
            DomainError::InvalidInput(msg) => GatewayError::new(msg),
            DomainError::NotFound | DomainError::Internal(_) => {
                log::error!("Order creation failed: {}", e);
                GatewayError::unexplained()
            }
        })
    }
}
