use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    page_offset, ListResult, NewOrder, OrderItemView, OrderView, STATUS_PENDING,
};
use crate::domain::ports::{OrderItemRepository, OrderRepository};
use crate::schema::{order_items, orders};

use super::customer_repo::find_or_create_customer;
use super::models::{contents_to_json, NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_view(order: OrderRow, items: Vec<OrderItemRow>) -> OrderView {
    OrderView {
        id: order.id,
        customer_id: order.customer_id,
        total: order.total,
        pickup_date: order.pickup_date,
        pickup_time: order.pickup_time,
        status: order.status,
        notes: order.notes,
        created_at: order.created_at,
        items: items.into_iter().map(OrderItemView::from).collect(),
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrder) -> Result<i32, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Reuse the customer by email or register them
            let customer = find_or_create_customer(conn, &order.customer)?;

            // 2. Insert the order
            let order_id: i32 = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    customer_id: customer.id,
                    total: order.total.clone(),
                    pickup_date: order.pickup_date,
                    pickup_time: order.pickup_time.clone(),
                    status: STATUS_PENDING.to_string(),
                    notes: order.customer.notes.clone(),
                })
                .returning(orders::id)
                .get_result(conn)?;

            // 3. Insert its items
            let new_items: Vec<NewOrderItemRow> = order
                .items
                .iter()
                .map(|item| NewOrderItemRow {
                    order_id,
                    product_id: item.product_id,
                    name: item.name.clone(),
                    price: item.price.clone(),
                    quantity: item.quantity.clone(),
                    unit: item.unit.clone(),
                    weight: item.weight.clone(),
                    contents: contents_to_json(&item.contents),
                })
                .collect();
            diesel::insert_into(order_items::table)
                .values(&new_items)
                .execute(conn)?;

            Ok(order_id)
        })
    }

    fn find_by_id(&self, id: i32) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = OrderItemRow::belonging_to(&order)
            .select(OrderItemRow::as_select())
            .order(order_items::id.asc())
            .load(&mut conn)?;

        Ok(Some(to_view(order, items)))
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let offset = page_offset(page, limit)?;
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders::table.count().get_result(conn)?;

            let rows = orders::table
                .select(OrderRow::as_select())
                .order((orders::created_at.desc(), orders::id.desc()))
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(ListResult {
                items: rows
                    .into_iter()
                    .map(|o| to_view(o, Vec::new()))
                    .collect(),
                total,
            })
        })
    }
}

impl OrderItemRepository for DieselOrderRepository {
    fn find_by_order(&self, order_id: i32) -> Result<Vec<OrderItemView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = order_items::table
            .filter(order_items::order_id.eq(order_id))
            .select(OrderItemRow::as_select())
            .order(order_items::id.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(OrderItemView::from).collect())
    }
}
