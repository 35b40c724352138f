use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::cart::{format_decimal, order_total, CartLine};
use crate::domain::catalog::BundleItem;
use crate::domain::customer::CustomerDetails;
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderItemView, OrderSubmission, OrderView};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct BundleItemRequest {
    pub name: String,
    pub quantity: Option<String>,
    pub origin: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    pub product_id: Option<i32>,
    pub name: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    /// Decimal quantity; defaults to 1
    pub quantity: Option<String>,
    pub unit: Option<String>,
    pub weight: Option<String>,
    #[serde(default)]
    pub contents: Vec<BundleItemRequest>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CustomerRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
    /// Total computed by the client; the server recomputes it
    pub total: Option<String>,
    /// Pickup date, `YYYY-MM-DD`
    #[serde(default)]
    pub pickup_date: String,
    /// Slot label as returned by `/delivery-slots`, e.g. "08:00–12:00"
    #[serde(default)]
    pub pickup_time: String,
    pub customer: CustomerRequest,
    /// Bot-verification token
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub id: i32,
    pub total: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: i32,
    pub product_id: Option<i32>,
    pub name: String,
    pub price: String,
    pub quantity: String,
    pub unit: Option<String>,
    pub weight: Option<String>,
    pub quantity_label: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub customer_id: i32,
    pub total: String,
    pub pickup_date: String,
    pub pickup_time: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Conversions ──────────────────────────────────────────────────────────────

fn parse_decimal(field: &str, value: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(value.trim())
        .map_err(|e| AppError::BadRequest(format!("Invalid {} '{}': {}", field, value, e)))
}

fn parse_optional_decimal(field: &str, value: Option<&str>) -> Result<Option<BigDecimal>, AppError> {
    value.map(|v| parse_decimal(field, v)).transpose()
}

impl TryFrom<OrderItemRequest> for CartLine {
    type Error = AppError;

    fn try_from(item: OrderItemRequest) -> Result<Self, Self::Error> {
        Ok(CartLine {
            product_id: item.product_id,
            price: parse_decimal("price", &item.price)?,
            quantity: parse_optional_decimal("quantity", item.quantity.as_deref())?,
            weight: parse_optional_decimal("weight", item.weight.as_deref())?,
            name: item.name,
            unit: item.unit,
            contents: item
                .contents
                .into_iter()
                .map(|c| BundleItem {
                    name: c.name,
                    quantity: c.quantity,
                    origin: c.origin,
                })
                .collect(),
            image: item.image,
        })
    }
}

impl TryFrom<CreateOrderRequest> for OrderSubmission {
    type Error = AppError;

    fn try_from(body: CreateOrderRequest) -> Result<Self, Self::Error> {
        let items = body
            .items
            .into_iter()
            .map(CartLine::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let total = match body.total.as_deref() {
            Some(raw) => parse_decimal("total", raw)?,
            None => order_total(&items),
        };
        let c = body.customer;

        Ok(OrderSubmission {
            items,
            total,
            pickup_date: body.pickup_date,
            pickup_time: body.pickup_time,
            customer: CustomerDetails {
                first_name: c.first_name,
                last_name: c.last_name,
                email: c.email,
                phone: c.phone,
                address: c.address,
                postal_code: c.postal_code,
                city: c.city,
                notes: c.notes,
            },
            token: body.token,
        })
    }
}

impl From<OrderItemView> for OrderItemResponse {
    fn from(item: OrderItemView) -> Self {
        let quantity_label = CartLine {
            product_id: item.product_id,
            name: item.name.clone(),
            price: item.price.clone(),
            quantity: Some(item.quantity.clone()),
            weight: item.weight.clone(),
            unit: item.unit.clone(),
            contents: item.contents,
            image: None,
        }
        .quantity_label();

        Self {
            id: item.id,
            product_id: item.product_id,
            name: item.name,
            price: item.price.to_string(),
            quantity: format_decimal(&item.quantity),
            unit: item.unit,
            weight: item.weight.as_ref().map(format_decimal),
            quantity_label,
        }
    }
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        Self {
            id: o.id,
            customer_id: o.customer_id,
            total: o.total.to_string(),
            pickup_date: o.pickup_date.format("%Y-%m-%d").to_string(),
            pickup_time: o.pickup_time,
            status: o.status,
            notes: o.notes,
            created_at: o.created_at.to_rfc3339(),
            items: o.items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Validates the checkout submission and creates the order, its items and,
/// when unknown, its customer inside a single database transaction.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = CreateOrderResponse),
        (status = 400, description = "Incomplete or invalid submission"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let submission = OrderSubmission::try_from(body.into_inner())?;

    let receipt = web::block(move || state.orders.place_order(submission)).await??;

    Ok(HttpResponse::Created().json(CreateOrderResponse {
        id: receipt.order_id,
        total: receipt.total.to_string(),
    }))
}

/// GET /orders/{id}
///
/// Returns the order together with its items.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let result = web::block(move || state.orders.get_order(order_id)).await??;

    match result {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound),
    }
}

/// GET /orders/{id}/items
#[utoipa::path(
    get,
    path = "/orders/{id}/items",
    params(
        ("id" = i32, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Items of the order", body = Vec<OrderItemResponse>),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn list_order_items(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let items = web::block(move || -> Result<Option<Vec<OrderItemView>>, DomainError> {
        if state.orders.get_order(order_id)?.is_none() {
            return Ok(None);
        }
        state.orders.order_items(order_id).map(Some)
    })
    .await??;

    let Some(items) = items else {
        return Err(AppError::NotFound);
    };
    let body: Vec<OrderItemResponse> = items.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /orders
///
/// Returns a paginated list of orders (without their items).
/// Use `page` (1-based) and `limit` to control pagination.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let result = web::block(move || state.orders.list_orders(page, limit)).await??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(OrderResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}
