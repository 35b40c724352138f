use utoipa::OpenApi;

use crate::handlers::{catalog, delivery, orders};

#[derive(OpenApi)]
#[openapi(
    info(title = "Storefront API", description = "Catalog, pickup slots and checkout"),
    paths(
        catalog::list_categories,
        catalog::get_category,
        catalog::list_category_products,
        catalog::list_products,
        catalog::get_product,
        delivery::list_delivery_hours,
        delivery::list_delivery_slots,
        orders::create_order,
        orders::get_order,
        orders::list_order_items,
        orders::list_orders,
    ),
    components(schemas(
        catalog::CategoryResponse,
        catalog::ProductResponse,
        catalog::BundleItemResponse,
        delivery::DeliveryDayResponse,
        delivery::TimeSlotResponse,
        delivery::SlotsResponse,
        orders::CreateOrderRequest,
        orders::OrderItemRequest,
        orders::BundleItemRequest,
        orders::CustomerRequest,
        orders::CreateOrderResponse,
        orders::OrderResponse,
        orders::OrderItemResponse,
        orders::ListOrdersResponse,
    )),
    tags(
        (name = "catalog", description = "Categories and products"),
        (name = "delivery", description = "Weekly pickup hours and bookable slots"),
        (name = "orders", description = "Checkout and order lookup"),
    )
)]
pub struct ApiDoc;
