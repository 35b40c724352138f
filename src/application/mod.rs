pub mod catalog_service;
pub mod delivery_service;
pub mod order_service;

pub use catalog_service::CatalogService;
pub use delivery_service::DeliveryService;
pub use order_service::OrderService;
