//! Persistence seams, one repository per stored entity.

use super::catalog::{Category, NewCategory, NewProduct, Product};
use super::customer::{Customer, CustomerDetails};
use super::delivery::DeliveryDayConfig;
use super::errors::DomainError;
use super::order::{ListResult, NewOrder, OrderItemView, OrderView};

pub trait CategoryRepository: Send + Sync + 'static {
    fn create(&self, category: NewCategory) -> Result<Category, DomainError>;
    fn find_all(&self) -> Result<Vec<Category>, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<Category>, DomainError>;
}

pub trait ProductRepository: Send + Sync + 'static {
    fn create(&self, product: NewProduct) -> Result<Product, DomainError>;
    fn find_all(&self) -> Result<Vec<Product>, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError>;
    fn find_by_category(&self, category_id: i32) -> Result<Vec<Product>, DomainError>;
}

pub trait CustomerRepository: Send + Sync + 'static {
    fn create(&self, details: CustomerDetails) -> Result<Customer, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<Customer>, DomainError>;
    fn find_by_email(&self, email: &str) -> Result<Option<Customer>, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Persists the order, its items and (if unknown by email) its customer
    /// atomically. Returns the new order id.
    fn create(&self, order: NewOrder) -> Result<i32, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<OrderView>, DomainError>;
    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError>;
}

/// Read side of order items.
///
/// Items are only ever created together with their order, inside the
/// transaction of [`OrderRepository::create`].
pub trait OrderItemRepository: Send + Sync + 'static {
    fn find_by_order(&self, order_id: i32) -> Result<Vec<OrderItemView>, DomainError>;
}

pub trait DeliveryHourRepository: Send + Sync + 'static {
    /// Inserts or replaces the configuration of `config.day_of_week`.
    fn upsert(&self, config: DeliveryDayConfig) -> Result<DeliveryDayConfig, DomainError>;
    /// The week configuration ordered by day of week.
    fn find_all(&self) -> Result<Vec<DeliveryDayConfig>, DomainError>;
}
