pub mod catalog_repo;
pub mod customer_repo;
pub mod delivery_repo;
pub mod memory;
pub mod models;
pub mod order_repo;

#[cfg(test)]
pub(crate) mod test_db;

pub use catalog_repo::{DieselCategoryRepository, DieselProductRepository};
pub use customer_repo::DieselCustomerRepository;
pub use delivery_repo::DieselDeliveryHourRepository;
pub use memory::InMemoryStore;
pub use order_repo::DieselOrderRepository;
