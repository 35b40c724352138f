use std::sync::Arc;

use crate::application::{CatalogService, DeliveryService, OrderService};
use crate::db::DbPool;
use crate::infrastructure::{
    DieselCategoryRepository, DieselDeliveryHourRepository, DieselOrderRepository,
    DieselProductRepository, InMemoryStore,
};

/// Services shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub delivery: DeliveryService,
    pub orders: OrderService,
}

impl AppState {
    pub fn from_pool(pool: DbPool) -> Self {
        let orders = Arc::new(DieselOrderRepository::new(pool.clone()));
        let delivery = DeliveryService::new(Arc::new(DieselDeliveryHourRepository::new(
            pool.clone(),
        )));

        Self {
            catalog: CatalogService::new(
                Arc::new(DieselCategoryRepository::new(pool.clone())),
                Arc::new(DieselProductRepository::new(pool)),
            ),
            orders: OrderService::new(orders.clone(), orders, delivery.clone()),
            delivery,
        }
    }

    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        let delivery = DeliveryService::new(store.clone());

        Self {
            catalog: CatalogService::new(store.clone(), store.clone()),
            orders: OrderService::new(store.clone(), store, delivery.clone()),
            delivery,
        }
    }
}
