//! Process-local implementation of every repository, backed by a mutex.
//!
//! Used by the HTTP tests and handy for running the storefront without a
//! database.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::domain::catalog::{Category, NewCategory, NewProduct, Product};
use crate::domain::customer::{Customer, CustomerDetails};
use crate::domain::delivery::DeliveryDayConfig;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    page_offset, ListResult, NewOrder, OrderItemView, OrderView, STATUS_PENDING,
};
use crate::domain::ports::{
    CategoryRepository, CustomerRepository, DeliveryHourRepository, OrderItemRepository,
    OrderRepository, ProductRepository,
};

#[derive(Debug, Default)]
struct Tables {
    last_id: i32,
    categories: Vec<Category>,
    products: Vec<Product>,
    customers: Vec<Customer>,
    orders: Vec<OrderView>,
    delivery_hours: Vec<DeliveryDayConfig>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn insert_customer(&mut self, details: &CustomerDetails) -> Customer {
        let customer = Customer {
            id: self.next_id(),
            first_name: details.first_name.clone(),
            last_name: details.last_name.clone(),
            email: details.email.clone(),
            phone: details.phone.clone(),
            address: details.address.clone(),
            postal_code: details.postal_code.clone(),
            city: details.city.clone(),
            created_at: Utc::now(),
        };
        self.customers.push(customer.clone());
        customer
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with a delivery week.
    pub fn with_delivery_hours(week: Vec<DeliveryDayConfig>) -> Self {
        let store = Self::default();
        if let Ok(mut tables) = store.tables.lock() {
            tables.delivery_hours = week;
        }
        store
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, DomainError> {
        self.tables
            .lock()
            .map_err(|_| DomainError::Internal("in-memory store poisoned".to_string()))
    }
}

impl CategoryRepository for InMemoryStore {
    fn create(&self, category: NewCategory) -> Result<Category, DomainError> {
        let mut tables = self.lock()?;
        let created = Category {
            id: tables.next_id(),
            name: category.name,
            description: category.description,
            created_at: Utc::now(),
        };
        tables.categories.push(created.clone());
        Ok(created)
    }

    fn find_all(&self) -> Result<Vec<Category>, DomainError> {
        let mut all = self.lock()?.categories.clone();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Category>, DomainError> {
        Ok(self.lock()?.categories.iter().find(|c| c.id == id).cloned())
    }
}

impl ProductRepository for InMemoryStore {
    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut tables = self.lock()?;
        let created = Product {
            id: tables.next_id(),
            category_id: product.category_id,
            name: product.name,
            description: product.description,
            price: product.price,
            unit: product.unit,
            weight: product.weight,
            image: product.image,
            origin: product.origin,
            contents: product.contents,
            created_at: Utc::now(),
        };
        tables.products.push(created.clone());
        Ok(created)
    }

    fn find_all(&self) -> Result<Vec<Product>, DomainError> {
        let mut all = self.lock()?.products.clone();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError> {
        Ok(self.lock()?.products.iter().find(|p| p.id == id).cloned())
    }

    fn find_by_category(&self, category_id: i32) -> Result<Vec<Product>, DomainError> {
        let mut matching: Vec<Product> = self
            .lock()?
            .products
            .iter()
            .filter(|p| p.category_id == Some(category_id))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matching)
    }
}

impl CustomerRepository for InMemoryStore {
    fn create(&self, details: CustomerDetails) -> Result<Customer, DomainError> {
        let mut tables = self.lock()?;
        if tables.customers.iter().any(|c| c.email == details.email) {
            return Err(DomainError::InvalidInput(format!(
                "customer {} already exists",
                details.email
            )));
        }
        Ok(tables.insert_customer(&details))
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Customer>, DomainError> {
        Ok(self.lock()?.customers.iter().find(|c| c.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Customer>, DomainError> {
        Ok(self
            .lock()?
            .customers
            .iter()
            .find(|c| c.email == email)
            .cloned())
    }
}

impl OrderRepository for InMemoryStore {
    fn create(&self, order: NewOrder) -> Result<i32, DomainError> {
        let mut tables = self.lock()?;

        let existing = tables
            .customers
            .iter()
            .find(|c| c.email == order.customer.email)
            .map(|c| c.id);
        let customer_id = match existing {
            Some(id) => id,
            None => tables.insert_customer(&order.customer).id,
        };

        let order_id = tables.next_id();
        let mut items = Vec::with_capacity(order.items.len());
        for item in order.items {
            items.push(OrderItemView {
                id: tables.next_id(),
                order_id,
                product_id: item.product_id,
                name: item.name,
                price: item.price,
                quantity: item.quantity,
                unit: item.unit,
                weight: item.weight,
                contents: item.contents,
            });
        }

        tables.orders.push(OrderView {
            id: order_id,
            customer_id,
            total: order.total,
            pickup_date: order.pickup_date,
            pickup_time: order.pickup_time,
            status: STATUS_PENDING.to_string(),
            notes: order.customer.notes,
            created_at: Utc::now(),
            items,
        });
        Ok(order_id)
    }

    fn find_by_id(&self, id: i32) -> Result<Option<OrderView>, DomainError> {
        Ok(self.lock()?.orders.iter().find(|o| o.id == id).cloned())
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let offset = usize::try_from(page_offset(page, limit)?).unwrap_or(usize::MAX);
        let tables = self.lock()?;
        let limit = usize::try_from(limit).unwrap_or(0);

        let items = tables
            .orders
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .map(|o| OrderView {
                items: Vec::new(),
                ..o.clone()
            })
            .collect();

        Ok(ListResult {
            items,
            total: tables.orders.len() as i64,
        })
    }
}

impl OrderItemRepository for InMemoryStore {
    fn find_by_order(&self, order_id: i32) -> Result<Vec<OrderItemView>, DomainError> {
        Ok(self
            .lock()?
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .map(|o| o.items.clone())
            .unwrap_or_default())
    }
}

impl DeliveryHourRepository for InMemoryStore {
    fn upsert(&self, config: DeliveryDayConfig) -> Result<DeliveryDayConfig, DomainError> {
        if config.day_of_week > 6 {
            return Err(DomainError::InvalidInput(format!(
                "invalid day of week {}",
                config.day_of_week
            )));
        }
        let mut tables = self.lock()?;
        tables
            .delivery_hours
            .retain(|d| d.day_of_week != config.day_of_week);
        tables.delivery_hours.push(config.clone());
        tables.delivery_hours.sort_by_key(|d| d.day_of_week);
        Ok(config)
    }

    fn find_all(&self) -> Result<Vec<DeliveryDayConfig>, DomainError> {
        Ok(self.lock()?.delivery_hours.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::order::NewOrderItem;

    fn order_for(email: &str) -> NewOrder {
        NewOrder {
            customer: CustomerDetails {
                first_name: "Jeanne".to_string(),
                last_name: "Martin".to_string(),
                email: email.to_string(),
                ..Default::default()
            },
            total: BigDecimal::from_str("4.00").expect("valid decimal"),
            pickup_date: NaiveDate::from_ymd_opt(2024, 6, 4).expect("valid date"),
            pickup_time: "08:00–12:00".to_string(),
            items: vec![NewOrderItem {
                product_id: None,
                name: "Miel".to_string(),
                price: BigDecimal::from_str("4.00").expect("valid decimal"),
                quantity: BigDecimal::from(1),
                unit: None,
                weight: None,
                contents: Vec::new(),
            }],
        }
    }

    #[test]
    fn orders_reuse_customer_by_email() {
        let store = InMemoryStore::new();
        let a = OrderRepository::create(&store, order_for("a@example.com")).expect("create");
        let b = OrderRepository::create(&store, order_for("a@example.com")).expect("create");

        let a = OrderRepository::find_by_id(&store, a).expect("find").expect("exists");
        let b = OrderRepository::find_by_id(&store, b).expect("find").expect("exists");
        assert_eq!(a.customer_id, b.customer_id);
    }

    #[test]
    fn items_are_created_with_their_order() {
        let store = InMemoryStore::new();
        let id = OrderRepository::create(&store, order_for("a@example.com")).expect("create");

        let items = store.find_by_order(id).expect("items");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].order_id, id);
        assert!(store.find_by_order(id + 100).expect("items").is_empty());
    }

    #[test]
    fn list_is_newest_first_and_paginated() {
        let store = InMemoryStore::new();
        let ids: Vec<i32> = (0..5)
            .map(|i| {
                OrderRepository::create(&store, order_for(&format!("{}@example.com", i)))
                    .expect("create")
            })
            .collect();

        let page1 = store.list(1, 3).expect("list");
        assert_eq!(page1.total, 5);
        assert_eq!(page1.items[0].id, ids[4]);
        assert!(page1.items.iter().all(|o| o.items.is_empty()));

        let page2 = store.list(2, 3).expect("list");
        assert_eq!(page2.items.len(), 2);
    }

    #[test]
    fn upsert_replaces_day() {
        let store = InMemoryStore::new();
        store
            .upsert(DeliveryDayConfig::closed("Mardi", 2))
            .expect("upsert");
        store
            .upsert(DeliveryDayConfig::closed("Mardi", 2).with_morning("08:00", "12:00"))
            .expect("upsert");
        store
            .upsert(DeliveryDayConfig::closed("Lundi", 1))
            .expect("upsert");

        let week = DeliveryHourRepository::find_all(&store).expect("find");
        assert_eq!(week.len(), 2);
        assert_eq!(week[0].day_of_week, 1);
        assert!(week[1].is_open);
    }
}
