use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::customer::{Customer, CustomerDetails};
use crate::domain::errors::DomainError;
use crate::domain::ports::CustomerRepository;
use crate::schema::customers;

use super::models::{CustomerRow, NewCustomerRow};

impl From<&CustomerDetails> for NewCustomerRow {
    fn from(details: &CustomerDetails) -> Self {
        NewCustomerRow {
            first_name: details.first_name.clone(),
            last_name: details.last_name.clone(),
            email: details.email.clone(),
            phone: details.phone.clone(),
            address: details.address.clone(),
            postal_code: details.postal_code.clone(),
            city: details.city.clone(),
        }
    }
}

/// Looks the customer up by email and inserts them when unknown.
///
/// Runs on the caller's connection so it can join an enclosing transaction.
pub(crate) fn find_or_create_customer(
    conn: &mut PgConnection,
    details: &CustomerDetails,
) -> Result<Customer, DomainError> {
    let existing = customers::table
        .filter(customers::email.eq(&details.email))
        .select(CustomerRow::as_select())
        .first(conn)
        .optional()?;

    if let Some(row) = existing {
        return Ok(row.into());
    }

    let row = diesel::insert_into(customers::table)
        .values(&NewCustomerRow::from(details))
        .returning(CustomerRow::as_returning())
        .get_result(conn)?;
    Ok(row.into())
}

pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CustomerRepository for DieselCustomerRepository {
    fn create(&self, details: CustomerDetails) -> Result<Customer, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(customers::table)
            .values(&NewCustomerRow::from(&details))
            .returning(CustomerRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Customer>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = customers::table
            .filter(customers::id.eq(id))
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Customer::from))
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Customer>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = customers::table
            .filter(customers::email.eq(email))
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Customer::from))
    }
}

#[cfg(test)]
mod tests {
    use super::DieselCustomerRepository;
    use crate::domain::customer::CustomerDetails;
    use crate::domain::ports::CustomerRepository;
    use crate::infrastructure::test_db::setup_db;

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn create_then_find_by_id_and_email() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCustomerRepository::new(pool);

        let created = repo
            .create(CustomerDetails {
                first_name: "Paul".to_string(),
                last_name: "Durand".to_string(),
                email: "paul@example.com".to_string(),
                city: Some("Lyon".to_string()),
                ..Default::default()
            })
            .expect("create failed");

        let by_id = repo
            .find_by_id(created.id)
            .expect("find failed")
            .expect("customer should exist");
        assert_eq!(by_id.email, "paul@example.com");
        assert_eq!(by_id.city.as_deref(), Some("Lyon"));

        assert!(repo.find_by_email("paul@example.com").expect("find").is_some());
        assert!(repo.find_by_email("nobody@example.com").expect("find").is_none());
    }
}
