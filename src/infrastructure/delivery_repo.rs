use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::db::DbPool;
use crate::domain::delivery::DeliveryDayConfig;
use crate::domain::errors::DomainError;
use crate::domain::ports::DeliveryHourRepository;
use crate::schema::delivery_hours;

use super::models::{DeliveryHourRow, NewDeliveryHourRow};

pub struct DieselDeliveryHourRepository {
    pool: DbPool,
}

impl DieselDeliveryHourRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl DeliveryHourRepository for DieselDeliveryHourRepository {
    fn upsert(&self, config: DeliveryDayConfig) -> Result<DeliveryDayConfig, DomainError> {
        let day_of_week = i32::try_from(config.day_of_week)
            .ok()
            .filter(|d| (0..=6).contains(d))
            .ok_or_else(|| {
                DomainError::InvalidInput(format!("invalid day of week {}", config.day_of_week))
            })?;

        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(delivery_hours::table)
            .values(&NewDeliveryHourRow {
                day: config.day,
                day_of_week,
                is_open: config.is_open,
                morning_enabled: config.morning_enabled,
                morning_start: config.morning_start,
                morning_end: config.morning_end,
                afternoon_enabled: config.afternoon_enabled,
                afternoon_start: config.afternoon_start,
                afternoon_end: config.afternoon_end,
            })
            .on_conflict(delivery_hours::day_of_week)
            .do_update()
            .set((
                delivery_hours::day.eq(excluded(delivery_hours::day)),
                delivery_hours::is_open.eq(excluded(delivery_hours::is_open)),
                delivery_hours::morning_enabled.eq(excluded(delivery_hours::morning_enabled)),
                delivery_hours::morning_start.eq(excluded(delivery_hours::morning_start)),
                delivery_hours::morning_end.eq(excluded(delivery_hours::morning_end)),
                delivery_hours::afternoon_enabled.eq(excluded(delivery_hours::afternoon_enabled)),
                delivery_hours::afternoon_start.eq(excluded(delivery_hours::afternoon_start)),
                delivery_hours::afternoon_end.eq(excluded(delivery_hours::afternoon_end)),
            ))
            .returning(DeliveryHourRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn find_all(&self) -> Result<Vec<DeliveryDayConfig>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = delivery_hours::table
            .select(DeliveryHourRow::as_select())
            .order(delivery_hours::day_of_week.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(DeliveryDayConfig::from).collect())
    }
}
