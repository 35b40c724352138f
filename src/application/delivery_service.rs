use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::delivery::{resolve_slots, DeliveryDayConfig, TimeSlot};
use crate::domain::errors::DomainError;
use crate::domain::ports::DeliveryHourRepository;

#[derive(Clone)]
pub struct DeliveryService {
    hours: Arc<dyn DeliveryHourRepository>,
}

impl DeliveryService {
    pub fn new(hours: Arc<dyn DeliveryHourRepository>) -> Self {
        Self { hours }
    }

    pub fn week(&self) -> Result<Vec<DeliveryDayConfig>, DomainError> {
        self.hours.find_all()
    }

    /// Pickup slots bookable on `date`; empty when the day is closed.
    pub fn slots_for(&self, date: NaiveDate) -> Result<Vec<TimeSlot>, DomainError> {
        let week = self.week()?;
        let slots = resolve_slots(date, &week);
        log::debug!("{} slot(s) available on {}", slots.len(), date);
        Ok(slots)
    }
}
