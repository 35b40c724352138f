use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::delivery::{DeliveryDayConfig, TimeSlot};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct SlotsQuery {
    /// Pickup date, `YYYY-MM-DD`
    pub date: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeliveryDayResponse {
    pub day: String,
    /// 0 = Sunday … 6 = Saturday
    pub day_of_week: u32,
    pub is_open: bool,
    pub morning_enabled: bool,
    pub morning_start: Option<String>,
    pub morning_end: Option<String>,
    pub afternoon_enabled: bool,
    pub afternoon_start: Option<String>,
    pub afternoon_end: Option<String>,
}

impl From<DeliveryDayConfig> for DeliveryDayResponse {
    fn from(d: DeliveryDayConfig) -> Self {
        Self {
            day: d.day,
            day_of_week: d.day_of_week,
            is_open: d.is_open,
            morning_enabled: d.morning_enabled,
            morning_start: d.morning_start,
            morning_end: d.morning_end,
            afternoon_enabled: d.afternoon_enabled,
            afternoon_start: d.afternoon_start,
            afternoon_end: d.afternoon_end,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TimeSlotResponse {
    pub start: String,
    pub end: String,
    /// Identifier to send back as `pickup_time`, e.g. "08:00–12:00"
    pub label: String,
}

impl From<TimeSlot> for TimeSlotResponse {
    fn from(slot: TimeSlot) -> Self {
        Self {
            start: slot.start().format("%H:%M").to_string(),
            end: slot.end().format("%H:%M").to_string(),
            label: slot.label(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SlotsResponse {
    pub date: String,
    pub slots: Vec<TimeSlotResponse>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /delivery-hours
///
/// Returns the weekly pickup configuration ordered by day of week.
#[utoipa::path(
    get,
    path = "/delivery-hours",
    responses(
        (status = 200, description = "Weekly configuration", body = Vec<DeliveryDayResponse>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "delivery"
)]
pub async fn list_delivery_hours(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let week = web::block(move || state.delivery.week()).await??;

    let body: Vec<DeliveryDayResponse> = week.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /delivery-slots?date=YYYY-MM-DD
///
/// Returns the pickup slots bookable on the date. A closed or unconfigured
/// day yields an empty list.
#[utoipa::path(
    get,
    path = "/delivery-slots",
    params(
        ("date" = String, Query, description = "Pickup date, YYYY-MM-DD"),
    ),
    responses(
        (status = 200, description = "Slots for the date", body = SlotsResponse),
        (status = 400, description = "Missing or malformed date"),
    ),
    tag = "delivery"
)]
pub async fn list_delivery_slots(
    state: web::Data<AppState>,
    query: web::Query<SlotsQuery>,
) -> Result<HttpResponse, AppError> {
    let date = query.into_inner().date;
    let slots = web::block(move || state.delivery.slots_for(date)).await??;

    Ok(HttpResponse::Ok().json(SlotsResponse {
        date: date.format("%Y-%m-%d").to_string(),
        slots: slots.into_iter().map(Into::into).collect(),
    }))
}
