use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;

const TIME_FORMAT: &str = "%H:%M";

/// Weekly pickup configuration for one day.
///
/// `day_of_week` counts from Sunday (0) to Saturday (6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryDayConfig {
    pub day: String,
    pub day_of_week: u32,
    pub is_open: bool,
    pub morning_enabled: bool,
    pub morning_start: Option<String>,
    pub morning_end: Option<String>,
    pub afternoon_enabled: bool,
    pub afternoon_start: Option<String>,
    pub afternoon_end: Option<String>,
}

impl DeliveryDayConfig {
    /// A closed day with both periods disabled.
    pub fn closed(day: impl Into<String>, day_of_week: u32) -> Self {
        Self {
            day: day.into(),
            day_of_week,
            is_open: false,
            morning_enabled: false,
            morning_start: None,
            morning_end: None,
            afternoon_enabled: false,
            afternoon_start: None,
            afternoon_end: None,
        }
    }

    pub fn with_morning(mut self, start: &str, end: &str) -> Self {
        self.is_open = true;
        self.morning_enabled = true;
        self.morning_start = Some(start.to_string());
        self.morning_end = Some(end.to_string());
        self
    }

    pub fn with_afternoon(mut self, start: &str, end: &str) -> Self {
        self.is_open = true;
        self.afternoon_enabled = true;
        self.afternoon_start = Some(start.to_string());
        self.afternoon_end = Some(end.to_string());
        self
    }

    fn periods(&self) -> [(&'static str, bool, Option<&str>, Option<&str>); 2] {
        [
            (
                "morning",
                self.morning_enabled,
                self.morning_start.as_deref(),
                self.morning_end.as_deref(),
            ),
            (
                "afternoon",
                self.afternoon_enabled,
                self.afternoon_start.as_deref(),
                self.afternoon_end.as_deref(),
            ),
        ]
    }

    /// Bookable slots for this day, morning first.
    pub fn slots(&self) -> Vec<TimeSlot> {
        if !self.is_open {
            return Vec::new();
        }

        self.periods()
            .into_iter()
            .filter_map(|(period, enabled, start, end)| {
                if !enabled {
                    return None;
                }
                let (start, end) = (start?, end?);
                match TimeSlot::from_bounds(start, end) {
                    Ok(slot) => Some(slot),
                    Err(e) => {
                        log::warn!("Skipping {} period on {}: {}", period, self.day, e);
                        None
                    }
                }
            })
            .collect()
    }
}

/// A concrete pickup range resolved for a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSlot {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeSlot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, DomainError> {
        if start >= end {
            return Err(DomainError::InvalidInput(format!(
                "slot start {} must precede end {}",
                start.format(TIME_FORMAT),
                end.format(TIME_FORMAT)
            )));
        }
        Ok(Self { start, end })
    }

    /// Builds a slot from two `HH:MM` strings.
    pub fn from_bounds(start: &str, end: &str) -> Result<Self, DomainError> {
        Self::new(parse_time(start)?, parse_time(end)?)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Identifier sent with an order, e.g. `08:00–12:00`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, DomainError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| DomainError::InvalidInput(format!("invalid time '{}'", value)))
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}–{}",
            self.start.format(TIME_FORMAT),
            self.end.format(TIME_FORMAT)
        )
    }
}

impl FromStr for TimeSlot {
    type Err = DomainError;

    /// Accepts `HH:MM–HH:MM` as well as a plain hyphen separator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('–')
            .or_else(|| s.split_once('-'))
            .ok_or_else(|| DomainError::InvalidInput(format!("invalid time slot '{}'", s)))?;
        Self::from_bounds(start, end)
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Day-of-week index of `date`, Sunday being 0.
pub fn day_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Resolves the bookable slots of `date` against the weekly configuration.
///
/// An unmatched or closed day yields no slots.
pub fn resolve_slots(date: NaiveDate, week: &[DeliveryDayConfig]) -> Vec<TimeSlot> {
    let index = day_index(date);
    week.iter()
        .find(|config| config.day_of_week == index)
        .map(DeliveryDayConfig::slots)
        .unwrap_or_default()
}
