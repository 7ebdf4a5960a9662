use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

/// A freelancer-declared bookable interval. Intervals are half-open:
/// `[start_time, end_time)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: Uuid,
    pub freelancer_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub is_booked: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl AvailabilitySlot {
    pub fn overlaps(&self, start: OffsetDateTime, end: OffsetDateTime) -> bool {
        self.start_time < end && start < self.end_time
    }

    pub fn covers(&self, start: OffsetDateTime, end: OffsetDateTime) -> bool {
        self.start_time <= start && end <= self.end_time
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewAvailabilitySlot {
    pub freelancer_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
}
