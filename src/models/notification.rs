use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Typed payload for each notification kind. The time window and
/// counterpart name are carried so the UI can render without extra lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationPayload {
    BookingRequest {
        booking_id: Uuid,
        service_title: String,
        counterpart_name: String,
        #[serde(with = "time::serde::rfc3339")]
        start_time: OffsetDateTime,
        #[serde(with = "time::serde::rfc3339")]
        end_time: OffsetDateTime,
    },
    BookingConfirmed {
        booking_id: Uuid,
        service_title: String,
        counterpart_name: String,
        #[serde(with = "time::serde::rfc3339")]
        start_time: OffsetDateTime,
        #[serde(with = "time::serde::rfc3339")]
        end_time: OffsetDateTime,
    },
    BookingRejected {
        booking_id: Uuid,
        service_title: String,
        counterpart_name: String,
    },
}

impl NotificationPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationPayload::BookingRequest { .. } => "booking_request",
            NotificationPayload::BookingConfirmed { .. } => "booking_confirmed",
            NotificationPayload::BookingRejected { .. } => "booking_rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub payload: NotificationPayload,
    pub is_read: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub read_at: Option<OffsetDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn payload_serializes_with_a_type_tag() {
        let payload = NotificationPayload::BookingRequest {
            booking_id: Uuid::now_v7(),
            service_title: "Mobile UI/UX Design".to_string(),
            counterpart_name: "Alice Wilson".to_string(),
            start_time: datetime!(2025-06-02 10:00 UTC),
            end_time: datetime!(2025-06-02 11:30 UTC),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["type"], "booking_request");
        assert_eq!(value["start_time"], "2025-06-02T10:00:00Z");
    }
}
