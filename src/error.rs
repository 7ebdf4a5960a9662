use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::BookingStatus;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("no authenticated session")]
    Unauthenticated,

    #[error("not allowed to {action}")]
    Forbidden { action: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("invalid booking window: {reason}")]
    InvalidWindow { reason: String },

    #[error("invalid slot range: start {start} is not before end {end}")]
    InvalidRange {
        start: OffsetDateTime,
        end: OffsetDateTime,
    },

    #[error("slot overlaps existing availability from {start} to {end}")]
    Overlap {
        start: OffsetDateTime,
        end: OffsetDateTime,
    },

    #[error("availability slot {id} is booked")]
    SlotBooked { id: Uuid },

    #[error("no availability slot covers the requested window for freelancer {freelancer_id}")]
    NoAvailability { freelancer_id: Uuid },

    #[error("cannot move booking from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("an account with email {email} already exists")]
    UserExists { email: String },

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("service {id} not found or inactive")]
    ServiceNotFound { id: Uuid },

    #[error("validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

pub type CoreResult<T> = Result<T, CoreError>;
