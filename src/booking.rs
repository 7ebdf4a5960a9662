use std::sync::Arc;
use std::time::Duration as StdDuration;

use time::{Date, Duration, PrimitiveDateTime, Time};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::availability::AvailabilityLedger;
use crate::clock::Clock;
use crate::config::{Config, SchedulingConfig};
use crate::error::{CoreError, CoreResult};
use crate::models::{
    Booking, BookingDecision, BookingStatus, NewBooking, PaymentStatus,
};
use crate::notify::{DomainEvent, NotificationDispatcher};
use crate::registry::Registry;
use crate::session::SessionStore;

/// Creates bookings and drives their status state machine:
///
/// ```text
/// pending --confirm--> confirmed --time elapses--> completed
/// pending --reject---> cancelled
/// ```
///
/// `completed` and `cancelled` are terminal. The availability ledger is
/// advisory: a booking claims a covering slot when one exists, and is
/// created without one otherwise.
pub struct BookingEngine {
    registry: Arc<Registry>,
    session: Arc<SessionStore>,
    ledger: Arc<AvailabilityLedger>,
    dispatcher: Arc<NotificationDispatcher>,
    clock: Clock,
    latency: StdDuration,
}

impl BookingEngine {
    pub fn new(
        registry: Arc<Registry>,
        session: Arc<SessionStore>,
        ledger: Arc<AvailabilityLedger>,
        dispatcher: Arc<NotificationDispatcher>,
        clock: Clock,
        config: &Config,
    ) -> Self {
        BookingEngine {
            registry,
            session,
            ledger,
            dispatcher,
            clock,
            latency: config.latency.booking,
        }
    }

    /// Request a booking for the signed-in client. The end time is derived
    /// from the service duration; the start time must lie in the future.
    pub async fn create_booking(&self, new_booking: NewBooking) -> CoreResult<Booking> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        new_booking.validate()?;
        let client = self.session.require_user()?;

        let service = self
            .registry
            .service_by_id(new_booking.service_id)
            .filter(|service| service.is_active)
            .ok_or(CoreError::ServiceNotFound {
                id: new_booking.service_id,
            })?;

        let now = self.clock.now();
        if new_booking.start_time <= now {
            return Err(CoreError::InvalidWindow {
                reason: format!(
                    "start time {} is not after the current time {}",
                    new_booking.start_time, now
                ),
            });
        }
        let end_time = new_booking.start_time + Duration::minutes(service.duration_minutes);

        match self
            .ledger
            .claim_slot(service.freelancer_id, new_booking.start_time, end_time)
        {
            Ok(slot) => debug!(slot = %slot.id, "claimed availability slot"),
            Err(CoreError::NoAvailability { .. }) => {
                debug!("no published availability covers the requested window")
            }
            Err(err) => return Err(err),
        }

        let booking = Booking {
            id: Uuid::now_v7(),
            client_id: client.id,
            freelancer_id: service.freelancer_id,
            service_id: service.id,
            start_time: new_booking.start_time,
            end_time,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            total_amount_cents: service.price_cents,
            currency: service.currency.clone(),
            notes: new_booking.notes,
            created_at: now,
        };
        self.registry.insert_booking(booking.clone());
        info!(
            booking = %booking.id,
            client = %booking.client_id,
            freelancer = %booking.freelancer_id,
            "booking requested"
        );

        self.dispatcher.on_event(DomainEvent::BookingCreated {
            booking: booking.clone(),
            service_title: service.title,
            client_name: client.display_name,
        });
        Ok(booking)
    }

    /// Confirm or reject a pending booking. Only the booked freelancer may
    /// respond, and only while the booking is still pending.
    pub fn respond_to_booking(
        &self,
        booking_id: Uuid,
        responder_id: Uuid,
        decision: BookingDecision,
    ) -> CoreResult<Booking> {
        let booking = self
            .registry
            .booking_by_id(booking_id)
            .ok_or(CoreError::NotFound {
                entity: "booking",
                id: booking_id,
            })?;
        if booking.freelancer_id != responder_id {
            return Err(CoreError::Forbidden {
                action: "respond to this booking".to_string(),
            });
        }
        let target = match decision {
            BookingDecision::Confirm => BookingStatus::Confirmed,
            BookingDecision::Reject => BookingStatus::Cancelled,
        };
        if booking.status != BookingStatus::Pending {
            return Err(CoreError::InvalidTransition {
                from: booking.status,
                to: target,
            });
        }

        let updated = self
            .registry
            .update_booking(booking_id, |booking| {
                booking.status = target;
                booking.clone()
            })
            .ok_or(CoreError::NotFound {
                entity: "booking",
                id: booking_id,
            })?;
        info!(booking = %booking_id, status = %target, "booking responded");

        let service_title = self
            .registry
            .service_by_id(updated.service_id)
            .map(|service| service.title)
            .unwrap_or_default();
        let freelancer_name = self
            .registry
            .user_by_id(updated.freelancer_id)
            .map(|user| user.display_name)
            .unwrap_or_default();
        let event = match decision {
            BookingDecision::Confirm => DomainEvent::BookingConfirmed {
                booking: updated.clone(),
                service_title,
                freelancer_name,
            },
            BookingDecision::Reject => DomainEvent::BookingRejected {
                booking: updated.clone(),
                service_title,
                freelancer_name,
            },
        };
        self.dispatcher.on_event(event);
        Ok(updated)
    }

    /// Close out a confirmed booking once its window has passed. Driven by
    /// an external collaborator, not by the engine itself.
    pub fn complete_booking(&self, booking_id: Uuid) -> CoreResult<Booking> {
        let booking = self
            .registry
            .booking_by_id(booking_id)
            .ok_or(CoreError::NotFound {
                entity: "booking",
                id: booking_id,
            })?;
        if booking.status != BookingStatus::Confirmed {
            return Err(CoreError::InvalidTransition {
                from: booking.status,
                to: BookingStatus::Completed,
            });
        }
        let now = self.clock.now();
        if now < booking.end_time {
            return Err(CoreError::InvalidWindow {
                reason: format!("booking runs until {}", booking.end_time),
            });
        }

        let updated = self
            .registry
            .update_booking(booking_id, |booking| {
                booking.status = BookingStatus::Completed;
                booking.clone()
            })
            .ok_or(CoreError::NotFound {
                entity: "booking",
                id: booking_id,
            })?;
        info!(booking = %booking_id, "booking completed");
        Ok(updated)
    }
}

/// Candidate start times for `date` at the configured granularity, spanning
/// the working day. Pure and restartable: the iterator is `Clone` and each
/// call produces a fresh sequence.
pub fn booking_slots(
    date: Date,
    scheduling: &SchedulingConfig,
) -> impl Iterator<Item = PrimitiveDateTime> + Clone {
    let step = scheduling.slot_minutes.max(1) as usize;
    let first = scheduling.day_start_hour as u16 * 60;
    let last = (scheduling.day_end_hour as u16 + 1) * 60;
    (first..last)
        .step_by(step)
        .filter_map(|minutes| Time::from_hms((minutes / 60) as u8, (minutes % 60) as u8, 0).ok())
        .map(move |start| PrimitiveDateTime::new(date, start))
}
