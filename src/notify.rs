use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{CoreError, CoreResult};
use crate::models::{Booking, Notification, NotificationPayload};
use crate::registry::Registry;
use crate::session::SessionEvent;

/// Everything the dispatcher reacts to. Booking events carry the display
/// context so notification payloads need no further lookups.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    BookingCreated {
        booking: Booking,
        service_title: String,
        client_name: String,
    },
    BookingConfirmed {
        booking: Booking,
        service_title: String,
        freelancer_name: String,
    },
    BookingRejected {
        booking: Booking,
        service_title: String,
        freelancer_name: String,
    },
    SignedIn {
        user_id: Uuid,
        display_name: String,
    },
    SignedOut,
}

impl From<&SessionEvent> for DomainEvent {
    fn from(event: &SessionEvent) -> Self {
        match event {
            SessionEvent::SignedIn(user) => DomainEvent::SignedIn {
                user_id: user.id,
                display_name: user.display_name.clone(),
            },
            SessionEvent::SignedOut => DomainEvent::SignedOut,
        }
    }
}

/// Translates domain events into per-user notification feeds and tracks
/// read state. Notifications are never deleted, only marked read.
pub struct NotificationDispatcher {
    registry: Arc<Registry>,
    clock: Clock,
}

impl NotificationDispatcher {
    pub fn new(registry: Arc<Registry>, clock: Clock) -> Self {
        NotificationDispatcher { registry, clock }
    }

    pub fn on_event(&self, event: DomainEvent) {
        match event {
            DomainEvent::BookingCreated {
                booking,
                service_title,
                client_name,
            } => self.append(
                booking.freelancer_id,
                NotificationPayload::BookingRequest {
                    booking_id: booking.id,
                    service_title,
                    counterpart_name: client_name,
                    start_time: booking.start_time,
                    end_time: booking.end_time,
                },
            ),
            DomainEvent::BookingConfirmed {
                booking,
                service_title,
                freelancer_name,
            } => self.append(
                booking.client_id,
                NotificationPayload::BookingConfirmed {
                    booking_id: booking.id,
                    service_title,
                    counterpart_name: freelancer_name,
                    start_time: booking.start_time,
                    end_time: booking.end_time,
                },
            ),
            DomainEvent::BookingRejected {
                booking,
                service_title,
                freelancer_name,
            } => self.append(
                booking.client_id,
                NotificationPayload::BookingRejected {
                    booking_id: booking.id,
                    service_title,
                    counterpart_name: freelancer_name,
                },
            ),
            // Session transitions are observed but produce no feed entries.
            DomainEvent::SignedIn {
                user_id,
                display_name,
            } => debug!(user = %user_id, name = %display_name, "session opened"),
            DomainEvent::SignedOut => debug!("session closed"),
        }
    }

    fn append(&self, user_id: Uuid, payload: NotificationPayload) {
        let notification = Notification {
            id: Uuid::now_v7(),
            user_id,
            payload,
            is_read: false,
            created_at: self.clock.now(),
            read_at: None,
        };
        debug!(
            notification = %notification.id,
            user = %user_id,
            kind = notification.payload.kind(),
            "notification queued"
        );
        self.registry.insert_notification(notification);
    }

    /// The user's feed, newest first.
    pub fn list_notifications(&self, user_id: Uuid) -> Vec<Notification> {
        let mut notifications = self.registry.notifications_for(user_id);
        notifications.reverse();
        notifications
    }

    /// Mark a notification read. Idempotent: re-marking a read notification
    /// succeeds without touching `read_at`.
    pub fn mark_read(&self, notification_id: Uuid) -> CoreResult<()> {
        let now = self.clock.now();
        self.registry
            .update_notification(notification_id, |notification| {
                if !notification.is_read {
                    notification.is_read = true;
                    notification.read_at = Some(now);
                }
            })
            .ok_or(CoreError::NotFound {
                entity: "notification",
                id: notification_id,
            })
    }

    pub fn unread_count(&self, user_id: Uuid) -> usize {
        self.registry
            .notifications_for(user_id)
            .iter()
            .filter(|notification| !notification.is_read)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use time::Duration;

    fn dispatcher() -> (NotificationDispatcher, Clock) {
        let clock = Clock::fixed(datetime!(2025-06-01 12:00 UTC));
        (
            NotificationDispatcher::new(Arc::new(Registry::new()), clock.clone()),
            clock,
        )
    }

    fn booking_event(user_id: Uuid, title: &str) -> DomainEvent {
        let booking = Booking {
            id: Uuid::now_v7(),
            client_id: Uuid::now_v7(),
            freelancer_id: user_id,
            service_id: Uuid::now_v7(),
            start_time: datetime!(2025-06-02 10:00 UTC),
            end_time: datetime!(2025-06-02 11:00 UTC),
            status: crate::models::BookingStatus::Pending,
            payment_status: crate::models::PaymentStatus::Unpaid,
            total_amount_cents: 50000,
            currency: "bdt".to_string(),
            notes: None,
            created_at: datetime!(2025-06-01 12:00 UTC),
        };
        DomainEvent::BookingCreated {
            booking,
            service_title: title.to_string(),
            client_name: "Alice Wilson".to_string(),
        }
    }

    #[test]
    fn feeds_are_newest_first() {
        let (dispatcher, clock) = dispatcher();
        let recipient = Uuid::now_v7();

        dispatcher.on_event(booking_event(recipient, "first"));
        clock.advance(Duration::minutes(5));
        dispatcher.on_event(booking_event(recipient, "second"));

        let feed = dispatcher.list_notifications(recipient);
        assert_eq!(feed.len(), 2);
        assert!(feed[0].created_at > feed[1].created_at);
        match &feed[0].payload {
            NotificationPayload::BookingRequest { service_title, .. } => {
                assert_eq!(service_title, "second")
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn mark_read_is_idempotent() {
        let (dispatcher, clock) = dispatcher();
        let recipient = Uuid::now_v7();
        dispatcher.on_event(booking_event(recipient, "first"));
        let notification = dispatcher.list_notifications(recipient).remove(0);

        dispatcher.mark_read(notification.id).unwrap();
        let after_first = dispatcher.list_notifications(recipient).remove(0);
        assert!(after_first.is_read);

        clock.advance(Duration::minutes(10));
        dispatcher.mark_read(notification.id).unwrap();
        let after_second = dispatcher.list_notifications(recipient).remove(0);
        assert_eq!(after_first.read_at, after_second.read_at);
    }

    #[test]
    fn mark_read_of_unknown_notification_fails() {
        let (dispatcher, _clock) = dispatcher();
        let err = dispatcher.mark_read(Uuid::now_v7()).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { entity: "notification", .. }));
    }

    #[test]
    fn unread_count_tracks_read_state() {
        let (dispatcher, _clock) = dispatcher();
        let recipient = Uuid::now_v7();
        dispatcher.on_event(booking_event(recipient, "first"));
        dispatcher.on_event(booking_event(recipient, "second"));
        assert_eq!(dispatcher.unread_count(recipient), 2);

        let feed = dispatcher.list_notifications(recipient);
        dispatcher.mark_read(feed[0].id).unwrap();
        assert_eq!(dispatcher.unread_count(recipient), 1);

        dispatcher.mark_read(feed[0].id).unwrap();
        assert_eq!(dispatcher.unread_count(recipient), 1);

        dispatcher.mark_read(feed[1].id).unwrap();
        assert_eq!(dispatcher.unread_count(recipient), 0);
    }

    #[test]
    fn session_events_produce_no_feed_entries() {
        let (dispatcher, _clock) = dispatcher();
        let user_id = Uuid::now_v7();
        dispatcher.on_event(DomainEvent::SignedIn {
            user_id,
            display_name: "Demo User".to_string(),
        });
        dispatcher.on_event(DomainEvent::SignedOut);
        assert!(dispatcher.list_notifications(user_id).is_empty());
    }
}
