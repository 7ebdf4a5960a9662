use std::sync::Arc;

use uuid::Uuid;

use crate::availability::AvailabilityLedger;
use crate::booking::BookingEngine;
use crate::chat::ConversationLog;
use crate::clock::Clock;
use crate::config::Config;
use crate::directory::Directory;
use crate::error::{CoreError, CoreResult};
use crate::models::{Booking, BookingDecision, NotificationPayload};
use crate::notify::{DomainEvent, NotificationDispatcher};
use crate::registry::Registry;
use crate::session::SessionStore;

/// Wires every component around one registry and one clock. Owned by the
/// process entry point; collaborators receive cloned handles instead of
/// reaching for ambient state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub clock: Clock,
    pub registry: Arc<Registry>,
    pub session: Arc<SessionStore>,
    pub availability: Arc<AvailabilityLedger>,
    pub bookings: Arc<BookingEngine>,
    pub notifications: Arc<NotificationDispatcher>,
    pub chat: Arc<ConversationLog>,
    pub directory: Arc<Directory>,
}

impl AppState {
    pub fn new(config: Config, clock: Clock, registry: Arc<Registry>) -> Self {
        let session = Arc::new(SessionStore::new(
            registry.clone(),
            clock.clone(),
            config.latency,
        ));
        let notifications = Arc::new(NotificationDispatcher::new(registry.clone(), clock.clone()));
        let availability = Arc::new(AvailabilityLedger::new(
            registry.clone(),
            session.clone(),
            clock.clone(),
        ));
        let bookings = Arc::new(BookingEngine::new(
            registry.clone(),
            session.clone(),
            availability.clone(),
            notifications.clone(),
            clock.clone(),
            &config,
        ));
        let chat = Arc::new(ConversationLog::new(
            registry.clone(),
            session.clone(),
            clock.clone(),
        ));
        let directory = Arc::new(Directory::new(registry.clone()));

        // Session transitions flow into the dispatcher like any other
        // domain event.
        let dispatcher = notifications.clone();
        session.subscribe(move |event| dispatcher.on_event(DomainEvent::from(event)));

        AppState {
            config,
            clock,
            registry,
            session,
            availability,
            bookings,
            notifications,
            chat,
            directory,
        }
    }

    /// The UI flow on a booking-request notification: respond as the
    /// signed-in freelancer, then dismiss the request. Request
    /// notifications are never marked read merely by being displayed.
    pub fn respond_to_request(
        &self,
        notification_id: Uuid,
        decision: BookingDecision,
    ) -> CoreResult<Booking> {
        let responder = self.session.require_user()?;
        let notification = self
            .registry
            .notification_by_id(notification_id)
            .ok_or(CoreError::NotFound {
                entity: "notification",
                id: notification_id,
            })?;
        let NotificationPayload::BookingRequest { booking_id, .. } = notification.payload else {
            return Err(CoreError::NotFound {
                entity: "booking request",
                id: notification_id,
            });
        };

        let booking = self
            .bookings
            .respond_to_booking(booking_id, responder.id, decision)?;
        self.notifications.mark_read(notification_id)?;
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, Credentials, NewBooking};
    use secrecy::SecretString;
    use time::macros::datetime;
    use time::Duration;

    fn demo_state() -> AppState {
        let registry = Arc::new(Registry::new());
        let clock = Clock::fixed(datetime!(2025-06-01 12:00 UTC));
        crate::seed::seed_demo_data(&registry, clock.now());
        AppState::new(Config::instant(), clock, registry)
    }

    async fn sign_in(state: &AppState, email: &str) {
        state
            .session
            .sign_in(Credentials {
                email: email.to_string(),
                password: SecretString::from(crate::seed::DEMO_PASSWORD.to_string()),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn responding_to_a_request_confirms_and_dismisses() {
        let state = demo_state();
        sign_in(&state, crate::seed::DEMO_EMAIL).await;
        let client = state.session.current_user().unwrap();

        let service = state
            .registry
            .services()
            .into_iter()
            .find(|service| service.is_active)
            .unwrap();
        let booking = state
            .bookings
            .create_booking(NewBooking {
                service_id: service.id,
                start_time: state.clock.now() + Duration::days(7),
                notes: None,
            })
            .await
            .unwrap();

        let freelancer = state.registry.user_by_id(booking.freelancer_id).unwrap();
        sign_in(&state, &freelancer.email).await;
        let request = state
            .notifications
            .list_notifications(freelancer.id)
            .remove(0);
        assert!(!request.is_read);

        let confirmed = state
            .respond_to_request(request.id, BookingDecision::Confirm)
            .unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
        assert!(state
            .notifications
            .list_notifications(freelancer.id)
            .remove(0)
            .is_read);
        assert_eq!(state.notifications.unread_count(client.id), 1);
    }

    #[tokio::test]
    async fn responding_to_a_non_request_notification_fails() {
        let state = demo_state();
        sign_in(&state, crate::seed::DEMO_EMAIL).await;
        let client = state.session.current_user().unwrap();

        let service = state
            .registry
            .services()
            .into_iter()
            .find(|service| service.is_active)
            .unwrap();
        let booking = state
            .bookings
            .create_booking(NewBooking {
                service_id: service.id,
                start_time: state.clock.now() + Duration::days(7),
                notes: None,
            })
            .await
            .unwrap();
        state
            .bookings
            .respond_to_booking(booking.id, booking.freelancer_id, BookingDecision::Confirm)
            .unwrap();

        // The client's booking_confirmed notification is not respondable.
        let confirmation = state.notifications.list_notifications(client.id).remove(0);
        let err = state
            .respond_to_request(confirmation.id, BookingDecision::Confirm)
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { entity: "booking request", .. }));
    }

    #[tokio::test]
    async fn session_transitions_reach_the_dispatcher_without_feed_entries() {
        let state = demo_state();
        sign_in(&state, crate::seed::DEMO_EMAIL).await;
        let user = state.session.current_user().unwrap();
        state.session.sign_out().await;

        assert_eq!(state.notifications.unread_count(user.id), 0);
        assert!(state.notifications.list_notifications(user.id).is_empty());
    }
}
