use std::collections::HashMap;
use std::sync::Mutex;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::{
    AvailabilitySlot, Booking, ChatMessage, Notification, Service, User,
};

/// Process-wide in-memory tables backing every component.
///
/// Constructed once by the entry point and shared by `Arc` handle; all
/// mutation goes through the component contracts, never directly through
/// external collaborators. Rows are kept in insertion order.
#[derive(Default)]
pub struct Registry {
    users: Mutex<Vec<User>>,
    credentials: Mutex<HashMap<String, String>>,
    services: Mutex<Vec<Service>>,
    slots: Mutex<Vec<AvailabilitySlot>>,
    bookings: Mutex<Vec<Booking>>,
    notifications: Mutex<Vec<Notification>>,
    messages: Mutex<Vec<ChatMessage>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    // User specific functions

    pub fn users(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }

    pub fn user_by_id(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    pub(crate) fn insert_user(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    pub(crate) fn set_password(&self, email: &str, password: &str) {
        self.credentials
            .lock()
            .unwrap()
            .insert(email.to_string(), password.to_string());
    }

    pub(crate) fn password_matches(&self, email: &str, password: &str) -> bool {
        self.credentials
            .lock()
            .unwrap()
            .get(email)
            .is_some_and(|stored| stored == password)
    }

    // Service specific functions

    pub fn services(&self) -> Vec<Service> {
        self.services.lock().unwrap().clone()
    }

    pub fn service_by_id(&self, id: Uuid) -> Option<Service> {
        self.services
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    pub(crate) fn insert_service(&self, service: Service) {
        self.services.lock().unwrap().push(service);
    }

    // Availability slot specific functions

    pub fn slots_for(&self, freelancer_id: Uuid) -> Vec<AvailabilitySlot> {
        self.slots
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.freelancer_id == freelancer_id)
            .cloned()
            .collect()
    }

    pub fn slot_by_id(&self, id: Uuid) -> Option<AvailabilitySlot> {
        self.slots.lock().unwrap().iter().find(|s| s.id == id).cloned()
    }

    pub(crate) fn insert_slot(&self, slot: AvailabilitySlot) {
        self.slots.lock().unwrap().push(slot);
    }

    pub(crate) fn remove_slot(&self, id: Uuid) -> bool {
        let mut slots = self.slots.lock().unwrap();
        let before = slots.len();
        slots.retain(|s| s.id != id);
        slots.len() < before
    }

    pub(crate) fn overlapping_slot(
        &self,
        freelancer_id: Uuid,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Option<AvailabilitySlot> {
        self.slots
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.freelancer_id == freelancer_id && s.overlaps(start, end))
            .cloned()
    }

    /// Atomically find an unbooked slot containing `[start, end)` and mark
    /// it booked.
    pub(crate) fn claim_covering_slot(
        &self,
        freelancer_id: Uuid,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Option<AvailabilitySlot> {
        let mut slots = self.slots.lock().unwrap();
        let slot = slots
            .iter_mut()
            .find(|s| s.freelancer_id == freelancer_id && !s.is_booked && s.covers(start, end))?;
        slot.is_booked = true;
        Some(slot.clone())
    }

    // Booking specific functions

    pub fn booking_by_id(&self, id: Uuid) -> Option<Booking> {
        self.bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned()
    }

    pub fn bookings_for(&self, user_id: Uuid) -> Vec<Booking> {
        self.bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.client_id == user_id || b.freelancer_id == user_id)
            .cloned()
            .collect()
    }

    pub(crate) fn insert_booking(&self, booking: Booking) {
        self.bookings.lock().unwrap().push(booking);
    }

    pub(crate) fn update_booking<R>(
        &self,
        id: Uuid,
        apply: impl FnOnce(&mut Booking) -> R,
    ) -> Option<R> {
        let mut bookings = self.bookings.lock().unwrap();
        bookings.iter_mut().find(|b| b.id == id).map(apply)
    }

    // Notification specific functions

    pub fn notification_by_id(&self, id: Uuid) -> Option<Notification> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .find(|n| n.id == id)
            .cloned()
    }

    pub fn notifications_for(&self, user_id: Uuid) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    pub(crate) fn insert_notification(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }

    pub(crate) fn update_notification<R>(
        &self,
        id: Uuid,
        apply: impl FnOnce(&mut Notification) -> R,
    ) -> Option<R> {
        let mut notifications = self.notifications.lock().unwrap();
        notifications.iter_mut().find(|n| n.id == id).map(apply)
    }

    // Chat message specific functions

    pub fn messages_for_booking(&self, booking_id: Uuid) -> Vec<ChatMessage> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.booking_id == booking_id)
            .cloned()
            .collect()
    }

    pub(crate) fn insert_message(&self, message: ChatMessage) {
        self.messages.lock().unwrap().push(message);
    }
}
