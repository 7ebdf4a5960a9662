use std::sync::Arc;

use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::clock::Clock;
use crate::error::{CoreError, CoreResult};
use crate::models::{AvailabilitySlot, NewAvailabilitySlot, UserRole};
use crate::registry::Registry;
use crate::session::SessionStore;

/// Per-freelancer ledger of bookable time slots.
///
/// Slots never overlap for the same freelancer, and a booked slot can
/// neither be deleted nor booked again.
pub struct AvailabilityLedger {
    registry: Arc<Registry>,
    session: Arc<SessionStore>,
    clock: Clock,
}

impl AvailabilityLedger {
    pub fn new(registry: Arc<Registry>, session: Arc<SessionStore>, clock: Clock) -> Self {
        AvailabilityLedger {
            registry,
            session,
            clock,
        }
    }

    /// Publish a new slot for the signed-in freelancer.
    pub fn add_slot(&self, new_slot: NewAvailabilitySlot) -> CoreResult<AvailabilitySlot> {
        new_slot.validate()?;
        let current = self.session.require_user()?;
        if current.id != new_slot.freelancer_id || current.role != UserRole::Freelancer {
            return Err(CoreError::Forbidden {
                action: "manage availability for this freelancer".to_string(),
            });
        }
        if new_slot.end_time <= new_slot.start_time {
            return Err(CoreError::InvalidRange {
                start: new_slot.start_time,
                end: new_slot.end_time,
            });
        }
        if let Some(existing) = self.registry.overlapping_slot(
            new_slot.freelancer_id,
            new_slot.start_time,
            new_slot.end_time,
        ) {
            return Err(CoreError::Overlap {
                start: existing.start_time,
                end: existing.end_time,
            });
        }

        let slot = AvailabilitySlot {
            id: Uuid::now_v7(),
            freelancer_id: new_slot.freelancer_id,
            start_time: new_slot.start_time,
            end_time: new_slot.end_time,
            is_booked: false,
            created_at: self.clock.now(),
        };
        self.registry.insert_slot(slot.clone());
        debug!(slot = %slot.id, freelancer = %slot.freelancer_id, "availability slot added");
        Ok(slot)
    }

    /// Delete an unbooked slot owned by the signed-in freelancer.
    pub fn remove_slot(&self, slot_id: Uuid) -> CoreResult<()> {
        let current = self.session.require_user()?;
        let slot = self
            .registry
            .slot_by_id(slot_id)
            .ok_or(CoreError::NotFound {
                entity: "availability slot",
                id: slot_id,
            })?;
        if slot.freelancer_id != current.id {
            return Err(CoreError::Forbidden {
                action: "remove another freelancer's slot".to_string(),
            });
        }
        if slot.is_booked {
            return Err(CoreError::SlotBooked { id: slot_id });
        }
        self.registry.remove_slot(slot_id);
        debug!(slot = %slot_id, "availability slot removed");
        Ok(())
    }

    /// Slots for a freelancer intersecting the optional `[from, to)` window,
    /// ordered by start time.
    pub fn list_slots(
        &self,
        freelancer_id: Uuid,
        from: Option<OffsetDateTime>,
        to: Option<OffsetDateTime>,
    ) -> Vec<AvailabilitySlot> {
        let mut slots: Vec<AvailabilitySlot> = self
            .registry
            .slots_for(freelancer_id)
            .into_iter()
            .filter(|slot| from.map_or(true, |from| slot.end_time > from))
            .filter(|slot| to.map_or(true, |to| slot.start_time < to))
            .collect();
        slots.sort_by_key(|slot| slot.start_time);
        slots
    }

    /// Mark booked the first unbooked slot containing `[start, end)`.
    ///
    /// Containment, not exact match: a booking may occupy part of a wider
    /// published slot. Called by the booking engine only.
    pub(crate) fn claim_slot(
        &self,
        freelancer_id: Uuid,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> CoreResult<AvailabilitySlot> {
        self.registry
            .claim_covering_slot(freelancer_id, start, end)
            .ok_or(CoreError::NoAvailability { freelancer_id })
    }
}
