use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::clock::Clock;
use crate::error::{CoreError, CoreResult};
use crate::models::{Booking, ChatMessage, NewChatMessage};
use crate::registry::Registry;
use crate::session::SessionStore;

/// Append-only conversation thread attached to a booking. Only the two
/// booking participants may read or write it.
pub struct ConversationLog {
    registry: Arc<Registry>,
    session: Arc<SessionStore>,
    clock: Clock,
}

impl ConversationLog {
    pub fn new(registry: Arc<Registry>, session: Arc<SessionStore>, clock: Clock) -> Self {
        ConversationLog {
            registry,
            session,
            clock,
        }
    }

    pub fn post_message(&self, new_message: NewChatMessage) -> CoreResult<ChatMessage> {
        new_message.validate()?;
        let sender = self.session.require_user()?;
        let booking = self.participant_booking(new_message.booking_id, sender.id)?;

        let message = ChatMessage {
            id: Uuid::now_v7(),
            booking_id: booking.id,
            sender_id: sender.id,
            content: new_message.content,
            created_at: self.clock.now(),
        };
        self.registry.insert_message(message.clone());
        debug!(message = %message.id, booking = %booking.id, "chat message posted");
        Ok(message)
    }

    /// Messages in append order.
    pub fn list_messages(&self, booking_id: Uuid) -> CoreResult<Vec<ChatMessage>> {
        let reader = self.session.require_user()?;
        self.participant_booking(booking_id, reader.id)?;
        Ok(self.registry.messages_for_booking(booking_id))
    }

    fn participant_booking(&self, booking_id: Uuid, user_id: Uuid) -> CoreResult<Booking> {
        let booking = self
            .registry
            .booking_by_id(booking_id)
            .ok_or(CoreError::NotFound {
                entity: "booking",
                id: booking_id,
            })?;
        if booking.client_id != user_id && booking.freelancer_id != user_id {
            return Err(CoreError::Forbidden {
                action: "join this booking's conversation".to_string(),
            });
        }
        Ok(booking)
    }
}
