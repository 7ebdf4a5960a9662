use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookable offering published by a freelancer. Prices are integer minor
/// units (e.g. cents) in `currency`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub freelancer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub currency: String,
    pub duration_minutes: i64,
    pub is_active: bool,
}
