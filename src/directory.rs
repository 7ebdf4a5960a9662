use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::models::{Booking, Service, User, UserRole};
use crate::registry::Registry;

/// A public freelancer together with their active services, as rendered by
/// the browsing UI.
#[derive(Debug, Clone, Serialize)]
pub struct FreelancerProfile {
    pub freelancer: User,
    pub services: Vec<Service>,
}

/// Read-only accessors for the browsing and dashboard views.
pub struct Directory {
    registry: Arc<Registry>,
}

impl Directory {
    pub fn new(registry: Arc<Registry>) -> Self {
        Directory { registry }
    }

    pub fn list_freelancers(&self) -> Vec<FreelancerProfile> {
        let services = self.registry.services();
        self.registry
            .users()
            .into_iter()
            .filter(|user| user.role == UserRole::Freelancer && user.is_public)
            .map(|freelancer| {
                let services = services
                    .iter()
                    .filter(|service| {
                        service.freelancer_id == freelancer.id && service.is_active
                    })
                    .cloned()
                    .collect();
                FreelancerProfile {
                    freelancer,
                    services,
                }
            })
            .collect()
    }

    pub fn service_with_freelancer(&self, service_id: Uuid) -> Option<(Service, User)> {
        let service = self.registry.service_by_id(service_id)?;
        let freelancer = self.registry.user_by_id(service.freelancer_id)?;
        Some((service, freelancer))
    }

    /// Bookings the user participates in, newest first.
    pub fn bookings_for(&self, user_id: Uuid) -> Vec<Booking> {
        let mut bookings = self.registry.bookings_for(user_id);
        bookings.reverse();
        bookings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use time::macros::datetime;

    fn directory() -> (Directory, Arc<Registry>) {
        let registry = Arc::new(Registry::new());
        let clock = Clock::fixed(datetime!(2025-06-01 12:00 UTC));
        crate::seed::seed_demo_data(&registry, clock.now());
        (Directory::new(registry.clone()), registry)
    }

    #[test]
    fn listing_shows_public_freelancers_with_active_services() {
        let (directory, registry) = directory();
        let profiles = directory.list_freelancers();

        let seeded_freelancers = registry
            .users()
            .iter()
            .filter(|user| user.role == UserRole::Freelancer && user.is_public)
            .count();
        assert_eq!(profiles.len(), seeded_freelancers);
        assert!(profiles.iter().all(|profile| profile
            .services
            .iter()
            .all(|service| service.is_active && service.freelancer_id == profile.freelancer.id)));
        assert!(profiles.iter().any(|profile| !profile.services.is_empty()));
    }

    #[test]
    fn service_lookup_joins_the_freelancer() {
        let (directory, registry) = directory();
        let service = registry.services().remove(0);
        let (found, freelancer) = directory.service_with_freelancer(service.id).unwrap();
        assert_eq!(found.id, service.id);
        assert_eq!(freelancer.id, service.freelancer_id);

        assert!(directory.service_with_freelancer(Uuid::now_v7()).is_none());
    }

    #[test]
    fn bookings_are_filtered_by_participant() {
        let (directory, registry) = directory();
        for user in registry.users() {
            for booking in directory.bookings_for(user.id) {
                assert!(booking.client_id == user.id || booking.freelancer_id == user.id);
            }
        }

        // Seeded client has bookings; a stranger has none.
        let client = registry.user_by_email("client@example.com").unwrap();
        assert!(!directory.bookings_for(client.id).is_empty());
        assert!(directory.bookings_for(Uuid::now_v7()).is_empty());
    }
}
