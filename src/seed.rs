use time::macros::time;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::models::{
    AvailabilitySlot, Booking, BookingStatus, PaymentStatus, Service, User, UserRole,
};
use crate::registry::Registry;

/// Demo credentials. Every seeded account accepts the same password so the
/// showcase flows can be driven from any side of a booking.
pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "demo123";

/// Populate the registry with the showcase world: five accounts, five
/// services, two availability slots and two bookings, all dated relative
/// to `now`.
pub fn seed_demo_data(registry: &Registry, now: OffsetDateTime) {
    let john = user(
        "john.doe@example.com",
        "John Doe",
        UserRole::Freelancer,
        Some(7500),
        "Dhaka, Bangladesh",
        "Experienced web developer with 5+ years in React and Node.js",
        now,
    );
    let sarah = user(
        "sarah.smith@example.com",
        "Sarah Smith",
        UserRole::Freelancer,
        Some(9000),
        "Chittagong, Bangladesh",
        "UI/UX Designer specializing in mobile and web applications",
        now,
    );
    let mike = user(
        "mike.johnson@example.com",
        "Mike Johnson",
        UserRole::Freelancer,
        Some(6000),
        "Khulna, Bangladesh",
        "Full-stack developer with expertise in Python and Django",
        now,
    );
    let alice = user(
        "client@example.com",
        "Alice Wilson",
        UserRole::Client,
        None,
        "Dhaka, Bangladesh",
        "Startup founder looking for talented developers",
        now,
    );
    let demo = user(
        DEMO_EMAIL,
        "Demo User",
        UserRole::Client,
        None,
        "Dhaka, Bangladesh",
        "Demo user for showcasing the platform",
        now,
    );
    for account in [&john, &sarah, &mike, &alice, &demo] {
        registry.insert_user(account.clone());
        registry.set_password(&account.email, DEMO_PASSWORD);
    }

    let react_app = service(
        john.id,
        "React Web Application Development",
        "Build modern, responsive web applications using React and TypeScript",
        50000,
        120,
    );
    let uiux = service(
        sarah.id,
        "Mobile UI/UX Design",
        "Create beautiful and intuitive mobile app designs",
        75000,
        90,
    );
    let python_api = service(
        mike.id,
        "Python Backend API",
        "Develop robust REST APIs using Python and Django",
        40000,
        150,
    );
    let react_native = service(
        john.id,
        "React Native Mobile App",
        "Cross-platform mobile application development",
        80000,
        180,
    );
    let redesign = service(
        sarah.id,
        "Website Redesign",
        "Complete website redesign with modern UI/UX principles",
        60000,
        240,
    );
    for offering in [&react_app, &uiux, &python_api, &react_native, &redesign] {
        registry.insert_service(offering.clone());
    }

    // John publishes an open slot tomorrow morning and carries one already
    // booked slot the day after.
    let tomorrow = (now + Duration::days(1)).replace_time(time!(09:00));
    registry.insert_slot(AvailabilitySlot {
        id: Uuid::now_v7(),
        freelancer_id: john.id,
        start_time: tomorrow,
        end_time: tomorrow + Duration::hours(3),
        is_booked: false,
        created_at: now,
    });
    let day_after = (now + Duration::days(2)).replace_time(time!(10:00));
    registry.insert_slot(AvailabilitySlot {
        id: Uuid::now_v7(),
        freelancer_id: john.id,
        start_time: day_after,
        end_time: day_after + Duration::hours(3),
        is_booked: true,
        created_at: now,
    });

    let confirmed_start = (now + Duration::days(5)).replace_time(time!(10:00));
    registry.insert_booking(Booking {
        id: Uuid::now_v7(),
        client_id: alice.id,
        freelancer_id: john.id,
        service_id: react_app.id,
        start_time: confirmed_start,
        end_time: confirmed_start + Duration::minutes(react_app.duration_minutes),
        status: BookingStatus::Confirmed,
        payment_status: PaymentStatus::Paid,
        total_amount_cents: react_app.price_cents,
        currency: react_app.currency.clone(),
        notes: Some("Need the app to be mobile-responsive".to_string()),
        created_at: now - Duration::days(2),
    });
    let pending_start = (now + Duration::days(9)).replace_time(time!(14:00));
    registry.insert_booking(Booking {
        id: Uuid::now_v7(),
        client_id: demo.id,
        freelancer_id: sarah.id,
        service_id: uiux.id,
        start_time: pending_start,
        end_time: pending_start + Duration::minutes(uiux.duration_minutes),
        status: BookingStatus::Pending,
        payment_status: PaymentStatus::Unpaid,
        total_amount_cents: uiux.price_cents,
        currency: uiux.currency.clone(),
        notes: Some("Looking for modern design trends".to_string()),
        created_at: now - Duration::days(1),
    });
}

fn user(
    email: &str,
    display_name: &str,
    role: UserRole,
    hourly_rate_cents: Option<i64>,
    location: &str,
    bio: &str,
    now: OffsetDateTime,
) -> User {
    User {
        id: Uuid::now_v7(),
        email: email.to_string(),
        display_name: display_name.to_string(),
        role,
        is_public: true,
        hourly_rate_cents,
        avatar_url: None,
        location: Some(location.to_string()),
        bio: Some(bio.to_string()),
        created_at: now,
    }
}

fn service(
    freelancer_id: Uuid,
    title: &str,
    description: &str,
    price_cents: i64,
    duration_minutes: i64,
) -> Service {
    Service {
        id: Uuid::now_v7(),
        freelancer_id,
        title: title.to_string(),
        description: Some(description.to_string()),
        price_cents,
        currency: "bdt".to_string(),
        duration_minutes,
        is_active: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn seeding_builds_the_showcase_world() {
        let registry = Registry::new();
        seed_demo_data(&registry, datetime!(2025-06-01 12:00 UTC));

        assert_eq!(registry.users().len(), 5);
        assert_eq!(registry.services().len(), 5);
        assert!(registry.user_by_email(DEMO_EMAIL).is_some());
        assert!(registry.password_matches(DEMO_EMAIL, DEMO_PASSWORD));

        let john = registry.user_by_email("john.doe@example.com").unwrap();
        let slots = registry.slots_for(john.id);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots.iter().filter(|slot| slot.is_booked).count(), 1);
    }
}
