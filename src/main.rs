use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use secrecy::SecretString;
use time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use schemax_core::app_state::AppState;
use schemax_core::booking::booking_slots;
use schemax_core::clock::Clock;
use schemax_core::config::Config;
use schemax_core::models::{BookingDecision, Credentials, NewBooking, NewChatMessage};
use schemax_core::registry::Registry;
use schemax_core::seed::{seed_demo_data, DEMO_EMAIL, DEMO_PASSWORD};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;
    let clock = Clock::system();
    let registry = Arc::new(Registry::new());
    seed_demo_data(&registry, clock.now());
    let state = AppState::new(config, clock.clone(), registry);

    info!("{} starting demo walkthrough", state.config.app.name);
    let _feed = state
        .session
        .subscribe(|event| info!(?event, "session transition"));

    let client = state
        .session
        .sign_in(Credentials {
            email: DEMO_EMAIL.to_string(),
            password: SecretString::from(DEMO_PASSWORD.to_string()),
        })
        .await?;

    let profile = state
        .directory
        .list_freelancers()
        .into_iter()
        .find(|profile| !profile.services.is_empty())
        .context("No seeded freelancer offers a service")?;
    let service = profile.services[0].clone();
    info!(
        freelancer = %profile.freelancer.display_name,
        service = %service.title,
        price_cents = service.price_cents,
        "picked a service to book"
    );

    let tomorrow = (clock.now() + Duration::days(1)).date();
    let start = booking_slots(tomorrow, &state.config.scheduling)
        .nth(2)
        .context("No bookable start time tomorrow")?
        .assume_utc();

    let booking = state
        .bookings
        .create_booking(NewBooking {
            service_id: service.id,
            start_time: start,
            notes: Some("Booked through the demo walkthrough".to_string()),
        })
        .await?;

    let confirmed = state.bookings.respond_to_booking(
        booking.id,
        booking.freelancer_id,
        BookingDecision::Confirm,
    )?;
    info!(booking = %confirmed.id, status = %confirmed.status, "freelancer responded");

    state.chat.post_message(NewChatMessage {
        booking_id: booking.id,
        content: "Looking forward to the session!".to_string(),
    })?;

    let feed = state.notifications.list_notifications(client.id);
    info!(
        unread = state.notifications.unread_count(client.id),
        "client notifications: {}",
        serde_json::to_string_pretty(&feed)?
    );

    state.session.sign_out().await;
    Ok(())
}
