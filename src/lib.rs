//! Booking and session core for the SchemaX service marketplace.
//!
//! Clients and freelancers meet through bookable services: the session
//! store gates every mutating call and broadcasts its transitions, the
//! availability ledger tracks freelancer time slots, the booking engine
//! drives the booking state machine, and the notification dispatcher turns
//! domain events into per-user feeds. Everything is in-memory; this crate
//! defines the contract a real backend must satisfy.

pub mod app_state;
pub mod availability;
pub mod booking;
pub mod chat;
pub mod clock;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod notify;
pub mod registry;
pub mod seed;
pub mod session;

pub use error::{CoreError, CoreResult};
