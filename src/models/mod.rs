mod availability;
mod booking;
mod message;
mod notification;
mod service;
mod user;

pub use availability::*;
pub use booking::*;
pub use message::*;
pub use notification::*;
pub use service::*;
pub use user::*;
