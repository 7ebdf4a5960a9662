use std::sync::{Arc, Mutex};

use time::{Duration, OffsetDateTime};

/// Reference clock for every time comparison in the core.
///
/// Constructed once by the process entry point and handed to the components
/// that need it. Tests use [`Clock::fixed`] to pin "now" to a known instant.
#[derive(Clone)]
pub struct Clock(Arc<ClockSource>);

enum ClockSource {
    System,
    Fixed(Mutex<OffsetDateTime>),
}

impl Clock {
    pub fn system() -> Self {
        Clock(Arc::new(ClockSource::System))
    }

    pub fn fixed(now: OffsetDateTime) -> Self {
        Clock(Arc::new(ClockSource::Fixed(Mutex::new(now))))
    }

    pub fn now(&self) -> OffsetDateTime {
        match &*self.0 {
            ClockSource::System => OffsetDateTime::now_utc(),
            ClockSource::Fixed(now) => *now.lock().unwrap(),
        }
    }

    /// Move a fixed clock forward. No effect on a system clock.
    pub fn advance(&self, by: Duration) {
        if let ClockSource::Fixed(now) = &*self.0 {
            *now.lock().unwrap() += by;
        }
    }
}

impl std::fmt::Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &*self.0 {
            ClockSource::System => f.write_str("Clock::System"),
            ClockSource::Fixed(now) => write!(f, "Clock::Fixed({})", now.lock().unwrap()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn fixed_clock_reports_pinned_instant() {
        let clock = Clock::fixed(datetime!(2025-06-01 12:00 UTC));
        assert_eq!(clock.now(), datetime!(2025-06-01 12:00 UTC));
    }

    #[test]
    fn advance_moves_fixed_clock() {
        let clock = Clock::fixed(datetime!(2025-06-01 12:00 UTC));
        clock.advance(Duration::hours(2));
        assert_eq!(clock.now(), datetime!(2025-06-01 14:00 UTC));
    }

    #[test]
    fn clones_share_the_same_source() {
        let clock = Clock::fixed(datetime!(2025-06-01 12:00 UTC));
        let other = clock.clone();
        clock.advance(Duration::minutes(30));
        assert_eq!(other.now(), datetime!(2025-06-01 12:30 UTC));
    }
}
