use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use secrecy::ExposeSecret;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::clock::Clock;
use crate::config::LatencyConfig;
use crate::error::{CoreError, CoreResult};
use crate::models::{Credentials, SignUp, User, UserRole};
use crate::registry::Registry;

/// Session state transition pushed to subscribers.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    SignedIn(User),
    SignedOut,
}

type Callback = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

/// Subscription-id to callback map with deterministic insertion order.
#[derive(Default)]
struct Subscribers {
    entries: Vec<(u64, Callback)>,
    next_id: u64,
}

/// Holds at most one authenticated identity and broadcasts every transition.
///
/// Mutating calls simulate a network round trip before touching state; the
/// delay comes from [`LatencyConfig`] and is zero in tests.
pub struct SessionStore {
    registry: Arc<Registry>,
    clock: Clock,
    latency: LatencyConfig,
    current: Mutex<Option<User>>,
    subscribers: Arc<Mutex<Subscribers>>,
}

/// Token returned by [`SessionStore::subscribe`]; deregisters on
/// [`SessionSubscription::cancel`]. Other subscribers are unaffected.
pub struct SessionSubscription {
    id: u64,
    subscribers: Weak<Mutex<Subscribers>>,
}

impl SessionSubscription {
    pub fn cancel(self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            let mut subscribers = subscribers.lock().unwrap();
            subscribers.entries.retain(|(id, _)| *id != self.id);
        }
    }
}

impl SessionStore {
    pub fn new(registry: Arc<Registry>, clock: Clock, latency: LatencyConfig) -> Self {
        SessionStore {
            registry,
            clock,
            latency,
            current: Mutex::new(None),
            subscribers: Arc::new(Mutex::new(Subscribers::default())),
        }
    }

    /// Authenticate against the stored credentials. Both email and password
    /// must match exactly; on failure the current identity is untouched.
    pub async fn sign_in(&self, credentials: Credentials) -> CoreResult<User> {
        self.simulate_round_trip(self.latency.auth).await;
        credentials.validate()?;

        if !self
            .registry
            .password_matches(&credentials.email, credentials.password.expose_secret())
        {
            return Err(CoreError::InvalidCredentials);
        }
        let user = self
            .registry
            .user_by_email(&credentials.email)
            .ok_or(CoreError::InvalidCredentials)?;

        *self.current.lock().unwrap() = Some(user.clone());
        info!(user = %user.id, email = %user.email, "signed in");
        self.notify(&SessionEvent::SignedIn(user.clone()));
        Ok(user)
    }

    /// Register a new client-role identity and sign it in.
    pub async fn sign_up(&self, sign_up: SignUp) -> CoreResult<User> {
        self.simulate_round_trip(self.latency.auth).await;
        sign_up.validate()?;

        if self.registry.user_by_email(&sign_up.email).is_some() {
            return Err(CoreError::UserExists {
                email: sign_up.email,
            });
        }

        let user = User {
            id: Uuid::now_v7(),
            email: sign_up.email,
            display_name: sign_up.display_name,
            role: UserRole::Client,
            is_public: true,
            hourly_rate_cents: None,
            avatar_url: None,
            location: None,
            bio: None,
            created_at: self.clock.now(),
        };
        self.registry.insert_user(user.clone());
        self.registry
            .set_password(&user.email, sign_up.password.expose_secret());

        *self.current.lock().unwrap() = Some(user.clone());
        info!(user = %user.id, email = %user.email, "signed up");
        self.notify(&SessionEvent::SignedIn(user.clone()));
        Ok(user)
    }

    pub async fn sign_out(&self) {
        self.simulate_round_trip(self.latency.sign_out).await;
        if let Some(user) = self.current.lock().unwrap().take() {
            info!(user = %user.id, "signed out");
        }
        self.notify(&SessionEvent::SignedOut);
    }

    pub fn current_user(&self) -> Option<User> {
        self.current.lock().unwrap().clone()
    }

    pub(crate) fn require_user(&self) -> CoreResult<User> {
        self.current_user().ok_or(CoreError::Unauthenticated)
    }

    /// Register a callback for every future transition. Callbacks run in
    /// subscription order.
    pub fn subscribe(
        &self,
        callback: impl Fn(&SessionEvent) + Send + Sync + 'static,
    ) -> SessionSubscription {
        let mut subscribers = self.subscribers.lock().unwrap();
        let id = subscribers.next_id;
        subscribers.next_id += 1;
        subscribers.entries.push((id, Arc::new(callback)));
        SessionSubscription {
            id,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    // Callbacks are invoked without holding the lock so they may subscribe
    // or cancel; a subscriber removed mid-delivery is skipped.
    fn notify(&self, event: &SessionEvent) {
        let snapshot: Vec<(u64, Callback)> = self.subscribers.lock().unwrap().entries.clone();
        for (id, callback) in snapshot {
            let still_registered = self
                .subscribers
                .lock()
                .unwrap()
                .entries
                .iter()
                .any(|(entry_id, _)| *entry_id == id);
            if still_registered {
                callback(event);
            }
        }
    }

    async fn simulate_round_trip(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
