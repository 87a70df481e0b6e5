//! Simulated user session.
//!
//! There is no authentication: `login` waits for a configurable delay and
//! then signs in the mock user whatever the credentials.

mod profile;

pub use profile::{Profile, ProfileEditor};

use crate::ids::{SessionId, UserId};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Delay used when no other is configured.
pub const DEFAULT_LOGIN_DELAY: Duration = Duration::from_millis(1000);

/// A signed-in customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl User {
    /// Initials for an avatar placeholder, e.g. "JD".
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect::<String>()
            .to_uppercase()
    }
}

/// The current browsing session.
#[derive(Debug, Clone)]
pub struct UserSession {
    id: SessionId,
    user: Option<User>,
    loading: bool,
    login_delay: Duration,
    account: User,
}

impl UserSession {
    /// A signed-out session that will sign in as `account`.
    pub fn new(account: User, login_delay: Duration) -> Self {
        Self {
            id: SessionId::generate(),
            user: None,
            loading: false,
            login_delay,
            account,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// The signed-in user, if any.
    pub fn current(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// True while a login is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Simulate a sign-in round trip. Credentials are not checked.
    pub async fn login(&mut self, email: &str, _password: &str) -> &User {
        self.loading = true;
        tokio::time::sleep(self.login_delay).await;
        self.loading = false;
        info!(session_id = %self.id, requested_email = email, user_id = %self.account.id, "user signed in");
        self.user.insert(self.account.clone())
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(session_id = %self.id, user_id = %user.id, "user signed out");
        }
    }
}
