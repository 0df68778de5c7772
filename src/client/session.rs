use chrono::{DateTime, Utc};

use crate::auth::AuthResponse;
use crate::models::UserSummary;

/// Token state of one signed-in user. Passed to every authenticated
/// `ApiClient` call and cleared when the server answers 401.
#[derive(Debug, Clone, Default)]
pub struct ClientSession {
    token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    user: Option<UserSummary>,
}

impl ClientSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the token and account returned by login or registration.
    pub fn issue(&mut self, response: AuthResponse) {
        self.token = Some(response.token);
        self.expires_at = Some(response.expires_at);
        self.user = Some(response.user);
    }

    /// Replaces the token after a refresh. The account summary is taken from
    /// the response so role or name changes show up.
    pub fn refresh(&mut self, response: AuthResponse) {
        self.issue(response);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn user(&self) -> Option<&UserSummary> {
        self.user.as_ref()
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.map_or(true, |at| at <= Utc::now())
    }

    /// `Authorization` header value, if a live token is held.
    pub fn bearer(&self) -> Option<String> {
        match &self.token {
            Some(token) if !self.is_expired() => Some(format!("Bearer {}", token)),
            _ => None,
        }
    }
}
