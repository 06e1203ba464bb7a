use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `now + lifetime`, or `None` when the instant is past what chrono can hold.
pub fn expiry_after(now: DateTime<Utc>, lifetime: Duration) -> Option<DateTime<Utc>> {
    TimeDelta::from_std(lifetime)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken(pub String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl RefreshToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An access/refresh pair minted together. Serialized as the client sees it,
/// with the access expiry in Unix seconds.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    #[serde(rename = "expires", with = "chrono::serde::ts_seconds")]
    pub access_expires_at: DateTime<Utc>,
}

/// The single refresh token currently accepted for a login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRecord {
    pub login: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl RefreshRecord {
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn matches(&self, presented: &str) -> bool {
        self.token.as_bytes() == presented.as_bytes()
    }
}
