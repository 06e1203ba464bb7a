use crate::domain_model::*;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error("token expired")]
    Expired,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Payload read from a token without checking its signature or lifetime.
#[derive(Debug, Clone)]
pub struct DecodedToken {
    pub claims: BTreeMap<String, String>,
    pub expires_at: DateTime<Utc>,
}

impl DecodedToken {
    pub fn login(&self) -> Option<&str> {
        self.claims.get(SUBJECT_CLAIM).map(String::as_str)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

pub trait TokenSigner: Send + Sync {
    fn issue(
        &self,
        claims: &ClaimSet,
        not_before: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        key: &SigningKey,
    ) -> Result<String, SignerError>;

    fn decode_unverified(&self, token: &str) -> Result<DecodedToken, SignerError>;

    fn verify(&self, token: &str, key: &SigningKey) -> Result<ClaimSet, SignerError>;
}
