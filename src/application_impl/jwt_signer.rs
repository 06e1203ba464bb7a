use crate::domain_model::*;
use crate::domain_port::{DecodedToken, SignerError, TokenSigner};
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize)]
struct TokenPayload {
    iss: String,
    aud: String,
    nbf: i64,
    exp: i64,
    jti: String,
    #[serde(flatten)]
    claims: BTreeMap<String, String>,
}

// Only `exp` is required to read an untrusted token; everything else that is
// a string ends up in the claim map.
#[derive(Debug, Deserialize)]
struct UnverifiedPayload {
    exp: i64,
    #[serde(flatten)]
    rest: BTreeMap<String, serde_json::Value>,
}

/// HS256 compact JWS tokens carrying `iss`, `aud`, `nbf`, `exp` and the claim
/// set. Keys are supplied per call so one signer serves both token kinds.
///
/// Every token also gets a random `jti`, so two tokens minted for the same
/// login within the same second still differ.
#[derive(Debug, Clone)]
pub struct JwtHs256Signer {
    issuer: String,
    audience: String,
}

impl JwtHs256Signer {
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        JwtHs256Signer {
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    #[inline]
    fn new_jti() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn verifying_validation(&self) -> Validation {
        let mut v = Validation::new(Algorithm::HS256);
        v.leeway = 0;
        v.validate_exp = true;
        v.validate_nbf = true;
        v.set_issuer(&[self.issuer.as_str()]);
        v.set_audience(&[self.audience.as_str()]);
        v.set_required_spec_claims(&["exp", "nbf", "iss", "aud", "sub"]);
        v
    }

    fn unverified_validation() -> Validation {
        let mut v = Validation::new(Algorithm::HS256);
        v.insecure_disable_signature_validation();
        v.validate_exp = false;
        v.validate_nbf = false;
        v.validate_aud = false;
        v.required_spec_claims.clear();
        v
    }
}

fn to_instant(secs: i64) -> Result<DateTime<Utc>, SignerError> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| SignerError::Malformed(format!("timestamp out of range: {secs}")))
}

fn map_decode_error(e: jsonwebtoken::errors::Error) -> SignerError {
    match e.kind() {
        ErrorKind::ExpiredSignature => SignerError::Expired,
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::MissingRequiredClaim(_) => SignerError::Malformed(e.to_string()),
        _ => SignerError::InvalidSignature,
    }
}

impl TokenSigner for JwtHs256Signer {
    fn issue(
        &self,
        claims: &ClaimSet,
        not_before: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        key: &SigningKey,
    ) -> Result<String, SignerError> {
        let payload = TokenPayload {
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            nbf: not_before.timestamp(),
            exp: expires_at.timestamp(),
            jti: Self::new_jti(),
            claims: claims.clone().into(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .map_err(|e| SignerError::Encoding(e.to_string()))
    }

    fn decode_unverified(&self, token: &str) -> Result<DecodedToken, SignerError> {
        let data = decode::<UnverifiedPayload>(
            token,
            &DecodingKey::from_secret(&[]),
            &Self::unverified_validation(),
        )
        .map_err(|e| SignerError::Malformed(e.to_string()))?;

        let UnverifiedPayload { exp, rest } = data.claims;
        let claims = rest
            .into_iter()
            .filter(|(name, _)| !REGISTERED_CLAIMS.contains(&name.as_str()))
            .filter_map(|(name, value)| match value {
                serde_json::Value::String(s) => Some((name, s)),
                _ => None,
            })
            .collect();

        Ok(DecodedToken {
            claims,
            expires_at: to_instant(exp)?,
        })
    }

    fn verify(&self, token: &str, key: &SigningKey) -> Result<ClaimSet, SignerError> {
        let data = decode::<TokenPayload>(
            token,
            &DecodingKey::from_secret(key.as_bytes()),
            &self.verifying_validation(),
        )
        .map_err(map_decode_error)?;

        ClaimSet::try_from(data.claims.claims).map_err(|e| SignerError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn signer() -> JwtHs256Signer {
        JwtHs256Signer::new("identity.test", "identity.clients")
    }

    fn keys() -> SigningMaterial {
        SigningMaterial::new("access-secret-0123456789", "refresh-secret-0123456789").unwrap()
    }

    fn issue_for(login: &str, lifetime: Duration, key: &SigningKey) -> String {
        let now = Utc::now();
        signer()
            .issue(&ClaimSet::new(login), now, now + lifetime, key)
            .expect("issue")
    }

    #[test]
    fn issued_token_is_three_base64url_segments() {
        let keys = keys();
        let token = issue_for("alice", Duration::minutes(5), keys.access());
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| !p.is_empty()
            && p.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')));
    }

    #[test]
    fn verify_returns_the_issued_claims() {
        let keys = keys();
        let claims = ClaimSet::new("alice")
            .with_claim("email", "alice@example.com")
            .unwrap();
        let now = Utc::now();
        let token = signer()
            .issue(&claims, now, now + Duration::minutes(5), keys.access())
            .unwrap();

        let verified = signer().verify(&token, keys.access()).unwrap();
        assert_eq!(verified, claims);
    }

    #[test]
    fn payload_carries_registered_claims() {
        let keys = keys();
        let now = Utc::now();
        let exp = now + Duration::minutes(5);
        let token = signer()
            .issue(&ClaimSet::new("alice"), now, exp, keys.access())
            .unwrap();

        let decoded = signer().decode_unverified(&token).unwrap();
        assert_eq!(decoded.login(), Some("alice"));
        assert_eq!(decoded.expires_at.timestamp(), exp.timestamp());
        assert!(!decoded.claims.contains_key("iss"));
        assert!(!decoded.claims.contains_key("exp"));
    }

    #[test]
    fn same_claims_same_second_give_distinct_tokens() {
        let keys = keys();
        let now = Utc::now();
        let exp = now + Duration::minutes(5);
        let claims = ClaimSet::new("alice");
        let a = signer().issue(&claims, now, exp, keys.refresh()).unwrap();
        let b = signer().issue(&claims, now, exp, keys.refresh()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn expired_token_fails_verification() {
        let keys = keys();
        let token = issue_for("alice", Duration::seconds(-1), keys.access());
        assert!(matches!(
            signer().verify(&token, keys.access()),
            Err(SignerError::Expired)
        ));
    }

    #[test]
    fn expired_token_with_foreign_key_fails_too() {
        let keys = keys();
        let token = issue_for("alice", Duration::seconds(-1), keys.refresh());
        assert!(signer().verify(&token, keys.access()).is_err());
    }

    #[test]
    fn keys_are_isolated() {
        let keys = keys();
        let access = issue_for("alice", Duration::minutes(5), keys.access());
        let refresh = issue_for("alice", Duration::minutes(5), keys.refresh());

        assert!(matches!(
            signer().verify(&refresh, keys.access()),
            Err(SignerError::InvalidSignature)
        ));
        assert!(matches!(
            signer().verify(&access, keys.refresh()),
            Err(SignerError::InvalidSignature)
        ));
    }

    #[test]
    fn tampered_token_fails_verification() {
        let keys = keys();
        let token = issue_for("alice", Duration::minutes(5), keys.access());
        let tampered = format!("{}X", token);
        assert!(signer().verify(&tampered, keys.access()).is_err());
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let keys = keys();
        let token = issue_for("alice", Duration::minutes(5), keys.access());
        let other = JwtHs256Signer::new("someone.else", "identity.clients");
        assert!(matches!(
            other.verify(&token, keys.access()),
            Err(SignerError::InvalidSignature)
        ));
    }

    #[test]
    fn decode_unverified_ignores_signature_and_expiry() {
        let foreign = SigningKey::new("k", "not-our-key-at-all-000").unwrap();
        let token = issue_for("alice", Duration::seconds(-30), &foreign);

        let decoded = signer().decode_unverified(&token).unwrap();
        assert_eq!(decoded.login(), Some("alice"));
        assert!(decoded.is_expired_at(Utc::now()));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            signer().decode_unverified("not-a-token"),
            Err(SignerError::Malformed(_))
        ));
        assert!(matches!(
            signer().decode_unverified("invalid.token.here"),
            Err(SignerError::Malformed(_))
        ));
    }
}
