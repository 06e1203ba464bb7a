use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const SUBJECT_CLAIM: &str = "sub";

/// Claims the signer writes itself; a claim set may not carry them.
pub const REGISTERED_CLAIMS: [&str; 5] = ["iss", "aud", "nbf", "exp", "jti"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimSetError {
    #[error("claim set has no subject")]
    MissingSubject,
    #[error("claim `{0}` is reserved")]
    Reserved(String),
}

/// Identity facts embedded in both access and refresh tokens.
///
/// Always holds a `sub` claim carrying the login. Claims are kept in name
/// order so two sets with the same content encode the same payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct ClaimSet(BTreeMap<String, String>);

impl ClaimSet {
    pub fn new(login: impl Into<String>) -> Self {
        let mut claims = BTreeMap::new();
        claims.insert(SUBJECT_CLAIM.to_string(), login.into());
        ClaimSet(claims)
    }

    pub fn with_claim(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ClaimSetError> {
        let name = name.into();
        if REGISTERED_CLAIMS.contains(&name.as_str()) {
            return Err(ClaimSetError::Reserved(name));
        }
        self.0.insert(name, value.into());
        Ok(self)
    }

    pub fn login(&self) -> &str {
        // present by construction
        self.0.get(SUBJECT_CLAIM).map(String::as_str).unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<BTreeMap<String, String>> for ClaimSet {
    type Error = ClaimSetError;

    fn try_from(claims: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        if !claims.contains_key(SUBJECT_CLAIM) {
            return Err(ClaimSetError::MissingSubject);
        }
        if let Some(name) = REGISTERED_CLAIMS.iter().find(|c| claims.contains_key(**c)) {
            return Err(ClaimSetError::Reserved(name.to_string()));
        }
        Ok(ClaimSet(claims))
    }
}

impl From<ClaimSet> for BTreeMap<String, String> {
    fn from(claims: ClaimSet) -> Self {
        claims.0
    }
}

impl fmt::Display for ClaimSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.login())
    }
}
