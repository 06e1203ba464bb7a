use std::fmt;

pub const MIN_KEY_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("{name} must be at least {MIN_KEY_LEN} characters")]
    TooShort { name: &'static str },
    #[error("access and refresh keys must differ")]
    Shared,
}

/// Symmetric HMAC key material.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    pub fn new(name: &'static str, secret: &str) -> Result<Self, KeyError> {
        if secret.chars().count() < MIN_KEY_LEN {
            return Err(KeyError::TooShort { name });
        }
        Ok(SigningKey(secret.as_bytes().to_vec()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey([hidden])")
    }
}

/// Access and refresh tokens are signed with separate keys so that holding
/// one kind of token never lets a client forge the other.
#[derive(Debug, Clone)]
pub struct SigningMaterial {
    access: SigningKey,
    refresh: SigningKey,
}

impl SigningMaterial {
    pub fn new(access_key: &str, refresh_key: &str) -> Result<Self, KeyError> {
        let access = SigningKey::new("access key", access_key)?;
        let refresh = SigningKey::new("refresh key", refresh_key)?;
        if access == refresh {
            return Err(KeyError::Shared);
        }
        Ok(SigningMaterial { access, refresh })
    }

    pub fn access(&self) -> &SigningKey {
        &self.access
    }

    pub fn refresh(&self) -> &SigningKey {
        &self.refresh
    }
}
