use crate::domain_model::{KeyError, SigningMaterial};
use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub cache: Cache,
    pub http: Http,
    pub identity: Identity,
    pub log: Log,
    pub token: Token,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct Cache {
    pub backend: String, // "memory" or "redis"
    #[serde(default)]
    pub redis_url: Option<String>,
    #[serde(default)]
    pub key_prefix: String,
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct Identity {
    pub backend: String, // "fake" or "real"
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[derive(Deserialize)]
pub struct Token {
    pub issuer: String,
    pub audience: String,
    pub access_key: String,
    pub refresh_key: String,
    pub access_lifetime_secs: u64,
    pub refresh_lifetime_secs: u64,
}

// Keys stay out of the startup log.
impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("access_key", &"[hidden]")
            .field("refresh_key", &"[hidden]")
            .field("access_lifetime_secs", &self.access_lifetime_secs)
            .field("refresh_lifetime_secs", &self.refresh_lifetime_secs)
            .finish()
    }
}

impl Token {
    pub fn signing_material(&self) -> Result<SigningMaterial, KeyError> {
        SigningMaterial::new(&self.access_key, &self.refresh_key)
    }

    pub fn access_lifetime(&self) -> Duration {
        Duration::from_secs(self.access_lifetime_secs)
    }

    pub fn refresh_lifetime(&self) -> Duration {
        Duration::from_secs(self.refresh_lifetime_secs)
    }

    pub fn validate(&self) -> Result<()> {
        self.signing_material()?;
        for (name, secs) in [
            ("access_lifetime_secs", self.access_lifetime_secs),
            ("refresh_lifetime_secs", self.refresh_lifetime_secs),
        ] {
            if secs == 0 {
                return Err(anyhow!("{name} must be positive"));
            }
            if secs > MAX_LIFETIME_SECS {
                return Err(anyhow!("{name} must not exceed {MAX_LIFETIME_SECS}"));
            }
        }
        if self.issuer.is_empty() || self.audience.is_empty() {
            return Err(anyhow!("token issuer and audience are required"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub backend: String, // "memory" or "mysql"
    #[serde(default)]
    pub mysql_url: Option<String>,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

const ENV_PREFIX: &str = "IDENTITY";

/// Ten years.
pub const MAX_LIFETIME_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Load settings from a TOML file, then let `IDENTITY__<SECTION>__<KEY>`
/// environment variables override single values (keys, URLs).
pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    settings.token.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> Token {
        Token {
            issuer: "identity".to_string(),
            audience: "clients".to_string(),
            access_key: "access-secret-0123456789".to_string(),
            refresh_key: "refresh-secret-0123456789".to_string(),
            access_lifetime_secs: 300,
            refresh_lifetime_secs: 3600,
        }
    }

    #[test]
    fn valid_token_settings_pass() {
        assert!(token().validate().is_ok());
        assert_eq!(token().access_lifetime(), Duration::from_secs(300));
    }

    #[test]
    fn shared_or_short_keys_fail() {
        let mut shared = token();
        shared.refresh_key = shared.access_key.clone();
        assert!(shared.validate().is_err());

        let mut short = token();
        short.access_key = "tiny".to_string();
        assert!(short.validate().is_err());
    }

    #[test]
    fn zero_lifetime_fails() {
        let mut t = token();
        t.refresh_lifetime_secs = 0;
        assert!(t.validate().is_err());
    }

    #[test]
    fn oversized_lifetime_fails() {
        let mut t = token();
        t.refresh_lifetime_secs = 10_000_000_000_000;
        assert!(t.validate().is_err());

        let mut t = token();
        t.access_lifetime_secs = MAX_LIFETIME_SECS;
        assert!(t.validate().is_ok());
    }

    #[test]
    fn debug_hides_keys() {
        let printed = format!("{:?}", token());
        assert!(!printed.contains("access-secret"));
        assert!(!printed.contains("refresh-secret"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(parse_settings(Some("settings/does-not-exist.toml")).is_err());
    }
}
