//! Connector configuration.

use std::fmt;

use crate::{auth::Credentials, submit::SenderError};

/// Default bloXroute cloud websocket endpoint.
pub const CLOUD_WS_URL: &str = "wss://api.blxrbdn.com/ws";

/// Environment variable holding the account identifier.
pub const ENV_ACCOUNT_ID: &str = "BLXR_ACCOUNT_ID";
/// Environment variable holding the secret hash.
pub const ENV_SECRET_HASH: &str = "BLXR_SECRET_HASH";
/// Environment variable overriding the websocket endpoint.
pub const ENV_WS_URL: &str = "BLXR_WS_URL";
/// Environment variable toggling server certificate verification.
pub const ENV_TLS_VERIFY: &str = "BLXR_TLS_VERIFY";

/// Server certificate verification policy for `wss` endpoints.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum TlsVerification {
    /// Verify the server chain against the bundled webpki roots.
    #[default]
    Verified,
    /// Accept any server certificate. Handshake signatures are still checked.
    Disabled,
}

impl TlsVerification {
    /// Returns true when certificates are verified.
    #[must_use]
    pub const fn is_verified(self) -> bool {
        matches!(self, Self::Verified)
    }
}

impl fmt::Display for TlsVerification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verified => f.write_str("verified"),
            Self::Disabled => f.write_str("disabled"),
        }
    }
}

/// Settings applied before a [`crate::TxSender`] dials the relay.
///
/// Fields are public so the struct can be written as a literal; the `with_*` methods apply the
/// same settings in builder style. Nothing is validated until connect time.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct SenderConfig {
    /// Account identifier. Required.
    pub account_id: String,
    /// Secret hash. Required.
    pub secret_hash: String,
    /// Websocket endpoint. `None` or empty selects [`CLOUD_WS_URL`].
    pub url: Option<String>,
    /// Certificate verification policy.
    pub tls_verification: TlsVerification,
}

impl SenderConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the account identifier.
    #[must_use]
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = account_id.into();
        self
    }

    /// Sets the secret hash.
    #[must_use]
    pub fn with_secret_hash(mut self, secret_hash: impl Into<String>) -> Self {
        self.secret_hash = secret_hash.into();
        self
    }

    /// Sets the websocket endpoint.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the certificate verification policy.
    #[must_use]
    pub const fn with_tls_verification(mut self, tls_verification: TlsVerification) -> Self {
        self.tls_verification = tls_verification;
        self
    }

    /// Loads settings from `BLXR_*` process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads settings through `lookup`, which maps a variable name to its value.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let tls_verification = if read_bool(&lookup, ENV_TLS_VERIFY, true) {
            TlsVerification::Verified
        } else {
            TlsVerification::Disabled
        };
        Self {
            account_id: lookup(ENV_ACCOUNT_ID).unwrap_or_default(),
            secret_hash: lookup(ENV_SECRET_HASH).unwrap_or_default(),
            url: lookup(ENV_WS_URL).filter(|value| !value.trim().is_empty()),
            tls_verification,
        }
    }

    /// Validates and returns the credentials.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::Configuration`] when the account identifier or secret is empty.
    pub fn credentials(&self) -> Result<Credentials, SenderError> {
        Credentials::new(self.account_id.as_str(), self.secret_hash.as_str())
    }

    /// Returns the endpoint to dial.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(CLOUD_WS_URL)
    }
}

impl fmt::Debug for SenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenderConfig")
            .field("account_id", &self.account_id)
            .field("secret_hash", &"<redacted>")
            .field("url", &self.url)
            .field("tls_verification", &self.tls_verification)
            .finish()
    }
}

/// Reads a boolean flag. Accepts `1`/`true`/`yes`/`on` and `0`/`false`/`no`/`off` in any case;
/// anything else keeps `default`.
fn read_bool<F>(lookup: &F, name: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(name) else {
        return default;
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            tracing::warn!(
                variable = name,
                value = %value,
                default,
                "unrecognized boolean value; keeping default"
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn endpoint_defaults_to_cloud_url() {
        assert_eq!(SenderConfig::new().endpoint(), CLOUD_WS_URL);
        assert_eq!(SenderConfig::new().with_url("").endpoint(), CLOUD_WS_URL);
    }

    #[test]
    fn explicit_url_overrides_default() {
        let config = SenderConfig::new().with_url("wss://relay.example:1809/ws");
        assert_eq!(config.endpoint(), "wss://relay.example:1809/ws");
    }

    #[test]
    fn verification_is_on_by_default() {
        assert_eq!(
            SenderConfig::default().tls_verification,
            TlsVerification::Verified
        );
    }

    #[test]
    fn env_lookup_populates_all_fields() {
        let config = SenderConfig::from_lookup(lookup_from(&[
            (ENV_ACCOUNT_ID, "account"),
            (ENV_SECRET_HASH, "secret"),
            (ENV_WS_URL, "ws://127.0.0.1:9000/ws"),
            (ENV_TLS_VERIFY, "Off"),
        ]));
        assert_eq!(config.account_id, "account");
        assert_eq!(config.secret_hash, "secret");
        assert_eq!(config.endpoint(), "ws://127.0.0.1:9000/ws");
        assert_eq!(config.tls_verification, TlsVerification::Disabled);
    }

    #[test]
    fn env_lookup_keeps_defaults_when_unset() {
        let config = SenderConfig::from_lookup(lookup_from(&[(ENV_WS_URL, "  ")]));
        assert!(config.account_id.is_empty());
        assert_eq!(config.url, None);
        assert_eq!(config.endpoint(), CLOUD_WS_URL);
        assert!(config.tls_verification.is_verified());
        assert!(config.credentials().is_err());
    }

    #[test]
    fn env_lookup_accepts_explicit_true_and_false_words() {
        for value in ["0", "false", "NO", " off "] {
            let config = SenderConfig::from_lookup(lookup_from(&[(ENV_TLS_VERIFY, value)]));
            assert_eq!(config.tls_verification, TlsVerification::Disabled, "{value}");
        }
        for value in ["1", "True", "yes", "ON"] {
            let config = SenderConfig::from_lookup(lookup_from(&[(ENV_TLS_VERIFY, value)]));
            assert_eq!(config.tls_verification, TlsVerification::Verified, "{value}");
        }
    }

    #[test]
    fn unrecognized_tls_flag_keeps_verification_on() {
        for value in ["ture", "enabled", "verify", "y", ""] {
            let config = SenderConfig::from_lookup(lookup_from(&[(ENV_TLS_VERIFY, value)]));
            assert_eq!(config.tls_verification, TlsVerification::Verified, "{value}");
        }
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = SenderConfig::new()
            .with_account_id("account")
            .with_secret_hash("super-secret");
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
