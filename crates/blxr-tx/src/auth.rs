//! Account credentials attached to the websocket upgrade request.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};

use crate::submit::SenderError;

/// Validated account identifier and secret hash.
///
/// Both values are non-empty once constructed. The secret never appears in `Debug` output.
#[derive(Clone, Eq, PartialEq)]
pub struct Credentials {
    /// Account identifier issued by the relay operator.
    account_id: String,
    /// Secret hash paired with the account identifier.
    secret_hash: String,
}

impl Credentials {
    /// Creates credentials from an account identifier and secret hash.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::Configuration`] when the account identifier is empty, or when it
    /// is present but the secret hash is empty.
    pub fn new(
        account_id: impl Into<String>,
        secret_hash: impl Into<String>,
    ) -> Result<Self, SenderError> {
        let account_id = account_id.into();
        let secret_hash = secret_hash.into();
        if account_id.is_empty() {
            return Err(SenderError::Configuration {
                message: "account id is unset".to_owned(),
            });
        }
        if secret_hash.is_empty() {
            return Err(SenderError::Configuration {
                message: "secret hash is unset".to_owned(),
            });
        }
        Ok(Self {
            account_id,
            secret_hash,
        })
    }

    /// Returns the account identifier.
    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Returns the `Authorization` header value: base64 of `account_id:secret_hash`.
    ///
    /// The relay expects the bare encoded value, without a `Basic ` scheme prefix.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        BASE64_STANDARD.encode(format!("{}:{}", self.account_id, self.secret_hash))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("secret_hash", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_base64_of_joined_pair() {
        let credentials = Credentials::new("A", "B");
        assert!(credentials.is_ok());
        if let Ok(credentials) = credentials {
            assert_eq!(credentials.authorization_header(), "QTpC");
            assert_eq!(
                credentials.authorization_header(),
                BASE64_STANDARD.encode("A:B")
            );
        }
    }

    #[test]
    fn empty_account_id_is_rejected_first() {
        let result = Credentials::new("", "");
        assert!(matches!(
            result,
            Err(SenderError::Configuration { ref message }) if message == "account id is unset"
        ));
    }

    #[test]
    fn empty_secret_hash_is_rejected() {
        let result = Credentials::new("account", "");
        assert!(matches!(
            result,
            Err(SenderError::Configuration { ref message }) if message == "secret hash is unset"
        ));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let credentials = Credentials::new("account", "super-secret");
        assert!(credentials.is_ok());
        if let Ok(credentials) = credentials {
            let rendered = format!("{credentials:?}");
            assert!(rendered.contains("account"));
            assert!(!rendered.contains("super-secret"));
        }
    }
}
