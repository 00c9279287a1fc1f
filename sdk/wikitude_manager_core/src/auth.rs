use crate::error::{ManagerError, ManagerResult};
use secrecy::{ExposeSecret, SecretString};

/// Environment variable consulted by [`ManagerToken::from_env`].
pub const TOKEN_ENV_VAR: &str = "WIKITUDE_MANAGER_TOKEN";

/// The Manager API token sent in the `X-Token` header.
///
/// The token is kept in a [`SecretString`] and never printed by `Debug`.
#[derive(Clone)]
pub struct ManagerToken(SecretString);

impl ManagerToken {
    /// Create a token from its string value.
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Read the token from the `WIKITUDE_MANAGER_TOKEN` environment variable.
    pub fn from_env() -> ManagerResult<Self> {
        match std::env::var(TOKEN_ENV_VAR) {
            Ok(token) if !token.is_empty() => Ok(Self::new(token)),
            _ => Err(ManagerError::MissingConfig(format!(
                "token is required. Set it via builder or {TOKEN_ENV_VAR} env var."
            ))),
        }
    }

    /// The header value for `X-Token`.
    pub(crate) fn header_value(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ManagerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ManagerToken(****)")
    }
}
