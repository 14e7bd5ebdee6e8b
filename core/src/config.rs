//! Process configuration read from the environment.

use crate::{Result, TrendError};

pub const DEFAULT_API_BASE_URL: &str = "https://trends.googleapis.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Read-only access to the trends capability.
pub const TRENDS_SCOPE: &str = "https://www.googleapis.com/auth/trends.readonly";

#[derive(Clone)]
pub enum Credentials {
    ServiceAccount {
        client_email: String,
        private_key: String,
    },
    AccessToken(String),
}

// Keeps key material out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::ServiceAccount { client_email, .. } => f
                .debug_struct("ServiceAccount")
                .field("client_email", client_email)
                .finish_non_exhaustive(),
            Credentials::AccessToken(_) => f.write_str("AccessToken(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub api_base_url: String,
    pub token_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credentials = match get("GOOGLE_ACCESS_TOKEN") {
            Some(token) => Credentials::AccessToken(token),
            None => {
                let client_email = get("GOOGLE_CLIENT_EMAIL")
                    .ok_or_else(|| TrendError::Config("GOOGLE_CLIENT_EMAIL is not set".to_string()))?;
                let raw_key = get("GOOGLE_PRIVATE_KEY")
                    .ok_or_else(|| TrendError::Config("GOOGLE_PRIVATE_KEY is not set".to_string()))?;

                Credentials::ServiceAccount {
                    client_email,
                    private_key: unescape_private_key(&raw_key),
                }
            }
        };

        Ok(Self {
            credentials,
            api_base_url: get("TRENDS_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            token_url: get("GOOGLE_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
        })
    }
}

/// Env-provided PEMs carry literal `\n` sequences instead of line breaks.
pub fn unescape_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}
