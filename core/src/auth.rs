//! Bearer tokens for the trends API.
//!
//! [`ServiceAccount`] implements the OAuth 2.0 JWT bearer grant: it signs a
//! short-lived RS256 assertion with the service-account key, exchanges it for
//! an access token and reuses that token until shortly before it expires.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::{Credentials, TRENDS_SCOPE};
use crate::{Result, TrendError};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// A pre-issued token, used as-is for every request.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}


#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS as u64
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

pub struct ServiceAccount {
    http: reqwest::Client,
    client_email: String,
    key: EncodingKey,
    token_url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccount {
    /// Parses the PEM key up front so a bad key fails before any request.
    pub fn new(http: reqwest::Client, client_email: String, private_key_pem: &str, token_url: String) -> Result<Self> {
        let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| TrendError::Config(format!("invalid service-account private key: {e}")))?;

        Ok(Self {
            http,
            client_email,
            key,
            token_url,
            cached: Mutex::new(None),
        })
    }

    fn assertion(&self) -> Result<String> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            iss: &self.client_email,
            scope: TRENDS_SCOPE,
            aud: &self.token_url,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        Ok(jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.key)?)
    }

    async fn exchange(&self) -> Result<TokenResponse> {
        let assertion = self.assertion()?;

        let res = self.http.post(&self.token_url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(TrendError::Auth(format!("token endpoint returned {status}: {body}")));
        }

        Ok(res.json::<TokenResponse>().await?)
    }
}

#[async_trait]
impl TokenSource for ServiceAccount {
    async fn access_token(&self) -> Result<String> {
        // Held across the exchange so concurrent callers wait for one refresh.
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        tracing::debug!(client_email = %self.client_email, "exchanging service-account assertion");
        let issued = self.exchange().await?;

        let lifetime = Duration::from_secs(issued.expires_in).saturating_sub(EXPIRY_MARGIN);
        let refresh_at = Instant::now()
            .checked_add(lifetime)
            .ok_or_else(|| TrendError::Auth(format!("token lifetime out of range: expires_in = {}", issued.expires_in)))?;

        *cached = Some(CachedToken {
            value: issued.access_token.clone(),
            refresh_at,
        });

        Ok(issued.access_token)
    }
}

/// Picks the token source matching the configured credentials.
pub fn token_source(http: reqwest::Client, credentials: &Credentials, token_url: &str) -> Result<Box<dyn TokenSource>> {
    match credentials {
        Credentials::AccessToken(token) => Ok(Box::new(StaticToken(token.clone()))),
        Credentials::ServiceAccount { client_email, private_key } => Ok(Box::new(ServiceAccount::new(
            http,
            client_email.clone(),
            private_key,
            token_url.to_string(),
        )?)),
    }
}
