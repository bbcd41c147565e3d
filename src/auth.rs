//! Authentication for Coinbase Advanced Trade endpoints
//!
//! Implements HMAC-SHA256 request signing as required by the brokerage API.
//! The signature covers the exact concatenation
//! `timestamp + method + request_path + body` with no separators, keyed by
//! the raw secret key bytes, hex-encoded lowercase.
//!
//! # Security
//!
//! Secret keys are stored using the `secrecy` crate which:
//! - Zeroizes memory on drop (prevents memory scanning)
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{RestError, RestResult};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the API key
pub const CB_ACCESS_KEY: &str = "CB-ACCESS-KEY";
/// Header carrying the Unix-seconds timestamp the signature was computed at
pub const CB_ACCESS_TIMESTAMP: &str = "CB-ACCESS-TIMESTAMP";
/// Header carrying the hex-encoded request signature
pub const CB_ACCESS_SIGN: &str = "CB-ACCESS-SIGN";

/// API credentials for authenticated requests
///
/// Secret keys are automatically zeroized when the Credentials are dropped,
/// preventing sensitive data from remaining in memory.
pub struct Credentials {
    /// API key (public identifier)
    api_key: String,
    /// Secret key, used as the HMAC key (zeroized on drop)
    secret_key: SecretString,
}

impl Credentials {
    /// Create new credentials from an API key and secret key
    ///
    /// Both are opaque strings issued by the exchange. The secret key is
    /// immediately wrapped in a `SecretString` for secure storage.
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: SecretString::from(secret_key.into()),
        }
    }

    /// Create credentials from environment variables
    ///
    /// Reads `COINBASE_API_KEY` and `COINBASE_API_SECRET` from the environment.
    pub fn from_env() -> RestResult<Self> {
        let api_key = std::env::var("COINBASE_API_KEY")
            .map_err(|_| RestError::EnvVarNotSet("COINBASE_API_KEY".to_string()))?;
        let secret_key = std::env::var("COINBASE_API_SECRET")
            .map_err(|_| RestError::EnvVarNotSet("COINBASE_API_SECRET".to_string()))?;

        Ok(Self::new(api_key, secret_key))
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign a request for the Advanced Trade API
    ///
    /// The message is `timestamp + method + request_path + body` with no
    /// separators. `body` is the exact serialized JSON payload, or the empty
    /// string for bodyless requests. `request_path` excludes the query
    /// string. The result is the lowercase hex HMAC-SHA256 digest.
    pub fn sign(&self, timestamp: &str, method: &str, request_path: &str, body: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret_key.expose_secret().as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(timestamp.as_bytes());
        mac.update(method.as_bytes());
        mac.update(request_path.as_bytes());
        mac.update(body.as_bytes());

        hex::encode(mac.finalize().into_bytes())
    }

    /// Build the authentication headers for a request
    ///
    /// The timestamp is captured here, at header-build time, so the
    /// signature and `CB-ACCESS-TIMESTAMP` always agree.
    pub fn request_headers(&self, method: &str, request_path: &str, body: &str) -> AuthHeaders {
        let timestamp = unix_timestamp();
        let signature = self.sign(&timestamp, method, request_path, body);

        AuthHeaders {
            api_key: self.api_key.clone(),
            timestamp,
            signature,
        }
    }
}

impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            secret_key: SecretString::from(self.secret_key.expose_secret().to_string()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field(
                "api_key",
                &format!("{}...", &self.api_key[..4.min(self.api_key.len())]),
            )
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Current Unix time in whole seconds, as a decimal string
fn unix_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before Unix epoch")
        .as_secs()
        .to_string()
}

/// Authentication headers for a single request
///
/// Together with `accept: application/json` these are exactly the four
/// headers the exchange requires.
#[derive(Debug, Clone)]
pub struct AuthHeaders {
    /// API key for `CB-ACCESS-KEY`
    pub api_key: String,
    /// Timestamp for `CB-ACCESS-TIMESTAMP`
    pub timestamp: String,
    /// Signature for `CB-ACCESS-SIGN`
    pub signature: String,
}

impl AuthHeaders {
    /// Attach the headers to a request builder
    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(reqwest::header::ACCEPT, "application/json")
            .header(CB_ACCESS_KEY, &self.api_key)
            .header(CB_ACCESS_TIMESTAMP, &self.timestamp)
            .header(CB_ACCESS_SIGN, &self.signature)
    }
}
