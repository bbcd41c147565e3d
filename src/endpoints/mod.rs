//! Endpoint implementations, grouped by resource

pub mod accounts;
pub mod fees;
pub mod orders;
pub mod products;

pub use accounts::AccountEndpoints;
pub use fees::FeeEndpoints;
pub use orders::OrderEndpoints;
pub use products::ProductEndpoints;

use crate::error::{RestError, RestResult};
use serde::de::DeserializeOwned;

/// Decode an HTTP response into a typed entity or a typed error
///
/// Non-2xx responses always become `RestError::Api` carrying the status and
/// the parsed error body. Malformed JSON on a success response becomes
/// `RestError::Parse` rather than a crash.
pub(crate) async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> RestResult<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(RestError::from_error_body(status.as_u16(), &body));
    }

    serde_json::from_str(&body).map_err(|e| RestError::Parse(e.to_string()))
}
