//! Response decoding.
//!
//! Turns a [`BoxResponse`] into a typed value, or into the error the
//! status code and Box error body describe.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::service::BoxResponse;

/// Error body Box returns on non-2xx responses.
#[derive(Debug, Deserialize)]
struct BoxErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Decode a successful response body, or map a failed one to an error.
pub fn parse<T: DeserializeOwned>(response: &BoxResponse) -> Result<T> {
    if !response.is_success() {
        return Err(error_from(response));
    }
    Ok(serde_json::from_str(&response.body)?)
}

fn error_from(response: &BoxResponse) -> Error {
    let body: Option<BoxErrorBody> = serde_json::from_str(&response.body).ok();
    let code = body.as_ref().and_then(|b| b.code.clone());
    let message = body
        .and_then(|b| b.message)
        .unwrap_or_else(|| response.body.trim().to_string());

    if response.status == 401 {
        Error::Unauthorized { message }
    } else {
        Error::Api {
            status: response.status,
            code,
            message,
        }
    }
}
