//! Decoding of the interpreter's JSON output.

use log::{debug, warn};
use serde::Deserialize;
use waypost_core::RawElement;

use super::error::QueryError;

/// Top-level `[out:json]` document.
///
/// Only `elements` is required. The service reports evaluation problems
/// (for example a query that hit its own timeout) through `remark` while
/// still answering `200 OK`.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    /// Elements in service order.
    pub elements: Vec<RawElement>,
    /// Diagnostic text from the interpreter, if any.
    #[serde(default)]
    pub remark: Option<String>,
}

/// Decode `body` into raw elements.
///
/// # Errors
///
/// Returns [`QueryError::MalformedResponse`] when the body is not a JSON
/// document with an `elements` list, or when the interpreter reports a
/// runtime error in `remark`.
pub fn decode_elements(body: &str) -> Result<Vec<RawElement>, QueryError> {
    let response: OverpassResponse =
        serde_json::from_str(body).map_err(|err| QueryError::MalformedResponse {
            message: err.to_string(),
        })?;
    if let Some(remark) = response.remark.as_deref() {
        if remark.contains("runtime error") {
            return Err(QueryError::MalformedResponse {
                message: remark.to_owned(),
            });
        }
        warn!("Overpass remark: {remark}");
    }
    debug!("Decoded {} Overpass elements", response.elements.len());
    Ok(response.elements)
}
