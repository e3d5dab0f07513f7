//! Facade crate for the Waypost engine.
//!
//! Waypost fetches points of interest around a coordinate from an Overpass
//! interpreter, classifies each element into a fixed set of categories and
//! discards anything unnamed, route-like or unclassifiable.
//!
//! [`fetch_poi`] is the one-call entry point. [`fetch_poi_with`] accepts a
//! prepared [`OverpassClient`], which is how callers swap the endpoint or
//! inject test doubles.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! let pois = waypost_engine::fetch_poi(23.711, 120.545, 2_000, 3, Duration::from_secs(5))?;
//! for poi in &pois {
//!     println!("{} ({})", poi.name(), poi.category());
//! }
//! # Ok::<(), waypost_engine::FetchError>(())
//! ```

#![forbid(unsafe_code)]

use std::time::Duration;

use log::info;
use thiserror::Error;

pub use waypost_core::{
    Category, Classifier, ElementKind, NormalizedPoi, QueryRequest, QueryRequestValidationError,
    RawElement, Rejection, Rule, RuleSet, TagMatcher, Tags, classify_and_filter,
};
pub use waypost_data::overpass::{
    ClientBuildError, HttpTransport, OverpassClient, OverpassClientConfig, QueryError,
    QueryTemplate, QueryTransport, Sleeper, ThreadSleeper, TransportError,
};

/// Errors raised by [`fetch_poi`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// Coordinates, radius or backoff were rejected before any request.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] QueryRequestValidationError),
    /// The HTTP client could not be constructed.
    #[error("failed to build Overpass client: {0}")]
    BuildClient(#[from] ClientBuildError),
    /// The query failed after the retry protocol ran its course.
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Fetch named, classified points of interest around `(lat, lon)`.
///
/// Uses the public Overpass endpoint with default client settings. Up to
/// `max_retries` attempts are made; gateway timeouts and network faults are
/// retried after `backoff * attempt`.
///
/// # Errors
///
/// Returns [`FetchError::InvalidRequest`] for out-of-range input,
/// [`FetchError::BuildClient`] if the HTTP stack cannot start, and
/// [`FetchError::Query`] when the service fails or answers with something
/// other than an element document.
pub fn fetch_poi(
    lat: f64,
    lon: f64,
    radius_metres: u32,
    max_retries: u32,
    backoff: Duration,
) -> Result<Vec<NormalizedPoi>, FetchError> {
    let request = QueryRequest::new(lat, lon, radius_metres, max_retries, backoff)?;
    let client = OverpassClient::new(&OverpassClientConfig::default())?;
    fetch_poi_with(&client, &request).map_err(FetchError::from)
}

/// Fetch and classify points of interest through `client`.
///
/// # Errors
///
/// Propagates the [`QueryError`] from [`OverpassClient::execute`].
pub fn fetch_poi_with<T, S>(
    client: &OverpassClient<T, S>,
    request: &QueryRequest,
) -> Result<Vec<NormalizedPoi>, QueryError>
where
    T: QueryTransport,
    S: Sleeper,
{
    let elements = client.execute(request)?;
    let total = elements.len();
    let pois = classify_and_filter(elements);
    info!(
        "Fetched {} points of interest from {total} elements around ({}, {})",
        pois.len(),
        request.latitude(),
        request.longitude()
    );
    Ok(pois)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use waypost_data::overpass::test_support::{RecordingSleeper, ScriptedTransport};

    #[rstest]
    #[case(91.0, 0.0)]
    #[case(0.0, -181.0)]
    #[case(f64::NAN, 0.0)]
    fn invalid_coordinates_fail_before_any_request(#[case] lat: f64, #[case] lon: f64) {
        let err = fetch_poi(lat, lon, 2_000, 3, Duration::from_secs(5)).expect_err("should fail");
        assert!(matches!(err, FetchError::InvalidRequest(_)), "got {err:?}");
    }

    #[rstest]
    fn zero_radius_is_rejected() {
        let err = fetch_poi(23.7, 120.5, 0, 3, Duration::from_secs(5)).expect_err("should fail");
        assert!(matches!(
            err,
            FetchError::InvalidRequest(QueryRequestValidationError::ZeroRadius)
        ));
    }

    #[rstest]
    fn fetch_with_classifies_elements() {
        let body = r#"{"elements": [
            {"type": "node", "lat": 1.0, "lon": 2.0,
             "tags": {"amenity": "school", "name": "North School"}},
            {"type": "node", "lat": 1.0, "lon": 2.0, "tags": {"amenity": "school"}}
        ]}"#;
        let client = OverpassClient::with_parts(
            ScriptedTransport::with_body(body),
            RecordingSleeper::default(),
            QueryTemplate::standard(),
        );
        let request = QueryRequest::at(1.0, 2.0).expect("valid request");

        let pois = fetch_poi_with(&client, &request).expect("should succeed");

        assert_eq!(pois.len(), 1);
        assert_eq!(pois[0].name(), "North School");
        assert_eq!(pois[0].category(), Category::School);
    }
}
