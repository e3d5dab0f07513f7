//! Validated parameters for one nearby-POI lookup.

use std::time::Duration;

use thiserror::Error;

/// Default search radius in metres.
pub const DEFAULT_RADIUS_METRES: u32 = 2_000;
/// Default retry budget, counted in attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default base backoff between attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(5);

/// Parameters for a single lookup.
///
/// The request lives only for the duration of one call.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use waypost_core::QueryRequest;
///
/// # fn main() -> Result<(), waypost_core::QueryRequestValidationError> {
/// let request = QueryRequest::new(23.71, 120.54, 1_000, 3, Duration::from_secs(5))?;
/// assert_eq!(request.radius_metres(), 1_000);
///
/// let defaults = QueryRequest::at(23.71, 120.54)?;
/// assert_eq!(defaults.radius_metres(), 2_000);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryRequest {
    latitude: f64,
    longitude: f64,
    radius_metres: u32,
    max_retries: u32,
    backoff: Duration,
}

/// Errors returned by [`QueryRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QueryRequestValidationError {
    /// Latitude outside `-90..=90` or not finite.
    #[error("latitude {0} must be within -90..=90")]
    LatitudeOutOfRange(f64),
    /// Longitude outside `-180..=180` or not finite.
    #[error("longitude {0} must be within -180..=180")]
    LongitudeOutOfRange(f64),
    /// Radius was zero.
    #[error("search radius must be positive")]
    ZeroRadius,
    /// Backoff was zero.
    #[error("backoff must be positive")]
    ZeroBackoff,
}

impl QueryRequest {
    /// Validates and constructs a [`QueryRequest`].
    ///
    /// A `max_retries` of zero is accepted; the executor still makes one
    /// attempt.
    ///
    /// # Errors
    ///
    /// Returns [`QueryRequestValidationError`] when the latitude lies outside
    /// `[-90, 90]`, the longitude outside `[-180, 180]` (NaN fails both), or
    /// the radius or backoff is zero.
    pub fn new(
        latitude: f64,
        longitude: f64,
        radius_metres: u32,
        max_retries: u32,
        backoff: Duration,
    ) -> Result<Self, QueryRequestValidationError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(QueryRequestValidationError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(QueryRequestValidationError::LongitudeOutOfRange(longitude));
        }
        if radius_metres == 0 {
            return Err(QueryRequestValidationError::ZeroRadius);
        }
        if backoff.is_zero() {
            return Err(QueryRequestValidationError::ZeroBackoff);
        }
        Ok(Self {
            latitude,
            longitude,
            radius_metres,
            max_retries,
            backoff,
        })
    }

    /// Validates a coordinate and applies the default radius, retry budget
    /// and backoff.
    ///
    /// # Errors
    ///
    /// Returns [`QueryRequestValidationError`] for an out-of-range
    /// coordinate, as [`QueryRequest::new`] does.
    pub fn at(latitude: f64, longitude: f64) -> Result<Self, QueryRequestValidationError> {
        Self::new(
            latitude,
            longitude,
            DEFAULT_RADIUS_METRES,
            DEFAULT_MAX_RETRIES,
            DEFAULT_BACKOFF,
        )
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Search radius in metres.
    #[must_use]
    pub const fn radius_metres(&self) -> u32 {
        self.radius_metres
    }

    /// Retry budget as requested by the caller.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Base backoff; the delay after attempt `n` is `backoff * n`.
    #[must_use]
    pub const fn backoff(&self) -> Duration {
        self.backoff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-90.0, -180.0)]
    #[case(90.0, 180.0)]
    #[case(0.0, 0.0)]
    fn accepts_boundary_coordinates(#[case] lat: f64, #[case] lon: f64) {
        assert!(QueryRequest::at(lat, lon).is_ok());
    }

    #[rstest]
    #[case(90.5)]
    #[case(-91.0)]
    #[case(f64::NAN)]
    fn rejects_invalid_latitude(#[case] lat: f64) {
        let err = QueryRequest::at(lat, 0.0).expect_err("latitude should be rejected");
        assert!(matches!(
            err,
            QueryRequestValidationError::LatitudeOutOfRange(_)
        ));
    }

    #[rstest]
    #[case(180.1)]
    #[case(f64::NEG_INFINITY)]
    fn rejects_invalid_longitude(#[case] lon: f64) {
        let err = QueryRequest::at(0.0, lon).expect_err("longitude should be rejected");
        assert!(matches!(
            err,
            QueryRequestValidationError::LongitudeOutOfRange(_)
        ));
    }

    #[rstest]
    fn rejects_zero_radius() {
        let result = QueryRequest::new(0.0, 0.0, 0, 3, DEFAULT_BACKOFF);
        assert_eq!(result, Err(QueryRequestValidationError::ZeroRadius));
    }

    #[rstest]
    fn rejects_zero_backoff() {
        let result = QueryRequest::new(0.0, 0.0, 100, 3, Duration::ZERO);
        assert_eq!(result, Err(QueryRequestValidationError::ZeroBackoff));
    }

    #[rstest]
    fn zero_retry_budget_is_accepted() {
        let request =
            QueryRequest::new(0.0, 0.0, 100, 0, DEFAULT_BACKOFF).expect("valid request");
        assert_eq!(request.max_retries(), 0);
    }

    #[rstest]
    fn defaults_match_published_constants() {
        let request = QueryRequest::at(23.71, 120.54).expect("valid request");
        assert_eq!(request.radius_metres(), DEFAULT_RADIUS_METRES);
        assert_eq!(request.max_retries(), DEFAULT_MAX_RETRIES);
        assert_eq!(request.backoff(), DEFAULT_BACKOFF);
    }
}
