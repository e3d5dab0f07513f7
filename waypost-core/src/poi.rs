use geo::Coord;
use serde::Serialize;
use thiserror::Error;

use crate::{Category, Tags};

/// A named, categorised point of interest.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. The
/// location is `None` when the source element carried no usable position.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waypost_core::{Category, NormalizedPoi, Tags};
///
/// # fn main() -> Result<(), waypost_core::NormalizedPoiError> {
/// let poi = NormalizedPoi::new(
///     "Central Station",
///     Category::TrainStation,
///     Some(Coord { x: 120.54, y: 23.71 }),
///     Tags::from_iter([("railway", "station")]),
/// )?;
/// assert_eq!(poi.lat(), Some(23.71));
/// assert_eq!(poi.category().label(), "train station");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPoi {
    name: String,
    category: Category,
    location: Option<Coord<f64>>,
    tags: Tags,
}

/// Errors returned by [`NormalizedPoi::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizedPoiError {
    /// The name was empty or whitespace.
    #[error("point of interest name must not be empty")]
    EmptyName,
}

impl NormalizedPoi {
    /// Validates and constructs a [`NormalizedPoi`].
    ///
    /// # Errors
    ///
    /// Returns [`NormalizedPoiError::EmptyName`] when `name` is empty or
    /// only whitespace.
    pub fn new(
        name: impl Into<String>,
        category: Category,
        location: Option<Coord<f64>>,
        tags: Tags,
    ) -> Result<Self, NormalizedPoiError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(NormalizedPoiError::EmptyName);
        }
        Ok(Self {
            name,
            category,
            location,
            tags,
        })
    }

    /// Display name, never empty.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Derived category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Resolved position, if any.
    #[must_use]
    pub const fn location(&self) -> Option<Coord<f64>> {
        self.location
    }

    /// Latitude in degrees, if the position was resolved.
    #[must_use]
    pub fn lat(&self) -> Option<f64> {
        self.location.map(|coord| coord.y)
    }

    /// Longitude in degrees, if the position was resolved.
    #[must_use]
    pub fn lon(&self) -> Option<f64> {
        self.location.map(|coord| coord.x)
    }

    /// Original tags, retained for inspection.
    #[must_use]
    pub const fn tags(&self) -> &Tags {
        &self.tags
    }
}
