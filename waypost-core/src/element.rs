//! Raw elements as returned by an Overpass `out center;` query.
//!
//! Nodes carry `lat`/`lon` directly; ways and relations carry a `center`
//! object instead. Tag maps are decoded leniently: anything that is not a
//! JSON object of strings degrades to absent entries rather than failing
//! the whole response.

use geo::Coord;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::Tags;

/// OSM element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A point.
    Node,
    /// An ordered list of nodes.
    Way,
    /// A group of members.
    Relation,
    /// Anything else the service may emit.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Centroid reported for non-point geometries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Center {
    /// Latitude in degrees.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude in degrees.
    #[serde(default)]
    pub lon: Option<f64>,
}

/// One record from the service's `elements` list.
///
/// # Examples
/// ```
/// use waypost_core::{ElementKind, RawElement, Tags};
///
/// let element: RawElement = serde_json::from_str(
///     r#"{"type": "way", "id": 7, "center": {"lat": 23.7, "lon": 120.5},
///         "tags": {"amenity": "school"}}"#,
/// )?;
/// assert_eq!(element.kind, ElementKind::Way);
/// assert_eq!(element.position().map(|c| c.y), Some(23.7));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RawElement {
    /// Element kind.
    #[serde(rename = "type", default)]
    pub kind: ElementKind,
    /// OSM identifier, unique per kind.
    #[serde(default)]
    pub id: Option<u64>,
    /// Direct latitude, present on nodes.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Direct longitude, present on nodes.
    #[serde(default)]
    pub lon: Option<f64>,
    /// Centroid, present on ways and relations.
    #[serde(default)]
    pub center: Option<Center>,
    /// Free-form tags.
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Tags,
}

impl RawElement {
    /// Construct an element with tags and no position.
    #[must_use]
    pub fn new(kind: ElementKind, tags: Tags) -> Self {
        Self {
            kind,
            tags,
            ..Self::default()
        }
    }

    /// Attach a direct position.
    #[must_use]
    pub fn with_position(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }

    /// Attach a centroid.
    #[must_use]
    pub fn with_center(mut self, lat: f64, lon: f64) -> Self {
        self.center = Some(Center {
            lat: Some(lat),
            lon: Some(lon),
        });
        self
    }

    /// Resolve the element's position, preferring direct coordinates.
    ///
    /// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
    /// Returns `None` when neither a complete direct pair nor a complete
    /// centroid is available.
    #[must_use]
    pub fn position(&self) -> Option<Coord<f64>> {
        let direct = self.lat.zip(self.lon);
        let centroid = self.center.and_then(|center| center.lat.zip(center.lon));
        direct
            .or(centroid)
            .map(|(lat, lon)| Coord { x: lon, y: lat })
    }
}

fn lenient_tags<'de, D>(deserializer: D) -> Result<Tags, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(entries) = value else {
        return Ok(Tags::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(text) => Some((key, text)),
            _ => None,
        })
        .collect())
}
