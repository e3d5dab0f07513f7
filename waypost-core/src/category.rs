//! The closed set of labels a retained point of interest can carry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Human-readable POI category.
///
/// Variants are declared in cascade order, so [`Category::ALL`] mirrors the
/// priority used by [`crate::RuleSet::standard`].
///
/// # Examples
/// ```
/// use waypost_core::Category;
///
/// assert_eq!(Category::TrainStation.label(), "train station");
/// assert_eq!("bus stop".parse::<Category>(), Ok(Category::BusStop));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Junction on a limited-access highway.
    Interchange,
    /// Limited-access highway segment or national highway route.
    NationalHighway,
    /// High-speed rail station.
    HighSpeedRailStation,
    /// Metro or subway station.
    MetroStation,
    /// Conventional rail station or halt.
    TrainStation,
    /// Bus stop or bus station.
    BusStop,
    /// Park.
    Park,
    /// Traditional marketplace.
    TraditionalMarket,
    /// School.
    School,
    /// Restaurant, cafe or fast food outlet.
    Dining,
    /// Supermarket, mall, department store or convenience store.
    Retail,
    /// Civic institution such as a town hall or police station.
    PublicInstitution,
    /// Hospital.
    Hospital,
}

impl Category {
    /// Every category, in cascade order.
    pub const ALL: [Self; 13] = [
        Self::Interchange,
        Self::NationalHighway,
        Self::HighSpeedRailStation,
        Self::MetroStation,
        Self::TrainStation,
        Self::BusStop,
        Self::Park,
        Self::TraditionalMarket,
        Self::School,
        Self::Dining,
        Self::Retail,
        Self::PublicInstitution,
        Self::Hospital,
    ];

    /// Stable label used for display and serialisation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Interchange => "interchange",
            Self::NationalHighway => "national highway system",
            Self::HighSpeedRailStation => "high-speed rail station",
            Self::MetroStation => "metro station",
            Self::TrainStation => "train station",
            Self::BusStop => "bus stop",
            Self::Park => "park",
            Self::TraditionalMarket => "traditional market",
            Self::School => "school",
            Self::Dining => "dining",
            Self::Retail => "retail",
            Self::PublicInstitution => "public institution",
            Self::Hospital => "hospital",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when parsing a label outside the enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category label {0:?}")]
pub struct UnknownCategoryError(pub String);

impl FromStr for Category {
    type Err = UnknownCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.label() == s)
            .ok_or_else(|| UnknownCategoryError(s.to_owned()))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}
