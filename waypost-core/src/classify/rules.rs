//! Ordered tag-to-category rule cascade.
//!
//! A [`RuleSet`] is a list of ([`TagMatcher`], [`Category`]) pairs evaluated
//! top to bottom; the first matching rule decides the category. Rule order
//! is part of the contract: an element tagged both `railway=station` and
//! `amenity=hospital` is a train station because the rail rule comes first.

use crate::{Category, Tags};

/// Network marker for the national freeway system.
pub const NATIONAL_HIGHWAY_MARKER: &str = "國道";
/// Network marker for high-speed rail.
pub const HIGH_SPEED_RAIL_MARKER: &str = "高鐵";
/// Network marker for metro systems.
pub const METRO_MARKER: &str = "捷運";
/// Network marker for conventional rail.
///
/// This is a substring of [`HIGH_SPEED_RAIL_MARKER`], so the high-speed rule
/// must precede the rail rule.
pub const RAIL_MARKER: &str = "鐵";

/// Predicate over an element's tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagMatcher {
    /// `key` is present with exactly `value`.
    Equals {
        /// Tag key.
        key: String,
        /// Required value.
        value: String,
    },
    /// `key` is present with one of `values`.
    OneOf {
        /// Tag key.
        key: String,
        /// Accepted values.
        values: Vec<String>,
    },
    /// The lower-cased value of `key` contains `needle`.
    Contains {
        /// Tag key.
        key: String,
        /// Lower-cased substring.
        needle: String,
    },
    /// Every inner matcher holds.
    All(Vec<TagMatcher>),
    /// At least one inner matcher holds.
    Any(Vec<TagMatcher>),
}

impl TagMatcher {
    /// Match `key=value` exactly.
    #[must_use]
    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Match `key` against a set of values.
    #[must_use]
    pub fn one_of(key: impl Into<String>, values: &[&str]) -> Self {
        Self::OneOf {
            key: key.into(),
            values: values.iter().map(|&value| value.to_owned()).collect(),
        }
    }

    /// Match when the value of `key` contains `needle`, ignoring case.
    #[must_use]
    pub fn contains(key: impl Into<String>, needle: &str) -> Self {
        Self::Contains {
            key: key.into(),
            needle: needle.to_lowercase(),
        }
    }

    /// Match when the `network` designation contains `marker`.
    #[must_use]
    pub fn network_contains(marker: &str) -> Self {
        Self::contains("network", marker)
    }

    /// Evaluate the matcher. Absent keys never match.
    #[must_use]
    pub fn matches(&self, tags: &Tags) -> bool {
        match self {
            Self::Equals { key, value } => tags.has(key, value),
            Self::OneOf { key, values } => tags.has_any(key, values),
            Self::Contains { key, needle } => tags
                .get(key)
                .is_some_and(|found| found.to_lowercase().contains(needle.as_str())),
            Self::All(matchers) => matchers.iter().all(|matcher| matcher.matches(tags)),
            Self::Any(matchers) => matchers.iter().any(|matcher| matcher.matches(tags)),
        }
    }
}

/// One step of the cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Category assigned when the matcher holds.
    pub category: Category,
    /// Predicate over the element's tags.
    pub matcher: TagMatcher,
}

impl Rule {
    /// Pair a category with its predicate.
    #[must_use]
    pub const fn new(category: Category, matcher: TagMatcher) -> Self {
        Self { category, matcher }
    }
}

/// Ordered rule cascade; first match wins.
///
/// # Examples
/// ```
/// use waypost_core::{Category, RuleSet, Tags};
///
/// let rules = RuleSet::standard();
/// let tags = Tags::from_iter([("railway", "station"), ("amenity", "hospital")]);
/// assert_eq!(rules.classify(&tags), Some(Category::TrainStation));
/// assert_eq!(rules.classify(&Tags::from_iter([("shop", "bicycle")])), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build a cascade from rules in priority order.
    #[must_use]
    pub const fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The canonical thirteen-category cascade.
    ///
    /// Convenience stores fold into [`Category::Retail`].
    #[must_use]
    pub fn standard() -> Self {
        use TagMatcher as M;

        Self::new(vec![
            Rule::new(
                Category::Interchange,
                M::equals("highway", "motorway_junction"),
            ),
            Rule::new(
                Category::NationalHighway,
                M::Any(vec![
                    M::equals("highway", "motorway"),
                    M::All(vec![
                        M::equals("route", "road"),
                        M::network_contains(NATIONAL_HIGHWAY_MARKER),
                    ]),
                ]),
            ),
            Rule::new(
                Category::HighSpeedRailStation,
                M::Any(vec![
                    M::network_contains(HIGH_SPEED_RAIL_MARKER),
                    M::equals("station", "high_speed"),
                ]),
            ),
            Rule::new(
                Category::MetroStation,
                M::Any(vec![
                    M::network_contains(METRO_MARKER),
                    M::equals("station", "subway"),
                    M::equals("railway", "subway"),
                ]),
            ),
            Rule::new(
                Category::TrainStation,
                M::Any(vec![
                    M::network_contains(RAIL_MARKER),
                    M::one_of("railway", &["station", "halt"]),
                ]),
            ),
            Rule::new(
                Category::BusStop,
                M::Any(vec![
                    M::equals("highway", "bus_stop"),
                    M::equals("amenity", "bus_station"),
                ]),
            ),
            Rule::new(Category::Park, M::equals("leisure", "park")),
            Rule::new(
                Category::TraditionalMarket,
                M::Any(vec![
                    M::equals("amenity", "marketplace"),
                    M::equals("shop", "market"),
                ]),
            ),
            Rule::new(Category::School, M::equals("amenity", "school")),
            Rule::new(
                Category::Dining,
                M::one_of("amenity", &["restaurant", "cafe", "fast_food"]),
            ),
            Rule::new(
                Category::Retail,
                M::one_of(
                    "shop",
                    &["supermarket", "mall", "department_store", "convenience"],
                ),
            ),
            Rule::new(
                Category::PublicInstitution,
                M::one_of(
                    "amenity",
                    &[
                        "townhall",
                        "library",
                        "police",
                        "fire_station",
                        "post_office",
                        "courthouse",
                    ],
                ),
            ),
            Rule::new(
                Category::Hospital,
                M::Any(vec![
                    M::equals("amenity", "hospital"),
                    M::equals("healthcare", "hospital"),
                ]),
            ),
        ])
    }

    /// Rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Append a rule at the lowest priority.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// First matching category, or `None` when the element is unclassified.
    #[must_use]
    pub fn classify(&self, tags: &Tags) -> Option<Category> {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(tags))
            .map(|rule| rule.category)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}
