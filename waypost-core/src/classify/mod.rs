//! Reduce raw Overpass elements to named, categorised points of interest.
//!
//! Each element passes through a fixed pipeline; the first failing step
//! rejects it:
//!
//! 1. route rejection (`type=route` or any `route` tag);
//! 2. a non-empty `name` is required;
//! 3. names containing a transit line designator are rejected;
//! 4. the [`RuleSet`] cascade must yield a category.
//!
//! Classification never fails. Missing or malformed tags are treated as
//! absent values and simply exclude the element.

mod rules;

use log::{debug, trace};

use crate::{Category, NormalizedPoi, RawElement};

pub use rules::{
    HIGH_SPEED_RAIL_MARKER, METRO_MARKER, NATIONAL_HIGHWAY_MARKER, RAIL_MARKER, Rule, RuleSet,
    TagMatcher,
};

/// Name substring marking a transit line rather than a station.
pub const DEFAULT_LINE_DESIGNATOR: &str = "線";

/// Why an element was excluded from the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The element describes a route.
    Route,
    /// The element has no usable name.
    Unnamed,
    /// The name designates a transit line.
    LineName,
    /// No rule matched.
    Unclassified,
}

/// Classification pipeline configured with a rule cascade and line
/// designators.
///
/// A name counts as present only when it has a non-whitespace character, so
/// `"  "` is rejected as [`Rejection::Unnamed`] just like a missing or empty
/// `name` tag.
///
/// # Examples
/// ```
/// use waypost_core::{Category, Classifier, ElementKind, RawElement, Tags};
///
/// let element = RawElement::new(
///     ElementKind::Node,
///     Tags::from_iter([("railway", "station"), ("name", "Central Station")]),
/// )
/// .with_position(23.71, 120.54);
///
/// let pois = Classifier::default().classify_and_filter([element]);
/// assert_eq!(pois.len(), 1);
/// assert_eq!(pois[0].category(), Category::TrainStation);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    rules: RuleSet,
    line_designators: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(RuleSet::standard())
    }
}

impl Classifier {
    /// Use `rules` with the default line designator.
    #[must_use]
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            line_designators: vec![DEFAULT_LINE_DESIGNATOR.to_owned()],
        }
    }

    /// Replace the line designators checked against names.
    #[must_use]
    pub fn with_line_designators<I, S>(mut self, designators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.line_designators = designators.into_iter().map(Into::into).collect();
        self
    }

    /// The cascade in evaluation order.
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Run the pipeline on one element without consuming it.
    ///
    /// Returns the retained name and category.
    ///
    /// # Errors
    ///
    /// Returns the first [`Rejection`] in pipeline order.
    pub fn evaluate<'a>(&self, element: &'a RawElement) -> Result<(&'a str, Category), Rejection> {
        let tags = &element.tags;
        if tags.has("type", "route") || tags.contains_key("route") {
            return Err(Rejection::Route);
        }
        let name = tags.value_or_empty("name");
        if name.trim().is_empty() {
            return Err(Rejection::Unnamed);
        }
        if self
            .line_designators
            .iter()
            .any(|designator| name.contains(designator.as_str()))
        {
            return Err(Rejection::LineName);
        }
        let category = self.rules.classify(tags).ok_or(Rejection::Unclassified)?;
        Ok((name, category))
    }

    /// Classify one element, moving its tags into the result.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] reported by [`Classifier::evaluate`].
    pub fn classify(&self, element: RawElement) -> Result<NormalizedPoi, Rejection> {
        let (name, category) = self.evaluate(&element)?;
        let name = name.to_owned();
        let location = element.position();
        // `evaluate` already guarantees a non-blank name.
        NormalizedPoi::new(name, category, location, element.tags)
            .map_err(|_| Rejection::Unnamed)
    }

    /// Classify every element, dropping rejects and preserving order.
    pub fn classify_and_filter<I>(&self, elements: I) -> Vec<NormalizedPoi>
    where
        I: IntoIterator<Item = RawElement>,
    {
        let mut total = 0_usize;
        let pois: Vec<_> = elements
            .into_iter()
            .inspect(|_| total += 1)
            .filter_map(|element| {
                let id = element.id;
                self.classify(element)
                    .inspect_err(|reason| trace!("Skipping element {id:?}: {reason:?}"))
                    .ok()
            })
            .collect();
        debug!("Kept {} of {total} elements after classification", pois.len());
        pois
    }
}

/// Classify `elements` with the standard cascade.
///
/// # Examples
/// ```
/// use waypost_core::{ElementKind, RawElement, Tags, classify_and_filter};
///
/// let route = RawElement::new(
///     ElementKind::Relation,
///     Tags::from_iter([("name", "Red Line"), ("route", "subway")]),
/// );
/// assert!(classify_and_filter([route]).is_empty());
/// ```
pub fn classify_and_filter<I>(elements: I) -> Vec<NormalizedPoi>
where
    I: IntoIterator<Item = RawElement>,
{
    Classifier::default().classify_and_filter(elements)
}
