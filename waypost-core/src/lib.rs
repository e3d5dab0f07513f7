//! Core domain types for the Waypost engine.
//!
//! Responsibilities:
//! - Model raw Overpass elements and their free-form tag maps.
//! - Define the closed category enumeration and the ordered rule cascade
//!   that maps tags onto it.
//! - Filter raw elements into normalised points of interest.
//! - Validate query requests before anything touches the network.
//!
//! Boundaries:
//! - No I/O. Fetching lives in `waypost-data`.
//!
//! Invariants:
//! - Classification is a pure function of an element's tags.
//! - Every [`NormalizedPoi`] carries a non-empty name and a category.

pub mod category;
pub mod classify;
pub mod element;
pub mod poi;
pub mod request;
pub mod tags;

pub use category::{Category, UnknownCategoryError};
pub use classify::{
    Classifier, DEFAULT_LINE_DESIGNATOR, Rejection, Rule, RuleSet, TagMatcher,
    classify_and_filter,
};
pub use element::{ElementKind, RawElement};
pub use poi::{NormalizedPoi, NormalizedPoiError};
pub use request::{
    DEFAULT_BACKOFF, DEFAULT_MAX_RETRIES, DEFAULT_RADIUS_METRES, QueryRequest,
    QueryRequestValidationError,
};
pub use tags::Tags;
