//! Overpass QL rendering for the fixed predicate set.
//!
//! The query is a union of tag predicates, each evaluated for `node`, `way`
//! and `relation` within `around:{radius},{lat},{lon}`, followed by
//! `out center;` so non-point geometries report a centroid.

use std::fmt;

use waypost_core::{Category, QueryRequest};

/// Element kinds every predicate is evaluated against.
const GEOMETRY_KINDS: [&str; 3] = ["node", "way", "relation"];

/// Single tag filter, rendered as one bracketed QL clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFilter {
    /// `["key"="value"]`
    Equals {
        /// Tag key.
        key: String,
        /// Required value.
        value: String,
    },
    /// `["key"~"pattern"]`
    Matches {
        /// Tag key.
        key: String,
        /// Regular expression evaluated by the service.
        pattern: String,
    },
}

impl TagFilter {
    /// `key=value` filter.
    #[must_use]
    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals {
            key: key.into(),
            value: value.into(),
        }
    }

    /// `key~pattern` filter.
    #[must_use]
    pub fn matches(key: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::Matches {
            key: key.into(),
            pattern: pattern.into(),
        }
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals { key, value } => {
                write!(f, "[\"{}\"=\"{}\"]", escape(key), escape(value))
            }
            Self::Matches { key, pattern } => {
                write!(f, "[\"{}\"~\"{}\"]", escape(key), escape(pattern))
            }
        }
    }
}

/// Conjunction of tag filters applied to one geometry kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    filters: Vec<TagFilter>,
}

impl Predicate {
    /// Predicate requiring every filter.
    #[must_use]
    pub const fn new(filters: Vec<TagFilter>) -> Self {
        Self { filters }
    }

    /// Predicate with a single `key=value` filter.
    #[must_use]
    pub fn tag(key: &str, value: &str) -> Self {
        Self::new(vec![TagFilter::equals(key, value)])
    }

    /// Predicate with a single `key~pattern` filter.
    #[must_use]
    pub fn pattern(key: &str, pattern: &str) -> Self {
        Self::new(vec![TagFilter::matches(key, pattern)])
    }

    /// Filters in render order.
    #[must_use]
    pub fn filters(&self) -> &[TagFilter] {
        &self.filters
    }
}

/// Predicates fetched for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateGroup {
    /// Category the group feeds; rendered as a comment.
    pub category: Category,
    /// Predicates in render order.
    pub predicates: Vec<Predicate>,
}

/// Static query definition: header timeout plus predicate groups.
///
/// # Examples
///
/// ```
/// use waypost_core::QueryRequest;
/// use waypost_data::overpass::QueryTemplate;
///
/// let request = QueryRequest::at(23.71, 120.54)?;
/// let query = QueryTemplate::standard().render(&request);
/// assert!(query.starts_with("[out:json][timeout:60];"));
/// assert!(query.contains(r#"node(around:2000,23.71,120.54)["railway"="station"];"#));
/// assert!(query.trim_end().ends_with("out center;"));
/// # Ok::<(), waypost_core::QueryRequestValidationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate {
    query_timeout_secs: u32,
    groups: Vec<PredicateGroup>,
}

impl Default for QueryTemplate {
    fn default() -> Self {
        Self::standard()
    }
}

impl QueryTemplate {
    /// Template over explicit groups.
    #[must_use]
    pub const fn new(query_timeout_secs: u32, groups: Vec<PredicateGroup>) -> Self {
        Self {
            query_timeout_secs,
            groups,
        }
    }

    /// Predicates for every category of the standard cascade.
    #[must_use]
    pub fn standard() -> Self {
        use Predicate as P;

        let group = |category: Category, predicates: Vec<Predicate>| PredicateGroup {
            category,
            predicates,
        };
        Self::new(
            60,
            vec![
                group(
                    Category::Interchange,
                    vec![P::tag("highway", "motorway_junction")],
                ),
                group(Category::NationalHighway, vec![P::tag("highway", "motorway")]),
                group(
                    Category::HighSpeedRailStation,
                    vec![
                        P::tag("station", "high_speed"),
                        P::new(vec![
                            TagFilter::equals("public_transport", "station"),
                            TagFilter::matches("network", "高鐵"),
                        ]),
                    ],
                ),
                group(
                    Category::MetroStation,
                    vec![
                        P::tag("station", "subway"),
                        P::tag("railway", "subway"),
                        P::new(vec![
                            TagFilter::equals("public_transport", "station"),
                            TagFilter::equals("subway", "yes"),
                        ]),
                    ],
                ),
                group(
                    Category::TrainStation,
                    vec![P::tag("railway", "station"), P::tag("railway", "halt")],
                ),
                group(
                    Category::BusStop,
                    vec![
                        P::tag("highway", "bus_stop"),
                        P::tag("amenity", "bus_station"),
                    ],
                ),
                group(Category::Park, vec![P::tag("leisure", "park")]),
                group(
                    Category::TraditionalMarket,
                    vec![P::tag("amenity", "marketplace"), P::tag("shop", "market")],
                ),
                group(Category::School, vec![P::tag("amenity", "school")]),
                group(
                    Category::Dining,
                    vec![P::pattern("amenity", "^(restaurant|cafe|fast_food)$")],
                ),
                group(
                    Category::Retail,
                    vec![P::pattern(
                        "shop",
                        "^(supermarket|mall|department_store|convenience)$",
                    )],
                ),
                group(
                    Category::PublicInstitution,
                    vec![P::pattern(
                        "amenity",
                        "^(townhall|library|police|fire_station|post_office|courthouse)$",
                    )],
                ),
                group(
                    Category::Hospital,
                    vec![
                        P::tag("amenity", "hospital"),
                        P::tag("healthcare", "hospital"),
                    ],
                ),
            ],
        )
    }

    /// Override the `[timeout:..]` header value.
    #[must_use]
    pub fn with_query_timeout_secs(mut self, secs: u32) -> Self {
        self.query_timeout_secs = secs;
        self
    }

    /// Header timeout in seconds.
    #[must_use]
    pub const fn query_timeout_secs(&self) -> u32 {
        self.query_timeout_secs
    }

    /// Predicate groups in render order.
    #[must_use]
    pub fn groups(&self) -> &[PredicateGroup] {
        &self.groups
    }

    /// Render the QL text for `request`.
    #[must_use]
    pub fn render(&self, request: &QueryRequest) -> String {
        let area = format!(
            "(around:{},{},{})",
            request.radius_metres(),
            request.latitude(),
            request.longitude()
        );
        let mut query = format!("[out:json][timeout:{}];\n(\n", self.query_timeout_secs);
        for group in &self.groups {
            query.push_str(&format!("  /* {} */\n", group.category));
            for predicate in &group.predicates {
                let filters: String = predicate.filters.iter().map(ToString::to_string).collect();
                for kind in GEOMETRY_KINDS {
                    query.push_str(&format!("  {kind}{area}{filters};\n"));
                }
            }
        }
        query.push_str(");\nout center;\n");
        query
    }
}

/// Escape a value for a double-quoted QL string.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn request() -> QueryRequest {
        QueryRequest::new(23.71, 120.54, 1_000, 3, std::time::Duration::from_secs(5))
            .expect("valid request")
    }

    #[rstest]
    fn renders_header_and_footer(request: QueryRequest) {
        let query = QueryTemplate::standard().render(&request);
        assert!(query.starts_with("[out:json][timeout:60];\n(\n"));
        assert!(query.ends_with(");\nout center;\n"));
    }

    #[rstest]
    fn every_predicate_covers_three_geometry_kinds(request: QueryRequest) {
        let query = QueryTemplate::standard().render(&request);
        for kind in GEOMETRY_KINDS {
            let line = format!("  {kind}(around:1000,23.71,120.54)[\"amenity\"=\"school\"];");
            assert!(query.contains(&line), "missing {line}");
        }
    }

    #[rstest]
    fn compound_predicates_render_all_filters(request: QueryRequest) {
        let query = QueryTemplate::standard().render(&request);
        assert!(query.contains(
            "  node(around:1000,23.71,120.54)[\"public_transport\"=\"station\"][\"subway\"=\"yes\"];"
        ));
    }

    #[rstest]
    fn pattern_predicates_use_tilde(request: QueryRequest) {
        let query = QueryTemplate::standard().render(&request);
        assert!(query.contains("[\"amenity\"~\"^(restaurant|cafe|fast_food)$\"]"));
    }

    #[rstest]
    fn groups_cover_every_category() {
        let template = QueryTemplate::standard();
        let categories: Vec<_> = template.groups().iter().map(|g| g.category).collect();
        assert_eq!(categories, Category::ALL.to_vec());
    }

    #[rstest]
    fn groups_are_commented(request: QueryRequest) {
        let query = QueryTemplate::standard().render(&request);
        assert!(query.contains("  /* high-speed rail station */\n"));
    }

    #[rstest]
    fn query_timeout_is_configurable(request: QueryRequest) {
        let query = QueryTemplate::standard()
            .with_query_timeout_secs(25)
            .render(&request);
        assert!(query.starts_with("[out:json][timeout:25];"));
    }

    #[rstest]
    fn quotes_are_escaped() {
        let filter = TagFilter::equals("name", "The \"Old\" Mill");
        assert_eq!(filter.to_string(), r#"["name"="The \"Old\" Mill"]"#);
    }
}
