//! Data access for the Waypost engine.
//!
//! Responsibilities:
//! - Render Overpass QL queries for the fixed predicate set.
//! - Submit queries over HTTP with the retry/backoff protocol.
//! - Decode the service's JSON into raw elements.
//!
//! Boundaries:
//! - Classification rules live in `waypost-core`, not here.
//! - Expose a blocking API; async HTTP stays behind the transport.
//!
//! Invariants:
//! - No global mutable state; each call owns its request and response.

pub mod overpass;
