//! Domain layer of the public-dashboard widget engine.
//!
//! No I/O lives here: marking arithmetic, the filter-tree type, manifest
//! decoding, the scoped identity and lifecycle rules are pure functions
//! over plain data.

pub mod access;
pub mod audit;
pub mod error;
pub mod filters;
pub mod identity;
pub mod manifest;
pub mod markings;
pub mod public_dashboard;
pub mod query;
pub mod roles;
pub mod stix;
pub mod types;
