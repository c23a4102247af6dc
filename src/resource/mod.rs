//! Per-resource transformations
//!
//! Everything here is pure: given a [`ResourceRecord`](crate::terraform::state::ResourceRecord)
//! (or part of one), compute whether it is selected, which host variables it
//! contributes, and which group names its tags map to.
//!
//! - [`filter`]: type, address and tag gates
//! - [`flatten`]: nested attribute trees to flat host variables
//! - [`naming`]: identifier sanitization for group names

pub mod filter;
pub mod flatten;
pub mod naming;

pub use filter::FilterCriteria;
pub use flatten::{flatten_attributes, host_variables};
pub use naming::{group_name_for_tag, sanitize_name};
