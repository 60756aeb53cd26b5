// Income analysis: demographic benchmarks, percentile placement, narrative.

pub mod comparator;
pub mod data;
pub mod handlers;
pub mod location;
pub mod narrative;
