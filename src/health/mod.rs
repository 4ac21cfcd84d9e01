// src/health/mod.rs
mod aggregator;
mod policy;
mod report;

pub use aggregator::{HealthAggregator, HealthAggregatorBuilder};
pub use policy::AggregationPolicy;
pub use report::{ClientReport, HealthReport};
