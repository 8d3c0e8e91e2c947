pub mod metrics;
pub mod scorecard;
