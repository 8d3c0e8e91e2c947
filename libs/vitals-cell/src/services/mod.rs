pub mod evaluator;
pub mod readings;
