pub mod monitor;
pub mod planner;
