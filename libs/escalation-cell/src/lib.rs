pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use error::EscalationError;
pub use models::*;
pub use router::create_escalation_router;
pub use services::monitor::EscalationMonitor;
pub use services::planner::plan_escalation;
