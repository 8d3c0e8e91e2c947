pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use error::ScorecardError;
pub use models::*;
pub use router::create_scorecard_router;
pub use services::scorecard::ScorecardService;
