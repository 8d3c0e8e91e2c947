pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use error::PolicyError;
pub use models::*;
pub use router::create_policy_router;
pub use services::policy::PolicyService;
