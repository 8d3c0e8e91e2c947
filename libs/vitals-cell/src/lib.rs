pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use router::create_vitals_router;
pub use services::evaluator::evaluate_reading;
pub use services::readings::ReadingService;
