pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use error::AlertError;
pub use models::*;
pub use router::create_alert_router;
pub use services::alerts::AlertService;
pub use services::lifecycle::AlertLifecycleService;
pub use services::logs::AlertLogService;
pub use services::patients::PatientLookupService;
