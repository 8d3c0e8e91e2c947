pub mod error;
pub mod staff;
pub mod vitals;

pub use error::AppError;
pub use staff::{Role, User};
pub use vitals::Severity;
