pub mod models;
pub mod services;

pub use models::Message;
pub use services::notify::NotificationService;
