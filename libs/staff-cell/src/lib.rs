pub mod services;

pub use services::directory::StaffDirectoryService;
