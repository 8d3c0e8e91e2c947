pub mod alerts;
pub mod lifecycle;
pub mod logs;
pub mod patients;
