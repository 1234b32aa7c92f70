pub mod api_error;
pub mod config;
pub mod context;
pub mod crm;
pub mod data;
pub mod format;
pub mod uploads;
