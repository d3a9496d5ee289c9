pub mod core_api;
pub mod save;
pub mod service;
pub mod store;
pub mod upload;
