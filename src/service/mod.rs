//! File service
//!
//! The access-control orchestrator and its assembly.

pub mod factory;
pub mod file_service;

pub use factory::{create_file_service, create_from_config};
pub use file_service::FileService;
