//! Identity and authorization
//!
//! Directory contracts for users, applications and rights, an in-memory
//! directory, and the validation chain gating every file operation.

pub mod directory;
pub mod privilege;
pub mod repository;
pub mod validator;

pub use directory::StaticDirectory;
pub use privilege::Privilege;
pub use repository::{ApplicationRepository, UserRepository, UserRightRepository};
pub use validator::AccessValidator;
