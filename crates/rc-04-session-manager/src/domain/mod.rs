//! Domain layer for the Session Manager.

pub mod config;
pub mod entities;
pub mod errors;
pub mod manager;

pub use config::*;
pub use entities::*;
pub use errors::*;
pub use manager::*;
