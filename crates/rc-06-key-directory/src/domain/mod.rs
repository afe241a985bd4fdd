//! Domain layer for the Key Directory.

pub mod directory;
pub mod entities;
pub mod errors;

pub use directory::*;
pub use entities::*;
pub use errors::*;
