//! Domain layer for the Matching Engine.

pub mod engine;
pub mod entities;
pub mod selection;

pub use engine::*;
pub use entities::*;
pub use selection::*;
