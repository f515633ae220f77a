//! Domain layer - Pure business abstractions
//!
//! Trait definitions and domain error types. Implementations live in the
//! infrastructure layer.

pub mod errors;
pub mod repositories;

pub use errors::DomainError;
pub use repositories::*;
