//! Infrastructure implementations.
//!
//! Port traits, their production adapters, settings loading and the engine
//! error type.

pub mod error;
pub mod ports;
pub mod random;
pub mod settings;
