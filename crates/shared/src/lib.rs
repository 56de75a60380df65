//! Vessel Shared - synchronization contract between the authoritative server
//! and its clients
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - domain identity types, serde and thiserror
//! 2. **No simulation logic** - pure data types and the binary codec
//! 3. **Forward compatible** - unknown opcodes decode, they are never fatal

pub mod error;
pub mod messages;

pub use error::ProtocolError;
pub use messages::{ContainmentChanged, Opcode, SyncPacket};
