//! Synchronization relay.
//!
//! One opcode crosses the wire: "holder now contains occupant". Clients send
//! it for containment they originate, the server forwards the raw bytes to
//! every other participant, and each client applies it to its own replica.
//! Delivery is fire-and-forget with no acknowledgement.

pub mod client;
pub mod relay;

use std::fmt;

use vessel_domain::EntityId;
use vessel_shared::ProtocolError;

pub use client::SyncClient;
pub use relay::SyncRelay;

/// Identifies one connected participant on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(pub u32);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "participant#{}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Malformed sync packet: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("Sync message names {0}, which is not spawned here")]
    UnknownEntity(EntityId),
    #[error("{0} is not registered with the relay")]
    ParticipantNotFound(ParticipantId),
}
