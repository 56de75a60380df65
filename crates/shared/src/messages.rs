//! Synchronization messages exchanged between the server and its clients
//!
//! There is exactly one opcode today. Packets with any other opcode decode to
//! [`SyncPacket::Unknown`] so receivers can log and skip them.
//!
//! ## Wire format
//!
//! Little-endian, no length prefix (the transport frames packets):
//!
//! | offset | size | field                 |
//! |--------|------|-----------------------|
//! | 0      | 1    | opcode                |
//! | 1      | 1    | holder is player (0/1)|
//! | 2      | 4    | holder index (i32)    |
//! | 6      | 1    | occupant is player    |
//! | 7      | 4    | occupant index (i32)  |

use serde::{Deserialize, Serialize};
use vessel_domain::{EntityId, EntityKind};

use crate::error::ProtocolError;

// =============================================================================
// Opcodes
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Opcode {
    ContainmentChanged,
}

impl Opcode {
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::ContainmentChanged => 0,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::ContainmentChanged),
            _ => None,
        }
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// "`holder` now contains `occupant`".
///
/// Kind flags select the outer world's slot table: `true` is the player
/// table, `false` the creature table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainmentChanged {
    pub holder_is_player: bool,
    pub holder_id: i32,
    pub occupant_is_player: bool,
    pub occupant_id: i32,
}

impl ContainmentChanged {
    /// Payload size, excluding the opcode byte.
    pub const PAYLOAD_LEN: usize = 10;

    pub fn new(holder: EntityId, occupant: EntityId) -> Self {
        Self {
            holder_is_player: holder.is_player(),
            holder_id: holder.index(),
            occupant_is_player: occupant.is_player(),
            occupant_id: occupant.index(),
        }
    }

    pub fn holder(&self) -> EntityId {
        EntityId::new(
            EntityKind::from_player_flag(self.holder_is_player),
            self.holder_id,
        )
    }

    pub fn occupant(&self) -> EntityId {
        EntityId::new(
            EntityKind::from_player_flag(self.occupant_is_player),
            self.occupant_id,
        )
    }

    fn write_payload(&self, out: &mut Vec<u8>) {
        out.push(u8::from(self.holder_is_player));
        out.extend_from_slice(&self.holder_id.to_le_bytes());
        out.push(u8::from(self.occupant_is_player));
        out.extend_from_slice(&self.occupant_id.to_le_bytes());
    }

    fn read_payload(payload: &[u8]) -> Result<Self, ProtocolError> {
        let opcode = Opcode::ContainmentChanged.as_byte();
        if payload.len() < Self::PAYLOAD_LEN {
            return Err(ProtocolError::Truncated {
                opcode,
                expected: Self::PAYLOAD_LEN,
                actual: payload.len(),
            });
        }
        if payload.len() > Self::PAYLOAD_LEN {
            return Err(ProtocolError::TrailingBytes {
                opcode,
                extra: payload.len() - Self::PAYLOAD_LEN,
            });
        }

        let mut reader = Reader::new(payload);
        Ok(Self {
            holder_is_player: reader.bool()?,
            holder_id: reader.i32()?,
            occupant_is_player: reader.bool()?,
            occupant_id: reader.i32()?,
        })
    }
}

impl From<(EntityId, EntityId)> for ContainmentChanged {
    fn from((holder, occupant): (EntityId, EntityId)) -> Self {
        Self::new(holder, occupant)
    }
}

// =============================================================================
// Packets
// =============================================================================

/// One framed synchronization packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncPacket {
    ContainmentChanged(ContainmentChanged),
    /// An opcode this build does not understand; payload kept verbatim.
    Unknown { opcode: u8, payload: Vec<u8> },
}

impl SyncPacket {
    pub fn opcode_byte(&self) -> u8 {
        match self {
            Self::ContainmentChanged(_) => Opcode::ContainmentChanged.as_byte(),
            Self::Unknown { opcode, .. } => *opcode,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + ContainmentChanged::PAYLOAD_LEN);
        out.push(self.opcode_byte());
        match self {
            Self::ContainmentChanged(msg) => msg.write_payload(&mut out),
            Self::Unknown { payload, .. } => out.extend_from_slice(payload),
        }
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let (&opcode, payload) = bytes.split_first().ok_or(ProtocolError::Empty)?;
        match Opcode::from_byte(opcode) {
            Some(Opcode::ContainmentChanged) => Ok(Self::ContainmentChanged(
                ContainmentChanged::read_payload(payload)?,
            )),
            None => Ok(Self::Unknown {
                opcode,
                payload: payload.to_vec(),
            }),
        }
    }
}

impl From<ContainmentChanged> for SyncPacket {
    fn from(msg: ContainmentChanged) -> Self {
        Self::ContainmentChanged(msg)
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], ProtocolError> {
        let end = self.offset + N;
        let slice = self
            .bytes
            .get(self.offset..end)
            .ok_or(ProtocolError::Truncated {
                opcode: Opcode::ContainmentChanged.as_byte(),
                expected: end,
                actual: self.bytes.len(),
            })?;
        self.offset = end;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    // Any non-zero byte reads as true.
    fn bool(&mut self) -> Result<bool, ProtocolError> {
        Ok(self.take::<1>()?[0] != 0)
    }

    fn i32(&mut self) -> Result<i32, ProtocolError> {
        Ok(i32::from_le_bytes(self.take::<4>()?))
    }
}
