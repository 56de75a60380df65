//! Wire decoding errors

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Empty packet")]
    Empty,

    #[error("Truncated packet for opcode {opcode}: expected {expected} payload bytes, got {actual}")]
    Truncated {
        opcode: u8,
        expected: usize,
        actual: usize,
    },

    #[error("Packet for opcode {opcode} has {extra} trailing bytes")]
    TrailingBytes { opcode: u8, extra: usize },
}
