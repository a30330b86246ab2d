use serde::Serialize;

use crate::instructions::Mnemonic;
use crate::isa::table::AddressingMode;

/// Why a byte sequence could not be turned into an [`Instruction`](crate::Instruction).
///
/// A failed decode never consumes input; the caller decides how to resynchronise.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DecodeError {
    #[error("malformed instruction {raw:#010x}")]
    MalformedInstruction { raw: u32 },
    #[error("truncated buffer: need {needed} bytes, have {available}")]
    TruncatedBuffer { needed: usize, available: usize },
    #[error("{mnemonic}: {mode} addressing is not representable")]
    UnsupportedAddressingMode {
        mnemonic: Mnemonic,
        mode: AddressingMode,
    },
}

impl DecodeError {
    /// Short stable tag used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::MalformedInstruction { .. } => "malformed",
            DecodeError::TruncatedBuffer { .. } => "truncated",
            DecodeError::UnsupportedAddressingMode { .. } => "unsupported-addressing",
        }
    }
}
