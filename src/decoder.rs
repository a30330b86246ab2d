use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::DecodeError;
use crate::features::{FeatureInterval, Groups, IsaVersion};
use crate::instructions::Mnemonic;
use crate::regs::Register;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Width {
    W16 = 2,
    W32 = 4,
}

impl Width {
    pub const fn bytes(self) -> usize {
        self as usize
    }
}

bitflags! {
    /// How an operand is accessed. Combine for read-modify-write.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Access: u8 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
    }
}

/// Operand slot type ids, matching the numbering external consumers expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OperandType {
    Invalid = 0,
    Reg = 1,
    Imm = 2,
    Mem = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MemOperand {
    pub base: Register,
    pub disp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperandKind {
    Reg(Register),
    Imm(i64),
    Mem(MemOperand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Operand {
    #[serde(flatten)]
    pub kind: OperandKind,
    pub access: Access,
}

impl Operand {
    pub fn reg(reg: Register, access: Access) -> Self {
        Self { kind: OperandKind::Reg(reg), access }
    }

    pub fn imm(value: i64, access: Access) -> Self {
        Self { kind: OperandKind::Imm(value), access }
    }

    pub fn mem(base: Register, disp: i64, access: Access) -> Self {
        Self { kind: OperandKind::Mem(MemOperand { base, disp }), access }
    }

    pub fn op_type(&self) -> OperandType {
        match self.kind {
            OperandKind::Reg(_) => OperandType::Reg,
            OperandKind::Imm(_) => OperandType::Imm,
            OperandKind::Mem(_) => OperandType::Mem,
        }
    }

    pub fn as_reg(&self) -> Option<Register> {
        match self.kind {
            OperandKind::Reg(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_imm(&self) -> Option<i64> {
        match self.kind {
            OperandKind::Imm(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_mem(&self) -> Option<MemOperand> {
        match self.kind {
            OperandKind::Mem(m) => Some(m),
            _ => None,
        }
    }
}

/// Worst-case operand count of any TriCore instruction.
pub const MAX_OPERANDS: usize = 8;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("operand list is full ({MAX_OPERANDS} slots)")]
pub struct CapacityError;

/// Inline, fixed-capacity operand list. Unused slots are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Operands {
    len: u8,
    slots: [Option<Operand>; MAX_OPERANDS],
}

impl Operands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: Operand) -> Result<(), CapacityError> {
        let slot = self.slots.get_mut(usize::from(self.len)).ok_or(CapacityError)?;
        *slot = Some(op);
        self.len += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, i: usize) -> Option<&Operand> {
        self.slots.get(i).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operand> + '_ {
        self.slots.iter().map_while(Option::as_ref)
    }

    /// Raw slot view: all eight slots, invalid ones as `None`.
    pub fn slots(&self) -> &[Option<Operand>; MAX_OPERANDS] {
        &self.slots
    }
}

impl Serialize for Operands {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(self.iter())
    }
}

/// One decoded TriCore instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    address: u64,
    width: Width,
    raw: u32,
    mnemonic: Mnemonic,
    operands: Operands,
    update_flags: bool,
    groups: Groups,
    features: FeatureInterval,
}

impl Instruction {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        address: u64,
        width: Width,
        raw: u32,
        mnemonic: Mnemonic,
        operands: Operands,
        update_flags: bool,
        groups: Groups,
        features: FeatureInterval,
    ) -> Self {
        Self { address, width, raw, mnemonic, operands, update_flags, groups, features }
    }

    pub fn address(&self) -> u64 {
        self.address
    }

    pub fn width(&self) -> Width {
        self.width
    }

    /// Bytes consumed: 2 or 4.
    pub fn len(&self) -> usize {
        self.width.bytes()
    }

    /// The instruction word, zero-extended for 16-bit encodings.
    pub fn raw(&self) -> u32 {
        self.raw
    }

    pub fn mnemonic(&self) -> Mnemonic {
        self.mnemonic
    }

    pub fn operands(&self) -> &Operands {
        &self.operands
    }

    pub fn op_count(&self) -> usize {
        self.operands.len()
    }

    pub fn operand(&self, i: usize) -> Option<&Operand> {
        self.operands.get(i)
    }

    pub fn update_flags(&self) -> bool {
        self.update_flags
    }

    pub fn groups(&self) -> Groups {
        self.groups
    }

    pub fn features(&self) -> FeatureInterval {
        self.features
    }

    /// Whether the encoding exists on `version`. Purely informational.
    pub fn supported_on(&self, version: IsaVersion) -> bool {
        self.features.contains(version)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::disasm::fmt_insn(self))
    }
}

/// What to do with an odd register index in a field that names a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OddPairPolicy {
    /// Divide by two: index 5 selects the pair formed by 4 and 5.
    #[default]
    Truncate,
    /// Treat the encoding as malformed.
    Reject,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DecoderConfig {
    pub odd_pair: OddPairPolicy,
}

pub trait Decoder {
    /// Decodes the instruction at the start of `bytes`. `address` is recorded
    /// in the result and has no influence on decoding.
    fn decode(&self, bytes: &[u8], address: u64) -> Result<Instruction, DecodeError>;

    /// Decodes the instruction at `offset` into `buf`.
    fn decode_at(&self, buf: &[u8], offset: usize, address: u64) -> Result<Instruction, DecodeError> {
        let rest = buf.get(offset..).ok_or(DecodeError::TruncatedBuffer {
            needed: offset.saturating_add(Width::W16.bytes()),
            available: buf.len(),
        })?;
        self.decode(rest, address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operands_refuse_ninth_slot() {
        let mut ops = Operands::new();
        for i in 0..MAX_OPERANDS {
            ops.push(Operand::imm(i as i64, Access::READ)).unwrap();
        }
        assert_eq!(ops.push(Operand::imm(8, Access::READ)), Err(CapacityError));
        assert_eq!(ops.len(), MAX_OPERANDS);
        assert_eq!(ops.iter().count(), MAX_OPERANDS);
    }

    #[test]
    fn operand_accessors_match_variant() {
        let op = Operand::mem(Register::A10, -4, Access::READ);
        assert_eq!(op.op_type(), OperandType::Mem);
        assert_eq!(op.as_reg(), None);
        assert_eq!(op.as_imm(), None);
        assert_eq!(op.as_mem(), Some(MemOperand { base: Register::A10, disp: -4 }));
        assert_eq!(Access::READ_WRITE.bits(), 3);
    }
}
