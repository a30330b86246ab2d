//! Table-driven TriCore decoder.
//!
//! Decoding is classify, read, look up, then extract operands. Nothing is
//! written until every operand has been produced, so a failed decode leaves
//! no partial record behind.

use tracing::trace;

use crate::bits::{Field, InsnWord};
use crate::decoder::{Decoder, DecoderConfig, Instruction, OddPairPolicy, Operand, Operands, Width};
use crate::error::DecodeError;
use crate::instructions::Mnemonic;
use crate::isa::table::{AddressingMode, BaseSpec, OpcodeKey, OpcodeTable, OperandSpec};
use crate::regs::{RegClass, Register};

/// Decoder for TriCore 1.1 through 1.8 encodings. Version gates are reported
/// on the record, not enforced.
#[derive(Debug, Clone, Copy)]
pub struct Tc16Decoder {
    config: DecoderConfig,
    table: &'static OpcodeTable,
}

impl Tc16Decoder {
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config, table: OpcodeTable::global() }
    }

    pub fn config(&self) -> DecoderConfig {
        self.config
    }

    fn decode_word(&self, bytes: &[u8], address: u64) -> Result<Instruction, DecodeError> {
        // The first halfword alone decides the length.
        let head = InsnWord::read(bytes, Width::W16)?;
        let leading = head.raw() as u16;
        let format = self
            .table
            .classify(leading)
            .ok_or(DecodeError::MalformedInstruction { raw: u32::from(leading) })?;

        let word = InsnWord::read(bytes, format.width())?;
        let malformed = DecodeError::MalformedInstruction { raw: word.raw() };
        let op1 = word.field(format.op1_field())? as u8;
        let op2 = format.op2_field().map(|f| word.field(f)).transpose()?;

        let resolved = self.table.lookup(&OpcodeKey { format, op1, op2 }).ok_or(malformed)?;
        let entry = resolved.entry;

        let mut operands = Operands::new();
        for spec in entry.operands {
            let op = self.operand(spec, &word, entry.mnemonic)?;
            operands.push(op).map_err(|_| malformed)?;
        }

        Ok(Instruction::new(
            address,
            format.width(),
            word.raw(),
            entry.mnemonic,
            operands,
            entry.attrs.update_flags,
            entry.attrs.groups,
            resolved.features,
        ))
    }

    fn operand(&self, spec: &OperandSpec, word: &InsnWord, mnemonic: Mnemonic) -> Result<Operand, DecodeError> {
        match *spec {
            OperandSpec::Reg { class, field, access } => Ok(Operand::reg(self.register(class, field, word)?, access)),
            OperandSpec::Fixed { reg, access } => Ok(Operand::reg(reg, access)),
            OperandSpec::Imm { imm, access } => Ok(Operand::imm(imm.eval(word)?, access)),
            OperandSpec::Mem { base, disp, mode, access } => {
                if mode != AddressingMode::BaseDisp {
                    return Err(DecodeError::UnsupportedAddressingMode { mnemonic, mode });
                }
                let base = match base {
                    BaseSpec::Fixed(reg) => reg,
                    BaseSpec::Reg { class, field } => self.register(class, field, word)?,
                };
                Ok(Operand::mem(base, disp.eval(word)?, access))
            }
        }
    }

    fn register(&self, class: RegClass, field: Field, word: &InsnWord) -> Result<Register, DecodeError> {
        let malformed = DecodeError::MalformedInstruction { raw: word.raw() };
        let mut index = word.field(field)? as u8;
        if class.is_pair() {
            if index % 2 == 1 && self.config.odd_pair == OddPairPolicy::Reject {
                return Err(malformed);
            }
            index /= 2;
        }
        Register::in_class(class, index).ok_or(malformed)
    }
}

impl Default for Tc16Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for Tc16Decoder {
    fn decode(&self, bytes: &[u8], address: u64) -> Result<Instruction, DecodeError> {
        self.decode_word(bytes, address).inspect_err(|err| {
            trace!(address, kind = err.kind(), %err, "decode failed");
        })
    }
}

/// Decodes one instruction with the default configuration.
pub fn decode(bytes: &[u8], address: u64) -> Result<Instruction, DecodeError> {
    Tc16Decoder::new().decode(bytes, address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Access;

    #[test]
    fn sixteen_bit_mov() {
        // mov d3, #-1
        let insn = decode(&[0x82, 0xF3], 0).unwrap();
        assert_eq!(insn.mnemonic(), Mnemonic::Mov);
        assert_eq!(insn.len(), 2);
        assert_eq!(insn.operand(0).unwrap().as_reg(), Register::d(3));
        assert_eq!(insn.operand(1).unwrap().as_imm(), Some(-1));
        assert_eq!(insn.operand(0).unwrap().access, Access::WRITE);
    }

    #[test]
    fn odd_pair_follows_policy() {
        // ld.d with a = 5, base a2
        let bytes = [0x09, 0x25, 0x40, 0x09];
        let loose = decode(&bytes, 0).unwrap();
        assert_eq!(loose.operand(0).unwrap().as_reg(), Register::e(4));

        let strict = Tc16Decoder::with_config(DecoderConfig { odd_pair: OddPairPolicy::Reject });
        assert_eq!(
            strict.decode(&bytes, 0),
            Err(DecodeError::MalformedInstruction { raw: 0x0940_2509 })
        );
    }

    #[test]
    fn unknown_leading_byte_is_malformed() {
        // 0x17 has no assigned format here
        assert_eq!(
            decode(&[0x17, 0x00, 0x00, 0x00], 0),
            Err(DecodeError::MalformedInstruction { raw: 0x17 })
        );
    }
}
