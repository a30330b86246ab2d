pub mod bits;
pub mod decoder;
pub mod disasm;
pub mod error;
pub mod features;
pub mod instructions;
pub mod regs;

pub mod isa {
    pub mod format;
    pub mod table;
    pub mod tc16; // table-driven decoder, TriCore 1.1 - 1.8
}

pub use decoder::{
    Access, Decoder, DecoderConfig, Instruction, MemOperand, OddPairPolicy, Operand, OperandKind, OperandType,
    Operands, Width, MAX_OPERANDS,
};
pub use error::DecodeError;
pub use features::{Feature, FeatureInterval, Group, Groups, IsaVersion};
pub use instructions::{Mnemonic, INS_ENDING};
pub use isa::tc16::{decode, Tc16Decoder};
pub use regs::{Register, REG_ENDING, REG_INVALID};
