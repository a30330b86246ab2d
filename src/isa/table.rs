//! Opcode table: `(format, op1, op2)` to mnemonic, operand template and
//! static attributes.
//!
//! Operand templates list operands in assembler order (destination first,
//! stores as `[mem], value`, branch displacement last). Field positions follow
//! the format layouts of the TriCore architecture manual.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;
use tracing::{debug, warn};

use crate::bits::{Field, ImmSpec, Scatter};
use crate::decoder::Access;
use crate::features::{Feature, FeatureInterval, Groups, IsaVersion};
use crate::instructions::Mnemonic;
use crate::isa::format::{width_of, Format, FormatMap};
use crate::regs::{RegClass, Register};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AddressingMode {
    BaseDisp,
    PreIncrement,
    PostIncrement,
    Circular,
    BitReverse,
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AddressingMode::BaseDisp => "base+offset",
            AddressingMode::PreIncrement => "pre-increment",
            AddressingMode::PostIncrement => "post-increment",
            AddressingMode::Circular => "circular",
            AddressingMode::BitReverse => "bit-reverse",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseSpec {
    Reg { class: RegClass, field: Field },
    /// Implicit base, e.g. `a10` for stack-relative forms.
    Fixed(Register),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandSpec {
    Reg { class: RegClass, field: Field, access: Access },
    /// Register implied by the opcode, not encoded in a field.
    Fixed { reg: Register, access: Access },
    Imm { imm: ImmSpec, access: Access },
    Mem { base: BaseSpec, disp: ImmSpec, mode: AddressingMode, access: Access },
}

impl OperandSpec {
    pub fn access(&self) -> Access {
        match *self {
            OperandSpec::Reg { access, .. }
            | OperandSpec::Fixed { access, .. }
            | OperandSpec::Imm { access, .. }
            | OperandSpec::Mem { access, .. } => access,
        }
    }
}

/// Static attributes shared by every decode of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attrs {
    pub update_flags: bool,
    pub groups: Groups,
    pub features: &'static [Feature],
}

impl Attrs {
    pub const fn gated(self, features: &'static [Feature]) -> Self {
        Self { features, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub mnemonic: Mnemonic,
    pub format: Format,
    pub op1: u8,
    pub op2: Option<u32>,
    pub operands: &'static [OperandSpec],
    pub attrs: Attrs,
}

impl Entry {
    pub fn key(&self) -> OpcodeKey {
        OpcodeKey { format: self.format, op1: self.op1, op2: self.op2 }
    }

    /// The opcode bits alone, every operand field zero.
    pub fn opcode_bits(&self) -> u32 {
        let op2 = match (self.format.op2_field(), self.op2) {
            (Some(f), Some(v)) => (v & f.mask()) << f.lo,
            _ => 0,
        };
        u32::from(self.op1) | op2
    }

    /// One past the highest bit any operand field reads.
    pub fn operand_bits_end(&self) -> usize {
        let imm_end = |imm: &ImmSpec| imm.parts.iter().map(|p| p.src.end()).max().unwrap_or(0);
        self.operands
            .iter()
            .map(|op| match op {
                OperandSpec::Reg { field, .. } => field.end(),
                OperandSpec::Fixed { .. } => 0,
                OperandSpec::Imm { imm, .. } => imm_end(imm),
                OperandSpec::Mem { base, disp, .. } => {
                    let base_end = match base {
                        BaseSpec::Reg { field, .. } => field.end(),
                        BaseSpec::Fixed(_) => 0,
                    };
                    base_end.max(imm_end(disp))
                }
            })
            .max()
            .unwrap_or(0)
    }

    /// False if a template position needs an addressing mode the operand
    /// model cannot express.
    pub fn is_representable(&self) -> bool {
        self.operands.iter().all(|op| {
            !matches!(op, OperandSpec::Mem { mode, .. } if *mode != AddressingMode::BaseDisp)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpcodeKey {
    pub format: Format,
    pub op1: u8,
    pub op2: Option<u32>,
}

// ---------------------------------------------------------------------------
// Template vocabulary
// ---------------------------------------------------------------------------

const R: Access = Access::READ;
const W: Access = Access::WRITE;
const RW: Access = Access::READ_WRITE;

/// s1/d, bits [11:8]
const A: Field = Field::new(8, 4);
/// s2, bits [15:12]
const B: Field = Field::new(12, 4);
/// d of 32-bit formats, bits [31:28]
const C: Field = Field::new(28, 4);

const NONE: Attrs = Attrs { update_flags: false, groups: Groups::empty(), features: &[] };
const FLAGS: Attrs = Attrs { update_flags: true, ..NONE };
const JUMP: Attrs = Attrs { groups: Groups::JUMP, ..NONE };
const CALL: Attrs = Attrs { groups: Groups::CALL, ..NONE };

const V160_UP: &[Feature] = &[Feature::AtLeast(IsaVersion::V160)];
const V161_UP: &[Feature] = &[Feature::AtLeast(IsaVersion::V161)];
const V110_ONLY: &[Feature] = &[Feature::Has(IsaVersion::V110)];

const fn s(src: Field, dst: u8) -> Scatter {
    Scatter::new(src, dst)
}

const P_CONST4: &[Scatter] = &[s(Field::new(12, 4), 0)];
const P_DISP8: &[Scatter] = &[s(Field::new(8, 8), 0)];
const P_DISP4: &[Scatter] = &[s(Field::new(8, 4), 0)];
const P_CONST8: &[Scatter] = &[s(Field::new(8, 8), 0)];
const P_OFF4: &[Scatter] = &[s(Field::new(12, 4), 0)];
/// SRO keeps off4 in [11:8] and the base in [15:12].
const P_OFF4_SRO: &[Scatter] = &[s(Field::new(8, 4), 0)];
const P_N_SRRS: &[Scatter] = &[s(Field::new(6, 2), 0)];
const P_DISP24: &[Scatter] = &[s(Field::new(16, 16), 0), s(Field::new(8, 8), 16)];
const P_ABS24: &[Scatter] = &[s(Field::new(16, 16), 1), s(Field::new(8, 4), 17), s(Field::new(12, 4), 28)];
const P_OFF10: &[Scatter] = &[s(Field::new(16, 6), 0), s(Field::new(28, 4), 6)];
const P_OFF16: &[Scatter] = &[s(Field::new(16, 6), 0), s(Field::new(28, 4), 6), s(Field::new(22, 6), 10)];
const P_OFF18: &[Scatter] = &[
    s(Field::new(16, 6), 0),
    s(Field::new(28, 4), 6),
    s(Field::new(22, 4), 10),
    s(Field::new(12, 4), 28),
];
const P_DISP15: &[Scatter] = &[s(Field::new(16, 15), 0)];
const P_N_BRN: &[Scatter] = &[s(Field::new(12, 4), 0), s(Field::new(7, 1), 4)];
const P_CONST9: &[Scatter] = &[s(Field::new(12, 9), 0)];
const P_CONST16: &[Scatter] = &[s(Field::new(12, 16), 0)];
const P_N_RR: &[Scatter] = &[s(Field::new(16, 2), 0)];

const SCONST4: ImmSpec = ImmSpec::signed(P_CONST4);
const UCONST4: ImmSpec = ImmSpec::unsigned(P_CONST4);
const DISP8: ImmSpec = ImmSpec::signed(P_DISP8).scaled(1);
const DISP4: ImmSpec = ImmSpec::unsigned(P_DISP4).scaled(1);
/// disp4 + 16, the far 16-bit branch forms.
const DISP4_FAR: ImmSpec = ImmSpec::unsigned(P_DISP4).with_fixed(0x10).scaled(1);
/// One-extended disp4; 16-bit `loop` only branches backwards.
const DISP4_BACK: ImmSpec = ImmSpec::signed(P_DISP4).with_fixed(0x10).scaled(1);
const CONST8: ImmSpec = ImmSpec::unsigned(P_CONST8);
const CONST8_X4: ImmSpec = ImmSpec::unsigned(P_CONST8).scaled(2);
const OFF4: ImmSpec = ImmSpec::unsigned(P_OFF4);
const OFF4_X2: ImmSpec = ImmSpec::unsigned(P_OFF4).scaled(1);
const OFF4_X4: ImmSpec = ImmSpec::unsigned(P_OFF4).scaled(2);
const OFF4_SRO: ImmSpec = ImmSpec::unsigned(P_OFF4_SRO);
const OFF4_SRO_X2: ImmSpec = ImmSpec::unsigned(P_OFF4_SRO).scaled(1);
const OFF4_SRO_X4: ImmSpec = ImmSpec::unsigned(P_OFF4_SRO).scaled(2);
const N_SRRS: ImmSpec = ImmSpec::unsigned(P_N_SRRS);
const DISP24: ImmSpec = ImmSpec::signed(P_DISP24).scaled(1);
/// `{disp24[23:20], 7'b0, disp24[19:0], 1'b0}`
const ABS24: ImmSpec = ImmSpec::unsigned(P_ABS24);
const OFF10: ImmSpec = ImmSpec::signed(P_OFF10);
const OFF16: ImmSpec = ImmSpec::signed(P_OFF16);
/// `{off18[17:14], 14'b0, off18[13:0]}`
const OFF18: ImmSpec = ImmSpec::unsigned(P_OFF18);
const DISP15: ImmSpec = ImmSpec::signed(P_DISP15).scaled(1);
const N_BRN: ImmSpec = ImmSpec::unsigned(P_N_BRN);
const N4: ImmSpec = ImmSpec::unsigned(P_CONST4);
const SCONST9: ImmSpec = ImmSpec::signed(P_CONST9);
const UCONST9: ImmSpec = ImmSpec::unsigned(P_CONST9);
const SCONST16: ImmSpec = ImmSpec::signed(P_CONST16);
const UCONST16: ImmSpec = ImmSpec::unsigned(P_CONST16);
const N_RR: ImmSpec = ImmSpec::unsigned(P_N_RR);

const fn d(field: Field, access: Access) -> OperandSpec {
    OperandSpec::Reg { class: RegClass::Data, field, access }
}

const fn a(field: Field, access: Access) -> OperandSpec {
    OperandSpec::Reg { class: RegClass::Addr, field, access }
}

const fn e(field: Field, access: Access) -> OperandSpec {
    OperandSpec::Reg { class: RegClass::DataPair, field, access }
}

const fn ap(field: Field, access: Access) -> OperandSpec {
    OperandSpec::Reg { class: RegClass::AddrPair, field, access }
}

const fn fixed(reg: Register, access: Access) -> OperandSpec {
    OperandSpec::Fixed { reg, access }
}

const fn imm(imm: ImmSpec) -> OperandSpec {
    OperandSpec::Imm { imm, access: R }
}

const fn mem_mode(base: BaseSpec, disp: ImmSpec, mode: AddressingMode, access: Access) -> OperandSpec {
    OperandSpec::Mem { base, disp, mode, access }
}

const fn mem(field: Field, disp: ImmSpec, access: Access) -> OperandSpec {
    mem_mode(BaseSpec::Reg { class: RegClass::Addr, field }, disp, AddressingMode::BaseDisp, access)
}

const fn mem_at(base: Register, disp: ImmSpec, access: Access) -> OperandSpec {
    mem_mode(BaseSpec::Fixed(base), disp, AddressingMode::BaseDisp, access)
}

const fn post(field: Field, disp: ImmSpec, access: Access) -> OperandSpec {
    mem_mode(BaseSpec::Reg { class: RegClass::Addr, field }, disp, AddressingMode::PostIncrement, access)
}

const fn pre(field: Field, disp: ImmSpec, access: Access) -> OperandSpec {
    mem_mode(BaseSpec::Reg { class: RegClass::Addr, field }, disp, AddressingMode::PreIncrement, access)
}

const fn circ(field: Field, disp: ImmSpec, access: Access) -> OperandSpec {
    mem_mode(BaseSpec::Reg { class: RegClass::PtrPair, field }, disp, AddressingMode::Circular, access)
}

const fn bitrev(field: Field, access: Access) -> OperandSpec {
    mem_mode(BaseSpec::Reg { class: RegClass::PtrPair, field }, ImmSpec::ZERO, AddressingMode::BitReverse, access)
}

const D15: Register = Register::D15;
const A10: Register = Register::A10;
const A15: Register = Register::A15;

macro_rules! insn {
    ($m:ident, $fmt:ident, $op1:literal / $op2:literal, [$($op:expr),* $(,)?], $attrs:expr) => {
        Entry {
            mnemonic: Mnemonic::$m,
            format: Format::$fmt,
            op1: $op1,
            op2: Some($op2),
            operands: &[$($op),*],
            attrs: $attrs,
        }
    };
    ($m:ident, $fmt:ident, $op1:literal, [$($op:expr),* $(,)?], $attrs:expr) => {
        Entry {
            mnemonic: Mnemonic::$m,
            format: Format::$fmt,
            op1: $op1,
            op2: None,
            operands: &[$($op),*],
            attrs: $attrs,
        }
    };
}

/// The TriCore encodings this decoder understands.
pub static TABLE: &[Entry] = &[
    // ---- SR ----
    insn!(Nop, Sr, 0x00 / 0x0, [], NONE),
    insn!(Fret, Sr, 0x00 / 0x7, [], NONE.gated(V160_UP)),
    insn!(Rfe, Sr, 0x00 / 0x8, [], NONE),
    insn!(Ret, Sr, 0x00 / 0x9, [], NONE),
    insn!(Debug, Sr, 0x00 / 0xA, [], NONE),
    insn!(SatB, Sr, 0x32 / 0x0, [d(A, RW)], NONE),
    insn!(SatBu, Sr, 0x32 / 0x1, [d(A, RW)], NONE),
    insn!(SatH, Sr, 0x32 / 0x2, [d(A, RW)], NONE),
    insn!(SatHu, Sr, 0x32 / 0x3, [d(A, RW)], NONE),
    insn!(Rsub, Sr, 0x32 / 0x5, [d(A, RW)], FLAGS),
    insn!(Not, Sr, 0x46 / 0x0, [d(A, RW)], NONE),
    insn!(Ji, Sr, 0xDC / 0x0, [a(A, R)], JUMP),
    // ---- SRC ----
    insn!(Mov, Src, 0x82, [d(A, W), imm(SCONST4)], NONE),
    insn!(Mov, Src, 0xD2, [e(A, W), imm(SCONST4)], NONE.gated(V160_UP)),
    insn!(Add, Src, 0xC2, [d(A, RW), imm(SCONST4)], FLAGS),
    insn!(Add, Src, 0x92, [d(A, W), fixed(D15, R), imm(SCONST4)], FLAGS),
    insn!(Add, Src, 0x9A, [fixed(D15, W), d(A, R), imm(SCONST4)], FLAGS),
    insn!(Eq, Src, 0xBA, [fixed(D15, W), d(A, R), imm(SCONST4)], NONE),
    insn!(Lt, Src, 0xFA, [fixed(D15, W), d(A, R), imm(SCONST4)], NONE),
    insn!(Sh, Src, 0x06, [d(A, RW), imm(SCONST4)], NONE),
    insn!(Sha, Src, 0x86, [d(A, RW), imm(SCONST4)], FLAGS),
    insn!(MovA, Src, 0xA0, [a(A, W), imm(UCONST4)], NONE),
    insn!(AddA, Src, 0xB0, [a(A, RW), imm(SCONST4)], NONE),
    insn!(Cmov, Src, 0xAA, [d(A, RW), fixed(D15, R), imm(SCONST4)], NONE),
    insn!(Cmovn, Src, 0xEA, [d(A, RW), fixed(D15, R), imm(SCONST4)], NONE),
    // ---- SRR ----
    insn!(Mov, Srr, 0x02, [d(A, W), d(B, R)], NONE),
    insn!(Add, Srr, 0x42, [d(A, RW), d(B, R)], FLAGS),
    insn!(Add, Srr, 0x12, [d(A, W), fixed(D15, R), d(B, R)], FLAGS),
    insn!(Add, Srr, 0x1A, [fixed(D15, W), d(A, R), d(B, R)], FLAGS),
    insn!(Sub, Srr, 0xA2, [d(A, RW), d(B, R)], FLAGS),
    insn!(Sub, Srr, 0x52, [d(A, W), fixed(D15, R), d(B, R)], FLAGS),
    insn!(Sub, Srr, 0x5A, [fixed(D15, W), d(A, R), d(B, R)], FLAGS),
    insn!(Adds, Srr, 0x22, [d(A, RW), d(B, R)], FLAGS),
    insn!(Subs, Srr, 0x62, [d(A, RW), d(B, R)], FLAGS),
    insn!(And, Srr, 0x26, [d(A, RW), d(B, R)], NONE),
    insn!(Or, Srr, 0xA6, [d(A, RW), d(B, R)], NONE),
    insn!(Xor, Srr, 0xC6, [d(A, RW), d(B, R)], NONE),
    insn!(Mul, Srr, 0xE2, [d(A, RW), d(B, R)], FLAGS),
    insn!(MovA, Srr, 0x60, [a(A, W), d(B, R)], NONE),
    insn!(MovAa, Srr, 0x40, [a(A, W), a(B, R)], NONE),
    insn!(MovD, Srr, 0x80, [d(A, W), a(B, R)], NONE),
    insn!(AddA, Srr, 0x30, [a(A, RW), a(B, R)], NONE),
    insn!(Eq, Srr, 0x3A, [fixed(D15, W), d(A, R), d(B, R)], NONE),
    insn!(Lt, Srr, 0x7A, [fixed(D15, W), d(A, R), d(B, R)], NONE),
    insn!(Cmov, Srr, 0x2A, [d(A, RW), fixed(D15, R), d(B, R)], NONE),
    insn!(Cmovn, Srr, 0x6A, [d(A, RW), fixed(D15, R), d(B, R)], NONE),
    // ---- SB ----
    insn!(J, Sb, 0x3C, [imm(DISP8)], JUMP),
    insn!(Call, Sb, 0x5C, [imm(DISP8)], CALL),
    insn!(Jz, Sb, 0x6E, [fixed(D15, R), imm(DISP8)], JUMP),
    insn!(Jnz, Sb, 0xEE, [fixed(D15, R), imm(DISP8)], JUMP),
    // ---- SBC ----
    insn!(Jeq, Sbc, 0x1E, [fixed(D15, R), imm(SCONST4), imm(DISP4)], JUMP),
    insn!(Jne, Sbc, 0x5E, [fixed(D15, R), imm(SCONST4), imm(DISP4)], JUMP),
    insn!(Jeq, Sbc, 0x9E, [fixed(D15, R), imm(SCONST4), imm(DISP4_FAR)], JUMP.gated(V160_UP)),
    insn!(Jne, Sbc, 0xDE, [fixed(D15, R), imm(SCONST4), imm(DISP4_FAR)], JUMP.gated(V160_UP)),
    // ---- SBR ----
    insn!(Jeq, Sbr, 0x3E, [fixed(D15, R), d(B, R), imm(DISP4)], JUMP),
    insn!(Jne, Sbr, 0x7E, [fixed(D15, R), d(B, R), imm(DISP4)], JUMP),
    insn!(Jeq, Sbr, 0xBE, [fixed(D15, R), d(B, R), imm(DISP4_FAR)], JUMP.gated(V160_UP)),
    insn!(Jne, Sbr, 0xFE, [fixed(D15, R), d(B, R), imm(DISP4_FAR)], JUMP.gated(V160_UP)),
    insn!(Jgez, Sbr, 0xCE, [d(B, R), imm(DISP4)], JUMP),
    insn!(Jgtz, Sbr, 0x4E, [d(B, R), imm(DISP4)], JUMP),
    insn!(Jlez, Sbr, 0x8E, [d(B, R), imm(DISP4)], JUMP),
    insn!(Jltz, Sbr, 0x0E, [d(B, R), imm(DISP4)], JUMP),
    insn!(Jz, Sbr, 0x76, [d(B, R), imm(DISP4)], JUMP),
    insn!(Jnz, Sbr, 0xF6, [d(B, R), imm(DISP4)], JUMP),
    insn!(JzA, Sbr, 0xBC, [a(B, R), imm(DISP4)], JUMP),
    insn!(JnzA, Sbr, 0x7C, [a(B, R), imm(DISP4)], JUMP),
    insn!(Loop, Sbr, 0xFC, [a(B, RW), imm(DISP4_BACK)], JUMP),
    // ---- SBRN ----
    insn!(JzT, Sbrn, 0x2E, [fixed(D15, R), imm(N4), imm(DISP4)], JUMP),
    insn!(JnzT, Sbrn, 0xAE, [fixed(D15, R), imm(N4), imm(DISP4)], JUMP),
    // ---- SC ----
    insn!(SubA, Sc, 0x20, [fixed(A10, RW), imm(CONST8)], NONE),
    insn!(Mov, Sc, 0xDA, [fixed(D15, W), imm(CONST8)], NONE),
    insn!(And, Sc, 0x16, [fixed(D15, RW), imm(CONST8)], NONE),
    insn!(Or, Sc, 0x96, [fixed(D15, RW), imm(CONST8)], NONE),
    insn!(LdW, Sc, 0x58, [fixed(D15, W), mem_at(A10, CONST8_X4, R)], NONE),
    insn!(StW, Sc, 0x78, [mem_at(A10, CONST8_X4, W), fixed(D15, R)], NONE),
    insn!(LdA, Sc, 0xD8, [fixed(A15, W), mem_at(A10, CONST8_X4, R)], NONE),
    insn!(StA, Sc, 0xF8, [mem_at(A10, CONST8_X4, W), fixed(A15, R)], NONE),
    insn!(Bisr, Sc, 0xE0, [imm(CONST8)], NONE),
    // ---- SLR ----
    insn!(LdW, Slr, 0x54, [d(A, W), mem(B, ImmSpec::ZERO, R)], NONE),
    insn!(LdW, Slr, 0x44, [d(A, W), post(B, ImmSpec::ZERO, R)], NONE),
    insn!(LdBu, Slr, 0x14, [d(A, W), mem(B, ImmSpec::ZERO, R)], NONE),
    insn!(LdBu, Slr, 0x04, [d(A, W), post(B, ImmSpec::ZERO, R)], NONE),
    insn!(LdH, Slr, 0x94, [d(A, W), mem(B, ImmSpec::ZERO, R)], NONE),
    insn!(LdH, Slr, 0x84, [d(A, W), post(B, ImmSpec::ZERO, R)], NONE),
    insn!(LdA, Slr, 0xD4, [a(A, W), mem(B, ImmSpec::ZERO, R)], NONE),
    insn!(LdA, Slr, 0xC4, [a(A, W), post(B, ImmSpec::ZERO, R)], NONE),
    // ---- SLRO ----
    insn!(LdW, Slro, 0x48, [d(A, W), mem_at(A15, OFF4_X4, R)], NONE),
    insn!(LdBu, Slro, 0x08, [d(A, W), mem_at(A15, OFF4, R)], NONE),
    insn!(LdH, Slro, 0x88, [d(A, W), mem_at(A15, OFF4_X2, R)], NONE),
    insn!(LdA, Slro, 0xC8, [a(A, W), mem_at(A15, OFF4_X4, R)], NONE),
    // ---- SRO ----
    insn!(LdW, Sro, 0x4C, [fixed(D15, W), mem(B, OFF4_SRO_X4, R)], NONE),
    insn!(LdBu, Sro, 0x0C, [fixed(D15, W), mem(B, OFF4_SRO, R)], NONE),
    insn!(LdH, Sro, 0x8C, [fixed(D15, W), mem(B, OFF4_SRO_X2, R)], NONE),
    insn!(LdA, Sro, 0xCC, [fixed(A15, W), mem(B, OFF4_SRO_X4, R)], NONE),
    insn!(StW, Sro, 0x6C, [mem(B, OFF4_SRO_X4, W), fixed(D15, R)], NONE),
    insn!(StB, Sro, 0x2C, [mem(B, OFF4_SRO, W), fixed(D15, R)], NONE),
    insn!(StH, Sro, 0xAC, [mem(B, OFF4_SRO_X2, W), fixed(D15, R)], NONE),
    insn!(StA, Sro, 0xEC, [mem(B, OFF4_SRO_X4, W), fixed(A15, R)], NONE),
    // ---- SSR ----
    insn!(StW, Ssr, 0x74, [mem(B, ImmSpec::ZERO, W), d(A, R)], NONE),
    insn!(StW, Ssr, 0x64, [post(B, ImmSpec::ZERO, W), d(A, R)], NONE),
    insn!(StB, Ssr, 0x34, [mem(B, ImmSpec::ZERO, W), d(A, R)], NONE),
    insn!(StB, Ssr, 0x24, [post(B, ImmSpec::ZERO, W), d(A, R)], NONE),
    insn!(StH, Ssr, 0xB4, [mem(B, ImmSpec::ZERO, W), d(A, R)], NONE),
    insn!(StH, Ssr, 0xA4, [post(B, ImmSpec::ZERO, W), d(A, R)], NONE),
    insn!(StA, Ssr, 0xF4, [mem(B, ImmSpec::ZERO, W), a(A, R)], NONE),
    insn!(StA, Ssr, 0xE4, [post(B, ImmSpec::ZERO, W), a(A, R)], NONE),
    // ---- SSRO ----
    insn!(StW, Ssro, 0x68, [mem_at(A15, OFF4_X4, W), d(A, R)], NONE),
    insn!(StB, Ssro, 0x28, [mem_at(A15, OFF4, W), d(A, R)], NONE),
    insn!(StH, Ssro, 0xA8, [mem_at(A15, OFF4_X2, W), d(A, R)], NONE),
    insn!(StA, Ssro, 0xE8, [mem_at(A15, OFF4_X4, W), a(A, R)], NONE),
    // ---- SRRS ----
    insn!(AddscA, Srrs, 0x10, [a(A, W), a(B, R), fixed(D15, R), imm(N_SRRS)], NONE),
    // ---- B ----
    insn!(J, B, 0x1D, [imm(DISP24)], JUMP),
    insn!(Ja, B, 0x9D, [imm(ABS24)], JUMP),
    insn!(Jl, B, 0x5D, [imm(DISP24)], CALL),
    insn!(Jla, B, 0xDD, [imm(ABS24)], CALL),
    insn!(Call, B, 0x6D, [imm(DISP24)], CALL),
    insn!(Calla, B, 0xED, [imm(ABS24)], CALL),
    insn!(Fcall, B, 0x61, [imm(DISP24)], CALL.gated(V160_UP)),
    insn!(Fcalla, B, 0xE1, [imm(ABS24)], CALL.gated(V160_UP)),
    // ---- BO: loads ----
    insn!(LdB, Bo, 0x09 / 0x20, [d(A, W), mem(B, OFF10, R)], NONE),
    insn!(LdBu, Bo, 0x09 / 0x21, [d(A, W), mem(B, OFF10, R)], NONE),
    insn!(LdH, Bo, 0x09 / 0x22, [d(A, W), mem(B, OFF10, R)], NONE),
    insn!(LdHu, Bo, 0x09 / 0x23, [d(A, W), mem(B, OFF10, R)], NONE),
    insn!(LdW, Bo, 0x09 / 0x24, [d(A, W), mem(B, OFF10, R)], NONE),
    insn!(LdD, Bo, 0x09 / 0x25, [e(A, W), mem(B, OFF10, R)], NONE),
    insn!(LdA, Bo, 0x09 / 0x26, [a(A, W), mem(B, OFF10, R)], NONE),
    insn!(LdDa, Bo, 0x09 / 0x27, [ap(A, W), mem(B, OFF10, R)], NONE),
    insn!(LdQ, Bo, 0x09 / 0x28, [d(A, W), mem(B, OFF10, R)], NONE),
    insn!(LdB, Bo, 0x09 / 0x00, [d(A, W), post(B, OFF10, R)], NONE),
    insn!(LdW, Bo, 0x09 / 0x04, [d(A, W), post(B, OFF10, R)], NONE),
    insn!(LdA, Bo, 0x09 / 0x06, [a(A, W), post(B, OFF10, R)], NONE),
    insn!(LdB, Bo, 0x09 / 0x10, [d(A, W), pre(B, OFF10, R)], NONE),
    insn!(LdW, Bo, 0x09 / 0x14, [d(A, W), pre(B, OFF10, R)], NONE),
    insn!(LdA, Bo, 0x09 / 0x16, [a(A, W), pre(B, OFF10, R)], NONE),
    insn!(LdW, Bo, 0x29 / 0x04, [d(A, W), bitrev(B, R)], NONE),
    insn!(LdW, Bo, 0x29 / 0x14, [d(A, W), circ(B, OFF10, R)], NONE),
    // ---- BO: stores ----
    insn!(StB, Bo, 0x89 / 0x20, [mem(B, OFF10, W), d(A, R)], NONE),
    insn!(StH, Bo, 0x89 / 0x22, [mem(B, OFF10, W), d(A, R)], NONE),
    insn!(StW, Bo, 0x89 / 0x24, [mem(B, OFF10, W), d(A, R)], NONE),
    insn!(StD, Bo, 0x89 / 0x25, [mem(B, OFF10, W), e(A, R)], NONE),
    insn!(StA, Bo, 0x89 / 0x26, [mem(B, OFF10, W), a(A, R)], NONE),
    insn!(StDa, Bo, 0x89 / 0x27, [mem(B, OFF10, W), ap(A, R)], NONE),
    insn!(StQ, Bo, 0x89 / 0x28, [mem(B, OFF10, W), d(A, R)], NONE),
    insn!(StW, Bo, 0x89 / 0x04, [post(B, OFF10, W), d(A, R)], NONE),
    insn!(StW, Bo, 0x89 / 0x14, [pre(B, OFF10, W), d(A, R)], NONE),
    insn!(StW, Bo, 0xA9 / 0x04, [bitrev(B, W), d(A, R)], NONE),
    insn!(StW, Bo, 0xA9 / 0x14, [circ(B, OFF10, W), d(A, R)], NONE),
    // ---- BO: address and atomics ----
    insn!(Lea, Bo, 0x49 / 0x28, [a(A, W), mem(B, OFF10, R)], NONE),
    insn!(SwapW, Bo, 0x49 / 0x20, [mem(B, OFF10, RW), d(A, RW)], NONE),
    insn!(Ldmst, Bo, 0x49 / 0x21, [mem(B, OFF10, RW), e(A, R)], NONE),
    insn!(SwapmskW, Bo, 0x49 / 0x22, [mem(B, OFF10, RW), e(A, RW)], NONE.gated(V161_UP)),
    insn!(CmpswapW, Bo, 0x49 / 0x23, [mem(B, OFF10, RW), e(A, RW)], NONE.gated(V161_UP)),
    // ---- BOL ----
    insn!(LdW, Bol, 0x19, [d(A, W), mem(B, OFF16, R)], NONE),
    insn!(LdA, Bol, 0x99, [a(A, W), mem(B, OFF16, R)], NONE),
    insn!(StW, Bol, 0x59, [mem(B, OFF16, W), d(A, R)], NONE),
    insn!(StA, Bol, 0xB5, [mem(B, OFF16, W), a(A, R)], NONE),
    insn!(Lea, Bol, 0xD9, [a(A, W), mem(B, OFF16, R)], NONE),
    insn!(LdB, Bol, 0x79, [d(A, W), mem(B, OFF16, R)], NONE.gated(V160_UP)),
    insn!(LdBu, Bol, 0x39, [d(A, W), mem(B, OFF16, R)], NONE.gated(V160_UP)),
    insn!(LdH, Bol, 0xC9, [d(A, W), mem(B, OFF16, R)], NONE.gated(V160_UP)),
    insn!(LdHu, Bol, 0xB9, [d(A, W), mem(B, OFF16, R)], NONE.gated(V160_UP)),
    insn!(StB, Bol, 0xE9, [mem(B, OFF16, W), d(A, R)], NONE.gated(V160_UP)),
    insn!(StH, Bol, 0xF9, [mem(B, OFF16, W), d(A, R)], NONE.gated(V160_UP)),
    // ---- ABS ----
    insn!(LdB, Abs, 0x05 / 0x0, [d(A, W), imm(OFF18)], NONE),
    insn!(LdBu, Abs, 0x05 / 0x1, [d(A, W), imm(OFF18)], NONE),
    insn!(LdH, Abs, 0x05 / 0x2, [d(A, W), imm(OFF18)], NONE),
    insn!(LdHu, Abs, 0x05 / 0x3, [d(A, W), imm(OFF18)], NONE),
    insn!(LdW, Abs, 0x85 / 0x0, [d(A, W), imm(OFF18)], NONE),
    insn!(LdD, Abs, 0x85 / 0x1, [e(A, W), imm(OFF18)], NONE),
    insn!(LdA, Abs, 0x85 / 0x2, [a(A, W), imm(OFF18)], NONE),
    insn!(LdDa, Abs, 0x85 / 0x3, [ap(A, W), imm(OFF18)], NONE),
    insn!(StB, Abs, 0x25 / 0x0, [imm(OFF18), d(A, R)], NONE),
    insn!(StH, Abs, 0x25 / 0x2, [imm(OFF18), d(A, R)], NONE),
    insn!(StW, Abs, 0xA5 / 0x0, [imm(OFF18), d(A, R)], NONE),
    insn!(StD, Abs, 0xA5 / 0x1, [imm(OFF18), e(A, R)], NONE),
    insn!(StA, Abs, 0xA5 / 0x2, [imm(OFF18), a(A, R)], NONE),
    insn!(StDa, Abs, 0xA5 / 0x3, [imm(OFF18), ap(A, R)], NONE),
    insn!(Lea, Abs, 0xC5 / 0x0, [a(A, W), imm(OFF18)], NONE),
    // ---- BRC ----
    insn!(Jeq, Brc, 0xDF / 0, [d(A, R), imm(SCONST4), imm(DISP15)], JUMP),
    insn!(Jne, Brc, 0xDF / 1, [d(A, R), imm(SCONST4), imm(DISP15)], JUMP),
    insn!(Jge, Brc, 0xFF / 0, [d(A, R), imm(SCONST4), imm(DISP15)], JUMP),
    insn!(JgeU, Brc, 0xFF / 1, [d(A, R), imm(UCONST4), imm(DISP15)], JUMP),
    insn!(Jlt, Brc, 0xBF / 0, [d(A, R), imm(SCONST4), imm(DISP15)], JUMP),
    insn!(JltU, Brc, 0xBF / 1, [d(A, R), imm(UCONST4), imm(DISP15)], JUMP),
    insn!(Jnei, Brc, 0x9F / 0, [d(A, RW), imm(SCONST4), imm(DISP15)], JUMP),
    insn!(Jned, Brc, 0x9F / 1, [d(A, RW), imm(SCONST4), imm(DISP15)], JUMP),
    // ---- BRR ----
    insn!(Jeq, Brr, 0x5F / 0, [d(A, R), d(B, R), imm(DISP15)], JUMP),
    insn!(Jne, Brr, 0x5F / 1, [d(A, R), d(B, R), imm(DISP15)], JUMP),
    insn!(Jge, Brr, 0x7F / 0, [d(A, R), d(B, R), imm(DISP15)], JUMP),
    insn!(JgeU, Brr, 0x7F / 1, [d(A, R), d(B, R), imm(DISP15)], JUMP),
    insn!(Jlt, Brr, 0x3F / 0, [d(A, R), d(B, R), imm(DISP15)], JUMP),
    insn!(JltU, Brr, 0x3F / 1, [d(A, R), d(B, R), imm(DISP15)], JUMP),
    insn!(Jnei, Brr, 0x1F / 0, [d(A, RW), d(B, R), imm(DISP15)], JUMP),
    insn!(Jned, Brr, 0x1F / 1, [d(A, RW), d(B, R), imm(DISP15)], JUMP),
    insn!(JeqA, Brr, 0x7D / 0, [a(A, R), a(B, R), imm(DISP15)], JUMP),
    insn!(JneA, Brr, 0x7D / 1, [a(A, R), a(B, R), imm(DISP15)], JUMP),
    insn!(JzA, Brr, 0xBD / 0, [a(A, R), imm(DISP15)], JUMP),
    insn!(JnzA, Brr, 0xBD / 1, [a(A, R), imm(DISP15)], JUMP),
    insn!(Loop, Brr, 0xFD / 0, [a(B, RW), imm(DISP15)], JUMP),
    insn!(Loopu, Brr, 0xFD / 1, [imm(DISP15)], JUMP),
    // ---- BRN ----
    insn!(JzT, Brn, 0x6F / 0, [d(A, R), imm(N_BRN), imm(DISP15)], JUMP),
    insn!(JnzT, Brn, 0x6F / 1, [d(A, R), imm(N_BRN), imm(DISP15)], JUMP),
    // ---- RC: arithmetic ----
    insn!(Add, Rc, 0x8B / 0x00, [d(C, W), d(A, R), imm(SCONST9)], FLAGS),
    insn!(Adds, Rc, 0x8B / 0x02, [d(C, W), d(A, R), imm(SCONST9)], FLAGS),
    insn!(AddsU, Rc, 0x8B / 0x03, [d(C, W), d(A, R), imm(SCONST9)], FLAGS),
    insn!(Addx, Rc, 0x8B / 0x04, [d(C, W), d(A, R), imm(SCONST9)], FLAGS),
    insn!(Addc, Rc, 0x8B / 0x05, [d(C, W), d(A, R), imm(SCONST9)], FLAGS),
    insn!(Rsub, Rc, 0x8B / 0x08, [d(C, W), d(A, R), imm(SCONST9)], FLAGS),
    insn!(Absdif, Rc, 0x8B / 0x0E, [d(C, W), d(A, R), imm(SCONST9)], FLAGS),
    insn!(Eq, Rc, 0x8B / 0x10, [d(C, W), d(A, R), imm(SCONST9)], NONE),
    insn!(Ne, Rc, 0x8B / 0x11, [d(C, W), d(A, R), imm(SCONST9)], NONE),
    insn!(Lt, Rc, 0x8B / 0x12, [d(C, W), d(A, R), imm(SCONST9)], NONE),
    insn!(LtU, Rc, 0x8B / 0x13, [d(C, W), d(A, R), imm(UCONST9)], NONE),
    insn!(Ge, Rc, 0x8B / 0x14, [d(C, W), d(A, R), imm(SCONST9)], NONE),
    insn!(GeU, Rc, 0x8B / 0x15, [d(C, W), d(A, R), imm(UCONST9)], NONE),
    insn!(Min, Rc, 0x8B / 0x18, [d(C, W), d(A, R), imm(SCONST9)], NONE),
    insn!(MinU, Rc, 0x8B / 0x19, [d(C, W), d(A, R), imm(UCONST9)], NONE),
    insn!(Max, Rc, 0x8B / 0x1A, [d(C, W), d(A, R), imm(SCONST9)], NONE),
    insn!(MaxU, Rc, 0x8B / 0x1B, [d(C, W), d(A, R), imm(UCONST9)], NONE),
    // ---- RC: logic and shifts ----
    insn!(Sh, Rc, 0x8F / 0x00, [d(C, W), d(A, R), imm(SCONST9)], NONE),
    insn!(Sha, Rc, 0x8F / 0x01, [d(C, W), d(A, R), imm(SCONST9)], FLAGS),
    insn!(And, Rc, 0x8F / 0x08, [d(C, W), d(A, R), imm(UCONST9)], NONE),
    insn!(Nand, Rc, 0x8F / 0x09, [d(C, W), d(A, R), imm(UCONST9)], NONE),
    insn!(Or, Rc, 0x8F / 0x0A, [d(C, W), d(A, R), imm(UCONST9)], NONE),
    insn!(Nor, Rc, 0x8F / 0x0B, [d(C, W), d(A, R), imm(UCONST9)], NONE),
    insn!(Xor, Rc, 0x8F / 0x0C, [d(C, W), d(A, R), imm(UCONST9)], NONE),
    insn!(Xnor, Rc, 0x8F / 0x0D, [d(C, W), d(A, R), imm(UCONST9)], NONE),
    insn!(Andn, Rc, 0x8F / 0x0E, [d(C, W), d(A, R), imm(UCONST9)], NONE),
    insn!(Orn, Rc, 0x8F / 0x0F, [d(C, W), d(A, R), imm(UCONST9)], NONE),
    // ---- RC: multiply and system ----
    insn!(Mul, Rc, 0x53 / 0x01, [d(C, W), d(A, R), imm(SCONST9)], FLAGS),
    insn!(MulU, Rc, 0x53 / 0x02, [e(C, W), d(A, R), imm(UCONST9)], FLAGS),
    insn!(Mul, Rc, 0x53 / 0x03, [e(C, W), d(A, R), imm(SCONST9)], FLAGS),
    insn!(Bisr, Rc, 0xAD / 0x00, [imm(UCONST9)], NONE),
    insn!(Syscall, Rc, 0xAD / 0x04, [imm(UCONST9)], NONE),
    // ---- RLC ----
    insn!(Addi, Rlc, 0x1B, [d(C, W), d(A, R), imm(SCONST16)], FLAGS),
    insn!(Addih, Rlc, 0x9B, [d(C, W), d(A, R), imm(UCONST16)], FLAGS),
    insn!(AddihA, Rlc, 0x11, [a(C, W), a(A, R), imm(UCONST16)], NONE),
    insn!(Mov, Rlc, 0x3B, [d(C, W), imm(SCONST16)], NONE),
    insn!(MovU, Rlc, 0xBB, [d(C, W), imm(UCONST16)], NONE),
    insn!(Movh, Rlc, 0x7B, [d(C, W), imm(UCONST16)], NONE),
    insn!(MovhA, Rlc, 0x91, [a(C, W), imm(UCONST16)], NONE),
    insn!(Mov, Rlc, 0xFB, [e(C, W), imm(SCONST16)], NONE.gated(V160_UP)),
    insn!(Mfcr, Rlc, 0x4D, [d(C, W), imm(UCONST16)], NONE),
    insn!(Mtcr, Rlc, 0xCD, [imm(UCONST16), d(A, R)], NONE),
    // ---- RR: data arithmetic ----
    insn!(Add, Rr, 0x0B / 0x00, [d(C, W), d(A, R), d(B, R)], FLAGS),
    insn!(Adds, Rr, 0x0B / 0x02, [d(C, W), d(A, R), d(B, R)], FLAGS),
    insn!(AddsU, Rr, 0x0B / 0x03, [d(C, W), d(A, R), d(B, R)], FLAGS),
    insn!(Addx, Rr, 0x0B / 0x04, [d(C, W), d(A, R), d(B, R)], FLAGS),
    insn!(Addc, Rr, 0x0B / 0x05, [d(C, W), d(A, R), d(B, R)], FLAGS),
    insn!(Sub, Rr, 0x0B / 0x08, [d(C, W), d(A, R), d(B, R)], FLAGS),
    insn!(Subs, Rr, 0x0B / 0x0A, [d(C, W), d(A, R), d(B, R)], FLAGS),
    insn!(SubsU, Rr, 0x0B / 0x0B, [d(C, W), d(A, R), d(B, R)], FLAGS),
    insn!(Subx, Rr, 0x0B / 0x0C, [d(C, W), d(A, R), d(B, R)], FLAGS),
    insn!(Subc, Rr, 0x0B / 0x0D, [d(C, W), d(A, R), d(B, R)], FLAGS),
    insn!(Absdif, Rr, 0x0B / 0x0E, [d(C, W), d(A, R), d(B, R)], FLAGS),
    insn!(Eq, Rr, 0x0B / 0x10, [d(C, W), d(A, R), d(B, R)], NONE),
    insn!(Ne, Rr, 0x0B / 0x11, [d(C, W), d(A, R), d(B, R)], NONE),
    insn!(Lt, Rr, 0x0B / 0x12, [d(C, W), d(A, R), d(B, R)], NONE),
    insn!(LtU, Rr, 0x0B / 0x13, [d(C, W), d(A, R), d(B, R)], NONE),
    insn!(Ge, Rr, 0x0B / 0x14, [d(C, W), d(A, R), d(B, R)], NONE),
    insn!(GeU, Rr, 0x0B / 0x15, [d(C, W), d(A, R), d(B, R)], NONE),
    insn!(Min, Rr, 0x0B / 0x18, [d(C, W), d(A, R), d(B, R)], NONE),
    insn!(MinU, Rr, 0x0B / 0x19, [d(C, W), d(A, R), d(B, R)], NONE),
    insn!(Max, Rr, 0x0B / 0x1A, [d(C, W), d(A, R), d(B, R)], NONE),
    insn!(MaxU, Rr, 0x0B / 0x1B, [d(C, W), d(A, R), d(B, R)], NONE),
    insn!(Abs, Rr, 0x0B / 0x1C, [d(C, W), d(B, R)], FLAGS),
    insn!(Abss, Rr, 0x0B / 0x1D, [d(C, W), d(B, R)], FLAGS),
    insn!(Mov, Rr, 0x0B / 0x1F, [d(C, W), d(B, R)], NONE),
    insn!(Mov, Rr, 0x0B / 0x80, [e(C, W), d(B, R)], NONE.gated(V160_UP)),
    insn!(Mov, Rr, 0x0B / 0x81, [e(C, W), d(A, R), d(B, R)], NONE.gated(V160_UP)),
    // ---- RR: logic, shifts, bit counts ----
    insn!(Sh, Rr, 0x0F / 0x00, [d(C, W), d(A, R), d(B, R)], NONE),
    insn!(Sha, Rr, 0x0F / 0x01, [d(C, W), d(A, R), d(B, R)], FLAGS),
    insn!(And, Rr, 0x0F / 0x08, [d(C, W), d(A, R), d(B, R)], NONE),
    insn!(Nand, Rr, 0x0F / 0x09, [d(C, W), d(A, R), d(B, R)], NONE),
    insn!(Or, Rr, 0x0F / 0x0A, [d(C, W), d(A, R), d(B, R)], NONE),
    insn!(Nor, Rr, 0x0F / 0x0B, [d(C, W), d(A, R), d(B, R)], NONE),
    insn!(Xor, Rr, 0x0F / 0x0C, [d(C, W), d(A, R), d(B, R)], NONE),
    insn!(Xnor, Rr, 0x0F / 0x0D, [d(C, W), d(A, R), d(B, R)], NONE),
    insn!(Andn, Rr, 0x0F / 0x0E, [d(C, W), d(A, R), d(B, R)], NONE),
    insn!(Orn, Rr, 0x0F / 0x0F, [d(C, W), d(A, R), d(B, R)], NONE),
    insn!(Clz, Rr, 0x0F / 0x1B, [d(C, W), d(A, R)], NONE),
    insn!(Clo, Rr, 0x0F / 0x1C, [d(C, W), d(A, R)], NONE),
    insn!(Cls, Rr, 0x0F / 0x1D, [d(C, W), d(A, R)], NONE),
    // ---- RR: address arithmetic ----
    insn!(MovAa, Rr, 0x01 / 0x00, [a(C, W), a(B, R)], NONE),
    insn!(AddA, Rr, 0x01 / 0x01, [a(C, W), a(A, R), a(B, R)], NONE),
    insn!(SubA, Rr, 0x01 / 0x02, [a(C, W), a(A, R), a(B, R)], NONE),
    insn!(EqA, Rr, 0x01 / 0x40, [d(C, W), a(A, R), a(B, R)], NONE),
    insn!(NeA, Rr, 0x01 / 0x41, [d(C, W), a(A, R), a(B, R)], NONE),
    insn!(LtA, Rr, 0x01 / 0x42, [d(C, W), a(A, R), a(B, R)], NONE),
    insn!(GeA, Rr, 0x01 / 0x43, [d(C, W), a(A, R), a(B, R)], NONE),
    insn!(EqzA, Rr, 0x01 / 0x48, [d(C, W), a(A, R)], NONE),
    insn!(NezA, Rr, 0x01 / 0x49, [d(C, W), a(A, R)], NONE),
    insn!(MovD, Rr, 0x01 / 0x4C, [d(C, W), a(B, R)], NONE),
    insn!(AddscA, Rr, 0x01 / 0x60, [a(C, W), a(B, R), d(A, R), imm(N_RR)], NONE),
    insn!(AddscAt, Rr, 0x01 / 0x62, [a(C, W), a(B, R), d(A, R)], NONE),
    insn!(MovA, Rr, 0x01 / 0x63, [a(C, W), d(B, R)], NONE),
    // ---- RR: indirect control flow ----
    insn!(Calli, Rr, 0x2D / 0x00, [a(A, R)], CALL),
    insn!(Fcalli, Rr, 0x2D / 0x01, [a(A, R)], CALL.gated(V160_UP)),
    insn!(Jli, Rr, 0x2D / 0x02, [a(A, R)], CALL),
    insn!(Ji, Rr, 0x2D / 0x03, [a(A, R)], JUMP),
    // ---- RR: divide ----
    insn!(Div, Rr, 0x4B / 0x20, [e(C, W), d(A, R), d(B, R)], FLAGS.gated(V160_UP)),
    insn!(DivU, Rr, 0x4B / 0x21, [e(C, W), d(A, R), d(B, R)], FLAGS.gated(V160_UP)),
    insn!(Dvinit, Rr, 0x4B / 0x1A, [e(C, W), d(A, R), d(B, R)], FLAGS),
    insn!(DvinitU, Rr, 0x4B / 0x0A, [e(C, W), d(A, R), d(B, R)], FLAGS),
    // ---- RR2 ----
    insn!(Mul, Rr2, 0x73 / 0x0A, [d(C, W), d(A, R), d(B, R)], FLAGS),
    insn!(Mul, Rr2, 0x73 / 0x6A, [e(C, W), d(A, R), d(B, R)], FLAGS),
    insn!(MulU, Rr2, 0x73 / 0x68, [e(C, W), d(A, R), d(B, R)], FLAGS),
    // ---- SYS ----
    insn!(Nop, Sys, 0x0D / 0x00, [], NONE),
    insn!(Fret, Sys, 0x0D / 0x03, [], NONE.gated(V160_UP)),
    insn!(Debug, Sys, 0x0D / 0x04, [], NONE),
    insn!(Rfm, Sys, 0x0D / 0x05, [], NONE),
    insn!(Ret, Sys, 0x0D / 0x06, [], NONE),
    insn!(Rfe, Sys, 0x0D / 0x07, [], NONE),
    insn!(Svlcx, Sys, 0x0D / 0x08, [], NONE),
    insn!(Rslcx, Sys, 0x0D / 0x09, [], NONE),
    insn!(Enable, Sys, 0x0D / 0x0C, [], NONE),
    insn!(Disable, Sys, 0x0D / 0x0D, [], NONE),
    insn!(Restore, Sys, 0x0D / 0x0E, [d(A, R)], NONE.gated(V160_UP)),
    insn!(Disable, Sys, 0x0D / 0x0F, [d(A, W)], NONE.gated(V160_UP)),
    insn!(Dsync, Sys, 0x0D / 0x12, [], NONE),
    insn!(Isync, Sys, 0x0D / 0x13, [], NONE),
    insn!(Trapv, Sys, 0x0D / 0x14, [], NONE),
    insn!(Trapsv, Sys, 0x0D / 0x15, [], NONE),
    insn!(Wait, Sys, 0x0D / 0x16, [], NONE.gated(V161_UP)),
    insn!(Rstv, Sys, 0x2F / 0x00, [], NONE),
    // 1.1 only: later cores moved 16-bit `bisr` to 0xE0.
    insn!(Bisr, Sc, 0xC0, [imm(CONST8)], NONE.gated(V110_ONLY)),
];

// ---------------------------------------------------------------------------
// Lookup structure
// ---------------------------------------------------------------------------

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("{mnemonic}: op1 {op1:#04x} length disagrees with format {format:?}")]
    WidthMismatch { mnemonic: Mnemonic, op1: u8, format: Format },
    #[error("{mnemonic}: op1 {op1:#04x} already claimed by format {previous:?}")]
    FormatConflict { mnemonic: Mnemonic, op1: u8, previous: Format },
    #[error("{mnemonic}: op2 presence disagrees with format {format:?}")]
    Op2Mismatch { mnemonic: Mnemonic, format: Format },
    #[error("{mnemonic}: key already mapped to {previous}")]
    DuplicateKey { mnemonic: Mnemonic, previous: Mnemonic },
    #[error("{mnemonic}: operand field reaches bit {end}, past a {format:?} word")]
    FieldOutOfRange { mnemonic: Mnemonic, format: Format, end: usize },
    #[error("{mnemonic}: {count} operands exceed the record capacity")]
    TooManyOperands { mnemonic: Mnemonic, count: usize },
}

/// A table entry together with its precomputed feature interval.
#[derive(Debug, Clone, Copy)]
pub struct Resolved {
    pub entry: &'static Entry,
    pub features: FeatureInterval,
}

#[derive(Debug)]
pub struct OpcodeTable {
    formats: FormatMap,
    by_key: HashMap<OpcodeKey, Resolved>,
}

impl OpcodeTable {
    /// Indexes `entries`, skipping any that fail validation. The problems are
    /// returned alongside the usable table.
    pub fn build(entries: &'static [Entry]) -> (Self, Vec<TableError>) {
        let mut formats = FormatMap::new();
        let mut by_key = HashMap::with_capacity(entries.len());
        let mut errors = Vec::new();

        for entry in entries {
            let Entry { mnemonic, format, op1, .. } = *entry;
            if width_of(op1) != format.width() {
                errors.push(TableError::WidthMismatch { mnemonic, op1, format });
                continue;
            }
            if format.op2_field().is_some() != entry.op2.is_some() {
                errors.push(TableError::Op2Mismatch { mnemonic, format });
                continue;
            }
            if entry.operands.len() > crate::decoder::MAX_OPERANDS {
                errors.push(TableError::TooManyOperands { mnemonic, count: entry.operands.len() });
                continue;
            }
            let end = entry.operand_bits_end();
            if end > format.width().bytes() * 8 {
                errors.push(TableError::FieldOutOfRange { mnemonic, format, end });
                continue;
            }
            if let Err(previous) = formats.claim(format, op1) {
                errors.push(TableError::FormatConflict { mnemonic, op1, previous });
                continue;
            }
            let resolved = Resolved { entry, features: FeatureInterval::from_tags(entry.attrs.features) };
            if let Some(prev) = by_key.insert(entry.key(), resolved) {
                errors.push(TableError::DuplicateKey { mnemonic, previous: prev.entry.mnemonic });
                // first definition wins
                by_key.insert(entry.key(), prev);
            }
        }

        (Self { formats, by_key }, errors)
    }

    /// The process-wide table, built on first use.
    pub fn global() -> &'static OpcodeTable {
        static GLOBAL: OnceLock<OpcodeTable> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let (table, errors) = OpcodeTable::build(TABLE);
            for err in &errors {
                warn!(%err, "opcode table entry skipped");
            }
            debug!(entries = table.len(), skipped = errors.len(), "opcode table built");
            table
        })
    }

    pub fn classify(&self, leading: u16) -> Option<Format> {
        self.formats.classify(leading)
    }

    pub fn lookup(&self, key: &OpcodeKey) -> Option<&Resolved> {
        self.by_key.get(key)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &Resolved> + '_ {
        self.by_key.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_table_is_consistent() {
        let (table, errors) = OpcodeTable::build(TABLE);
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(table.len(), TABLE.len());
    }

    #[test]
    fn conflicting_entries_are_reported() {
        static BAD: &[Entry] = &[
            insn!(Nop, Sr, 0x00 / 0x0, [], NONE),
            insn!(Ret, Sr, 0x00 / 0x0, [], NONE),
            insn!(J, Sb, 0x1D, [imm(DISP8)], JUMP),
            insn!(Mov, Src, 0x82 / 0x1, [], NONE),
            insn!(Mov, Srr, 0x00, [], NONE),
        ];
        let (table, errors) = OpcodeTable::build(BAD);
        assert_eq!(table.len(), 1);
        assert_eq!(
            errors,
            vec![
                TableError::DuplicateKey { mnemonic: Mnemonic::Ret, previous: Mnemonic::Nop },
                TableError::WidthMismatch { mnemonic: Mnemonic::J, op1: 0x1D, format: Format::Sb },
                TableError::Op2Mismatch { mnemonic: Mnemonic::Mov, format: Format::Src },
                TableError::FormatConflict { mnemonic: Mnemonic::Mov, op1: 0x00, previous: Format::Sr },
            ]
        );
    }

    #[test]
    fn fields_past_a_halfword_are_rejected() {
        static BAD: &[Entry] = &[insn!(Mov, Src, 0x82, [d(C, W), imm(SCONST4)], NONE)];
        let (table, errors) = OpcodeTable::build(BAD);
        assert!(table.is_empty());
        assert_eq!(
            errors,
            vec![TableError::FieldOutOfRange { mnemonic: Mnemonic::Mov, format: Format::Src, end: 32 }]
        );
    }

    #[test]
    fn unrepresentable_modes_are_flagged() {
        let post = TABLE
            .iter()
            .find(|e| e.format == Format::Slr && e.op1 == 0x44)
            .unwrap();
        assert!(!post.is_representable());
        let plain = TABLE.iter().find(|e| e.format == Format::Slr && e.op1 == 0x54).unwrap();
        assert!(plain.is_representable());
    }

    #[test]
    fn opcode_bits_place_op2() {
        let ret = TABLE.iter().find(|e| e.format == Format::Sys && e.op2 == Some(0x06)).unwrap();
        assert_eq!(ret.opcode_bits(), 0x0180_000D);
    }
}
