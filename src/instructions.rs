//! Mnemonic identifiers.
//!
//! The numbering is a flat namespace starting at the reserved `Invalid = 0`
//! sentinel and terminated by [`INS_ENDING`]; downstream tables sized by
//! `INS_ENDING` and iterating `0..INS_ENDING` rely on that ordering.

use std::fmt;

use num_traits::{FromPrimitive, ToPrimitive};
use serde::{Serialize, Serializer};

macro_rules! mnemonics {
    ($($variant:ident => $text:literal,)*) => {
        /// A TriCore instruction mnemonic.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum Mnemonic {
            Invalid = 0,
            $($variant,)*
        }

        const ALL: &[Mnemonic] = &[Mnemonic::Invalid, $(Mnemonic::$variant,)*];

        impl Mnemonic {
            /// Assembler spelling, e.g. `ld.w` or `jeq.a`.
            pub const fn name(self) -> &'static str {
                match self {
                    Mnemonic::Invalid => "invalid",
                    $(Mnemonic::$variant => $text,)*
                }
            }
        }
    };
}

mnemonics! {
    AbsdifsB => "absdifs.b",
    AbsdifsH => "absdifs.h",
    Absdifs => "absdifs",
    AbsdifB => "absdif.b",
    AbsdifH => "absdif.h",
    Absdif => "absdif",
    AbssB => "abss.b",
    AbssH => "abss.h",
    Abss => "abss",
    AbsB => "abs.b",
    AbsDf => "abs.df",
    AbsF => "abs.f",
    AbsH => "abs.h",
    Abs => "abs",
    Addc => "addc",
    AddihA => "addih.a",
    Addih => "addih",
    Addi => "addi",
    AddscAt => "addsc.at",
    AddscA => "addsc.a",
    AddsBu => "adds.bu",
    AddsB => "adds.b",
    AddsH => "adds.h",
    AddsHu => "adds.hu",
    AddsU => "adds.u",
    Adds => "adds",
    Addx => "addx",
    AddA => "add.a",
    AddB => "add.b",
    AddDf => "add.df",
    AddF => "add.f",
    AddH => "add.h",
    Add => "add",
    AndnT => "andn.t",
    Andn => "andn",
    AndAndnT => "and.andn.t",
    AndAndT => "and.and.t",
    AndEq => "and.eq",
    AndGeU => "and.ge.u",
    AndGe => "and.ge",
    AndLtU => "and.lt.u",
    AndLt => "and.lt",
    AndNe => "and.ne",
    AndNorT => "and.nor.t",
    AndOrT => "and.or.t",
    AndT => "and.t",
    And => "and",
    Bisr => "bisr",
    Bmerge => "bmerge",
    Bsplit => "bsplit",
    CacheaI => "cachea.i",
    CacheaWi => "cachea.wi",
    CacheaW => "cachea.w",
    CacheiI => "cachei.i",
    CacheiWi => "cachei.wi",
    CacheiW => "cachei.w",
    CaddnA => "caddn.a",
    Caddn => "caddn",
    CaddA => "cadd.a",
    Cadd => "cadd",
    Calla => "calla",
    Calli => "calli",
    Call => "call",
    CloB => "clo.b",
    CloH => "clo.h",
    Clo => "clo",
    ClsB => "cls.b",
    ClsH => "cls.h",
    Cls => "cls",
    ClzB => "clz.b",
    ClzH => "clz.h",
    Clz => "clz",
    Cmovn => "cmovn",
    Cmov => "cmov",
    CmpswapW => "cmpswap.w",
    CmpDf => "cmp.df",
    CmpF => "cmp.f",
    Crc32bW => "crc32b.w",
    Crc32lW => "crc32l.w",
    Crc32B => "crc32.b",
    Crcn => "crcn",
    CsubnA => "csubn.a",
    Csubn => "csubn",
    CsubA => "csub.a",
    Csub => "csub",
    Debug => "debug",
    Dextr => "dextr",
    Dftof => "dftof",
    Dftoin => "dftoin",
    Dftoiz => "dftoiz",
    Dftoi => "dftoi",
    Dftolz => "dftolz",
    Dftol => "dftol",
    Dftoulz => "dftoulz",
    Dftoul => "dftoul",
    Dftouz => "dftouz",
    Dftou => "dftou",
    DifscA => "difsc.a",
    Disable => "disable",
    Div64U => "div64.u",
    Div64 => "div64",
    DivDf => "div.df",
    DivF => "div.f",
    DivU => "div.u",
    Div => "div",
    Dsync => "dsync",
    Dvadj => "dvadj",
    DvinitBu => "dvinit.bu",
    DvinitB => "dvinit.b",
    DvinitHu => "dvinit.hu",
    DvinitH => "dvinit.h",
    DvinitU => "dvinit.u",
    Dvinit => "dvinit",
    DvstepU => "dvstep.u",
    Dvstep => "dvstep",
    Enable => "enable",
    EqanyB => "eqany.b",
    EqanyH => "eqany.h",
    EqzA => "eqz.a",
    EqA => "eq.a",
    EqB => "eq.b",
    EqH => "eq.h",
    EqW => "eq.w",
    Eq => "eq",
    ExtrU => "extr.u",
    Extr => "extr",
    Fcalla => "fcalla",
    Fcalli => "fcalli",
    Fcall => "fcall",
    Fret => "fret",
    Ftodf => "ftodf",
    Ftohp => "ftohp",
    Ftoin => "ftoin",
    Ftoiz => "ftoiz",
    Ftoi => "ftoi",
    Ftoq31z => "ftoq31z",
    Ftoq31 => "ftoq31",
    Ftouz => "ftouz",
    Ftou => "ftou",
    GeA => "ge.a",
    GeU => "ge.u",
    Ge => "ge",
    Hptof => "hptof",
    Imask => "imask",
    Insert => "insert",
    InsnT => "insn.t",
    InsT => "ins.t",
    Isync => "isync",
    Itodf => "itodf",
    Itof => "itof",
    IxmaxU => "ixmax.u",
    Ixmax => "ixmax",
    IxminU => "ixmin.u",
    Ixmin => "ixmin",
    Ja => "ja",
    JeqA => "jeq.a",
    Jeq => "jeq",
    Jgez => "jgez",
    JgeU => "jge.u",
    Jge => "jge",
    Jgtz => "jgtz",
    Ji => "ji",
    Jla => "jla",
    Jlez => "jlez",
    Jli => "jli",
    Jltz => "jltz",
    JltU => "jlt.u",
    Jlt => "jlt",
    Jl => "jl",
    Jned => "jned",
    Jnei => "jnei",
    JneA => "jne.a",
    Jne => "jne",
    JnzA => "jnz.a",
    JnzT => "jnz.t",
    Jnz => "jnz",
    JzA => "jz.a",
    JzT => "jz.t",
    Jz => "jz",
    J => "j",
    Ldlcx => "ldlcx",
    Ldmst => "ldmst",
    Lducx => "lducx",
    LdA => "ld.a",
    LdBu => "ld.bu",
    LdB => "ld.b",
    LdDa => "ld.da",
    LdD => "ld.d",
    LdHu => "ld.hu",
    LdH => "ld.h",
    LdQ => "ld.q",
    LdW => "ld.w",
    Lea => "lea",
    Lha => "lha",
    Loopu => "loopu",
    Loop => "loop",
    Ltodf => "ltodf",
    LtA => "lt.a",
    LtB => "lt.b",
    LtBu => "lt.bu",
    LtH => "lt.h",
    LtHu => "lt.hu",
    LtU => "lt.u",
    LtW => "lt.w",
    LtWu => "lt.wu",
    Lt => "lt",
    MaddmsH => "maddms.h",
    MaddmsU => "maddms.u",
    Maddms => "maddms",
    MaddmH => "maddm.h",
    MaddmQ => "maddm.q",
    MaddmU => "maddm.u",
    Maddm => "maddm",
    MaddrsH => "maddrs.h",
    MaddrsQ => "maddrs.q",
    MaddrH => "maddr.h",
    MaddrQ => "maddr.q",
    MaddsumsH => "maddsums.h",
    MaddsumH => "maddsum.h",
    MaddsursH => "maddsurs.h",
    MaddsurH => "maddsur.h",
    MaddsusH => "maddsus.h",
    MaddsuH => "maddsu.h",
    MaddsH => "madds.h",
    MaddsQ => "madds.q",
    MaddsU => "madds.u",
    Madds => "madds",
    MaddDf => "madd.df",
    MaddF => "madd.f",
    MaddH => "madd.h",
    MaddQ => "madd.q",
    MaddU => "madd.u",
    Madd => "madd",
    MaxB => "max.b",
    MaxBu => "max.bu",
    MaxDf => "max.df",
    MaxF => "max.f",
    MaxH => "max.h",
    MaxHu => "max.hu",
    MaxU => "max.u",
    Max => "max",
    Mfcr => "mfcr",
    MinB => "min.b",
    MinBu => "min.bu",
    MinDf => "min.df",
    MinF => "min.f",
    MinH => "min.h",
    MinHu => "min.hu",
    MinU => "min.u",
    Min => "min",
    MovhA => "movh.a",
    Movh => "movh",
    MovzA => "movz.a",
    MovAa => "mov.aa",
    MovA => "mov.a",
    MovD => "mov.d",
    MovU => "mov.u",
    Mov => "mov",
    MsubadmsH => "msubadms.h",
    MsubadmH => "msubadm.h",
    MsubadrsH => "msubadrs.h",
    MsubadrH => "msubadr.h",
    MsubadsH => "msubads.h",
    MsubadH => "msubad.h",
    MsubmsH => "msubms.h",
    MsubmsU => "msubms.u",
    Msubms => "msubms",
    MsubmH => "msubm.h",
    MsubmQ => "msubm.q",
    MsubmU => "msubm.u",
    Msubm => "msubm",
    MsubrsH => "msubrs.h",
    MsubrsQ => "msubrs.q",
    MsubrH => "msubr.h",
    MsubrQ => "msubr.q",
    MsubsH => "msubs.h",
    MsubsQ => "msubs.q",
    MsubsU => "msubs.u",
    Msubs => "msubs",
    MsubDf => "msub.df",
    MsubF => "msub.f",
    MsubH => "msub.h",
    MsubQ => "msub.q",
    MsubU => "msub.u",
    Msub => "msub",
    Mtcr => "mtcr",
    MulmsH => "mulms.h",
    MulmH => "mulm.h",
    MulmU => "mulm.u",
    Mulm => "mulm",
    MulrH => "mulr.h",
    MulrQ => "mulr.q",
    MulsU => "muls.u",
    Muls => "muls",
    MulDf => "mul.df",
    MulF => "mul.f",
    MulH => "mul.h",
    MulQ => "mul.q",
    MulU => "mul.u",
    Mul => "mul",
    NandT => "nand.t",
    Nand => "nand",
    NegDf => "neg.df",
    NegF => "neg.f",
    NezA => "nez.a",
    NeA => "ne.a",
    Ne => "ne",
    Nop => "nop",
    NorT => "nor.t",
    Nor => "nor",
    Not => "not",
    OrnT => "orn.t",
    Orn => "orn",
    OrAndnT => "or.andn.t",
    OrAndT => "or.and.t",
    OrEq => "or.eq",
    OrGeU => "or.ge.u",
    OrGe => "or.ge",
    OrLtU => "or.lt.u",
    OrLt => "or.lt",
    OrNe => "or.ne",
    OrNorT => "or.nor.t",
    OrOrT => "or.or.t",
    OrT => "or.t",
    Or => "or",
    Pack => "pack",
    Parity => "parity",
    PopcntW => "popcnt.w",
    Q31tof => "q31tof",
    QseedDf => "qseed.df",
    QseedF => "qseed.f",
    Rem64U => "rem64.u",
    Rem64 => "rem64",
    Restore => "restore",
    Ret => "ret",
    Rfe => "rfe",
    Rfm => "rfm",
    Rslcx => "rslcx",
    Rstv => "rstv",
    RsubsU => "rsubs.u",
    Rsubs => "rsubs",
    Rsub => "rsub",
    SatBu => "sat.bu",
    SatB => "sat.b",
    SatHu => "sat.hu",
    SatH => "sat.h",
    SelnA => "seln.a",
    Seln => "seln",
    SelA => "sel.a",
    Sel => "sel",
    Shas => "shas",
    ShaB => "sha.b",
    ShaH => "sha.h",
    Sha => "sha",
    Shuffle => "shuffle",
    ShAndnT => "sh.andn.t",
    ShAndT => "sh.and.t",
    ShB => "sh.b",
    ShEq => "sh.eq",
    ShGeU => "sh.ge.u",
    ShGe => "sh.ge",
    ShH => "sh.h",
    ShLtU => "sh.lt.u",
    ShLt => "sh.lt",
    ShNandT => "sh.nand.t",
    ShNe => "sh.ne",
    ShNorT => "sh.nor.t",
    ShOrnT => "sh.orn.t",
    ShOrT => "sh.or.t",
    ShXnorT => "sh.xnor.t",
    ShXorT => "sh.xor.t",
    Sh => "sh",
    Stlcx => "stlcx",
    Stucx => "stucx",
    StA => "st.a",
    StB => "st.b",
    StDa => "st.da",
    StD => "st.d",
    StH => "st.h",
    StQ => "st.q",
    StT => "st.t",
    StW => "st.w",
    Subc => "subc",
    SubscA => "subsc.a",
    SubsBu => "subs.bu",
    SubsB => "subs.b",
    SubsHu => "subs.hu",
    SubsH => "subs.h",
    SubsU => "subs.u",
    Subs => "subs",
    Subx => "subx",
    SubA => "sub.a",
    SubB => "sub.b",
    SubDf => "sub.df",
    SubF => "sub.f",
    SubH => "sub.h",
    Sub => "sub",
    Svlcx => "svlcx",
    SwapmskW => "swapmsk.w",
    SwapA => "swap.a",
    SwapW => "swap.w",
    Syscall => "syscall",
    Tlbdemap => "tlbdemap",
    TlbflushA => "tlbflush.a",
    TlbflushB => "tlbflush.b",
    Tlbmap => "tlbmap",
    TlbprobeA => "tlbprobe.a",
    TlbprobeI => "tlbprobe.i",
    Trapsv => "trapsv",
    Trapv => "trapv",
    Ultodf => "ultodf",
    Unpack => "unpack",
    Updfl => "updfl",
    Utodf => "utodf",
    Utof => "utof",
    Wait => "wait",
    XnorT => "xnor.t",
    Xnor => "xnor",
    XorEq => "xor.eq",
    XorGeU => "xor.ge.u",
    XorGe => "xor.ge",
    XorLtU => "xor.lt.u",
    XorLt => "xor.lt",
    XorNe => "xor.ne",
    XorT => "xor.t",
    Xor => "xor",
}

/// One past the highest mnemonic id.
pub const INS_ENDING: u16 = ALL.len() as u16;

impl Mnemonic {
    /// Stable numeric id.
    pub const fn id(self) -> u16 {
        self as u16
    }

    pub fn from_id(id: u16) -> Option<Self> {
        ALL.get(usize::from(id)).copied()
    }

    /// Every mnemonic in id order, `Invalid` first.
    pub fn all() -> &'static [Mnemonic] {
        ALL
    }

    pub fn is_valid(self) -> bool {
        self != Mnemonic::Invalid
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Serialized by assembler spelling.
impl Serialize for Mnemonic {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

impl ToPrimitive for Mnemonic {
    fn to_i64(&self) -> Option<i64> {
        Some(i64::from(self.id()))
    }
    fn to_u64(&self) -> Option<u64> {
        Some(u64::from(self.id()))
    }
}

impl FromPrimitive for Mnemonic {
    fn from_i64(n: i64) -> Option<Self> {
        u16::try_from(n).ok().and_then(Self::from_id)
    }
    fn from_u64(n: u64) -> Option<Self> {
        u16::try_from(n).ok().and_then(Self::from_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_and_terminated() {
        assert_eq!(Mnemonic::Invalid.id(), 0);
        for (i, m) in Mnemonic::all().iter().enumerate() {
            assert_eq!(usize::from(m.id()), i);
            assert_eq!(Mnemonic::from_id(m.id()), Some(*m));
        }
        assert_eq!(INS_ENDING, 427);
        assert_eq!(Mnemonic::from_id(INS_ENDING), None);
    }

    #[test]
    fn names_use_dotted_suffixes() {
        assert_eq!(Mnemonic::LdW.name(), "ld.w");
        assert_eq!(Mnemonic::AddscAt.name(), "addsc.at");
        assert_eq!(Mnemonic::Xor.to_string(), "xor");
        assert_eq!(Mnemonic::from_u64(u64::from(Mnemonic::Call.id())), Some(Mnemonic::Call));
    }
}
