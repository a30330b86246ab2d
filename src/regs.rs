//! TriCore register file.
//!
//! Registers are modelled per category; the flat numbering used by external
//! consumers (0 = invalid, [`REG_ENDING`] = one past the last id) is provided by
//! [`Register::id`] and [`Register::from_id`].

use std::fmt;

use num_traits::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

/// Id reserved for "no register".
pub const REG_INVALID: u16 = 0;
/// One past the highest register id.
pub const REG_ENDING: u16 = 61;

const SPECIAL_BASE: u16 = 1;
const A_BASE: u16 = 5;
const D_BASE: u16 = 21;
const E_BASE: u16 = 37;
const P_BASE: u16 = 45;
const APAIR_BASE: u16 = 53;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpecialReg {
    Fcx,
    Pc,
    Pcxi,
    Psw,
}

impl SpecialReg {
    const ALL: [SpecialReg; 4] = [SpecialReg::Fcx, SpecialReg::Pc, SpecialReg::Pcxi, SpecialReg::Psw];

    fn name(self) -> &'static str {
        match self {
            SpecialReg::Fcx => "fcx",
            SpecialReg::Pc => "pc",
            SpecialReg::Pcxi => "pcxi",
            SpecialReg::Psw => "psw",
        }
    }
}

/// Index of a 32-bit register within its bank, `0..16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegIndex(u8);

impl RegIndex {
    pub const fn new(n: u8) -> Option<Self> {
        if n < 16 {
            Some(Self(n))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Index of a register pair, `0..8`. Pair `n` covers registers `2n` and `2n + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairIndex(u8);

impl PairIndex {
    pub const fn new(n: u8) -> Option<Self> {
        if n < 8 {
            Some(Self(n))
        } else {
            None
        }
    }

    /// The pair whose low register is `base`. Only even bases name a pair.
    pub const fn from_base(base: u8) -> Option<Self> {
        if base % 2 == 0 {
            Self::new(base / 2)
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Index of the even (low) member.
    pub const fn low(self) -> u8 {
        self.0 * 2
    }

    /// Index of the odd (high) member.
    pub const fn high(self) -> u8 {
        self.0 * 2 + 1
    }
}

/// Register bank a template field indexes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegClass {
    Data,
    Addr,
    /// 64-bit `E` pair of data registers.
    DataPair,
    /// 64-bit pair of address registers, as loaded by `ld.da`.
    AddrPair,
    /// `P` pointer pair used by circular and bit-reverse addressing.
    PtrPair,
}

impl RegClass {
    pub const fn is_pair(self) -> bool {
        matches!(self, RegClass::DataPair | RegClass::AddrPair | RegClass::PtrPair)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub enum Register {
    Special(SpecialReg),
    A(RegIndex),
    D(RegIndex),
    E(PairIndex),
    P(PairIndex),
    APair(PairIndex),
}

impl Register {
    pub const D15: Register = Register::D(RegIndex(15));
    pub const A10: Register = Register::A(RegIndex(10));
    pub const A11: Register = Register::A(RegIndex(11));
    pub const A15: Register = Register::A(RegIndex(15));
    pub const PC: Register = Register::Special(SpecialReg::Pc);
    pub const PSW: Register = Register::Special(SpecialReg::Psw);

    pub fn a(n: u8) -> Option<Self> {
        RegIndex::new(n).map(Register::A)
    }

    pub fn d(n: u8) -> Option<Self> {
        RegIndex::new(n).map(Register::D)
    }

    /// `E[base]`, i.e. `D[base]:D[base + 1]`. `base` must be even.
    pub fn e(base: u8) -> Option<Self> {
        PairIndex::from_base(base).map(Register::E)
    }

    /// `P[base]`. `base` must be even.
    pub fn p(base: u8) -> Option<Self> {
        PairIndex::from_base(base).map(Register::P)
    }

    /// Register of `class` selected by an already validated pair or bank index.
    pub fn in_class(class: RegClass, index: u8) -> Option<Self> {
        match class {
            RegClass::Data => Register::d(index),
            RegClass::Addr => Register::a(index),
            RegClass::DataPair => PairIndex::new(index).map(Register::E),
            RegClass::AddrPair => PairIndex::new(index).map(Register::APair),
            RegClass::PtrPair => PairIndex::new(index).map(Register::P),
        }
    }

    /// The two 32-bit registers a pair register spans, low member first.
    pub fn pair_members(self) -> Option<(Register, Register)> {
        match self {
            Register::E(p) => Some((Register::D(RegIndex(p.low())), Register::D(RegIndex(p.high())))),
            Register::P(p) | Register::APair(p) => {
                Some((Register::A(RegIndex(p.low())), Register::A(RegIndex(p.high()))))
            }
            _ => None,
        }
    }

    pub const fn id(self) -> u16 {
        match self {
            Register::Special(s) => SPECIAL_BASE + s as u16,
            Register::A(i) => A_BASE + i.0 as u16,
            Register::D(i) => D_BASE + i.0 as u16,
            Register::E(p) => E_BASE + p.0 as u16,
            Register::P(p) => P_BASE + p.0 as u16,
            Register::APair(p) => APAIR_BASE + p.0 as u16,
        }
    }

    pub fn from_id(id: u16) -> Option<Self> {
        let reg = match id {
            SPECIAL_BASE..A_BASE => Register::Special(SpecialReg::ALL[usize::from(id - SPECIAL_BASE)]),
            A_BASE..D_BASE => Register::A(RegIndex((id - A_BASE) as u8)),
            D_BASE..E_BASE => Register::D(RegIndex((id - D_BASE) as u8)),
            E_BASE..P_BASE => Register::E(PairIndex((id - E_BASE) as u8)),
            P_BASE..APAIR_BASE => Register::P(PairIndex((id - P_BASE) as u8)),
            APAIR_BASE..REG_ENDING => Register::APair(PairIndex((id - APAIR_BASE) as u8)),
            _ => return None,
        };
        Some(reg)
    }

    /// Every register in id order.
    pub fn all() -> impl Iterator<Item = Register> {
        (REG_INVALID + 1..REG_ENDING).filter_map(Register::from_id)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::Special(s) => f.write_str(s.name()),
            Register::A(i) => write!(f, "a{}", i.0),
            Register::D(i) => write!(f, "d{}", i.0),
            Register::E(p) => write!(f, "e{}", p.low()),
            Register::P(p) => write!(f, "p{}", p.low()),
            Register::APair(p) => write!(f, "a{}/a{}", p.low(), p.high()),
        }
    }
}

impl From<Register> for String {
    fn from(r: Register) -> String {
        r.to_string()
    }
}

impl ToPrimitive for Register {
    fn to_i64(&self) -> Option<i64> {
        Some(i64::from(self.id()))
    }
    fn to_u64(&self) -> Option<u64> {
        Some(u64::from(self.id()))
    }
}

impl FromPrimitive for Register {
    fn from_i64(n: i64) -> Option<Self> {
        u16::try_from(n).ok().and_then(Register::from_id)
    }
    fn from_u64(n: u64) -> Option<Self> {
        u16::try_from(n).ok().and_then(Register::from_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbering_matches_flat_layout() {
        assert_eq!(Register::Special(SpecialReg::Fcx).id(), 1);
        assert_eq!(Register::PSW.id(), 4);
        assert_eq!(Register::a(0).unwrap().id(), 5);
        assert_eq!(Register::A15.id(), 20);
        assert_eq!(Register::d(0).unwrap().id(), 21);
        assert_eq!(Register::D15.id(), 36);
        assert_eq!(Register::e(0).unwrap().id(), 37);
        assert_eq!(Register::e(14).unwrap().id(), 44);
        assert_eq!(Register::p(0).unwrap().id(), 45);
        assert_eq!(Register::APair(PairIndex(7)).id(), 60);
        assert_eq!(Register::all().count(), usize::from(REG_ENDING - 1));
    }

    #[test]
    fn ids_round_trip_and_reject_sentinels() {
        for r in Register::all() {
            assert_eq!(Register::from_id(r.id()), Some(r));
        }
        assert_eq!(Register::from_id(REG_INVALID), None);
        assert_eq!(Register::from_id(REG_ENDING), None);
        assert_eq!(Register::from_u64(36), Some(Register::D15));
        assert_eq!(Register::from_i64(-1), None);
    }

    #[test]
    fn pairs_span_even_and_next() {
        let e4 = Register::e(4).unwrap();
        assert_eq!(e4.pair_members(), Some((Register::d(4).unwrap(), Register::d(5).unwrap())));
        assert_eq!(Register::e(5), None);
        assert_eq!(e4.to_string(), "e4");
        assert_eq!(Register::APair(PairIndex(1)).to_string(), "a2/a3");
        assert_eq!(Register::D15.pair_members(), None);
    }
}
