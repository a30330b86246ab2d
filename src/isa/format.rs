//! TriCore instruction formats.
//!
//! Every encoding starts with the primary opcode `op1` in bits [7:0]; bit 0
//! selects a 16-bit (clear) or 32-bit (set) instruction. The format fixes where
//! the remaining fields live, including the secondary opcode `op2` when there
//! is one.

use serde::{Deserialize, Serialize};

use crate::bits::Field;
use crate::decoder::Width;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    // 16-bit
    Sb,
    Sbc,
    Sbr,
    Sbrn,
    Sc,
    Slr,
    Slro,
    Sr,
    Src,
    Sro,
    Srr,
    Srrs,
    Ssr,
    Ssro,
    // 32-bit
    Abs,
    B,
    Bo,
    Bol,
    Brc,
    Brn,
    Brr,
    Rc,
    Rlc,
    Rr,
    Rr2,
    Sys,
}

impl Format {
    pub const fn width(self) -> Width {
        match self {
            Format::Sb
            | Format::Sbc
            | Format::Sbr
            | Format::Sbrn
            | Format::Sc
            | Format::Slr
            | Format::Slro
            | Format::Sr
            | Format::Src
            | Format::Sro
            | Format::Srr
            | Format::Srrs
            | Format::Ssr
            | Format::Ssro => Width::W16,
            _ => Width::W32,
        }
    }

    /// Bits of the first byte that belong to `op1`. BRN keeps bit 4 of its bit
    /// number in bit 7, SRRS keeps its shift amount in bits [7:6].
    pub const fn op1_field(self) -> Field {
        match self {
            Format::Brn => Field::new(0, 7),
            Format::Srrs => Field::new(0, 6),
            _ => Field::new(0, 8),
        }
    }

    /// Location of the secondary opcode, if the format has one.
    pub const fn op2_field(self) -> Option<Field> {
        match self {
            Format::Sr => Some(Field::new(12, 4)),
            Format::Abs => Some(Field::new(26, 2)),
            Format::Bo | Format::Sys => Some(Field::new(22, 6)),
            Format::Brc | Format::Brn | Format::Brr => Some(Field::new(31, 1)),
            Format::Rc => Some(Field::new(21, 7)),
            Format::Rr => Some(Field::new(20, 8)),
            Format::Rr2 => Some(Field::new(16, 12)),
            _ => None,
        }
    }

    /// Upper-case manual name, e.g. `BRR`.
    pub const fn name(self) -> &'static str {
        match self {
            Format::Sb => "SB",
            Format::Sbc => "SBC",
            Format::Sbr => "SBR",
            Format::Sbrn => "SBRN",
            Format::Sc => "SC",
            Format::Slr => "SLR",
            Format::Slro => "SLRO",
            Format::Sr => "SR",
            Format::Src => "SRC",
            Format::Sro => "SRO",
            Format::Srr => "SRR",
            Format::Srrs => "SRRS",
            Format::Ssr => "SSR",
            Format::Ssro => "SSRO",
            Format::Abs => "ABS",
            Format::B => "B",
            Format::Bo => "BO",
            Format::Bol => "BOL",
            Format::Brc => "BRC",
            Format::Brn => "BRN",
            Format::Brr => "BRR",
            Format::Rc => "RC",
            Format::Rlc => "RLC",
            Format::Rr => "RR",
            Format::Rr2 => "RR2",
            Format::Sys => "SYS",
        }
    }
}

/// Width selected by bit 0 of the leading byte.
pub const fn width_of(op1: u8) -> Width {
    if op1 & 1 == 0 {
        Width::W16
    } else {
        Width::W32
    }
}

/// Maps every leading byte to the format claiming it.
#[derive(Debug, Clone)]
pub struct FormatMap {
    by_op1: [Option<Format>; 256],
}

impl FormatMap {
    pub fn new() -> Self {
        Self { by_op1: [None; 256] }
    }

    /// Claims every leading byte whose `op1` bits equal `op1`. Returns the
    /// previous format if a different one already claimed one of them.
    pub fn claim(&mut self, format: Format, op1: u8) -> Result<(), Format> {
        let mask = format.op1_field().mask() as u8;
        for byte in 0..=u8::MAX {
            if byte & mask != op1 {
                continue;
            }
            let slot = &mut self.by_op1[usize::from(byte)];
            match slot {
                Some(prev) if *prev != format => return Err(*prev),
                _ => *slot = Some(format),
            }
        }
        Ok(())
    }

    pub fn classify(&self, leading: u16) -> Option<Format> {
        self.by_op1[usize::from(leading as u8)]
    }
}

impl Default for FormatMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_op1_claims_every_alias() {
        let mut map = FormatMap::new();
        map.claim(Format::Srrs, 0x10).unwrap();
        map.claim(Format::Brn, 0x6F).unwrap();
        for b in [0x10u16, 0x50, 0x90, 0xD0] {
            assert_eq!(map.classify(b), Some(Format::Srrs));
        }
        assert_eq!(map.classify(0x6F), Some(Format::Brn));
        assert_eq!(map.classify(0xEF), Some(Format::Brn));
        assert_eq!(map.classify(0x11), None);
        assert_eq!(map.claim(Format::Sr, 0x50), Err(Format::Srrs));
    }

    #[test]
    fn lengths() {
        assert_eq!(width_of(0x00), Width::W16);
        assert_eq!(width_of(0x6D), Width::W32);
        assert_eq!(Format::Sys.width(), Width::W32);
        assert_eq!(Format::Ssro.width(), Width::W16);
    }
}
