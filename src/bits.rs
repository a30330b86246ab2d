//! Bitfield extraction from little-endian TriCore instruction words.
//!
//! TriCore stores instructions as little-endian halfwords or words, so bit
//! `n` of the instruction word is bit `n % 8` of byte `n / 8`. That is the
//! `Lsb0` ordering of a `BitSlice<u8>` over the raw bytes, which lets every
//! field be loaded straight out of the buffer.

use bitvec::prelude::*;

use crate::decoder::Width;
use crate::error::DecodeError;

/// A contiguous bit range `[lo, lo + width)` of an instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field {
    pub lo: u8,
    pub width: u8,
}

impl Field {
    pub const fn new(lo: u8, width: u8) -> Self {
        assert!(width > 0 && width <= 32, "field width out of range");
        assert!(lo as u32 + width as u32 <= 32, "field exceeds a 32-bit word");
        Self { lo, width }
    }

    pub const fn end(self) -> usize {
        self.lo as usize + self.width as usize
    }

    pub const fn mask(self) -> u32 {
        if self.width == 32 {
            u32::MAX
        } else {
            (1u32 << self.width) - 1
        }
    }
}

/// Copies the source field into the result starting at bit `dst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scatter {
    pub src: Field,
    pub dst: u8,
}

impl Scatter {
    pub const fn new(src: Field, dst: u8) -> Self {
        Self { src, dst }
    }
}

/// How to assemble an immediate or displacement from scattered fields.
///
/// The parts are OR-ed together at their destination positions together with
/// `fixed`. If `signed`, the result is sign-extended from its highest
/// populated bit. Finally the value is shifted left by `shift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImmSpec {
    pub parts: &'static [Scatter],
    pub fixed: u32,
    pub signed: bool,
    pub shift: u8,
}

impl ImmSpec {
    /// Always zero; used for `[a]` memory operands with no offset.
    pub const ZERO: ImmSpec = ImmSpec { parts: &[], fixed: 0, signed: false, shift: 0 };

    pub const fn unsigned(parts: &'static [Scatter]) -> Self {
        Self { parts, fixed: 0, signed: false, shift: 0 }
    }

    pub const fn signed(parts: &'static [Scatter]) -> Self {
        Self { parts, fixed: 0, signed: true, shift: 0 }
    }

    pub const fn scaled(self, shift: u8) -> Self {
        Self { shift, ..self }
    }

    pub const fn with_fixed(self, fixed: u32) -> Self {
        Self { fixed, ..self }
    }

    /// Number of bits the assembled value occupies before extension.
    pub fn width(&self) -> u32 {
        let from_parts = self
            .parts
            .iter()
            .map(|p| u32::from(p.dst) + u32::from(p.src.width))
            .max()
            .unwrap_or(0);
        from_parts.max(u32::BITS - self.fixed.leading_zeros())
    }

    pub fn eval(&self, word: &InsnWord) -> Result<i64, DecodeError> {
        let mut raw = u64::from(self.fixed);
        for part in self.parts {
            raw |= u64::from(word.field(part.src)?) << part.dst;
        }
        let value = if self.signed {
            sign_extend(raw, self.width())
        } else {
            raw as i64
        };
        Ok(value << self.shift)
    }
}

/// Sign-extends the low `bits` bits of `value`.
pub fn sign_extend(value: u64, bits: u32) -> i64 {
    if bits == 0 {
        return 0;
    }
    if bits >= 64 {
        return value as i64;
    }
    let s = 64 - bits;
    ((value << s) as i64) >> s
}

/// The raw bytes of one instruction, copied out of the caller's buffer after
/// the length check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsnWord {
    bytes: [u8; 4],
    width: Width,
}

impl InsnWord {
    /// Reads `width` bytes from the front of `buf`.
    pub fn read(buf: &[u8], width: Width) -> Result<Self, DecodeError> {
        let needed = width.bytes();
        let src = buf.get(..needed).ok_or(DecodeError::TruncatedBuffer {
            needed,
            available: buf.len(),
        })?;
        let mut bytes = [0u8; 4];
        bytes[..needed].copy_from_slice(src);
        Ok(Self { bytes, width })
    }

    pub fn width(&self) -> Width {
        self.width
    }

    pub fn raw(&self) -> u32 {
        u32::from_le_bytes(self.bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.width.bytes()]
    }

    /// Loads one field. A field past the end of a 16-bit word cannot belong to
    /// the encoding, so the word is reported as malformed.
    pub fn field(&self, f: Field) -> Result<u32, DecodeError> {
        let bits = self.bytes().view_bits::<Lsb0>();
        let slice = bits
            .get(usize::from(f.lo)..f.end())
            .ok_or(DecodeError::MalformedInstruction { raw: self.raw() })?;
        Ok(slice.load_le::<u32>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_follow_little_endian_bit_numbering() {
        // 0x1234_5678 in memory order
        let w = InsnWord::read(&[0x78, 0x56, 0x34, 0x12], Width::W32).unwrap();
        assert_eq!(w.raw(), 0x1234_5678);
        assert_eq!(w.field(Field::new(0, 8)).unwrap(), 0x78);
        assert_eq!(w.field(Field::new(8, 4)).unwrap(), 0x6);
        assert_eq!(w.field(Field::new(12, 16)).unwrap(), 0x2345);
        assert_eq!(w.field(Field::new(28, 4)).unwrap(), 0x1);
        assert_eq!(w.field(Field::new(31, 1)).unwrap(), 0);
    }

    #[test]
    fn short_buffer_is_truncated() {
        let err = InsnWord::read(&[0x6D, 0x00, 0x01], Width::W32).unwrap_err();
        assert_eq!(err, DecodeError::TruncatedBuffer { needed: 4, available: 3 });
    }

    #[test]
    fn field_beyond_halfword_is_rejected() {
        let w = InsnWord::read(&[0x4C, 0x21], Width::W16).unwrap();
        assert_eq!(w.field(Field::new(12, 8)), Err(DecodeError::MalformedInstruction { raw: 0x214C }));
    }

    #[test]
    fn scatter_sign_extends_and_scales() {
        // disp24 = 0xFFFFFF split as [15:8] = 0xFF and [31:16] = 0xFFFF
        const PARTS: &[Scatter] = &[
            Scatter::new(Field::new(16, 16), 0),
            Scatter::new(Field::new(8, 8), 16),
        ];
        let spec = ImmSpec::signed(PARTS).scaled(1);
        let w = InsnWord::read(&[0x6D, 0xFF, 0xFF, 0xFF], Width::W32).unwrap();
        assert_eq!(spec.eval(&w).unwrap(), -2);
    }

    #[test]
    fn fixed_bits_widen_the_value() {
        const PARTS: &[Scatter] = &[Scatter::new(Field::new(8, 4), 0)];
        let w = InsnWord::read(&[0x00, 0x03], Width::W16).unwrap();
        assert_eq!(ImmSpec::unsigned(PARTS).with_fixed(0x10).scaled(1).eval(&w).unwrap(), 0x26);
        // bit 4 set and signed: ones-extended
        assert_eq!(ImmSpec::signed(PARTS).with_fixed(0x10).scaled(1).eval(&w).unwrap(), -26);
        assert_eq!(ImmSpec::ZERO.eval(&w).unwrap(), 0);
    }
}
