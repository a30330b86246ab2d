//! Linear sweep over a byte image.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use tricore_decoder::{DecodeError, Decoder, Instruction};

/// Decodes `bytes` front to back. A failed decode yields the error and
/// resynchronises two bytes further on, the smallest TriCore instruction.
pub struct Sweep<'a, D: Decoder> {
    dec: &'a D,
    bytes: &'a [u8],
    base: u64,
    off: usize,
}

impl<'a, D: Decoder> Sweep<'a, D> {
    pub fn new(dec: &'a D, bytes: &'a [u8], base: u64) -> Self {
        Self { dec, bytes, base, off: 0 }
    }
}

impl<D: Decoder> Iterator for Sweep<'_, D> {
    type Item = (u64, Result<Instruction, DecodeError>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.off >= self.bytes.len() {
            return None;
        }
        let addr = self.base + self.off as u64;
        let res = self.dec.decode_at(self.bytes, self.off, addr);
        self.off += match &res {
            Ok(insn) => insn.len(),
            Err(_) => 2,
        };
        Some((addr, res))
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub decoded: usize,
    pub bytes_decoded: usize,
    /// Failure count per [`DecodeError::kind`].
    pub failures: BTreeMap<&'static str, usize>,
    pub mnemonics: BTreeMap<&'static str, usize>,
}

impl Stats {
    pub fn record(&mut self, res: &Result<Instruction, DecodeError>) {
        match res {
            Ok(insn) => {
                self.decoded += 1;
                self.bytes_decoded += insn.len();
                *self.mnemonics.entry(insn.mnemonic().name()).or_default() += 1;
            }
            Err(e) => *self.failures.entry(e.kind()).or_default() += 1,
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.values().sum()
    }

    /// Adds the counts of `other`, e.g. from another segment.
    pub fn merge(&mut self, other: Stats) {
        self.decoded += other.decoded;
        self.bytes_decoded += other.bytes_decoded;
        for (kind, n) in other.failures {
            *self.failures.entry(kind).or_default() += n;
        }
        for (m, n) in other.mnemonics {
            *self.mnemonics.entry(m).or_default() += n;
        }
    }

    pub fn collect<D: Decoder>(sweep: Sweep<'_, D>) -> Self {
        let mut stats = Stats::default();
        for (_, res) in sweep {
            stats.record(&res);
        }
        debug!(decoded = stats.decoded, failed = stats.failed(), "sweep finished");
        stats
    }
}
