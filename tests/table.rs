use std::collections::HashSet;

use pretty_assertions::assert_eq;

use tricore_decoder::isa::format::width_of;
use tricore_decoder::isa::table::{OpcodeTable, OperandSpec, TABLE};
use tricore_decoder::{decode, DecodeError, Mnemonic, Width};

fn opcode_bytes(bits: u32, width: Width) -> Vec<u8> {
    bits.to_le_bytes()[..width.bytes()].to_vec()
}

#[test]
fn every_representable_entry_decodes_to_itself() {
    let table = OpcodeTable::global();
    assert_eq!(table.len(), TABLE.len());
    for resolved in table.entries() {
        let entry = resolved.entry;
        let width = entry.format.width();
        let bytes = opcode_bytes(entry.opcode_bits(), width);
        let res = decode(&bytes, 0x8000_0000);

        if !entry.is_representable() {
            let err = res.expect_err("unrepresentable entry decoded");
            assert!(
                matches!(err, DecodeError::UnsupportedAddressingMode { mnemonic, .. } if mnemonic == entry.mnemonic),
                "{:?}: {err}",
                entry.key()
            );
            continue;
        }

        let insn = res.unwrap_or_else(|e| panic!("{:?}: {e}", entry.key()));
        assert_eq!(insn.mnemonic(), entry.mnemonic, "{:?}", entry.key());
        assert_eq!(insn.len(), width.bytes());
        assert_eq!(insn.op_count(), entry.operands.len(), "{}", entry.mnemonic);
        assert_eq!(insn.groups(), entry.attrs.groups);
        assert_eq!(insn.update_flags(), entry.attrs.update_flags);
        assert_eq!(insn.features(), resolved.features);
        for (op, spec) in insn.operands().iter().zip(entry.operands) {
            assert_eq!(op.access, spec.access());
        }
    }
}

#[test]
fn length_always_follows_bit_zero() {
    for first in 0u8..=u8::MAX {
        let bytes = [first, 0, 0, 0];
        match decode(&bytes, 0) {
            Ok(insn) => assert_eq!(insn.width(), width_of(first), "{first:#04x}"),
            Err(DecodeError::MalformedInstruction { .. } | DecodeError::UnsupportedAddressingMode { .. }) => {}
            Err(e) => panic!("{first:#04x}: {e}"),
        }
    }
}

#[test]
fn failures_are_never_partial() {
    for resolved in OpcodeTable::global().entries() {
        let entry = resolved.entry;
        if entry.format.width() == Width::W32 {
            let bytes = entry.opcode_bits().to_le_bytes();
            for cut in [2, 3] {
                assert_eq!(
                    decode(&bytes[..cut], 0),
                    Err(DecodeError::TruncatedBuffer { needed: 4, available: cut }),
                    "{:?}",
                    entry.key()
                );
            }
        }
    }
}

#[test]
fn groups_match_control_flow() {
    let calls: HashSet<Mnemonic> = TABLE
        .iter()
        .filter(|e| e.attrs.groups.contains(tricore_decoder::Groups::CALL))
        .map(|e| e.mnemonic)
        .collect();
    for m in [Mnemonic::Call, Mnemonic::Calla, Mnemonic::Calli, Mnemonic::Fcall, Mnemonic::Jl, Mnemonic::Jla] {
        assert!(calls.contains(&m), "{m}");
    }
    // returns carry no group
    for e in TABLE.iter().filter(|e| matches!(e.mnemonic, Mnemonic::Ret | Mnemonic::Rfe | Mnemonic::Fret)) {
        assert!(e.attrs.groups.is_empty());
    }
    // no entry is both
    assert!(TABLE.iter().all(|e| e.attrs.groups.bits().count_ones() <= 1));
}

#[test]
fn templates_fit_the_record() {
    for e in TABLE {
        assert!(e.operands.len() <= tricore_decoder::MAX_OPERANDS);
        let mems = e
            .operands
            .iter()
            .filter(|o| matches!(o, OperandSpec::Mem { .. }))
            .count();
        assert!(mems <= 1, "{} has two memory operands", e.mnemonic);
    }
}
