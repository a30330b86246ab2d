use crate::decoder::{Instruction, MemOperand, Operand, OperandKind};

/// Renders `insn` in TriCore assembler syntax, e.g. `ld.w d4, [a2]0x10`.
pub fn fmt_insn(insn: &Instruction) -> String {
    let ops: Vec<String> = insn.operands().iter().map(fmt_operand).collect();
    if ops.is_empty() {
        insn.mnemonic().name().to_string()
    } else {
        format!("{} {}", insn.mnemonic().name(), ops.join(", "))
    }
}

pub fn fmt_operand(op: &Operand) -> String {
    match op.kind {
        OperandKind::Reg(r) => r.to_string(),
        OperandKind::Imm(v) => format!("#{}", hex(v)),
        OperandKind::Mem(m) => fmt_mem(&m),
    }
}

fn fmt_mem(m: &MemOperand) -> String {
    if m.disp == 0 {
        format!("[{}]", m.base)
    } else {
        format!("[{}]{}", m.base, hex(m.disp))
    }
}

fn hex(v: i64) -> String {
    if v < 0 {
        format!("-{:#x}", v.unsigned_abs())
    } else {
        format!("{v:#x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Access;
    use crate::regs::Register;

    #[test]
    fn operand_spellings() {
        assert_eq!(fmt_operand(&Operand::imm(0x10, Access::READ)), "#0x10");
        assert_eq!(fmt_operand(&Operand::imm(-4, Access::READ)), "#-0x4");
        assert_eq!(fmt_operand(&Operand::mem(Register::A10, 0, Access::READ)), "[a10]");
        assert_eq!(fmt_operand(&Operand::mem(Register::A15, -8, Access::WRITE)), "[a15]-0x8");
        assert_eq!(fmt_operand(&Operand::reg(Register::e(2).unwrap(), Access::WRITE)), "e2");
    }
}
