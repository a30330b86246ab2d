use pretty_assertions::assert_eq;

use tricore_decoder::decode;

fn text(bytes: &[u8]) -> String {
    decode(bytes, 0).unwrap().to_string()
}

fn word(raw: u32) -> [u8; 4] {
    raw.to_le_bytes()
}

#[test]
fn sixteen_bit_forms() {
    assert_eq!(text(&[0x00, 0x00]), "nop");
    assert_eq!(text(&[0x00, 0x90]), "ret");
    assert_eq!(text(&[0x82, 0xF3]), "mov d3, #-0x1");
    assert_eq!(text(&[0x42, 0x21]), "add d1, d2");
    assert_eq!(text(&[0x58, 0x08]), "ld.w d15, [a10]0x20");
    assert_eq!(text(&[0x54, 0x42]), "ld.w d2, [a4]");
    assert_eq!(text(&[0x3C, 0xFE]), "j #-0x4");
    assert_eq!(text(&[0xDC, 0x0B]), "ji a11");
}

#[test]
fn thirty_two_bit_forms() {
    // ld.w d4, [a2]16
    assert_eq!(text(&word(0x0910_2409)), "ld.w d4, [a2]0x10");
    // st.w [a15]-4, d1
    assert_eq!(text(&word(0xF93C_F189)), "st.w [a15]-0x4, d1");
    // add d1, d2, d3
    assert_eq!(text(&word(0x1000_320B)), "add d1, d2, d3");
    // ld.d e4, [a2]0
    assert_eq!(text(&word(0x0940_2409)), "ld.d e4, [a2]");
    // ld.da a6/a7, [a2]0
    assert_eq!(text(&word(0x09C0_2609)), "ld.da a6/a7, [a2]");
    assert_eq!(text(&word(0x0180_000D)), "ret");
    assert_eq!(text(&word(0x0001_006D)), "call #0x2");
}

#[test]
fn json_record_shape() {
    let insn = decode(&word(0x0910_2409), 0x8000_0000).unwrap();
    let v = serde_json::to_value(&insn).unwrap();
    assert_eq!(v["address"], 0x8000_0000u64);
    assert_eq!(v["mnemonic"], "ld.w");
    assert_eq!(v["width"], "W32");
    assert_eq!(v["operands"].as_array().map(Vec::len), Some(2));
    assert_eq!(v["operands"][0]["reg"], "d4");
    assert_eq!(v["operands"][1]["mem"]["base"], "a2");
    assert_eq!(v["operands"][1]["mem"]["disp"], 16);
    assert_eq!(v["update_flags"], false);
}
