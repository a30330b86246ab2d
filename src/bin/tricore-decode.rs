use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tricore_decoder::{Decoder, DecoderConfig, Instruction, IsaVersion, OddPairPolicy, Tc16Decoder};

#[derive(Parser, Debug)]
#[command(author, version, about = "Decode TriCore machine code given as hex bytes")]
struct Opts {
    /// Address of the first byte
    #[arg(short, long, default_value_t = 0, value_parser = parse_u64)]
    address: u64,
    /// Emit one JSON object per instruction
    #[arg(long)]
    json: bool,
    /// Report whether each instruction exists on this ISA version (e.g. 1.6.1)
    #[arg(long)]
    isa: Option<IsaVersion>,
    /// Reject odd register indices in pair operands
    #[arg(long)]
    strict_pairs: bool,
    /// Bytes in hex, e.g. `6d 00 01 00` or `6d000100`
    #[arg(value_name = "HEX", required = true)]
    hex: Vec<String>,
}

#[derive(Serialize)]
struct Line<'a> {
    #[serde(flatten)]
    insn: &'a Instruction,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    available: Option<bool>,
}

fn parse_u64(s: &str) -> Result<u64, String> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(h) => u64::from_str_radix(h, 16).map_err(|e| e.to_string()),
        None => s.parse::<u64>().map_err(|e| e.to_string()),
    }
}

fn parse_hex(parts: &[String]) -> Result<Vec<u8>> {
    let digits: String = parts
        .iter()
        .flat_map(|p| p.split(|c: char| c.is_whitespace() || c == ',' || c == ':'))
        .map(|p| p.trim_start_matches("0x"))
        .collect();
    if !digits.is_ascii() {
        bail!("input is not hex");
    }
    if digits.len() % 2 != 0 {
        bail!("odd number of hex digits");
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).with_context(|| format!("bad hex byte `{}`", &digits[i..i + 2])))
        .collect()
}

/// Decodes `bytes` back to back, pairing each record with its buffer offset.
/// Stops at the first failure.
fn decode_stream<D: Decoder>(dec: &D, bytes: &[u8], base: u64) -> Result<Vec<(usize, Instruction)>> {
    let mut out = Vec::new();
    let mut off = 0usize;
    while off < bytes.len() {
        let address = base.wrapping_add(off as u64);
        let insn = dec
            .decode_at(bytes, off, address)
            .with_context(|| format!("at {address:#010x}"))?;
        let len = insn.len();
        out.push((off, insn));
        off += len;
    }
    Ok(out)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let bytes = parse_hex(&opts.hex)?;
    let odd_pair = if opts.strict_pairs { OddPairPolicy::Reject } else { OddPairPolicy::Truncate };
    let dec = Tc16Decoder::with_config(DecoderConfig { odd_pair });

    for (off, insn) in decode_stream(&dec, &bytes, opts.address)? {
        let address = insn.address();
        let available = opts.isa.map(|v| insn.supported_on(v));
        if opts.json {
            let line = Line { insn: &insn, text: insn.to_string(), available };
            println!("{}", serde_json::to_string(&line)?);
        } else {
            let raw = bytes[off..off + insn.len()]
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<Vec<_>>()
                .join(" ");
            let note = match available {
                Some(false) => format!("    ; not on {}", opts.isa.map(|v| v.to_string()).unwrap_or_default()),
                _ => String::new(),
            };
            println!("{address:08x}: {raw:<12} {insn}{note}");
        }
    }
    Ok(())
}
