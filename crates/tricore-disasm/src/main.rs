use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use std::fmt::Write as _;
use std::path::Path;

use tricore_decoder::{Decoder, DecoderConfig, Instruction, OddPairPolicy, Tc16Decoder};
use tricore_disasm::{load_raw_bin, Image, Stats, Sweep};

#[derive(Parser, Debug)]
#[command(author, version, about = "TriCore disassembler CLI", long_about=None)]
struct Cli {
    /// Load address for the binary in target address space
    #[arg(long, default_value_t = 0u32, value_parser = parse_u32)]
    base: u32,
    /// Skip N bytes at start of file before loading
    #[arg(long, default_value_t = 0usize)]
    skip: usize,
    /// Input binary path
    #[arg(value_name = "BINFILE")]
    input: String,
    /// Limit bytes loaded (default: to EOF after --skip)
    #[arg(long)]
    len: Option<usize>,
    /// Reject odd register indices in pair operands
    #[arg(long)]
    strict_pairs: bool,
    /// Subcommand
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List loaded segments (simple single-segment for raw .bin)
    Sections,
    /// Disassemble a range [start, end) in bytes
    Range {
        /// Start address (hex or dec)
        #[arg(value_parser = parse_u32)]
        start: u32,
        /// End address (hex or dec, exclusive)
        #[arg(value_parser = parse_u32)]
        end: u32,
        /// Show instruction bytes
        #[arg(long)]
        show_bytes: bool,
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<String>,
    },
    /// Sweep every segment and summarise what decodes
    Stats {
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn parse_u32(s: &str) -> Result<u32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u32::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<u32>()?)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Text, Json }

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum RangeItem {
    Insn(Instruction),
    Error { address: u64, kind: &'static str, message: String },
}

fn sweep_range<D: Decoder>(img: &Image, dec: &D, start: u32, end: u32) -> Result<Vec<RangeItem>> {
    anyhow::ensure!(end >= start, "end must be >= start");
    let bytes = img.window(start, end).with_context(|| format!("{start:#010x} is not mapped"))?;
    Ok(Sweep::new(dec, bytes, u64::from(start))
        .map(|(address, res)| match res {
            Ok(insn) => RangeItem::Insn(insn),
            Err(e) => RangeItem::Error { address, kind: e.kind(), message: e.to_string() },
        })
        .collect())
}

fn sweep_stats<D: Decoder>(img: &Image, dec: &D) -> Stats {
    img.segments.iter().fold(Stats::default(), |mut acc, s| {
        acc.merge(Stats::collect(Sweep::new(dec, &s.bytes, u64::from(s.base))));
        acc
    })
}

fn render_text(img: &Image, items: &[RangeItem], show_bytes: bool) -> String {
    let mut buf = String::new();
    for item in items {
        match item {
            RangeItem::Insn(insn) => {
                let pc = insn.address() as u32;
                let _ = write!(buf, "{pc:#010x}: ");
                if show_bytes {
                    for b in img.window(pc, pc.wrapping_add(insn.len() as u32)).unwrap_or_default() {
                        let _ = write!(buf, "{b:02x} ");
                    }
                    if insn.len() == 2 {
                        buf.push_str("      ");
                    }
                }
                let _ = writeln!(buf, "  {insn}");
            }
            RangeItem::Error { address, message, .. } => {
                let _ = writeln!(buf, "{address:#010x}: <{message}>");
            }
        }
    }
    buf
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let img = load_raw_bin(Path::new(&cli.input), cli.base, cli.skip, cli.len)?;
    let odd_pair = if cli.strict_pairs { OddPairPolicy::Reject } else { OddPairPolicy::Truncate };
    let dec = Tc16Decoder::with_config(DecoderConfig { odd_pair });

    match cli.cmd {
        Command::Sections => {
            println!("{:<10} {:<12} {:<12} {:<6} {:<6}", "name", "start", "end", "perms", "kind");
            for s in &img.segments {
                println!(
                    "{:<10} {:#010x}   {:#010x}   {:<6} {:<6}",
                    s.name, s.base, s.end(), s.perms, s.kind
                );
            }
        }
        Command::Range { start, end, show_bytes, format, out } => {
            let items = sweep_range(&img, &dec, start, end)?;
            let text = match format {
                OutputFormat::Text => render_text(&img, &items, show_bytes),
                OutputFormat::Json => serde_json::to_string_pretty(&items)?,
            };
            if let Some(path) = out { std::fs::write(path, text)?; } else { print!("{}", text); }
        }
        Command::Stats { format } => {
            let stats = sweep_stats(&img, &dec);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                OutputFormat::Text => {
                    println!("decoded   {} ({} bytes)", stats.decoded, stats.bytes_decoded);
                    println!("failed    {}", stats.failed());
                    for (kind, n) in &stats.failures {
                        println!("  {kind:<24} {n}");
                    }
                    let mut top: Vec<_> = stats.mnemonics.iter().collect();
                    top.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
                    for (m, n) in top {
                        println!("  {m:<12} {n}");
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tricore_disasm::Segment;
    use pretty_assertions::assert_eq;

    fn image(bytes: &[u8]) -> Image {
        let seg = Segment { name: "s".into(), base: 0x8000_0000, bytes: bytes.to_vec(), perms: "r-x", kind: "raw" };
        Image { segments: vec![seg] }
    }

    #[test]
    fn parse_u32_hex_and_dec() {
        assert_eq!(parse_u32("0x10").unwrap(), 0x10);
        assert_eq!(parse_u32("16").unwrap(), 16);
        assert!(parse_u32("zz").is_err());
    }

    #[test]
    fn range_disasm_decodes_simple() {
        // mov.u d0, #2 (RLC: c = 0, const16 = 2, op1 = 0xBB), then a 16-bit ret
        let raw32 = (2u32 << 12) | 0xBBu32;
        let mut bytes = raw32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0x00, 0x90]);
        let img = image(&bytes);
        let items = sweep_range(&img, &Tc16Decoder::new(), 0x8000_0000, 0x8000_0006).unwrap();
        let text = render_text(&img, &items, true);
        assert_eq!(
            text,
            "0x80000000: bb 20 00 00   mov.u d0, #0x2\n0x80000004: 00 90         ret\n"
        );
    }

    #[test]
    fn range_reports_failures_inline() {
        let img = image(&[0x17, 0x00, 0x00, 0x00]);
        let items = sweep_range(&img, &Tc16Decoder::new(), 0x8000_0000, 0x8000_0004).unwrap();
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], RangeItem::Error { kind: "malformed", .. }));
        assert!(sweep_range(&img, &Tc16Decoder::new(), 0x9000_0000, 0x9000_0004).is_err());
    }

    #[test]
    fn stats_cover_every_segment() {
        let mut img = image(&[0x00, 0x00, 0x17, 0x00]);
        img.segments.push(Segment { name: "t".into(), base: 0x9000_0000, bytes: vec![0x00, 0x90], perms: "r-x", kind: "raw" });
        let stats = sweep_stats(&img, &Tc16Decoder::new());
        assert_eq!(stats.decoded, 2);
        assert_eq!(stats.failures.get("malformed"), Some(&1));
        assert_eq!(stats.mnemonics.get("ret"), Some(&1));
    }
}
