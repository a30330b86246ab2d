//! Lives in its own test binary so the shared table is first built here.

use std::sync::Barrier;
use std::thread;

use pretty_assertions::assert_eq;

use tricore_decoder::isa::table::{OpcodeTable, TABLE};
use tricore_decoder::{decode, Decoder, Tc16Decoder};

const THREADS: usize = 8;

#[test]
fn threads_share_one_table() {
    // ld.w d4, [a2]0x10, then a 16-bit ld.w d15, [a2]0x4
    let bytes = [0x09, 0x24, 0x10, 0x09, 0x4C, 0x21];
    let start = Barrier::new(THREADS);

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let start = &start;
                let bytes = &bytes;
                s.spawn(move || {
                    start.wait();
                    // half the threads reach the table through the decoder
                    let first = if i % 2 == 0 {
                        decode(bytes, 0x8000_0000)
                    } else {
                        Tc16Decoder::new().decode(bytes, 0x8000_0000)
                    };
                    let second = Tc16Decoder::new().decode_at(bytes, 4, 0x8000_0004);
                    (first, second, OpcodeTable::global() as *const OpcodeTable as usize)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let (first, second, table) = &results[0];
    assert_eq!(first.as_ref().unwrap().to_string(), "ld.w d4, [a2]0x10");
    assert_eq!(second.as_ref().unwrap().to_string(), "ld.w d15, [a2]0x4");
    for r in &results[1..] {
        assert_eq!(&r.0, first);
        assert_eq!(&r.1, second);
        assert_eq!(r.2, *table, "table built more than once");
    }
    assert_eq!(OpcodeTable::global().len(), TABLE.len());
}
