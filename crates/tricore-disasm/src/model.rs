use anyhow::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub name: String,
    pub base: u32,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub perms: &'static str, // e.g., "r-x"
    pub kind: &'static str,  // e.g., "raw"
}

impl Segment {
    /// One past the last mapped address.
    pub fn end(&self) -> u64 {
        u64::from(self.base) + self.bytes.len() as u64
    }

    pub fn contains(&self, addr: u32) -> bool {
        u64::from(addr) >= u64::from(self.base) && u64::from(addr) < self.end()
    }
}

#[derive(Debug, Clone)]
pub struct Image {
    pub segments: Vec<Segment>,
}

impl Image {
    pub fn segment_at(&self, addr: u32) -> Option<&Segment> {
        self.segments.iter().find(|s| s.contains(addr))
    }

    /// Bytes from `addr` up to the end of the segment mapping it.
    pub fn bytes_from(&self, addr: u32) -> Option<&[u8]> {
        let s = self.segment_at(addr)?;
        s.bytes.get((addr - s.base) as usize..)
    }

    /// Bytes in `[start, end)`, clipped to the segment mapping `start`.
    pub fn window(&self, start: u32, end: u32) -> Option<&[u8]> {
        let rest = self.bytes_from(start)?;
        let len = (end.saturating_sub(start) as usize).min(rest.len());
        Some(&rest[..len])
    }
}

pub fn load_raw_bin(path: &Path, base: u32, skip: usize, len: Option<usize>) -> Result<Image> {
    let file = std::fs::read(path)?;
    anyhow::ensure!(skip <= file.len(), "--skip exceeds file size");
    let mut payload = &file[skip..];
    if let Some(lim) = len {
        anyhow::ensure!(lim <= payload.len(), "--len exceeds remaining file size after skip");
        payload = &payload[..lim];
    }
    anyhow::ensure!(
        u64::from(base) + payload.len() as u64 <= 1 << 32,
        "image does not fit the 32-bit address space at {base:#010x}"
    );
    let seg = Segment { name: "segment0".into(), base, bytes: payload.to_vec(), perms: "r-x", kind: "raw" };
    Ok(Image { segments: vec![seg] })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_maps_skip_and_len() {
        let path = std::env::temp_dir().join("_tricore_disasm_loader.bin");
        std::fs::write(&path, [0u8, 1, 2, 3, 4, 5]).unwrap();
        let img = load_raw_bin(&path, 0x1000_0000, 2, Some(3)).unwrap();
        assert_eq!(img.segments.len(), 1);
        let s = &img.segments[0];
        assert_eq!(s.base, 0x1000_0000);
        assert_eq!(s.bytes, vec![2, 3, 4]);
        assert_eq!(img.bytes_from(0x1000_0001), Some(&[3u8, 4][..]));
        assert_eq!(img.window(0x1000_0000, 0x1000_0002), Some(&[2u8, 3][..]));
        assert!(img.bytes_from(0x1000_0003).is_none());
        let _ = std::fs::remove_file(&path);
    }
}
