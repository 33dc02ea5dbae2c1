//! Backward scan for the start of the last N lines
//!
//! Reads the file from the end in fixed-size chunks, so memory use does not
//! depend on the size of the store.
use std::io::{self, Read, Seek, SeekFrom};

const CHUNK_SIZE: u64 = 8 * 1024;

/// Byte offset where the last `lines` lines begin.
///
/// A trailing `\n` terminates the final line and is not counted as a
/// separator. Returns 0 when the input holds `lines` lines or fewer, and the
/// end offset when `lines` is 0.
pub fn tail_offset<R: Read + Seek>(reader: &mut R, lines: usize) -> io::Result<u64> {
    let len = reader.seek(SeekFrom::End(0))?;
    if len == 0 || lines == 0 {
        return Ok(len);
    }

    let mut buf = vec![0u8; CHUNK_SIZE as usize];
    let mut end = len;
    let mut seen = 0usize;

    while end > 0 {
        let start = end.saturating_sub(CHUNK_SIZE);
        let size = (end - start) as usize;
        reader.seek(SeekFrom::Start(start))?;
        reader.read_exact(&mut buf[..size])?;

        for (i, byte) in buf[..size].iter().enumerate().rev() {
            let pos = start + i as u64;
            if *byte != b'\n' || pos == len - 1 {
                continue;
            }
            seen += 1;
            if seen == lines {
                return Ok(pos + 1);
            }
        }
        end = start;
    }

    Ok(0)
}
