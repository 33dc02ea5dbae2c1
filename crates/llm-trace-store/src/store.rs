//! Store handle: one file, advisory locks, whole-store operations
//!
//! Every append is a single `write_all` under an exclusive lock, so two
//! records never share bytes. `clear` takes the same lock. Readers hold a
//! shared lock only while a chunk is read from disk, never while the
//! operator's output consumes it, so a stalled pager cannot hold up appends.
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use llm_trace_core::{TraceConfig, TraceError};

use crate::tail;

const READ_CHUNK: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &TraceConfig) -> Self {
        Self::new(config.path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append raw UTF-8 bytes; the file is created on first use
    pub fn append(&self, text: &str) -> Result<(), TraceError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| TraceError::write(&self.path, e))?;

        file.lock().map_err(|e| TraceError::write(&self.path, e))?;
        file.write_all(text.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| TraceError::write(&self.path, e))?;
        // lock is released when `file` is dropped
        Ok(())
    }

    /// Copy the whole store into `out`. A missing store copies nothing.
    ///
    /// Records appended after the call starts are not included.
    pub fn dump_to<W: Write>(&self, out: &mut W) -> Result<u64, TraceError> {
        let Some(mut file) = self.open()? else {
            return Ok(0);
        };
        let end = self.locked(&mut file, |f| f.seek(SeekFrom::End(0)))?;
        self.copy_range(&mut file, 0, end, out)
    }

    /// Whole store as text
    pub fn contents(&self) -> Result<String, TraceError> {
        let mut text = String::new();
        if let Some(mut file) = self.open()? {
            self.locked(&mut file, |f| f.read_to_string(&mut text))?;
        }
        Ok(text)
    }

    /// Copy the last `lines` lines into `out`.
    ///
    /// The copied bytes are exactly the matching suffix of `dump_to`.
    pub fn tail_to<W: Write>(&self, lines: usize, out: &mut W) -> Result<u64, TraceError> {
        let Some(mut file) = self.open()? else {
            return Ok(0);
        };
        let (start, end) = self.locked(&mut file, |f| {
            let start = tail::tail_offset(f, lines)?;
            Ok((start, f.seek(SeekFrom::End(0))?))
        })?;
        self.copy_range(&mut file, start, end, out)
    }

    /// Last `lines` lines as text
    pub fn tail(&self, lines: usize) -> Result<String, TraceError> {
        let mut buf = Vec::new();
        self.tail_to(lines, &mut buf)?;
        String::from_utf8(buf).map_err(|e| {
            TraceError::read(&self.path, io::Error::new(io::ErrorKind::InvalidData, e))
        })
    }

    /// Truncate the store to zero bytes, creating it if missing
    pub fn clear(&self) -> Result<(), TraceError> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| TraceError::clear(&self.path, e))?;

        file.lock().map_err(|e| TraceError::clear(&self.path, e))?;
        file.set_len(0).map_err(|e| TraceError::clear(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), "trace store cleared");
        Ok(())
    }

    fn open(&self) -> Result<Option<File>, TraceError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TraceError::read(&self.path, e)),
        };
        let meta = file.metadata().map_err(|e| TraceError::read(&self.path, e))?;
        if meta.is_dir() {
            let err = io::Error::new(io::ErrorKind::IsADirectory, "store path is a directory");
            return Err(TraceError::read(&self.path, err));
        }
        Ok(Some(file))
    }

    /// Run `op` under a shared lock; any failure is a read failure
    fn locked<T>(
        &self,
        file: &mut File,
        op: impl FnOnce(&mut File) -> io::Result<T>,
    ) -> Result<T, TraceError> {
        file.lock_shared()
            .map_err(|e| TraceError::read(&self.path, e))?;
        let result = op(file);
        let unlocked = file.unlock();
        result
            .and_then(|value| unlocked.map(|_| value))
            .map_err(|e| TraceError::read(&self.path, e))
    }

    /// Copy `[start, end)` chunk by chunk, stopping early if the store shrank
    fn copy_range<W: Write>(
        &self,
        file: &mut File,
        start: u64,
        end: u64,
        out: &mut W,
    ) -> Result<u64, TraceError> {
        let mut buf = vec![0u8; READ_CHUNK];
        let mut offset = start;

        while offset < end {
            let want = READ_CHUNK.min((end - offset) as usize);
            let n = self.locked(file, |f| {
                f.seek(SeekFrom::Start(offset))?;
                f.read(&mut buf[..want])
            })?;
            if n == 0 {
                break;
            }
            out.write_all(&buf[..n]).map_err(TraceError::OutputFailure)?;
            offset += n as u64;
        }

        out.flush().map_err(TraceError::OutputFailure)?;
        Ok(offset - start)
    }
}
