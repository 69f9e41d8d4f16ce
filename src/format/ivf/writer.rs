//! IVF writer (video-only)
//!
//! Writes the global header up front and patches the frame count when the
//! stream is finished.

use super::header::{IvfHeader, IVF_HEADER_SIZE};
use crate::error::Result;
use byteorder::{LittleEndian, WriteBytesExt};
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

/// Offset of the frame count field in the global header
const FRAME_COUNT_OFFSET: u64 = 24;

/// IVF writer for a single video stream
pub struct IvfWriter<W: Write + Seek> {
    writer: W,
    frame_count: u32,
}

impl IvfWriter<BufWriter<File>> {
    /// Create an IVF file at `path`
    pub fn create(path: &Path, header: IvfHeader) -> Result<Self> {
        let file = File::create(path).map_err(|e| crate::Error::open(path, e))?;
        Self::new(BufWriter::new(file), header)
    }
}

impl<W: Write + Seek> IvfWriter<W> {
    /// Write `header` and return a writer ready for frames
    pub fn new(mut writer: W, header: IvfHeader) -> Result<Self> {
        let header = IvfHeader {
            header_len: IVF_HEADER_SIZE as u16,
            frame_count: 0,
            ..header
        };
        writer.write_all(&header.to_bytes())?;
        Ok(IvfWriter {
            writer,
            frame_count: 0,
        })
    }

    /// Append one frame record
    pub fn write_frame(&mut self, data: &[u8], timestamp: u64) -> Result<()> {
        self.writer.write_u32::<LittleEndian>(data.len() as u32)?;
        self.writer.write_u64::<LittleEndian>(timestamp)?;
        self.writer.write_all(data)?;
        self.frame_count = self.frame_count.saturating_add(1);
        Ok(())
    }

    /// Frames written so far
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Patch the frame count into the header and flush
    pub fn finish(mut self) -> Result<W> {
        self.writer.seek(SeekFrom::Start(FRAME_COUNT_OFFSET))?;
        self.writer.write_u32::<LittleEndian>(self.frame_count)?;
        self.writer.seek(SeekFrom::End(0))?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}
