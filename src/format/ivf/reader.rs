//! IVF frame reader

use super::header::{IvfHeader, IVF_FRAME_HEADER_SIZE, IVF_HEADER_SIZE};
use crate::error::{Error, Result};
use crate::format::Packet;
use byteorder::{ByteOrder, LittleEndian};
use bytes::Bytes;
use std::io::{ErrorKind, Read};

/// Largest allocation made up front for a declared frame size
const MAX_PREALLOC: usize = 1 << 20;

/// Reads IVF frame records one packet at a time
pub struct IvfReader<R> {
    reader: R,
    header: IvfHeader,
    frames_read: u64,
}

impl<R: Read> IvfReader<R> {
    /// Read and validate the IVF header from the start of `reader`
    pub fn new(mut reader: R) -> Result<Self> {
        let mut raw = [0u8; IVF_HEADER_SIZE];
        let got = read_up_to(&mut reader, &mut raw)?;
        if got < IVF_HEADER_SIZE {
            return Err(Error::unsupported("stream too short for an IVF header"));
        }
        let header = IvfHeader::parse(&raw)
            .ok_or_else(|| Error::unsupported("missing DKIF signature"))?;
        Ok(Self::with_header(reader, header))
    }

    /// Wrap a reader positioned just past an already parsed header
    pub fn with_header(reader: R, header: IvfHeader) -> Self {
        IvfReader {
            reader,
            header,
            frames_read: 0,
        }
    }

    /// The file header
    pub fn header(&self) -> &IvfHeader {
        &self.header
    }

    /// Number of packets returned so far
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Read the next frame record
    ///
    /// Returns `Ok(None)` at a clean end of stream. A record cut short,
    /// in its header or its payload, is reported as [`Error::ShortRead`].
    pub fn next_packet(&mut self) -> Result<Option<Packet>> {
        let mut frame_header = [0u8; IVF_FRAME_HEADER_SIZE];
        let got = read_up_to(&mut self.reader, &mut frame_header)?;
        if got == 0 {
            return Ok(None);
        }
        if got < IVF_FRAME_HEADER_SIZE {
            return Err(Error::ShortRead {
                expected: IVF_FRAME_HEADER_SIZE,
                actual: got,
            });
        }

        let size = LittleEndian::read_u32(&frame_header[0..4]) as usize;
        let timestamp = LittleEndian::read_u64(&frame_header[4..12]);

        let mut data = Vec::with_capacity(size.min(MAX_PREALLOC));
        self.reader
            .by_ref()
            .take(size as u64)
            .read_to_end(&mut data)?;
        if data.len() < size {
            return Err(Error::ShortRead {
                expected: size,
                actual: data.len(),
            });
        }

        self.frames_read += 1;
        Ok(Some(Packet::new(0, Bytes::from(data), timestamp)))
    }

    /// Give back the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Fill as much of `buf` as the stream allows, stopping only at end of stream
pub(crate) fn read_up_to<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
