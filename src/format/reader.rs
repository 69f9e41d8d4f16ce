//! Frame reader facade
//!
//! A [`FrameReader`] owns one open container and hands out coded frames one
//! at a time. Packets holding a VP9 superframe are split, and their frames
//! served in order before the next packet is read.
//!
//! ```no_run
//! use vpxsplit_lib::format::FrameReader;
//!
//! let mut reader = FrameReader::open("input.webm")?;
//! while let Some(frame) = reader.read() {
//!     println!("{} bytes", frame.len());
//! }
//! # Ok::<(), vpxsplit_lib::Error>(())
//! ```

use super::probe::{self, Detected, Source};
use super::superframe::{self, FrameRange, SuperframeQueue};
use super::webm::{DemuxEngine, MatroskaEngine};
use super::{ContainerFormat, Packet, VideoParams};
use crate::codec::fourcc_to_string;
use crate::error::{Error, Result};
use bytes::Bytes;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::{debug, info, warn};

/// Lifecycle state of a [`FrameReader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// Frames can be read
    Ready,
    /// Resources released; every read returns `None`
    Closed,
}

/// One coded frame, borrowed from the reader's current packet
///
/// Valid until the next call to [`FrameReader::read`] or [`FrameReader::close`].
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    packet: &'a Packet,
    range: FrameRange,
    index: usize,
}

impl<'a> Frame<'a> {
    /// Coded frame bytes
    pub fn data(&self) -> &'a [u8] {
        &self.packet.data[self.range.as_range()]
    }

    pub fn len(&self) -> usize {
        self.range.len
    }

    pub fn is_empty(&self) -> bool {
        self.range.len == 0
    }

    /// Timestamp of the container packet this frame came from
    pub fn timestamp(&self) -> u64 {
        self.packet.timestamp
    }

    /// Position of the frame within its packet (0 unless a superframe)
    pub fn index(&self) -> usize {
        self.index
    }

    /// Byte range of the frame within its packet
    pub fn range(&self) -> FrameRange {
        self.range
    }

    /// Zero-copy owned handle to the frame bytes
    pub fn to_bytes(&self) -> Bytes {
        self.packet.data.slice(self.range.as_range())
    }
}

/// Pull-based reader of coded frames from an IVF or WebM stream
pub struct FrameReader<R = BufReader<File>> {
    source: Option<Source<R>>,
    format: ContainerFormat,
    params: VideoParams,
    pending: Option<Packet>,
    queue: SuperframeQueue,
    frames_read: u64,
}

impl FrameReader<BufReader<File>> {
    /// Open the file at `path` and detect its container
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::open(path, e))?;
        let reader = Self::new(BufReader::new(file))?;
        debug!(path = %path.display(), "opened");
        Ok(reader)
    }
}

impl<R: Read + Seek + 'static> FrameReader<R> {
    /// Detect the container of `reader`, using [`MatroskaEngine`] for WebM
    pub fn new(reader: R) -> Result<Self> {
        Self::with_engine(reader, |r| {
            Ok(Box::new(MatroskaEngine::open(r)?) as Box<dyn DemuxEngine>)
        })
    }
}

impl<R: Read + Seek> FrameReader<R> {
    /// Detect the container of `reader`, building the WebM engine with
    /// `engine_factory` when the stream is not IVF
    pub fn with_engine<F>(reader: R, engine_factory: F) -> Result<Self>
    where
        F: FnOnce(R) -> Result<Box<dyn DemuxEngine>>,
    {
        let Detected { params, source } = probe::detect(reader, engine_factory)?;
        let format = source.format();
        info!(
            format = %format,
            fourcc = %fourcc_to_string(params.fourcc),
            width = params.width,
            height = params.height,
            fps_num = params.fps_num,
            fps_den = params.fps_den,
            "container detected"
        );

        Ok(FrameReader {
            source: Some(source),
            format,
            params,
            pending: None,
            queue: SuperframeQueue::new(),
            frames_read: 0,
        })
    }

    pub fn format(&self) -> ContainerFormat {
        self.format
    }

    pub fn params(&self) -> &VideoParams {
        &self.params
    }

    pub fn state(&self) -> ReaderState {
        if self.source.is_some() {
            ReaderState::Ready
        } else {
            ReaderState::Closed
        }
    }

    /// Frames returned so far
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Read the next coded frame
    ///
    /// Returns `None` at end of stream. A truncated container or a demux
    /// failure also ends the stream after a warning; frames already returned
    /// stay valid for the caller. Packets that yield no frames are skipped.
    pub fn read(&mut self) -> Option<Frame<'_>> {
        while self.queue.is_drained() {
            if !self.fetch_packet() {
                return None;
            }
        }

        let (index, range) = self.queue.pop()?;
        self.frames_read += 1;
        let packet = self.pending.as_ref()?;
        Some(Frame {
            packet,
            range,
            index,
        })
    }

    /// Replace the pending packet with the next one from the source
    ///
    /// Returns `false` once the stream has ended; the reader is closed then.
    fn fetch_packet(&mut self) -> bool {
        let Some(source) = self.source.as_mut() else {
            return false;
        };

        self.pending = None;
        match source.next_packet() {
            Ok(Some(packet)) => {
                let ranges = superframe::split(&packet.data);
                debug!(
                    size = packet.size(),
                    timestamp = packet.timestamp,
                    frames = ranges.len(),
                    "packet"
                );
                self.queue.reset(ranges);
                self.pending = Some(packet);
                true
            }
            Ok(None) => {
                debug!(frames = self.frames_read, "end of stream");
                self.close();
                false
            }
            Err(err) => {
                warn!(frames = self.frames_read, "stream ended early: {}", err);
                self.close();
                false
            }
        }
    }

    /// Release the pending packet, the demux engine and the stream
    ///
    /// Calling this more than once is a no-op. Dropping the reader has the
    /// same effect.
    pub fn close(&mut self) {
        self.pending = None;
        self.queue.clear();
        self.source = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Codec;
    use crate::format::ivf::IvfHeader;
    use std::io::Cursor;

    fn ivf(frames: &[&[u8]]) -> Cursor<Vec<u8>> {
        let mut data = IvfHeader::new(Codec::Vp9, 64, 64, 30, 1).to_bytes().to_vec();
        for (i, frame) in frames.iter().enumerate() {
            data.extend_from_slice(&(frame.len() as u32).to_le_bytes());
            data.extend_from_slice(&(i as u64 * 2).to_le_bytes());
            data.extend_from_slice(frame);
        }
        Cursor::new(data)
    }

    #[test]
    fn test_reads_plain_frames() {
        let mut reader = FrameReader::new(ivf(&[&[0x82, 1], &[0x86, 2, 3]])).unwrap();
        assert_eq!(reader.format(), ContainerFormat::Ivf);
        assert_eq!(reader.state(), ReaderState::Ready);

        let frame = reader.read().unwrap();
        assert_eq!(frame.data(), &[0x82, 1]);
        assert_eq!(frame.timestamp(), 0);

        let frame = reader.read().unwrap();
        assert_eq!(frame.data(), &[0x86, 2, 3]);
        assert_eq!(frame.timestamp(), 2);

        assert!(reader.read().is_none());
        assert_eq!(reader.state(), ReaderState::Closed);
        assert_eq!(reader.frames_read(), 2);
    }

    #[test]
    fn test_superframe_served_before_next_packet() {
        let superframe = [0x86, 0x86, 0x82, 0xC1, 2, 1, 0xC1];
        let mut reader = FrameReader::new(ivf(&[&superframe, &[0x86, 9]])).unwrap();

        let first = reader.read().unwrap();
        assert_eq!(first.data(), &[0x86, 0x86]);
        assert_eq!(first.index(), 0);

        let second = reader.read().unwrap();
        assert_eq!(second.data(), &[0x82]);
        assert_eq!(second.index(), 1);
        assert_eq!(second.timestamp(), 0);

        let third = reader.read().unwrap();
        assert_eq!(third.data(), &[0x86, 9]);
        assert_eq!(third.timestamp(), 2);

        assert!(reader.read().is_none());
    }

    #[test]
    fn test_mismatched_superframe_is_skipped() {
        let bad = [0x86, 0x86, 0xC1, 9, 9, 0xC1];
        let mut reader = FrameReader::new(ivf(&[&bad, &[0x82, 7]])).unwrap();
        assert_eq!(reader.read().unwrap().data(), &[0x82, 7]);
        assert!(reader.read().is_none());
    }

    #[test]
    fn test_truncated_stream_keeps_earlier_frames() {
        let mut data = ivf(&[&[0x82, 1], &[0x86, 2, 3, 4]]).into_inner();
        data.truncate(data.len() - 1);

        let mut reader = FrameReader::new(Cursor::new(data)).unwrap();
        assert_eq!(reader.read().unwrap().data(), &[0x82, 1]);
        assert!(reader.read().is_none());
        assert_eq!(reader.state(), ReaderState::Closed);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut reader = FrameReader::new(ivf(&[&[0x82]])).unwrap();
        reader.close();
        reader.close();
        assert_eq!(reader.state(), ReaderState::Closed);
        assert!(reader.read().is_none());
    }

    #[test]
    fn test_to_bytes_is_frame_slice() {
        let superframe = [0x86, 0x86, 0x82, 0xC1, 2, 1, 0xC1];
        let mut reader = FrameReader::new(ivf(&[&superframe])).unwrap();
        let _ = reader.read().unwrap();
        let second = reader.read().unwrap();
        assert_eq!(second.to_bytes().as_ref(), &[0x82]);
        assert_eq!(second.range(), FrameRange::new(2, 1));
    }
}
