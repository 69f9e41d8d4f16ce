//! VP9 superframe splitting
//!
//! A superframe bundles several coded frames into one container packet and
//! appends an index describing each frame's size:
//!
//! ```text
//! [frame 0][frame 1]...[frame n-1][marker][size 0]...[size n-1][marker]
//! ```
//!
//! The marker byte is `0b110m_mfff`: `mm + 1` is the byte width of every size
//! field and `fff + 1` is the frame count. The marker appears at both ends of
//! the index so a reader can find the index from the tail and validate it.
//!
//! Splitting never copies: it yields `(offset, len)` ranges into the packet.

use crate::error::{Error, Result};
use std::ops::Range;
use tracing::warn;

/// Maximum number of frames a superframe index can describe
pub const MAX_FRAMES: usize = 8;

/// Byte range of one coded frame inside a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    pub offset: usize,
    pub len: usize,
}

impl FrameRange {
    pub fn new(offset: usize, len: usize) -> Self {
        FrameRange { offset, len }
    }

    /// One past the last byte of the frame
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    pub fn as_range(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

/// Ranges produced by splitting one packet (at most [`MAX_FRAMES`])
pub type FrameRanges = heapless::Vec<FrameRange, MAX_FRAMES>;

/// Decoded marker byte of a superframe index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IndexMarker {
    byte: u8,
    frames: usize,
    size_width: usize,
}

impl IndexMarker {
    fn parse(byte: u8) -> Option<Self> {
        if byte & 0xE0 != 0xC0 {
            return None;
        }
        Some(IndexMarker {
            byte,
            frames: (byte & 0x07) as usize + 1,
            size_width: ((byte >> 3) & 0x03) as usize + 1,
        })
    }

    /// Total index length including both marker bytes
    fn index_size(&self) -> usize {
        2 + self.size_width * self.frames
    }
}

/// Parsed trailing superframe index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperframeIndex {
    sizes: heapless::Vec<u32, MAX_FRAMES>,
    index_size: usize,
}

impl SuperframeIndex {
    /// Parse the index at the tail of `data`
    ///
    /// Returns `None` when the last byte is not a marker or the mirrored
    /// marker at the start of the index does not match.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let marker = IndexMarker::parse(*data.last()?)?;
        let index_size = marker.index_size();
        if data.len() < index_size || data[data.len() - index_size] != marker.byte {
            return None;
        }

        let fields = &data[data.len() - index_size + 1..data.len() - 1];
        let mut sizes = heapless::Vec::new();
        for field in fields.chunks_exact(marker.size_width) {
            let size = field
                .iter()
                .enumerate()
                .fold(0u32, |acc, (i, &b)| acc | (b as u32) << (8 * i));
            // frames <= MAX_FRAMES by construction of the marker
            let _ = sizes.push(size);
        }

        Some(SuperframeIndex { sizes, index_size })
    }

    /// Declared frame sizes, in stream order
    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    /// Number of frames the index declares
    pub fn frame_count(&self) -> usize {
        self.sizes.len()
    }

    /// Index length in bytes, both markers included
    pub fn index_size(&self) -> usize {
        self.index_size
    }
}

/// Length of an index starting at the head of `data`, if one is present
fn embedded_index_len(data: &[u8]) -> Option<usize> {
    let marker = IndexMarker::parse(*data.first()?)?;
    let index_size = marker.index_size();
    (data.len() >= index_size && data[index_size - 1] == marker.byte).then_some(index_size)
}

/// Split a packet into the byte ranges of its coded frames
///
/// A packet without a valid trailing index yields one range covering the
/// whole packet; an empty packet yields none. A declared size larger than
/// the bytes remaining fails the whole packet with
/// [`Error::IndexSizeMismatch`] and no ranges are produced.
pub fn try_split(data: &[u8]) -> Result<FrameRanges> {
    let mut ranges = FrameRanges::new();
    if data.is_empty() {
        return Ok(ranges);
    }

    let Some(index) = SuperframeIndex::parse(data) else {
        let _ = ranges.push(FrameRange::new(0, data.len()));
        return Ok(ranges);
    };

    let mut sizes = index.sizes().iter().enumerate();
    let mut offset = 0;
    while offset < data.len() && !ranges.is_full() {
        let rest = &data[offset..];

        // Skip an index sitting in front of the next frame. The trailing
        // index itself is consumed here once every declared frame is out.
        // No known encoder writes an index at the head of a packet; that
        // case is handled speculatively.
        if let Some(skip) = embedded_index_len(rest) {
            offset += skip;
            continue;
        }

        let Some((frame, &size)) = sizes.next() else {
            break;
        };
        let size = size as usize;
        if size > rest.len() {
            return Err(Error::IndexSizeMismatch {
                frame,
                declared: size,
                remaining: rest.len(),
            });
        }

        let _ = ranges.push(FrameRange::new(offset, size));
        offset += size;
    }

    Ok(ranges)
}

/// Split a packet, logging and dropping it on an index size mismatch
pub fn split(data: &[u8]) -> FrameRanges {
    try_split(data).unwrap_or_else(|err| {
        warn!(packet_size = data.len(), "{}", err);
        FrameRanges::new()
    })
}

/// Read cursor over the frame ranges of the current packet
#[derive(Debug, Default, Clone)]
pub struct SuperframeQueue {
    ranges: FrameRanges,
    cursor: usize,
}

impl SuperframeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue contents with the ranges of a new packet
    pub fn reset(&mut self, ranges: FrameRanges) {
        self.ranges = ranges;
        self.cursor = 0;
    }

    /// Drop all ranges
    pub fn clear(&mut self) {
        self.ranges.clear();
        self.cursor = 0;
    }

    /// Pop the next unread range
    pub fn pop(&mut self) -> Option<(usize, FrameRange)> {
        let range = *self.ranges.get(self.cursor)?;
        let position = self.cursor;
        self.cursor += 1;
        Some((position, range))
    }

    /// Number of ranges not yet popped
    pub fn remaining(&self) -> usize {
        self.ranges.len() - self.cursor
    }

    pub fn is_drained(&self) -> bool {
        self.remaining() == 0
    }

    /// Total number of ranges for the current packet
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
