//! Packet representation for container-level compressed data

use bytes::Bytes;
use std::fmt;

/// One container-level packet: an IVF frame record or one WebM chunk
///
/// The payload may hold a VP9 superframe; splitting happens downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Track this packet belongs to (always 0 for IVF)
    pub track: usize,

    /// Compressed data
    pub data: Bytes,

    /// Container timestamp (IVF timebase units, WebM nanoseconds)
    pub timestamp: u64,
}

impl Packet {
    /// Create a new packet
    pub fn new(track: usize, data: Bytes, timestamp: u64) -> Self {
        Packet {
            track,
            data,
            timestamp,
        }
    }

    /// Get the size of the packet data
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Check if the packet carries no data
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Packet(track={}, size={}, ts={})",
            self.track,
            self.size(),
            self.timestamp
        )
    }
}
