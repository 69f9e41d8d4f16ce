//! Demux engine contract
//!
//! WebM element parsing is delegated to an engine behind [`DemuxEngine`].
//! Tracks are addressed by their zero-based position in the track list.
//! Packets are released by dropping them; the engine by dropping it.

use crate::error::Result;
use bytes::Bytes;

/// Track type as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Audio,
    Unknown,
}

/// Video parameters of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackVideo {
    pub width: u32,
    pub height: u32,
}

/// One engine packet, holding one or more laced chunks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnginePacket {
    track: usize,
    timestamp: u64,
    chunks: Vec<Bytes>,
}

impl EnginePacket {
    pub fn new(track: usize, timestamp: u64, chunks: Vec<Bytes>) -> Self {
        EnginePacket {
            track,
            timestamp,
            chunks,
        }
    }

    /// Index of the track this packet belongs to
    pub fn track(&self) -> usize {
        self.track
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunk(&self, index: usize) -> Option<&Bytes> {
        self.chunks.get(index)
    }
}

/// Narrow interface onto a WebM demuxer
pub trait DemuxEngine {
    /// Number of tracks in the segment
    fn track_count(&self) -> Result<usize>;

    /// Type of the track at `track`
    fn track_type(&self, track: usize) -> Result<TrackKind>;

    /// Matroska codec id of the track (e.g. `V_VP9`)
    fn track_codec_id(&self, track: usize) -> Result<&str>;

    /// Video parameters of a video track
    fn track_video_params(&self, track: usize) -> Result<TrackVideo>;

    /// Read the next packet of any track; `Ok(None)` at end of stream
    fn read_packet(&mut self) -> Result<Option<EnginePacket>>;
}
