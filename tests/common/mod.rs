//! Common test utilities for vpxsplit integration tests
//!
//! Builders for synthetic IVF streams and VP9 superframes, and a scripted
//! demux engine standing in for a WebM parser.

#![allow(dead_code)]

use bytes::Bytes;
use std::collections::VecDeque;
use vpxsplit_lib::codec::Codec;
use vpxsplit_lib::format::ivf::IvfHeader;
use vpxsplit_lib::format::webm::{DemuxEngine, EnginePacket, TrackKind, TrackVideo};
use vpxsplit_lib::{Error, Result};

// ============================================================================
// IVF
// ============================================================================

/// Build an IVF stream holding `frames`, with timestamps 0, 1, 2, ...
pub fn build_ivf(codec: Codec, width: u16, height: u16, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut header = IvfHeader::new(codec, width, height, 60, 1);
    header.frame_count = frames.len() as u32;

    let mut data = header.to_bytes().to_vec();
    for (i, frame) in frames.iter().enumerate() {
        data.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        data.extend_from_slice(&(i as u64).to_le_bytes());
        data.extend_from_slice(frame);
    }
    data
}

/// A VP9 profile 0 frame header byte followed by `len - 1` filler bytes
pub fn vp9_frame(keyframe: bool, len: usize, fill: u8) -> Vec<u8> {
    let mut frame = vec![fill; len];
    frame[0] = if keyframe { 0x82 } else { 0x86 };
    frame
}

// ============================================================================
// Superframes
// ============================================================================

/// Index marker byte for `frames` frames with `size_width`-byte sizes
pub fn superframe_marker(frames: usize, size_width: usize) -> u8 {
    0xC0 | (((size_width - 1) as u8) << 3) | (frames - 1) as u8
}

/// Concatenate `frames` and append a superframe index
pub fn build_superframe(frames: &[Vec<u8>], size_width: usize) -> Vec<u8> {
    let marker = superframe_marker(frames.len(), size_width);
    let mut data: Vec<u8> = frames.concat();
    data.push(marker);
    for frame in frames {
        data.extend_from_slice(&(frame.len() as u32).to_le_bytes()[..size_width]);
    }
    data.push(marker);
    data
}

// ============================================================================
// Demux engine
// ============================================================================

/// Engine that serves a fixed track table and a scripted packet sequence
pub struct ScriptedEngine {
    pub tracks: Vec<(TrackKind, &'static str)>,
    pub video: TrackVideo,
    pub packets: VecDeque<Result<EnginePacket>>,
}

impl ScriptedEngine {
    pub fn new(tracks: Vec<(TrackKind, &'static str)>) -> Self {
        ScriptedEngine {
            tracks,
            video: TrackVideo {
                width: 1280,
                height: 720,
            },
            packets: VecDeque::new(),
        }
    }

    /// Queue a packet whose chunks are copied from `chunks`
    pub fn packet(mut self, track: usize, timestamp: u64, chunks: &[Vec<u8>]) -> Self {
        let chunks = chunks.iter().cloned().map(Bytes::from).collect();
        self.packets
            .push_back(Ok(EnginePacket::new(track, timestamp, chunks)));
        self
    }

    /// Queue a read failure
    pub fn failure(mut self, msg: &str) -> Self {
        self.packets.push_back(Err(Error::engine(msg)));
        self
    }

    /// Factory handing this engine to a frame reader
    pub fn into_factory<R>(self) -> impl FnOnce(R) -> Result<Box<dyn DemuxEngine>> {
        move |_| Ok(Box::new(self) as Box<dyn DemuxEngine>)
    }
}

impl DemuxEngine for ScriptedEngine {
    fn track_count(&self) -> Result<usize> {
        Ok(self.tracks.len())
    }

    fn track_type(&self, track: usize) -> Result<TrackKind> {
        self.tracks
            .get(track)
            .map(|(kind, _)| *kind)
            .ok_or_else(|| Error::engine("no such track"))
    }

    fn track_codec_id(&self, track: usize) -> Result<&str> {
        self.tracks
            .get(track)
            .map(|(_, id)| *id)
            .ok_or_else(|| Error::engine("no such track"))
    }

    fn track_video_params(&self, _track: usize) -> Result<TrackVideo> {
        Ok(self.video)
    }

    fn read_packet(&mut self) -> Result<Option<EnginePacket>> {
        self.packets.pop_front().transpose()
    }
}
