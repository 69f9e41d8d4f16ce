//! WebM frame source: pulls video-track chunks from a demux engine

use super::engine::{DemuxEngine, EnginePacket};
use crate::error::Result;
use crate::format::Packet;
use tracing::trace;

/// Serves the chunks of the selected video track one at a time
pub struct WebmFrameSource {
    engine: Box<dyn DemuxEngine>,
    video_track: usize,
    packet: Option<EnginePacket>,
    chunk: usize,
}

impl WebmFrameSource {
    pub fn new(engine: Box<dyn DemuxEngine>, video_track: usize) -> Self {
        WebmFrameSource {
            engine,
            video_track,
            packet: None,
            chunk: 0,
        }
    }

    /// Index of the track packets are taken from
    pub fn video_track(&self) -> usize {
        self.video_track
    }

    /// Return the next chunk of the video track
    ///
    /// A new engine packet is read only once every chunk of the current one
    /// has been returned. Packets of other tracks are dropped unread.
    pub fn next_packet(&mut self) -> Result<Option<Packet>> {
        loop {
            if let Some(packet) = &self.packet {
                if let Some(chunk) = packet.chunk(self.chunk) {
                    self.chunk += 1;
                    return Ok(Some(Packet::new(
                        packet.track(),
                        chunk.clone(),
                        packet.timestamp(),
                    )));
                }
            }

            // Release the exhausted packet before asking for another
            self.packet = None;
            match self.next_video_packet()? {
                Some(packet) => {
                    trace!(chunks = packet.chunk_count(), "webm packet");
                    self.packet = Some(packet);
                    self.chunk = 0;
                }
                None => return Ok(None),
            }
        }
    }

    fn next_video_packet(&mut self) -> Result<Option<EnginePacket>> {
        while let Some(packet) = self.engine.read_packet()? {
            if packet.track() == self.video_track {
                return Ok(Some(packet));
            }
        }
        Ok(None)
    }
}
