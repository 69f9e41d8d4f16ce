//! [`DemuxEngine`] backed by the `matroska-demuxer` crate

use super::engine::{DemuxEngine, EnginePacket, TrackKind, TrackVideo};
use crate::error::{Error, Result};
use bytes::Bytes;
use matroska_demuxer::{Frame, MatroskaFile, TrackType};
use std::io::{Read, Seek};

/// WebM/Matroska engine over any seekable byte source
///
/// The demuxer splits laced blocks itself, so every packet carries exactly
/// one chunk.
pub struct MatroskaEngine<R: Read + Seek> {
    file: MatroskaFile<R>,
    frame: Frame,
}

impl<R: Read + Seek> MatroskaEngine<R> {
    /// Parse the EBML header and segment metadata of `reader`
    pub fn open(reader: R) -> Result<Self> {
        let file = MatroskaFile::open(reader)
            .map_err(|e| Error::engine(format!("Failed to open WebM/Matroska stream: {}", e)))?;
        Ok(MatroskaEngine {
            file,
            frame: Frame::default(),
        })
    }

    fn track_index(&self, track_number: u64) -> Option<usize> {
        self.file
            .tracks()
            .iter()
            .position(|t| t.track_number().get() == track_number)
    }
}

fn no_such_track(track: usize) -> Error {
    Error::engine(format!("No track at index {}", track))
}

impl<R: Read + Seek> DemuxEngine for MatroskaEngine<R> {
    fn track_count(&self) -> Result<usize> {
        Ok(self.file.tracks().len())
    }

    fn track_type(&self, track: usize) -> Result<TrackKind> {
        let entry = self.file.tracks().get(track).ok_or_else(|| no_such_track(track))?;
        Ok(match entry.track_type() {
            TrackType::Video => TrackKind::Video,
            TrackType::Audio => TrackKind::Audio,
            _ => TrackKind::Unknown,
        })
    }

    fn track_codec_id(&self, track: usize) -> Result<&str> {
        let entry = self.file.tracks().get(track).ok_or_else(|| no_such_track(track))?;
        Ok(entry.codec_id())
    }

    fn track_video_params(&self, track: usize) -> Result<TrackVideo> {
        let entry = self.file.tracks().get(track).ok_or_else(|| no_such_track(track))?;
        let video = entry
            .video()
            .ok_or_else(|| Error::engine(format!("Track {} has no video settings", track)))?;
        Ok(TrackVideo {
            width: video.pixel_width().get() as u32,
            height: video.pixel_height().get() as u32,
        })
    }

    fn read_packet(&mut self) -> Result<Option<EnginePacket>> {
        let has_more = self
            .file
            .next_frame(&mut self.frame)
            .map_err(|e| Error::engine(format!("Failed to read frame: {}", e)))?;
        if !has_more {
            return Ok(None);
        }

        let track = self.track_index(self.frame.track).ok_or_else(|| {
            Error::engine(format!("Frame references unknown track {}", self.frame.track))
        })?;
        let data = Bytes::from(std::mem::take(&mut self.frame.data));
        Ok(Some(EnginePacket::new(track, self.frame.timestamp, vec![data])))
    }
}
