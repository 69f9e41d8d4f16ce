//! Container detection
//!
//! The first 32 bytes are checked for an IVF header. Anything else is
//! rewound and handed to the demux engine as a WebM candidate, which must
//! expose a VP8 or VP9 video track.

use crate::codec::{fourcc_to_string, Codec};
use crate::error::{Error, Result};
use crate::format::ivf::{read_up_to, IvfHeader, IvfReader, IVF_HEADER_SIZE};
use crate::format::webm::{DemuxEngine, TrackKind, WebmFrameSource};
use crate::format::{ContainerFormat, Packet, VideoParams};
use std::io::{Read, Seek, SeekFrom};
use tracing::warn;

/// The packet reader chosen for a stream
pub enum Source<R> {
    Ivf(IvfReader<R>),
    Webm(WebmFrameSource),
}

impl<R: Read> Source<R> {
    pub fn format(&self) -> ContainerFormat {
        match self {
            Source::Ivf(_) => ContainerFormat::Ivf,
            Source::Webm(_) => ContainerFormat::Webm,
        }
    }

    /// Pull the next raw packet from the active reader
    pub fn next_packet(&mut self) -> Result<Option<Packet>> {
        match self {
            Source::Ivf(reader) => reader.next_packet(),
            Source::Webm(source) => source.next_packet(),
        }
    }
}

/// Outcome of a successful detection
pub struct Detected<R> {
    pub params: VideoParams,
    pub source: Source<R>,
}

/// Detect the container of `reader` and build its packet reader
///
/// `engine_factory` is only called when the stream is not IVF; it receives
/// the stream rewound to offset 0.
pub fn detect<R, F>(mut reader: R, engine_factory: F) -> Result<Detected<R>>
where
    R: Read + Seek,
    F: FnOnce(R) -> Result<Box<dyn DemuxEngine>>,
{
    let mut raw = [0u8; IVF_HEADER_SIZE];
    let got = read_up_to(&mut reader, &mut raw)
        .map_err(|e| Error::unsupported(format!("cannot read container header: {}", e)))?;
    if got == IVF_HEADER_SIZE {
        if let Some(header) = IvfHeader::parse(&raw) {
            let params = ivf_params(&header);
            return Ok(Detected {
                params,
                source: Source::Ivf(IvfReader::with_header(reader, header)),
            });
        }
    }

    reader
        .seek(SeekFrom::Start(0))
        .map_err(|e| Error::unsupported(format!("cannot rewind stream: {}", e)))?;
    let engine = engine_factory(reader)
        .map_err(|e| Error::unsupported(format!("neither IVF nor WebM: {}", e)))?;
    let (params, video_track) = webm_params(engine.as_ref())?;
    Ok(Detected {
        params,
        source: Source::Webm(WebmFrameSource::new(engine, video_track)),
    })
}

fn ivf_params(header: &IvfHeader) -> VideoParams {
    if header.version != 0 {
        warn!(
            version = header.version,
            "Unrecognized IVF version, this file may not decode properly"
        );
    }
    if header.header_len as usize != IVF_HEADER_SIZE {
        warn!(header_len = header.header_len, "Unexpected IVF header length");
    }
    if header.codec().is_none() {
        warn!(
            fourcc = %fourcc_to_string(header.fourcc),
            "IVF fourcc is not VP8 or VP9"
        );
    }

    let (fps_num, fps_den) = header.frame_rate();
    VideoParams {
        width: header.width as u32,
        height: header.height as u32,
        fps_num,
        fps_den,
        fourcc: header.fourcc,
    }
}

/// Index of the first video track
pub fn find_video_track(engine: &dyn DemuxEngine) -> Result<usize> {
    let count = engine
        .track_count()
        .map_err(|e| Error::unsupported(format!("cannot enumerate tracks: {}", e)))?;
    for track in 0..count {
        match engine.track_type(track) {
            Ok(TrackKind::Video) => return Ok(track),
            Ok(_) => continue,
            Err(e) => {
                return Err(Error::unsupported(format!(
                    "cannot read type of track {}: {}",
                    track, e
                )))
            }
        }
    }
    Err(Error::unsupported("no video track"))
}

fn webm_params(engine: &dyn DemuxEngine) -> Result<(VideoParams, usize)> {
    let track = find_video_track(engine)?;
    let codec_id = engine
        .track_codec_id(track)
        .map_err(|e| Error::unsupported(format!("cannot read codec of track {}: {}", track, e)))?;
    let codec = Codec::from_codec_id(codec_id)
        .ok_or_else(|| Error::unsupported(format!("not VPx video: {}", codec_id)))?;
    let video = engine.track_video_params(track).map_err(|e| {
        Error::unsupported(format!("cannot read video params of track {}: {}", track, e))
    })?;

    // WebM timing is not derived here
    let params = VideoParams {
        width: video.width,
        height: video.height,
        fps_num: 0,
        fps_den: 0,
        fourcc: codec.fourcc(),
    };
    Ok((params, track))
}
