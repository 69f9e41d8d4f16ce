//! Container format handling
//!
//! Pulls coded VP8/VP9 frames out of IVF and WebM containers. The
//! [`FrameReader`] facade ties container detection, packet reading and
//! superframe splitting together.

pub mod ivf;
pub mod packet;
pub mod probe;
pub mod reader;
pub mod superframe;
pub mod webm;

pub use packet::Packet;
pub use reader::{Frame, FrameReader, ReaderState};

use crate::codec::Codec;
use std::fmt;

/// Container formats frames can be extracted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    Ivf,
    Webm,
}

impl ContainerFormat {
    pub fn name(self) -> &'static str {
        match self {
            ContainerFormat::Ivf => "ivf",
            ContainerFormat::Webm => "webm",
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Video stream parameters discovered when a container is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoParams {
    pub width: u32,
    pub height: u32,
    /// Frame rate numerator (0 when unknown)
    pub fps_num: u32,
    /// Frame rate denominator (0 when unknown)
    pub fps_den: u32,
    /// Codec fourcc as found in the container
    pub fourcc: u32,
}

impl VideoParams {
    /// Codec named by the fourcc, if VP8 or VP9
    pub fn codec(&self) -> Option<Codec> {
        Codec::from_fourcc(self.fourcc)
    }

    /// Frame rate as `(num, den)`, or `None` when the container gave none
    pub fn frame_rate(&self) -> Option<(u32, u32)> {
        (self.fps_num != 0 && self.fps_den != 0).then_some((self.fps_num, self.fps_den))
    }
}
