//! WebM support
//!
//! Only track discovery and video packet retrieval are used; element parsing
//! lives behind the [`DemuxEngine`] trait.

mod engine;
mod matroska;
mod source;

pub use engine::{DemuxEngine, EnginePacket, TrackKind, TrackVideo};
pub use matroska::MatroskaEngine;
pub use source::WebmFrameSource;
