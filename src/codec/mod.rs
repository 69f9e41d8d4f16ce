//! VP8/VP9 codec identification and frame classification
//!
//! No decoding happens here; the containers only need to know which codec a
//! stream carries and where keyframes start.

pub mod keyframe;
pub mod vpx;

pub use keyframe::is_keyframe;
pub use vpx::{fourcc_to_string, Codec, VP8_FOURCC, VP9_FOURCC};
