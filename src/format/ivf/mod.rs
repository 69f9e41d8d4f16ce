//! IVF container support
//!
//! IVF is a minimal container for VPx elementary streams: a 32-byte header
//! followed by `(size, timestamp, payload)` frame records.

mod header;
mod reader;
mod writer;

pub use header::{
    guess_frame_rate, IvfHeader, DEFAULT_FRAME_RATE, IVF_FRAME_HEADER_SIZE, IVF_HEADER_SIZE,
    IVF_SIGNATURE,
};
pub use reader::IvfReader;
pub(crate) use reader::read_up_to;
pub use writer::IvfWriter;
