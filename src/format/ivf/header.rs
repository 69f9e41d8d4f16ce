//! IVF global header

use crate::codec::Codec;
use byteorder::{ByteOrder, LittleEndian};

/// IVF signature
pub const IVF_SIGNATURE: &[u8; 4] = b"DKIF";

/// Size of the IVF global header
pub const IVF_HEADER_SIZE: usize = 32;

/// Size of the header in front of every IVF frame
pub const IVF_FRAME_HEADER_SIZE: usize = 12;

/// Frame rate assumed when the header's rate cannot be trusted
pub const DEFAULT_FRAME_RATE: (u32, u32) = (30, 1);

/// The 32-byte IVF file header
///
/// | offset | size | field            |
/// |--------|------|------------------|
/// | 0      | 4    | `DKIF`           |
/// | 4      | 2    | version          |
/// | 6      | 2    | header length    |
/// | 8      | 4    | codec fourcc     |
/// | 12     | 2    | width            |
/// | 14     | 2    | height           |
/// | 16     | 4    | rate numerator   |
/// | 20     | 4    | rate denominator |
/// | 24     | 4    | frame count      |
/// | 28     | 4    | reserved         |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IvfHeader {
    pub version: u16,
    pub header_len: u16,
    pub fourcc: u32,
    pub width: u16,
    pub height: u16,
    pub fps_num: u32,
    pub fps_den: u32,
    pub frame_count: u32,
}

impl IvfHeader {
    /// Header for a new stream of the given codec
    pub fn new(codec: Codec, width: u16, height: u16, fps_num: u32, fps_den: u32) -> Self {
        IvfHeader {
            version: 0,
            header_len: IVF_HEADER_SIZE as u16,
            fourcc: u32::from_le_bytes(codec.ivf_tag()),
            width,
            height,
            fps_num,
            fps_den,
            frame_count: 0,
        }
    }

    /// Parse a raw header, returning `None` if the signature does not match
    pub fn parse(raw: &[u8; IVF_HEADER_SIZE]) -> Option<Self> {
        if &raw[0..4] != IVF_SIGNATURE {
            return None;
        }

        Some(IvfHeader {
            version: LittleEndian::read_u16(&raw[4..6]),
            header_len: LittleEndian::read_u16(&raw[6..8]),
            fourcc: LittleEndian::read_u32(&raw[8..12]),
            width: LittleEndian::read_u16(&raw[12..14]),
            height: LittleEndian::read_u16(&raw[14..16]),
            fps_num: LittleEndian::read_u32(&raw[16..20]),
            fps_den: LittleEndian::read_u32(&raw[20..24]),
            frame_count: LittleEndian::read_u32(&raw[24..28]),
        })
    }

    /// Serialize the header
    pub fn to_bytes(&self) -> [u8; IVF_HEADER_SIZE] {
        let mut raw = [0u8; IVF_HEADER_SIZE];
        raw[0..4].copy_from_slice(IVF_SIGNATURE);
        LittleEndian::write_u16(&mut raw[4..6], self.version);
        LittleEndian::write_u16(&mut raw[6..8], self.header_len);
        LittleEndian::write_u32(&mut raw[8..12], self.fourcc);
        LittleEndian::write_u16(&mut raw[12..14], self.width);
        LittleEndian::write_u16(&mut raw[14..16], self.height);
        LittleEndian::write_u32(&mut raw[16..20], self.fps_num);
        LittleEndian::write_u32(&mut raw[20..24], self.fps_den);
        LittleEndian::write_u32(&mut raw[24..28], self.frame_count);
        raw
    }

    /// Codec named by the fourcc, if it is VP8 or VP9
    pub fn codec(&self) -> Option<Codec> {
        Codec::from_fourcc(self.fourcc)
    }

    /// Frame rate corrected with [`guess_frame_rate`]
    pub fn frame_rate(&self) -> (u32, u32) {
        guess_frame_rate(self.fps_num, self.fps_den)
    }
}

/// Recover the frame rate from an IVF header's rate fields
///
/// Some encoders wrote a timebase of `1/(2*fps)`, so small numerators are
/// halved (or the denominator doubled when the numerator is odd). Numerators
/// of 1000 and up carry no usable rate and fall back to 30/1.
pub fn guess_frame_rate(fps_num: u32, fps_den: u32) -> (u32, u32) {
    if fps_num >= 1000 {
        return DEFAULT_FRAME_RATE;
    }

    if fps_num & 1 == 1 {
        (fps_num, fps_den << 1)
    } else {
        (fps_num >> 1, fps_den)
    }
}
