//! VP8/VP9 codec identification
//!
//! Containers name the codec differently: IVF stores a fourcc in its header
//! while WebM tracks carry a Matroska codec id string. Both map onto [`Codec`].

use std::fmt;

/// Fourcc reported for VP8 streams (`'V' 'P' '8' 0`)
pub const VP8_FOURCC: u32 = 0x0038_5056;

/// Fourcc reported for VP9 streams (`'V' 'P' '9' 0`)
pub const VP9_FOURCC: u32 = 0x0039_5056;

/// Video codecs this crate extracts frames for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    Vp8,
    Vp9,
}

impl Codec {
    /// Map a Matroska codec id to a codec
    pub fn from_codec_id(codec_id: &str) -> Option<Self> {
        match codec_id {
            "V_VP8" => Some(Codec::Vp8),
            "V_VP9" => Some(Codec::Vp9),
            _ => None,
        }
    }

    /// Map an IVF fourcc to a codec
    ///
    /// Only the `VP8`/`VP9` prefix is compared, so both the zero-terminated
    /// tags and the common `VP80`/`VP90` spellings are accepted.
    pub fn from_fourcc(fourcc: u32) -> Option<Self> {
        match fourcc & 0x00FF_FFFF {
            0x38_5056 => Some(Codec::Vp8),
            0x39_5056 => Some(Codec::Vp9),
            _ => None,
        }
    }

    /// Fourcc for this codec
    pub fn fourcc(self) -> u32 {
        match self {
            Codec::Vp8 => VP8_FOURCC,
            Codec::Vp9 => VP9_FOURCC,
        }
    }

    /// Fourcc bytes as written to an IVF header (`VP80` / `VP90`)
    pub fn ivf_tag(self) -> [u8; 4] {
        match self {
            Codec::Vp8 => *b"VP80",
            Codec::Vp9 => *b"VP90",
        }
    }

    /// Short lowercase name
    pub fn name(self) -> &'static str {
        match self {
            Codec::Vp8 => "vp8",
            Codec::Vp9 => "vp9",
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Render a fourcc as text, replacing non-printable bytes with `.`
pub fn fourcc_to_string(fourcc: u32) -> String {
    fourcc
        .to_le_bytes()
        .iter()
        .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_id_mapping() {
        assert_eq!(Codec::from_codec_id("V_VP8"), Some(Codec::Vp8));
        assert_eq!(Codec::from_codec_id("V_VP9"), Some(Codec::Vp9));
        assert_eq!(Codec::from_codec_id("V_AV1"), None);
        assert_eq!(Codec::from_codec_id("A_OPUS"), None);
    }

    #[test]
    fn test_fourcc_values() {
        assert_eq!(Codec::Vp8.fourcc(), 0x0038_5056);
        assert_eq!(Codec::Vp9.fourcc(), 0x0039_5056);
    }

    #[test]
    fn test_from_fourcc_accepts_both_spellings() {
        assert_eq!(Codec::from_fourcc(VP8_FOURCC), Some(Codec::Vp8));
        assert_eq!(Codec::from_fourcc(u32::from_le_bytes(*b"VP80")), Some(Codec::Vp8));
        assert_eq!(Codec::from_fourcc(u32::from_le_bytes(*b"VP90")), Some(Codec::Vp9));
        assert_eq!(Codec::from_fourcc(u32::from_le_bytes(*b"AV01")), None);
    }

    #[test]
    fn test_fourcc_to_string() {
        assert_eq!(fourcc_to_string(u32::from_le_bytes(*b"VP90")), "VP90");
        assert_eq!(fourcc_to_string(VP8_FOURCC), "VP8.");
    }
}
