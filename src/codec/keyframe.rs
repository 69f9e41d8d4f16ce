//! Keyframe classification from the first bytes of a coded frame

use super::Codec;

/// Check whether `data` starts a keyframe for the given codec
///
/// Empty input and VP9 data without a valid frame marker are never keyframes.
pub fn is_keyframe(codec: Codec, data: &[u8]) -> bool {
    let Some(&first) = data.first() else {
        return false;
    };

    match codec {
        // frame tag bit 0: 0 = key frame, 1 = inter frame
        Codec::Vp8 => first & 0x01 == 0,
        Codec::Vp9 => vp9_is_keyframe(first),
    }
}

fn vp9_is_keyframe(first: u8) -> bool {
    let frame_marker = first >> 6;
    if frame_marker != 2 {
        return false;
    }

    let profile_low = (first >> 5) & 1;
    let profile_high = (first >> 4) & 1;
    let profile = (profile_high << 1) | profile_low;

    // Profile 3 carries a reserved zero bit before show_existing_frame
    let shift = if profile == 3 { 2 } else { 3 };
    if (first >> shift) & 1 == 1 {
        // show_existing_frame
        return false;
    }

    (first >> (shift - 1)) & 1 == 0
}
