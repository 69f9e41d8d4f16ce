//! Superframe splitter tests
//!
//! Worked examples plus property tests over arbitrary packets.

use proptest::prelude::*;
use vpxsplit_lib::format::superframe::{split, try_split, FrameRange, SuperframeIndex, MAX_FRAMES};
use vpxsplit_lib::Error;

mod common;

use common::*;

#[test]
fn test_plain_packet_is_one_frame() {
    let packet = vp9_frame(true, 100, 0x5A);
    assert_eq!(split(&packet).as_slice(), &[FrameRange::new(0, 100)]);
}

#[test]
fn test_c1_superframe_covers_prefix() {
    let a = vp9_frame(false, 17, 1);
    let b = vp9_frame(false, 23, 2);
    let packet = build_superframe(&[a, b], 1);
    assert_eq!(*packet.last().unwrap(), 0xC1);

    let ranges = split(&packet);
    assert_eq!(ranges.len(), 2);
    assert_eq!(ranges[0], FrameRange::new(0, 17));
    assert_eq!(ranges[1], FrameRange::new(17, 23));
    assert_eq!(ranges[1].end(), packet.len() - 4);
}

#[test]
fn test_eight_frames_with_four_byte_sizes() {
    let frames: Vec<Vec<u8>> = (0..8).map(|i| vp9_frame(false, 3 + i, i as u8)).collect();
    let packet = build_superframe(&frames, 4);
    assert_eq!(*packet.last().unwrap(), 0xDF);

    let index = SuperframeIndex::parse(&packet).unwrap();
    assert_eq!(index.frame_count(), 8);
    assert_eq!(index.index_size(), 34);

    let ranges = split(&packet);
    assert_eq!(ranges.len(), MAX_FRAMES);
    let mut offset = 0;
    for (range, frame) in ranges.iter().zip(&frames) {
        assert_eq!(*range, FrameRange::new(offset, frame.len()));
        offset += frame.len();
    }
}

#[test]
fn test_start_marker_mismatch_falls_back() {
    let mut packet = build_superframe(&[vp9_frame(false, 5, 1), vp9_frame(false, 5, 2)], 1);
    let start = packet.len() - 4;
    packet[start] ^= 0x01;
    assert_eq!(split(&packet).as_slice(), &[FrameRange::new(0, packet.len())]);
}

#[test]
fn test_declared_size_past_end_is_mismatch() {
    let mut packet = vp9_frame(false, 10, 0);
    packet.extend_from_slice(&[0xC9, 0x20, 0x00, 0xFF, 0xFF, 0xC9]);

    assert!(matches!(
        try_split(&packet),
        Err(Error::IndexSizeMismatch { .. })
    ));
    assert!(split(&packet).is_empty());
}

proptest! {
    #[test]
    fn prop_ranges_stay_in_bounds(data in prop::collection::vec(any::<u8>(), 1..512)) {
        let ranges = split(&data);
        prop_assert!(ranges.len() <= MAX_FRAMES);

        let mut last_end = 0;
        let mut total = 0;
        for range in ranges.iter() {
            prop_assert!(range.offset >= last_end);
            prop_assert!(range.end() <= data.len());
            last_end = range.end();
            total += range.len;
        }
        prop_assert!(total <= data.len());
    }

    #[test]
    fn prop_built_superframes_split_exactly(
        sizes in prop::collection::vec(1usize..600, 1..=8),
        size_width in 2usize..=4,
    ) {
        let frames: Vec<Vec<u8>> = sizes
            .iter()
            .enumerate()
            .map(|(i, &len)| vp9_frame(i == 0, len, i as u8))
            .collect();
        let packet = build_superframe(&frames, size_width);

        let ranges = split(&packet);
        prop_assert_eq!(ranges.len(), frames.len());
        let mut offset = 0;
        for (range, frame) in ranges.iter().zip(&frames) {
            prop_assert_eq!(*range, FrameRange::new(offset, frame.len()));
            prop_assert_eq!(&packet[range.as_range()], frame.as_slice());
            offset += frame.len();
        }
    }

    #[test]
    fn prop_packets_without_marker_are_whole(
        mut data in prop::collection::vec(any::<u8>(), 1..256),
        last in 0u8..0xC0,
    ) {
        *data.last_mut().unwrap() = last;
        let ranges = split(&data);
        prop_assert_eq!(ranges.as_slice(), &[FrameRange::new(0, data.len())]);
    }
}
