//! Binary layout — the fixed 18-byte shape shared with the `itree` database type.
//!
//! ## Encoded Layout
//!
//! ```text
//! ┌──────────────────┬──────────────────────────────────────────────┐
//! │ Control mask     │ Data region                                  │
//! │ 2 bytes (u16 BE) │ 16 bytes, 1 or 2 bytes per segment, 0-padded │
//! │ [0:2]            │ [2:18]                                       │
//! └──────────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! Bit `15 - p` of the control mask describes data byte `p`:
//! `1` = the byte starts a segment, `0` = the byte continues a two-byte segment.
//!
//! Example, `1.2.300.4.500`:
//!
//! ```text
//! data:    01 02 01 2c 04 01 f4 00 00 00 00 00 00 00 00 00
//! control:  1  1  1  0  1  1  0  1  1  1  1  1  1  1  1  1   = 0xedff
//! ```

/// Maximum number of segments in a path.
pub const MAX_SEGMENTS: usize = 16;

/// Length of the packed data region in bytes.
pub const DATA_LEN: usize = 16;

/// Length of the control mask in bytes.
pub const CONTROL_LEN: usize = 2;

/// Total encoded length (control mask + data region).
pub const ENCODED_LEN: usize = CONTROL_LEN + DATA_LEN;

/// Largest segment value that packs into a single byte.
pub const MAX_SHORT_SEGMENT: u16 = 0xFF;

/// Segment value reserved for padding in the data region.
pub const PADDING: u16 = 0;

/// Static assertion: one control bit per data byte.
const _: () = {
    assert!(
        CONTROL_LEN * 8 == DATA_LEN,
        "control mask must carry exactly one bit per data byte"
    );
};

/// Number of data bytes a segment occupies once packed.
#[inline]
pub const fn packed_width(segment: u16) -> usize {
    if segment > MAX_SHORT_SEGMENT { 2 } else { 1 }
}

/// Total packed size of a segment sequence.
#[inline]
pub const fn packed_len(segments: &[u16]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < segments.len() {
        total += packed_width(segments[i]);
        i += 1;
    }
    total
}

/// Per-byte segment-start flags for the 16-byte data region.
///
/// Wraps the raw 16-bit control word so callers never shift by hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ControlMask(u16);

impl ControlMask {
    /// Every position is a segment start.
    pub const ALL_STARTS: Self = Self(u16::MAX);

    #[inline]
    pub const fn from_be_bytes(bytes: [u8; CONTROL_LEN]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn to_be_bytes(self) -> [u8; CONTROL_LEN] {
        self.0.to_be_bytes()
    }

    #[inline]
    const fn bit(pos: usize) -> u16 {
        debug_assert!(pos < DATA_LEN, "data position out of range");
        1 << (DATA_LEN - 1 - pos)
    }

    /// Does data byte `pos` start a segment?
    #[inline]
    pub const fn is_segment_start(self, pos: usize) -> bool {
        self.0 & Self::bit(pos) != 0
    }

    /// Mark data byte `pos` as the second byte of a two-byte segment.
    #[inline]
    pub const fn mark_continuation(self, pos: usize) -> Self {
        Self(self.0 & !Self::bit(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_constants_are_consistent() {
        assert_eq!(ENCODED_LEN, 18);
        assert_eq!(MAX_SEGMENTS, DATA_LEN);
    }

    #[test]
    fn packed_width_boundary() {
        assert_eq!(packed_width(1), 1);
        assert_eq!(packed_width(255), 1);
        assert_eq!(packed_width(256), 2);
        assert_eq!(packed_width(u16::MAX), 2);
        assert_eq!(packed_len(&[1, 2, 300, 4, 500]), 7);
    }

    #[test]
    fn control_mask_positions() {
        let mask = ControlMask::ALL_STARTS;
        for pos in 0..DATA_LEN {
            assert!(mask.is_segment_start(pos), "position {} should start", pos);
        }

        let mask = mask.mark_continuation(3).mark_continuation(6);
        assert_eq!(mask.bits(), 0xedff);
        assert!(!mask.is_segment_start(3));
        assert!(!mask.is_segment_start(6));
        assert!(mask.is_segment_start(15));
    }

    #[test]
    fn control_mask_last_position() {
        let mask = ControlMask::ALL_STARTS.mark_continuation(15);
        assert_eq!(mask.bits(), 0xfffe);
        assert_eq!(mask.to_be_bytes(), [0xff, 0xfe]);
        assert_eq!(ControlMask::from_be_bytes([0xff, 0xfe]), mask);
    }
}
