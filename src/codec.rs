//! Binary codec — the 18-byte wire form of an [`ITree`].
//!
//! See [`crate::layout`] for the byte layout.

use tracing::{debug, trace};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::error::{EncodingError, ITreeError, Result};
use crate::layout::{ControlMask, CONTROL_LEN, DATA_LEN, ENCODED_LEN, MAX_SEGMENTS, PADDING};
use crate::path::ITree;

/// In-place view of an encoded path.
///
/// Matches the storage layout of the database type byte for byte, so a
/// buffer can be reinterpreted without copying:
///
/// ```
/// use itree::{ITree, RawITree};
/// use zerocopy::FromBytes;
///
/// let bytes = ITree::parse("1.2.300").unwrap().to_bytes();
/// let raw = RawITree::ref_from_bytes(&bytes[..]).unwrap();
/// assert_eq!(raw.decode().unwrap(), "1.2.300");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct RawITree {
    pub control: [u8; CONTROL_LEN],
    pub data: [u8; DATA_LEN],
}

/// Static assertion: the view has no padding.
const _: () = {
    assert!(std::mem::size_of::<RawITree>() == ENCODED_LEN);
};

impl RawITree {
    #[inline]
    pub const fn control_mask(&self) -> ControlMask {
        ControlMask::from_be_bytes(self.control)
    }

    /// Pack a path.
    pub fn encode(path: &ITree) -> Self {
        let mut mask = ControlMask::ALL_STARTS;
        let mut data = [0u8; DATA_LEN];
        let mut offset = 0;

        for value in path.iter() {
            match u8::try_from(value) {
                Ok(byte) => {
                    data[offset] = byte;
                    offset += 1;
                }
                Err(_) => {
                    data[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
                    mask = mask.mark_continuation(offset + 1);
                    offset += 2;
                }
            }
        }

        Self {
            control: mask.to_be_bytes(),
            data,
        }
    }

    /// Unpack and validate.
    ///
    /// A zero value is padding and is skipped. The result is re-validated
    /// with the construction rules, so a buffer holding only padding fails
    /// as an empty path.
    pub fn decode(&self) -> Result<ITree> {
        let mask = self.control_mask();
        let mut segments = [0u16; MAX_SEGMENTS];
        let mut count = 0;
        let mut pos = 0;

        while pos < DATA_LEN {
            if !mask.is_segment_start(pos) {
                debug!(pos, control = mask.bits(), "itree decode: continuation at segment start");
                return Err(EncodingError::UnexpectedContinuation(pos).into());
            }

            let value = if pos + 1 < DATA_LEN && !mask.is_segment_start(pos + 1) {
                let value = u16::from_be_bytes([self.data[pos], self.data[pos + 1]]);
                pos += 2;
                value
            } else {
                let value = u16::from(self.data[pos]);
                pos += 1;
                value
            };

            if value == PADDING {
                continue;
            }
            if count == MAX_SEGMENTS {
                debug!("itree decode: more than {} segments", MAX_SEGMENTS);
                return Err(EncodingError::TooManySegments.into());
            }
            segments[count] = value;
            count += 1;
        }

        let path = ITree::from_segments(&segments[..count])?;
        trace!(%path, "itree decoded");
        Ok(path)
    }
}

impl From<&ITree> for RawITree {
    #[inline]
    fn from(path: &ITree) -> Self {
        Self::encode(path)
    }
}

impl TryFrom<&RawITree> for ITree {
    type Error = ITreeError;

    #[inline]
    fn try_from(raw: &RawITree) -> Result<Self> {
        raw.decode()
    }
}

impl ITree {
    /// The 18-byte binary form.
    ///
    /// ```
    /// use itree::ITree;
    ///
    /// let bytes = ITree::parse("1.2.300.4.500").unwrap().to_bytes();
    /// assert_eq!(bytes[..2], [0xedu8, 0xff]);
    /// assert_eq!(bytes[2..9], [0x01u8, 0x02, 0x01, 0x2c, 0x04, 0x01, 0xf4]);
    /// ```
    #[inline]
    pub fn to_bytes(&self) -> [u8; ENCODED_LEN] {
        let mut out = [0u8; ENCODED_LEN];
        out.copy_from_slice(RawITree::encode(self).as_bytes());
        out
    }

    #[inline]
    pub fn to_raw(&self) -> RawITree {
        RawITree::encode(self)
    }

    /// Decode an 18-byte buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw = RawITree::ref_from_bytes(bytes).map_err(|_| {
            debug!(len = bytes.len(), "itree decode: wrong buffer length");
            EncodingError::WrongLength(bytes.len())
        })?;
        raw.decode()
    }
}

impl From<ITree> for [u8; ENCODED_LEN] {
    #[inline]
    fn from(path: ITree) -> Self {
        path.to_bytes()
    }
}

impl TryFrom<&[u8]> for ITree {
    type Error = ITreeError;

    #[inline]
    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

impl TryFrom<[u8; ENCODED_LEN]> for ITree {
    type Error = ITreeError;

    #[inline]
    fn try_from(bytes: [u8; ENCODED_LEN]) -> Result<Self> {
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PathError;

    fn p(text: &str) -> ITree {
        ITree::parse(text).unwrap()
    }

    fn raw(control: u16, data: &[u8]) -> RawITree {
        let mut out = RawITree {
            control: control.to_be_bytes(),
            data: [0; DATA_LEN],
        };
        out.data[..data.len()].copy_from_slice(data);
        out
    }

    #[test]
    fn encodes_known_value() {
        let bytes = p("1.2.300.4.500").to_bytes();
        let expected: [u8; ENCODED_LEN] = [
            0xed, 0xff, 0x01, 0x02, 0x01, 0x2c, 0x04, 0x01, 0xf4, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        ];
        assert_eq!(bytes, expected);
        assert_eq!(ITree::from_bytes(&bytes).unwrap(), p("1.2.300.4.500"));
    }

    #[test]
    fn single_byte_paths_keep_all_start_bits() {
        let encoded = p("1.2.3").to_raw();
        assert_eq!(encoded.control, [0xffu8, 0xff]);
        assert_eq!(encoded.data[..4], [1u8, 2, 3, 0]);
    }

    #[test]
    fn two_byte_segment_in_last_position() {
        let path = p(&format!("{}.65535", ["1"; 14].join(".")));
        let encoded = path.to_raw();
        assert_eq!(encoded.control_mask().bits(), 0xfffe);
        assert_eq!(encoded.data[14..], [0xffu8, 0xff]);
        assert_eq!(encoded.decode().unwrap(), path);
    }

    #[test]
    fn full_budget_round_trip() {
        for text in [
            "300.300.300.300.300.300.300.300",
            "1.2.3.4.5.6.7.8.9.10.11.12.13.14.15.16",
            "255.256.255.256",
            "65535",
        ] {
            let path = p(text);
            assert_eq!(RawITree::encode(&path).decode().unwrap(), path, "{}", text);
        }
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            ITree::from_bytes(&[0xff; 17]),
            Err(EncodingError::WrongLength(17).into())
        );
        assert_eq!(
            ITree::from_bytes(&[0xff; 19]),
            Err(EncodingError::WrongLength(19).into())
        );
        assert_eq!(ITree::from_bytes(&[]), Err(EncodingError::WrongLength(0).into()));
    }

    #[test]
    fn rejects_continuation_at_start() {
        let bad = raw(0x7fff, &[1, 2]);
        assert_eq!(bad.decode(), Err(EncodingError::UnexpectedContinuation(0).into()));

        // Two continuation bits in a row: the second is examined as a start
        let bad = raw(0xcfff, &[1, 1, 44, 2]);
        assert_eq!(bad.decode(), Err(EncodingError::UnexpectedContinuation(3).into()));
    }

    #[test]
    fn padding_is_skipped() {
        let gappy = raw(0xffff, &[1, 0, 2]);
        assert_eq!(gappy.decode().unwrap(), p("1.2"));

        // A two-byte zero is padding too
        let gappy = raw(0xbfff, &[0, 0, 5]);
        assert_eq!(gappy.decode().unwrap(), p("5"));
    }

    #[test]
    fn all_padding_is_an_empty_path() {
        let empty = raw(0xffff, &[]);
        assert_eq!(empty.decode(), Err(PathError::Empty.into()));
    }

    #[test]
    fn final_position_never_reads_past_data() {
        // Start bit at position 15 reads a single byte
        let mut data = [0u8; DATA_LEN];
        data[15] = 9;
        let tail = raw(0xffff, &data);
        assert_eq!(tail.decode().unwrap(), p("9"));
    }

    #[test]
    fn view_in_place() {
        let bytes = p("7.800").to_bytes();
        let view = RawITree::ref_from_bytes(&bytes[..]).unwrap();
        assert_eq!(view.as_bytes(), &bytes[..]);
        assert_eq!(ITree::try_from(view).unwrap(), p("7.800"));
    }
}
