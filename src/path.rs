//! The path value — construction, validation and the path algebra.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Bound, RangeBounds};
use std::str::FromStr;

use crate::error::{ITreeError, PathError, Result};
use crate::layout::{packed_width, DATA_LEN, MAX_SEGMENTS};
use crate::traits::{AsSegment, IntoPath};

/// A dotted integer hierarchy path such as `1.2.300.4`.
///
/// Holds 1..=16 segments in `1..=65535` whose packed size fits the
/// 16-byte data region. Always valid once constructed; every operation
/// returns a new value.
///
/// Equality is textual, ordering is lexicographic over integer segments:
///
/// ```
/// use itree::ITree;
///
/// let a: ITree = "1.2.3".parse().unwrap();
/// let b: ITree = "1.2.10".parse().unwrap();
/// assert!(a < b); // "1.2.3" > "1.2.10" as text, but not as a path
/// assert_eq!(a, "1.2.3");
/// ```
#[derive(Clone, Copy)]
pub struct ITree {
    len: u8,
    /// Unused tail is always zero.
    segments: [u16; MAX_SEGMENTS],
}

impl ITree {
    /// Parse and validate path text.
    ///
    /// Surrounding whitespace is trimmed. The segment count is checked
    /// first; the rest is a single left-to-right pass, so the reported
    /// failure is the first offending segment.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PathError::Empty.into());
        }
        if text.split('.').count() > MAX_SEGMENTS {
            return Err(PathError::TooManySegments.into());
        }

        let mut builder = Builder::new();
        for (position, part) in text.split('.').enumerate() {
            builder.check_count(position)?;
            if part.is_empty() {
                return Err(PathError::EmptySegment { position }.into());
            }
            let value = parse_segment(part)?;
            builder.push(position, value)?;
        }
        Ok(builder.finish())
    }

    /// Validate a segment list.
    ///
    /// Applies the same rules as [`ITree::parse`] over integers.
    pub fn from_segments(segments: &[u16]) -> Result<Self> {
        if segments.is_empty() {
            return Err(PathError::Empty.into());
        }
        if segments.len() > MAX_SEGMENTS {
            return Err(PathError::TooManySegments.into());
        }

        let mut builder = Builder::new();
        for (position, &value) in segments.iter().enumerate() {
            builder.check_count(position)?;
            if value == 0 {
                return Err(PathError::SegmentOutOfRange {
                    segment: value.to_string(),
                }
                .into());
            }
            builder.push(position, value)?;
        }
        Ok(builder.finish())
    }

    /// Build from segments already checked at compile time by `itree!`.
    #[doc(hidden)]
    pub const fn __from_validated(segments: &[u16]) -> Self {
        assert!(
            !segments.is_empty() && segments.len() <= MAX_SEGMENTS,
            "segment count out of range"
        );
        let mut out = [0u16; MAX_SEGMENTS];
        let mut i = 0;
        while i < segments.len() {
            assert!(segments[i] != 0, "segment 0 is reserved for padding");
            out[i] = segments[i];
            i += 1;
        }
        assert!(
            crate::layout::packed_len(segments) <= DATA_LEN,
            "path exceeds the 16-byte budget"
        );
        Self {
            len: segments.len() as u8,
            segments: out,
        }
    }

    /// Number of segments (always at least 1).
    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Always `false`: a path has at least one segment.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Depth in the hierarchy, `0` for a single-segment path.
    #[inline]
    pub const fn depth(&self) -> usize {
        self.len() - 1
    }

    #[inline]
    pub fn as_slice(&self) -> &[u16] {
        &self.segments[..self.len()]
    }

    /// Data bytes the binary form uses.
    #[inline]
    pub const fn packed_len(&self) -> usize {
        crate::layout::packed_len(self.segments.split_at(self.len()).0)
    }

    /// Raw segment value at `index`.
    #[inline]
    pub fn segment(&self, index: usize) -> Option<u16> {
        self.as_slice().get(index).copied()
    }

    /// Single-segment path at `index`.
    pub fn get(&self, index: usize) -> Result<Self> {
        let value = self.segment(index).ok_or(ITreeError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;
        Ok(Self::single(value))
    }

    /// Contiguous sub-path.
    ///
    /// Bounds past the end are clamped. An empty selection is not a path.
    ///
    /// ```
    /// use itree::ITree;
    ///
    /// let path: ITree = "1.2.3.4.5.6".parse().unwrap();
    /// assert_eq!(path.slice(2..4).unwrap(), "3.4");
    /// assert_eq!(path.slice(..100).unwrap(), path);
    /// assert!(path.slice(4..4).is_err());
    /// ```
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Result<Self> {
        let len = self.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .min(len);

        if start >= end {
            return Err(PathError::Empty.into());
        }
        Ok(self.prefix_unchecked(end).suffix_from(start))
    }

    /// Append `other`'s segments after this path's.
    ///
    /// Fails exactly as construction would when the result is too long.
    pub fn concat(&self, other: impl IntoPath) -> Result<Self> {
        let other = other.into_path()?;
        let mut joined = [0u16; MAX_SEGMENTS * 2];
        joined[..self.len()].copy_from_slice(self.as_slice());
        joined[self.len()..self.len() + other.len()].copy_from_slice(other.as_slice());
        Self::from_segments(&joined[..self.len() + other.len()])
    }

    /// Lexicographic comparison over integer segments.
    #[inline]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }

    /// Whole-segment membership.
    ///
    /// ```
    /// use itree::ITree;
    ///
    /// let path: ITree = "1.2.3".parse().unwrap();
    /// assert!(path.contains(2));
    /// assert!(path.contains("3"));
    /// assert!(!path.contains("7"));
    /// assert!(!path.contains("1.2"));
    /// ```
    pub fn contains(&self, segment: impl AsSegment) -> bool {
        segment
            .as_segment()
            .is_some_and(|value| self.as_slice().contains(&value))
    }

    /// Position of the first contiguous occurrence of `subpath`.
    pub fn index_of(&self, subpath: impl IntoPath) -> Result<usize> {
        let needle = subpath.into_path()?;
        self.as_slice()
            .windows(needle.len())
            .position(|window| window == needle.as_slice())
            .ok_or_else(|| ITreeError::not_found(needle.to_string()))
    }

    /// Is this path `ancestor` or below it?
    #[inline]
    pub fn is_descendant_of(&self, ancestor: &Self) -> bool {
        self.as_slice().starts_with(ancestor.as_slice())
    }

    /// Is this path `descendant` or above it?
    #[inline]
    pub fn is_ancestor_of(&self, descendant: &Self) -> bool {
        descendant.is_descendant_of(self)
    }

    /// [`ITree::is_descendant_of`] with a text or path operand.
    ///
    /// Fails only when the operand is not a valid path.
    pub fn descendant_of(&self, ancestor: impl IntoPath) -> Result<bool> {
        Ok(self.is_descendant_of(&ancestor.into_path()?))
    }

    /// [`ITree::is_ancestor_of`] with a text or path operand.
    pub fn ancestor_of(&self, descendant: impl IntoPath) -> Result<bool> {
        Ok(self.is_ancestor_of(&descendant.into_path()?))
    }

    /// The path without its last segment, `None` at the top level.
    pub fn parent(&self) -> Option<Self> {
        (self.len() > 1).then(|| self.prefix_unchecked(self.len() - 1))
    }

    /// Every prefix of this path, shortest first, ending with the path itself.
    ///
    /// ```
    /// use itree::ITree;
    ///
    /// let path: ITree = "1.2.3".parse().unwrap();
    /// let prefixes: Vec<String> = path.ancestors().map(|p| p.to_string()).collect();
    /// assert_eq!(prefixes, ["1", "1.2", "1.2.3"]);
    /// ```
    pub fn ancestors(&self) -> impl Iterator<Item = Self> + '_ {
        (1..=self.len()).map(move |len| self.prefix_unchecked(len))
    }

    /// Segment values in order.
    #[inline]
    pub fn iter(&self) -> Segments<'_> {
        self.as_slice().iter().copied()
    }

    #[inline]
    const fn single(value: u16) -> Self {
        let mut segments = [0u16; MAX_SEGMENTS];
        segments[0] = value;
        Self { len: 1, segments }
    }

    /// First `len` segments; `1 <= len <= self.len()`.
    fn prefix_unchecked(&self, len: usize) -> Self {
        debug_assert!(len >= 1 && len <= self.len());
        let mut segments = [0u16; MAX_SEGMENTS];
        segments[..len].copy_from_slice(&self.segments[..len]);
        Self {
            len: len as u8,
            segments,
        }
    }

    /// Segments from `start` onwards; `start < self.len()`.
    fn suffix_from(&self, start: usize) -> Self {
        debug_assert!(start < self.len());
        let len = self.len() - start;
        let mut segments = [0u16; MAX_SEGMENTS];
        segments[..len].copy_from_slice(&self.segments[start..self.len()]);
        Self {
            len: len as u8,
            segments,
        }
    }
}

/// Iterator over segment values.
pub type Segments<'a> = std::iter::Copied<std::slice::Iter<'a, u16>>;

/// Single-pass accumulator enforcing the count and byte-budget invariants.
struct Builder {
    len: usize,
    bytes: usize,
    segments: [u16; MAX_SEGMENTS],
}

impl Builder {
    const fn new() -> Self {
        Self {
            len: 0,
            bytes: 0,
            segments: [0; MAX_SEGMENTS],
        }
    }

    #[inline]
    fn check_count(&self, position: usize) -> Result<()> {
        if position >= MAX_SEGMENTS {
            return Err(PathError::TooManySegments.into());
        }
        Ok(())
    }

    fn push(&mut self, position: usize, value: u16) -> Result<()> {
        self.bytes += packed_width(value);
        if self.bytes > DATA_LEN {
            return Err(PathError::ByteBudgetExceeded { position }.into());
        }
        self.segments[self.len] = value;
        self.len += 1;
        Ok(())
    }

    fn finish(self) -> ITree {
        ITree {
            len: self.len as u8,
            segments: self.segments,
        }
    }
}

fn parse_segment(part: &str) -> Result<u16> {
    use std::num::IntErrorKind;

    let value: i64 = part.parse().map_err(|e: std::num::ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => PathError::SegmentOutOfRange {
            segment: part.to_string(),
        },
        _ => PathError::NotAnInteger {
            segment: part.to_string(),
        },
    })?;

    match u16::try_from(value) {
        Ok(v) if v != 0 => Ok(v),
        _ => Err(PathError::SegmentOutOfRange {
            segment: part.to_string(),
        }
        .into()),
    }
}

// =============================================================================
// Standard trait impls
// =============================================================================

impl PartialEq for ITree {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for ITree {}

impl PartialEq<str> for ITree {
    /// Compares the canonical text with `other` verbatim.
    fn eq(&self, other: &str) -> bool {
        let mut parts = other.split('.');
        let mut buf = [0u8; 5];
        for value in self.iter() {
            match parts.next() {
                Some(part) if part.as_bytes() == format_segment(value, &mut buf) => {}
                _ => return false,
            }
        }
        parts.next().is_none()
    }
}

impl PartialEq<&str> for ITree {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}

impl PartialEq<String> for ITree {
    #[inline]
    fn eq(&self, other: &String) -> bool {
        *self == *other.as_str()
    }
}

impl PartialEq<ITree> for &str {
    #[inline]
    fn eq(&self, other: &ITree) -> bool {
        other == self
    }
}

impl PartialEq<ITree> for String {
    #[inline]
    fn eq(&self, other: &ITree) -> bool {
        other == self
    }
}

impl PartialOrd for ITree {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ITree {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for ITree {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

/// Render `value` in base 10 into `buf`, returning the used tail.
fn format_segment(mut value: u16, buf: &mut [u8; 5]) -> &[u8] {
    let mut start = buf.len();
    loop {
        start -= 1;
        buf[start] = b'0' + (value % 10) as u8;
        value /= 10;
        if value == 0 {
            break;
        }
    }
    &buf[start..]
}

impl fmt::Display for ITree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ITree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ITree(\"{}\")", self)
    }
}

impl FromStr for ITree {
    type Err = ITreeError;

    #[inline]
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for ITree {
    type Error = ITreeError;

    #[inline]
    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ITree {
    type Error = ITreeError;

    #[inline]
    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl TryFrom<&[u16]> for ITree {
    type Error = ITreeError;

    #[inline]
    fn try_from(segments: &[u16]) -> Result<Self> {
        Self::from_segments(segments)
    }
}

impl From<ITree> for String {
    fn from(path: ITree) -> Self {
        path.to_string()
    }
}

impl<'a> IntoIterator for &'a ITree {
    type Item = u16;
    type IntoIter = Segments<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
