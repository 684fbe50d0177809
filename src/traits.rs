//! Conversion traits accepted by the path algebra.

use crate::error::Result;
use crate::path::ITree;

/// Anything that can stand in for a path operand: an existing [`ITree`] or path text.
///
/// Text operands are validated; existing paths are copied as-is.
///
/// ```
/// use itree::ITree;
///
/// let base: ITree = "1.2".parse().unwrap();
/// assert_eq!(base.concat("3").unwrap(), "1.2.3");
/// assert_eq!(base.concat(base).unwrap(), "1.2.1.2");
/// ```
pub trait IntoPath {
    fn into_path(self) -> Result<ITree>;
}

impl IntoPath for ITree {
    #[inline]
    fn into_path(self) -> Result<ITree> {
        Ok(self)
    }
}

impl IntoPath for &ITree {
    #[inline]
    fn into_path(self) -> Result<ITree> {
        Ok(*self)
    }
}

impl IntoPath for &str {
    #[inline]
    fn into_path(self) -> Result<ITree> {
        ITree::parse(self)
    }
}

impl IntoPath for String {
    #[inline]
    fn into_path(self) -> Result<ITree> {
        ITree::parse(&self)
    }
}

impl IntoPath for &String {
    #[inline]
    fn into_path(self) -> Result<ITree> {
        ITree::parse(self)
    }
}

/// A probe for whole-segment membership.
///
/// Integers match by value. Text matches only the canonical decimal form,
/// so `"02"` and `"+2"` never match segment `2`.
pub trait AsSegment {
    /// The segment value this probe stands for, or `None` if it cannot be one.
    fn as_segment(&self) -> Option<u16>;
}

macro_rules! impl_as_segment_int {
    ($($ty:ty),*) => {
        $(
            impl AsSegment for $ty {
                #[inline]
                fn as_segment(&self) -> Option<u16> {
                    u16::try_from(*self).ok()
                }
            }
        )*
    };
}

impl_as_segment_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl AsSegment for str {
    fn as_segment(&self) -> Option<u16> {
        if self.starts_with('0') || !self.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.parse().ok()
    }
}

impl AsSegment for &str {
    #[inline]
    fn as_segment(&self) -> Option<u16> {
        (**self).as_segment()
    }
}

impl AsSegment for String {
    #[inline]
    fn as_segment(&self) -> Option<u16> {
        self.as_str().as_segment()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_probes() {
        assert_eq!(2u8.as_segment(), Some(2));
        assert_eq!(2i32.as_segment(), Some(2));
        assert_eq!((-2i32).as_segment(), None);
        assert_eq!(70_000u32.as_segment(), None);
    }

    #[test]
    fn text_probes_are_canonical_only() {
        assert_eq!("2".as_segment(), Some(2));
        assert_eq!("65535".as_segment(), Some(65535));
        assert_eq!("02".as_segment(), None);
        assert_eq!("+2".as_segment(), None);
        assert_eq!(" 2".as_segment(), None);
        assert_eq!("".as_segment(), None);
        assert_eq!("65536".as_segment(), None);
    }

    #[test]
    fn text_operands_are_validated() {
        assert!("1.2".into_path().is_ok());
        assert!("1..2".into_path().is_err());
        assert!(String::from("7").into_path().is_ok());
    }
}
