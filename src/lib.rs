//! # Dotted Integer Hierarchy Paths (itree)
//!
//! Provides [`ITree`], a hierarchical path of small positive integers such as
//! `1.2.300.4`, with a fixed 18-byte binary form matching the `itree`
//! database type and a prefix algebra (ancestry, slicing, concatenation).
//!
//! ## Design
//!
//! A path holds 1..=16 segments in `1..=65535`. Segments up to 255 pack into
//! one byte, larger ones into two, and the packed data must fit 16 bytes:
//!
//! ```text
//! ┌──────────────────┬──────────────────────────────────────────────┐
//! │ Control mask     │ Data region                                  │
//! │ 2 bytes (u16 BE) │ 16 bytes, 1 or 2 bytes per segment, 0-padded │
//! └──────────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! Each control bit marks whether the matching data byte starts a segment or
//! continues a two-byte one. See [`layout`] for details.
//!
//! ## Self-Contained Operations
//!
//! All operations are pure and work on the segment sequence:
//!
//! ```
//! use itree::{itree, ITree};
//!
//! let dept = itree!("1.2");
//! let team: ITree = "1.2.300".parse().unwrap();
//!
//! assert!(team.is_descendant_of(&dept));
//! assert_eq!(team.parent(), Some(dept));
//! assert_eq!(team.to_bytes()[..2], [0xefu8, 0xff]);
//! assert_eq!(ITree::from_bytes(&team.to_bytes()).unwrap(), team);
//! ```

pub mod adapter;
pub mod codec;
pub mod error;
pub mod layout;
pub mod path;
mod serde_impl;
pub mod traits;

pub use codec::RawITree;
pub use error::{EncodingError, ITreeError, PathError, Result};
pub use itree_macro::itree;
pub use layout::{ControlMask, DATA_LEN, ENCODED_LEN, MAX_SEGMENTS};
pub use path::{ITree, Segments};
pub use traits::{AsSegment, IntoPath};
