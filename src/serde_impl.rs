//! serde support: a path serializes as its canonical text.
//!
//! Deserialization accepts text (parsed) or the 18-byte binary form (decoded),
//! as native bytes or as a sequence of `u8`. Needs a self-describing format.

use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::layout::ENCODED_LEN;
use crate::path::ITree;

impl Serialize for ITree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct ITreeVisitor;

impl<'de> Visitor<'de> for ITreeVisitor {
    type Value = ITree;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a dotted itree path or its 18-byte encoding")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ITree, E> {
        ITree::parse(v).map_err(E::custom)
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<ITree, E> {
        ITree::from_bytes(v).map_err(E::custom)
    }

    /// Formats without a native bytes type write `[u8; 18]` as a sequence.
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ITree, A::Error> {
        let mut bytes = [0u8; ENCODED_LEN];
        let mut len = 0;
        while let Some(byte) = seq.next_element::<u8>()? {
            if len == ENCODED_LEN {
                return Err(de::Error::invalid_length(len + 1, &self));
            }
            bytes[len] = byte;
            len += 1;
        }
        ITree::from_bytes(&bytes[..len]).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for ITree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ITreeVisitor)
    }
}
