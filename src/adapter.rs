//! Database adapter contracts.
//!
//! Provides what a driver or query builder needs to carry `itree` columns,
//! without depending on any particular driver:
//!
//! - [`SqlValue`] — values going to and coming from the database
//! - [`Containment`] — the `<@` / `@>` operators over one path or a set of paths
//! - [`ColumnType`] — the `ITREE(n)` column type and its level limit
//!
//! # Example
//!
//! ```
//! use itree::adapter::{Containment, SqlValue};
//! use itree::ITree;
//!
//! let root = ITree::parse("1.2").unwrap();
//! let query = Containment::contained_by(root);
//! assert_eq!(query.to_sql("node.path"), "node.path <@ '1.2'");
//!
//! let row = ITree::from_sql(&SqlValue::Text("1.2.7".into())).unwrap().unwrap();
//! assert!(query.matches(&row));
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ITreeError, PathError, Result};
use crate::layout::MAX_SEGMENTS;
use crate::path::ITree;

/// Name of the database type.
pub const TYPE_NAME: &str = "ITREE";

// =============================================================================
// Values
// =============================================================================

/// A database value as seen by the adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Text(String),
    /// Binary wire form of the extension type.
    Bytes(Vec<u8>),
    Int(i64),
    Bool(bool),
}

impl SqlValue {
    /// Short name of the value kind, for error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Int(_) => "integer",
            Self::Bool(_) => "boolean",
        }
    }
}

impl ITree {
    /// Build a path from a database value.
    ///
    /// `NULL`, empty text and empty bytes map to `None`. Text is parsed,
    /// bytes are decoded, anything else is a [`ITreeError::TypeMismatch`].
    pub fn from_sql(value: &SqlValue) -> Result<Option<Self>> {
        let path = match value {
            SqlValue::Null => return Ok(None),
            SqlValue::Text(text) if text.is_empty() => return Ok(None),
            SqlValue::Bytes(bytes) if bytes.is_empty() => return Ok(None),
            SqlValue::Text(text) => Self::parse(text),
            SqlValue::Bytes(bytes) => Self::from_bytes(bytes),
            other => Err(ITreeError::type_mismatch(other.kind())),
        };
        path.map(Some).inspect_err(|e| {
            debug!(kind = value.kind(), error = %e, "itree: rejected database value");
        })
    }

    /// The bind parameter for an optional path.
    pub fn to_sql(path: Option<&Self>) -> SqlValue {
        path.map_or(SqlValue::Null, |p| SqlValue::Text(p.to_string()))
    }

    /// Quoted SQL literal, e.g. `'1.2.3'`.
    pub fn to_sql_literal(&self) -> String {
        quote_literal(&self.to_string())
    }
}

fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

// =============================================================================
// Containment operators
// =============================================================================

/// The two containment operators of the database type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainmentOp {
    /// `left <@ right`: left is a descendant of (or equal to) right.
    IsContainedBy,
    /// `left @> right`: left is an ancestor of (or equal to) right.
    IsContainerOf,
}

impl ContainmentOp {
    pub const fn sql_operator(self) -> &'static str {
        match self {
            Self::IsContainedBy => "<@",
            Self::IsContainerOf => "@>",
        }
    }

    /// Evaluate `left <op> right` in memory.
    #[inline]
    pub fn evaluate(self, left: &ITree, right: &ITree) -> bool {
        match self {
            Self::IsContainedBy => left.is_descendant_of(right),
            Self::IsContainerOf => left.is_ancestor_of(right),
        }
    }
}

/// Right-hand side of a containment test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    One(ITree),
    /// Matches if any element matches.
    Many(Vec<ITree>),
}

impl From<ITree> for Operand {
    fn from(path: ITree) -> Self {
        Self::One(path)
    }
}

impl From<&ITree> for Operand {
    fn from(path: &ITree) -> Self {
        Self::One(*path)
    }
}

impl From<Vec<ITree>> for Operand {
    fn from(paths: Vec<ITree>) -> Self {
        Self::Many(paths)
    }
}

impl From<&[ITree]> for Operand {
    fn from(paths: &[ITree]) -> Self {
        Self::Many(paths.to_vec())
    }
}

/// A containment test against a column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Containment {
    op: ContainmentOp,
    operand: Operand,
}

impl Containment {
    /// Column values at or below `operand`.
    pub fn contained_by(operand: impl Into<Operand>) -> Self {
        Self {
            op: ContainmentOp::IsContainedBy,
            operand: operand.into(),
        }
    }

    /// Column values at or above `operand`.
    pub fn container_of(operand: impl Into<Operand>) -> Self {
        Self {
            op: ContainmentOp::IsContainerOf,
            operand: operand.into(),
        }
    }

    #[inline]
    pub fn op(&self) -> ContainmentOp {
        self.op
    }

    #[inline]
    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// Would a row holding `value` satisfy this test?
    pub fn matches(&self, value: &ITree) -> bool {
        match &self.operand {
            Operand::One(path) => self.op.evaluate(value, path),
            Operand::Many(paths) => paths.iter().any(|path| self.op.evaluate(value, path)),
        }
    }

    /// Render as a SQL predicate on `column`.
    ///
    /// A set renders as an array cast to the type's array form.
    pub fn to_sql(&self, column: &str) -> String {
        let rhs = match &self.operand {
            Operand::One(path) => path.to_sql_literal(),
            Operand::Many(paths) => {
                let items: Vec<String> = paths.iter().map(ITree::to_sql_literal).collect();
                format!("CAST(ARRAY[{}] AS {}[])", items.join(", "), TYPE_NAME)
            }
        };
        format!("{} {} {}", column, self.op.sql_operator(), rhs)
    }
}

// =============================================================================
// Column type
// =============================================================================

/// The `ITREE` column type with its optional level limit (type modifier).
///
/// Loadable from configuration:
///
/// ```
/// use itree::adapter::ColumnType;
///
/// let column: ColumnType = serde_json::from_str(r#"{"max_levels": 8}"#).unwrap();
/// assert_eq!(column.sql_type(), "ITREE(8)");
/// assert!(serde_json::from_str::<ColumnType>(r#"{"max_levels": 17}"#).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawColumnType")]
pub struct ColumnType {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_levels: Option<u8>,
}

/// Unvalidated configuration form.
#[derive(Debug, Deserialize)]
struct RawColumnType {
    #[serde(default)]
    max_levels: Option<u8>,
}

impl TryFrom<RawColumnType> for ColumnType {
    type Error = ITreeError;

    fn try_from(raw: RawColumnType) -> Result<Self> {
        match raw.max_levels {
            None => Ok(Self::unbounded()),
            Some(levels) => Self::with_max_levels(levels),
        }
    }
}

impl ColumnType {
    /// No level limit beyond the type's own 16 segments.
    pub const fn unbounded() -> Self {
        Self { max_levels: None }
    }

    pub fn with_max_levels(max_levels: u8) -> Result<Self> {
        if max_levels == 0 || max_levels as usize > MAX_SEGMENTS {
            return Err(PathError::InvalidTypmod(max_levels.to_string()).into());
        }
        Ok(Self {
            max_levels: Some(max_levels),
        })
    }

    /// Parse a type modifier such as the `8` in `ITREE(8)`.
    ///
    /// An empty modifier means no limit.
    pub fn from_typmod(typmod: &str) -> Result<Self> {
        let typmod = typmod.trim();
        if typmod.is_empty() {
            return Ok(Self::unbounded());
        }
        let levels: u8 = typmod
            .parse()
            .map_err(|_| PathError::InvalidTypmod(typmod.to_string()))?;
        Self::with_max_levels(levels)
    }

    /// The type modifier as text, empty when unset.
    pub fn typmod_out(&self) -> String {
        self.max_levels.map(|l| l.to_string()).unwrap_or_default()
    }

    #[inline]
    pub fn max_levels(&self) -> Option<u8> {
        self.max_levels
    }

    /// Full SQL type, e.g. `ITREE` or `ITREE(8)`.
    pub fn sql_type(&self) -> String {
        match self.max_levels {
            None => TYPE_NAME.to_string(),
            Some(levels) => format!("{}({})", TYPE_NAME, levels),
        }
    }

    /// Reject paths deeper than the column allows.
    pub fn check(&self, path: &ITree) -> Result<()> {
        match self.max_levels {
            Some(max_levels) if path.len() > max_levels as usize => Err(PathError::TooManyLevels {
                levels: path.len(),
                max_levels,
            }
            .into()),
            _ => Ok(()),
        }
    }

    /// [`ITree::from_sql`] followed by [`ColumnType::check`].
    pub fn coerce(&self, value: &SqlValue) -> Result<Option<ITree>> {
        let path = ITree::from_sql(value)?;
        if let Some(path) = &path {
            self.check(path)?;
        }
        Ok(path)
    }
}
