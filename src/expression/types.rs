//! Result types carried by expression nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag of an expression node.
///
/// `Error` is not a real SQL type: the checker stores it on a node whose
/// checking failed so that ancestors stop inspecting the subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Integer,
    Float,
    String,
    Boolean,
    Date,
    Time,
    Timestamp,
    Error,
}

impl ResultType {
    /// Integer or float.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ResultType::Integer | ResultType::Float)
    }

    /// Date, time or timestamp.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            ResultType::Date | ResultType::Time | ResultType::Timestamp
        )
    }

    /// Argument-class compatibility used by the checker.
    ///
    /// Types must match exactly, except that `Integer` and `Float` are
    /// interchangeable.
    pub fn is_compatible_with(&self, other: ResultType) -> bool {
        *self == other || (self.is_numeric() && other.is_numeric())
    }

    /// Resolve a CAST target type name.
    pub fn from_cast_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let known = [
            ("character", ResultType::String),
            ("integer", ResultType::Integer),
            ("float", ResultType::Float),
            ("numeric", ResultType::Float),
            ("timestamp", ResultType::Timestamp),
            ("date", ResultType::Date),
            ("time", ResultType::Time),
        ];
        known
            .iter()
            .find(|(known_name, _)| known_name.eq_ignore_ascii_case(name))
            .map(|(_, ty)| *ty)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultType::Integer => "integer",
            ResultType::Float => "float",
            ResultType::String => "character",
            ResultType::Boolean => "boolean",
            ResultType::Date => "date",
            ResultType::Time => "time",
            ResultType::Timestamp => "timestamp",
            ResultType::Error => "error",
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
