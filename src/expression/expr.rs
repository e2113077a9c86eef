//! Expression tree nodes.

use crate::expression::cast::{format_float, parse_leading_float, parse_leading_int};
use crate::expression::operator::Operator;
use crate::expression::types::ResultType;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Literal payload of a node. Which slot is meaningful is decided by the
/// node's [`ResultType`]; booleans are stored as `Int(0 | 1)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Payload {
    #[default]
    None,
    Int(i64),
    Float(f64),
    Text(String),
}

fn unchecked() -> ResultType {
    ResultType::Error
}

/// Expression tree node.
///
/// A node is either a literal (`operation == Operator::Constant`) or an
/// operator applied to `operands`. Operator nodes start out typed as
/// `ResultType::Error` until the checker assigns their real type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprNode {
    pub operation: Operator,
    #[serde(default = "unchecked")]
    pub result_type: ResultType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operands: Vec<ExprNode>,
    #[serde(default)]
    pub payload: Payload,
    #[serde(default)]
    pub is_null: bool,
}

impl ExprNode {
    /// Create a literal node
    pub fn literal(result_type: ResultType, payload: Payload) -> Self {
        Self {
            operation: Operator::Constant,
            result_type,
            operands: Vec::new(),
            payload,
            is_null: false,
        }
    }

    /// Create a NULL literal of the given type
    pub fn null(result_type: ResultType) -> Self {
        Self {
            is_null: true,
            ..Self::literal(result_type, Payload::None)
        }
    }

    pub fn integer(val: i64) -> Self {
        Self::literal(ResultType::Integer, Payload::Int(val))
    }

    pub fn float(val: f64) -> Self {
        Self::literal(ResultType::Float, Payload::Float(val))
    }

    pub fn boolean(val: bool) -> Self {
        Self::literal(ResultType::Boolean, Payload::Int(val as i64))
    }

    pub fn string(val: impl Into<String>) -> Self {
        Self::literal(ResultType::String, Payload::Text(val.into()))
    }

    pub fn date(val: impl Into<String>) -> Self {
        Self::literal(ResultType::Date, Payload::Text(val.into()))
    }

    pub fn time(val: impl Into<String>) -> Self {
        Self::literal(ResultType::Time, Payload::Text(val.into()))
    }

    pub fn timestamp(val: impl Into<String>) -> Self {
        Self::literal(ResultType::Timestamp, Payload::Text(val.into()))
    }

    /// Type-name operand of a CAST, e.g. `"integer"`
    pub fn type_name(name: impl Into<String>) -> Self {
        Self::string(name)
    }

    /// Create an unchecked operator node
    pub fn operation(op: Operator, operands: Vec<ExprNode>) -> Self {
        Self {
            operation: op,
            result_type: ResultType::Error,
            operands,
            payload: Payload::None,
            is_null: false,
        }
    }

    pub fn eq(left: ExprNode, right: ExprNode) -> Self {
        Self::operation(Operator::Eq, vec![left, right])
    }

    pub fn ne(left: ExprNode, right: ExprNode) -> Self {
        Self::operation(Operator::Ne, vec![left, right])
    }

    pub fn gt(left: ExprNode, right: ExprNode) -> Self {
        Self::operation(Operator::Gt, vec![left, right])
    }

    pub fn lt(left: ExprNode, right: ExprNode) -> Self {
        Self::operation(Operator::Lt, vec![left, right])
    }

    pub fn ge(left: ExprNode, right: ExprNode) -> Self {
        Self::operation(Operator::Ge, vec![left, right])
    }

    pub fn le(left: ExprNode, right: ExprNode) -> Self {
        Self::operation(Operator::Le, vec![left, right])
    }

    /// `probe IN (list...)`
    pub fn in_list(probe: ExprNode, list: Vec<ExprNode>) -> Self {
        let mut operands = Vec::with_capacity(list.len() + 1);
        operands.push(probe);
        operands.extend(list);
        Self::operation(Operator::In, operands)
    }

    /// `probe BETWEEN low AND high`, inclusive on both ends
    pub fn between(probe: ExprNode, low: ExprNode, high: ExprNode) -> Self {
        Self::operation(Operator::Between, vec![probe, low, high])
    }

    pub fn is_null(operand: ExprNode) -> Self {
        Self::operation(Operator::IsNull, vec![operand])
    }

    pub fn like(input: ExprNode, pattern: ExprNode) -> Self {
        Self::operation(Operator::Like, vec![input, pattern])
    }

    pub fn and(left: ExprNode, right: ExprNode) -> Self {
        Self::operation(Operator::And, vec![left, right])
    }

    pub fn or(left: ExprNode, right: ExprNode) -> Self {
        Self::operation(Operator::Or, vec![left, right])
    }

    pub fn not_expr(operand: ExprNode) -> Self {
        Self::operation(Operator::Not, vec![operand])
    }

    pub fn add_expr(left: ExprNode, right: ExprNode) -> Self {
        Self::operation(Operator::Add, vec![left, right])
    }

    pub fn sub_expr(left: ExprNode, right: ExprNode) -> Self {
        Self::operation(Operator::Subtract, vec![left, right])
    }

    pub fn mul_expr(left: ExprNode, right: ExprNode) -> Self {
        Self::operation(Operator::Multiply, vec![left, right])
    }

    pub fn div_expr(left: ExprNode, right: ExprNode) -> Self {
        Self::operation(Operator::Divide, vec![left, right])
    }

    pub fn mod_expr(left: ExprNode, right: ExprNode) -> Self {
        Self::operation(Operator::Modulus, vec![left, right])
    }

    pub fn concat(parts: Vec<ExprNode>) -> Self {
        Self::operation(Operator::Concat, parts)
    }

    /// `SUBSTR(source, offset [, length])` with a 0-based offset
    pub fn substr(source: ExprNode, offset: ExprNode, length: Option<ExprNode>) -> Self {
        let mut operands = vec![source, offset];
        operands.extend(length);
        Self::operation(Operator::Substr, operands)
    }

    /// `CAST(value AS target [(width)])`
    pub fn cast(value: ExprNode, target: &str, width: Option<i64>) -> Self {
        let mut operands = vec![value, Self::type_name(target)];
        operands.extend(width.map(Self::integer));
        Self::operation(Operator::Cast, operands)
    }

    /// Whether this node is already a literal
    pub fn is_constant(&self) -> bool {
        self.operation == Operator::Constant
    }

    /// Payload read as an integer; floats truncate toward zero.
    pub fn as_i64(&self) -> i64 {
        match &self.payload {
            Payload::None => 0,
            Payload::Int(i) => *i,
            Payload::Float(f) => *f as i64,
            Payload::Text(s) => parse_leading_int(s),
        }
    }

    /// Payload read as a double.
    pub fn as_f64(&self) -> f64 {
        match &self.payload {
            Payload::None => 0.0,
            Payload::Int(i) => *i as f64,
            Payload::Float(f) => *f,
            Payload::Text(s) => parse_leading_float(s),
        }
    }

    /// Payload rendered as text.
    pub fn text(&self) -> Cow<'_, str> {
        match &self.payload {
            Payload::None => Cow::Borrowed(""),
            Payload::Int(i) => Cow::Owned(i.to_string()),
            Payload::Float(f) => Cow::Owned(format_float(*f)),
            Payload::Text(s) => Cow::Borrowed(s),
        }
    }

    /// C-style truthiness of the payload
    pub fn truthy(&self) -> bool {
        match &self.payload {
            Payload::None => false,
            Payload::Int(i) => *i != 0,
            Payload::Float(f) => *f != 0.0,
            Payload::Text(s) => parse_leading_int(s) != 0,
        }
    }
}

impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_constant() {
            if self.is_null {
                return write!(f, "NULL");
            }
            return match (&self.payload, self.result_type) {
                (Payload::Int(i), ResultType::Boolean) => {
                    write!(f, "{}", if *i != 0 { "TRUE" } else { "FALSE" })
                }
                (Payload::Text(s), _) => write!(f, "'{}'", s),
                _ => write!(f, "{}", self.text()),
            };
        }

        write!(f, "{}(", self.operation.as_str())?;
        for (i, operand) in self.operands.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", operand)?;
        }
        write!(f, ")")
    }
}
