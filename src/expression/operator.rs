//! Operator definitions for expressions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operators understood by the checker and the evaluator.
///
/// `Constant` marks a literal leaf; every other variant is an operator node
/// whose operands live in [`ExprNode::operands`](crate::expression::ExprNode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Constant,

    // Comparison
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    In,
    Between,
    IsNull,
    Like,

    // Logical
    And,
    Or,
    Not,

    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,

    // String
    Concat,
    Substr,

    // Conversion
    Cast,
}

/// Number of operands an operator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::Range(min, max) => (min..=max).contains(&count),
            Arity::AtLeast(min) => count >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::Range(min, max) => write!(f, "{} to {}", min, max),
            Arity::AtLeast(min) => write!(f, "at least {}", min),
        }
    }
}

impl Operator {
    /// Operand count accepted by this operator
    pub fn arity(&self) -> Arity {
        match self {
            Operator::Constant => Arity::Exact(0),

            Operator::Not | Operator::IsNull => Arity::Exact(1),

            Operator::Eq
            | Operator::Ne
            | Operator::Gt
            | Operator::Lt
            | Operator::Ge
            | Operator::Le
            | Operator::Like
            | Operator::Subtract
            | Operator::Divide
            | Operator::Modulus => Arity::Exact(2),

            Operator::Between => Arity::Exact(3),

            Operator::In | Operator::And | Operator::Or | Operator::Add | Operator::Multiply => {
                Arity::AtLeast(2)
            }

            Operator::Concat => Arity::AtLeast(1),

            Operator::Substr | Operator::Cast => Arity::Range(2, 3),
        }
    }

    /// Whether the operator compares its operands (and so runs both promotions)
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::Eq
                | Operator::Ne
                | Operator::Gt
                | Operator::Lt
                | Operator::Ge
                | Operator::Le
                | Operator::In
                | Operator::Between
        )
    }

    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Constant => "CONSTANT",
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::In => "IN",
            Operator::Between => "BETWEEN",
            Operator::IsNull => "IS NULL",
            Operator::Like => "LIKE",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulus => "%",
            Operator::Concat => "||",
            Operator::Substr => "SUBSTR",
            Operator::Cast => "CAST",
        }
    }
}

/// Read-only source of operator display names used in diagnostics.
///
/// The operator registry belongs to the surrounding query layer; the checker
/// only borrows it to name operators in error messages.
pub trait OperatorCatalog {
    fn display_name(&self, op: Operator) -> String;
}

/// Catalog that names operators by their SQL spelling.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlCatalog;

impl OperatorCatalog for SqlCatalog {
    fn display_name(&self, op: Operator) -> String {
        op.as_str().to_string()
    }
}
