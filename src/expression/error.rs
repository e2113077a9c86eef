//! Error types for expression checking and evaluation.

use crate::expression::types::ResultType;
use thiserror::Error;

/// Errors that can occur while checking or evaluating an expression node.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// Wrong number of operands for an operator
    #[error("Operator {operator} expects {expected} operands, got {actual}")]
    ArityMismatch {
        operator: String,
        expected: String,
        actual: usize,
    },

    /// Operand type disagrees with the operator's argument class
    #[error("Type mismatch for operator {operator}: expected {expected}, got {actual}")]
    TypeMismatch {
        operator: String,
        expected: ResultType,
        actual: ResultType,
    },

    /// CAST target type name is not recognized
    #[error("Unknown CAST target type: {name}")]
    UnknownCastTarget { name: String },

    /// Operator has no case in the table it was dispatched to.
    ///
    /// The checker rejects such nodes, so reaching this is an internal fault.
    #[error("Unsupported operator {operator} for {class} operands")]
    UnsupportedOperator { operator: String, class: String },

    /// An operand already failed checking
    #[error("Operand {index} of operator {operator} failed type checking")]
    OperandFailed { operator: String, index: usize },

    /// Evaluation reached a node the checker never typed
    #[error("Operator {operator} was evaluated before being type checked")]
    Unchecked { operator: String },

    /// Evaluation input is not a literal
    #[error("Operand {index} of operator {operator} is not a literal")]
    NotALiteral { operator: String, index: usize },

    /// Division by zero under strict division
    #[error("Division by zero")]
    DivisionByZero,
}

impl ExpressionError {
    /// True for faults that indicate a checker/evaluator disagreement rather
    /// than a problem with the user's expression.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ExpressionError::UnsupportedOperator { .. }
                | ExpressionError::Unchecked { .. }
                | ExpressionError::NotALiteral { .. }
        )
    }
}

/// Result type for expression operations
pub type ExpressionResult<T> = Result<T, ExpressionError>;
