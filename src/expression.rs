//! Typed expression checking and evaluation for filter predicates.
//!
//! This module provides:
//! - Expression tree nodes and literal payloads
//! - Numeric and temporal operand promotion
//! - Type checking with arity and argument-class validation
//! - Evaluation of operator nodes over literal operands
//! - LIKE pattern matching and CAST conversion

pub mod cast;
pub mod error;
pub mod eval;
pub mod expr;
pub mod like;
pub mod operator;
pub mod promotion;
pub mod type_checker;
pub mod types;

pub use cast::cast_value;
pub use error::{ExpressionError, ExpressionResult};
pub use eval::{evaluate_expression, ExpressionEvaluator, TypeClass};
pub use expr::{ExprNode, Payload};
pub use like::like_match;
pub use operator::{Arity, Operator, OperatorCatalog, SqlCatalog};
pub use promotion::{promote_int_to_float, promote_string_to_datetime};
pub use type_checker::{type_check_expression, validate_filter_predicate, TypeChecker};
pub use types::ResultType;
