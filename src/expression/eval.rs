//! Expression evaluation implementation.
//!
//! Evaluation folds an operator node whose operands are already literals
//! into a new literal. Dispatch happens in two steps: the concrete operand
//! values pick a class table (float, integer/boolean or string), then the
//! operator picks the case within that table.

use crate::config::{DivisionMode, EvalConfig, DIVISION_BY_ZERO_SENTINEL};
use crate::expression::cast::cast_value;
use crate::expression::like::like_match;
use crate::expression::{
    ExprNode, ExpressionError, ExpressionResult, Operator, Payload, ResultType,
};
use log::{error, trace};
use std::cmp::Ordering;
use std::fmt;

/// Length used by SUBSTR when no length operand is given.
const SUBSTR_DEFAULT_LENGTH: i64 = 100_000;

/// Evaluation table selected from the operand values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    Float,
    IntBool,
    String,
}

impl TypeClass {
    /// Pick the class table from the first two operand values.
    pub fn of(operands: &[ExprNode]) -> Self {
        let first = operands.first().map(|operand| operand.result_type);
        let second = operands.get(1).map(|operand| operand.result_type);

        if first == Some(ResultType::Float) || second == Some(ResultType::Float) {
            TypeClass::Float
        } else if matches!(first, Some(ResultType::Integer) | Some(ResultType::Boolean)) {
            TypeClass::IntBool
        } else {
            TypeClass::String
        }
    }
}

impl fmt::Display for TypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeClass::Float => "float",
            TypeClass::IntBool => "integer/boolean",
            TypeClass::String => "string",
        })
    }
}

/// Evaluator for expression nodes
#[derive(Debug, Clone, Default)]
pub struct ExpressionEvaluator {
    config: EvalConfig,
}

impl ExpressionEvaluator {
    /// Create a new evaluator with the default (sentinel) division mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new evaluator with the given configuration
    pub fn with_config(config: EvalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluate `node` given its already evaluated operand literals.
    ///
    /// `operands[i]` stands in for `node.operands[i]`. The node itself is not
    /// modified; a fresh literal is returned.
    pub fn evaluate(&self, node: &ExprNode, operands: &[ExprNode]) -> ExpressionResult<ExprNode> {
        let op = node.operation;
        if op == Operator::Constant {
            return Ok(node.clone());
        }
        if node.result_type == ResultType::Error {
            return Err(ExpressionError::Unchecked {
                operator: op.as_str().to_string(),
            });
        }

        let arity = op.arity();
        if !arity.accepts(operands.len()) {
            return Err(ExpressionError::ArityMismatch {
                operator: op.as_str().to_string(),
                expected: arity.to_string(),
                actual: operands.len(),
            });
        }
        if let Some(index) = operands.iter().position(|operand| !operand.is_constant()) {
            return Err(ExpressionError::NotALiteral {
                operator: op.as_str().to_string(),
                index,
            });
        }

        trace!("evaluating {} over {} operand(s)", op.as_str(), operands.len());

        if op == Operator::Cast {
            let width = operands.get(2).map(ExprNode::as_i64);
            return Ok(cast_value(&operands[0], node.result_type, width));
        }

        let class = TypeClass::of(operands);
        let result = match class {
            TypeClass::Float => self.evaluate_float(op, operands),
            TypeClass::IntBool => self.evaluate_int(op, operands),
            TypeClass::String => self.evaluate_string(op, operands),
        };

        if let Err(ExpressionError::UnsupportedOperator { .. }) = &result {
            error!(
                "internal fault: {} reached the {} evaluation table",
                op.as_str(),
                class
            );
        }
        result.map(|computed| computed.into_literal(node.result_type))
    }

    /// Evaluate a whole tree bottom-up and return its literal value.
    ///
    /// The tree must have been type checked.
    pub fn fold(&self, node: &ExprNode) -> ExpressionResult<ExprNode> {
        if node.is_constant() {
            return Ok(node.clone());
        }

        let operands = node
            .operands
            .iter()
            .map(|operand| self.fold(operand))
            .collect::<ExpressionResult<Vec<_>>>()?;

        self.evaluate(node, &operands)
    }

    fn evaluate_float(&self, op: Operator, operands: &[ExprNode]) -> ExpressionResult<Computed> {
        let value = |i: usize| operands[i].as_f64();
        let compare = |ordering_ok: fn(Ordering) -> bool| {
            Value::Bool(
                !any_null(&operands[..2])
                    && value(0).partial_cmp(&value(1)).map_or(false, ordering_ok),
            )
        };

        let result = match op {
            Operator::Eq => Value::Bool(!any_null(operands) && value(0) == value(1)),
            Operator::Ne => Value::Bool(!any_null(operands) && value(0) != value(1)),
            Operator::Gt => compare(Ordering::is_gt),
            Operator::Lt => compare(Ordering::is_lt),
            Operator::Ge => compare(Ordering::is_ge),
            Operator::Le => compare(Ordering::is_le),
            Operator::In => Value::Bool(
                !operands[0].is_null
                    && operands[1..]
                        .iter()
                        .any(|candidate| !candidate.is_null && candidate.as_f64() == value(0)),
            ),
            Operator::Between => Value::Bool(
                !any_null(operands) && value(1) <= value(0) && value(0) <= value(2),
            ),
            Operator::IsNull => Value::Bool(operands[0].is_null),

            Operator::And => Value::Bool(operands.iter().all(ExprNode::truthy)),
            Operator::Or => Value::Bool(operands.iter().any(ExprNode::truthy)),
            Operator::Not => Value::Bool(!operands[0].truthy()),

            Operator::Add | Operator::Subtract | Operator::Multiply | Operator::Divide
                if any_null(operands) =>
            {
                Value::Null
            }
            Operator::Add => Value::Float(operands.iter().map(ExprNode::as_f64).sum()),
            Operator::Subtract => Value::Float(value(0) - value(1)),
            Operator::Multiply => Value::Float(operands.iter().map(ExprNode::as_f64).product()),
            Operator::Divide => {
                if value(1) == 0.0 {
                    Value::Float(self.division_by_zero()? as f64)
                } else {
                    Value::Float(value(0) / value(1))
                }
            }
            Operator::Modulus => {
                if any_null(operands) {
                    return Ok(Value::Null.with_type(ResultType::Integer));
                }
                let divisor = operands[1].as_i64();
                let remainder = if divisor == 0 {
                    self.division_by_zero()?
                } else {
                    operands[0].as_i64().wrapping_rem(divisor)
                };
                return Ok(Value::Int(remainder).with_type(ResultType::Integer));
            }

            Operator::Constant
            | Operator::Like
            | Operator::Concat
            | Operator::Substr
            | Operator::Cast => {
                return Err(unsupported(op, TypeClass::Float));
            }
        };

        Ok(result.declared())
    }

    fn evaluate_int(&self, op: Operator, operands: &[ExprNode]) -> ExpressionResult<Computed> {
        let value = |i: usize| operands[i].as_i64();
        let compare = |ordering_ok: fn(Ordering) -> bool| {
            Value::Bool(!any_null(&operands[..2]) && ordering_ok(value(0).cmp(&value(1))))
        };

        let result = match op {
            Operator::And => Value::Bool(operands.iter().all(ExprNode::truthy)),
            Operator::Or => Value::Bool(operands.iter().any(ExprNode::truthy)),
            Operator::Not => Value::Bool(!operands[0].truthy()),

            Operator::Eq => compare(Ordering::is_eq),
            Operator::Ne => compare(Ordering::is_ne),
            Operator::Gt => compare(Ordering::is_gt),
            Operator::Lt => compare(Ordering::is_lt),
            Operator::Ge => compare(Ordering::is_ge),
            Operator::Le => compare(Ordering::is_le),
            Operator::In => Value::Bool(
                !operands[0].is_null
                    && operands[1..]
                        .iter()
                        .any(|candidate| !candidate.is_null && candidate.as_i64() == value(0)),
            ),
            Operator::Between => Value::Bool(
                !any_null(operands) && value(1) <= value(0) && value(0) <= value(2),
            ),
            Operator::IsNull => Value::Bool(operands[0].is_null),

            Operator::Add
            | Operator::Subtract
            | Operator::Multiply
            | Operator::Divide
            | Operator::Modulus
                if any_null(operands) =>
            {
                Value::Null
            }
            Operator::Add => Value::Int(
                operands
                    .iter()
                    .map(ExprNode::as_i64)
                    .fold(0, i64::wrapping_add),
            ),
            Operator::Subtract => Value::Int(value(0).wrapping_sub(value(1))),
            Operator::Multiply => Value::Int(
                operands
                    .iter()
                    .map(ExprNode::as_i64)
                    .fold(1, i64::wrapping_mul),
            ),
            Operator::Divide => {
                if value(1) == 0 {
                    Value::Int(self.division_by_zero()?)
                } else {
                    Value::Int(value(0).wrapping_div(value(1)))
                }
            }
            Operator::Modulus => {
                if value(1) == 0 {
                    Value::Int(self.division_by_zero()?)
                } else {
                    Value::Int(value(0).wrapping_rem(value(1)))
                }
            }

            Operator::Constant
            | Operator::Like
            | Operator::Concat
            | Operator::Substr
            | Operator::Cast => {
                return Err(unsupported(op, TypeClass::IntBool));
            }
        };

        Ok(result.declared())
    }

    fn evaluate_string(&self, op: Operator, operands: &[ExprNode]) -> ExpressionResult<Computed> {
        let compare = |ordering_ok: fn(Ordering) -> bool| {
            Value::Bool(
                !any_null(&operands[..2])
                    && ordering_ok(compare_ignore_case(&operands[0], &operands[1])),
            )
        };

        let result = match op {
            Operator::Eq => compare(Ordering::is_eq),
            Operator::Ne => compare(Ordering::is_ne),
            Operator::Gt => compare(Ordering::is_gt),
            Operator::Lt => compare(Ordering::is_lt),
            Operator::Ge => compare(Ordering::is_ge),
            Operator::Le => compare(Ordering::is_le),
            Operator::In => Value::Bool(
                !operands[0].is_null
                    && operands[1..].iter().any(|candidate| {
                        !candidate.is_null && compare_ignore_case(&operands[0], candidate).is_eq()
                    }),
            ),
            Operator::Between => Value::Bool(
                !any_null(operands)
                    && compare_ignore_case(&operands[0], &operands[1]).is_ge()
                    && compare_ignore_case(&operands[0], &operands[2]).is_le(),
            ),
            Operator::IsNull => Value::Bool(operands[0].is_null),
            Operator::Like => Value::Bool(like_match(
                text_or_null(&operands[0]).as_deref(),
                text_or_null(&operands[1]).as_deref(),
            )),

            Operator::Concat | Operator::Add => {
                if any_null(operands) {
                    return Ok(Value::Null.with_type(ResultType::String));
                }
                let joined: String = operands.iter().map(|operand| operand.text()).collect();
                return Ok(Value::Text(joined).with_type(ResultType::String));
            }
            Operator::Substr => {
                if any_null(operands) {
                    return Ok(Value::Null.with_type(ResultType::String));
                }
                let length = operands.get(2).map(ExprNode::as_i64);
                let text = substr(&operands[0].text(), operands[1].as_i64(), length);
                return Ok(Value::Text(text).with_type(ResultType::String));
            }

            Operator::Constant
            | Operator::And
            | Operator::Or
            | Operator::Not
            | Operator::Subtract
            | Operator::Multiply
            | Operator::Divide
            | Operator::Modulus
            | Operator::Cast => {
                return Err(unsupported(op, TypeClass::String));
            }
        };

        Ok(result.declared())
    }

    fn division_by_zero(&self) -> ExpressionResult<i64> {
        match self.config.division {
            DivisionMode::Sentinel => Ok(DIVISION_BY_ZERO_SENTINEL),
            DivisionMode::Error => Err(ExpressionError::DivisionByZero),
        }
    }
}

/// Computed value before it is wrapped into a literal node.
#[derive(Debug, Clone, PartialEq)]
enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Result literal takes the type the checker declared for the node.
    fn declared(self) -> Computed {
        Computed {
            value: self,
            forced: None,
        }
    }

    /// Result literal always takes `result_type`.
    fn with_type(self, result_type: ResultType) -> Computed {
        Computed {
            value: self,
            forced: Some(result_type),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Computed {
    value: Value,
    forced: Option<ResultType>,
}

impl Computed {
    fn into_literal(self, declared: ResultType) -> ExprNode {
        let result_type = self.forced.unwrap_or(declared);
        let payload = match self.value {
            Value::Null => return ExprNode::null(result_type),
            Value::Bool(b) => Payload::Int(b as i64),
            Value::Int(i) if result_type == ResultType::Float => Payload::Float(i as f64),
            Value::Int(i) => Payload::Int(i),
            Value::Float(f) if result_type == ResultType::Float => Payload::Float(f),
            Value::Float(f) => Payload::Int(f as i64),
            Value::Text(s) => Payload::Text(s),
        };
        ExprNode::literal(result_type, payload)
    }
}

fn any_null(operands: &[ExprNode]) -> bool {
    operands.iter().any(|operand| operand.is_null)
}

fn text_or_null(operand: &ExprNode) -> Option<std::borrow::Cow<'_, str>> {
    if operand.is_null {
        None
    } else {
        Some(operand.text())
    }
}

fn unsupported(op: Operator, class: TypeClass) -> ExpressionError {
    ExpressionError::UnsupportedOperator {
        operator: op.as_str().to_string(),
        class: class.to_string(),
    }
}

/// Case-insensitive ordinal comparison of two operands' text
fn compare_ignore_case(left: &ExprNode, right: &ExprNode) -> Ordering {
    let left = left.text();
    let right = right.text();
    left.chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase))
}

/// Take `length` characters of `source` starting at 0-based `offset`.
///
/// A negative offset or length, or an offset past the end, yields an empty
/// string; the length is clamped to the end of the source.
fn substr(source: &str, offset: i64, length: Option<i64>) -> String {
    let source_len = source.chars().count() as i64;
    let length = length.unwrap_or(SUBSTR_DEFAULT_LENGTH);

    if offset < 0 || length < 0 || offset > source_len {
        return String::new();
    }
    let length = length.min(source_len - offset);

    source
        .chars()
        .skip(offset as usize)
        .take(length as usize)
        .collect()
}

/// Helper function to check and fold a tree with the default configuration
pub fn evaluate_expression(node: &ExprNode) -> ExpressionResult<ExprNode> {
    ExpressionEvaluator::new().fold(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::type_checker::type_check_expression;

    /// Check then fold, as the query layer does
    fn run(mut node: ExprNode) -> ExprNode {
        type_check_expression(&mut node).unwrap();
        evaluate_expression(&node).unwrap()
    }

    fn run_strict(mut node: ExprNode) -> ExpressionResult<ExprNode> {
        type_check_expression(&mut node).unwrap();
        ExpressionEvaluator::with_config(EvalConfig::strict()).fold(&node)
    }

    #[test]
    fn test_class_selection() {
        assert_eq!(
            TypeClass::of(&[ExprNode::integer(1), ExprNode::float(2.0)]),
            TypeClass::Float
        );
        assert_eq!(
            TypeClass::of(&[ExprNode::float(1.0), ExprNode::string("x")]),
            TypeClass::Float
        );
        assert_eq!(
            TypeClass::of(&[ExprNode::boolean(true), ExprNode::integer(2)]),
            TypeClass::IntBool
        );
        assert_eq!(
            TypeClass::of(&[ExprNode::integer(1), ExprNode::integer(2), ExprNode::float(3.0)]),
            TypeClass::IntBool
        );
        assert_eq!(
            TypeClass::of(&[ExprNode::timestamp("t"), ExprNode::timestamp("u")]),
            TypeClass::String
        );
        assert_eq!(TypeClass::of(&[ExprNode::string("s")]), TypeClass::String);
    }

    #[test]
    fn test_integer_arithmetic() {
        let node = ExprNode::add_expr(ExprNode::integer(10), ExprNode::integer(5));
        assert_eq!(run(node), ExprNode::integer(15));

        let node = ExprNode::sub_expr(ExprNode::integer(10), ExprNode::integer(15));
        assert_eq!(run(node), ExprNode::integer(-5));

        let node = ExprNode::mul_expr(ExprNode::integer(4), ExprNode::integer(3));
        assert_eq!(run(node), ExprNode::integer(12));

        let node = ExprNode::div_expr(ExprNode::integer(10), ExprNode::integer(3));
        assert_eq!(run(node), ExprNode::integer(3));

        let node = ExprNode::mod_expr(ExprNode::integer(10), ExprNode::integer(3));
        assert_eq!(run(node), ExprNode::integer(1));

        let node = ExprNode::operation(
            Operator::Add,
            vec![ExprNode::integer(1), ExprNode::integer(2), ExprNode::integer(3)],
        );
        assert_eq!(run(node), ExprNode::integer(6));
    }

    #[test]
    fn test_float_arithmetic() {
        let node = ExprNode::add_expr(ExprNode::integer(1), ExprNode::float(0.5));
        assert_eq!(run(node), ExprNode::float(1.5));

        let node = ExprNode::mul_expr(ExprNode::float(2.5), ExprNode::integer(4));
        assert_eq!(run(node), ExprNode::float(10.0));

        let node = ExprNode::div_expr(ExprNode::float(1.0), ExprNode::integer(4));
        assert_eq!(run(node), ExprNode::float(0.25));
    }

    #[test]
    fn test_division_by_zero_sentinel() {
        let node = ExprNode::div_expr(ExprNode::float(7.5), ExprNode::float(0.0));
        assert_eq!(run(node), ExprNode::float(2147483647.0));

        let node = ExprNode::div_expr(ExprNode::integer(7), ExprNode::integer(0));
        assert_eq!(run(node), ExprNode::integer(2147483647));

        let node = ExprNode::mod_expr(ExprNode::integer(7), ExprNode::integer(0));
        assert_eq!(run(node), ExprNode::integer(2147483647));

        // Float modulus truncates the divisor first
        let node = ExprNode::mod_expr(ExprNode::float(7.5), ExprNode::float(0.5));
        assert_eq!(run(node), ExprNode::integer(2147483647));
    }

    #[test]
    fn test_float_modulus_yields_integer() {
        let node = ExprNode::mod_expr(ExprNode::float(7.9), ExprNode::float(3.2));
        assert_eq!(run(node), ExprNode::integer(1));

        let node = ExprNode::mod_expr(ExprNode::float(-7.9), ExprNode::integer(2));
        assert_eq!(run(node), ExprNode::integer(-1));
    }

    #[test]
    fn test_strict_division() {
        let node = ExprNode::div_expr(ExprNode::integer(7), ExprNode::integer(0));
        assert_eq!(run_strict(node), Err(ExpressionError::DivisionByZero));

        let node = ExprNode::div_expr(ExprNode::float(7.0), ExprNode::float(0.0));
        assert_eq!(run_strict(node), Err(ExpressionError::DivisionByZero));

        let node = ExprNode::mod_expr(ExprNode::integer(7), ExprNode::integer(0));
        assert_eq!(run_strict(node), Err(ExpressionError::DivisionByZero));

        let node = ExprNode::div_expr(ExprNode::integer(8), ExprNode::integer(2));
        assert_eq!(run_strict(node), Ok(ExprNode::integer(4)));
    }

    #[test]
    fn test_comparisons() {
        let node = ExprNode::lt(ExprNode::integer(3), ExprNode::integer(5));
        assert_eq!(run(node), ExprNode::boolean(true));

        let node = ExprNode::ge(ExprNode::float(2.0), ExprNode::integer(3));
        assert_eq!(run(node), ExprNode::boolean(false));

        let node = ExprNode::eq(ExprNode::string("Hello"), ExprNode::string("hELLO"));
        assert_eq!(run(node), ExprNode::boolean(true));

        let node = ExprNode::lt(ExprNode::string("apple"), ExprNode::string("Banana"));
        assert_eq!(run(node), ExprNode::boolean(true));

        let node = ExprNode::ne(ExprNode::boolean(true), ExprNode::boolean(false));
        assert_eq!(run(node), ExprNode::boolean(true));
    }

    #[test]
    fn test_in_list() {
        let node = ExprNode::in_list(
            ExprNode::integer(3),
            vec![ExprNode::integer(1), ExprNode::integer(2), ExprNode::integer(3)],
        );
        assert_eq!(run(node), ExprNode::boolean(true));

        let node = ExprNode::in_list(
            ExprNode::string("b"),
            vec![ExprNode::string("a"), ExprNode::string("c")],
        );
        assert_eq!(run(node), ExprNode::boolean(false));

        let node = ExprNode::in_list(
            ExprNode::string("B"),
            vec![ExprNode::string("a"), ExprNode::string("b")],
        );
        assert_eq!(run(node), ExprNode::boolean(true));

        let node = ExprNode::in_list(
            ExprNode::integer(2),
            vec![ExprNode::float(1.5), ExprNode::integer(2)],
        );
        assert_eq!(run(node), ExprNode::boolean(true));
    }

    #[test]
    fn test_between() {
        let node = ExprNode::between(
            ExprNode::integer(5),
            ExprNode::integer(1),
            ExprNode::integer(10),
        );
        assert_eq!(run(node), ExprNode::boolean(true));

        let node = ExprNode::between(
            ExprNode::integer(5),
            ExprNode::integer(6),
            ExprNode::integer(10),
        );
        assert_eq!(run(node), ExprNode::boolean(false));

        let node = ExprNode::between(
            ExprNode::integer(10),
            ExprNode::integer(1),
            ExprNode::integer(10),
        );
        assert_eq!(run(node), ExprNode::boolean(true));

        let node = ExprNode::between(
            ExprNode::string("m"),
            ExprNode::string("A"),
            ExprNode::string("Z"),
        );
        assert_eq!(run(node), ExprNode::boolean(true));
    }

    #[test]
    fn test_mixed_between_uses_float_class() {
        let mut node = ExprNode::between(
            ExprNode::integer(5),
            ExprNode::float(1.0),
            ExprNode::integer(10),
        );
        type_check_expression(&mut node).unwrap();
        assert_eq!(TypeClass::of(&node.operands), TypeClass::Float);
        assert_eq!(
            evaluate_expression(&node).unwrap(),
            ExprNode::boolean(true)
        );
    }

    #[test]
    fn test_logical_truthiness() {
        let node = ExprNode::and(ExprNode::integer(2), ExprNode::integer(-1));
        assert_eq!(run(node), ExprNode::boolean(true));

        let node = ExprNode::and(ExprNode::boolean(true), ExprNode::integer(0));
        assert_eq!(run(node), ExprNode::boolean(false));

        let node = ExprNode::or(ExprNode::boolean(false), ExprNode::integer(7));
        assert_eq!(run(node), ExprNode::boolean(true));

        let node = ExprNode::not_expr(ExprNode::integer(0));
        assert_eq!(run(node), ExprNode::boolean(true));

        let node = ExprNode::and(ExprNode::float(0.5), ExprNode::integer(1));
        assert_eq!(run(node), ExprNode::boolean(true));
    }

    #[test]
    fn test_null_handling() {
        let node = ExprNode::is_null(ExprNode::null(ResultType::Integer));
        assert_eq!(run(node), ExprNode::boolean(true));

        let node = ExprNode::is_null(ExprNode::string("x"));
        assert_eq!(run(node), ExprNode::boolean(false));

        let node = ExprNode::eq(ExprNode::null(ResultType::Integer), ExprNode::integer(0));
        assert_eq!(run(node), ExprNode::boolean(false));

        let node = ExprNode::add_expr(ExprNode::null(ResultType::Integer), ExprNode::integer(1));
        assert_eq!(run(node), ExprNode::null(ResultType::Integer));

        let node = ExprNode::concat(vec![ExprNode::string("a"), ExprNode::null(ResultType::String)]);
        assert_eq!(run(node), ExprNode::null(ResultType::String));

        let node = ExprNode::like(ExprNode::null(ResultType::String), ExprNode::string("%"));
        assert_eq!(run(node), ExprNode::boolean(false));
    }

    #[test]
    fn test_string_operations() {
        let node = ExprNode::concat(vec![
            ExprNode::string("Hello"),
            ExprNode::string(", "),
            ExprNode::string("World"),
        ]);
        assert_eq!(run(node), ExprNode::string("Hello, World"));

        let node = ExprNode::add_expr(ExprNode::string("ab"), ExprNode::string("cd"));
        assert_eq!(run(node), ExprNode::string("abcd"));

        let node = ExprNode::like(ExprNode::string("ABC"), ExprNode::string("a_c"));
        assert_eq!(run(node), ExprNode::boolean(true));

        let node = ExprNode::like(ExprNode::string("abcdeg"), ExprNode::string("a%f"));
        assert_eq!(run(node), ExprNode::boolean(false));
    }

    #[test]
    fn test_substr() {
        let cases = [
            (1, Some(3), "ell"),
            (10, Some(3), ""),
            (-1, Some(3), ""),
            (2, None, "llo"),
            (0, Some(100), "hello"),
            (5, Some(2), ""),
            (1, Some(-2), ""),
        ];
        for (offset, length, expected) in cases {
            let node = ExprNode::substr(
                ExprNode::string("hello"),
                ExprNode::integer(offset),
                length.map(ExprNode::integer),
            );
            assert_eq!(run(node), ExprNode::string(expected), "offset {}", offset);
        }
    }

    #[test]
    fn test_cast() {
        let node = ExprNode::cast(ExprNode::float(3.99), "integer", None);
        assert_eq!(run(node), ExprNode::integer(3));

        let node = ExprNode::cast(ExprNode::string("12.5kg"), "numeric", None);
        assert_eq!(run(node), ExprNode::float(12.5));

        let node = ExprNode::cast(ExprNode::integer(123456), "character", Some(3));
        assert_eq!(run(node), ExprNode::string("123"));

        let node = ExprNode::cast(ExprNode::string("2024-05-06"), "date", None);
        assert_eq!(run(node), ExprNode::date("2024-05-06"));

        let node = ExprNode::cast(
            ExprNode::cast(ExprNode::integer(-987), "character", None),
            "integer",
            None,
        );
        assert_eq!(run(node), ExprNode::integer(-987));
    }

    #[test]
    fn test_result_type_comes_from_checker() {
        // A float-typed node over integer literals still yields a float
        let mut node = ExprNode::operation(
            Operator::Add,
            vec![ExprNode::integer(1), ExprNode::integer(2)],
        );
        node.result_type = ResultType::Float;
        let result = ExpressionEvaluator::new()
            .evaluate(&node, &node.operands)
            .unwrap();
        assert_eq!(result, ExprNode::float(3.0));
    }

    #[test]
    fn test_evaluate_leaves_inputs_untouched() {
        let mut node = ExprNode::add_expr(ExprNode::integer(2), ExprNode::integer(3));
        type_check_expression(&mut node).unwrap();
        let before = node.clone();
        let operands = node.operands.clone();

        let result = ExpressionEvaluator::new().evaluate(&node, &operands).unwrap();
        assert_eq!(result, ExprNode::integer(5));
        assert_eq!(node, before);
        assert_eq!(operands, before.operands);
    }

    #[test]
    fn test_unsupported_operator_is_internal_fault() {
        let mut node = ExprNode::concat(vec![ExprNode::integer(1), ExprNode::integer(2)]);
        node.result_type = ResultType::String;
        let err = ExpressionEvaluator::new()
            .evaluate(&node, &node.operands)
            .unwrap_err();
        assert_eq!(
            err,
            ExpressionError::UnsupportedOperator {
                operator: "||".to_string(),
                class: "integer/boolean".to_string(),
            }
        );
        assert!(err.is_internal());
    }

    #[test]
    fn test_evaluate_rejects_bad_input() {
        let node = ExprNode::add_expr(ExprNode::integer(1), ExprNode::integer(2));
        assert!(matches!(
            ExpressionEvaluator::new().evaluate(&node, &node.operands),
            Err(ExpressionError::Unchecked { .. })
        ));

        let mut node = ExprNode::add_expr(
            ExprNode::add_expr(ExprNode::integer(1), ExprNode::integer(2)),
            ExprNode::integer(3),
        );
        node.result_type = ResultType::Integer;
        assert!(matches!(
            ExpressionEvaluator::new().evaluate(&node, &node.operands),
            Err(ExpressionError::NotALiteral { index: 0, .. })
        ));

        let mut node = ExprNode::operation(Operator::Substr, vec![ExprNode::string("x")]);
        node.result_type = ResultType::String;
        assert!(matches!(
            ExpressionEvaluator::new().evaluate(&node, &node.operands),
            Err(ExpressionError::ArityMismatch { .. })
        ));
    }

    #[test]
    fn test_nested_fold() {
        // (10 - 4) * 2.5 > 14 AND 'abc' LIKE 'A%'
        let node = ExprNode::and(
            ExprNode::gt(
                ExprNode::mul_expr(
                    ExprNode::sub_expr(ExprNode::integer(10), ExprNode::integer(4)),
                    ExprNode::float(2.5),
                ),
                ExprNode::integer(14),
            ),
            ExprNode::like(ExprNode::string("abc"), ExprNode::string("A%")),
        );
        assert_eq!(run(node), ExprNode::boolean(true));
    }
}
