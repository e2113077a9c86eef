//! Type checking for expressions.

use crate::expression::operator::{Operator, OperatorCatalog, SqlCatalog};
use crate::expression::promotion::{promote_int_to_float, promote_string_to_datetime};
use crate::expression::{ExprNode, ExpressionError, ExpressionResult, Payload, ResultType};
use log::{trace, warn};

/// Type checker for expression nodes
pub struct TypeChecker<'a> {
    /// Operator registry used to name operators in diagnostics
    catalog: &'a dyn OperatorCatalog,
}

impl<'a> TypeChecker<'a> {
    /// Create a new type checker backed by the given operator catalog
    pub fn new(catalog: &'a dyn OperatorCatalog) -> Self {
        Self { catalog }
    }

    /// Type check a single node whose operands have already been checked.
    ///
    /// On success the node's `result_type` is set and returned; constant
    /// operands may have been promoted. On failure the node is typed
    /// `ResultType::Error` and the error is returned.
    pub fn check(&self, node: &mut ExprNode) -> ExpressionResult<ResultType> {
        trace!("checking {}", node);
        match self.infer(node) {
            Ok(result_type) => {
                node.result_type = result_type;
                Ok(result_type)
            }
            Err(err) => {
                warn!("type check failed for {}: {}", node, err);
                node.result_type = ResultType::Error;
                Err(err)
            }
        }
    }

    /// Type check a whole tree bottom-up, stopping at the first failure.
    pub fn check_tree(&self, node: &mut ExprNode) -> ExpressionResult<ResultType> {
        if node.is_constant() {
            return Ok(node.result_type);
        }

        for i in 0..node.operands.len() {
            if let Err(err) = self.check_tree(&mut node.operands[i]) {
                node.result_type = ResultType::Error;
                return Err(err);
            }
        }

        self.check(node)
    }

    /// Check that a tree is usable as a WHERE-clause filter
    pub fn check_filter_predicate(&self, node: &mut ExprNode) -> ExpressionResult<()> {
        match self.check_tree(node)? {
            ResultType::Boolean => Ok(()),
            other => Err(ExpressionError::TypeMismatch {
                operator: self.name(node.operation),
                expected: ResultType::Boolean,
                actual: other,
            }),
        }
    }

    fn infer(&self, node: &mut ExprNode) -> ExpressionResult<ResultType> {
        let op = node.operation;
        if op == Operator::Constant {
            return Ok(node.result_type);
        }

        let arity = op.arity();
        if !arity.accepts(node.operands.len()) {
            return Err(ExpressionError::ArityMismatch {
                operator: self.name(op),
                expected: arity.to_string(),
                actual: node.operands.len(),
            });
        }

        if let Some(index) = node
            .operands
            .iter()
            .position(|operand| operand.result_type == ResultType::Error)
        {
            return Err(ExpressionError::OperandFailed {
                operator: self.name(op),
                index,
            });
        }

        match op {
            Operator::Constant => Ok(node.result_type),

            Operator::And | Operator::Or | Operator::Not | Operator::IsNull => {
                Ok(ResultType::Boolean)
            }

            Operator::Eq
            | Operator::Ne
            | Operator::Gt
            | Operator::Lt
            | Operator::Ge
            | Operator::Le
            | Operator::In
            | Operator::Between => {
                promote_int_to_float(&mut node.operands);
                promote_string_to_datetime(&mut node.operands);
                let class = node.operands[0].result_type;
                self.require_class(op, &node.operands, class)?;
                Ok(ResultType::Boolean)
            }

            Operator::Like => {
                self.require_class(op, &node.operands, ResultType::String)?;
                Ok(ResultType::Boolean)
            }

            Operator::Modulus => {
                self.require_class(op, &node.operands, ResultType::Integer)?;
                Ok(ResultType::Integer)
            }

            Operator::Add => match promote_int_to_float(&mut node.operands) {
                Some(ResultType::String) => Ok(ResultType::String),
                Some(ResultType::Float) => Ok(ResultType::Float),
                _ => Ok(ResultType::Integer),
            },

            Operator::Subtract | Operator::Multiply | Operator::Divide => {
                match promote_int_to_float(&mut node.operands) {
                    Some(ResultType::Float) => Ok(ResultType::Float),
                    _ => Ok(ResultType::Integer),
                }
            }

            Operator::Concat => {
                self.require_class(op, &node.operands, ResultType::String)?;
                Ok(ResultType::String)
            }

            Operator::Substr => {
                let expected = [ResultType::String, ResultType::Integer, ResultType::Integer];
                for (operand, expected) in node.operands.iter().zip(expected) {
                    self.require_exact(op, operand, expected)?;
                }
                Ok(ResultType::String)
            }

            Operator::Cast => self.cast_target(node),
        }
    }

    /// Resolve the declared CAST target from the type-name operand
    fn cast_target(&self, node: &ExprNode) -> ExpressionResult<ResultType> {
        let type_name = &node.operands[1];
        let target = match &type_name.payload {
            Payload::Text(name) if type_name.is_constant() => ResultType::from_cast_name(name)
                .ok_or_else(|| ExpressionError::UnknownCastTarget { name: name.clone() })?,
            _ => {
                return Err(ExpressionError::TypeMismatch {
                    operator: self.name(Operator::Cast),
                    expected: ResultType::String,
                    actual: type_name.result_type,
                })
            }
        };

        if let Some(width) = node.operands.get(2) {
            self.require_exact(Operator::Cast, width, ResultType::Integer)?;
        }

        Ok(target)
    }

    /// Every operand must belong to `class`, with integer and float
    /// considered the same class.
    fn require_class(
        &self,
        op: Operator,
        operands: &[ExprNode],
        class: ResultType,
    ) -> ExpressionResult<()> {
        match operands
            .iter()
            .find(|operand| !class.is_compatible_with(operand.result_type))
        {
            Some(operand) => Err(ExpressionError::TypeMismatch {
                operator: self.name(op),
                expected: class,
                actual: operand.result_type,
            }),
            None => Ok(()),
        }
    }

    fn require_exact(
        &self,
        op: Operator,
        operand: &ExprNode,
        expected: ResultType,
    ) -> ExpressionResult<()> {
        if operand.result_type == expected {
            Ok(())
        } else {
            Err(ExpressionError::TypeMismatch {
                operator: self.name(op),
                expected,
                actual: operand.result_type,
            })
        }
    }

    fn name(&self, op: Operator) -> String {
        self.catalog.display_name(op)
    }
}

/// Helper function to type check a tree with the default SQL catalog
pub fn type_check_expression(node: &mut ExprNode) -> ExpressionResult<ResultType> {
    TypeChecker::new(&SqlCatalog).check_tree(node)
}

/// Helper function to validate a filter predicate
pub fn validate_filter_predicate(node: &mut ExprNode) -> ExpressionResult<()> {
    TypeChecker::new(&SqlCatalog).check_filter_predicate(node)
}
