//! Operand promotion applied by the checker before argument-class checks.
//!
//! Both passes look only at the direct operands they are handed and rewrite
//! constant operands in place. Operator operands keep their type; they are
//! reconciled at evaluation time by class dispatch. Running a pass twice
//! has the same effect as running it once.

use crate::expression::expr::{ExprNode, Payload};
use crate::expression::types::ResultType;
use log::debug;

/// Widen integer constants to float when a float operand is present.
///
/// Returns the comparison class: `Float` once any float is involved,
/// otherwise the first operand's type. `None` for an empty operand list.
pub fn promote_int_to_float(operands: &mut [ExprNode]) -> Option<ResultType> {
    let first = operands.first()?.result_type;
    let class = if first == ResultType::Integer
        && operands[1..]
            .iter()
            .any(|operand| operand.result_type == ResultType::Float)
    {
        ResultType::Float
    } else {
        first
    };

    if class == ResultType::Float {
        let mut rewritten = 0;
        for operand in operands
            .iter_mut()
            .filter(|operand| operand.is_constant() && operand.result_type == ResultType::Integer)
        {
            if let Payload::Int(value) = operand.payload {
                operand.payload = Payload::Float(value as f64);
            }
            operand.result_type = ResultType::Float;
            rewritten += 1;
        }
        if rewritten > 0 {
            debug!("promoted {} integer constant(s) to float", rewritten);
        }
    }

    Some(class)
}

/// Retag string constants as timestamps when compared with temporal operands.
///
/// Only the tag changes; the text is left for the date/time layer to parse.
/// Returns `Timestamp` when promotion applies, otherwise the first operand's
/// type.
pub fn promote_string_to_datetime(operands: &mut [ExprNode]) -> Option<ResultType> {
    let first = operands.first()?.result_type;
    if first != ResultType::String
        || !operands[1..]
            .iter()
            .any(|operand| operand.result_type.is_temporal())
    {
        return Some(first);
    }

    let mut rewritten = 0;
    for operand in operands
        .iter_mut()
        .filter(|operand| operand.is_constant() && operand.result_type == ResultType::String)
    {
        operand.result_type = ResultType::Timestamp;
        rewritten += 1;
    }
    if rewritten > 0 {
        debug!("promoted {} string constant(s) to timestamp", rewritten);
    }

    Some(ResultType::Timestamp)
}
