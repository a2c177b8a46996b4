//! Post-parse checks of operator operands and function arities.

use core::ops::Range;

use crate::{
    error::{ErrorKind, ParserError},
    symbols::{Function, SymbolKind},
    tree::ParserPart,
};

/// Checks whether an unresolved identifier starts within `range`.
fn has_unresolved(errors: &[ParserError<'_>], range: Range<usize>) -> bool {
    errors.iter().any(|err| {
        matches!(err.kind(), ErrorKind::UnknownIdentifier { .. }) && range.contains(&err.start())
    })
}

/// Validates a sibling list spanning `scope` and all its descendants in the post-order,
/// recording supplied argument counts on operator and function parts.
///
/// A missing operand is not reported if an unresolved identifier occupies its place.
pub(super) fn validate_parts<'r>(
    parts: &mut [ParserPart<'r>],
    scope: Range<usize>,
    errors: &mut Vec<ParserError<'r>>,
) {
    for part in parts.iter_mut() {
        let part_scope = part.start()..part.end();
        validate_parts(part.children_mut(), part_scope, errors);
    }

    for idx in 0..parts.len() {
        if let Some(op) = parts[idx].operator() {
            let has_left = idx > 0 && parts[idx - 1].kind() != SymbolKind::Operator;
            let has_right = idx + 1 < parts.len();
            let left_gap = if idx > 0 { parts[idx - 1].end() } else { scope.start };
            let part = &mut parts[idx];

            let missing_left = !has_left
                && !op.left_is_optional()
                && !has_unresolved(errors, left_gap..part.start());
            let missing_right = !has_right
                && !op.right_is_optional()
                && !has_unresolved(errors, part.end()..scope.end);
            if missing_left || missing_right {
                let len = part.literal().chars().count();
                let kind = ErrorKind::OperatorArgs { operator: op };
                errors.push(ParserError::new(kind, part.start(), len));
            }
            part.set_arg_count(usize::from(has_left) + usize::from(has_right));
        } else if let Some(function) = parts[idx].function() {
            validate_call(&mut parts[idx], function, errors);
        }
    }
}

fn validate_call<'r>(
    call: &mut ParserPart<'r>,
    function: &'r Function,
    errors: &mut Vec<ParserError<'r>>,
) {
    let supplied = {
        let args: Vec<_> = call.args().collect();
        match args.as_slice() {
            [] => 0,
            [arg] if arg.children().is_empty() => 0,
            _ => {
                let empty_args = args.iter().filter(|arg| arg.children().is_empty());
                for arg in empty_args {
                    let len = arg.literal().chars().count();
                    errors.push(ParserError::new(ErrorKind::EmptyArgument, arg.start(), len));
                }
                args.len()
            }
        }
    };

    let too_few = supplied < function.required_args();
    let too_many = function.max_args().map_or(false, |max| supplied > max);
    if too_few || too_many {
        let len = call.literal().chars().count();
        let kind = ErrorKind::FunctionArgs { function, supplied };
        errors.push(ParserError::new(kind, call.start(), len));
    }
    call.set_arg_count(supplied);
}
