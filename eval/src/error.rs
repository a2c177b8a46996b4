//! Compilation and evaluation errors.

use core::fmt;

use graphy_parser::SymbolKind;

/// Errors that can occur when compiling a parsed equation.
///
/// Compilation errors are not returned directly; they are stored in the
/// [`CompiledEvaluator`](crate::CompiledEvaluator) and surface as [`EvalError::NotCompiled`]
/// when the evaluator is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompileError {
    /// The parse result contains errors, so it cannot be compiled.
    ParseErrors {
        /// Number of parsing errors.
        count: usize,
    },
    /// Equation or a parenthesized group is empty.
    EmptyExpression {
        /// Offset of the empty group.
        start: usize,
    },
    /// Operator lacks an operand, and the operand has no default value.
    MissingOperand {
        /// Operator literal.
        operator: String,
        /// Offset of the operator.
        start: usize,
    },
    /// Function call lacks an argument that has no default value.
    MissingArgument {
        /// Function literal.
        function: String,
        /// 0-based position of the argument.
        position: usize,
        /// Offset of the function call.
        start: usize,
    },
    /// Number, constant or default value cannot be parsed as a floating-point number.
    InvalidLiteral {
        /// Offending literal.
        literal: String,
        /// Offset of the part containing the literal.
        start: usize,
    },
    /// Implicit multiplication is required, but the registry has no multiplication operator.
    MissingMultiplication {
        /// Offset of the value that needs to be multiplied.
        start: usize,
    },
    /// Part that cannot appear at this position of the tree.
    UnexpectedPart {
        /// Part kind.
        kind: SymbolKind,
        /// Offset of the part.
        start: usize,
    },
}

impl fmt::Display for CompileError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseErrors { count } => write!(
                formatter,
                "Cannot compile an equation with {} parsing error(s)",
                count
            ),
            Self::EmptyExpression { .. } => formatter.write_str("Empty expression"),
            Self::MissingOperand { operator, .. } => write!(
                formatter,
                "Operator '{}' lacks an operand without a default value",
                operator
            ),
            Self::MissingArgument {
                function, position, ..
            } => write!(
                formatter,
                "Function '{}' lacks argument #{} without a default value",
                function,
                position + 1
            ),
            Self::InvalidLiteral { literal, .. } => {
                write!(formatter, "'{}' is not a valid number", literal)
            }
            Self::MissingMultiplication { .. } => formatter.write_str(
                "Implicit multiplication requires the `*` operator, which is not registered",
            ),
            Self::UnexpectedPart { kind, .. } => write!(formatter, "Unexpected {}", kind),
        }
    }
}

impl std::error::Error for CompileError {}

impl CompileError {
    /// Returns the offset in the equation the error relates to, if any.
    pub fn start(&self) -> Option<usize> {
        match self {
            Self::ParseErrors { .. } => None,
            Self::EmptyExpression { start }
            | Self::MissingOperand { start, .. }
            | Self::MissingArgument { start, .. }
            | Self::InvalidLiteral { start, .. }
            | Self::MissingMultiplication { start }
            | Self::UnexpectedPart { start, .. } => Some(*start),
        }
    }
}

/// Errors that can occur when invoking a [`CompiledEvaluator`](crate::CompiledEvaluator).
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EvalError {
    /// The evaluator holds a [`CompileError`] instead of a compiled expression.
    NotCompiled,
    /// Number of supplied values differs from the number of free variables.
    ArgsLenMismatch {
        /// Number of free variables.
        expected: usize,
        /// Number of supplied values.
        actual: usize,
    },
    /// Free variable is not bound by the supplied [`VariableMap`](crate::VariableMap).
    UndefinedVariable(String),
    /// Sampling step is not a positive finite number.
    InvalidStep(f64),
    /// Sampling grid has too many points for the requested range and step.
    TooManyPoints {
        /// Maximum allowed number of points.
        max: usize,
    },
}

impl fmt::Display for EvalError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotCompiled => formatter.write_str("Equation was not compiled successfully"),
            Self::ArgsLenMismatch { expected, actual } => write!(
                formatter,
                "Equation has {} free variable(s), but {} value(s) were supplied",
                expected, actual
            ),
            Self::UndefinedVariable(name) => write!(formatter, "Variable `{}` is not bound", name),
            Self::InvalidStep(step) => write!(
                formatter,
                "Sampling step must be a positive finite number, got {}",
                step
            ),
            Self::TooManyPoints { max } => write!(
                formatter,
                "Sampling would produce more than {} points; increase the step",
                max
            ),
        }
    }
}

impl std::error::Error for EvalError {}
