//! Parsing errors and warnings.

use core::{fmt, ptr};

use crate::symbols::{Function, Operator};

/// Coarse category of a [`ParserError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Unresolved run of characters.
    Identifier,
    /// Operator with a missing required operand.
    OperatorArgs,
    /// Function called with a wrong number of arguments.
    FunctionArgs,
    /// Unbalanced parentheses or misplaced commas.
    Structural,
    /// Malformed numeric literal.
    NumericLiteral,
}

/// Parsing error kind.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ErrorKind<'r> {
    /// Identifier is not present in the symbol registry.
    UnknownIdentifier {
        /// Unresolved text.
        identifier: String,
    },

    /// Function is called with a wrong number of arguments.
    FunctionArgs {
        /// Called function.
        function: &'r Function,
        /// Number of supplied arguments.
        supplied: usize,
    },

    /// Operator lacks a required operand.
    OperatorArgs {
        /// Offending operator.
        operator: &'r Operator,
    },

    /// `)` without a matching `(`.
    UnmatchedRightParen,
    /// `(` without a matching `)`.
    UnmatchedLeftParen,
    /// `,` outside of a function call.
    MisplacedSeparator,
    /// Empty slot between commas in a function call.
    EmptyArgument,
    /// Second decimal point in a number.
    RepeatedDecimalPoint,
}

impl PartialEq for ErrorKind<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::UnknownIdentifier { identifier },
                Self::UnknownIdentifier { identifier: other },
            ) => identifier == other,
            (
                Self::FunctionArgs { function, supplied },
                Self::FunctionArgs {
                    function: other_function,
                    supplied: other_supplied,
                },
            ) => ptr::eq(*function, *other_function) && supplied == other_supplied,
            (Self::OperatorArgs { operator }, Self::OperatorArgs { operator: other }) => {
                ptr::eq(*operator, *other)
            }
            (Self::UnmatchedRightParen, Self::UnmatchedRightParen)
            | (Self::UnmatchedLeftParen, Self::UnmatchedLeftParen)
            | (Self::MisplacedSeparator, Self::MisplacedSeparator)
            | (Self::EmptyArgument, Self::EmptyArgument)
            | (Self::RepeatedDecimalPoint, Self::RepeatedDecimalPoint) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ErrorKind<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownIdentifier { identifier } => {
                write!(formatter, "Identifier '{}' not found", identifier)
            }

            Self::FunctionArgs { function, supplied } => {
                let required = function.required_args();
                let literal = function.literal();
                if *supplied < required {
                    if function.max_args() == Some(required) {
                        write!(
                            formatter,
                            "Function '{}' requires {} argument(s)",
                            literal, required
                        )
                    } else {
                        write!(
                            formatter,
                            "Function '{}' requires at least {} argument(s)",
                            literal, required
                        )
                    }
                } else {
                    let max = function.max_args().unwrap_or(*supplied);
                    write!(
                        formatter,
                        "Function '{}' only takes {} argument(s)",
                        literal, max
                    )
                }
            }

            Self::OperatorArgs { operator } => {
                if operator.left_is_optional() {
                    write!(
                        formatter,
                        "Operator '{}' requires a right argument",
                        operator.literal()
                    )
                } else {
                    write!(
                        formatter,
                        "Operator '{}' requires left and right arguments",
                        operator.literal()
                    )
                }
            }

            Self::UnmatchedRightParen => formatter.write_str("No matching left parenthesis"),
            Self::UnmatchedLeftParen => formatter.write_str("No matching right parenthesis"),
            Self::MisplacedSeparator => {
                formatter.write_str("Argument separator outside of a function call")
            }
            Self::EmptyArgument => formatter.write_str("Empty function argument"),
            Self::RepeatedDecimalPoint => formatter.write_str("Repeated decimal point in number"),
        }
    }
}

impl ErrorKind<'_> {
    /// Returns the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownIdentifier { .. } => ErrorCategory::Identifier,
            Self::FunctionArgs { .. } => ErrorCategory::FunctionArgs,
            Self::OperatorArgs { .. } => ErrorCategory::OperatorArgs,
            Self::UnmatchedRightParen
            | Self::UnmatchedLeftParen
            | Self::MisplacedSeparator
            | Self::EmptyArgument => ErrorCategory::Structural,
            Self::RepeatedDecimalPoint => ErrorCategory::NumericLiteral,
        }
    }
}

/// Parsing error together with its location in the equation.
///
/// Locations are measured in chars from the start of the original equation text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserError<'r> {
    kind: ErrorKind<'r>,
    start: usize,
    len: usize,
}

impl<'r> ParserError<'r> {
    pub(crate) fn new(kind: ErrorKind<'r>, start: usize, len: usize) -> Self {
        Self { kind, start, len }
    }

    /// Creates an error for an unresolved identifier starting at `start`.
    pub fn unknown_identifier(identifier: impl Into<String>, start: usize) -> Self {
        let identifier = identifier.into();
        let len = identifier.chars().count();
        Self::new(ErrorKind::UnknownIdentifier { identifier }, start, len)
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> &ErrorKind<'r> {
        &self.kind
    }

    /// Returns the offset of the first char covered by this error.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the number of chars covered by this error.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks whether this error covers no chars (e.g., an empty function argument).
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Returns the unresolved identifier if this is an identifier error.
    pub fn identifier(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::UnknownIdentifier { identifier } => Some(identifier),
            _ => None,
        }
    }

    /// Merges `next` into this error if both are identifier errors and `next` starts
    /// immediately after this one.
    pub(crate) fn absorb_adjacent(&mut self, next: &Self) -> bool {
        let next_identifier = match next.identifier() {
            Some(identifier) if next.start == self.start + self.len => identifier,
            _ => return false,
        };
        if let ErrorKind::UnknownIdentifier { identifier } = &mut self.kind {
            identifier.push_str(next_identifier);
            self.len += next.len;
            true
        } else {
            false
        }
    }
}

impl fmt::Display for ParserError<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.start, self.kind)
    }
}

impl std::error::Error for ParserError<'_> {}

/// Parsing warning kind.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WarningKind {
    /// Function literal is not followed by `(`, so it was read as other symbols.
    PotentialFunction {
        /// Function literal as written in the equation.
        identifier: String,
    },
}

impl fmt::Display for WarningKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PotentialFunction { identifier } => {
                write!(formatter, "Did you mean to call function '{}'?", identifier)
            }
        }
    }
}

/// Parsing warning together with its location in the equation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserWarning {
    kind: WarningKind,
    start: usize,
    len: usize,
}

impl ParserWarning {
    pub(crate) fn potential_function(identifier: String, start: usize) -> Self {
        let len = identifier.chars().count();
        Self {
            kind: WarningKind::PotentialFunction { identifier },
            start,
            len,
        }
    }

    /// Returns the kind of this warning.
    pub fn kind(&self) -> &WarningKind {
        &self.kind
    }

    /// Returns the offset of the first char covered by this warning.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the number of chars covered by this warning.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks whether this warning covers no chars.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for ParserWarning {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.start, self.kind)
    }
}

/// Merges runs of adjacent identifier errors into single errors spanning the whole run.
///
/// The scanner reports unresolved characters one at a time; after collapsing, `qz` yields
/// a single "Identifier 'qz' not found" error instead of two. Non-identifier errors
/// and non-adjacent identifier errors are passed through unchanged. The operation
/// is idempotent.
pub fn collapse_identifier_errors(errors: Vec<ParserError<'_>>) -> Vec<ParserError<'_>> {
    let mut collapsed: Vec<ParserError<'_>> = Vec::with_capacity(errors.len());
    for error in errors {
        if let Some(previous) = collapsed.last_mut() {
            if previous.absorb_adjacent(&error) {
                continue;
            }
        }
        collapsed.push(error);
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Symbol, SymbolRegistry};

    fn identifier_errors(errors: &[ParserError<'_>]) -> Vec<(usize, String)> {
        errors
            .iter()
            .map(|err| (err.start(), err.identifier().unwrap_or("").to_owned()))
            .collect()
    }

    #[test]
    fn collapsing_sequential_errors() {
        let errors = vec![
            ParserError::unknown_identifier("q", 4),
            ParserError::unknown_identifier("w", 5),
            ParserError::unknown_identifier("r", 6),
        ];
        let collapsed = collapse_identifier_errors(errors);

        assert_eq!(identifier_errors(&collapsed), [(4, "qwr".to_owned())]);
        assert_eq!(collapsed[0].len(), 3);
        assert_eq!(collapsed[0].message(), "Identifier 'qwr' not found");
    }

    #[test]
    fn collapsing_is_idempotent() {
        let errors = vec![
            ParserError::unknown_identifier("q", 0),
            ParserError::unknown_identifier("w", 1),
            ParserError::unknown_identifier("z", 3),
            ParserError::new(ErrorKind::UnmatchedRightParen, 4, 1),
            ParserError::unknown_identifier("k", 5),
            ParserError::unknown_identifier("j", 6),
        ];
        let once = collapse_identifier_errors(errors);
        let twice = collapse_identifier_errors(once.clone());
        assert_eq!(once, twice);
        assert_eq!(
            identifier_errors(&once),
            [
                (0, "qw".to_owned()),
                (3, "z".to_owned()),
                (4, String::new()),
                (5, "kj".to_owned()),
            ]
        );
    }

    #[test]
    fn non_identifier_errors_break_runs() {
        let errors = vec![
            ParserError::unknown_identifier("q", 0),
            ParserError::new(ErrorKind::RepeatedDecimalPoint, 1, 1),
            ParserError::unknown_identifier("w", 1),
        ];
        let collapsed = collapse_identifier_errors(errors);
        assert_eq!(collapsed.len(), 3);
    }

    #[test]
    fn error_messages() {
        let registry = SymbolRegistry::standard();
        let function = |literal: &str| match registry.get(literal) {
            Some(Symbol::Function(function)) => function,
            _ => unreachable!(),
        };
        let operator = |literal: &str| match registry.get(literal) {
            Some(Symbol::Operator(op)) => op,
            _ => unreachable!(),
        };

        let kind = ErrorKind::FunctionArgs {
            function: function("abs"),
            supplied: 0,
        };
        assert_eq!(kind.to_string(), "Function 'abs' requires 1 argument(s)");
        let kind = ErrorKind::FunctionArgs {
            function: function("abs"),
            supplied: 2,
        };
        assert_eq!(kind.to_string(), "Function 'abs' only takes 1 argument(s)");
        let kind = ErrorKind::FunctionArgs {
            function: function("min"),
            supplied: 0,
        };
        assert_eq!(kind.to_string(), "Function 'min' requires at least 1 argument(s)");
        let kind = ErrorKind::FunctionArgs {
            function: function("log"),
            supplied: 0,
        };
        assert_eq!(kind.to_string(), "Function 'log' requires at least 1 argument(s)");

        let kind = ErrorKind::OperatorArgs {
            operator: operator("*"),
        };
        assert_eq!(
            kind.to_string(),
            "Operator '*' requires left and right arguments"
        );
        assert_eq!(kind.category(), ErrorCategory::OperatorArgs);
        let kind = ErrorKind::OperatorArgs {
            operator: operator("-"),
        };
        assert_eq!(kind.to_string(), "Operator '-' requires a right argument");
    }
}
