//! Scanner and validator for single-equation math expressions such as `53x^2/3 - 5*3`.
//!
//! The parser turns raw equation text into a tree of [`ParserPart`]s annotated with resolved
//! symbols (numbers, variables, named constants, functions and operators), and collects errors
//! and warnings with char offsets into the original text. Parsing never fails outright;
//! all problems are recorded in the returned [`ParseResult`].
//!
//! # Supported syntax
//!
//! - **Numbers**: `12`, `1.5`, `.5`, `5.`. A `-` directly preceding a number at the start
//!   of an expression or a function argument is folded into the number.
//! - **Operators** from the [registry](SymbolRegistry): by default, `+`, `-`, `*`, `/`, `%`
//!   and `^`. `+` and `-` may be used without the left operand.
//! - **Function calls**: `abs(x)`, `min(x, 1, 2)`. A function literal not followed by `(`
//!   is reinterpreted as other symbols, with a warning.
//! - **Constants and variables**: `pi`, `e`, `x`, `y`.
//! - **Implicit multiplication**: adjacent values such as `2x` or `3sin(x)` are kept as
//!   siblings; the compiler inserts multiplication between them.
//! - **Parentheses** grouping subexpressions.
//!
//! Symbol matching is case-insensitive and does not require whitespace: `2pix` is read
//! as `2`, `pi`, `x`. When a run of chars does not match any symbol, the scanner decomposes
//! it into the longest known literals and reports the leftovers as unknown identifiers.
//!
//! # Examples
//!
//! ```
//! use graphy_parser::{parse, ErrorCategory, SymbolKind};
//!
//! let result = parse("5abs(x) + 10.2min(x, 1/2x, x^2)");
//! assert!(result.is_ok());
//! let min_call = &result.root().children()[4];
//! assert_eq!(min_call.kind(), SymbolKind::Function);
//! assert_eq!(min_call.arg_count(), Some(3));
//!
//! let result = parse("2 * (qz + x");
//! let categories: Vec<_> = result
//!     .errors()
//!     .iter()
//!     .map(|err| err.kind().category())
//!     .collect();
//! assert_eq!(categories, [ErrorCategory::Identifier, ErrorCategory::Structural]);
//! assert_eq!(result.errors()[0].message(), "Identifier 'qz' not found");
//! ```

#![doc(html_root_url = "https://docs.rs/graphy-parser/0.1.0")]
#![warn(missing_docs, missing_debug_implementations)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

pub use crate::{
    error::{
        collapse_identifier_errors, ErrorCategory, ErrorKind, ParserError, ParserWarning,
        WarningKind,
    },
    parser::{parse, parse_with},
    registry::{RegistryBuilder, RegistryError, SymbolRegistry, MULTIPLICATION},
    symbols::{
        ArgSpec, ArgType, Binary, Constant, Function, NativeFn, Operator, Symbol, SymbolKind,
        Ternary, Unary, Variable, Variadic,
    },
    tree::{Member, ParseResult, ParserPart},
};

mod error;
mod parser;
mod registry;
mod symbols;
mod tree;
