//! Compiler of equations parsed by [`graphy-parser`] into numeric evaluators.
//!
//! # How it works
//!
//! 1. The resolved parse tree is flattened to discover the operators and functions it uses
//!   (forming a lookup table of [native operations](graphy_parser::NativeFn)) and its free
//!   variables in the order of their first occurrence. Multiplication is always present
//!   in the lookup table.
//! 2. In every sibling list of the tree, multiplication is inserted between adjacent values,
//!   so that `2x` is read as `2 * x` and `3sin(x)(x + 1)` as `3 * sin(x) * (x + 1)`.
//! 3. Each sibling list is reduced to a single expression by repeatedly replacing the operator
//!   with the highest precedence and its operands with a call node. Operators of the same
//!   precedence are reduced left to right. Missing operands and omitted function arguments
//!   are filled in from their default values, which is how unary minus works: `-x` is
//!   compiled to `-(0, x)`.
//! 4. The resulting [`CompiledExpr`] is wrapped into a [`CompiledEvaluator`], which accepts
//!   one value per free variable and returns a single number.
//!
//! No textual code is generated; evaluators are trees of calls of already resolved native
//! operations. Evaluators hold no mutable state and can be shared among threads.
//!
//! # Examples
//!
//! ```
//! use graphy_parser::parse;
//! use graphy_eval::{compile, CompilerExt, EvalError};
//!
//! let result = parse("3x^2 - 2xy + 1");
//! assert_eq!(result.free_variables(), ["x", "y"]);
//!
//! let evaluator = result.compile();
//! assert_eq!(evaluator.evaluate(&[2.0, 0.5])?, 11.0);
//! assert_eq!(evaluator.evaluate_with(&[("y", 1.0), ("x", 1.0)])?, 2.0);
//! assert_eq!(
//!     evaluator.evaluate(&[1.0]).unwrap_err(),
//!     EvalError::ArgsLenMismatch { expected: 2, actual: 1 }
//! );
//!
//! // Sample a single-variable function over a domain.
//! let points = compile(&parse("x^2")).sample(-1.0..=1.0, 0.5)?;
//! assert_eq!(points.len(), 5);
//! assert_eq!(points[0], (-1.0, 1.0));
//! # Ok::<_, EvalError>(())
//! ```
//!
//! [`graphy-parser`]: https://crates.io/crates/graphy-parser

#![doc(html_root_url = "https://docs.rs/graphy-eval/0.1.0")]
#![warn(missing_docs, missing_debug_implementations)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

pub use crate::{
    compiler::{compile, compile as generate_function, CompilerExt},
    error::{CompileError, EvalError},
    exec::{CompiledEvaluator, CompiledExpr, Expr},
    variable_map::VariableMap,
};

mod compiler;
mod error;
mod exec;
mod variable_map;
