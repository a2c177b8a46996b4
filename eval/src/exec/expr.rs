//! Expression tree executed by compiled evaluators.

use core::fmt;
use std::sync::Arc;

use graphy_parser::NativeFn;

/// Native operation referenced from an [`Expr`] by its index in the lookup table.
#[derive(Debug, Clone)]
pub(crate) struct NativeOp {
    pub literal: String,
    pub native: Arc<dyn NativeFn>,
}

/// Node of a compiled expression.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Expr {
    /// Numeric constant.
    Const(f64),
    /// Free variable with the specified index in [`CompiledExpr::variables()`].
    Var(usize),
    /// Call of a native operation.
    Call {
        /// Index of the operation in [`CompiledExpr::functions()`].
        function: usize,
        /// Call arguments, including substituted default values.
        args: Vec<Expr>,
    },
}

impl Expr {
    fn evaluate(&self, functions: &[NativeOp], values: &[f64]) -> f64 {
        match self {
            Self::Const(value) => *value,
            Self::Var(idx) => values[*idx],
            Self::Call { function, args } => {
                let args: Vec<_> = args
                    .iter()
                    .map(|arg| arg.evaluate(functions, values))
                    .collect();
                functions[*function].native.evaluate(&args)
            }
        }
    }

    fn fmt_with(&self, expr: &CompiledExpr, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(value) => write!(formatter, "{}", value),
            Self::Var(idx) => formatter.write_str(&expr.variables[*idx]),
            Self::Call { function, args } => {
                write!(formatter, "{}(", expr.functions[*function].literal)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        formatter.write_str(", ")?;
                    }
                    arg.fmt_with(expr, formatter)?;
                }
                formatter.write_str(")")
            }
        }
    }
}

/// Expression tree together with the lookup table of native operations and the list
/// of free variables it refers to.
///
/// The [`Display`](fmt::Display) implementation outputs the expression in the nested call form,
/// e.g., `+(2, *(3, x))` for `2 + 3x`.
#[derive(Debug, Clone)]
pub struct CompiledExpr {
    root: Expr,
    functions: Vec<NativeOp>,
    variables: Vec<String>,
}

impl CompiledExpr {
    pub(crate) fn new(root: Expr, functions: Vec<NativeOp>, variables: Vec<String>) -> Self {
        Self {
            root,
            functions,
            variables,
        }
    }

    /// Returns the root of the expression tree.
    pub fn root(&self) -> &Expr {
        &self.root
    }

    /// Iterates over literals of operators and functions in the lookup table, in the order
    /// of their first occurrence. Multiplication is always present.
    pub fn functions(&self) -> impl Iterator<Item = &str> + '_ {
        self.functions.iter().map(|op| op.literal.as_str())
    }

    /// Returns free variables in the order of their first occurrence.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Evaluates the expression. `values` must have one value per free variable.
    pub(crate) fn evaluate(&self, values: &[f64]) -> f64 {
        debug_assert_eq!(values.len(), self.variables.len());
        self.root.evaluate(&self.functions, values)
    }
}

impl fmt::Display for CompiledExpr {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt_with(self, formatter)
    }
}
