//! [`CompiledEvaluator`] and related types.

use log::trace;

use core::{fmt, ops::RangeInclusive};

pub use self::expr::{CompiledExpr, Expr};
pub(crate) use self::expr::NativeOp;
use crate::{CompileError, EvalError, VariableMap};

mod expr;

/// Callable produced by compiling a parsed equation.
///
/// An evaluator binds the lookup table of native operations and the ordered list of free
/// variables. It holds no mutable state, so it is cheap to clone and safe to call concurrently
/// (e.g., once per sampled point when plotting).
///
/// Compilation never fails outright: if the equation cannot be compiled, the evaluator holds
/// the [`CompileError`] (see [`Self::error()`]), and all evaluation methods return
/// [`EvalError::NotCompiled`].
///
/// # Examples
///
/// ```
/// use graphy_parser::parse;
/// use graphy_eval::compile;
///
/// let evaluator = compile(&parse("2x^2 - 1"));
/// assert_eq!(evaluator.variables(), ["x"]);
/// assert_eq!(evaluator.evaluate(&[3.0])?, 17.0);
/// # Ok::<_, graphy_eval::EvalError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CompiledEvaluator {
    equation: String,
    inner: Result<CompiledExpr, CompileError>,
}

impl CompiledEvaluator {
    /// Maximum number of points produced by [`Self::sample()`].
    pub const MAX_SAMPLE_POINTS: usize = 1_000_000;

    pub(crate) fn new(equation: String, inner: Result<CompiledExpr, CompileError>) -> Self {
        Self { equation, inner }
    }

    /// Returns the source equation.
    pub fn equation(&self) -> &str {
        &self.equation
    }

    /// Returns the compilation error, if any.
    pub fn error(&self) -> Option<&CompileError> {
        self.inner.as_ref().err()
    }

    /// Checks whether the equation was compiled successfully.
    pub fn is_compiled(&self) -> bool {
        self.inner.is_ok()
    }

    /// Returns the compiled expression, if compilation succeeded.
    pub fn expr(&self) -> Option<&CompiledExpr> {
        self.inner.as_ref().ok()
    }

    fn compiled(&self) -> Result<&CompiledExpr, EvalError> {
        self.inner.as_ref().map_err(|_| EvalError::NotCompiled)
    }

    /// Returns free variables in the order of their first occurrence. If compilation failed,
    /// the list is empty.
    pub fn variables(&self) -> &[String] {
        match self.expr() {
            Some(expr) => expr.variables(),
            None => &[],
        }
    }

    /// Evaluates the equation with one value per free variable, in the order
    /// of [`Self::variables()`].
    pub fn evaluate(&self, values: &[f64]) -> Result<f64, EvalError> {
        let expr = self.compiled()?;
        if values.len() != expr.variables().len() {
            return Err(EvalError::ArgsLenMismatch {
                expected: expr.variables().len(),
                actual: values.len(),
            });
        }
        Ok(expr.evaluate(values))
    }

    /// Evaluates the equation binding free variables by name.
    pub fn evaluate_with<M>(&self, vars: &M) -> Result<f64, EvalError>
    where
        M: VariableMap + ?Sized,
    {
        let expr = self.compiled()?;
        let values = expr
            .variables()
            .iter()
            .map(|name| {
                vars.get_variable(name)
                    .ok_or_else(|| EvalError::UndefinedVariable(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(expr.evaluate(&values))
    }

    /// Samples a function of at most one variable over `range` with the specified `step`,
    /// returning `(x, y)` pairs. The last point is included if it lies on the grid.
    /// A constant equation is sampled as a horizontal line.
    ///
    /// Returns [`EvalError::TooManyPoints`] if the grid has more than
    /// [`Self::MAX_SAMPLE_POINTS`] points.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn sample(
        &self,
        range: RangeInclusive<f64>,
        step: f64,
    ) -> Result<Vec<(f64, f64)>, EvalError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(EvalError::InvalidStep(step));
        }
        let expr = self.compiled()?;
        let var_count = expr.variables().len();
        if var_count > 1 {
            return Err(EvalError::ArgsLenMismatch {
                expected: var_count,
                actual: 1,
            });
        }

        let (from, to) = range.into_inner();
        let steps = ((to - from) / step).floor();
        if steps.is_nan() || steps < 0.0 {
            return Ok(vec![]);
        }
        if !steps.is_finite() || steps >= Self::MAX_SAMPLE_POINTS as f64 {
            return Err(EvalError::TooManyPoints {
                max: Self::MAX_SAMPLE_POINTS,
            });
        }

        trace!(
            "Sampling `{}` over [{}, {}] with step {}",
            self.equation,
            from,
            to,
            step
        );
        let points = (0..=steps as usize).map(|i| {
            let x = from + step * i as f64;
            let y = expr.evaluate(&[x][..var_count]);
            (x, y)
        });
        Ok(points.collect())
    }
}

/// Outputs the compiled expression in the nested call form, or the compilation error.
impl fmt::Display for CompiledEvaluator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Ok(expr) => fmt::Display::fmt(expr, formatter),
            Err(err) => write!(formatter, "<not compiled: {}>", err),
        }
    }
}
