//! Transformation of parse trees into [`CompiledEvaluator`]s.

use log::{debug, trace};

use std::{collections::HashMap, sync::Arc};

use crate::{
    exec::{CompiledEvaluator, CompiledExpr, Expr, NativeOp},
    CompileError,
};
use graphy_parser::{Function, Member, Operator, ParseResult, ParserPart, Symbol, SymbolRegistry};

#[cfg(test)]
mod tests;

/// Element of a sibling list being reduced.
#[derive(Debug)]
enum Term<'r> {
    Value(Expr),
    Operator { op: &'r Operator, start: usize },
}

impl Term<'_> {
    fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    fn into_value(self) -> Expr {
        match self {
            Self::Value(expr) => expr,
            Self::Operator { .. } => unreachable!("operand was checked to be a value"),
        }
    }
}

#[derive(Debug)]
struct Compiler<'r> {
    registry: &'r SymbolRegistry,
    functions: Vec<NativeOp>,
    function_indices: HashMap<&'r str, usize>,
    variables: Vec<String>,
    variable_indices: HashMap<&'r str, usize>,
}

impl<'r> Compiler<'r> {
    fn new(registry: &'r SymbolRegistry) -> Self {
        Self {
            registry,
            functions: Vec::new(),
            function_indices: HashMap::new(),
            variables: Vec::new(),
            variable_indices: HashMap::new(),
        }
    }

    fn add_function(&mut self, function: &'r Function) -> usize {
        let functions = &mut self.functions;
        *self
            .function_indices
            .entry(function.literal())
            .or_insert_with(|| {
                functions.push(NativeOp {
                    literal: function.literal().to_owned(),
                    native: Arc::clone(function.native()),
                });
                functions.len() - 1
            })
    }

    fn add_variable(&mut self, name: &'r str) -> usize {
        let variables = &mut self.variables;
        *self.variable_indices.entry(name).or_insert_with(|| {
            variables.push(name.to_owned());
            variables.len() - 1
        })
    }

    /// Builds the lookup table and the variable list in the first-occurrence order.
    fn collect_symbols(&mut self, root: &ParserPart<'r>) {
        root.visit(&mut |part| match part.symbol() {
            Some(Symbol::Operator(op)) => {
                self.add_function(op.as_function());
            }
            Some(Symbol::Function(function)) => {
                self.add_function(function);
            }
            Some(Symbol::Variable(var)) => {
                self.add_variable(var.literal());
            }
            _ => { /* no lookup entries */ }
        });

        if let Some(mul) = self.registry.multiplication() {
            self.add_function(mul.as_function());
        }
    }

    /// Compiles a sibling list, inserting multiplication between adjacent values.
    fn compile_group(
        &mut self,
        parts: &[ParserPart<'r>],
        start: usize,
    ) -> Result<Expr, CompileError> {
        let mut terms = Vec::with_capacity(parts.len());
        for part in parts {
            let value = match part.member() {
                Member::Symbol(Symbol::Operator(op)) => {
                    terms.push(Term::Operator {
                        op,
                        start: part.start(),
                    });
                    continue;
                }
                Member::Symbol(Symbol::Function(function)) => self.compile_call(part, function)?,
                Member::Symbol(Symbol::Constant(constant)) => {
                    let value = constant.value().map_err(|_| CompileError::InvalidLiteral {
                        literal: constant.expression().to_owned(),
                        start: part.start(),
                    })?;
                    Expr::Const(value)
                }
                Member::Symbol(Symbol::Variable(var)) => Expr::Var(self.add_variable(var.literal())),
                Member::Number => parse_literal(part.literal(), part.start())?,
                Member::Container => self.compile_group(part.children(), part.start())?,
                _ => {
                    return Err(CompileError::UnexpectedPart {
                        kind: part.kind(),
                        start: part.start(),
                    });
                }
            };

            if terms.last().map_or(false, Term::is_value) {
                let mul = self
                    .registry
                    .multiplication()
                    .ok_or(CompileError::MissingMultiplication {
                        start: part.start(),
                    })?;
                terms.push(Term::Operator {
                    op: mul,
                    start: part.start(),
                });
            }
            terms.push(Term::Value(value));
        }

        self.reduce(terms, start)
    }

    fn compile_call(
        &mut self,
        part: &ParserPart<'r>,
        function: &'r Function,
    ) -> Result<Expr, CompileError> {
        let supplied: Vec<_> = part.args().collect();
        let mut args = Vec::with_capacity(function.args().len().max(supplied.len()));
        // `f()` is a call without args rather than with a single empty one.
        let is_empty_call = matches!(supplied.as_slice(), [arg] if arg.children().is_empty());
        if !is_empty_call {
            for arg in supplied {
                args.push(self.compile_group(arg.children(), arg.start())?);
            }
        }

        let declared = function.args().iter().enumerate().skip(args.len());
        for (position, spec) in declared {
            if spec.is_infinite() {
                break;
            }
            let default = spec
                .default_value()
                .ok_or_else(|| CompileError::MissingArgument {
                    function: function.literal().to_owned(),
                    position,
                    start: part.start(),
                })?;
            args.push(parse_literal(default, part.start())?);
        }

        Ok(Expr::Call {
            function: self.add_function(function),
            args,
        })
    }

    /// Selects the next operator to reduce: among operators with a value (or a defaulted
    /// absence) on the right, the one with the highest effective precedence, leftmost on ties.
    fn select_operator(terms: &[Term<'r>]) -> Option<(usize, &'r Operator, usize)> {
        let mut selected: Option<(usize, &'r Operator, usize, u8)> = None;
        for (idx, term) in terms.iter().enumerate() {
            let (op, start) = match *term {
                Term::Operator { op, start } => (op, start),
                Term::Value(_) => continue,
            };
            let right_is_ready = match terms.get(idx + 1) {
                Some(term) => term.is_value(),
                None => op.right_is_optional(),
            };
            if !right_is_ready {
                continue;
            }

            let is_prefix = idx == 0 || !terms[idx - 1].is_value();
            let precedence = if is_prefix {
                op.prefix_precedence()
            } else {
                op.precedence()
            };
            if selected.map_or(true, |(.., max)| precedence > max) {
                selected = Some((idx, op, start, precedence));
            }
        }
        selected.map(|(idx, op, start, _)| (idx, op, start))
    }

    fn reduce(&mut self, mut terms: Vec<Term<'r>>, start: usize) -> Result<Expr, CompileError> {
        while let Some((idx, op, op_start)) = Self::select_operator(&terms) {
            let has_left = idx > 0 && terms[idx - 1].is_value();
            let has_right = terms.get(idx + 1).map_or(false, Term::is_value);

            let right = if has_right {
                terms.remove(idx + 1).into_value()
            } else {
                default_operand(op, op.right().and_then(|spec| spec.default_value()), op_start)?
            };
            let (left, op_idx) = if has_left {
                (terms.remove(idx - 1).into_value(), idx - 1)
            } else {
                let default = op.left().and_then(|spec| spec.default_value());
                (default_operand(op, default, op_start)?, idx)
            };

            trace!("Reducing operator `{}` at {}", op.literal(), op_start);
            let call = Expr::Call {
                function: self.add_function(op.as_function()),
                args: vec![left, right],
            };
            terms[op_idx] = Term::Value(call);
        }

        let stuck_operator = terms.iter().find_map(|term| match *term {
            Term::Operator { op, start } => Some((op, start)),
            Term::Value(_) => None,
        });
        if let Some((op, start)) = stuck_operator {
            return Err(CompileError::MissingOperand {
                operator: op.literal().to_owned(),
                start,
            });
        }

        debug_assert!(terms.len() <= 1, "adjacent values must be multiplied");
        terms
            .pop()
            .map(Term::into_value)
            .ok_or(CompileError::EmptyExpression { start })
    }

    fn into_expr(self, root: Expr) -> CompiledExpr {
        CompiledExpr::new(root, self.functions, self.variables)
    }
}

fn parse_literal(literal: &str, start: usize) -> Result<Expr, CompileError> {
    literal
        .trim()
        .parse()
        .map(Expr::Const)
        .map_err(|_| CompileError::InvalidLiteral {
            literal: literal.to_owned(),
            start,
        })
}

fn default_operand(
    op: &Operator,
    default: Option<&str>,
    start: usize,
) -> Result<Expr, CompileError> {
    let default = default.ok_or_else(|| CompileError::MissingOperand {
        operator: op.literal().to_owned(),
        start,
    })?;
    parse_literal(default, start)
}

/// Compiles a parsed equation into an evaluator.
///
/// Compilation never fails outright. If `result` contains parsing errors, or the tree cannot
/// be reduced to a single expression, the returned evaluator holds the [`CompileError`].
/// Compilation does not re-parse the equation; it only reads the resolved tree.
///
/// # Examples
///
/// ```
/// use graphy_parser::parse;
/// use graphy_eval::{compile, CompileError};
///
/// let evaluator = compile(&parse("2 + 3 * 4"));
/// assert_eq!(evaluator.to_string(), "+(2, *(3, 4))");
/// assert_eq!(evaluator.evaluate(&[])?, 14.0);
///
/// let evaluator = compile(&parse("2 + * 4"));
/// assert_eq!(evaluator.error(), Some(&CompileError::ParseErrors { count: 1 }));
/// # Ok::<_, graphy_eval::EvalError>(())
/// ```
pub fn compile(result: &ParseResult<'_>) -> CompiledEvaluator {
    let equation = result.equation().to_owned();
    if !result.is_ok() {
        let err = CompileError::ParseErrors {
            count: result.errors().len(),
        };
        debug!("Skipped compiling `{}`: {}", equation, err);
        return CompiledEvaluator::new(equation, Err(err));
    }

    let mut compiler = Compiler::new(result.registry());
    compiler.collect_symbols(result.root());
    let compiled = compiler
        .compile_group(result.root().children(), 0)
        .map(|root| compiler.into_expr(root));

    match &compiled {
        Ok(expr) => debug!(
            "Compiled `{}` into `{}` with {} variable(s)",
            equation,
            expr,
            expr.variables().len()
        ),
        Err(err) => debug!("Failed compiling `{}`: {}", equation, err),
    }
    CompiledEvaluator::new(equation, compiled)
}

/// Compilation-related extensions for parse results.
pub trait CompilerExt {
    /// Returns free variables of the equation in the order of their first occurrence.
    fn free_variables(&self) -> Vec<&str>;

    /// Compiles the equation. This is equivalent to calling [`compile()`].
    fn compile(&self) -> CompiledEvaluator;
}

impl CompilerExt for ParseResult<'_> {
    fn free_variables(&self) -> Vec<&str> {
        let mut variables = vec![];
        self.root().visit(&mut |part| {
            if let Some(Symbol::Variable(var)) = part.symbol() {
                if !variables.contains(&var.literal()) {
                    variables.push(var.literal());
                }
            }
        });
        variables
    }

    fn compile(&self) -> CompiledEvaluator {
        compile(self)
    }
}
