//! Symbols the scanner resolves identifiers to: operators, functions, constants and variables.

use core::{fmt, num::ParseFloatError};
use std::{collections::HashSet, sync::Arc};

pub use self::native::{Binary, NativeFn, Ternary, Unary, Variadic};

pub(crate) mod native;

/// Type of a function argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum ArgType {
    /// Floating-point number.
    #[default]
    Numeric,
}

/// Declaration of a single argument of a [`Function`] or an [`Operator`].
///
/// An argument with a default value is optional; the default is substituted when the argument
/// is omitted. An argument marked as infinite absorbs all trailing arguments supplied to the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSpec {
    position: Option<usize>,
    default_value: Option<String>,
    infinite_args: bool,
    ty: ArgType,
}

impl ArgSpec {
    /// Creates a required numeric argument.
    pub const fn required() -> Self {
        Self {
            position: None,
            default_value: None,
            infinite_args: false,
            ty: ArgType::Numeric,
        }
    }

    /// Creates an optional numeric argument with the specified default literal.
    pub fn optional(default_value: impl Into<String>) -> Self {
        Self {
            default_value: Some(default_value.into()),
            ..Self::required()
        }
    }

    /// Creates an argument absorbing this and all following supplied arguments.
    pub const fn infinite() -> Self {
        Self {
            position: None,
            default_value: None,
            infinite_args: true,
            ty: ArgType::Numeric,
        }
    }

    /// Sets the 0-based position of this argument. By default, the position is the declaration
    /// order.
    #[must_use]
    pub const fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Sets the argument type.
    #[must_use]
    pub const fn with_type(mut self, ty: ArgType) -> Self {
        self.ty = ty;
        self
    }

    /// Single required argument.
    pub fn single() -> Vec<Self> {
        vec![Self::required()]
    }

    /// Two required arguments.
    pub fn pair() -> Vec<Self> {
        vec![Self::required(), Self::required()]
    }

    /// One required argument followed by any number of others.
    pub fn variadic() -> Vec<Self> {
        vec![Self::required(), Self::infinite()]
    }

    /// Operands of a binary-only operator such as `*`.
    pub fn binary_operator() -> Vec<Self> {
        Self::pair()
    }

    /// Operands of an operator that may be used in prefix position, such as `-`.
    /// The left operand defaults to `0`.
    pub fn prefix_operator() -> Vec<Self> {
        vec![Self::optional("0"), Self::required()]
    }

    /// Returns the 0-based position of this argument.
    pub fn position(&self) -> usize {
        self.position.unwrap_or(0)
    }

    /// Returns the default value literal, if any.
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Checks whether this argument may be omitted.
    pub fn is_optional(&self) -> bool {
        self.default_value.is_some()
    }

    /// Checks whether this argument absorbs all trailing arguments.
    pub fn is_infinite(&self) -> bool {
        self.infinite_args
    }

    /// Returns the argument type.
    pub fn arg_type(&self) -> ArgType {
        self.ty
    }
}

/// Function callable with the `name(arg, ...)` syntax.
#[derive(Clone)]
pub struct Function {
    literal: String,
    name: String,
    native: Arc<dyn NativeFn>,
    args: Vec<ArgSpec>,
}

impl fmt::Debug for Function {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Function")
            .field("literal", &self.literal)
            .field("name", &self.name)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl Function {
    /// Creates a function. Arguments without an explicit position take the lowest positions
    /// not claimed by [`ArgSpec::at()`], in the declaration order; arguments are then sorted
    /// by position.
    pub fn new(
        literal: impl Into<String>,
        name: impl Into<String>,
        native: impl NativeFn,
        args: Vec<ArgSpec>,
    ) -> Self {
        let mut args = args;
        let claimed: HashSet<_> = args.iter().filter_map(|arg| arg.position).collect();
        let mut free_positions = (0..).filter(|pos| !claimed.contains(pos));
        for arg in &mut args {
            if arg.position.is_none() {
                arg.position = free_positions.next();
            }
        }
        args.sort_by_key(ArgSpec::position);

        Self {
            literal: literal.into(),
            name: name.into(),
            native: Arc::new(native),
            args,
        }
    }

    /// Returns the text form of this function.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Returns the human-readable name of this function.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns argument declarations sorted by position.
    pub fn args(&self) -> &[ArgSpec] {
        &self.args
    }

    /// Returns the native operation backing this function.
    pub fn native(&self) -> &Arc<dyn NativeFn> {
        &self.native
    }

    /// Number of arguments that must be supplied to a call.
    pub fn required_args(&self) -> usize {
        self.args
            .iter()
            .filter(|arg| !arg.is_optional() && !arg.is_infinite())
            .count()
    }

    /// Maximum number of arguments a call accepts, or `None` if unbounded.
    pub fn max_args(&self) -> Option<usize> {
        if self.args.iter().any(ArgSpec::is_infinite) {
            None
        } else {
            Some(self.args.len())
        }
    }

    /// Invokes the native operation.
    pub fn call(&self, args: &[f64]) -> f64 {
        self.native.evaluate(args)
    }
}

/// Binary operator such as `+` or `^`. Each operator is also a [`Function`] with 2 arguments
/// (the left and right operands), but it cannot be called with the parentheses syntax.
#[derive(Debug, Clone)]
pub struct Operator {
    function: Function,
    precedence: u8,
    prefix_precedence: Option<u8>,
}

impl Operator {
    /// Creates an operator. Higher `precedence` binds tighter.
    pub fn new(
        literal: impl Into<String>,
        name: impl Into<String>,
        native: impl NativeFn,
        precedence: u8,
        args: Vec<ArgSpec>,
    ) -> Self {
        Self {
            function: Function::new(literal, name, native, args),
            precedence,
            prefix_precedence: None,
        }
    }

    /// Sets the precedence used when the operator has no left operand (e.g., unary minus).
    #[must_use]
    pub fn with_prefix_precedence(mut self, precedence: u8) -> Self {
        self.prefix_precedence = Some(precedence);
        self
    }

    /// Returns the function view of this operator.
    pub fn as_function(&self) -> &Function {
        &self.function
    }

    /// Returns the text form of this operator.
    pub fn literal(&self) -> &str {
        self.function.literal()
    }

    /// Returns the precedence index of this operator.
    pub fn precedence(&self) -> u8 {
        self.precedence
    }

    /// Returns the precedence used in prefix position. Defaults to [`Self::precedence()`].
    pub fn prefix_precedence(&self) -> u8 {
        self.prefix_precedence.unwrap_or(self.precedence)
    }

    /// Returns the declaration of the left operand.
    pub fn left(&self) -> Option<&ArgSpec> {
        self.function.args().first()
    }

    /// Returns the declaration of the right operand.
    pub fn right(&self) -> Option<&ArgSpec> {
        self.function.args().get(1)
    }

    /// Checks whether the left operand may be omitted.
    pub fn left_is_optional(&self) -> bool {
        self.left().map_or(false, ArgSpec::is_optional)
    }

    /// Checks whether the right operand may be omitted.
    pub fn right_is_optional(&self) -> bool {
        self.right().map_or(false, ArgSpec::is_optional)
    }
}

impl AsRef<Function> for Operator {
    fn as_ref(&self) -> &Function {
        &self.function
    }
}

/// Named constant substituted with a numeric literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    literal: String,
    expression: String,
}

impl Constant {
    /// Creates a constant.
    pub fn new(literal: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
            expression: expression.into(),
        }
    }

    /// Returns the text form of this constant.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Returns the numeric literal this constant stands for.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Parses the value of this constant.
    pub fn value(&self) -> Result<f64, ParseFloatError> {
        self.expression.trim().parse()
    }
}

/// Free variable of an equation, bound when the compiled equation is evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    literal: String,
}

impl Variable {
    /// Creates a variable.
    pub fn new(literal: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
        }
    }

    /// Returns the name of this variable.
    pub fn literal(&self) -> &str {
        &self.literal
    }
}

/// Entry of a [`SymbolRegistry`](crate::SymbolRegistry).
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Symbol {
    /// Binary operator.
    Operator(Operator),
    /// Callable function.
    Function(Function),
    /// Named constant.
    Constant(Constant),
    /// Free variable.
    Variable(Variable),
}

impl Symbol {
    /// Returns the text form of this symbol.
    pub fn literal(&self) -> &str {
        match self {
            Self::Operator(op) => op.literal(),
            Self::Function(function) => function.literal(),
            Self::Constant(constant) => constant.literal(),
            Self::Variable(var) => var.literal(),
        }
    }

    /// Returns the kind of this symbol.
    pub fn kind(&self) -> SymbolKind {
        match self {
            Self::Operator(_) => SymbolKind::Operator,
            Self::Function(_) => SymbolKind::Function,
            Self::Constant(_) => SymbolKind::Constant,
            Self::Variable(_) => SymbolKind::Variable,
        }
    }

    /// Returns the function view of this symbol. Operators are functions as well.
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Self::Operator(op) => Some(op.as_function()),
            Self::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Checks whether this symbol is a function callable with parentheses. Operators
    /// are not callable.
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_))
    }
}

impl From<Operator> for Symbol {
    fn from(value: Operator) -> Self {
        Self::Operator(value)
    }
}

impl From<Function> for Symbol {
    fn from(value: Function) -> Self {
        Self::Function(value)
    }
}

impl From<Constant> for Symbol {
    fn from(value: Constant) -> Self {
        Self::Constant(value)
    }
}

impl From<Variable> for Symbol {
    fn from(value: Variable) -> Self {
        Self::Variable(value)
    }
}

/// Kind of a parse tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Operator from the registry.
    Operator,
    /// Function from the registry.
    Function,
    /// Constant from the registry.
    Constant,
    /// Variable from the registry.
    Variable,
    /// Numeric literal.
    Number,
    /// Parenthesized group.
    Container,
    /// Comma separating function arguments.
    ArgSeparator,
    /// Single function argument.
    Arg,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Operator => "operator",
            Self::Function => "function",
            Self::Constant => "constant",
            Self::Variable => "variable",
            Self::Number => "number",
            Self::Container => "group",
            Self::ArgSeparator => "argument separator",
            Self::Arg => "argument",
        })
    }
}
