//! Parse tree produced by the scanner.

use core::{fmt, time::Duration};

use crate::{
    error::{ParserError, ParserWarning},
    symbols::{Function, Operator, Symbol, SymbolKind},
    SymbolRegistry,
};

/// Value a [`ParserPart`] resolves to.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub enum Member<'r> {
    /// Symbol from the registry.
    Symbol(&'r Symbol),
    /// Numeric literal; the number is the part literal.
    Number,
    /// Parenthesized group.
    Container,
    /// Comma between function arguments.
    ArgSeparator,
    /// Single function argument.
    Arg,
}

impl<'r> Member<'r> {
    /// Returns the kind of this member.
    pub fn kind(&self) -> SymbolKind {
        match self {
            Self::Symbol(symbol) => symbol.kind(),
            Self::Number => SymbolKind::Number,
            Self::Container => SymbolKind::Container,
            Self::ArgSeparator => SymbolKind::ArgSeparator,
            Self::Arg => SymbolKind::Arg,
        }
    }

    /// Returns the registry symbol, if any.
    pub fn symbol(&self) -> Option<&'r Symbol> {
        match *self {
            Self::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }
}

/// Node of the parse tree covering a contiguous span of the equation.
///
/// Children are ordered left to right. Function calls have [`Arg`](SymbolKind::Arg) children
/// interleaved with [`ArgSeparator`](SymbolKind::ArgSeparator)s; groups have their contents
/// as children.
#[derive(Debug, Clone)]
pub struct ParserPart<'r> {
    start: usize,
    literal: String,
    member: Member<'r>,
    arg_count: Option<usize>,
    children: Vec<ParserPart<'r>>,
}

impl<'r> ParserPart<'r> {
    pub(crate) fn new(start: usize, literal: String, member: Member<'r>) -> Self {
        Self {
            start,
            literal,
            member,
            arg_count: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }

    /// Returns the offset of the first char of this part in the original equation.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the offset after the last char of this part.
    pub fn end(&self) -> usize {
        self.start + self.literal.chars().count()
    }

    /// Returns the text of this part as written in the equation.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Returns what this part resolves to.
    pub fn member(&self) -> Member<'r> {
        self.member
    }

    /// Returns the kind of this part.
    pub fn kind(&self) -> SymbolKind {
        self.member.kind()
    }

    /// Returns the registry symbol of this part, if any.
    pub fn symbol(&self) -> Option<&'r Symbol> {
        self.member.symbol()
    }

    /// Returns the operator of this part, if it is an operator.
    pub fn operator(&self) -> Option<&'r Operator> {
        match self.symbol()? {
            Symbol::Operator(op) => Some(op),
            _ => None,
        }
    }

    /// Returns the function of this part, if it is a callable function.
    pub fn function(&self) -> Option<&'r Function> {
        match self.symbol()? {
            Symbol::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Number of operands or arguments actually supplied. Set during validation for operators
    /// and functions.
    pub fn arg_count(&self) -> Option<usize> {
        self.arg_count
    }

    pub(crate) fn set_arg_count(&mut self, count: usize) {
        self.arg_count = Some(count);
    }

    /// Returns child parts.
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }

    /// Iterates over the arguments of a function call.
    pub fn args(&self) -> impl Iterator<Item = &Self> + '_ {
        self.children
            .iter()
            .filter(|part| part.kind() == SymbolKind::Arg)
    }

    /// Checks whether this part is a function that has not yet received its argument list.
    pub(crate) fn is_unbound_call(&self) -> bool {
        self.function().is_some() && self.children.is_empty()
    }

    /// Visits this part and all its descendants in the depth-first pre-order.
    pub fn visit(&self, visitor: &mut impl FnMut(&Self)) {
        visitor(self);
        for child in &self.children {
            child.visit(visitor);
        }
    }

    fn fmt_indented(&self, formatter: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(
            formatter,
            "{:indent$}{} `{}` @{}",
            "",
            self.kind(),
            self.literal,
            self.start,
            indent = indent
        )?;
        if let Some(count) = self.arg_count {
            write!(formatter, " [{} arg(s)]", count)?;
        }
        writeln!(formatter)?;
        for child in &self.children {
            child.fmt_indented(formatter, indent + 2)?;
        }
        Ok(())
    }
}

/// Outputs an indented outline of the tree, one part per line.
impl fmt::Display for ParserPart<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(formatter, 0)
    }
}

/// Outcome of parsing a single equation.
///
/// Parsing never fails outright; all problems are recorded as [`errors()`](Self::errors) and
/// [`warnings()`](Self::warnings). Only an error-free result should be compiled.
#[derive(Debug, Clone)]
pub struct ParseResult<'r> {
    pub(crate) equation: String,
    pub(crate) root: ParserPart<'r>,
    pub(crate) errors: Vec<ParserError<'r>>,
    pub(crate) warnings: Vec<ParserWarning>,
    pub(crate) elapsed: Duration,
    pub(crate) registry: &'r SymbolRegistry,
}

impl<'r> ParseResult<'r> {
    /// Returns the original equation text.
    pub fn equation(&self) -> &str {
        &self.equation
    }

    /// Returns the root part, a group wrapping the entire equation.
    pub fn root(&self) -> &ParserPart<'r> {
        &self.root
    }

    /// Returns errors in the order they were encountered.
    pub fn errors(&self) -> &[ParserError<'r>] {
        &self.errors
    }

    /// Returns warnings in the order they were encountered.
    pub fn warnings(&self) -> &[ParserWarning] {
        &self.warnings
    }

    /// Returns the time spent parsing.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns the registry used to resolve symbols.
    pub fn registry(&self) -> &'r SymbolRegistry {
        self.registry
    }

    /// Checks whether parsing produced no errors. Warnings are allowed.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
