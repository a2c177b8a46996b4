//! Catalog of known symbols.

use once_cell::sync::Lazy;

use core::fmt;
use std::collections::HashMap;

use crate::symbols::{
    native, ArgSpec, Binary, Constant, Function, Operator, Symbol, Unary, Variable, Variadic,
};

/// Literal of the operator used for implicit multiplication.
pub const MULTIPLICATION: &str = "*";

/// Errors building a [`SymbolRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    /// Two symbols share the same literal (compared case-insensitively).
    DuplicateLiteral(String),
    /// A symbol has an empty literal.
    EmptyLiteral,
    /// A constant does not stand for a numeric literal.
    InvalidConstant {
        /// Constant literal.
        literal: String,
        /// Expression the constant stands for.
        expression: String,
    },
    /// The number of declared arguments does not match the arity of the native operation.
    ArityMismatch {
        /// Function or operator literal.
        literal: String,
        /// Number of declared arguments.
        declared: usize,
        /// Arity of the native operation.
        native: usize,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateLiteral(literal) => {
                write!(formatter, "Symbol '{}' is registered more than once", literal)
            }
            Self::EmptyLiteral => formatter.write_str("Symbol literal cannot be empty"),
            Self::InvalidConstant {
                literal,
                expression,
            } => write!(
                formatter,
                "Constant '{}' stands for '{}', which is not a number",
                literal, expression
            ),
            Self::ArityMismatch {
                literal,
                declared,
                native,
            } => write!(
                formatter,
                "'{}' declares {} argument(s), but its native operation takes {}",
                literal, declared, native
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Builder for a [`SymbolRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    symbols: Vec<Symbol>,
}

impl RegistryBuilder {
    /// Adds an operator.
    #[must_use]
    pub fn operator(mut self, op: Operator) -> Self {
        self.symbols.push(op.into());
        self
    }

    /// Adds a function.
    #[must_use]
    pub fn function(mut self, function: Function) -> Self {
        self.symbols.push(function.into());
        self
    }

    /// Adds a constant.
    #[must_use]
    pub fn constant(mut self, constant: Constant) -> Self {
        self.symbols.push(constant.into());
        self
    }

    /// Adds a variable.
    #[must_use]
    pub fn variable(mut self, var: Variable) -> Self {
        self.symbols.push(var.into());
        self
    }

    /// Adds all symbols from the iterator.
    #[must_use]
    pub fn symbols(mut self, symbols: impl IntoIterator<Item = Symbol>) -> Self {
        self.symbols.extend(symbols);
        self
    }

    fn check(symbol: &Symbol) -> Result<(), RegistryError> {
        if symbol.literal().is_empty() {
            return Err(RegistryError::EmptyLiteral);
        }

        match symbol {
            Symbol::Constant(constant) => {
                if constant.value().is_err() {
                    return Err(RegistryError::InvalidConstant {
                        literal: constant.literal().to_owned(),
                        expression: constant.expression().to_owned(),
                    });
                }
            }
            Symbol::Operator(op) => Self::check_arity(op.as_function())?,
            Symbol::Function(function) => Self::check_arity(function)?,
            Symbol::Variable(_) => { /* no checks */ }
        }
        Ok(())
    }

    fn check_arity(function: &Function) -> Result<(), RegistryError> {
        let declared = function.args().len();
        match function.native().arity() {
            Some(native) if function.max_args().is_some() && declared != native => {
                Err(RegistryError::ArityMismatch {
                    literal: function.literal().to_owned(),
                    declared,
                    native,
                })
            }
            _ => Ok(()),
        }
    }

    /// Builds the registry, checking that all literals are unique.
    pub fn build(self) -> Result<SymbolRegistry, RegistryError> {
        let mut by_literal = HashMap::with_capacity(self.symbols.len());
        let mut listing = Vec::with_capacity(self.symbols.len());

        for (idx, symbol) in self.symbols.iter().enumerate() {
            Self::check(symbol)?;
            let literal = symbol.literal().to_ascii_lowercase();
            if by_literal.insert(literal.clone(), idx).is_some() {
                return Err(RegistryError::DuplicateLiteral(literal));
            }
            listing.push((literal, idx));
        }
        // The sort is stable, so literals of equal length retain registration order.
        listing.sort_by_key(|(literal, _)| literal.chars().count());

        Ok(SymbolRegistry {
            symbols: self.symbols,
            by_literal,
            listing,
        })
    }
}

/// Immutable catalog of operators, functions, constants and variables known to the parser.
///
/// Lookups are case-insensitive. The registry also keeps a listing of all symbols sorted
/// by literal length, which the scanner uses for prefix search.
///
/// # Examples
///
/// ```
/// # use graphy_parser::{ArgSpec, Constant, Function, SymbolRegistry, Unary, Variable};
/// let registry = SymbolRegistry::builder()
///     .function(Function::new("neg", "Negation", Unary::new(|x: f64| -x), ArgSpec::single()))
///     .constant(Constant::new("g", "9.81"))
///     .variable(Variable::new("t"))
///     .build()?;
/// assert!(registry.get("NEG").is_some());
/// assert_eq!(registry.len(), 3);
/// # Ok::<_, graphy_parser::RegistryError>(())
/// ```
#[derive(Debug)]
pub struct SymbolRegistry {
    symbols: Vec<Symbol>,
    by_literal: HashMap<String, usize>,
    listing: Vec<(String, usize)>,
}

impl SymbolRegistry {
    /// Creates a builder for a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Returns the shared standard registry.
    pub fn standard() -> &'static Self {
        static STANDARD: Lazy<SymbolRegistry> = Lazy::new(|| {
            SymbolRegistry::builder()
                .symbols(standard_symbols())
                .build()
                .expect("standard symbols are valid")
        });
        &STANDARD
    }

    /// Looks up a symbol by its literal, ignoring case.
    pub fn get(&self, literal: &str) -> Option<&Symbol> {
        let idx = if literal.bytes().any(|byte| byte.is_ascii_uppercase()) {
            self.by_literal.get(&literal.to_ascii_lowercase())
        } else {
            self.by_literal.get(literal)
        };
        idx.map(|&idx| &self.symbols[idx])
    }

    /// Iterates over `(lowercase literal, symbol)` pairs sorted by the literal length.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Symbol)> + '_ {
        self.listing
            .iter()
            .map(move |(literal, idx)| (literal.as_str(), &self.symbols[*idx]))
    }

    /// Iterates over entries whose lowercase literal starts with `prefix`.
    /// Yielded entries borrow only the registry, not `prefix`.
    pub fn with_prefix<'s, 'p>(
        &'s self,
        prefix: &'p str,
    ) -> impl Iterator<Item = (&'s str, &'s Symbol)> + 'p
    where
        's: 'p,
    {
        self.entries()
            .filter(move |(literal, _)| literal.starts_with(prefix))
    }

    /// Returns the operator used for implicit multiplication, if registered.
    pub fn multiplication(&self) -> Option<&Operator> {
        match self.get(MULTIPLICATION)? {
            Symbol::Operator(op) => Some(op),
            _ => None,
        }
    }

    /// Returns the number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Checks whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

fn standard_symbols() -> Vec<Symbol> {
    let operators = [
        Operator::new(
            "+",
            "Addition",
            Binary::new(|x: f64, y: f64| x + y),
            10,
            ArgSpec::prefix_operator(),
        )
        .with_prefix_precedence(25),
        Operator::new(
            "-",
            "Subtraction",
            Binary::new(|x: f64, y: f64| x - y),
            10,
            ArgSpec::prefix_operator(),
        )
        .with_prefix_precedence(25),
        Operator::new(
            "*",
            "Multiplication",
            Binary::new(|x: f64, y: f64| x * y),
            20,
            ArgSpec::binary_operator(),
        ),
        Operator::new(
            "/",
            "Division",
            Binary::new(|x: f64, y: f64| x / y),
            20,
            ArgSpec::binary_operator(),
        ),
        Operator::new(
            "%",
            "Remainder",
            Binary::new(|x: f64, y: f64| x % y),
            20,
            ArgSpec::binary_operator(),
        ),
        Operator::new(
            "^",
            "Exponentiation",
            Binary::new(f64::powf),
            30,
            ArgSpec::binary_operator(),
        ),
    ];

    let functions = [
        Function::new("abs", "Absolute Value", Unary::new(f64::abs), ArgSpec::single()),
        Function::new("sin", "Sine", Unary::new(f64::sin), ArgSpec::single()),
        Function::new("cos", "Cosine", Unary::new(f64::cos), ArgSpec::single()),
        Function::new("tan", "Tangent", Unary::new(f64::tan), ArgSpec::single()),
        Function::new("sqrt", "Square Root", Unary::new(f64::sqrt), ArgSpec::single()),
        Function::new("ln", "Natural Logarithm", Unary::new(f64::ln), ArgSpec::single()),
        Function::new(
            "log",
            "Logarithm",
            Binary::new(f64::log),
            vec![ArgSpec::required(), ArgSpec::optional("10")],
        ),
        Function::new("min", "Min", Variadic::new(native::min), ArgSpec::variadic()),
        Function::new("max", "Max", Variadic::new(native::max), ArgSpec::variadic()),
    ];

    let constants = [
        Constant::new("e", "2.718281828459045"),
        Constant::new("pi", "3.141592653589793"),
    ];
    let variables = [Variable::new("x"), Variable::new("y")];

    let operators = operators.into_iter().map(Symbol::from);
    let functions = functions.into_iter().map(Symbol::from);
    let constants = constants.into_iter().map(Symbol::from);
    let variables = variables.into_iter().map(Symbol::from);
    operators
        .chain(functions)
        .chain(constants)
        .chain(variables)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SymbolKind;

    use assert_matches::assert_matches;

    #[test]
    fn standard_registry_contents() {
        let registry = SymbolRegistry::standard();
        assert_eq!(registry.len(), 19);

        let kinds: Vec<_> = ["+", "abs", "E", "X"]
            .iter()
            .map(|literal| registry.get(literal).unwrap().kind())
            .collect();
        assert_eq!(
            kinds,
            [
                SymbolKind::Operator,
                SymbolKind::Function,
                SymbolKind::Constant,
                SymbolKind::Variable
            ]
        );

        let mul = registry.multiplication().unwrap();
        assert_eq!(mul.precedence(), 20);
        assert!(!mul.left_is_optional());
    }

    #[test]
    fn precedence_table() {
        let registry = SymbolRegistry::standard();
        let precedence = |literal: &str| match registry.get(literal) {
            Some(Symbol::Operator(op)) => op.precedence(),
            other => panic!("Unexpected symbol: {:?}", other),
        };

        assert!(precedence("^") > precedence("*"));
        assert_eq!(precedence("*"), precedence("/"));
        assert_eq!(precedence("*"), precedence("%"));
        assert!(precedence("*") > precedence("+"));
        assert_eq!(precedence("+"), precedence("-"));
    }

    #[test]
    fn listing_is_sorted_by_length() {
        let registry = SymbolRegistry::standard();
        let lengths: Vec<_> = registry.entries().map(|(literal, _)| literal.len()).collect();
        let mut sorted = lengths.clone();
        sorted.sort_unstable();
        assert_eq!(lengths, sorted);
    }

    #[test]
    fn prefix_search() {
        let registry = SymbolRegistry::standard();
        let literals: Vec<_> = registry.with_prefix("s").map(|(literal, _)| literal).collect();
        assert_eq!(literals, ["sin", "sqrt"]);
        assert_eq!(registry.with_prefix("abs").count(), 1);
        assert_eq!(registry.with_prefix("q").count(), 0);
    }

    #[test]
    fn duplicate_literals_are_rejected() {
        let err = SymbolRegistry::builder()
            .variable(Variable::new("x"))
            .constant(Constant::new("X", "1"))
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateLiteral("x".to_owned()));
    }

    #[test]
    fn invalid_symbols_are_rejected() {
        let err = SymbolRegistry::builder()
            .variable(Variable::new(""))
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::EmptyLiteral);

        let err = SymbolRegistry::builder()
            .constant(Constant::new("c", "speed of light"))
            .build()
            .unwrap_err();
        assert_matches!(err, RegistryError::InvalidConstant { ref literal, .. } if literal == "c");

        let err = SymbolRegistry::builder()
            .function(Function::new(
                "hyp",
                "Hypotenuse",
                Binary::new(f64::hypot),
                ArgSpec::single(),
            ))
            .build()
            .unwrap_err();
        assert_matches!(
            err,
            RegistryError::ArityMismatch { declared: 1, native: 2, .. }
        );
    }
}
