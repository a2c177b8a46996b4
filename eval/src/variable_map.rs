//! `VariableMap` trait and implementations.

use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

/// Encapsulates read access to named variable values.
///
/// # Examples
///
/// ```
/// use graphy_parser::parse;
/// use graphy_eval::{compile, VariableMap};
/// # use std::collections::HashMap;
///
/// let evaluator = compile(&parse("x + 2y"));
/// let vars = [("x", 1.0), ("y", 3.0)];
/// assert_eq!(evaluator.evaluate_with(&vars)?, 7.0);
///
/// let vars: HashMap<_, _> = [("x".to_owned(), 0.5)].into_iter().collect();
/// assert_eq!(vars.get_variable("x"), Some(0.5));
/// assert!(evaluator.evaluate_with(&vars).is_err());
/// # Ok::<_, graphy_eval::EvalError>(())
/// ```
pub trait VariableMap {
    /// Returns value of the named variable, or `None` if it is not defined.
    fn get_variable(&self, name: &str) -> Option<f64>;
}

impl<S: BuildHasher> VariableMap for HashMap<String, f64, S> {
    fn get_variable(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl VariableMap for BTreeMap<String, f64> {
    fn get_variable(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl VariableMap for [(&str, f64)] {
    fn get_variable(&self, name: &str) -> Option<f64> {
        self.iter()
            .find_map(|&(var_name, value)| (var_name == name).then_some(value))
    }
}

impl<const N: usize> VariableMap for [(&str, f64); N] {
    fn get_variable(&self, name: &str) -> Option<f64> {
        self.as_slice().get_variable(name)
    }
}
