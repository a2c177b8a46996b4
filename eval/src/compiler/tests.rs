use assert_matches::assert_matches;
use graphy_parser::{parse, parse_with, ArgSpec, Binary, Operator, SymbolRegistry, Variable};

use super::*;

fn compiled(equation: &str) -> CompiledEvaluator {
    let evaluator = compile(&parse(equation));
    assert!(
        evaluator.is_compiled(),
        "{}: {:?}",
        equation,
        evaluator.error()
    );
    evaluator
}

#[test]
fn operator_precedence() {
    assert_eq!(compiled("2+3*4").to_string(), "+(2, *(3, 4))");
    assert_eq!(compiled("2*3+4").to_string(), "+(*(2, 3), 4)");
    assert_eq!(compiled("(2+3)*4").to_string(), "*(+(2, 3), 4)");
    assert_eq!(compiled("2^3*4").to_string(), "*(^(2, 3), 4)");
    assert_eq!(compiled("8/4%3").to_string(), "%(/(8, 4), 3)");
}

#[test]
fn same_precedence_is_left_associative() {
    assert_eq!(compiled("1-2-3").to_string(), "-(-(1, 2), 3)");
    assert_eq!(compiled("8/4*2").to_string(), "*(/(8, 4), 2)");
    assert_eq!(compiled("2^3^2").to_string(), "^(^(2, 3), 2)");
}

#[test]
fn prefix_operators() {
    assert_eq!(compiled("-x").to_string(), "-(0, x)");
    assert_eq!(compiled("+x").to_string(), "+(0, x)");
    assert_eq!(compiled("-x^2").to_string(), "-(0, ^(x, 2))");
    assert_eq!(compiled("2^-x*3").to_string(), "*(^(2, -(0, x)), 3)");
    assert_eq!(compiled("3*-x").to_string(), "*(3, -(0, x))");
    assert_eq!(compiled("--x").to_string(), "-(0, -(0, x))");
}

#[test]
fn implicit_multiplication() {
    assert_eq!(compiled("2x").to_string(), "*(2, x)");
    assert_eq!(compiled("3(x+1)").to_string(), "*(3, +(x, 1))");
    assert_eq!(compiled("(x)(y)").to_string(), "*(x, y)");
    assert_eq!(compiled("2xy").to_string(), "*(*(2, x), y)");
    assert_eq!(compiled("1/2x").to_string(), "*(/(1, 2), x)");
    assert_eq!(compiled("2x^2").to_string(), "*(2, ^(x, 2))");
    assert_eq!(compiled("5abs(x)").to_string(), "*(5, abs(x))");
}

#[test]
fn implicit_multiplication_at_every_level() {
    let evaluator = compiled("max(2x, 3(y)(x))");
    assert_eq!(evaluator.to_string(), "max(*(2, x), *(*(3, y), x))");
    assert_eq!(evaluator.variables(), ["x", "y"]);
}

#[test]
fn constants_and_folded_numbers() {
    assert_eq!(compiled("-5").to_string(), "-5");
    assert_eq!(compiled("2pi").to_string(), "*(2, 3.141592653589793)");
    assert_eq!(compiled("((7))").to_string(), "7");
    assert_eq!(compiled(".5").to_string(), "0.5");
}

#[test]
fn default_arguments_are_substituted() {
    assert_eq!(compiled("log(100)").to_string(), "log(100, 10)");
    assert_eq!(compiled("log(8, 2)").to_string(), "log(8, 2)");
    assert_eq!(compiled("min(x)").to_string(), "min(x)");
}

#[test]
fn lookup_table_contents() {
    let evaluator = compiled("x + sin(x) - 1");
    let functions: Vec<_> = evaluator.expr().unwrap().functions().collect();
    assert_eq!(functions, ["+", "sin", "-", "*"]);

    let evaluator = compiled("2 * x");
    let functions: Vec<_> = evaluator.expr().unwrap().functions().collect();
    assert_eq!(functions, ["*"]);
}

#[test]
fn variables_in_first_occurrence_order() {
    let evaluator = compiled("y + 2x - Y");
    assert_eq!(evaluator.variables(), ["y", "x"]);
    assert_eq!(parse("y + 2x - Y").free_variables(), ["y", "x"]);
    assert_matches!(
        evaluator.expr().unwrap().root(),
        Expr::Call { args, .. } if args[1] == Expr::Var(0)
    );
}

#[test]
fn parse_errors_block_compilation() {
    let evaluator = compile(&parse("*5 qq"));
    assert_eq!(
        evaluator.error(),
        Some(&CompileError::ParseErrors { count: 2 })
    );
    assert!(evaluator.variables().is_empty());
    assert!(evaluator.expr().is_none());
    assert!(evaluator.to_string().starts_with("<not compiled"));
}

#[test]
fn empty_expressions() {
    let evaluator = compile(&parse(""));
    assert_eq!(
        evaluator.error(),
        Some(&CompileError::EmptyExpression { start: 0 })
    );

    let evaluator = compile(&parse("2 + ()"));
    assert_eq!(
        evaluator.error(),
        Some(&CompileError::EmptyExpression { start: 4 })
    );
}

#[test]
fn missing_multiplication_operator() {
    let registry = SymbolRegistry::builder()
        .operator(Operator::new(
            "+",
            "Addition",
            Binary::new(|x: f64, y: f64| x + y),
            10,
            ArgSpec::binary_operator(),
        ))
        .variable(Variable::new("t"))
        .build()
        .unwrap();

    let evaluator = compile(&parse_with(&registry, "t + 1"));
    assert_eq!(evaluator.to_string(), "+(t, 1)");
    let functions: Vec<_> = evaluator.expr().unwrap().functions().collect();
    assert_eq!(functions, ["+"]);

    let evaluator = compile(&parse_with(&registry, "2t"));
    assert_eq!(
        evaluator.error(),
        Some(&CompileError::MissingMultiplication { start: 1 })
    );
}

#[test]
fn arity_errors_block_compilation() {
    let registry = SymbolRegistry::builder()
        .function(Function::new(
            "hyp",
            "Hypotenuse",
            Binary::new(f64::hypot),
            vec![ArgSpec::required(), ArgSpec::required()],
        ))
        .build()
        .unwrap();

    // The arity error is caught by the parser.
    let result = parse_with(&registry, "hyp(3)");
    assert!(!result.is_ok());
    assert_matches!(
        compile(&result).error(),
        Some(CompileError::ParseErrors { count: 1 })
    );

    let result = parse_with(&registry, "hyp(3, 4)");
    assert_eq!(compile(&result).evaluate(&[]), Ok(5.0));
}
