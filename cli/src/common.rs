//! Common utils.

use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    files::SimpleFile,
    term::termcolor::{ColorChoice, StandardStream, WriteColor},
    term::{emit, Config as ReportingConfig},
};
use is_terminal::IsTerminal;

use std::{io, iter, ops::Range};

use graphy_eval::{CompileError, EvalError};
use graphy_parser::{ErrorCategory, ParseResult};

/// Exit code on parsing or evaluation error.
pub const ERROR_EXIT_CODE: i32 = 2;

/// Name of the pseudo-file the equation is reported from.
const FILE_NAME: &str = "equation";

/// Chooses whether to color output written to stderr.
pub fn color_choice() -> ColorChoice {
    if io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Converts a range measured in chars into a byte range within `text`.
pub fn byte_range(text: &str, start: usize, len: usize) -> Range<usize> {
    let mut offsets = text
        .char_indices()
        .map(|(idx, _)| idx)
        .chain(iter::once(text.len()));
    let byte_start = offsets.nth(start).unwrap_or(text.len());
    let byte_end = if len == 0 {
        byte_start
    } else {
        offsets.nth(len - 1).unwrap_or(text.len())
    };
    byte_start..byte_end
}

/// Parses a variable assignment in the `NAME=VALUE` form.
pub fn parse_var(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected `NAME=VALUE`, got `{}`", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("variable name is empty".to_owned());
    }
    let value = value
        .trim()
        .parse()
        .map_err(|err| format!("invalid value for `{}`: {}", name, err))?;
    Ok((name.to_owned(), value))
}

fn error_code(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::Identifier => "IDENT",
        ErrorCategory::OperatorArgs => "OP_ARGS",
        ErrorCategory::FunctionArgs => "FN_ARGS",
        ErrorCategory::Structural => "STRUCT",
        ErrorCategory::NumericLiteral => "NUM",
    }
}

/// Converts errors and warnings of a parse result into diagnostics, errors first.
pub fn parse_diagnostics(result: &ParseResult<'_>) -> Vec<Diagnostic<()>> {
    let equation = result.equation();
    let errors = result.errors().iter().map(|err| {
        let range = byte_range(equation, err.start(), err.len());
        Diagnostic::error()
            .with_message(err.message())
            .with_code(error_code(err.kind().category()))
            .with_labels(vec![Label::primary((), range).with_message("Error occurred here")])
    });
    let warnings = result.warnings().iter().map(|warning| {
        let range = byte_range(equation, warning.start(), warning.len());
        Diagnostic::warning()
            .with_message(warning.message())
            .with_code("HINT")
            .with_labels(vec![Label::primary((), range)])
    });
    errors.chain(warnings).collect()
}

/// Converts a compilation error into a diagnostic. Returns `None` for errors
/// that are already covered by parsing diagnostics.
pub fn compile_diagnostic(equation: &str, err: &CompileError) -> Option<Diagnostic<()>> {
    if let CompileError::ParseErrors { .. } = err {
        return None;
    }
    let mut diagnostic = Diagnostic::error()
        .with_message(err.to_string())
        .with_code("COMPILE");
    if let Some(start) = err.start() {
        let range = byte_range(equation, start, 1);
        diagnostic =
            diagnostic.with_labels(vec![Label::primary((), range).with_message("Error occurred here")]);
    }
    Some(diagnostic)
}

/// Converts an evaluation error into a diagnostic.
pub fn eval_diagnostic(err: &EvalError) -> Diagnostic<()> {
    let diagnostic = Diagnostic::error()
        .with_message(err.to_string())
        .with_code("EVAL");
    match err {
        EvalError::UndefinedVariable(name) => diagnostic.with_notes(vec![format!(
            "Supply a value for the variable, e.g., `--var {}=1`",
            name
        )]),
        _ => diagnostic,
    }
}

/// Emitter of diagnostics for equations.
pub struct Reporter {
    writer: StandardStream,
    config: ReportingConfig,
}

impl Reporter {
    pub fn new(color_choice: ColorChoice) -> Self {
        Self {
            writer: StandardStream::stderr(color_choice),
            config: ReportingConfig::default(),
        }
    }

    pub fn report(&self, equation: &str, diagnostics: &[Diagnostic<()>]) -> anyhow::Result<()> {
        emit_all(&mut self.writer.lock(), &self.config, equation, diagnostics)
    }

    /// Reports all parsing diagnostics. Returns `true` if the result has no errors.
    pub fn report_parse_result(&self, result: &ParseResult<'_>) -> anyhow::Result<bool> {
        self.report(result.equation(), &parse_diagnostics(result))?;
        Ok(result.is_ok())
    }

    pub fn report_compile_error(&self, equation: &str, err: &CompileError) -> anyhow::Result<()> {
        if let Some(diagnostic) = compile_diagnostic(equation, err) {
            self.report(equation, &[diagnostic])?;
        }
        Ok(())
    }

    pub fn report_eval_error(&self, equation: &str, err: &EvalError) -> anyhow::Result<()> {
        self.report(equation, &[eval_diagnostic(err)])
    }
}

fn emit_all(
    writer: &mut dyn WriteColor,
    config: &ReportingConfig,
    equation: &str,
    diagnostics: &[Diagnostic<()>],
) -> anyhow::Result<()> {
    let file = SimpleFile::new(FILE_NAME, equation);
    for diagnostic in diagnostics {
        emit(writer, config, &file, diagnostic)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use codespan_reporting::{diagnostic::Severity, term::termcolor::Buffer};

    use graphy_eval::compile;
    use graphy_parser::parse;

    use super::*;

    #[test]
    fn parsing_vars() {
        assert_eq!(parse_var("x=2.5"), Ok(("x".to_owned(), 2.5)));
        assert_eq!(parse_var(" y = -1 "), Ok(("y".to_owned(), -1.0)));
        assert_matches!(parse_var("x"), Err(msg) if msg.contains("NAME=VALUE"));
        assert_matches!(parse_var("=1"), Err(msg) if msg.contains("empty"));
        assert_matches!(parse_var("x=abc"), Err(msg) if msg.contains("invalid value"));
    }

    #[test]
    fn converting_char_ranges() {
        assert_eq!(byte_range("2 + qz", 4, 2), 4..6);
        assert_eq!(byte_range("π + qz", 4, 2), 5..7);
        assert_eq!(byte_range("π + qz", 0, 1), 0..2);
        assert_eq!(byte_range("abc", 3, 0), 3..3);
        assert_eq!(byte_range("abc", 2, 5), 2..3);
        assert_eq!(byte_range("abc", 10, 1), 3..3);
    }

    #[test]
    fn diagnostics_for_parse_errors() {
        let result = parse("sinx + qz");
        let diagnostics = parse_diagnostics(&result);
        assert_eq!(diagnostics.len(), 3);

        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].code.as_deref(), Some("IDENT"));
        assert_eq!(diagnostics[1].message, "Identifier 'qz' not found");
        assert_eq!(diagnostics[1].labels[0].range, 7..9);

        let warning = &diagnostics[2];
        assert_eq!(warning.severity, Severity::Warning);
        assert_eq!(warning.message, "Did you mean to call function 'sin'?");
    }

    #[test]
    fn diagnostics_for_structural_errors() {
        let result = parse("(1 + 2");
        let diagnostics = parse_diagnostics(&result);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code.as_deref(), Some("STRUCT"));
    }

    #[test]
    fn compile_diagnostics() {
        let evaluator = compile(&parse("2 + qz"));
        let err = evaluator.error().unwrap();
        assert!(compile_diagnostic(evaluator.equation(), err).is_none());

        let evaluator = compile(&parse("2 + ()"));
        let err = evaluator.error().unwrap();
        let diagnostic = compile_diagnostic(evaluator.equation(), err).unwrap();
        assert_eq!(diagnostic.code.as_deref(), Some("COMPILE"));
        assert_eq!(diagnostic.labels[0].range, 4..5);
    }

    #[test]
    fn eval_diagnostics() {
        let diagnostic = eval_diagnostic(&EvalError::UndefinedVariable("y".to_owned()));
        assert_eq!(diagnostic.message, "Variable `y` is not bound");
        assert_matches!(diagnostic.notes.as_slice(), [note] if note.contains("--var y=1"));

        let diagnostic = eval_diagnostic(&EvalError::NotCompiled);
        assert!(diagnostic.notes.is_empty());
    }

    #[test]
    fn emitting_diagnostics() {
        let result = parse("2 * qz");
        let mut buffer = Buffer::no_color();
        let config = ReportingConfig::default();
        emit_all(&mut buffer, &config, result.equation(), &parse_diagnostics(&result)).unwrap();

        let output = String::from_utf8(buffer.into_inner()).unwrap();
        assert!(
            output.starts_with("error[IDENT]: Identifier 'qz' not found"),
            "{}",
            output
        );
        assert!(output.contains("equation:1:5"), "{}", output);
        assert!(output.contains("^^ Error occurred here"), "{}", output);
    }
}
