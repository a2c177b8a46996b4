//! REPL for math equations.

use codespan_reporting::diagnostic::{Diagnostic, Label};
use log::debug;
use rustyline::{error::ReadlineError, DefaultEditor};

use std::{
    collections::BTreeMap,
    io::{self, Write},
};

use graphy_eval::compile;
use graphy_parser::parse;

use crate::common::{parse_var, Reporter};

const HELP: &str = "\
Enter an equation to evaluate it, e.g., `2x + sin(pi / 2)`.
Free variables are substituted with the values set with `.set`.

Commands:
    .set NAME=VALUE    Set the value of a variable
    .unset NAME        Remove the value of a variable
    .vars              List variable values
    .clear             Remove all variable values
    .tree EQUATION     Output the parse tree of the equation
    .help              Output this help";

/// Interactive session state.
#[derive(Debug, Default)]
struct Session {
    vars: BTreeMap<String, f64>,
}

impl Session {
    fn handle_line(
        &mut self,
        line: &str,
        reporter: &Reporter,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        let is_command = line
            .strip_prefix('.')
            .map_or(false, |rest| rest.starts_with(|ch: char| ch.is_ascii_alphabetic()));
        if is_command {
            self.handle_command(line, reporter, out)
        } else {
            Self::evaluate(&self.vars, line, reporter, out)
        }
    }

    fn handle_command(
        &mut self,
        line: &str,
        reporter: &Reporter,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        match command {
            ".help" => writeln!(out, "{}", HELP)?,
            ".vars" => {
                for (name, value) in &self.vars {
                    writeln!(out, "{} = {}", name, value)?;
                }
            }
            ".clear" => self.vars.clear(),
            ".set" => match parse_var(rest) {
                Ok((name, value)) => {
                    debug!("Setting variable `{}` to {}", name, value);
                    self.vars.insert(name, value);
                }
                Err(message) => {
                    let diagnostic = Diagnostic::error()
                        .with_message(message)
                        .with_code("CMD")
                        .with_labels(vec![Label::primary((), 0..line.len())]);
                    reporter.report(line, &[diagnostic])?;
                }
            },
            ".unset" => {
                self.vars.remove(rest);
            }
            ".tree" => {
                let result = parse(rest);
                write!(out, "{}", result.root())?;
                reporter.report_parse_result(&result)?;
            }
            _ => {
                let label = Label::primary((), 0..command.len())
                    .with_message("Use `.help` to find out commands");
                let diagnostic = Diagnostic::error()
                    .with_message("Unknown command")
                    .with_code("CMD")
                    .with_labels(vec![label]);
                reporter.report(line, &[diagnostic])?;
            }
        }
        Ok(())
    }

    fn evaluate(
        vars: &BTreeMap<String, f64>,
        equation: &str,
        reporter: &Reporter,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        let result = parse(equation);
        if !reporter.report_parse_result(&result)? {
            return Ok(());
        }
        let evaluator = compile(&result);
        if let Some(err) = evaluator.error() {
            reporter.report_compile_error(equation, err)?;
            return Ok(());
        }

        let unbound: Vec<_> = evaluator
            .variables()
            .iter()
            .filter(|name| vars.get(name.as_str()).is_none())
            .map(String::as_str)
            .collect();
        if unbound.is_empty() {
            match evaluator.evaluate_with(vars) {
                Ok(value) => writeln!(out, "{}", value)?,
                Err(err) => reporter.report_eval_error(equation, &err)?,
            }
        } else {
            writeln!(out, "{}", evaluator)?;
            writeln!(out, "Unbound variable(s): {}", unbound.join(", "))?;
        }
        Ok(())
    }
}

pub fn repl(reporter: &Reporter) -> anyhow::Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut session = Session::default();
    println!("graphy REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Enter `.help` for the list of commands");

    loop {
        match rl.readline(">>> ") {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                session.handle_line(&line, reporter, &mut io::stdout())?;
            }
            Err(ReadlineError::Interrupted) => {
                println!("Bye");
                break Ok(());
            }
            Err(ReadlineError::Eof) => break Ok(()),
            Err(err) => break Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use codespan_reporting::term::termcolor::ColorChoice;

    use super::*;

    fn run_lines(session: &mut Session, lines: &[&str]) -> String {
        let reporter = Reporter::new(ColorChoice::Never);
        let mut out = vec![];
        for line in lines {
            session.handle_line(line, &reporter, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn evaluating_constant_equations() {
        let mut session = Session::default();
        let output = run_lines(&mut session, &["2 + 3 * 4", "", "-5abs(-2) --3^2", ".5 + 1"]);
        assert_eq!(output, "14\n-1\n1.5\n");
    }

    #[test]
    fn setting_variables() {
        let mut session = Session::default();
        let output = run_lines(&mut session, &[".set x=3", ".set y = 0.5", "x^2 - 2xy", ".vars"]);
        assert_eq!(output, "6\nx = 3\ny = 0.5\n");

        let output = run_lines(&mut session, &[".unset y", "x + y"]);
        assert_eq!(output, "+(x, y)\nUnbound variable(s): y\n");

        let output = run_lines(&mut session, &[".clear", ".vars"]);
        assert_eq!(output, "");
        assert!(session.vars.is_empty());
    }

    #[test]
    fn invalid_input_produces_no_output() {
        let mut session = Session::default();
        let output = run_lines(&mut session, &["2 * qz", "(1 + 2", ".set x", ".what"]);
        assert_eq!(output, "");
        assert!(session.vars.is_empty());
    }

    #[test]
    fn outputting_tree() {
        let mut session = Session::default();
        let output = run_lines(&mut session, &[".tree 2x"]);
        assert_eq!(output, "group `2x` @0\n  number `2` @0\n  variable `x` @1\n");
    }

    #[test]
    fn outputting_help() {
        let mut session = Session::default();
        let output = run_lines(&mut session, &[".help"]);
        assert!(output.contains(".set NAME=VALUE"));
    }
}
