//! Simple CLI / REPL for parsing, evaluating and sampling math equations.

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use log::{debug, LevelFilter};

use std::{
    collections::HashMap,
    io::{self, Read},
    process,
};

use graphy_eval::{compile, CompiledEvaluator};
use graphy_parser::{parse, ParseResult};

mod common;
mod repl;

use crate::{
    common::{color_choice, parse_var, Reporter, ERROR_EXIT_CODE},
    repl::repl,
};

const AFTER_HELP: &str = "\
EXIT CODES:
    0    Normal exit
    1    Invalid command-line option
    2    Parsing or evaluation error in non-interactive mode";

/// Exit code on invalid command-line options.
const USAGE_EXIT_CODE: i32 = 1;

/// CLI and REPL for parsing, evaluating and sampling math equations.
#[derive(Debug, Parser)]
#[command(name = "graphy", version, after_help = AFTER_HELP)]
struct Cli {
    /// Output debug logs. Logging can be configured in more detail with the `RUST_LOG` env var.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse the equation and output its tree together with errors and warnings.
    Tree {
        /// Equation to parse. If omitted, the equation will be read from stdin.
        equation: Option<String>,
    },
    /// Evaluate the equation once.
    Eval {
        /// Equation to evaluate. If omitted, the equation will be read from stdin.
        equation: Option<String>,
        /// Value of a free variable in the `NAME=VALUE` form, e.g., `x=2.5`.
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
        vars: Vec<(String, f64)>,
    },
    /// Sample a single-variable equation over an interval, outputting `(x, y)` rows.
    Sample {
        /// Equation to sample. If omitted, the equation will be read from stdin.
        equation: Option<String>,
        /// Start of the sampled interval.
        #[arg(long, default_value_t = -10.0, allow_negative_numbers = true)]
        from: f64,
        /// End of the sampled interval (inclusive).
        #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
        to: f64,
        /// Distance between sampled points.
        #[arg(long, default_value_t = 1.0)]
        step: f64,
    },
    /// Launch the interactive REPL.
    Repl,
}

fn read_equation(equation: Option<String>) -> io::Result<String> {
    match equation {
        Some(equation) => Ok(equation),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer.trim_end().to_owned())
        }
    }
}

impl Command {
    /// Runs the command, returning `false` if the equation could not be handled.
    fn run(self) -> anyhow::Result<bool> {
        let reporter = Reporter::new(color_choice());
        match self {
            Self::Tree { equation } => {
                let result = parse(&read_equation(equation)?);
                print!("{}", result.root());
                reporter.report_parse_result(&result)
            }
            Self::Eval { equation, vars } => {
                let result = parse(&read_equation(equation)?);
                let Some(evaluator) = Self::compile(&reporter, &result)? else {
                    return Ok(false);
                };
                let vars: HashMap<_, _> = vars.into_iter().collect();
                match evaluator.evaluate_with(&vars) {
                    Ok(value) => {
                        println!("{}", value);
                        Ok(true)
                    }
                    Err(err) => {
                        reporter.report_eval_error(evaluator.equation(), &err)?;
                        Ok(false)
                    }
                }
            }
            Self::Sample {
                equation,
                from,
                to,
                step,
            } => {
                let result = parse(&read_equation(equation)?);
                let Some(evaluator) = Self::compile(&reporter, &result)? else {
                    return Ok(false);
                };
                match evaluator.sample(from..=to, step) {
                    Ok(points) => {
                        for (x, y) in points {
                            println!("({}, {})", x, y);
                        }
                        Ok(true)
                    }
                    Err(err) => {
                        reporter.report_eval_error(evaluator.equation(), &err)?;
                        Ok(false)
                    }
                }
            }
            Self::Repl => {
                repl(&reporter).context("REPL failed")?;
                Ok(true)
            }
        }
    }

    fn compile(
        reporter: &Reporter,
        result: &ParseResult<'_>,
    ) -> anyhow::Result<Option<CompiledEvaluator>> {
        if !reporter.report_parse_result(result)? {
            return Ok(None);
        }
        let evaluator = compile(result);
        if let Some(err) = evaluator.error() {
            reporter.report_compile_error(evaluator.equation(), err)?;
            return Ok(None);
        }
        debug!("Compiled evaluator: {}", evaluator);
        Ok(Some(evaluator))
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let exit_code = if err.use_stderr() { USAGE_EXIT_CODE } else { 0 };
            err.print()?;
            process::exit(exit_code);
        }
    };
    init_logging(cli.verbose);

    if !cli.command.run()? {
        process::exit(ERROR_EXIT_CODE);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parsing_subcommands() {
        let cli = Cli::try_parse_from(["graphy", "eval", "x + y", "--var", "x=1", "--var", "y=2"])
            .unwrap();
        assert_matches!(
            cli.command,
            Command::Eval { equation: Some(eq), vars } if eq == "x + y" && vars.len() == 2
        );

        let cli = Cli::try_parse_from([
            "graphy", "sample", "x^2", "--from", "-1", "--to", "1", "--step", "0.5",
        ])
        .unwrap();
        assert_matches!(
            cli.command,
            Command::Sample { from, to, step, .. } if from == -1.0 && to == 1.0 && step == 0.5
        );

        let cli = Cli::try_parse_from(["graphy", "-v", "tree", "2x"]).unwrap();
        assert!(cli.verbose);
        assert_matches!(cli.command, Command::Tree { equation: Some(_) });
    }

    #[test]
    fn invalid_options_are_rejected() {
        let err = Cli::try_parse_from(["graphy", "eval", "x", "--var", "x"]).unwrap_err();
        assert!(err.use_stderr());
        let err = Cli::try_parse_from(["graphy", "frobnicate"]).unwrap_err();
        assert!(err.use_stderr());
    }
}
