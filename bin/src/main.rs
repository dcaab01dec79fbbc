use std::{fs, path::PathBuf, process::ExitCode};

use ast::{Error, ErrorPrinter};
use clap::Parser;
use interpreter::{Input, Interpreter, Output, StdInput, StdOutput};
use log::{debug, LevelFilter};

/// minilang runs a small imperative scripting language: variables, arithmetic,
/// conditionals, loops, and line-based console input and output.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script to run.
    file: PathBuf,

    /// Text placed between the arguments of a `print`.
    #[arg(long, default_value = " ")]
    separator: String,

    /// Print the token stream and exit.
    #[arg(long)]
    dump_tokens: bool,

    /// Print the parsed program and exit.
    #[arg(long, conflicts_with = "dump_tokens")]
    dump_ast: bool,

    /// Render errors without colors.
    #[arg(long)]
    no_color: bool,

    /// Log more; repeat for more detail. `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

const SUCCESS: u8 = 0;
const LANGUAGE_ERROR: u8 = 1;
const UNREADABLE_SOURCE: u8 = 2;

/// Exit status of one run and the text destined for stderr.
#[derive(Debug)]
struct Outcome {
    status: u8,
    stderr: String,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn dump_tokens(source: &str) -> Result<(), Error> {
    for token in parser::Lexer::new(source) {
        let token = token?;
        println!(
            "{}:{} {} {}",
            token.span.line, token.span.column, token.kind, token.text
        );
    }
    Ok(())
}

fn execute<O: Output, I: Input>(
    args: &Args,
    source: &str,
    output: O,
    input: I,
) -> Result<(), Error> {
    if args.dump_tokens {
        return dump_tokens(source);
    }

    let program = parser::parse(source)?;
    if args.dump_ast {
        println!("{program:#?}");
        return Ok(());
    }

    Interpreter::with_io(output, input).run(&program)
}

fn render(error: &Error, source: &str, colored: bool) -> String {
    let mut printer = if colored {
        ErrorPrinter::new(source)
    } else {
        ErrorPrinter::plain(source)
    };
    printer
        .format(error)
        .unwrap_or_else(|_| format!("{error}\n"))
}

fn run<O: Output, I: Input>(args: &Args, output: O, input: I) -> Outcome {
    let source = match fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(e) => {
            return Outcome {
                status: UNREADABLE_SOURCE,
                stderr: format!("Failed to read '{}': {e}\n", args.file.display()),
            }
        }
    };
    debug!("read {} bytes from {}", source.len(), args.file.display());

    match execute(args, &source, output, input) {
        Ok(()) => Outcome {
            status: SUCCESS,
            stderr: String::new(),
        },
        Err(error) => Outcome {
            status: LANGUAGE_ERROR,
            stderr: render(&error, &source, !args.no_color),
        },
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let output = StdOutput::with_separator(args.separator.as_str());
    let outcome = run(&args, output, StdInput);
    eprint!("{}", outcome.stderr);

    ExitCode::from(outcome.status)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use interpreter::{BufferOutput, ScriptedInput};

    use super::*;

    fn script(name: &str, source: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("minilang-{}-{name}.ml", std::process::id()));
        fs::write(&path, source).unwrap();
        path
    }

    fn run_script(name: &str, source: &str, input: &[&str]) -> Outcome {
        let path = script(name, source);
        let args = Args::parse_from(["minilang", "--no-color", path.to_str().unwrap()]);

        let outcome = run(
            &args,
            BufferOutput::default(),
            ScriptedInput::new(input.iter().copied()),
        );
        let _ = fs::remove_file(&path);
        outcome
    }

    #[test]
    fn arguments_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn successful_run_exits_cleanly() {
        let outcome = run_script("ok", "var n; input(n); print(n * 2);", &["21"]);

        assert_eq!(outcome.status, SUCCESS);
        assert_eq!(outcome.stderr, "");
    }

    #[test]
    fn runtime_error_is_reported() {
        let outcome = run_script("div", "var x = 1;\nprint(x / 0);\n", &[]);

        assert_eq!(outcome.status, LANGUAGE_ERROR);
        assert!(outcome.stderr.contains("Division By Zero"));
        assert!(outcome.stderr.contains("attempted to divide by zero"));
        assert!(outcome.stderr.contains("print(x / 0);"));
    }

    #[test]
    fn parse_error_at_end_of_input_is_reported() {
        let outcome = run_script("eof", "var x = 1", &[]);

        assert_eq!(outcome.status, LANGUAGE_ERROR);
        assert!(outcome.stderr.contains("Parse Error"));
        assert!(outcome
            .stderr
            .contains("expected ';' after variable declaration, found end of input"));
    }

    #[test]
    fn lex_error_is_reported() {
        let outcome = run_script("lex", "print('open);", &[]);

        assert_eq!(outcome.status, LANGUAGE_ERROR);
        assert!(outcome.stderr.contains("unterminated string literal"));
    }

    #[test]
    fn unreadable_source_is_a_harness_failure() {
        let mut path = std::env::temp_dir();
        path.push(format!("minilang-{}-missing.ml", std::process::id()));
        let args = Args::parse_from(["minilang", path.to_str().unwrap()]);

        let outcome = run(&args, BufferOutput::default(), ScriptedInput::default());

        assert_eq!(outcome.status, UNREADABLE_SOURCE);
        assert!(outcome.stderr.starts_with("Failed to read"));
    }
}
