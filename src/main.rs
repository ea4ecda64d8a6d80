use ash_shell::Interpreter;
use ash_shell::config::ShellConfig;
use ash_shell::error::report;
use argh::{EarlyExit, FromArgs};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process::ExitCode;

#[derive(FromArgs)]
/// A minimal command interpreter. Reads commands from the terminal, or from
/// BATCH_FILE when one is given.
struct Args {
    #[argh(positional, greedy)]
    /// file with one command per line, run without prompting
    batch_file: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("expected at most one batch file, got {0} arguments")]
    TooManyArguments(usize),

    #[error("invalid arguments: {0}")]
    Invalid(String),

    #[error("cannot open batch file {path}: {source}")]
    BatchFile {
        path: String,
        #[source]
        source: io::Error,
    },
}

fn parse_args() -> Result<Args, CliError> {
    let argv: Vec<String> = std::env::args().collect();
    let name = argv.first().map(String::as_str).unwrap_or("ash");
    let rest: Vec<&str> = argv.iter().skip(1).map(String::as_str).collect();

    match Args::from_args(&[name], &rest) {
        Ok(args) if args.batch_file.len() > 1 => {
            Err(CliError::TooManyArguments(args.batch_file.len()))
        }
        Ok(args) => Ok(args),
        Err(EarlyExit { output, status }) => match status {
            Ok(()) => {
                println!("{output}");
                std::process::exit(0);
            }
            Err(()) => Err(CliError::Invalid(output)),
        },
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut stderr = io::stderr();
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            report(&e, &mut stderr);
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut sh = Interpreter::new(ShellConfig::default());
    let code = match args.batch_file.first() {
        Some(path) => {
            let file = match File::open(path) {
                Ok(file) => file,
                Err(source) => {
                    let e = CliError::BatchFile {
                        path: path.clone(),
                        source,
                    };
                    report(&e, &mut stderr);
                    return Ok(ExitCode::FAILURE);
                }
            };
            log::debug!("running batch file {path}");
            let mut stdout = io::stdout();
            sh.run_batch(BufReader::new(file), &mut stdout, &mut stderr)
        }
        None => sh.repl(),
    };

    io::stdout().flush()?;
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
