use crate::builtin::{Cd, ExitFactory, Path};
use crate::command::{CommandFactory, ExecutableCommand, ExitCode, Flow};
use crate::config::ShellConfig;
use crate::env::Environment;
use crate::error::{self, report};
use crate::external::ExternalCommand;
use crate::{lexer, prompt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, BufRead, IsTerminal, Write};

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports the builtins defined in this crate.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal command interpreter that executes one line at a time.
///
/// Each line is tokenized and offered to the builtin factories in order; if
/// none claims it, the line is treated as an external command: redirection is
/// validated, the name is resolved against the search path, and the program is
/// run to completion before the next line is read.
///
/// Example
/// ```no_run
/// use ash_shell::Interpreter;
/// use ash_shell::command::Flow;
/// let mut sh = Interpreter::default();
/// let mut out = Vec::new();
/// sh.execute_line("path /bin /usr/bin", &mut out).unwrap();
/// assert_eq!(sh.execute_line("ls > listing.txt", &mut out).unwrap(), Flow::Continue);
/// ```
pub struct Interpreter {
    config: ShellConfig,
    env: Environment,
    builtins: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    pub fn new(config: ShellConfig) -> Self {
        let builtins: Vec<Box<dyn CommandFactory>> = vec![
            Box::new(ExitFactory {
                farewell: config.farewell.clone(),
            }),
            Box::new(Factory::<Cd>::default()),
            Box::new(Factory::<Path>::default()),
        ];
        Self {
            env: Environment::new(config.initial_path.clone()),
            config,
            builtins,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Executes a single raw line.
    ///
    /// Blank lines are a no-op. Errors are returned to the caller untouched; see
    /// [`Interpreter::handle_line`] for the reporting variant.
    pub fn execute_line(&mut self, line: &str, stdout: &mut dyn Write) -> error::Result<Flow> {
        let tokens = lexer::tokenize(line);
        let Some((name, args)) = tokens.split_first() else {
            return Ok(Flow::Continue);
        };
        log::debug!("tokens: {tokens:?}");

        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        for factory in &self.builtins {
            if let Some(cmd) = factory.try_create(&self.env, name, &args) {
                return cmd.execute(stdout, &mut self.env);
            }
        }

        let cmd = ExternalCommand::prepare(&tokens, &self.env.search_path)?;
        Box::new(cmd).execute(stdout, &mut self.env)
    }

    /// Executes a line and reports any failure on `stderr`.
    ///
    /// Errors never stop the interpreter; only `exit` yields [`Flow::Exit`].
    pub fn handle_line(
        &mut self,
        line: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Flow {
        match self.execute_line(line, stdout) {
            Ok(flow) => flow,
            Err(e) => {
                report(&e, stderr);
                Flow::Continue
            }
        }
    }

    /// Runs every line of `reader` in order without prompting.
    ///
    /// Returns the status the process should exit with: 0 after the last line
    /// or on `exit`.
    pub fn run_batch<R: BufRead>(
        &mut self,
        reader: R,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> ExitCode {
        self.run_lines(reader, false, stdout, stderr)
    }

    /// Interactive read-eval loop.
    ///
    /// Uses the line editor on a terminal; piped input is read line by line
    /// with the prompt written to stdout. Ends with status 0 at end of input or
    /// on `exit`.
    pub fn repl(&mut self) -> ExitCode {
        let mut stdout = io::stdout();
        let mut stderr = io::stderr();

        if !io::stdin().is_terminal() {
            return self.run_lines(io::stdin().lock(), true, &mut stdout, &mut stderr);
        }
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                report(&e, &mut stderr);
                return self.run_lines(io::stdin().lock(), true, &mut stdout, &mut stderr);
            }
        };

        loop {
            let prompt = self.prompt(&mut stderr);
            match rl.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        if let Err(e) = rl.add_history_entry(line.as_str()) {
                            log::debug!("history: {e}");
                        }
                    }
                    if let Flow::Exit(code) = self.handle_line(&line, &mut stdout, &mut stderr) {
                        return code;
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return 0,
                Err(ReadlineError::Io(e)) if e.kind() == io::ErrorKind::InvalidData => {
                    report(&e, &mut stderr);
                }
                Err(err) => {
                    report(&err, &mut stderr);
                    return 0;
                }
            }
        }
    }

    fn run_lines<R: BufRead>(
        &mut self,
        mut reader: R,
        show_prompt: bool,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> ExitCode {
        let mut buf = Vec::new();
        loop {
            if show_prompt {
                let prompt = self.prompt(stderr);
                let _ = stdout.write_all(prompt.as_bytes());
                let _ = stdout.flush();
            }
            let line = match read_raw_line(&mut reader, &mut buf) {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    // The source is unusable; treat it like end of input.
                    report(&e, stderr);
                    break;
                }
            };
            if line.is_empty() {
                continue;
            }
            if let Flow::Exit(code) = self.handle_line(&line, stdout, stderr) {
                return code;
            }
        }
        let _ = stdout.flush();
        0
    }

    fn prompt(&self, stderr: &mut dyn Write) -> String {
        match std::env::current_dir() {
            Ok(cwd) => prompt::render(
                &self.config.prompt_marker,
                &cwd,
                self.env.home().as_deref(),
            ),
            Err(e) => {
                report(&e, stderr);
                prompt::bare(&self.config.prompt_marker)
            }
        }
    }
}

/// Reads one line as raw bytes, without its terminator.
///
/// Bytes that aren't valid UTF-8 are replaced rather than rejected, so a bad
/// line still runs like any other. `None` means end of input.
fn read_raw_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

impl Default for Interpreter {
    /// Create an interpreter with the default configuration: search path
    /// `/bin` and the builtins `exit`, `cd` and `path`.
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}
