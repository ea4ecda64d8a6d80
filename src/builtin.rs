use crate::command::{CommandFactory, ExecutableCommand, Flow};
use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::interpreter::Factory;
use std::env;
use std::io::Write;

/// Built-in commands known to the interpreter at compile time.
///
/// Builtins run in-process and never spawn a child. A builtin recognized by
/// name but given the wrong number of arguments still counts as handled: the
/// factory hands back an [`InvalidArgs`] command that fails with a usage error.
pub(crate) trait BuiltinCommand: Sized {
    /// Accepted spellings of the command name, matched case-sensitively.
    fn names() -> &'static [&'static str];

    /// Short usage line, used in the log when argument parsing fails.
    fn usage() -> &'static str;

    /// Builds the command from its arguments, or `None` when the arity is wrong.
    fn from_args(args: &[&str]) -> Option<Self>;

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<Flow>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, env: &mut Environment) -> Result<Flow> {
        T::execute(*self, stdout, env)
    }
}

struct InvalidArgs {
    command: &'static str,
    usage: &'static str,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(self: Box<Self>, _stdout: &mut dyn Write, _env: &mut Environment) -> Result<Flow> {
        Err(ShellError::Usage {
            command: self.command,
            usage: self.usage,
        })
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        let command = *T::names().iter().find(|n| **n == name)?;
        Some(match T::from_args(args) {
            Some(cmd) => Box::new(cmd),
            None => Box::new(InvalidArgs {
                command,
                usage: T::usage(),
            }),
        })
    }
}

const EXIT_NAMES: &[&str] = &["exit", "EXIT"];

/// Terminate the interpreter after printing the farewell text.
pub struct Exit {
    pub farewell: String,
}

impl ExecutableCommand for Exit {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, _env: &mut Environment) -> Result<Flow> {
        stdout.write_all(self.farewell.as_bytes())?;
        stdout.flush()?;
        Ok(Flow::Exit(0))
    }
}

/// Factory for `exit` that knows which farewell text to print.
pub(crate) struct ExitFactory {
    pub farewell: String,
}

impl CommandFactory for ExitFactory {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        let command = *EXIT_NAMES.iter().find(|n| **n == name)?;
        if !args.is_empty() {
            return Some(Box::new(InvalidArgs {
                command,
                usage: "exit",
            }));
        }
        Some(Box::new(Exit {
            farewell: self.farewell.clone(),
        }))
    }
}

/// Change the current working directory.
///
/// `~` expands to `$HOME` and `$NAME` expands to the value of `NAME`; anything
/// else is used verbatim. Only whole-argument forms are expanded.
pub struct Cd {
    pub target: String,
}

impl Cd {
    fn resolve_target(&self, env: &Environment) -> Result<String> {
        if self.target == "~" {
            return env
                .home()
                .ok_or_else(|| ShellError::UnsetVariable("HOME".to_string()));
        }
        match self.target.strip_prefix('$') {
            Some(name) if !name.is_empty() => env
                .get_var(name)
                .ok_or_else(|| ShellError::UnsetVariable(name.to_string())),
            _ => Ok(self.target.clone()),
        }
    }
}

impl BuiltinCommand for Cd {
    fn names() -> &'static [&'static str] {
        &["cd"]
    }

    fn usage() -> &'static str {
        "cd <dir | ~ | $VAR>"
    }

    fn from_args(args: &[&str]) -> Option<Self> {
        match args {
            [target] => Some(Cd {
                target: target.to_string(),
            }),
            _ => None,
        }
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<Flow> {
        let path = self.resolve_target(env)?;
        log::debug!("cd: {} -> {}", self.target, path);
        env::set_current_dir(&path).map_err(|source| ShellError::ChangeDir { path, source })?;
        Ok(Flow::Continue)
    }
}

/// Replace the search path with the given directories, in order.
pub struct Path {
    pub dirs: Vec<String>,
}

impl BuiltinCommand for Path {
    fn names() -> &'static [&'static str] {
        &["path"]
    }

    fn usage() -> &'static str {
        "path [dir ...]"
    }

    fn from_args(args: &[&str]) -> Option<Self> {
        Some(Path {
            dirs: args.iter().map(|d| d.to_string()).collect(),
        })
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<Flow> {
        log::debug!("path: {:?}", self.dirs);
        env.search_path.reset(self.dirs);
        Ok(Flow::Continue)
    }
}
