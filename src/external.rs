use crate::command::{ExecutableCommand, ExitCode, Flow};
use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::redirection::{RedirectedCommand, parse_redirection};
use crate::search_path::SearchPath;
use std::ffi::CString;
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// Permission bits for files created by `>`: rw-r--r--.
const REDIRECT_MODE: libc::mode_t = 0o644;

/// Command that is not a builtin, resolved to a concrete executable.
#[derive(Debug)]
pub struct ExternalCommand {
    program: PathBuf,
    argv: Vec<String>,
    redirect: Option<String>,
}

impl ExternalCommand {
    /// Validates redirection syntax and resolves `tokens[0]` against `search_path`.
    ///
    /// Nothing is spawned and no file is touched here.
    pub fn prepare(tokens: &[String], search_path: &SearchPath) -> Result<Self> {
        let RedirectedCommand { argv, target } = parse_redirection(tokens)?;
        // parse_redirection never yields an empty command when an operator is present.
        let name = argv
            .first()
            .ok_or_else(|| ShellError::NotFound(String::new()))?;
        let program = find_executable(name, search_path.current())
            .ok_or_else(|| ShellError::NotFound(name.clone()))?;
        log::debug!("resolved {name} -> {}", program.display());
        Ok(Self {
            program,
            argv,
            redirect: target,
        })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    /// Spawns the program and blocks until it exits.
    ///
    /// Argument 0 is the command name as typed, not the resolved path. When a
    /// redirection target is set, the child opens it and moves it onto its
    /// standard output before the program image is replaced; the parent's own
    /// descriptors are left alone.
    pub fn spawn_and_wait(&self) -> Result<ExitCode> {
        let mut command = std::process::Command::new(&self.program);
        if let Some((arg0, rest)) = self.argv.split_first() {
            command.arg0(arg0).args(rest);
        }

        if let Some(target) = &self.redirect {
            let steps = redirect_stdout_steps(target)?;
            // SAFETY: the hook only issues open/dup2/close on data prepared in the
            // parent, all of which are async-signal-safe.
            unsafe {
                command.pre_exec(move || run_pre_exec(&steps));
            }
        }

        let mut child = command.spawn().map_err(|source| ShellError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;
        let pid = child.id();
        log::trace!("spawned {} as pid {pid}", self.program.display());

        let status = child
            .wait()
            .map_err(|source| ShellError::Wait { pid, source })?;
        let code = match status.code() {
            Some(x) => x,
            None => terminated_by_signal(status),
        };
        log::debug!("pid {pid} exited with {code}");
        Ok(code)
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, _env: &mut Environment) -> Result<Flow> {
        // Keep anything we printed ahead of the child's output.
        stdout.flush()?;
        self.spawn_and_wait()?;
        Ok(Flow::Continue)
    }
}

/// One action performed in the child between fork and exec.
#[derive(Debug)]
pub enum PreExecStep {
    /// Open `path` with `flags` and `mode`, remembering the new descriptor.
    Open {
        path: CString,
        flags: libc::c_int,
        mode: libc::mode_t,
    },
    /// Duplicate the opened descriptor onto `target`.
    DupOnto(RawFd),
    /// Close the originally opened descriptor.
    CloseOriginal,
}

/// The step list that sends standard output to `target`, truncating it.
pub fn redirect_stdout_steps(target: &str) -> Result<Vec<PreExecStep>> {
    let path = CString::new(target).map_err(|_| ShellError::ChildSetup(target.to_string()))?;
    Ok(vec![
        PreExecStep::Open {
            path,
            flags: libc::O_CREAT | libc::O_TRUNC | libc::O_WRONLY,
            mode: REDIRECT_MODE,
        },
        PreExecStep::DupOnto(libc::STDOUT_FILENO),
        PreExecStep::CloseOriginal,
    ])
}

fn run_pre_exec(steps: &[PreExecStep]) -> io::Result<()> {
    let mut opened: Option<RawFd> = None;
    for step in steps {
        match step {
            PreExecStep::Open { path, flags, mode } => {
                let fd = unsafe { libc::open(path.as_ptr(), *flags, libc::c_uint::from(*mode)) };
                if fd < 0 {
                    return Err(io::Error::last_os_error());
                }
                opened = Some(fd);
            }
            PreExecStep::DupOnto(target) => {
                let fd = opened.ok_or(io::ErrorKind::InvalidInput)?;
                if fd != *target && unsafe { libc::dup2(fd, *target) } < 0 {
                    return Err(io::Error::last_os_error());
                }
            }
            PreExecStep::CloseOriginal => {
                // Never close a descriptor that already is stdout.
                if let Some(fd) = opened.take().filter(|fd| *fd != libc::STDOUT_FILENO) {
                    unsafe { libc::close(fd) };
                }
            }
        }
    }
    Ok(())
}

/// Finds the first directory in `dirs` holding an executable `name`.
///
/// Candidates are `dir + "/" + name`, with the separator only added when `dir`
/// doesn't already end in one. First match wins.
pub fn find_executable(name: &str, dirs: &[String]) -> Option<PathBuf> {
    for dir in dirs {
        let mut candidate = dir.clone();
        if !candidate.is_empty() && !candidate.ends_with('/') {
            candidate.push('/');
        }
        candidate.push_str(name);

        let candidate = PathBuf::from(candidate);
        log::trace!("probing {}", candidate.display());
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

fn is_executable(path: &Path) -> bool {
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    unsafe { libc::access(c_path.as_ptr(), libc::X_OK) == 0 }
}

fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}
