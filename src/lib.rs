//! A minimal line-oriented command interpreter.
//!
//! Each input line is normalized, split into whitespace tokens, checked against
//! the built-in commands (`exit`, `cd`, `path`) and otherwise resolved against
//! the interpreter's search path and launched as a child process, optionally
//! with its standard output redirected to a file with `>`.
//!
//! The main entry point is [`Interpreter`], which owns the [`env::Environment`]
//! (including the search path) and executes lines one at a time. Lines can come
//! from an interactive editor ([`Interpreter::repl`]) or from any buffered
//! reader ([`Interpreter::run_batch`]).

mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
pub mod external;
mod interpreter;
pub mod lexer;
pub mod prompt;
pub mod redirection;
pub mod search_path;

/// Just a convenient re-export of the command interpreter.
///
/// See [`Interpreter`] for the high-level API.
pub use interpreter::Interpreter;
