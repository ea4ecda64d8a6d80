use std::collections::HashMap;
use std::env as stdenv;

use crate::search_path::SearchPath;

/// Mutable, user-level state the interpreter carries between lines.
///
/// The environment contains:
/// - `vars`: a snapshot of the process variables taken at start-up, consulted
///   first when `cd` expands `~` or `$NAME`.
/// - `search_path`: the directories searched for external commands.
///
/// The working directory is not mirrored here: `cd` changes the process
/// working directory, which children inherit.
#[derive(Debug, Clone)]
pub struct Environment {
    pub vars: HashMap<String, String>,
    pub search_path: SearchPath,
}

impl Environment {
    /// Capture the current process variables and start with `initial_path`.
    pub fn new(initial_path: Vec<String>) -> Self {
        Self {
            // Non-UTF-8 entries can't be named by `cd $NAME`, so they are skipped.
            vars: stdenv::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
            search_path: SearchPath::new(initial_path),
        }
    }

    /// Get the value of a variable.
    ///
    /// Looks up the key in `self.vars` first, falling back to `std::env::var`.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }

    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    pub fn home(&self) -> Option<String> {
        self.get_var("HOME")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = Environment {
            vars: HashMap::new(),
            search_path: SearchPath::new(Vec::new()),
        };

        // initially absent
        assert_eq!(env.get_var("ASH_SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "VALUE");
        assert_eq!(env.get_var("KEY"), Some("VALUE".to_string()));
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new(vec!["/bin".into()]);
        assert!(env.get_var("PATH").is_some());
        assert_eq!(env.search_path.current(), ["/bin"]);
    }
}
