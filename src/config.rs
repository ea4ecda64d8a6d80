/// Start-up settings for an [`Interpreter`](crate::Interpreter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Search path in effect until the first `path` built-in runs.
    pub initial_path: Vec<String>,
    /// Leading word of the interactive prompt.
    pub prompt_marker: String,
    /// Text printed by `exit` before the interpreter terminates.
    pub farewell: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            initial_path: vec!["/bin".to_string()],
            prompt_marker: "ash".to_string(),
            farewell: "Nii Oye Kpakpo\nAggie Shell Project\n".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_farewell_is_the_project_banner() {
        let config = ShellConfig::default();
        assert_eq!(config.farewell, "Nii Oye Kpakpo\nAggie Shell Project\n");
        assert_eq!(config.initial_path, ["/bin"]);
    }
}
