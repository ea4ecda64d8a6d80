use std::path::Path;

/// Renders the interactive prompt.
///
/// Shows just the marker when `cwd` is the home directory, otherwise the
/// marker followed by the absolute working directory.
pub fn render(marker: &str, cwd: &Path, home: Option<&str>) -> String {
    match home {
        Some(home) if !home.is_empty() && cwd == Path::new(home) => format!("{marker} > "),
        _ => format!("{marker} {} > ", cwd.display()),
    }
}

/// The prompt shown when the working directory can't be determined.
pub fn bare(marker: &str) -> String {
    format!("{marker} > ")
}
