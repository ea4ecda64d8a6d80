/// Ordered list of directories searched for external executables.
///
/// Duplicates and relative entries are kept as given; resolution simply walks
/// the list in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<String>,
}

impl SearchPath {
    pub fn new(dirs: Vec<String>) -> Self {
        Self { dirs }
    }

    /// Replaces the whole list. An empty list is allowed.
    pub fn reset(&mut self, dirs: Vec<String>) {
        self.dirs = dirs;
    }

    pub fn current(&self) -> &[String] {
        &self.dirs
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}
