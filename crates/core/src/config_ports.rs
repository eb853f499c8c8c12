//! Configuration provider port

use caledit_domain::EditorConfig;

/// Source of the editor configuration.
///
/// The engine reads one snapshot at the start of each pass; changes made
/// while a pass runs only become visible to the next one.
pub trait ConfigProvider: Send + Sync {
    /// Return a consistent copy of the current configuration.
    fn snapshot(&self) -> EditorConfig;
}

/// A fixed configuration is its own provider.
impl ConfigProvider for EditorConfig {
    fn snapshot(&self) -> EditorConfig {
        self.clone()
    }
}
