use crate::traits::{FileSystem, Output, RealFileSystem, TerminalOutput};
#[cfg(test)]
use crate::traits::{MockFileSystem, MockOutput};
use std::sync::Arc;

/// Dependencies shared by every command
#[derive(Clone)]
pub struct Context {
    pub fs: Arc<dyn FileSystem>,
    pub output: Arc<dyn Output>,
}

impl Context {
    /// Context backed by the real filesystem and terminal
    pub fn new() -> Self {
        Self {
            fs: Arc::new(RealFileSystem),
            output: Arc::new(TerminalOutput),
        }
    }

    /// Context with specific implementations, for tests
    #[cfg(test)]
    pub fn test_with(fs: Arc<MockFileSystem>, output: Arc<MockOutput>) -> Self {
        Self { fs, output }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
