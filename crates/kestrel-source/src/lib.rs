pub use text_size::{TextRange, TextSize};

/// Opaque handle to a source file in the analysis session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

/// Opaque handle to a module (a compilation target grouping source files).
///
/// Import resolution happens relative to a module: qualified paths are
/// resolved against its root, and visibility checks compare the declaring
/// module with the importing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub u32);

/// A span within a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub file: FileId,
    pub range: TextRange,
}

impl Span {
    pub fn new(file: FileId, range: TextRange) -> Self {
        Self { file, range }
    }

    /// Zero-length span at the start of `file`.
    ///
    /// Used by tests and by synthetic directives that have no source
    /// position of their own.
    pub fn detached(file: FileId) -> Self {
        Self {
            file,
            range: TextRange::empty(TextSize::from(0)),
        }
    }
}
