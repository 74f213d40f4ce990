use std::fmt;

use kestrel_source::Span;
use smol_str::SmolStr;

/// Identity of an import directive within its file.
///
/// Assigned by the parser in declaration order. The resolution engine keys
/// its per-directive caches on this, so two structurally identical
/// directives in one file stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DirectiveId(pub u32);

/// A dot-separated qualified path, e.g. `collections.maps.HashMap`.
///
/// Always non-empty: a directive whose path failed to parse carries
/// `None` instead of an empty `ImportPath`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportPath {
    segments: Box<[SmolStr]>,
}

impl ImportPath {
    /// Build a path from segments. Returns `None` for an empty segment
    /// list, which only arises from parser error recovery.
    pub fn new(segments: Vec<SmolStr>) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: segments.into_boxed_slice(),
        })
    }

    /// Parse a dotted string. Convenience for tests and fixtures.
    pub fn from_dotted(path: &str) -> Option<Self> {
        if path.is_empty() || path.split('.').any(str::is_empty) {
            return None;
        }
        Self::new(path.split('.').map(SmolStr::new).collect())
    }

    pub fn segments(&self) -> &[SmolStr] {
        &self.segments
    }

    /// The last segment: the name a non-aliased, non-wildcard import of
    /// this path binds.
    pub fn last_segment(&self) -> &SmolStr {
        self.segments.last().expect("ImportPath is non-empty")
    }

    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for ImportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}

/// A parsed import directive.
///
/// Immutable once parsed; the resolution engine only reads it. `path` is
/// `None` when the directive's path was syntactically malformed (parser
/// error recovery) -- such directives resolve to nothing but must never
/// make the engine fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportDirective {
    pub id: DirectiveId,
    pub path: Option<ImportPath>,
    /// `import a.b.*` -- brings every member of the path into scope.
    pub is_all_under: bool,
    /// Explicit alias: `import a.b.C as D`.
    pub alias: Option<SmolStr>,
    pub span: Span,
}

impl ImportDirective {
    /// The name this directive binds in the importing file.
    ///
    /// `None` for wildcard imports (they bind every member, not one name)
    /// and for alias-less directives with a malformed path. An alias binds
    /// its name even when the path failed to parse.
    pub fn imported_name(&self) -> Option<&SmolStr> {
        if self.is_all_under {
            return None;
        }
        if let Some(alias) = &self.alias {
            return Some(alias);
        }
        self.path.as_ref().map(ImportPath::last_segment)
    }
}
