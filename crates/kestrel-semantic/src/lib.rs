pub mod descriptors;
pub mod import_resolver;
pub mod import_scope;
pub mod indexed_imports;
pub mod scopes;
pub mod storage;

pub use import_resolver::{
    ImportQueryKind, ImportResolver, ImportedMembersCheck, PathResolver, ScopeRef,
};
pub use import_scope::{FilteringKind, ImportScope};
pub use indexed_imports::IndexedImports;
pub use scopes::{EmptyScope, MemberScope, ResolutionScope};

#[cfg(test)]
mod tests;
