use std::collections::HashMap;

use kestrel_ast::ImportDirective;
use smallvec::SmallVec;
use smol_str::SmolStr;

/// All wildcard (`import a.b.*`) directives of a file, declaration order
/// preserved.
///
/// Every wildcard import is a candidate for every name, so the per-name
/// lookup returns the whole index.
#[derive(Debug, Clone)]
pub struct AllUnderImports {
    imports: Box<[ImportDirective]>,
}

impl AllUnderImports {
    pub fn imports(&self) -> &[ImportDirective] {
        &self.imports
    }

    pub fn imports_for_name(&self, _name: &str) -> &[ImportDirective] {
        &self.imports
    }
}

/// All explicit/aliased directives of a file, indexed by imported name.
///
/// A name may be imported more than once (from different packages); the
/// per-name list keeps declaration order. Directives binding no name at
/// all (unparsable path, no alias) are kept in `imports` (full
/// membership) but excluded from the name index -- malformed imports are
/// a parser concern, not ours.
#[derive(Debug, Clone)]
pub struct AliasImports {
    imports: Box<[ImportDirective]>,
    by_name: HashMap<SmolStr, SmallVec<[u32; 1]>>,
}

impl AliasImports {
    pub fn imports(&self) -> &[ImportDirective] {
        &self.imports
    }

    pub fn imports_for_name(&self, name: &str) -> impl Iterator<Item = &ImportDirective> {
        self.by_name
            .get(name)
            .into_iter()
            .flatten()
            .map(|&idx| &self.imports[idx as usize])
    }
}

/// A file's import directives, partitioned by shape.
///
/// Every directive lands in exactly one partition, discriminated by
/// `is_all_under`. Construction is pure: it inspects syntactic shape only
/// and never resolves a path.
#[derive(Debug, Clone)]
pub struct IndexedImports {
    all_under: AllUnderImports,
    aliased: AliasImports,
}

impl IndexedImports {
    pub fn new(directives: &[ImportDirective]) -> Self {
        let all_under: Box<[ImportDirective]> = directives
            .iter()
            .filter(|d| d.is_all_under)
            .cloned()
            .collect();

        let aliased: Box<[ImportDirective]> = directives
            .iter()
            .filter(|d| !d.is_all_under)
            .cloned()
            .collect();
        let mut by_name: HashMap<SmolStr, SmallVec<[u32; 1]>> = HashMap::new();
        for (idx, directive) in aliased.iter().enumerate() {
            let Some(name) = directive.imported_name() else {
                continue; // parse error
            };
            by_name.entry(name.clone()).or_default().push(idx as u32);
        }

        Self {
            all_under: AllUnderImports { imports: all_under },
            aliased: AliasImports {
                imports: aliased,
                by_name,
            },
        }
    }

    pub fn all_under(&self) -> &AllUnderImports {
        &self.all_under
    }

    pub fn aliased(&self) -> &AliasImports {
        &self.aliased
    }

    /// Full membership: every directive of the file, aliased partition
    /// first, then wildcards.
    pub fn imports(&self) -> impl Iterator<Item = &ImportDirective> {
        self.aliased
            .imports()
            .iter()
            .chain(self.all_under.imports())
    }

    /// Directives that can bind `name`: explicit imports of that name in
    /// declaration order, followed by every wildcard directive.
    pub fn imports_for_name(&self, name: &str) -> SmallVec<[&ImportDirective; 2]> {
        self.aliased
            .imports_for_name(name)
            .chain(self.all_under.imports_for_name(name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.aliased.imports().len() + self.all_under.imports().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
