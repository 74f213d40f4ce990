mod filtering;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use kestrel_ast::{DirectiveId, ImportDirective, ImportPath};
use kestrel_source::{FileId, ModuleId, Span, TextRange, TextSize};
use smol_str::SmolStr;

use crate::descriptors::{
    ClassifierDescriptor, ClassifierKind, DeclId, FunctionDescriptor, PackageDescriptor,
    VariableDescriptor, Visibility,
};
use crate::import_resolver::{PathResolver, ScopeRef};
use crate::scopes::MemberScope;

/// The module under analysis in all tests.
pub(super) const HOME: ModuleId = ModuleId(0);
/// Some other module, for visibility checks.
pub(super) const OTHER: ModuleId = ModuleId(1);

/// Path resolver over a fixed path -> scope table, with a resolution
/// counter so tests can observe how many underlying resolutions ran.
pub(super) struct FixturePaths {
    scopes: HashMap<String, ScopeRef>,
    resolutions: AtomicUsize,
}

impl FixturePaths {
    pub(super) fn new() -> Self {
        Self {
            scopes: HashMap::new(),
            resolutions: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub(super) fn with(mut self, path: &str, scope: MemberScope) -> Self {
        self.scopes.insert(path.to_owned(), Arc::new(scope));
        self
    }

    pub(super) fn resolution_count(&self) -> usize {
        self.resolutions.load(Ordering::SeqCst)
    }
}

impl PathResolver for FixturePaths {
    fn resolve(&self, path: &ImportPath, _from: ModuleId) -> Option<ScopeRef> {
        self.resolutions.fetch_add(1, Ordering::SeqCst);
        self.scopes.get(&path.dotted()).cloned()
    }
}

/// Directive with a span starting at `100 * id` so diagnostics from
/// different directives are distinguishable.
pub(super) fn directive(
    id: u32,
    path: &str,
    alias: Option<&str>,
    all_under: bool,
) -> ImportDirective {
    ImportDirective {
        id: DirectiveId(id),
        path: ImportPath::from_dotted(path),
        is_all_under: all_under,
        alias: alias.map(SmolStr::new),
        span: Span::new(
            FileId(0),
            TextRange::at(TextSize::from(100 * id), TextSize::from(10)),
        ),
    }
}

pub(super) fn explicit(id: u32, path: &str) -> ImportDirective {
    directive(id, path, None, false)
}

pub(super) fn all_under(id: u32, path: &str) -> ImportDirective {
    directive(id, path, None, true)
}

pub(super) fn class(name: &str, decl: u32) -> ClassifierDescriptor {
    ClassifierDescriptor {
        name: SmolStr::new(name),
        decl: DeclId(decl),
        kind: ClassifierKind::Class,
        visibility: Visibility::Public,
        module: OTHER,
    }
}

pub(super) fn class_with(
    name: &str,
    decl: u32,
    visibility: Visibility,
    module: ModuleId,
) -> ClassifierDescriptor {
    ClassifierDescriptor {
        name: SmolStr::new(name),
        decl: DeclId(decl),
        kind: ClassifierKind::Class,
        visibility,
        module,
    }
}

pub(super) fn function(name: &str, decl: u32) -> FunctionDescriptor {
    FunctionDescriptor {
        name: SmolStr::new(name),
        decl: DeclId(decl),
        module: OTHER,
    }
}

pub(super) fn variable(name: &str, decl: u32) -> VariableDescriptor {
    VariableDescriptor {
        name: SmolStr::new(name),
        decl: DeclId(decl),
        module: OTHER,
    }
}

pub(super) fn package(name: &str, decl: u32) -> PackageDescriptor {
    PackageDescriptor {
        name: SmolStr::new(name),
        decl: DeclId(decl),
    }
}
