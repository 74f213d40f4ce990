use std::collections::HashMap;
use std::sync::Arc;

use kestrel_ast::{DirectiveId, ImportDirective, ImportPath};
use kestrel_diag::{Diagnostic, DiagnosticCode, DiagnosticSink};
use kestrel_source::ModuleId;
use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::descriptors::{Descriptor, DescriptorKindFilter};
use crate::import_scope::FilteringKind;
use crate::indexed_imports::IndexedImports;
use crate::scopes::{EmptyScope, ResolutionScope};
use crate::storage::MemoCache;

/// Shared handle to a resolved scope.
pub type ScopeRef = Arc<dyn ResolutionScope>;

/// Resolves a qualified path against the root of a module.
///
/// The declaration-resolution subsystem implements this; the import engine
/// only consumes it. `None` means the path names nothing -- a broken
/// import, degraded to silence by the engine.
pub trait PathResolver: Send + Sync {
    fn resolve(&self, path: &ImportPath, from: ModuleId) -> Option<ScopeRef>;
}

/// Platform-specific consistency check over a resolved explicit import.
///
/// Runs once per successfully resolved non-wildcard directive, over the
/// full member set of the scope it denotes. Implementations report through
/// the sink; they never influence resolution.
pub trait ImportedMembersCheck: Send + Sync {
    fn check(&self, directive: &ImportDirective, members: &[Descriptor], sink: &dyn DiagnosticSink);
}

/// Which memoized aggregate a per-name query belongs to.
///
/// Classifier queries carry their filtering kind so the three scope views
/// over one resolver never share a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportQueryKind {
    Classifier(FilteringKind),
    Functions,
    Variables,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct QueryKey {
    name: SmolStr,
    kind: ImportQueryKind,
}

/// Lazily resolves a file's import directives to the scopes they denote.
///
/// One instance per file per analysis session. Each directive's path is
/// resolved at most once (single-flight, see [`MemoCache`]); per-name
/// aggregate queries are memoized the same way. Broken directives resolve
/// to an empty scope rather than failing the file.
///
/// Queries are safe under concurrent read access; all internal computation
/// is synchronous.
pub struct ImportResolver<'a> {
    path_resolver: &'a dyn PathResolver,
    module: ModuleId,
    indexed: IndexedImports,
    sink: &'a dyn DiagnosticSink,
    members_check: Option<&'a dyn ImportedMembersCheck>,
    scope_cache: MemoCache<DirectiveId, Option<ScopeRef>>,
    select_cache: MemoCache<QueryKey, Option<Descriptor>>,
    collect_cache: MemoCache<QueryKey, Arc<[Descriptor]>>,
    empty_scope: ScopeRef,
}

impl<'a> ImportResolver<'a> {
    pub fn new(
        path_resolver: &'a dyn PathResolver,
        module: ModuleId,
        directives: &[ImportDirective],
        sink: &'a dyn DiagnosticSink,
        members_check: Option<&'a dyn ImportedMembersCheck>,
    ) -> Self {
        Self {
            path_resolver,
            module,
            indexed: IndexedImports::new(directives),
            sink,
            members_check,
            scope_cache: MemoCache::new(),
            select_cache: MemoCache::new(),
            collect_cache: MemoCache::new(),
            empty_scope: Arc::new(EmptyScope),
        }
    }

    /// The importing module. Visibility checks compare against this.
    pub fn module(&self) -> ModuleId {
        self.module
    }

    pub fn indexed_imports(&self) -> &IndexedImports {
        &self.indexed
    }

    /// The scope `directive` denotes, or an empty scope if its path
    /// resolves to nothing. Never fails.
    pub fn scope_for(&self, directive: &ImportDirective) -> ScopeRef {
        self.resolve_directive(directive)
            .unwrap_or_else(|| self.empty_scope.clone())
    }

    /// Resolve `directive` for its side effects (memoization, member
    /// checks) without consuming the scope.
    ///
    /// Guarantees an erroneous import is checked even if no lookup ever
    /// touches it.
    pub fn force_resolve_import(&self, directive: &ImportDirective) {
        let _ = self.resolve_directive(directive);
    }

    /// Resolve every directive, then run the global alias diagnostics over
    /// the explicit imports: reserved underscore-only aliases and aliases
    /// imported as a classifier by more than one directive.
    ///
    /// Both checks consider only directives whose resolved scope actually
    /// binds the alias to a classifier; importing a callable under a
    /// contested name is not a conflict at this layer.
    pub fn force_resolve_all_imports(&self) {
        let mut classifier_imports: HashMap<&SmolStr, SmallVec<[&ImportDirective; 1]>> =
            HashMap::new();
        for directive in self.indexed.imports() {
            self.force_resolve_import(directive);
            if directive.is_all_under {
                continue;
            }
            let Some(alias) = directive.imported_name() else {
                continue;
            };
            let Some(scope) = self.resolve_directive(directive) else {
                continue;
            };
            let Some(path) = &directive.path else {
                continue;
            };
            if scope.classifier(path.last_segment().as_str()).is_some() {
                classifier_imports.entry(alias).or_default().push(directive);
            }
        }

        let mut aliases: Vec<&SmolStr> = classifier_imports.keys().copied().collect();
        aliases.sort();

        for alias in &aliases {
            let directives = &classifier_imports[*alias];
            if !alias.is_empty() && alias.chars().all(|c| c == '_') {
                for directive in directives {
                    self.sink.report(Diagnostic::error(
                        DiagnosticCode::RESERVED_ALIAS,
                        directive.span,
                        format!("names consisting only of underscores are reserved: `{alias}`"),
                    ));
                }
            }
            if directives.len() > 1 {
                for directive in directives {
                    self.sink.report(Diagnostic::error(
                        DiagnosticCode::CONFLICTING_IMPORT,
                        directive.span,
                        format!("conflicting import: `{alias}` is imported more than once"),
                    ));
                }
            }
        }
    }

    /// Apply `selector` to the scope of every directive that can bind
    /// `name` and require a single distinct result.
    ///
    /// The selector receives the name to look up *inside* that directive's
    /// scope: for an aliased import that is the path's last segment, not
    /// the alias the caller queried.
    ///
    /// Returns `None` when no directive yields a result *and* when two
    /// directives yield results with different underlying declarations
    /// (silent ambiguity -- diagnosing it is the caller's concern). Equal
    /// candidates reached through different directives collapse to one.
    ///
    /// The whole aggregate is memoized per `(name, kind)`.
    pub fn select_single_from_imports(
        &self,
        name: &SmolStr,
        kind: ImportQueryKind,
        selector: impl Fn(&dyn ResolutionScope, &SmolStr) -> Option<Descriptor>,
    ) -> Option<Descriptor> {
        let key = QueryKey {
            name: name.clone(),
            kind,
        };
        self.select_cache.get_or_compute(key, || {
            let mut target: Option<Descriptor> = None;
            for directive in self.indexed.imports_for_name(name.as_str()) {
                let scope = self.scope_for(directive);
                let Some(resolved) = selector(&*scope, declared_name(directive, name)) else {
                    continue;
                };
                match &target {
                    Some(existing) if existing.decl() != resolved.decl() => return None, // ambiguity
                    _ => target = Some(resolved),
                }
            }
            target
        })
    }

    /// Apply `selector` to the scope of every directive that can bind
    /// `name` and accumulate the set union of the results.
    ///
    /// Used for callables, where overloading makes multiple simultaneous
    /// candidates legitimate. Memoized per `(name, kind)`.
    pub fn collect_from_imports(
        &self,
        name: &SmolStr,
        kind: ImportQueryKind,
        selector: impl Fn(&dyn ResolutionScope, &SmolStr) -> Vec<Descriptor>,
    ) -> Arc<[Descriptor]> {
        let key = QueryKey {
            name: name.clone(),
            kind,
        };
        self.collect_cache.get_or_compute(key, || {
            let mut collected: Vec<Descriptor> = Vec::new();
            for directive in self.indexed.imports_for_name(name.as_str()) {
                let scope = self.scope_for(directive);
                for descriptor in selector(&*scope, declared_name(directive, name)) {
                    if !collected.contains(&descriptor) {
                        collected.push(descriptor);
                    }
                }
            }
            collected.into()
        })
    }

    /// Descriptors `directive` contributes under `kind_filter`, keeping
    /// only what a name filter over the *imported* names admits.
    ///
    /// Wildcard directives pass `name_filter` through to the target scope.
    /// Explicit directives are gated on the name they bind (alias
    /// included), then narrowed to the member their path denotes.
    pub fn contributed_from_directive(
        &self,
        directive: &ImportDirective,
        kind_filter: DescriptorKindFilter,
        name_filter: &dyn Fn(&str) -> bool,
    ) -> Vec<Descriptor> {
        let Some(path) = &directive.path else {
            return Vec::new();
        };
        let scope = self.scope_for(directive);
        if directive.is_all_under {
            return scope.contributed_descriptors(kind_filter, name_filter);
        }
        let Some(bound) = directive.imported_name() else {
            return Vec::new();
        };
        if !name_filter(bound.as_str()) {
            return Vec::new();
        }
        let member = path.last_segment();
        scope.contributed_descriptors(kind_filter, &|n| n == member.as_str())
    }

    fn resolve_directive(&self, directive: &ImportDirective) -> Option<ScopeRef> {
        self.scope_cache.get_or_compute(directive.id, || {
            let path = directive.path.as_ref()?;
            let scope = self.path_resolver.resolve(path, self.module)?;
            if !directive.is_all_under
                && let Some(check) = self.members_check
            {
                let members = scope.contributed_descriptors(DescriptorKindFilter::ALL, &|_| true);
                check.check(directive, &members, self.sink);
            }
            Some(scope)
        })
    }
}

/// The name `directive`'s target scope binds internally.
///
/// An explicit import's scope knows the declaration by its own name (the
/// path's last segment), not by any alias; wildcards bind every name, so
/// the queried one passes through.
fn declared_name<'d>(directive: &'d ImportDirective, queried: &'d SmolStr) -> &'d SmolStr {
    if directive.is_all_under {
        return queried;
    }
    directive
        .path
        .as_ref()
        .map_or(queried, ImportPath::last_segment)
}
