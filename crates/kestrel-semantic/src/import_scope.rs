use std::fmt;

use smol_str::SmolStr;

use crate::descriptors::{
    ClassifierDescriptor, Descriptor, DescriptorKindFilter, FunctionDescriptor, PackageDescriptor,
    VariableDescriptor,
};
use crate::import_resolver::{ImportQueryKind, ImportResolver};
use crate::scopes::ResolutionScope;

/// Which classifiers a scope view admits, by visibility relative to the
/// importing module.
///
/// The visible/invisible split lets the frontend stack two views of one
/// resolver in the lookup chain: visible classifiers resolve normally
/// while invisible ones are still findable for diagnostics afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilteringKind {
    All,
    VisibleClassifiers,
    InvisibleClassifiers,
}

/// Queryable view over a file's imports.
///
/// Cheap to construct; immutable after construction. All state lives in
/// the externally owned resolver it delegates to, so several views (one
/// per filtering kind) may coexist over the same resolver and share its
/// caches. The parent link is non-owning -- the compilation unit that
/// builds the scope chain owns both ends.
pub struct ImportScope<'a> {
    parent: Option<&'a dyn ResolutionScope>,
    resolver: &'a ImportResolver<'a>,
    filtering: FilteringKind,
    debug_name: &'static str,
}

impl<'a> ImportScope<'a> {
    pub fn new(
        parent: Option<&'a dyn ResolutionScope>,
        resolver: &'a ImportResolver<'a>,
        filtering: FilteringKind,
        debug_name: &'static str,
    ) -> Self {
        Self {
            parent,
            resolver,
            filtering,
            debug_name,
        }
    }

    /// Whether `descriptor` passes this view's visibility policy.
    ///
    /// Visibilities that need no import-time check (public) are admitted
    /// by the visible view and rejected by the invisible one outright;
    /// the rest are checked against the importing module with no receiver.
    fn is_classifier_visible(&self, descriptor: &ClassifierDescriptor) -> bool {
        if self.filtering == FilteringKind::All {
            return true;
        }
        let include_visible = self.filtering == FilteringKind::VisibleClassifiers;
        if !descriptor.visibility.must_check_in_imports() {
            return include_visible;
        }
        descriptor.is_visible_from(self.resolver.module()) == include_visible
    }
}

impl ResolutionScope for ImportScope<'_> {
    fn classifier(&self, name: &str) -> Option<ClassifierDescriptor> {
        let name = SmolStr::new(name);
        let selected = self.resolver.select_single_from_imports(
            &name,
            ImportQueryKind::Classifier(self.filtering),
            |scope, name| {
                // Type parameters are not importable: import targets are
                // package or static member scopes, which never bind them.
                let descriptor = scope.classifier(name.as_str())?;
                if self.is_classifier_visible(&descriptor) {
                    Some(Descriptor::Classifier(descriptor))
                } else {
                    None
                }
            },
        )?;
        match selected {
            Descriptor::Classifier(c) => Some(c),
            _ => None,
        }
    }

    fn variables(&self, name: &str) -> Vec<VariableDescriptor> {
        // Imports never hide callables; only classifiers have the
        // invisible-view concern.
        if self.filtering == FilteringKind::InvisibleClassifiers {
            return Vec::new();
        }
        let name = SmolStr::new(name);
        self.resolver
            .collect_from_imports(&name, ImportQueryKind::Variables, |scope, name| {
                scope
                    .variables(name.as_str())
                    .into_iter()
                    .map(Descriptor::Variable)
                    .collect()
            })
            .iter()
            .filter_map(|d| match d {
                Descriptor::Variable(v) => Some(v.clone()),
                _ => None,
            })
            .collect()
    }

    fn functions(&self, name: &str) -> Vec<FunctionDescriptor> {
        if self.filtering == FilteringKind::InvisibleClassifiers {
            return Vec::new();
        }
        let name = SmolStr::new(name);
        self.resolver
            .collect_from_imports(&name, ImportQueryKind::Functions, |scope, name| {
                scope
                    .functions(name.as_str())
                    .into_iter()
                    .map(Descriptor::Function)
                    .collect()
            })
            .iter()
            .filter_map(|d| match d {
                Descriptor::Function(f) => Some(f.clone()),
                _ => None,
            })
            .collect()
    }

    /// Import scopes never resolve package qualifiers; only the module
    /// root scope does.
    fn package(&self, _name: &str) -> Option<PackageDescriptor> {
        None
    }

    fn contributed_descriptors(
        &self,
        kind_filter: DescriptorKindFilter,
        name_filter: &dyn Fn(&str) -> bool,
    ) -> Vec<Descriptor> {
        // No visibility filtering here: descriptors from the visible and
        // invisible views are all added by the caller anyway.
        if self.filtering == FilteringKind::InvisibleClassifiers {
            return Vec::new();
        }
        let mut collected: Vec<Descriptor> = Vec::new();
        for directive in self.resolver.indexed_imports().imports() {
            for descriptor in
                self.resolver
                    .contributed_from_directive(directive, kind_filter, name_filter)
            {
                if !collected.contains(&descriptor) {
                    collected.push(descriptor);
                }
            }
        }
        collected
    }

    fn parent(&self) -> Option<&dyn ResolutionScope> {
        self.parent
    }
}

impl fmt::Debug for ImportScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImportScope({}, {:?})", self.debug_name, self.filtering)
    }
}
