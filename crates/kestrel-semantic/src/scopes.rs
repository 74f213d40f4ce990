use std::fmt;

use smol_str::SmolStr;

use crate::descriptors::{
    ClassifierDescriptor, Descriptor, DescriptorKindFilter, FunctionDescriptor, PackageDescriptor,
    VariableDescriptor,
};

/// The name-resolution scope contract consumed by semantic analysis.
///
/// Implementations must be safe to query concurrently; all methods take
/// `&self`. The import scope is one variant; resolved import targets
/// (package scopes, classifier member scopes) are others.
pub trait ResolutionScope: Send + Sync + fmt::Debug {
    /// Look up a classifier bound to `name`, if any.
    fn classifier(&self, name: &str) -> Option<ClassifierDescriptor>;

    /// All variables bound to `name`.
    fn variables(&self, name: &str) -> Vec<VariableDescriptor>;

    /// All functions bound to `name` (overloads are multiple entries).
    fn functions(&self, name: &str) -> Vec<FunctionDescriptor>;

    /// Look up a nested package named `name`, if any.
    fn package(&self, name: &str) -> Option<PackageDescriptor>;

    /// Every descriptor this scope contributes whose kind passes
    /// `kind_filter` and whose name passes `name_filter`.
    fn contributed_descriptors(
        &self,
        kind_filter: DescriptorKindFilter,
        name_filter: &dyn Fn(&str) -> bool,
    ) -> Vec<Descriptor>;

    /// Enclosing scope in the lookup chain, if any. Non-owning: the
    /// compilation unit that built the chain owns both ends.
    fn parent(&self) -> Option<&dyn ResolutionScope> {
        None
    }
}

/// Scope contributing nothing. The degraded form of a broken import.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyScope;

impl ResolutionScope for EmptyScope {
    fn classifier(&self, _name: &str) -> Option<ClassifierDescriptor> {
        None
    }

    fn variables(&self, _name: &str) -> Vec<VariableDescriptor> {
        Vec::new()
    }

    fn functions(&self, _name: &str) -> Vec<FunctionDescriptor> {
        Vec::new()
    }

    fn package(&self, _name: &str) -> Option<PackageDescriptor> {
        None
    }

    fn contributed_descriptors(
        &self,
        _kind_filter: DescriptorKindFilter,
        _name_filter: &dyn Fn(&str) -> bool,
    ) -> Vec<Descriptor> {
        Vec::new()
    }
}

/// Frozen member scope: the shape a resolved import target takes.
///
/// Entries are stored sorted by name for binary-search lookup, with
/// duplicate names adjacent (function overloads). Frozen after
/// construction -- `Box<[_]>` for cheap clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberScope {
    /// Debug label, typically the dotted path this scope was resolved from.
    name: SmolStr,
    classifiers: Box<[ClassifierDescriptor]>,
    functions: Box<[FunctionDescriptor]>,
    variables: Box<[VariableDescriptor]>,
    packages: Box<[PackageDescriptor]>,
}

impl MemberScope {
    pub fn builder(name: impl Into<SmolStr>) -> MemberScopeBuilder {
        MemberScopeBuilder {
            name: name.into(),
            classifiers: Vec::new(),
            functions: Vec::new(),
            variables: Vec::new(),
            packages: Vec::new(),
        }
    }

    pub fn name(&self) -> &SmolStr {
        &self.name
    }
}

/// Builder accumulating members before freezing.
pub struct MemberScopeBuilder {
    name: SmolStr,
    classifiers: Vec<ClassifierDescriptor>,
    functions: Vec<FunctionDescriptor>,
    variables: Vec<VariableDescriptor>,
    packages: Vec<PackageDescriptor>,
}

impl MemberScopeBuilder {
    #[must_use]
    pub fn classifier(mut self, c: ClassifierDescriptor) -> Self {
        self.classifiers.push(c);
        self
    }

    #[must_use]
    pub fn function(mut self, f: FunctionDescriptor) -> Self {
        self.functions.push(f);
        self
    }

    #[must_use]
    pub fn variable(mut self, v: VariableDescriptor) -> Self {
        self.variables.push(v);
        self
    }

    #[must_use]
    pub fn package(mut self, p: PackageDescriptor) -> Self {
        self.packages.push(p);
        self
    }

    pub fn freeze(self) -> MemberScope {
        let mut classifiers = self.classifiers;
        classifiers.sort_by(|a, b| a.name.cmp(&b.name));
        let mut functions = self.functions;
        functions.sort_by(|a, b| a.name.cmp(&b.name));
        let mut variables = self.variables;
        variables.sort_by(|a, b| a.name.cmp(&b.name));
        let mut packages = self.packages;
        packages.sort_by(|a, b| a.name.cmp(&b.name));
        MemberScope {
            name: self.name,
            classifiers: classifiers.into_boxed_slice(),
            functions: functions.into_boxed_slice(),
            variables: variables.into_boxed_slice(),
            packages: packages.into_boxed_slice(),
        }
    }
}

/// All entries named `name` in a name-sorted slice.
///
/// Binary search lands on an arbitrary duplicate; walk back to the first,
/// then take the run.
fn named_run<'a, T>(entries: &'a [T], name: &str, entry_name: impl Fn(&T) -> &str) -> &'a [T] {
    let Ok(mut idx) = entries.binary_search_by(|e| entry_name(e).cmp(name)) else {
        return &[];
    };
    while idx > 0 && entry_name(&entries[idx - 1]) == name {
        idx -= 1;
    }
    let end = idx + entries[idx..].partition_point(|e| entry_name(e) == name);
    &entries[idx..end]
}

impl ResolutionScope for MemberScope {
    fn classifier(&self, name: &str) -> Option<ClassifierDescriptor> {
        named_run(&self.classifiers, name, |c| c.name.as_str())
            .first()
            .cloned()
    }

    fn variables(&self, name: &str) -> Vec<VariableDescriptor> {
        named_run(&self.variables, name, |v| v.name.as_str()).to_vec()
    }

    fn functions(&self, name: &str) -> Vec<FunctionDescriptor> {
        named_run(&self.functions, name, |f| f.name.as_str()).to_vec()
    }

    fn package(&self, name: &str) -> Option<PackageDescriptor> {
        named_run(&self.packages, name, |p| p.name.as_str())
            .first()
            .cloned()
    }

    fn contributed_descriptors(
        &self,
        kind_filter: DescriptorKindFilter,
        name_filter: &dyn Fn(&str) -> bool,
    ) -> Vec<Descriptor> {
        let classifiers = self.classifiers.iter().cloned().map(Descriptor::Classifier);
        let functions = self.functions.iter().cloned().map(Descriptor::Function);
        let variables = self.variables.iter().cloned().map(Descriptor::Variable);
        classifiers
            .chain(functions)
            .chain(variables)
            .filter(|d| kind_filter.accepts(d) && name_filter(d.name()))
            .collect()
    }
}
