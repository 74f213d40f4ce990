use kestrel_source::ModuleId;
use smol_str::SmolStr;

/// Identity of the underlying declaration a descriptor denotes.
///
/// Ambiguity resolution compares `DeclId`s, not descriptor structure: two
/// descriptors reached through different directives are the *same*
/// candidate exactly when they denote the same declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

/// What kind of classifier a declaration is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierKind {
    Class,
    Interface,
    Object,
}

/// Declared visibility of a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Internal,
    Protected,
    Private,
}

impl Visibility {
    /// Whether importing a declaration with this visibility requires a
    /// visibility check against the importing module.
    ///
    /// Public declarations are importable from anywhere, so the check is
    /// skipped entirely for them.
    pub fn must_check_in_imports(self) -> bool {
        !matches!(self, Self::Public)
    }
}

/// A class, interface, or object declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassifierDescriptor {
    pub name: SmolStr,
    pub decl: DeclId,
    pub kind: ClassifierKind,
    pub visibility: Visibility,
    /// Module containing the declaration.
    pub module: ModuleId,
}

impl ClassifierDescriptor {
    /// Visibility from `module` with no specific receiver.
    ///
    /// `Internal` and `Private` declarations are visible only within their
    /// declaring module. `Protected` is never visible at an import site
    /// (there is no receiver to satisfy it).
    pub fn is_visible_from(&self, module: ModuleId) -> bool {
        match self.visibility {
            Visibility::Public => true,
            Visibility::Internal | Visibility::Private => self.module == module,
            Visibility::Protected => false,
        }
    }
}

/// A function declaration. Overloads are distinct declarations sharing a
/// name, so lookups return collections.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionDescriptor {
    pub name: SmolStr,
    pub decl: DeclId,
    pub module: ModuleId,
}

/// A property or top-level variable declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableDescriptor {
    pub name: SmolStr,
    pub decl: DeclId,
    pub module: ModuleId,
}

/// A package, resolvable only as a qualifier prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageDescriptor {
    pub name: SmolStr,
    pub decl: DeclId,
}

/// Closed set of declaration descriptors the scope contract traffics in.
///
/// Packages are not members: a scope's `package` lookup is a separate
/// operation and never appears in contributed-descriptor aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Descriptor {
    Classifier(ClassifierDescriptor),
    Function(FunctionDescriptor),
    Variable(VariableDescriptor),
}

impl Descriptor {
    pub fn name(&self) -> &SmolStr {
        match self {
            Self::Classifier(c) => &c.name,
            Self::Function(f) => &f.name,
            Self::Variable(v) => &v.name,
        }
    }

    /// Identity of the underlying declaration.
    pub fn decl(&self) -> DeclId {
        match self {
            Self::Classifier(c) => c.decl,
            Self::Function(f) => f.decl,
            Self::Variable(v) => v.decl,
        }
    }

    pub fn as_classifier(&self) -> Option<&ClassifierDescriptor> {
        match self {
            Self::Classifier(c) => Some(c),
            _ => None,
        }
    }
}

/// Bit mask selecting descriptor kinds in aggregate queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorKindFilter(u8);

impl DescriptorKindFilter {
    pub const CLASSIFIERS: Self = Self(1);
    pub const FUNCTIONS: Self = Self(1 << 1);
    pub const VARIABLES: Self = Self(1 << 2);
    pub const CALLABLES: Self = Self(Self::FUNCTIONS.0 | Self::VARIABLES.0);
    pub const ALL: Self = Self(Self::CLASSIFIERS.0 | Self::CALLABLES.0);

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn accepts(self, descriptor: &Descriptor) -> bool {
        let bit = match descriptor {
            Descriptor::Classifier(_) => Self::CLASSIFIERS.0,
            Descriptor::Function(_) => Self::FUNCTIONS.0,
            Descriptor::Variable(_) => Self::VARIABLES.0,
        };
        self.0 & bit != 0
    }
}
