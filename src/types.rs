//! Core type-shape definitions
//!
//! Structural snapshots of loaded types and the value types that key the
//! match index: method signatures, access flags, and the small set of
//! methods the engine refuses to instrument.

use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::OnceLock;

/// A method's name plus its shape descriptor (JVM-style, e.g. `("size", "()I")`).
///
/// Compared and hashed by value; this is the key type for all exact-method
/// index lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodSignature {
    pub name: String,
    pub descriptor: String,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.descriptor)
    }
}

/// Method access flag word, using the class-file flag bit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MethodAccess(pub u32);

impl MethodAccess {
    pub const PUBLIC: u32 = 0x0001;
    pub const PRIVATE: u32 = 0x0002;
    pub const PROTECTED: u32 = 0x0004;
    pub const STATIC: u32 = 0x0008;
    pub const FINAL: u32 = 0x0010;
    pub const BRIDGE: u32 = 0x0040;
    pub const NATIVE: u32 = 0x0100;
    pub const ABSTRACT: u32 = 0x0400;

    pub fn new(flags: u32) -> Self {
        Self(flags)
    }

    pub fn contains(self, flags: u32) -> bool {
        self.0 & flags == flags
    }

    pub fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }

    pub fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    pub fn is_bridge(self) -> bool {
        self.contains(Self::BRIDGE)
    }

    pub fn is_native(self) -> bool {
        self.contains(Self::NATIVE)
    }

    pub fn is_abstract(self) -> bool {
        self.contains(Self::ABSTRACT)
    }
}

/// One declared method as seen during the type scan: its signature, access
/// flags, and any annotation descriptors observed on it.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    pub signature: MethodSignature,
    pub access: MethodAccess,
    pub annotations: Vec<String>,
}

impl MethodInfo {
    pub fn new(signature: MethodSignature, access: MethodAccess) -> Self {
        Self {
            signature,
            access,
            annotations: Vec::new(),
        }
    }

    /// A plain public concrete method with no annotations.
    pub fn concrete(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self::new(
            MethodSignature::new(name, descriptor),
            MethodAccess::new(MethodAccess::PUBLIC),
        )
    }

    pub fn with_access(mut self, flags: u32) -> Self {
        self.access = MethodAccess::new(self.access.0 | flags);
        self
    }

    pub fn with_annotation(mut self, descriptor: impl Into<String>) -> Self {
        self.annotations.push(descriptor.into());
        self
    }
}

/// Read-only structural snapshot of one loaded type.
///
/// Produced fresh per type-load event and never mutated; the evaluating call
/// owns it exclusively. `super_name` is `None` only for the universal root
/// type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    pub name: String,
    pub super_name: Option<String>,
    pub interface_names: Vec<String>,
    pub is_interface: bool,
    pub methods: Vec<MethodInfo>,
}

impl TypeDescriptor {
    /// A concrete class with no declared super-type (the root, or a type
    /// whose ancestry is irrelevant to the caller).
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            super_name: None,
            interface_names: Vec::new(),
            is_interface: false,
            methods: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            is_interface: true,
            ..Self::class(name)
        }
    }

    pub fn extends(mut self, super_name: impl Into<String>) -> Self {
        self.super_name = Some(super_name.into());
        self
    }

    pub fn implements(mut self, interface_name: impl Into<String>) -> Self {
        self.interface_names.push(interface_name.into());
        self
    }

    pub fn with_method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }
}

/// Methods the engine never instruments regardless of what rules ask for:
/// the generic equality/hash/string/finalize family.
pub fn universal_exclusions() -> &'static FxHashSet<MethodSignature> {
    static EXCLUSIONS: OnceLock<FxHashSet<MethodSignature>> = OnceLock::new();
    EXCLUSIONS.get_or_init(|| {
        [
            ("equals", "(Ljava/lang/Object;)Z"),
            ("toString", "()Ljava/lang/String;"),
            ("hashCode", "()I"),
            ("finalize", "()V"),
        ]
        .into_iter()
        .map(|(name, desc)| MethodSignature::new(name, desc))
        .collect()
    })
}

/// The implicit no-argument constructor. Matching it is legal but flagged at
/// registration time because of its load-time cost.
pub fn default_constructor() -> &'static MethodSignature {
    static CTOR: OnceLock<MethodSignature> = OnceLock::new();
    CTOR.get_or_init(|| MethodSignature::new("<init>", "()V"))
}
