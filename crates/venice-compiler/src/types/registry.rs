//! Class and enum declarations, keyed by declaration identity.

use rustc_hash::FxHashMap;
use venice_ast::Visibility;
use venice_core::TypeHash;

use super::check::{GenericBindings, substitute_partial};
use super::{ClassRef, EnumRef, FunctionType, VeniceType};

/// Bytecode name of the builtin `Optional::Some` constructor.
pub(crate) const OPTIONAL_SOME: &str = "Optional__Some";

/// A class field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// Field name
    pub name: String,
    /// Visibility
    pub visibility: Visibility,
    /// Field type
    pub ty: VeniceType,
}

/// A class method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    /// Method name
    pub name: String,
    /// Visibility
    pub visibility: Visibility,
    /// Signature without the implicit `self` parameter
    pub signature: FunctionType,
    /// Bytecode function implementing the method
    pub function: String,
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// Declaration identity
    pub id: TypeHash,
    /// Declared name
    pub name: String,
    /// Bytecode function building an instance from field values
    pub constructor: String,
    /// Fields in declaration order
    pub fields: Vec<FieldInfo>,
    /// Methods in declaration order
    pub methods: Vec<MethodInfo>,
}

impl ClassDecl {
    /// The type of instances of this class.
    pub fn instance_type(&self) -> VeniceType {
        VeniceType::Class(ClassRef {
            id: self.id,
            name: self.name.clone(),
        })
    }

    /// Find a field and its position.
    pub fn field(&self, name: &str) -> Option<(usize, &FieldInfo)> {
        self.fields.iter().enumerate().find(|(_, f)| f.name == name)
    }

    /// Find a method.
    pub fn method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// One case of an enum declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumCase {
    /// Case label
    pub label: String,
    /// Payload types, in terms of the enum's generic parameters
    pub payload: Vec<VeniceType>,
    /// Bytecode constructor function, for cases with a payload
    pub constructor: String,
}

/// An enum declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    /// Declaration identity
    pub id: TypeHash,
    /// Declared name
    pub name: String,
    /// Generic parameter names
    pub generics: Vec<String>,
    /// Cases in declaration order
    pub cases: Vec<EnumCase>,
}

impl EnumDecl {
    /// The enum type with every generic parameter still open.
    pub fn open_type(&self) -> VeniceType {
        VeniceType::Enum(EnumRef {
            id: self.id,
            name: self.name.clone(),
            args: self.generics.iter().map(|g| VeniceType::generic(g)).collect(),
        })
    }

    /// The enum type with no type argument fixed yet, the type of a case
    /// without payload.
    pub fn unfixed_type(&self) -> VeniceType {
        VeniceType::Enum(EnumRef {
            id: self.id,
            name: self.name.clone(),
            args: self.generics.iter().map(|g| VeniceType::unknown(g)).collect(),
        })
    }

    /// Find a case and its position.
    pub fn case(&self, label: &str) -> Option<(usize, &EnumCase)> {
        self.cases.iter().enumerate().find(|(_, c)| c.label == label)
    }

    /// The signature of a case's constructor function.
    pub fn constructor_type(&self, case: &EnumCase) -> FunctionType {
        FunctionType {
            params: case.payload.clone(),
            ret: Some(self.open_type()),
            generics: self.generics.clone(),
        }
    }
}

/// All class and enum declarations visible to one compilation.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    classes: FxHashMap<TypeHash, ClassDecl>,
    enums: FxHashMap<TypeHash, EnumDecl>,
}

impl TypeRegistry {
    /// A registry holding only the builtin `Optional<T>` enum.
    pub fn with_builtins() -> Self {
        let mut registry = Self::default();
        registry.register_enum(EnumDecl {
            id: TypeHash::OPTIONAL,
            name: "Optional".to_string(),
            generics: vec!["T".to_string()],
            cases: vec![
                EnumCase {
                    label: "Some".to_string(),
                    payload: vec![VeniceType::generic("T")],
                    constructor: OPTIONAL_SOME.to_string(),
                },
                EnumCase {
                    label: "None".to_string(),
                    payload: Vec::new(),
                    constructor: String::new(),
                },
            ],
        });
        registry
    }

    /// An identity for a new declaration named `qualified` that no
    /// registered declaration uses yet.
    pub fn fresh_id(&self, qualified: &str) -> TypeHash {
        let base = TypeHash::from_name(qualified);
        let mut id = base;
        let mut generation = 0;
        while self.classes.contains_key(&id) || self.enums.contains_key(&id) {
            id = base.with_generation(generation);
            generation += 1;
        }
        id
    }

    /// Register or replace a class declaration.
    pub fn register_class(&mut self, decl: ClassDecl) {
        self.classes.insert(decl.id, decl);
    }

    /// Register or replace an enum declaration.
    pub fn register_enum(&mut self, decl: EnumDecl) {
        self.enums.insert(decl.id, decl);
    }

    /// Look up a class.
    pub fn class(&self, id: TypeHash) -> Option<&ClassDecl> {
        self.classes.get(&id)
    }

    /// Look up a class for completion of its members.
    pub fn class_mut(&mut self, id: TypeHash) -> Option<&mut ClassDecl> {
        self.classes.get_mut(&id)
    }

    /// Look up an enum.
    pub fn enum_decl(&self, id: TypeHash) -> Option<&EnumDecl> {
        self.enums.get(&id)
    }

    /// Look up an enum for completion of its cases.
    pub fn enum_mut(&mut self, id: TypeHash) -> Option<&mut EnumDecl> {
        self.enums.get_mut(&id)
    }

    /// The position and payload types of `label` in the instantiated enum
    /// `ty`, with the enum's type arguments substituted.
    pub fn case_payload(&self, ty: &EnumRef, label: &str) -> Option<(usize, Vec<VeniceType>)> {
        let decl = self.enums.get(&ty.id)?;
        let (index, case) = decl.case(label)?;
        let bindings: GenericBindings = decl
            .generics
            .iter()
            .cloned()
            .zip(ty.args.iter().cloned())
            .collect();
        let payload = case
            .payload
            .iter()
            .map(|p| substitute_partial(p, &bindings))
            .collect();
        Some((index, payload))
    }

    /// Take over every declaration of `other`.
    pub fn merge(&mut self, other: TypeRegistry) {
        self.classes.extend(other.classes);
        self.enums.extend(other.enums);
    }
}
