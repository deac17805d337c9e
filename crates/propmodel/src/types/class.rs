// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Class declarations: kinds, modifiers and members.

use super::{ClassId, Type};
use crate::error::Result;
use crate::value::Value;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::sync::Arc;

/// Primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char,
}

impl PrimitiveKind {
    /// All kinds, in declaration order.
    pub const ALL: [PrimitiveKind; 8] = [
        Self::Bool,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::F32,
        Self::F64,
        Self::Char,
    ];

    /// Zero value used to initialize non-nullable slots.
    pub fn zero(self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::I8 => Value::I8(0),
            Self::I16 => Value::I16(0),
            Self::I32 => Value::I32(0),
            Self::I64 => Value::I64(0),
            Self::F32 => Value::F32(0.0),
            Self::F64 => Value::F64(0.0),
            Self::Char => Value::Char('\0'),
        }
    }
}

/// Declaration modifiers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u16);

impl Modifiers {
    pub const NONE: Self = Self(0);
    pub const PUBLIC: Self = Self(1 << 0);
    pub const PROTECTED: Self = Self(1 << 1);
    pub const PRIVATE: Self = Self(1 << 2);
    pub const STATIC: Self = Self(1 << 3);
    pub const FINAL: Self = Self(1 << 4);
    pub const NATIVE: Self = Self(1 << 5);
    pub const ABSTRACT: Self = Self(1 << 6);
    pub const TRANSIENT: Self = Self(1 << 7);
    pub const BRIDGE: Self = Self(1 << 8);
    pub const SYNTHETIC: Self = Self(1 << 9);

    const NAMES: [(Self, &'static str); 10] = [
        (Self::PUBLIC, "public"),
        (Self::PROTECTED, "protected"),
        (Self::PRIVATE, "private"),
        (Self::STATIC, "static"),
        (Self::FINAL, "final"),
        (Self::NATIVE, "native"),
        (Self::ABSTRACT, "abstract"),
        (Self::TRANSIENT, "transient"),
        (Self::BRIDGE, "bridge"),
        (Self::SYNTHETIC, "synthetic"),
    ];

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// All bits of `other` are set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Any bit of `other` is set.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "Modifiers({})", names.join(" "))
    }
}

/// Callable method implementation: `(receiver, args) -> result`.
///
/// Void methods return [`Value::Null`].
pub type MethodBody = Arc<dyn Fn(&Value, &[Value]) -> Result<Value> + Send + Sync>;

/// Constructor implementation: `(class, args) -> new instance`.
pub type ConstructorBody = Arc<dyn Fn(&ClassId, &[Value]) -> Result<Value> + Send + Sync>;

/// Class kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassKind {
    /// Built-in primitive (`nullable == false`) or its boxed wrapper.
    Primitive { kind: PrimitiveKind, nullable: bool },
    /// Enumeration with named constants.
    Enum { constants: Vec<Arc<str>> },
    /// Immutable record: components are captured by a canonical constructor.
    Record,
    /// Interface (never instantiated).
    Interface,
    /// Ordinary class.
    Plain,
    /// Array of `component`.
    Array { component: Type },
}

/// Generic type parameter with optional bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: Arc<str>,
    pub bounds: Vec<Type>,
}

impl TypeParam {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            bounds: Vec::new(),
        }
    }

    pub fn bounded(name: &str, bounds: Vec<Type>) -> Self {
        Self {
            name: Arc::from(name),
            bounds,
        }
    }
}

/// Declared method.
#[derive(Clone)]
pub struct Method {
    pub name: Arc<str>,
    pub params: Vec<Type>,
    /// `None` for void methods.
    pub returns: Option<Type>,
    pub modifiers: Modifiers,
    /// `None` for abstract declarations.
    pub body: Option<MethodBody>,
}

impl Method {
    /// Public method without implementation.
    pub fn new(name: &str, params: Vec<Type>, returns: Option<Type>) -> Self {
        Self {
            name: Arc::from(name),
            params,
            returns,
            modifiers: Modifiers::PUBLIC,
            body: None,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_body<F>(mut self, body: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }

    pub fn is_void(&self) -> bool {
        self.returns.is_none()
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("modifiers", &self.modifiers)
            .field("body", &self.body.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: Arc<str>,
    pub ty: Type,
    pub modifiers: Modifiers,
    /// Framework-managed: exposed even when not public.
    pub managed: bool,
}

impl Field {
    /// Public, unmanaged field.
    pub fn new(name: &str, ty: Type) -> Self {
        Self {
            name: Arc::from(name),
            ty,
            modifiers: Modifiers::PUBLIC,
            managed: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn managed(mut self, managed: bool) -> Self {
        self.managed = managed;
        self
    }

    pub fn is_final(&self) -> bool {
        self.modifiers.contains(Modifiers::FINAL)
    }

    pub fn is_transient(&self) -> bool {
        self.modifiers.contains(Modifiers::TRANSIENT)
    }
}

/// Declared constructor.
///
/// Without a body, construction instantiates the class and assigns each
/// argument to the slot named after its parameter.
#[derive(Clone)]
pub struct Constructor {
    pub params: Vec<(Arc<str>, Type)>,
    pub modifiers: Modifiers,
    pub body: Option<ConstructorBody>,
}

impl Constructor {
    pub fn new(params: Vec<(Arc<str>, Type)>) -> Self {
        Self {
            params,
            modifiers: Modifiers::PUBLIC,
            body: None,
        }
    }

    pub fn with_body<F>(mut self, body: F) -> Self
    where
        F: Fn(&ClassId, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("params", &self.params)
            .field("modifiers", &self.modifiers)
            .field("body", &self.body.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// A declared class.
#[derive(Debug, Clone)]
pub struct Class {
    pub id: ClassId,
    pub kind: ClassKind,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParam>,
    /// Generic superclass. Defaults to `Object` when the class is defined.
    pub superclass: Option<Type>,
    /// Generic interfaces, in declaration order.
    pub interfaces: Vec<Type>,
    pub methods: Vec<Method>,
    pub fields: Vec<Field>,
    pub constructors: Vec<Constructor>,
    /// Compiler-generated subclass; models delegate to the superclass.
    pub synthetic: bool,
    /// Runtime proxy; its methods are never scanned.
    pub proxy: bool,
    /// Whether member introspection is permitted.
    pub open: bool,
}

impl Class {
    pub fn new(id: impl Into<ClassId>, kind: ClassKind) -> Self {
        Self {
            id: id.into(),
            kind,
            modifiers: Modifiers::PUBLIC,
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            synthetic: false,
            proxy: false,
            open: true,
        }
    }

    pub fn simple_name(&self) -> &str {
        self.id.simple_name()
    }

    pub fn is_record(&self) -> bool {
        matches!(self.kind, ClassKind::Record)
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, ClassKind::Interface)
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, ClassKind::Enum { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, ClassKind::Array { .. })
    }

    pub fn is_abstract(&self) -> bool {
        self.is_interface() || self.modifiers.contains(Modifiers::ABSTRACT)
    }

    /// Primitive kind, for primitives and their wrappers.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.kind {
            ClassKind::Primitive { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Whether a slot of this class may hold null.
    ///
    /// Null writes into non-nullable primitives and enums are ignored.
    pub fn is_nullable(&self) -> bool {
        !matches!(
            self.kind,
            ClassKind::Primitive {
                nullable: false,
                ..
            } | ClassKind::Enum { .. }
        )
    }

    pub fn superclass_id(&self) -> Option<&ClassId> {
        self.superclass.as_ref().and_then(Type::raw)
    }

    pub fn type_param_index(&self, name: &str) -> Option<usize> {
        self.type_params.iter().position(|p| &*p.name == name)
    }

    /// Declared method by name and arity (this class only).
    pub fn method(&self, name: &str, arity: usize) -> Option<&Method> {
        self.methods
            .iter()
            .find(|m| &*m.name == name && m.arity() == arity)
    }

    /// Declared field by name (this class only).
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    /// Instance fields, in declaration order.
    pub fn instance_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .filter(|f| !f.modifiers.contains(Modifiers::STATIC))
    }

    /// Constructor whose parameters are exactly the record components.
    pub fn canonical_constructor(&self) -> Option<&Constructor> {
        let components: Vec<&Field> = self.instance_fields().collect();
        self.constructors.iter().find(|ctor| {
            ctor.params.len() == components.len()
                && ctor
                    .params
                    .iter()
                    .zip(&components)
                    .all(|((name, _), field)| *name == field.name)
        })
    }
}
