// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declared class table: the host type system the model engine introspects.
//!
//! # Features
//!
//! - **Type**: generic type expressions (class, parameterized, wildcard, variable, array)
//! - **Class**: declared members (methods, fields, constructors) and supertypes
//! - **ClassBuilder**: fluent declaration API, also emitted by `#[derive(Declare)]`
//! - **ClassTable**: concurrent, append-only table with the built-in classes
//!
//! # Example
//!
//! ```rust
//! use propmodel::{builtin, ClassBuilder, ClassTable, Type};
//!
//! let table = ClassTable::new();
//! table
//!     .declare(
//!         ClassBuilder::new("Pair")
//!             .accessor("name", Type::class(builtin::STRING))
//!             .accessor("age", Type::class(builtin::I32)),
//!     )
//!     .unwrap();
//!
//! let pair = table.instantiate(&"Pair".into()).unwrap();
//! table.invoke(&pair, "setAge", &[42i32.into()]).unwrap();
//! assert_eq!(table.invoke(&pair, "getAge", &[]).unwrap().as_i32(), Some(42));
//! ```

mod builder;
pub mod builtin;
mod class;
mod table;

pub use builder::{ClassBuilder, Declare};
pub use class::{
    Class, ClassKind, Constructor, ConstructorBody, Field, Method, MethodBody, Modifiers,
    PrimitiveKind, TypeParam,
};
pub use table::ClassTable;

use std::fmt;
use std::sync::Arc;

/// Interned class identity (the class name).
///
/// Cheap to clone; equality and hashing use the name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(Arc<str>);

impl ClassId {
    /// Create a class id from a name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Full class name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name without any `::` or `.` qualified prefix.
    pub fn simple_name(&self) -> &str {
        let name = self.as_str();
        let tail = name.rsplit("::").next().unwrap_or(name);
        tail.rsplit('.').next().unwrap_or(tail)
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ClassId {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&ClassId> for ClassId {
    fn from(id: &ClassId) -> Self {
        id.clone()
    }
}

/// A type variable, identified by its declaring class and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeVariable {
    /// Class declaring the variable.
    pub owner: ClassId,
    /// Variable name (`T`, `K`, ...).
    pub name: Arc<str>,
}

/// A (possibly generic) type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Concrete class.
    Class(ClassId),
    /// Generic class with type arguments (`List<String>`).
    Parameterized { raw: ClassId, args: Vec<Type> },
    /// Wildcard with bounds (`?`, `? extends T`, `? super T`).
    Wildcard { lower: Vec<Type>, upper: Vec<Type> },
    /// Type variable of a generic declaration.
    Variable(TypeVariable),
    /// Array whose component is generic (`T[]`).
    GenericArray(Box<Type>),
}

impl Type {
    /// Concrete class type.
    pub fn class(id: impl Into<ClassId>) -> Self {
        Self::Class(id.into())
    }

    /// Parameterized type.
    pub fn parameterized(raw: impl Into<ClassId>, args: impl IntoIterator<Item = Type>) -> Self {
        Self::Parameterized {
            raw: raw.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Type variable `name` declared by `owner`.
    pub fn var(owner: impl Into<ClassId>, name: &str) -> Self {
        Self::Variable(TypeVariable {
            owner: owner.into(),
            name: Arc::from(name),
        })
    }

    /// Unbounded wildcard `?`.
    pub fn wildcard() -> Self {
        Self::Wildcard {
            lower: Vec::new(),
            upper: Vec::new(),
        }
    }

    /// Upper-bounded wildcard `? extends bound`.
    pub fn extends(bound: Type) -> Self {
        Self::Wildcard {
            lower: Vec::new(),
            upper: vec![bound],
        }
    }

    /// Lower-bounded wildcard `? super bound`.
    pub fn super_of(bound: Type) -> Self {
        Self::Wildcard {
            lower: vec![bound],
            upper: Vec::new(),
        }
    }

    /// Array of `component`.
    pub fn array_of(component: Type) -> Self {
        Self::GenericArray(Box::new(component))
    }

    /// `List<item>`.
    pub fn list_of(item: Type) -> Self {
        Self::parameterized(builtin::LIST, [item])
    }

    /// `Map<key, value>`.
    pub fn map_of(key: Type, value: Type) -> Self {
        Self::parameterized(builtin::MAP, [key, value])
    }

    /// `Variable<value>` (observable holder).
    pub fn variable_of(value: Type) -> Self {
        Self::parameterized(builtin::VARIABLE, [value])
    }

    /// Raw class of a class or parameterized type.
    pub fn raw(&self) -> Option<&ClassId> {
        match self {
            Self::Class(id) | Self::Parameterized { raw: id, .. } => Some(id),
            _ => None,
        }
    }

    /// Whether the expression contains no variables or wildcards.
    pub fn is_concrete(&self) -> bool {
        match self {
            Self::Class(_) => true,
            Self::Parameterized { args, .. } => args.iter().all(Type::is_concrete),
            _ => false,
        }
    }
}

impl From<ClassId> for Type {
    fn from(id: ClassId) -> Self {
        Self::Class(id)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(id) => write!(f, "{}", id),
            Self::Parameterized { raw, args } => {
                write!(f, "{}<", raw)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(">")
            }
            Self::Wildcard { lower, upper } => match (lower.first(), upper.first()) {
                (Some(bound), _) => write!(f, "? super {}", bound),
                (None, Some(bound)) => write!(f, "? extends {}", bound),
                (None, None) => f.write_str("?"),
            },
            Self::Variable(var) => f.write_str(&var.name),
            Self::GenericArray(component) => write!(f, "{}[]", component),
        }
    }
}
