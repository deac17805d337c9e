// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for class declarations.

use super::class::{Class, ClassKind, Constructor, Field, Method, Modifiers, TypeParam};
use super::{builtin, ClassId, Type};
use crate::error::Error;
use crate::value::Value;
use std::sync::Arc;

/// Types that can describe themselves as a class declaration.
///
/// Usually implemented with `#[derive(Declare)]`.
pub trait Declare {
    fn declaration() -> ClassBuilder;
}

/// Builder for [`Class`] declarations.
#[derive(Debug)]
pub struct ClassBuilder {
    class: Class,
}

impl ClassBuilder {
    /// Create a builder for an ordinary class.
    pub fn new(id: impl Into<ClassId>) -> Self {
        Self {
            class: Class::new(id, ClassKind::Plain),
        }
    }

    /// Create a builder for an interface.
    pub fn interface(id: impl Into<ClassId>) -> Self {
        let mut class = Class::new(id, ClassKind::Interface);
        class.modifiers |= Modifiers::ABSTRACT;
        Self { class }
    }

    /// Create a builder for a record. Components are added with [`component`](Self::component).
    pub fn record(id: impl Into<ClassId>) -> Self {
        let mut class = Class::new(id, ClassKind::Record);
        class.modifiers |= Modifiers::FINAL;
        Self { class }
    }

    /// Create a builder for an enumeration.
    pub fn enumeration<I, S>(id: impl Into<ClassId>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let constants = constants
            .into_iter()
            .map(|c| Arc::from(c.as_ref()))
            .collect();
        let mut class = Class::new(id, ClassKind::Enum { constants });
        class.modifiers |= Modifiers::FINAL;
        Self { class }
    }

    pub fn id(&self) -> &ClassId {
        &self.class.id
    }

    /// Declare a type parameter.
    pub fn type_param(mut self, name: &str) -> Self {
        self.class.type_params.push(TypeParam::new(name));
        self
    }

    /// Declare a bounded type parameter (`T extends bound`).
    pub fn type_param_bounded(mut self, name: &str, bound: Type) -> Self {
        self.class
            .type_params
            .push(TypeParam::bounded(name, vec![bound]));
        self
    }

    /// Reference a type parameter of this class.
    pub fn var(&self, name: &str) -> Type {
        Type::var(self.class.id.clone(), name)
    }

    /// Set the generic superclass.
    pub fn extends(mut self, superclass: Type) -> Self {
        self.class.superclass = Some(superclass);
        self
    }

    /// Add a generic interface.
    pub fn implements(mut self, interface: Type) -> Self {
        self.class.interfaces.push(interface);
        self
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.class.modifiers = modifiers;
        self
    }

    pub fn abstract_class(mut self) -> Self {
        self.class.modifiers |= Modifiers::ABSTRACT;
        self
    }

    /// Mark as compiler-generated subclass.
    pub fn synthetic(mut self) -> Self {
        self.class.synthetic = true;
        self
    }

    /// Mark as runtime proxy.
    pub fn proxy(mut self) -> Self {
        self.class.proxy = true;
        self
    }

    /// Forbid member introspection.
    pub fn closed(mut self) -> Self {
        self.class.open = false;
        self
    }

    // ========================================================================
    // Fields
    // ========================================================================

    /// Add a public field.
    pub fn field(self, name: &str, ty: Type) -> Self {
        self.field_with(Field::new(name, ty))
    }

    /// Add a public final field.
    pub fn final_field(self, name: &str, ty: Type) -> Self {
        self.field_with(Field::new(name, ty).with_modifiers(Modifiers::PUBLIC | Modifiers::FINAL))
    }

    /// Add a public transient field.
    pub fn transient_field(self, name: &str, ty: Type) -> Self {
        self.field_with(
            Field::new(name, ty).with_modifiers(Modifiers::PUBLIC | Modifiers::TRANSIENT),
        )
    }

    /// Add a private field that is hidden from models.
    pub fn private_field(self, name: &str, ty: Type) -> Self {
        self.field_with(Field::new(name, ty).with_modifiers(Modifiers::PRIVATE))
    }

    /// Add a private framework-managed field.
    pub fn managed_field(self, name: &str, ty: Type) -> Self {
        self.field_with(
            Field::new(name, ty)
                .with_modifiers(Modifiers::PRIVATE)
                .managed(true),
        )
    }

    /// Add a static field.
    pub fn static_field(self, name: &str, ty: Type) -> Self {
        self.field_with(Field::new(name, ty).with_modifiers(Modifiers::PUBLIC | Modifiers::STATIC))
    }

    pub fn field_with(mut self, field: Field) -> Self {
        self.class.fields.push(field);
        self
    }

    /// Add a record component (private final field).
    pub fn component(self, name: &str, ty: Type) -> Self {
        self.field_with(Field::new(name, ty).with_modifiers(Modifiers::PRIVATE | Modifiers::FINAL))
    }

    // ========================================================================
    // Methods
    // ========================================================================

    /// Add a private field with a public getter/setter pair.
    ///
    /// `bool`/`Boolean` getters use the `is` prefix.
    pub fn accessor(self, name: &str, ty: Type) -> Self {
        self.accessor_field(Field::new(name, ty).with_modifiers(Modifiers::PRIVATE))
    }

    /// Add a private field with a public getter only.
    pub fn read_only(self, name: &str, ty: Type) -> Self {
        let field = Field::new(name, ty).with_modifiers(Modifiers::PRIVATE);
        let getter = getter_for(&field);
        self.field_with(field).method(getter)
    }

    /// Add `field` together with a public getter/setter pair backed by its slot.
    pub fn accessor_field(self, field: Field) -> Self {
        let getter = getter_for(&field);
        let setter = setter_for(&field);
        self.field_with(field).method(getter).method(setter)
    }

    pub fn method(mut self, method: Method) -> Self {
        self.class.methods.push(method);
        self
    }

    pub fn constructor(mut self, constructor: Constructor) -> Self {
        self.class.constructors.push(constructor);
        self
    }

    /// Finish the declaration.
    ///
    /// Records receive a canonical constructor over their components unless
    /// one was declared.
    pub fn build(self) -> Result<Class, Error> {
        let mut class = self.class;
        if class.is_record() {
            if class.instance_fields().next().is_none() {
                return Err(Error::InvalidDeclaration(format!(
                    "record {} has no components",
                    class.id
                )));
            }
            if class.canonical_constructor().is_none() {
                let params = class
                    .instance_fields()
                    .map(|f| (f.name.clone(), f.ty.clone()))
                    .collect();
                class.constructors.push(Constructor::new(params));
            }
        }
        if let ClassKind::Enum { constants } = &class.kind {
            if constants.is_empty() {
                return Err(Error::InvalidDeclaration(format!(
                    "enum {} has no constants",
                    class.id
                )));
            }
        }
        Ok(class)
    }
}

fn getter_for(field: &Field) -> Method {
    let boolean = matches!(
        field.ty.raw().map(ClassId::as_str),
        Some(builtin::BOOL) | Some(builtin::BOOLEAN)
    );
    let prefix = if boolean { "is" } else { "get" };
    let slot = field.name.clone();
    Method::new(
        &format!("{}{}", prefix, capitalize(&field.name)),
        Vec::new(),
        Some(field.ty.clone()),
    )
    .with_body(move |this, _| {
        Ok(this.as_object()?.get(&slot).unwrap_or(Value::Null))
    })
}

fn setter_for(field: &Field) -> Method {
    let slot = field.name.clone();
    Method::new(
        &format!("set{}", capitalize(&field.name)),
        vec![field.ty.clone()],
        None,
    )
    .with_body(move |this, args| {
        let value = args.first().cloned().unwrap_or(Value::Null);
        this.as_object()?.set(&slot, value);
        Ok(Value::Null)
    })
}

pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
