// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent class table.

use super::builder::{ClassBuilder, Declare};
use super::class::{Class, ClassKind, Constructor, MethodBody, Modifiers};
use super::{builtin, ClassId, Type};
use crate::error::{Error, Result};
use crate::observe::Variable;
use crate::value::{MapValue, Object, Sequence, Value};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Append-only table of declared classes.
///
/// Lookups are lock-free reads; declarations may happen concurrently.
/// A new table already contains the [`builtin`] classes.
pub struct ClassTable {
    classes: DashMap<ClassId, Arc<Class>>,
}

impl ClassTable {
    pub fn new() -> Self {
        let table = Self {
            classes: DashMap::new(),
        };
        for class in builtin::classes() {
            let class = normalize(class);
            table.classes.insert(class.id.clone(), Arc::new(class));
        }
        table
    }

    /// Add a class. Fails if the id is taken.
    pub fn define(&self, class: Class) -> Result<ClassId> {
        let class = normalize(class);
        let id = class.id.clone();
        match self.classes.entry(id.clone()) {
            Entry::Occupied(_) => Err(Error::DuplicateClass(id.to_string())),
            Entry::Vacant(slot) => {
                log::debug!("[classes] declared {} ({:?})", id, class.kind);
                slot.insert(Arc::new(class));
                Ok(id)
            }
        }
    }

    /// Build and add a declaration.
    pub fn declare(&self, builder: ClassBuilder) -> Result<ClassId> {
        self.define(builder.build()?)
    }

    /// Add the declaration of `T`.
    pub fn declare_type<T: Declare>(&self) -> Result<ClassId> {
        self.declare(T::declaration())
    }

    pub fn get(&self, id: &ClassId) -> Result<Arc<Class>> {
        self.find(id)
            .ok_or_else(|| Error::UnknownClass(id.to_string()))
    }

    pub fn find(&self, id: &ClassId) -> Option<Arc<Class>> {
        self.classes.get(id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, id: &ClassId) -> bool {
        self.classes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Array class for `component`, created on first use.
    pub fn array_of(&self, component: &Type) -> Result<ClassId> {
        if let Some(raw) = component.raw() {
            self.get(raw)?;
        }
        let id = ClassId::new(format!("{}[]", component));
        self.classes.entry(id.clone()).or_insert_with(|| {
            let mut class = Class::new(
                id.clone(),
                ClassKind::Array {
                    component: component.clone(),
                },
            );
            class.modifiers = Modifiers::PUBLIC | Modifiers::FINAL;
            Arc::new(normalize(class))
        });
        Ok(id)
    }

    /// `id` followed by all its supertypes: superclass chain first, then
    /// interfaces, each visited once.
    pub fn collect_types(&self, id: &ClassId) -> Result<Vec<Arc<Class>>> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        self.collect_into(id, &mut out, &mut seen)?;
        Ok(out)
    }

    fn collect_into(
        &self,
        id: &ClassId,
        out: &mut Vec<Arc<Class>>,
        seen: &mut HashSet<ClassId>,
    ) -> Result<()> {
        if !seen.insert(id.clone()) {
            return Ok(());
        }
        let class = self.get(id)?;
        out.push(Arc::clone(&class));
        if let Some(superclass) = class.superclass_id() {
            self.collect_into(superclass, out, seen)?;
        }
        for interface in class.interfaces.iter().filter_map(Type::raw) {
            self.collect_into(interface, out, seen)?;
        }
        Ok(())
    }

    /// Whether a value of class `source` can be stored where `target` is expected.
    ///
    /// Non-nullable primitives are only assignable to themselves.
    pub fn is_assignable_from(&self, target: &ClassId, source: &ClassId) -> bool {
        if target == source {
            return true;
        }
        let Some(class) = self.find(source) else {
            return false;
        };
        if matches!(
            class.kind,
            ClassKind::Primitive {
                nullable: false,
                ..
            }
        ) {
            return false;
        }
        if target.as_str() == builtin::OBJECT {
            return true;
        }
        self.collect_types(source)
            .map(|types| types.iter().any(|t| &t.id == target))
            .unwrap_or(false)
    }

    /// Initial slot value for a field of type `ty`.
    pub fn default_value(&self, ty: &Type) -> Value {
        let Some(class) = ty.raw().and_then(|raw| self.find(raw)) else {
            return Value::Null;
        };
        match &class.kind {
            ClassKind::Primitive {
                kind,
                nullable: false,
            } => kind.zero(),
            ClassKind::Enum { constants } => constants
                .first()
                .map(|c| Value::enumeration(class.id.clone(), c))
                .unwrap_or(Value::Null),
            _ if class.id.as_str() == builtin::VARIABLE => Value::Variable(Variable::new(Value::Null)),
            _ => Value::Null,
        }
    }

    /// Fresh instance of `id` with every slot at its default.
    pub fn instantiate(&self, id: &ClassId) -> Result<Value> {
        let class = self.get(id)?;
        match &class.kind {
            ClassKind::Primitive { kind, .. } => Ok(kind.zero()),
            ClassKind::Enum { .. } => Ok(self.default_value(&Type::Class(id.clone()))),
            ClassKind::Array { .. } => Ok(Value::Array(Arc::new(Sequence::new(
                id.clone(),
                Vec::new(),
            )))),
            ClassKind::Interface => Err(Error::InvalidDeclaration(format!(
                "cannot instantiate interface {}",
                id
            ))),
            ClassKind::Plain | ClassKind::Record => {
                if class.modifiers.contains(Modifiers::ABSTRACT) {
                    return Err(Error::InvalidDeclaration(format!(
                        "cannot instantiate abstract class {}",
                        id
                    )));
                }
                self.instantiate_plain(&class)
            }
        }
    }

    fn instantiate_plain(&self, class: &Class) -> Result<Value> {
        let id = &class.id;
        match id.as_str() {
            builtin::STRING => return Ok(Value::String(String::new())),
            builtin::VARIABLE => return Ok(Value::Variable(Variable::new(Value::Null))),
            _ => {}
        }
        if self.is_assignable_from(&ClassId::new(builtin::LIST), id) {
            return Ok(Value::List(Arc::new(Sequence::new(id.clone(), Vec::new()))));
        }
        if self.is_assignable_from(&ClassId::new(builtin::MAP), id) {
            return Ok(Value::Map(Arc::new(MapValue::new(id.clone()))));
        }

        let mut slots = HashMap::new();
        let mut current = Some(self.get(id)?);
        while let Some(class) = current {
            for field in class.instance_fields() {
                slots
                    .entry(field.name.clone())
                    .or_insert_with(|| self.default_value(&field.ty));
            }
            current = match class.superclass_id() {
                Some(superclass) => Some(self.get(superclass)?),
                None => None,
            };
        }
        Ok(Value::Object(Arc::new(Object::new(id.clone(), slots))))
    }

    /// Run the constructor of `id` whose arity matches `args`.
    pub fn construct(&self, id: &ClassId, args: &[Value]) -> Result<Value> {
        let class = self.get(id)?;
        match class.constructors.iter().find(|c| c.params.len() == args.len()) {
            Some(ctor) => self.run_constructor(&class, ctor, args),
            None if args.is_empty() => self.instantiate(id),
            None => Err(Error::NoSuchMethod {
                class: id.to_string(),
                method: format!("<init>/{}", args.len()),
            }),
        }
    }

    pub(crate) fn run_constructor(
        &self,
        class: &Class,
        ctor: &Constructor,
        args: &[Value],
    ) -> Result<Value> {
        if let Some(body) = &ctor.body {
            return body(&class.id, args);
        }
        let instance = self.instantiate(&class.id)?;
        let object = instance.as_object()?;
        for ((name, _), arg) in ctor.params.iter().zip(args) {
            object.set(name, arg.clone());
        }
        Ok(instance)
    }

    /// Most specific implementation of `name/arity` for the receiver's runtime class.
    pub(crate) fn find_method(
        &self,
        receiver: &Value,
        name: &str,
        arity: usize,
    ) -> Result<Option<MethodBody>> {
        let Some(runtime) = receiver.runtime_class() else {
            return Ok(None);
        };
        if !self.contains(&runtime) {
            return Ok(None);
        }
        for class in self.collect_types(&runtime)? {
            let body = class.method(name, arity).and_then(|m| m.body.clone());
            if body.is_some() {
                return Ok(body);
            }
        }
        Ok(None)
    }

    /// Invoke a method with virtual dispatch on the receiver's runtime class.
    pub fn invoke(&self, receiver: &Value, name: &str, args: &[Value]) -> Result<Value> {
        match self.find_method(receiver, name, args.len())? {
            Some(body) => body(receiver, args),
            None => Err(Error::NoSuchMethod {
                class: receiver.type_name(),
                method: format!("{}/{}", name, args.len()),
            }),
        }
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ClassTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassTable")
            .field("classes", &self.classes.len())
            .finish()
    }
}

/// Classes other than `Object`, interfaces and non-nullable primitives
/// implicitly extend `Object`.
fn normalize(mut class: Class) -> Class {
    let implicit_root = class.superclass.is_none()
        && class.id.as_str() != builtin::OBJECT
        && !class.is_interface()
        && !matches!(
            class.kind,
            ClassKind::Primitive {
                nullable: false,
                ..
            }
        );
    if implicit_root {
        class.superclass = Some(Type::class(builtin::OBJECT));
    }
    class
}
