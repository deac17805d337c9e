// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property scan of object and generic models.
//!
//! Two sources contribute properties, in this order:
//!
//! 1. getter/setter pairs found across the owner's supertypes
//! 2. fields declared along the superclass chain
//!
//! The first registration of a name wins. The result is sorted by name.

use super::registry::Shared;
use super::{Getter, Model, Property, Setter};
use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::observe::{Signal, Variable};
use crate::resolve::TypeResolver;
use crate::types::{builtin, Class, ClassId, Field, Method, MethodBody, Modifiers, Type};
use crate::value::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Weak};

const SKIPPED_METHODS: Modifiers = Modifiers::STATIC
    .union(Modifiers::NATIVE)
    .union(Modifiers::BRIDGE)
    .union(Modifiers::SYNTHETIC);

const GETTER: usize = 0;
const SETTER: usize = 1;

pub(crate) struct PropertyBuilder<'a> {
    shared: &'a Arc<Shared>,
    owner: &'a Arc<Class>,
    site: &'a Type,
    resolver: TypeResolver<'a>,
    config: Arc<ModelConfig>,
    properties: BTreeMap<Arc<str>, Property>,
}

impl<'a> PropertyBuilder<'a> {
    /// Scan `owner` with type variables bound by `site`.
    pub(crate) fn new(shared: &'a Arc<Shared>, owner: &'a Arc<Class>, site: &'a Type) -> Self {
        Self {
            shared,
            owner,
            site,
            resolver: TypeResolver::new(&shared.classes),
            config: shared.config(),
            properties: BTreeMap::new(),
        }
    }

    pub(crate) fn build(mut self) -> Result<Vec<Property>> {
        self.scan_accessors()?;
        self.scan_fields()?;
        if self.config.log_scans {
            let names: Vec<&str> = self.properties.keys().map(|k| &**k).collect();
            log::debug!("[model] scanned {}: [{}]", self.site, names.join(", "));
        }
        Ok(self.properties.into_values().collect())
    }

    fn insert(&mut self, property: Property) {
        self.properties
            .entry(Arc::from(property.name()))
            .or_insert(property);
    }

    // ========================================================================
    // Accessor pairs
    // ========================================================================

    fn scan_accessors(&mut self) -> Result<()> {
        let types = self.shared.classes.collect_types(&self.owner.id)?;

        let mut candidates: HashMap<String, [Option<&Method>; 2]> = HashMap::new();
        for class in types.iter().filter(|c| c.open && !c.proxy) {
            for method in class.methods.iter().filter(|m| self.is_candidate(m)) {
                let Some((slot, name)) = classify(method) else {
                    continue;
                };
                let pair = candidates.entry(name).or_default();
                if pair[slot].is_none() {
                    pair[slot] = Some(method);
                }
            }
        }

        for (name, pair) in candidates {
            let [Some(getter), Some(setter)] = pair else {
                log::trace!("[model] {}: {} has no accessor pair", self.site, name);
                continue;
            };
            let (Some(returns), Some(param)) = (&getter.returns, setter.params.first()) else {
                continue;
            };
            let value_type = self.resolver.resolve(returns, self.site)?;
            let param_type = self.resolver.resolve(param, self.site)?;
            let value_raw = TypeResolver::raw_class(&value_type);
            let param_raw = TypeResolver::raw_class(&param_type);
            if !self.shared.classes.is_assignable_from(&param_raw, &value_raw) {
                log::trace!(
                    "[model] {}: dropping {} ({} is not assignable to {})",
                    self.site,
                    name,
                    value_raw,
                    param_raw
                );
                continue;
            }

            let model = self.shared.model_for(&value_type)?;
            let transient = types
                .iter()
                .find_map(|c| c.field(&name))
                .is_some_and(Field::is_transient);
            let property = Property::new(
                model,
                name.as_str(),
                self.getter_handle(getter),
                self.setter_handle(setter),
            )
            .transient(transient);
            self.insert(property);
        }
        Ok(())
    }

    fn is_candidate(&self, method: &Method) -> bool {
        if method.modifiers.intersects(SKIPPED_METHODS) {
            return false;
        }
        !method.modifiers.contains(Modifiers::PRIVATE) || self.config.include_private_accessors
    }

    fn getter_handle(&self, method: &Method) -> Getter {
        let target = DispatchTarget::new(self.shared, &self.owner.id, method, 0);
        Arc::new(move |instance: &Value| -> Result<Value> {
            let body = target.resolve(instance)?;
            body(instance, &[])
        })
    }

    fn setter_handle(&self, method: &Method) -> Setter {
        let target = DispatchTarget::new(self.shared, &self.owner.id, method, 1);
        Arc::new(move |instance: &Value, value: Value| -> Result<Value> {
            let body = target.resolve(instance)?;
            body(instance, std::slice::from_ref(&value))?;
            Ok(instance.clone())
        })
    }

    // ========================================================================
    // Fields
    // ========================================================================

    fn scan_fields(&mut self) -> Result<()> {
        let record = self.owner.is_record();
        let variable = ClassId::new(builtin::VARIABLE);

        let mut current = Some(Arc::clone(self.owner));
        while let Some(class) = current {
            for field in class.instance_fields() {
                if field.modifiers.contains(Modifiers::NATIVE)
                    || self.properties.contains_key(&field.name)
                {
                    continue;
                }
                let visible = field.modifiers.contains(Modifiers::PUBLIC)
                    || field.managed
                    || (record && field.modifiers.contains(Modifiers::PRIVATE));
                if !visible {
                    continue;
                }

                let field_type = self.resolver.resolve(&field.ty, self.site)?;
                let field_raw = TypeResolver::raw_class(&field_type);
                let property = if self.shared.classes.is_assignable_from(&variable, &field_raw) {
                    self.holder_property(field, &field_type)?
                } else {
                    let model = self.shared.model_for(&field_type)?;
                    if model.is_atomic() && field.is_final() && !record {
                        log::trace!("[model] {}: skipping final field {}", self.site, field.name);
                        continue;
                    }
                    self.slot_property(field, model, record)
                };
                self.insert(property.transient(field.is_transient()));
            }
            current = match class.superclass_id() {
                Some(superclass) => Some(self.shared.classes.get(superclass)?),
                None => None,
            };
        }
        Ok(())
    }

    fn slot_property(&self, field: &Field, model: Arc<Model>, record: bool) -> Property {
        let slot = field.name.clone();
        let getter: Getter = Arc::new(move |instance: &Value| -> Result<Value> {
            Ok(instance.as_object()?.get(&slot).unwrap_or(Value::Null))
        });
        let setter: Setter = if record {
            self.record_setter(field)
        } else if field.is_final() {
            Arc::new(|instance: &Value, _: Value| -> Result<Value> { Ok(instance.clone()) })
        } else {
            let slot = field.name.clone();
            Arc::new(move |instance: &Value, value: Value| -> Result<Value> {
                instance.as_object()?.set(&slot, value);
                Ok(instance.clone())
            })
        };
        Property::new(model, field.name.clone(), getter, setter)
    }

    /// Records are immutable: a write constructs a copy through the canonical
    /// constructor with one component replaced.
    fn record_setter(&self, field: &Field) -> Setter {
        let registry = Arc::downgrade(self.shared);
        let component = field.name.clone();
        Arc::new(move |instance: &Value, value: Value| -> Result<Value> {
            let shared = registry.upgrade().ok_or(Error::RegistryDropped)?;
            let object = instance.as_object()?;
            let class = shared.classes.get(object.class())?;
            let ctor = class.canonical_constructor().ok_or_else(|| {
                Error::introspection(format!("{}.<init>", class.id), "no canonical constructor")
            })?;
            let args: Vec<Value> = ctor
                .params
                .iter()
                .map(|(name, _)| {
                    if *name == component {
                        value.clone()
                    } else {
                        object.get(name).unwrap_or(Value::Null)
                    }
                })
                .collect();
            shared.classes.run_constructor(&class, ctor, &args)
        })
    }

    fn holder_property(&self, field: &Field, field_type: &Type) -> Result<Property> {
        let args = self
            .resolver
            .collect_parameters(field_type, &ClassId::new(builtin::VARIABLE))?;
        let value_type = match args.first() {
            Some(arg) => self.resolver.resolve(arg, field_type)?,
            None => Type::class(builtin::OBJECT),
        };
        let model = self.shared.model_for(&value_type)?;

        let slot = field.name.clone();
        let getter: Getter = Arc::new(move |instance: &Value| -> Result<Value> {
            Ok(holder(instance, &slot)?.map_or(Value::Null, |h| h.get()))
        });
        let slot = field.name.clone();
        let setter: Setter = Arc::new(move |instance: &Value, value: Value| -> Result<Value> {
            match holder(instance, &slot)? {
                Some(h) => {
                    h.set(value);
                }
                None => {
                    instance
                        .as_object()?
                        .set(&slot, Value::Variable(Variable::new(value)));
                }
            }
            Ok(instance.clone())
        });
        let slot = field.name.clone();
        let observer = Arc::new(move |instance: &Value| -> Result<Signal> {
            Ok(holder(instance, &slot)?.map_or_else(Signal::never, |h| h.observe()))
        });
        Ok(Property::new(model, field.name.clone(), getter, setter).with_observer(observer))
    }
}

/// Holder stored in `slot`; `None` when the slot is null.
fn holder(instance: &Value, slot: &str) -> Result<Option<Arc<Variable>>> {
    match instance.as_object()?.get(slot) {
        Some(Value::Variable(h)) => Ok(Some(h)),
        Some(Value::Null) | None => Ok(None),
        Some(other) => Err(Error::mismatch(builtin::VARIABLE, other.type_name())),
    }
}

/// Method looked up on the receiver's runtime class at call time, so
/// overrides in subclasses take effect.
struct DispatchTarget {
    registry: Weak<Shared>,
    name: Arc<str>,
    arity: usize,
    declared: Option<MethodBody>,
    member: String,
}

impl DispatchTarget {
    fn new(shared: &Arc<Shared>, owner: &ClassId, method: &Method, arity: usize) -> Self {
        Self {
            registry: Arc::downgrade(shared),
            name: method.name.clone(),
            arity,
            declared: method.body.clone(),
            member: format!("{}.{}", owner, method.name),
        }
    }

    fn resolve(&self, instance: &Value) -> Result<MethodBody> {
        let shared = self.registry.upgrade().ok_or(Error::RegistryDropped)?;
        match shared.classes.find_method(instance, &self.name, self.arity)? {
            Some(body) => Ok(body),
            None => self
                .declared
                .clone()
                .ok_or_else(|| Error::introspection(&self.member, "no implementation on receiver")),
        }
    }
}

/// Accessor slot and property name of `method`, if it follows the naming
/// convention.
fn classify(method: &Method) -> Option<(usize, String)> {
    let name = &*method.name;
    let (slot, prefix) = match method.returns {
        None => (SETTER, "set"),
        Some(_) if name.starts_with('i') => (GETTER, "is"),
        Some(_) => (GETTER, "get"),
    };
    if method.arity() != slot {
        return None;
    }
    let rest = name.strip_prefix(prefix)?;
    let first = rest.chars().next()?;
    if !first.is_uppercase() {
        return None;
    }
    Some((slot, decapitalize(rest)))
}

fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, params: usize, returns: bool) -> Method {
        Method::new(
            name,
            vec![Type::class(builtin::STRING); params],
            returns.then(|| Type::class(builtin::STRING)),
        )
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&method("getName", 0, true)), Some((GETTER, "name".into())));
        assert_eq!(classify(&method("isActive", 0, true)), Some((GETTER, "active".into())));
        assert_eq!(classify(&method("setName", 1, false)), Some((SETTER, "name".into())));
        assert_eq!(classify(&method("getURL", 0, true)), Some((GETTER, "uRL".into())));

        assert_eq!(classify(&method("get", 0, true)), None);
        assert_eq!(classify(&method("getname", 0, true)), None);
        assert_eq!(classify(&method("getName", 1, true)), None);
        assert_eq!(classify(&method("setName", 2, false)), None);
        assert_eq!(classify(&method("setName", 1, true)), None);
        assert_eq!(classify(&method("items", 0, true)), None);
        assert_eq!(classify(&method("name", 0, true)), None);
    }
}
