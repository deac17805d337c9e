// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic type resolution.
//!
//! Turns a type expression seen at a declaration site into a concrete type:
//!
//! - class types resolve to themselves
//! - parameterized types keep their raw class and resolve each argument
//! - wildcards resolve to their lower bound, else upper bound, else `Object`
//! - variables resolve to the argument the site supplies for them, searched
//!   through the site's generic supertypes; unsupplied variables fall back
//!   to the erasure of their first bound (or `Object`)
//! - generic arrays resolve to the array class of their resolved component

use crate::error::{Error, Result};
use crate::types::{builtin, Class, ClassId, ClassTable, Type, TypeVariable};

/// Guard for cyclic or pathological declarations, in hierarchy levels.
const MAX_DEPTH: usize = 64;

/// Resolver over a class table.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    classes: &'a ClassTable,
}

impl<'a> TypeResolver<'a> {
    pub fn new(classes: &'a ClassTable) -> Self {
        Self { classes }
    }

    /// Resolve `ty` as it appears in the scope of `site`.
    pub fn resolve(&self, ty: &Type, site: &Type) -> Result<Type> {
        self.resolve_at(ty, site, 0)
    }

    /// Type arguments `ty` supplies to the generic class `target`, searched
    /// through `ty` itself, its superclass and its interfaces (depth first).
    ///
    /// Empty when `target` is not a generic supertype of `ty`, or when `ty`
    /// is the raw `target` itself.
    pub fn collect_parameters(&self, ty: &Type, target: &ClassId) -> Result<Vec<Type>> {
        self.collect_from(ty, target, 0)
    }

    /// Raw class of a resolved type.
    pub fn raw_class(ty: &Type) -> ClassId {
        ty.raw()
            .cloned()
            .unwrap_or_else(|| ClassId::new(builtin::OBJECT))
    }

    fn resolve_at(&self, ty: &Type, site: &Type, depth: usize) -> Result<Type> {
        if depth > MAX_DEPTH {
            return Err(Error::Internal(format!(
                "type resolution of {} from {} exceeded depth {}",
                ty, site, MAX_DEPTH
            )));
        }
        match ty {
            Type::Class(_) => Ok(ty.clone()),
            Type::Parameterized { raw, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.resolve_at(arg, site, depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Type::Parameterized {
                    raw: raw.clone(),
                    args,
                })
            }
            Type::Wildcard { lower, upper } => match lower.first().or_else(|| upper.first()) {
                Some(bound) => self.resolve_at(bound, site, depth + 1),
                None => Ok(Type::class(builtin::OBJECT)),
            },
            Type::Variable(var) => self.resolve_variable(var, ty, site, depth),
            Type::GenericArray(component) => {
                let component = self.resolve_at(component, site, depth + 1)?;
                Ok(Type::Class(self.classes.array_of(&component)?))
            }
        }
    }

    fn resolve_variable(
        &self,
        var: &TypeVariable,
        ty: &Type,
        site: &Type,
        depth: usize,
    ) -> Result<Type> {
        let owner = self.classes.get(&var.owner)?;
        let index = owner
            .type_param_index(&var.name)
            .ok_or_else(|| Error::UnresolvedVariable {
                variable: format!("{}.{}", var.owner, var.name),
                site: site.to_string(),
            })?;

        let params = self.collect_from(site, &var.owner, 0)?;
        match params.get(index) {
            Some(arg) if arg != ty => self.resolve_at(arg, site, depth + 1),
            _ => {
                let bound = owner.type_params[index]
                    .bounds
                    .first()
                    .map(|b| self.erasure(b, depth + 1))
                    .transpose()?;
                Ok(bound.unwrap_or_else(|| Type::class(builtin::OBJECT)))
            }
        }
    }

    /// Erasure of a bound: raw classes only, so self-referential bounds
    /// (`T extends Comparable<T>`) terminate.
    fn erasure(&self, ty: &Type, depth: usize) -> Result<Type> {
        if depth > MAX_DEPTH {
            return Err(Error::Internal(format!("erasure of {} exceeded depth", ty)));
        }
        match ty {
            Type::Class(_) => Ok(ty.clone()),
            Type::Parameterized { raw, .. } => Ok(Type::Class(raw.clone())),
            Type::Wildcard { upper, .. } => match upper.first() {
                Some(bound) => self.erasure(bound, depth + 1),
                None => Ok(Type::class(builtin::OBJECT)),
            },
            Type::Variable(var) => {
                let owner = self.classes.get(&var.owner)?;
                let bound = owner
                    .type_param_index(&var.name)
                    .and_then(|i| owner.type_params[i].bounds.first().cloned());
                match bound {
                    Some(bound) => self.erasure(&bound, depth + 1),
                    None => Ok(Type::class(builtin::OBJECT)),
                }
            }
            Type::GenericArray(component) => {
                let component = self.erasure(component, depth + 1)?;
                Ok(Type::Class(self.classes.array_of(&component)?))
            }
        }
    }

    /// Walks the supertype graph of `ty` from the top down, rewriting each
    /// supertype in terms of the arguments of the level below, so every
    /// level is visited once and `depth` counts hierarchy levels.
    fn collect_from(&self, ty: &Type, target: &ClassId, depth: usize) -> Result<Vec<Type>> {
        if depth > MAX_DEPTH {
            return Err(Error::Internal(format!(
                "parameter search for {} in {} exceeded depth {}",
                target, ty, MAX_DEPTH
            )));
        }
        let (raw, args) = match ty {
            Type::Class(id) => (id, &[][..]),
            Type::Parameterized { raw, args } => (raw, args.as_slice()),
            _ => return Ok(Vec::new()),
        };
        if raw == target {
            return Ok(args.to_vec());
        }
        let class = self.classes.get(raw)?;

        let supertypes: Vec<Type> = class
            .superclass
            .iter()
            .chain(class.interfaces.iter())
            .map(|supertype| substitute(supertype, &class, args))
            .collect();
        for supertype in &supertypes {
            if let Type::Parameterized { raw, args } = supertype {
                if raw == target {
                    return Ok(args.clone());
                }
            }
        }
        for supertype in &supertypes {
            let params = self.collect_from(supertype, target, depth + 1)?;
            if !params.is_empty() {
                return Ok(params);
            }
        }
        Ok(Vec::new())
    }
}

/// Replace the variables `owner` declares with the matching entry of
/// `args`. Variables without an argument are kept.
fn substitute(ty: &Type, owner: &Class, args: &[Type]) -> Type {
    if args.is_empty() {
        return ty.clone();
    }
    match ty {
        Type::Class(_) => ty.clone(),
        Type::Parameterized { raw, args: inner } => Type::Parameterized {
            raw: raw.clone(),
            args: inner.iter().map(|arg| substitute(arg, owner, args)).collect(),
        },
        Type::Wildcard { lower, upper } => Type::Wildcard {
            lower: lower.iter().map(|b| substitute(b, owner, args)).collect(),
            upper: upper.iter().map(|b| substitute(b, owner, args)).collect(),
        },
        Type::Variable(var) if var.owner == owner.id => owner
            .type_param_index(&var.name)
            .and_then(|index| args.get(index))
            .cloned()
            .unwrap_or_else(|| ty.clone()),
        Type::Variable(_) => ty.clone(),
        Type::GenericArray(component) => {
            Type::GenericArray(Box::new(substitute(component, owner, args)))
        }
    }
}
