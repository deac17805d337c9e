// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in classes installed in every [`ClassTable`](super::ClassTable).

use super::class::{Class, ClassKind, Modifiers, PrimitiveKind, TypeParam};
use super::{ClassId, Type};

pub const OBJECT: &str = "Object";
pub const STRING: &str = "String";

pub const BOOL: &str = "bool";
pub const I8: &str = "i8";
pub const I16: &str = "i16";
pub const I32: &str = "i32";
pub const I64: &str = "i64";
pub const F32: &str = "f32";
pub const F64: &str = "f64";
pub const CHAR: &str = "char";

pub const BOOLEAN: &str = "Boolean";
pub const BYTE: &str = "Byte";
pub const SHORT: &str = "Short";
pub const INTEGER: &str = "Integer";
pub const LONG: &str = "Long";
pub const FLOAT: &str = "Float";
pub const DOUBLE: &str = "Double";
pub const CHARACTER: &str = "Character";

pub const LIST: &str = "List";
pub const ARRAY_LIST: &str = "ArrayList";
pub const MAP: &str = "Map";
pub const HASH_MAP: &str = "HashMap";
pub const VARIABLE: &str = "Variable";

/// Non-nullable primitive class name for `kind`.
pub fn primitive_of(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Bool => BOOL,
        PrimitiveKind::I8 => I8,
        PrimitiveKind::I16 => I16,
        PrimitiveKind::I32 => I32,
        PrimitiveKind::I64 => I64,
        PrimitiveKind::F32 => F32,
        PrimitiveKind::F64 => F64,
        PrimitiveKind::Char => CHAR,
    }
}

/// Nullable wrapper class name for `kind`.
pub fn wrapper_of(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Bool => BOOLEAN,
        PrimitiveKind::I8 => BYTE,
        PrimitiveKind::I16 => SHORT,
        PrimitiveKind::I32 => INTEGER,
        PrimitiveKind::I64 => LONG,
        PrimitiveKind::F32 => FLOAT,
        PrimitiveKind::F64 => DOUBLE,
        PrimitiveKind::Char => CHARACTER,
    }
}

pub(crate) fn classes() -> Vec<Class> {
    let mut out = Vec::with_capacity(24);

    out.push(Class::new(OBJECT, ClassKind::Plain));

    let mut string = Class::new(STRING, ClassKind::Plain);
    string.modifiers = Modifiers::PUBLIC | Modifiers::FINAL;
    out.push(string);

    for kind in PrimitiveKind::ALL {
        out.push(Class::new(
            primitive_of(kind),
            ClassKind::Primitive {
                kind,
                nullable: false,
            },
        ));
        let mut wrapper = Class::new(
            wrapper_of(kind),
            ClassKind::Primitive {
                kind,
                nullable: true,
            },
        );
        wrapper.modifiers = Modifiers::PUBLIC | Modifiers::FINAL;
        out.push(wrapper);
    }

    out.push(generic(LIST, ClassKind::Interface, &["E"], None));
    out.push(generic(
        ARRAY_LIST,
        ClassKind::Plain,
        &["E"],
        Some(Type::parameterized(LIST, [Type::var(ARRAY_LIST, "E")])),
    ));
    out.push(generic(MAP, ClassKind::Interface, &["K", "V"], None));
    out.push(generic(
        HASH_MAP,
        ClassKind::Plain,
        &["K", "V"],
        Some(Type::parameterized(
            MAP,
            [Type::var(HASH_MAP, "K"), Type::var(HASH_MAP, "V")],
        )),
    ));
    out.push(generic(VARIABLE, ClassKind::Plain, &["V"], None));

    out
}

fn generic(
    id: &str,
    kind: ClassKind,
    params: &[&str],
    interface: Option<Type>,
) -> Class {
    let mut class = Class::new(ClassId::new(id), kind);
    class.type_params = params.iter().map(|p| TypeParam::new(p)).collect();
    class.interfaces = interface.into_iter().collect();
    class
}
