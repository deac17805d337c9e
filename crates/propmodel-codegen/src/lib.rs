// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{
    parse_macro_input, Data, DeriveInput, Fields, GenericArgument, LitStr, PathArguments, Type,
    Visibility,
};

/// Struct-level `#[model(...)]` options.
#[derive(Default)]
struct ClassAttrs {
    name: Option<String>,
    record: bool,
    accessors: bool,
    extends: Option<Type>,
    implements: Vec<Type>,
}

/// Field-level `#[model(...)]` options.
#[derive(Default)]
struct FieldAttrs {
    managed: bool,
    transient: bool,
    readonly: bool,
    observable: bool,
    skip: bool,
}

/// Names in scope while mapping field types.
struct Scope {
    class_name: String,
    params: Vec<String>,
}

/// `#[derive(Declare)]` macro: generates a `propmodel::Declare` impl whose
/// `declaration()` describes the struct as a class.
///
/// Supports:
/// - Primitive types: bool, i8, i16, i32, i64, f32, f64, char
/// - `Option<primitive>`: nullable wrapper class (`Option<i32>` -> `Integer`)
/// - String, `Vec<T>` (List), `HashMap<K, V>` / `BTreeMap<K, V>` (Map), `[T; N]` (array)
/// - Struct type parameters (type variables) and other named types (classes)
///
/// Struct options: `name = "..."`, `record`, `accessors`, `extends = Type`,
/// `implements = Type`. Field options: `managed`, `transient`, `readonly`,
/// `observable`, `skip`. Unit-only enums declare an enumeration.
///
/// Example:
/// ```ignore
/// use propmodel::Declare;
///
/// #[derive(Declare)]
/// #[model(extends = Base<Integer>)]
/// struct Counter {
///     pub label: String,
///     #[model(observable)]
///     pub ticks: i64,
/// }
/// ```
#[proc_macro_derive(Declare, attributes(model))]
pub fn derive_declare(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let attrs = class_attrs(input)?;
    let ident = &input.ident;
    let class_name = attrs
        .name
        .clone()
        .unwrap_or_else(|| ident.to_string());
    let scope = Scope {
        class_name: class_name.clone(),
        params: input
            .generics
            .type_params()
            .map(|p| p.ident.to_string())
            .collect(),
    };

    let body = match &input.data {
        Data::Struct(data) => {
            let Fields::Named(fields) = &data.fields else {
                return Err(syn::Error::new_spanned(
                    input,
                    "Only structs with named fields are supported",
                ));
            };
            struct_body(&attrs, &scope, fields.named.iter())?
        }
        Data::Enum(data) => {
            let mut constants = Vec::new();
            for variant in &data.variants {
                if !matches!(variant.fields, Fields::Unit) {
                    return Err(syn::Error::new_spanned(
                        variant,
                        "Only unit variants can be declared as enum constants",
                    ));
                }
                constants.push(variant.ident.to_string());
            }
            if constants.is_empty() {
                return Err(syn::Error::new_spanned(input, "Enum has no variants"));
            }
            quote! {
                ::propmodel::ClassBuilder::enumeration(#class_name, [#(#constants),*])
            }
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(input, "Unions are not supported"));
        }
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::propmodel::Declare for #ident #ty_generics #where_clause {
            fn declaration() -> ::propmodel::ClassBuilder {
                #body
            }
        }
    })
}

fn struct_body<'a>(
    attrs: &ClassAttrs,
    scope: &Scope,
    fields: impl Iterator<Item = &'a syn::Field>,
) -> syn::Result<TokenStream2> {
    let class_name = &scope.class_name;
    let constructor = if attrs.record {
        quote! { ::propmodel::ClassBuilder::record(#class_name) }
    } else {
        quote! { ::propmodel::ClassBuilder::new(#class_name) }
    };

    let mut statements = Vec::new();
    for param in &scope.params {
        statements.push(quote! { let builder = builder.type_param(#param); });
    }
    if let Some(superclass) = &attrs.extends {
        let ty = map_type(superclass, scope, false)?;
        statements.push(quote! { let builder = builder.extends(#ty); });
    }
    for interface in &attrs.implements {
        let ty = map_type(interface, scope, false)?;
        statements.push(quote! { let builder = builder.implements(#ty); });
    }

    for field in fields {
        let options = field_attrs(field)?;
        if options.skip {
            continue;
        }
        let Some(field_ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "Field must have a name"));
        };
        let field_name = field_ident.to_string();
        let field_name = field_name.trim_start_matches("r#");

        let mut ty = map_type(&field.ty, scope, false)?;
        if options.observable {
            ty = quote! { ::propmodel::Type::variable_of(#ty) };
        }

        if attrs.record {
            statements.push(quote! { let builder = builder.component(#field_name, #ty); });
            continue;
        }

        let public = matches!(field.vis, Visibility::Public(_));
        let mut modifiers = vec![if public { "PUBLIC" } else { "PRIVATE" }];
        if options.readonly {
            modifiers.push("FINAL");
        }
        if options.transient {
            modifiers.push("TRANSIENT");
        }
        let modifiers = modifier_tokens(&modifiers);
        let managed = options.managed;
        let declared = quote! {
            ::propmodel::Field::new(#field_name, #ty)
                .with_modifiers(#modifiers)
                .managed(#managed)
        };

        if attrs.accessors && !public && !managed {
            statements.push(quote! { let builder = builder.accessor_field(#declared); });
        } else {
            statements.push(quote! { let builder = builder.field_with(#declared); });
        }
    }

    Ok(quote! {
        let builder = #constructor;
        #(#statements)*
        builder
    })
}

fn class_attrs(input: &DeriveInput) -> syn::Result<ClassAttrs> {
    let mut attrs = ClassAttrs::default();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("model")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let name: LitStr = meta.value()?.parse()?;
                attrs.name = Some(name.value());
            } else if meta.path.is_ident("record") {
                attrs.record = true;
            } else if meta.path.is_ident("accessors") {
                attrs.accessors = true;
            } else if meta.path.is_ident("extends") {
                attrs.extends = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("implements") {
                attrs.implements.push(meta.value()?.parse()?);
            } else {
                return Err(meta.error("unsupported model option"));
            }
            Ok(())
        })?;
    }
    Ok(attrs)
}

fn field_attrs(field: &syn::Field) -> syn::Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("model")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("managed") {
                attrs.managed = true;
            } else if meta.path.is_ident("transient") {
                attrs.transient = true;
            } else if meta.path.is_ident("readonly") {
                attrs.readonly = true;
            } else if meta.path.is_ident("observable") {
                attrs.observable = true;
            } else if meta.path.is_ident("skip") {
                attrs.skip = true;
            } else {
                return Err(meta.error("unsupported model field option"));
            }
            Ok(())
        })?;
    }
    Ok(attrs)
}

fn modifier_tokens(names: &[&str]) -> TokenStream2 {
    let mut idents = names.iter().map(|n| syn::Ident::new(n, Span::call_site()));
    let Some(first) = idents.next() else {
        return quote! { ::propmodel::Modifiers::NONE };
    };
    let mut tokens = quote! { ::propmodel::Modifiers::#first };
    for ident in idents {
        tokens = quote! { #tokens.union(::propmodel::Modifiers::#ident) };
    }
    tokens
}

/// Builtin constant for a primitive type name: (primitive, wrapper).
fn primitive_constants(name: &str) -> Option<(&'static str, &'static str)> {
    Some(match name {
        "bool" => ("BOOL", "BOOLEAN"),
        "i8" => ("I8", "BYTE"),
        "i16" => ("I16", "SHORT"),
        "i32" => ("I32", "INTEGER"),
        "i64" => ("I64", "LONG"),
        "f32" => ("F32", "FLOAT"),
        "f64" => ("F64", "DOUBLE"),
        "char" => ("CHAR", "CHARACTER"),
        _ => return None,
    })
}

fn builtin_class(constant: &str) -> TokenStream2 {
    let ident = syn::Ident::new(constant, Span::call_site());
    quote! { ::propmodel::Type::class(::propmodel::builtin::#ident) }
}

fn type_arguments(arguments: &PathArguments) -> Vec<&Type> {
    match arguments {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Map a Rust type to a `propmodel::Type` expression.
///
/// `boxed` maps primitives to their nullable wrappers (type arguments).
fn map_type(ty: &Type, scope: &Scope, boxed: bool) -> syn::Result<TokenStream2> {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => {
            let Some(segment) = type_path.path.segments.last() else {
                return Err(syn::Error::new_spanned(ty, "Empty type path"));
            };
            let name = segment.ident.to_string();
            let args = type_arguments(&segment.arguments);
            let arg = |index: usize, boxed: bool| -> syn::Result<TokenStream2> {
                match args.get(index) {
                    Some(arg) => map_type(arg, scope, boxed),
                    None => Err(syn::Error::new_spanned(
                        ty,
                        format!("{} needs {} type argument(s)", name, index + 1),
                    )),
                }
            };

            if type_path.path.segments.len() == 1 && args.is_empty() && scope.params.contains(&name) {
                let class_name = &scope.class_name;
                return Ok(quote! { ::propmodel::Type::var(#class_name, #name) });
            }
            if let Some((primitive, wrapper)) = primitive_constants(&name) {
                return Ok(builtin_class(if boxed { wrapper } else { primitive }));
            }
            match name.as_str() {
                "String" | "str" => Ok(builtin_class("STRING")),
                "Option" => arg(0, true),
                "Box" | "Arc" | "Rc" => arg(0, boxed),
                "Vec" | "VecDeque" | "LinkedList" => {
                    let item = arg(0, true)?;
                    Ok(quote! { ::propmodel::Type::list_of(#item) })
                }
                "HashMap" | "BTreeMap" => {
                    let key = arg(0, true)?;
                    let value = arg(1, true)?;
                    Ok(quote! { ::propmodel::Type::map_of(#key, #value) })
                }
                "u8" | "u16" | "u32" | "u64" | "u128" | "usize" | "i128" | "isize" => {
                    Err(syn::Error::new_spanned(
                        ty,
                        format!("Unsupported type: {}. Supported integers: i8, i16, i32, i64.", name),
                    ))
                }
                _ if args.is_empty() => Ok(quote! { ::propmodel::Type::class(#name) }),
                _ => {
                    let mapped = args
                        .iter()
                        .map(|a| map_type(a, scope, true))
                        .collect::<syn::Result<Vec<_>>>()?;
                    Ok(quote! { ::propmodel::Type::parameterized(#name, [#(#mapped),*]) })
                }
            }
        }
        Type::Array(array) => {
            let component = map_type(&array.elem, scope, false)?;
            Ok(quote! { ::propmodel::Type::array_of(#component) })
        }
        Type::Slice(slice) => {
            let component = map_type(&slice.elem, scope, false)?;
            Ok(quote! { ::propmodel::Type::array_of(#component) })
        }
        Type::Reference(reference) => map_type(&reference.elem, scope, boxed),
        Type::Paren(paren) => map_type(&paren.elem, scope, boxed),
        Type::Group(group) => map_type(&group.elem, scope, boxed),
        other => Err(syn::Error::new_spanned(
            other,
            "Unsupported type. Supported types: primitives, String, Option, Vec, maps, arrays, named types.",
        )),
    }
}
