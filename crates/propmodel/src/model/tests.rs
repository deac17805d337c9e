// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::*;
use crate::config::ModelConfig;
use crate::types::{ClassBuilder, Field, Method, Modifiers};
use crate::value::Value;

fn string() -> Type {
    Type::class(builtin::STRING)
}

fn int() -> Type {
    Type::class(builtin::I32)
}

fn integer() -> Type {
    Type::class(builtin::INTEGER)
}

fn names(model: &Model) -> Vec<String> {
    model
        .properties()
        .expect("properties")
        .iter()
        .map(|p| p.name().to_string())
        .collect()
}

fn pair_registry() -> ModelRegistry {
    let registry = ModelRegistry::new();
    registry
        .classes()
        .declare(
            ClassBuilder::new("Pair")
                .accessor("name", string())
                .accessor("age", int()),
        )
        .expect("declare Pair");
    registry
}

#[test]
fn test_accessor_pairs_sorted_by_name() {
    let registry = pair_registry();
    let model = registry.of("Pair").expect("model");

    assert_eq!(model.kind(), ModelKind::Object);
    assert_eq!(names(&model), ["age", "name"]);
    assert!(model.is_initialized());
    assert!(!model.is_atomic());

    let age = model.property("age").unwrap().expect("age");
    assert_eq!(age.model().raw_type().as_str(), builtin::I32);
    assert_eq!(age.model().kind(), ModelKind::Scalar);
    assert!(model.property("missing").unwrap().is_none());
}

#[test]
fn test_get_set_through_accessors() {
    let registry = pair_registry();
    let model = registry.of("Pair").unwrap();
    let pair = registry.classes().instantiate(&"Pair".into()).unwrap();

    assert_eq!(model.get_named(&pair, "age").unwrap(), Value::I32(0));
    assert_eq!(model.get_named(&pair, "name").unwrap(), Value::Null);

    let pair = model.set_named(pair, "name", Value::from("Ada")).unwrap();
    let pair = model.set_named(pair, "age", Value::I32(36)).unwrap();
    assert_eq!(model.get_named(&pair, "name").unwrap(), Value::from("Ada"));
    assert_eq!(model.get_named(&pair, "age").unwrap(), Value::I32(36));
}

#[test]
fn test_null_handling() {
    let registry = pair_registry();
    let model = registry.of("Pair").unwrap();
    let age = model.property("age").unwrap();

    // Null instance reads null, writes are ignored
    assert_eq!(model.get(&Value::Null, age.as_ref()).unwrap(), Value::Null);
    assert_eq!(model.set(Value::Null, age.as_ref(), Value::I32(1)).unwrap(), Value::Null);

    // Null into a primitive is a no-op
    let pair = registry.classes().instantiate(&"Pair".into()).unwrap();
    let pair = model.set_named(pair, "age", Value::I32(5)).unwrap();
    let pair = model.set(pair, age.as_ref(), Value::Null).unwrap();
    assert_eq!(model.get(&pair, age.as_ref()).unwrap(), Value::I32(5));

    // Null into a reference type clears it
    let pair = model.set_named(pair, "name", Value::from("x")).unwrap();
    let pair = model.set_named(pair, "name", Value::Null).unwrap();
    assert_eq!(model.get_named(&pair, "name").unwrap(), Value::Null);

    // Absent property
    assert_eq!(model.get(&pair, None).unwrap(), Value::Null);
    let same = model.set(pair.clone(), None, Value::I32(1)).unwrap();
    assert_eq!(same, pair);
}

#[test]
fn test_set_rejects_wrong_type() {
    let registry = pair_registry();
    let model = registry.of("Pair").unwrap();
    let pair = registry.classes().instantiate(&"Pair".into()).unwrap();

    let err = model.set_named(pair.clone(), "age", Value::from("old")).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
    let err = model.set_named(pair, "name", Value::I32(1)).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn test_walk_visits_in_order() {
    let registry = pair_registry();
    let model = registry.of("Pair").unwrap();
    let pair = registry.classes().instantiate(&"Pair".into()).unwrap();
    let pair = model.set_named(pair, "name", Value::from("Bob")).unwrap();

    let mut seen = Vec::new();
    model
        .walk(&pair, |_, property, value| {
            seen.push((property.name().to_string(), value.clone()));
        })
        .unwrap();
    assert_eq!(
        seen,
        [
            ("age".to_string(), Value::I32(0)),
            ("name".to_string(), Value::from("Bob")),
        ]
    );
}

#[test]
fn test_models_are_cached() {
    let registry = pair_registry();
    let first = registry.of("Pair").unwrap();
    let second = registry.of("Pair").unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let list = registry.of_type(&Type::list_of(string())).unwrap();
    let again = registry.of_type(&Type::list_of(string())).unwrap();
    assert!(Arc::ptr_eq(&list, &again));

    let other = registry.of_type(&Type::list_of(integer())).unwrap();
    assert!(!Arc::ptr_eq(&list, &other));
}

#[test]
fn test_unknown_class() {
    let registry = ModelRegistry::new();
    assert!(matches!(registry.of("Nope"), Err(Error::UnknownClass(_))));
}

// ============================================================================
// Lists, arrays and maps
// ============================================================================

#[test]
fn test_list_properties() {
    let registry = ModelRegistry::new();
    let model = registry.of_type(&Type::list_of(string())).unwrap();
    assert_eq!(model.kind(), ModelKind::List);
    assert!(model.is_container());
    assert!(model.properties().unwrap().is_empty());

    let item = &model.parameters().unwrap()[0];
    assert_eq!(item.raw_type().as_str(), builtin::STRING);

    let list = Value::list(["a", "b"]);
    assert_eq!(model.get_named(&list, "1").unwrap(), Value::from("b"));
    assert_eq!(model.get_named(&list, "7").unwrap(), Value::Null);
    assert!(model.property("first").unwrap().is_none());
    assert!(model.property("-1").unwrap().is_none());

    let property = model.property("0").unwrap().expect("index");
    assert_eq!(property.name(), "0");
    assert!(Arc::ptr_eq(property.model(), item));
}

#[test]
fn test_list_grows_on_write() {
    let registry = ModelRegistry::new();
    let model = registry.of_type(&Type::list_of(string())).unwrap();
    let list = Value::list(["a"]);

    let list = model.set_named(list, "3", Value::from("d")).unwrap();
    let items = list.as_list().unwrap().to_vec();
    assert_eq!(
        items,
        [Value::from("a"), Value::Null, Value::Null, Value::from("d")]
    );
}

#[test]
fn test_list_growth_limit() {
    let registry =
        ModelRegistry::with_config(ModelConfig::default().with_max_sequence_growth(2));
    let model = registry.of_type(&Type::list_of(string())).unwrap();
    let list = Value::list(["a"]);

    let list = model.set_named(list, "2", Value::from("c")).unwrap();
    assert_eq!(list.as_list().unwrap().len(), 3);

    let err = model.set_named(list.clone(), "10", Value::from("k")).unwrap_err();
    assert_eq!(err, Error::GrowthLimit { index: 10, limit: 2 });
    assert_eq!(list.as_list().unwrap().len(), 3);
}

#[test]
fn test_list_walk() {
    let registry = ModelRegistry::new();
    let model = registry.of_type(&Type::list_of(integer())).unwrap();
    let list = Value::list([Value::I32(4), Value::Null, Value::I32(6)]);

    let mut seen = Vec::new();
    model
        .walk(&list, |_, p, v| seen.push(format!("{}={:?}", p.name(), v.as_i32())))
        .unwrap();
    assert_eq!(seen, ["0=Some(4)", "1=None", "2=Some(6)"]);
}

#[test]
fn test_map_properties() {
    let registry = ModelRegistry::new();
    let model = registry
        .of_type(&Type::map_of(string(), integer()))
        .unwrap();
    assert_eq!(model.kind(), ModelKind::Map);

    let [key, value] = model.parameters().unwrap() else {
        panic!("map has two parameters");
    };
    assert_eq!(key.raw_type().as_str(), builtin::STRING);
    assert_eq!(value.raw_type().as_str(), builtin::INTEGER);

    let map = Value::map([("alpha", Value::I32(1))]);
    assert_eq!(model.get_named(&map, "alpha").unwrap(), Value::I32(1));
    assert_eq!(model.get_named(&map, "beta").unwrap(), Value::Null);

    let map = model.set_named(map, "beta", Value::I32(2)).unwrap();
    assert_eq!(map.as_map().unwrap().len(), 2);

    let mut seen = Vec::new();
    model
        .walk(&map, |_, p, v| seen.push((p.name().to_string(), v.clone())))
        .unwrap();
    assert_eq!(
        seen,
        [
            ("alpha".to_string(), Value::I32(1)),
            ("beta".to_string(), Value::I32(2)),
        ]
    );
}

#[test]
fn test_map_key_decoding() {
    let registry = ModelRegistry::new();
    let model = registry
        .of_type(&Type::map_of(integer(), string()))
        .unwrap();
    let map = Value::map([(Value::I32(7), "seven")]);

    assert_eq!(model.get_named(&map, "7").unwrap(), Value::from("seven"));
    assert!(model.property("seven").unwrap().is_none());
}

#[test]
fn test_map_key_named_by_encoded_key() {
    let registry = ModelRegistry::new();
    let model = registry
        .of_type(&Type::map_of(integer(), string()))
        .unwrap();
    let map = Value::map([(Value::I32(1), "one")]);

    let property = model.property("01").unwrap().unwrap();
    assert_eq!(property.name(), "1");
    assert_eq!(model.get(&map, Some(&property)).unwrap(), Value::from("one"));

    let mut walked = Vec::new();
    model
        .walk(&map, |_, property, _| walked.push(property.name().to_string()))
        .unwrap();
    assert_eq!(walked, [property.name()]);
}

#[test]
fn test_map_without_key_codec() {
    let registry = pair_registry();
    let model = registry
        .of_type(&Type::map_of(Type::class("Pair"), string()))
        .unwrap();
    assert!(model.property("anything").unwrap().is_none());
}

#[test]
fn test_array_field() {
    let registry = ModelRegistry::new();
    let classes = registry.classes();
    classes
        .declare(ClassBuilder::new("Samples").field("values", Type::array_of(int())))
        .unwrap();

    let model = registry.of("Samples").unwrap();
    let values = model.property("values").unwrap().expect("values");
    let array_model = values.model();
    assert_eq!(array_model.kind(), ModelKind::Array);
    assert!(array_model.is_atomic());
    assert_eq!(array_model.raw_type().as_str(), "i32[]");
    assert_eq!(
        array_model.parameters().unwrap()[0].raw_type().as_str(),
        builtin::I32
    );

    let array_class = classes.array_of(&int()).unwrap();
    let array = classes.instantiate(&array_class).unwrap();
    let samples = classes.instantiate(&"Samples".into()).unwrap();
    let samples = model.set(samples, Some(&values), array.clone()).unwrap();

    let array = array_model.set_named(array, "1", Value::I32(9)).unwrap();
    let stored = model.get(&samples, Some(&values)).unwrap();
    assert_eq!(array_model.get_named(&stored, "1").unwrap(), Value::I32(9));
    assert_eq!(array_model.get_named(&array, "0").unwrap(), Value::Null);
}

// ============================================================================
// Generics
// ============================================================================

fn generic_registry() -> ModelRegistry {
    let registry = ModelRegistry::new();
    let classes = registry.classes();
    classes
        .declare(
            ClassBuilder::new("Base")
                .type_param("T")
                .field("value", Type::var("Base", "T"))
                .field("history", Type::list_of(Type::var("Base", "T"))),
        )
        .unwrap();
    classes
        .declare(
            ClassBuilder::new("Counter")
                .extends(Type::parameterized("Base", [integer()]))
                .field("step", int()),
        )
        .unwrap();
    registry
}

#[test]
fn test_inherited_type_variables() {
    let registry = generic_registry();
    let model = registry.of("Counter").unwrap();
    assert_eq!(names(&model), ["history", "step", "value"]);

    let value = model.property("value").unwrap().unwrap();
    assert_eq!(value.model().raw_type().as_str(), builtin::INTEGER);

    let history = model.property("history").unwrap().unwrap();
    assert_eq!(history.model().ty(), &Type::list_of(integer()));
    assert!(Arc::ptr_eq(
        history.model(),
        &registry.of_type(&Type::list_of(integer())).unwrap()
    ));
}

#[test]
fn test_generic_model() {
    let registry = generic_registry();
    let ty = Type::parameterized("Base", [string()]);
    let model = registry.of_type(&ty).unwrap();

    assert_eq!(model.kind(), ModelKind::Generic);
    assert_eq!(model.ty(), &ty);
    assert_eq!(model.parameters().unwrap()[0].raw_type().as_str(), builtin::STRING);

    let value = model.property("value").unwrap().unwrap();
    assert_eq!(value.model().raw_type().as_str(), builtin::STRING);

    let other = registry
        .of_type(&Type::parameterized("Base", [integer()]))
        .unwrap();
    assert!(!Arc::ptr_eq(&model, &other));
}

#[test]
fn test_raw_generic_falls_back_to_bound() {
    let registry = generic_registry();
    registry
        .classes()
        .declare(
            ClassBuilder::new("Sorted")
                .type_param_bounded("T", string())
                .field("first", Type::var("Sorted", "T")),
        )
        .unwrap();

    let base = registry.of("Base").unwrap();
    let value = base.property("value").unwrap().unwrap();
    assert_eq!(value.model().raw_type().as_str(), builtin::OBJECT);

    let sorted = registry.of("Sorted").unwrap();
    let first = sorted.property("first").unwrap().unwrap();
    assert_eq!(first.model().raw_type().as_str(), builtin::STRING);
}

/// `Level0<T>` declares the fields; each `Level{n}<T>` passes its own `T`
/// to `Level{n-1}`; `Deep` closes the chain with `Integer`.
fn level_chain(registry: &ModelRegistry, levels: usize) {
    let classes = registry.classes();
    classes
        .declare(
            ClassBuilder::new("Level0")
                .type_param("T")
                .field("value", Type::var("Level0", "T"))
                .field("history", Type::list_of(Type::var("Level0", "T"))),
        )
        .unwrap();
    for level in 1..=levels {
        let id = format!("Level{}", level);
        let parent = format!("Level{}", level - 1);
        classes
            .declare(
                ClassBuilder::new(id.as_str())
                    .type_param("T")
                    .extends(Type::parameterized(parent, [Type::var(id.as_str(), "T")])),
            )
            .unwrap();
    }
    classes
        .declare(
            ClassBuilder::new("Deep")
                .extends(Type::parameterized(format!("Level{}", levels), [integer()])),
        )
        .unwrap();
}

#[test]
fn test_deep_generic_chain() {
    let registry = ModelRegistry::new();
    level_chain(&registry, 16);

    let model = registry.of("Deep").unwrap();
    assert_eq!(names(&model), ["history", "value"]);
    let value = model.property("value").unwrap().unwrap();
    assert_eq!(value.model().raw_type().as_str(), builtin::INTEGER);
    let history = model.property("history").unwrap().unwrap();
    assert_eq!(history.model().ty(), &Type::list_of(integer()));

    let middle = registry
        .of_type(&Type::parameterized("Level8", [string()]))
        .unwrap();
    let value = middle.property("value").unwrap().unwrap();
    assert_eq!(value.model().raw_type().as_str(), builtin::STRING);

    let raw = registry.of("Level12").unwrap();
    let value = raw.property("value").unwrap().unwrap();
    assert_eq!(value.model().raw_type().as_str(), builtin::OBJECT);
}

#[test]
fn test_nested_generic_items() {
    let registry = ModelRegistry::new();
    registry
        .classes()
        .declare(
            ClassBuilder::new("Person")
                .type_param("X")
                .field("id", Type::var("Person", "X")),
        )
        .unwrap();

    let people = Type::list_of(Type::parameterized("Person", [Type::class(builtin::LONG)]));
    let model = registry.of_type(&people).unwrap();
    let person = &model.parameters().unwrap()[0];
    assert_eq!(person.kind(), ModelKind::Generic);

    let id = person.property("id").unwrap().unwrap();
    assert_eq!(id.model().raw_type().as_str(), builtin::LONG);
}

#[test]
fn test_wildcards() {
    let registry = ModelRegistry::new();
    registry
        .classes()
        .declare(
            ClassBuilder::new("Bag")
                .field("upper", Type::list_of(Type::extends(string())))
                .field("lower", Type::list_of(Type::super_of(integer())))
                .field("any", Type::list_of(Type::wildcard())),
        )
        .unwrap();

    let model = registry.of("Bag").unwrap();
    let item = |name: &str| -> String {
        let property = model.property(name).unwrap().unwrap();
        property.model().parameters().unwrap()[0]
            .raw_type()
            .to_string()
    };
    assert_eq!(item("upper"), builtin::STRING);
    assert_eq!(item("lower"), builtin::INTEGER);
    assert_eq!(item("any"), builtin::OBJECT);
}

#[test]
fn test_interface_accessors() {
    let registry = ModelRegistry::new();
    let classes = registry.classes();
    classes
        .declare(
            ClassBuilder::interface("Labeled")
                .type_param("T")
                .method(
                    Method::new("getLabel", Vec::new(), Some(Type::var("Labeled", "T")))
                        .with_body(|this, _| Ok(this.as_object()?.get("label").unwrap_or(Value::Null))),
                )
                .method(
                    Method::new("setLabel", vec![Type::var("Labeled", "T")], None).with_body(
                        |this, args| {
                            this.as_object()?.set("label", args[0].clone());
                            Ok(Value::Null)
                        },
                    ),
                ),
        )
        .unwrap();
    classes
        .declare(
            ClassBuilder::new("Tag")
                .implements(Type::parameterized("Labeled", [string()]))
                .private_field("label", string()),
        )
        .unwrap();

    let model = registry.of("Tag").unwrap();
    assert_eq!(names(&model), ["label"]);
    let label = model.property("label").unwrap().unwrap();
    assert_eq!(label.model().raw_type().as_str(), builtin::STRING);

    let tag = classes.instantiate(&"Tag".into()).unwrap();
    let tag = model.set(tag, Some(&label), Value::from("urgent")).unwrap();
    assert_eq!(model.get(&tag, Some(&label)).unwrap(), Value::from("urgent"));
}

#[test]
fn test_list_subclass_of_itself() {
    let registry = ModelRegistry::new();
    registry
        .classes()
        .declare(
            ClassBuilder::new("Tree")
                .extends(Type::parameterized(builtin::ARRAY_LIST, [Type::class("Tree")])),
        )
        .unwrap();

    let model = registry.of("Tree").unwrap();
    assert_eq!(model.kind(), ModelKind::List);
    assert!(Arc::ptr_eq(&model.parameters().unwrap()[0], &model));

    let tree = registry.classes().instantiate(&"Tree".into()).unwrap();
    let child = registry.classes().instantiate(&"Tree".into()).unwrap();
    let tree = model.set_named(tree, "0", child).unwrap();
    assert_eq!(tree.as_list().unwrap().len(), 1);
}

// ============================================================================
// Recursion and dispatch
// ============================================================================

#[test]
fn test_self_referential_model() {
    let registry = ModelRegistry::new();
    registry
        .classes()
        .declare(
            ClassBuilder::new("Node")
                .field("value", int())
                .field("next", Type::class("Node")),
        )
        .unwrap();

    let model = registry.of("Node").unwrap();
    let next = model.property("next").unwrap().unwrap();
    assert!(Arc::ptr_eq(next.model(), &model));
}

#[test]
fn test_mutually_recursive_models() {
    let registry = ModelRegistry::new();
    let classes = registry.classes();
    classes
        .declare(ClassBuilder::new("Left").field("right", Type::class("Right")))
        .unwrap();
    classes
        .declare(ClassBuilder::new("Right").field("left", Type::class("Left")))
        .unwrap();

    let left = registry.of("Left").unwrap();
    let right = left.property("right").unwrap().unwrap();
    // Children are created lazily
    assert!(!right.model().is_initialized());

    let back = right.model().property("left").unwrap().unwrap();
    assert!(Arc::ptr_eq(back.model(), &left));
    assert!(right.model().is_initialized());
}

#[test]
fn test_virtual_dispatch_on_runtime_class() {
    let registry = ModelRegistry::new();
    let classes = registry.classes();
    classes
        .declare(ClassBuilder::new("Animal").accessor("sound", string()))
        .unwrap();
    classes
        .declare(
            ClassBuilder::new("Dog").extends(Type::class("Animal")).method(
                Method::new("getSound", Vec::new(), Some(string()))
                    .with_body(|_, _| Ok(Value::from("woof"))),
            ),
        )
        .unwrap();

    let model = registry.of("Animal").unwrap();
    let animal = classes.instantiate(&"Animal".into()).unwrap();
    let animal = model.set_named(animal, "sound", Value::from("...")).unwrap();
    let dog = classes.instantiate(&"Dog".into()).unwrap();

    assert_eq!(model.get_named(&animal, "sound").unwrap(), Value::from("..."));
    assert_eq!(model.get_named(&dog, "sound").unwrap(), Value::from("woof"));
}

#[test]
fn test_synthetic_subclass_shares_model() {
    let registry = pair_registry();
    registry
        .classes()
        .declare(
            ClassBuilder::new("Pair$Generated")
                .extends(Type::class("Pair"))
                .synthetic(),
        )
        .unwrap();

    let model = registry.of("Pair").unwrap();
    let generated = registry.of("Pair$Generated").unwrap();
    assert!(Arc::ptr_eq(&model, &generated));
}

#[test]
fn test_proxy_declarations_skipped() {
    let registry = pair_registry();
    registry
        .classes()
        .declare(
            ClassBuilder::new("PairProxy")
                .extends(Type::class("Pair"))
                .proxy()
                .accessor("handler", string()),
        )
        .unwrap();

    let model = registry.of("PairProxy").unwrap();
    assert_eq!(names(&model), ["age", "name"]);
}

#[test]
fn test_failed_init_can_be_retried() {
    let registry = ModelRegistry::new();
    let classes = registry.classes();
    classes
        .declare(ClassBuilder::new("Holder").field("part", Type::class("Part")))
        .unwrap();

    assert!(matches!(registry.of("Holder"), Err(Error::UnknownClass(_))));

    classes
        .declare(ClassBuilder::new("Part").field("size", int()))
        .unwrap();
    let model = registry.of("Holder").unwrap();
    assert_eq!(names(&model), ["part"]);
}

// ============================================================================
// Accessor and field rules
// ============================================================================

#[test]
fn test_incompatible_pair_dropped() {
    let registry = ModelRegistry::new();
    registry
        .classes()
        .declare(
            ClassBuilder::new("Odd")
                .method(Method::new("getValue", Vec::new(), Some(string())))
                .method(Method::new("setValue", vec![integer()], None))
                .method(Method::new("getLoose", Vec::new(), Some(string())))
                .method(Method::new("setLoose", vec![Type::class(builtin::OBJECT)], None))
                .method(Method::new("getOnly", Vec::new(), Some(string()))),
        )
        .unwrap();

    let model = registry.of("Odd").unwrap();
    assert_eq!(names(&model), ["loose"]);
    let loose = model.property("loose").unwrap().unwrap();
    assert_eq!(loose.model().raw_type().as_str(), builtin::STRING);
}

#[test]
fn test_private_accessors_follow_config() {
    let declare = |registry: &ModelRegistry| {
        registry
            .classes()
            .declare(
                ClassBuilder::new("Vault")
                    .method(
                        Method::new("getSecret", Vec::new(), Some(string()))
                            .with_modifiers(Modifiers::PRIVATE),
                    )
                    .method(
                        Method::new("setSecret", vec![string()], None)
                            .with_modifiers(Modifiers::PRIVATE),
                    ),
            )
            .unwrap();
    };

    let registry = ModelRegistry::new();
    declare(&registry);
    assert!(names(&registry.of("Vault").unwrap()).is_empty());

    let registry = ModelRegistry::with_config(ModelConfig::default().with_private_accessors(true));
    declare(&registry);
    assert_eq!(names(&registry.of("Vault").unwrap()), ["secret"]);
}

#[test]
fn test_static_and_native_members_skipped() {
    let registry = ModelRegistry::new();
    registry
        .classes()
        .declare(
            ClassBuilder::new("Config")
                .static_field("INSTANCE", string())
                .private_field("hidden", string())
                .field_with(
                    Field::new("handle", Type::class(builtin::I64))
                        .with_modifiers(Modifiers::PUBLIC | Modifiers::NATIVE),
                )
                .method(
                    Method::new("getShared", Vec::new(), Some(string()))
                        .with_modifiers(Modifiers::PUBLIC | Modifiers::STATIC),
                )
                .method(
                    Method::new("setShared", vec![string()], None)
                        .with_modifiers(Modifiers::PUBLIC | Modifiers::STATIC),
                )
                .field("visible", string()),
        )
        .unwrap();

    assert_eq!(names(&registry.of("Config").unwrap()), ["visible"]);
}

#[test]
fn test_final_fields() {
    let registry = ModelRegistry::new();
    let classes = registry.classes();
    classes
        .declare(
            ClassBuilder::new("Settings")
                .final_field("id", int())
                .final_field("tags", Type::list_of(string())),
        )
        .unwrap();

    let model = registry.of("Settings").unwrap();
    assert_eq!(names(&model), ["tags"]);

    // Final reference fields are readable but not reassigned
    let settings = classes.instantiate(&"Settings".into()).unwrap();
    settings
        .as_object()
        .unwrap()
        .set("tags", Value::list(["a"]));
    let settings = model
        .set_named(settings, "tags", Value::list(["b", "c"]))
        .unwrap();
    let tags = model.get_named(&settings, "tags").unwrap();
    assert_eq!(tags.as_list().unwrap().to_vec(), [Value::from("a")]);
}

#[test]
fn test_managed_and_transient_fields() {
    let registry = ModelRegistry::new();
    registry
        .classes()
        .declare(
            ClassBuilder::new("Session")
                .managed_field("owner", string())
                .transient_field("cache", string())
                .accessor_field(
                    Field::new("token", string())
                        .with_modifiers(Modifiers::PRIVATE | Modifiers::TRANSIENT),
                ),
        )
        .unwrap();

    let model = registry.of("Session").unwrap();
    assert_eq!(names(&model), ["cache", "owner", "token"]);
    assert!(model.property("cache").unwrap().unwrap().is_transient());
    assert!(model.property("token").unwrap().unwrap().is_transient());
    assert!(!model.property("owner").unwrap().unwrap().is_transient());
}

#[test]
fn test_accessor_wins_over_field() {
    let registry = ModelRegistry::new();
    registry
        .classes()
        .declare(
            ClassBuilder::new("Shadow")
                .field("value", integer())
                .method(Method::new("getValue", Vec::new(), Some(string())))
                .method(Method::new("setValue", vec![string()], None)),
        )
        .unwrap();

    let model = registry.of("Shadow").unwrap();
    let value = model.property("value").unwrap().unwrap();
    assert_eq!(value.model().raw_type().as_str(), builtin::STRING);
}

#[test]
fn test_record_copy_on_write() {
    let registry = ModelRegistry::new();
    let classes = registry.classes();
    classes
        .declare(
            ClassBuilder::record("Point")
                .component("x", int())
                .component("y", int()),
        )
        .unwrap();

    let model = registry.of("Point").unwrap();
    assert_eq!(names(&model), ["x", "y"]);

    let point = classes
        .construct(&"Point".into(), &[Value::I32(1), Value::I32(2)])
        .unwrap();
    let moved = model.set_named(point.clone(), "x", Value::I32(5)).unwrap();

    assert_ne!(moved, point);
    assert_eq!(model.get_named(&point, "x").unwrap(), Value::I32(1));
    assert_eq!(model.get_named(&moved, "x").unwrap(), Value::I32(5));
    assert_eq!(model.get_named(&moved, "y").unwrap(), Value::I32(2));
}

#[test]
fn test_enum_property() {
    let registry = ModelRegistry::new();
    let classes = registry.classes();
    classes
        .declare(ClassBuilder::enumeration("Color", ["Red", "Green"]))
        .unwrap();
    classes
        .declare(ClassBuilder::new("Car").field("color", Type::class("Color")))
        .unwrap();

    let model = registry.of("Car").unwrap();
    let color = model.property("color").unwrap().unwrap();
    assert_eq!(color.model().kind(), ModelKind::Scalar);
    assert!(!color.model().is_nullable());

    let car = classes.instantiate(&"Car".into()).unwrap();
    assert_eq!(
        model.get(&car, Some(&color)).unwrap().as_constant(),
        Some("Red")
    );

    let green = color.model().decode("Green").unwrap();
    let car = model.set(car, Some(&color), green.clone()).unwrap();
    let car = model.set(car, Some(&color), Value::Null).unwrap();
    assert_eq!(model.get(&car, Some(&color)).unwrap(), green);
    assert_eq!(color.model().encode(&green).unwrap(), "Green");
}

#[test]
fn test_observable_field() {
    let registry = ModelRegistry::new();
    let classes = registry.classes();
    classes
        .declare(
            ClassBuilder::new("Gauge")
                .field("level", Type::variable_of(int()))
                .field("label", string()),
        )
        .unwrap();

    let model = registry.of("Gauge").unwrap();
    let level = model.property("level").unwrap().unwrap();
    assert!(level.is_observable());
    assert_eq!(level.model().raw_type().as_str(), builtin::I32);

    let gauge = classes.instantiate(&"Gauge".into()).unwrap();
    let signal = model.observe(&gauge, Some(&level)).unwrap();
    let gauge = model.set(gauge, Some(&level), Value::I32(5)).unwrap();
    assert_eq!(signal.try_next(), Some(Value::I32(5)));
    assert_eq!(model.get(&gauge, Some(&level)).unwrap(), Value::I32(5));

    let label = model.property("label").unwrap().unwrap();
    assert!(!label.is_observable());
    assert!(model.observe(&gauge, Some(&label)).unwrap().try_next().is_none());
    assert!(model.observe(&gauge, None).unwrap().try_next().is_none());
}

#[test]
fn test_observable_holder_installed_on_write() {
    let registry = ModelRegistry::new();
    let classes = registry.classes();
    classes
        .declare(ClassBuilder::new("Meter").field("reading", Type::variable_of(string())))
        .unwrap();

    let model = registry.of("Meter").unwrap();
    let meter = classes.instantiate(&"Meter".into()).unwrap();
    meter.as_object().unwrap().set("reading", Value::Null);

    assert_eq!(model.get_named(&meter, "reading").unwrap(), Value::Null);
    let meter = model.set_named(meter, "reading", Value::from("ok")).unwrap();
    assert_eq!(model.get_named(&meter, "reading").unwrap(), Value::from("ok"));
    assert!(meter.as_object().unwrap().get("reading").unwrap().as_variable().is_ok());
}

#[test]
fn test_scalar_model() {
    let registry = ModelRegistry::new();
    let model = registry.of(builtin::INTEGER).unwrap();
    assert_eq!(model.kind(), ModelKind::Scalar);
    assert!(model.is_atomic());
    assert!(model.is_nullable());
    assert!(model.property("anything").unwrap().is_none());
    assert_eq!(model.decode(" 42 ").unwrap(), Value::I32(42));
    assert_eq!(model.encode(&Value::I32(42)).unwrap(), "42");

    let string_model = registry.of(builtin::STRING).unwrap();
    assert!(string_model.accepts(&Value::from("x")));
    assert!(!string_model.accepts(&Value::I32(1)));
}

#[test]
fn test_of_value_uses_runtime_class() {
    let registry = pair_registry();
    let pair = registry.classes().instantiate(&"Pair".into()).unwrap();
    let model = registry.of_value(&pair).unwrap().expect("model");
    assert_eq!(model.raw_type().as_str(), "Pair");
    assert!(registry.of_value(&Value::Null).unwrap().is_none());
}
