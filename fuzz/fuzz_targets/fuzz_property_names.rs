// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use propmodel::{builtin, Codec, Model, ModelConfig, ModelRegistry, Type, Value};
use std::sync::{Arc, OnceLock};

struct Fixture {
    _registry: ModelRegistry,
    list: Arc<Model>,
    map: Arc<Model>,
    chars: Arc<Model>,
}

fn fixture() -> &'static Fixture {
    static FIXTURE: OnceLock<Fixture> = OnceLock::new();
    FIXTURE.get_or_init(|| {
        let registry = ModelRegistry::with_config(ModelConfig::default().with_max_sequence_growth(64));
        let list = registry
            .of_type(&Type::list_of(Type::class(builtin::STRING)))
            .expect("list model");
        let map = registry
            .of_type(&Type::map_of(Type::class(builtin::INTEGER), Type::class(builtin::STRING)))
            .expect("map model");
        let chars = registry
            .of_type(&Type::map_of(Type::class(builtin::CHARACTER), Type::class(builtin::BOOLEAN)))
            .expect("char map model");
        Fixture {
            _registry: registry,
            list,
            map,
            chars,
        }
    })
}

fuzz_target!(|data: &[u8]| {
    let Ok(name) = std::str::from_utf8(data) else {
        return;
    };
    let fixture = fixture();

    // Property names are arbitrary caller text: absent, never a panic
    let list = Value::list(["a", "b"]);
    let _ = fixture.list.get_named(&list, name);
    let _ = fixture.list.set_named(list, name, Value::from(name));

    let map = Value::map([(Value::I32(1), "one")]);
    let _ = fixture.map.get_named(&map, name);
    let _ = fixture.map.set_named(map, name, Value::from(name));

    let flags = Value::map(Vec::<(Value, Value)>::new());
    let _ = fixture.chars.set_named(flags, name, Value::Bool(true));

    for model in [&fixture.list, &fixture.map] {
        if let Some(codec) = model.parameters().ok().and_then(|p| p.first()).and_then(|m| m.codec().cloned()) {
            let _ = codec.decode(name);
        }
    }
});
