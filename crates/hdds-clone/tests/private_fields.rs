// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Private-field extraction through the public API.
//!
//! A minimal deep-copy walker drives the classifier and the extractor the
//! way a cloning library would: recurse into the fields the classifier
//! reports, rebuild everything else from its raw contents.

use hdds_clone::reflect::{Kind, StructBuilder, Type, Value};
use hdds_clone::{copy_scalar_value, Classifier};

/// Copy of a value holding no shared state.
fn copy_flat(v: &Value) -> Value {
    match v.kind() {
        Kind::Struct => {
            let fields = (0..v.num_field())
                .map(|i| copy_flat(&v.field(i).expect("field")))
                .collect();
            Value::from_fields(v.ty(), fields).expect("struct literal")
        }
        Kind::Array => copy_array(v, copy_flat),
        kind if kind.is_opaque() => copy_scalar_value(v.clone()),
        kind => panic!("{} holds shared state", kind),
    }
}

fn copy_array(v: &Value, copy: impl Fn(&Value) -> Value) -> Value {
    let len = v.ty().array_len().expect("array");
    let elem = v.ty().elem().expect("array element");
    let elems = (0..len).map(|i| copy(&v.index(i).expect("index"))).collect();
    Value::array(&elem, elems)
        .and_then(|a| a.convert(v.ty()))
        .expect("array literal")
}

fn deep_copy(classifier: &Classifier, v: &Value) -> Value {
    match v.kind() {
        Kind::Pointer => match v.elem() {
            None => Value::zero(v.ty()),
            Some(target) => Value::new_pointer(deep_copy(classifier, &target))
                .convert(v.ty())
                .expect("pointer"),
        },
        Kind::Struct => {
            let st = classifier.classify(v.ty()).expect("struct");
            if st.is_shallow() {
                return copy_flat(v);
            }
            let fields = (0..v.num_field())
                .map(|i| {
                    let field = v.field(i).expect("field");
                    if st.iter().any(|f| f.index == i) {
                        deep_copy(classifier, &field)
                    } else {
                        copy_flat(&field)
                    }
                })
                .collect();
            Value::from_fields(v.ty(), fields).expect("struct literal")
        }
        Kind::Array => copy_array(v, |e| deep_copy(classifier, e)),
        _ => copy_flat(v),
    }
}

fn answer(_args: &[Value]) -> Vec<Value> {
    vec![Value::from("forty-two")]
}

fn describe(_recv: &Value, _args: &[Value]) -> Vec<Value> {
    vec![Value::from("session")]
}

fn session_type() -> Type {
    let int = Type::scalar(Kind::Int);
    let limits = StructBuilder::new("limits")
        .private_field("min", Type::scalar(Kind::Int32))
        .private_field("max", Type::scalar(Kind::Int32))
        .build();
    let cache = StructBuilder::new("cache")
        .private_field("hits", Type::pointer_to(&int))
        .build();

    StructBuilder::new("Session")
        .field("Id", Type::scalar(Kind::Uint64))
        .private_field("user", Type::scalar(Kind::String))
        .private_field("ratio", Type::scalar(Kind::Float32))
        .private_field("limits", limits)
        .private_field("window", Type::array_of(&Type::scalar(Kind::Uint16), 3))
        .private_field("cache", cache)
        .private_field("hook", Type::scalar(Kind::Func))
        .method("Describe", describe)
        .build()
}

fn session(hits: &Value, hook: Value) -> Value {
    let ty = session_type();
    let limits = ty.field(3).expect("limits").ty.clone();
    let window = ty.field(4).expect("window").ty.clone();
    let cache = ty.field(5).expect("cache").ty.clone();

    Value::from_fields(
        &ty,
        vec![
            Value::from(7u64),
            Value::from("alice"),
            Value::from(0.25f32),
            Value::from_fields(&limits, vec![Value::from(-3i32), Value::from(9i32)])
                .expect("limits"),
            Value::array(
                &Type::scalar(Kind::Uint16),
                vec![Value::from(1u16), Value::from(2u16), Value::from(3u16)],
            )
            .and_then(|a| a.convert(&window))
            .expect("window"),
            Value::from_fields(&cache, vec![hits.clone()]).expect("cache"),
            hook,
        ],
    )
    .expect("session")
}

#[test]
fn private_scalars_become_readable() {
    let hits = Value::new_pointer(Value::from(5isize));
    let original = session(&hits, Value::func(answer));

    assert!(original.field(1).and_then(|v| v.get::<String>()).is_err());

    let user = copy_scalar_value(original.field(1).expect("user"));
    assert_eq!(user.get::<String>(), Ok("alice".to_string()));

    let ratio = copy_scalar_value(original.field(2).expect("ratio"));
    assert_eq!(ratio.get::<f32>(), Ok(0.25));

    // Read-only propagates into nested private structs.
    let max = original
        .field(3)
        .and_then(|limits| limits.field(1))
        .expect("limits.max");
    assert!(!max.can_interface());
    assert_eq!(copy_scalar_value(max).get::<i32>(), Ok(9));

    let hook = copy_scalar_value(original.field(6).expect("hook"));
    assert_eq!(hook.call(&[]), Ok(vec![Value::from("forty-two")]));
}

#[test]
fn deep_copy_detaches_private_pointers() {
    let classifier = Classifier::new();
    let hits = Value::new_pointer(Value::from(5isize));
    let original = session(&hits, Value::func(answer));

    let st = classifier.classify(original.ty()).expect("struct");
    assert_eq!(st.iter().map(|f| f.index).collect::<Vec<_>>(), vec![5]);

    let copy = deep_copy(&classifier, &original);
    assert_eq!(copy.field(0).and_then(|v| v.get::<u64>()), Ok(7));
    assert_eq!(
        copy.field(4).ok().and_then(|w| w.index(2)).and_then(|v| v.as_uint()),
        Some(3)
    );

    let copied_hits = copy
        .field(5)
        .and_then(|c| c.field(0))
        .expect("cache.hits");
    assert_ne!(copied_hits.pointer(), hits.pointer());
    assert_eq!(copied_hits.elem().and_then(|v| v.as_int()), Some(5));

    // Writes through the original pointer do not reach the copy.
    hits.set_elem(Value::from(6isize)).expect("set");
    assert_eq!(copied_hits.elem().and_then(|v| v.as_int()), Some(5));
    let original_hits = original
        .field(5)
        .and_then(|c| c.field(0))
        .expect("cache.hits");
    assert_eq!(original_hits.elem().and_then(|v| v.as_int()), Some(6));
}

#[test]
fn method_value_hooks_are_dropped() {
    let classifier = Classifier::new();
    let owner = Value::zero(&session_type());
    let hook = owner.method_by_name("Describe").expect("Describe");
    assert_eq!(hook.call(&[]), Ok(vec![Value::from("session")]));

    let hits = Value::new_pointer(Value::from(1isize));
    let original = session(&hits, hook);
    let copy = deep_copy(&classifier, &original);

    assert!(copy.field(6).expect("hook").is_nil());
}
