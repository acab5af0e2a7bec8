// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Bench code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Benches panic on failure
#![allow(clippy::semicolon_if_nothing_returned)] // Benchmark code formatting

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use hdds_clone::reflect::{builtin, Kind, StructBuilder, Type, Value};
use hdds_clone::{copy_scalar_value, Classifier};

/// Struct with `width` fields cycling through scalar, array, nested and
/// reference kinds.
fn wide_struct(width: usize) -> Type {
    let int = Type::scalar(Kind::Int);
    let point = StructBuilder::new("Point")
        .scalar_field("X", Kind::Float64)
        .scalar_field("Y", Kind::Float64)
        .build();

    (0..width)
        .fold(StructBuilder::new(format!("Wide{}", width)), |b, i| {
            let name = format!("F{}", i);
            match i % 6 {
                0 => b.scalar_field(name, Kind::Int64),
                1 => b.private_field(name, Type::scalar(Kind::String)),
                2 => b.field(name, Type::array_of(&point, 4)),
                3 => b.field(name, builtin::time_type()),
                4 => b.private_field(name, Type::pointer_to(&int)),
                _ => b.field(name, Type::map_of(&int, &point)),
            }
        })
        .build()
}

// ============================================================================
// Classification Benchmarks
// ============================================================================

/// Benchmark: classify a type already in the cache
/// Target: < 100 ns (one shard read + Arc clone)
fn bench_classify_cached(c: &mut Criterion) {
    let classifier = Classifier::new();
    let ty = wide_struct(24);
    classifier.classify(&ty).unwrap();

    c.bench_function("classify_cached", |b| {
        b.iter(|| black_box(classifier.classify(black_box(&ty)).unwrap()))
    });
}

/// Benchmark: classify a 24-field type with an empty cache
fn bench_classify_cold(c: &mut Criterion) {
    let ty = wide_struct(24);

    c.bench_function("classify_cold_24_fields", |b| {
        b.iter_batched(
            Classifier::new,
            |classifier| black_box(classifier.classify(&ty).unwrap()),
            BatchSize::SmallInput,
        )
    });
}

/// Benchmark: classify a chain of 8 nested structs with an empty cache
fn bench_classify_nested_cold(c: &mut Criterion) {
    let mut ty = StructBuilder::new("Leaf")
        .field("P", Type::pointer_to(&Type::scalar(Kind::Int)))
        .build();
    for depth in 0..8 {
        ty = StructBuilder::new(format!("Level{}", depth))
            .scalar_field("Tag", Kind::Uint32)
            .field("Inner", ty)
            .build();
    }

    c.bench_function("classify_nested_cold_8_levels", |b| {
        b.iter_batched(
            Classifier::new,
            |classifier| black_box(classifier.classify(&ty).unwrap()),
            BatchSize::SmallInput,
        )
    });
}

// ============================================================================
// Extraction Benchmarks
// ============================================================================

/// Benchmark: copy_scalar_value on a private string field
fn bench_copy_private_string(c: &mut Criterion) {
    let ty = StructBuilder::new("Account")
        .private_field("owner", Type::scalar(Kind::String))
        .build();
    let value = Value::from_fields(&ty, vec![Value::from("alice")]).unwrap();
    let owner = value.field(0).unwrap();

    c.bench_function("copy_private_string", |b| {
        b.iter(|| black_box(copy_scalar_value(black_box(owner.clone()))))
    });
}

criterion_group!(
    classify_benches,
    bench_classify_cached,
    bench_classify_cold,
    bench_classify_nested_cold
);

criterion_group!(extract_benches, bench_copy_private_string);

criterion_main!(classify_benches, extract_benches);
