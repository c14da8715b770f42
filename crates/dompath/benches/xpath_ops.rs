//! Path construction and XPath compilation benchmarks.
//!
//! Run with: `cargo bench --bench xpath_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dompath::path::property::{
    contains, has_aggregated_text_equal_to, has_any_of_classes, has_class, has_role, has_text,
};
use dompath::paths::{DIV, FORM, INPUT, LABEL, SPAN};
use dompath::xpath::literal;
use dompath::{occurrence_number, Path};

fn nested(depth: usize) -> Path {
    (0..depth).fold(INPUT.clone(), |acc, i| {
        acc.inside(&DIV.with_class(format!("level-{i}")))
    })
}

fn grid_cell() -> Path {
    let content = DIV
        .that([has_any_of_classes(["ag-body-viewport", "ag-body"])])
        .inside(&DIV.with_class("grid"));
    let row = DIV
        .that([has_role("row")])
        .inside(&content)
        .described_by("row with index 3");
    DIV.that([has_role("gridcell")])
        .inside(&row)
        .that([has_aggregated_text_equal_to("Celica")])
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_construction");

    group.bench_function("that_chain", |bench| {
        bench.iter(|| {
            let path = INPUT
                .that([has_class("a")])
                .that([has_text("b")])
                .that([has_role("textbox")]);
            black_box(path);
        });
    });

    for depth in [1, 3, 10] {
        group.bench_with_input(BenchmarkId::new("inside", depth), &depth, |bench, d| {
            bench.iter(|| black_box(nested(*d)));
        });
    }

    group.finish();
}

fn bench_compilation(c: &mut Criterion) {
    let mut group = c.benchmark_group("xpath_compilation");

    let cases = vec![
        ("tag", SPAN.clone()),
        ("containment", LABEL.that([has_text("Name")]).containing(&INPUT)),
        ("union", SPAN.or(&DIV).inside(&FORM)),
        ("occurrence", occurrence_number(3).unwrap().of(&INPUT)),
        ("nested_10", nested(10)),
        ("grid_cell", grid_cell()),
        (
            "relation_target_union",
            DIV.that([contains(&SPAN.or(&INPUT))]),
        ),
    ];

    for (name, path) in &cases {
        group.bench_with_input(BenchmarkId::new("to_xpath", name), path, |bench, p| {
            bench.iter(|| black_box(p.to_xpath()));
        });
        group.bench_with_input(BenchmarkId::new("describe", name), path, |bench, p| {
            bench.iter(|| black_box(p.describe()));
        });
    }

    group.finish();
}

fn bench_literals(c: &mut Criterion) {
    let mut group = c.benchmark_group("literal");

    for (name, value) in [
        ("plain", "Submit"),
        ("single_quote", "it's"),
        ("both_quotes", "say \"it's\" twice, it's fine"),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &value, |bench, v| {
            bench.iter(|| black_box(literal(black_box(v))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_construction, bench_compilation, bench_literals);
criterion_main!(benches);
