use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use stockroom::tokio_postgres::types::Type;
use stockroom::{Endpoint, FilterQuery, Method, UpdateSet};

/// `n` optional conditions, every other one blank.
fn build_filter(n: usize) -> String {
    let mut q = FilterQuery::new("SELECT * FROM products WHERE is_active = true");
    for i in 0..n {
        let value = if i % 2 == 0 { format!("v{i}") } else { String::new() };
        q.and_where_opt("(name ILIKE $? OR sku ILIKE $?)", value);
    }
    let mut stmt = q.build();
    stmt.push(" ORDER BY name").limit_offset(50, 0);
    stmt.into_parts().0
}

fn bench_filter_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter/build");

    for n in [1, 5, 20, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_filter(n)));
        });
    }

    group.finish();
}

fn bench_update_set(c: &mut Criterion) {
    let body = serde_json::json!({
        "name": "Widget",
        "description": "Hex bolt, zinc plated",
        "selling_price": "0.25",
        "is_active": true,
        "secret_cost": 1,
    });
    let fields = body.as_object().cloned().unwrap_or_default();
    let allowed = [
        ("name", Type::VARCHAR),
        ("description", Type::TEXT),
        ("cost_price", Type::NUMERIC),
        ("selling_price", Type::NUMERIC),
        ("is_active", Type::BOOL),
    ];

    c.bench_function("patch/from_json_fields", |b| {
        b.iter(|| {
            let set = UpdateSet::from_json_fields("products", black_box(&fields), &allowed);
            black_box(set.and_then(|s| s.finish("id", 12_i32)).map(|s| s.into_parts().0))
        });
    });
}

fn bench_route_resolve(c: &mut Criterion) {
    let table = Endpoint::table().expect("inventory routes");
    let mut group = c.benchmark_group("route/resolve");

    for (label, method, path) in [
        ("exact", Method::Get, "/stock-movements"),
        ("param", Method::Put, "/categories/42"),
        ("miss", Method::Get, "/warehouses/1"),
    ] {
        group.bench_function(label, |b| {
            b.iter(|| black_box(table.resolve(method.as_str(), black_box(path)).is_ok()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_filter_build,
    bench_update_set,
    bench_route_resolve
);
criterion_main!(benches);
