//! Benchmarks for route matching and navigation
//!
//! Run with: cargo bench

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use frame_spa::document::{Document, MemoryDocument};
use frame_spa::history::{empty_state, History, MemoryHistory};
use frame_spa::query_string::{encode_query, get_query_param, to_ordered_map};
use frame_spa::router::{ParamMatching, RoutePattern};
use frame_spa::view::TemplateView;
use frame_spa::{Route, Router};
use serde_json::json;

fn create_routes(count: usize) -> Vec<Route> {
    (0..count)
        .map(|i| {
            Route::view(format!("/section{}/:id/items/:item", i), |_| {
                TemplateView::new("<title>{id}</title><p>{item}</p>")
            })
        })
        .collect()
}

fn bench_pattern(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern");

    group.bench_function("compile", |b| {
        b.iter(|| {
            RoutePattern::compile(black_box("/users/:id/posts/:post"), ParamMatching::Greedy)
                .unwrap()
        })
    });

    for matching in [ParamMatching::Greedy, ParamMatching::Segment] {
        let pattern = RoutePattern::compile("/users/:id/posts/:post", matching).unwrap();

        group.bench_function(format!("captures_{:?}", matching), |b| {
            b.iter(|| pattern.captures(black_box("/users/42/posts/1337")))
        });

        group.bench_function(format!("miss_{:?}", matching), |b| {
            b.iter(|| pattern.captures(black_box("/accounts/42/settings")))
        });
    }

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    let query = to_ordered_map(&json!({
        "page": 3,
        "sort": "name asc",
        "filter": {"active": true, "roles": ["admin", "editor"]},
    }));

    group.bench_function("encode", |b| b.iter(|| encode_query(black_box(&query))));

    let search = format!("?{}", encode_query(&query));
    group.bench_function("get_param", |b| {
        b.iter(|| get_query_param(black_box(&search), black_box("filter")))
    });

    group.finish();
}

fn bench_navigation(c: &mut Criterion) {
    let mut group = c.benchmark_group("navigation");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    for size in [10, 100] {
        let history: Arc<dyn History> = Arc::new(MemoryHistory::new());
        let document: Arc<dyn Document> = Arc::new(MemoryDocument::with_container("#app"));
        let router = Router::new("#app", create_routes(size), None, history, document).unwrap();
        let last = format!("/section{}/7/items/9", size - 1);

        group.throughput(Throughput::Elements(1));

        group.bench_function(format!("navigate_last_of_{}", size), |b| {
            b.iter(|| {
                runtime
                    .block_on(router.navigate_to(black_box(&last), &json!({}), empty_state()))
                    .unwrap()
            })
        });

        group.bench_function(format!("navigate_not_found_of_{}", size), |b| {
            b.iter(|| {
                runtime
                    .block_on(router.navigate_to(black_box("/nowhere"), &json!({}), empty_state()))
                    .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pattern, bench_query, bench_navigation);
criterion_main!(benches);
