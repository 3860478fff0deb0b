use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use std::sync::Arc;
use std::thread;

use prodcat_catalog::{Catalog, query};
use prodcat_core::{Clock, ProductId, SystemClock};
use prodcat_products::Rating;
use rust_decimal::Decimal;

fn seeded_catalog(products: u32) -> Arc<Catalog> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let catalog = Arc::new(Catalog::new(clock));
    for id in 0..products {
        catalog
            .create_generic(ProductId::new(id), format!("P{id}"), Decimal::new(199, 2), Rating::NotRated)
            .unwrap();
    }
    catalog
}

fn bench_single_thread_review(c: &mut Criterion) {
    let catalog = seeded_catalog(100);

    c.bench_function("apply_review_single_thread", |b| {
        b.iter(|| {
            catalog
                .apply_review(black_box(ProductId::new(42)), Rating::FourStar, "bench")
                .unwrap()
        })
    });
}

fn bench_contended_reviews(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_review_contended");

    for threads in [2usize, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let catalog = seeded_catalog(10);
                let handles: Vec<_> = (0..threads)
                    .map(|t| {
                        let catalog = Arc::clone(&catalog);
                        thread::spawn(move || {
                            for _ in 0..100 {
                                catalog
                                    .apply_review(ProductId::new((t % 10) as u32), Rating::ThreeStar, "bench")
                                    .unwrap();
                            }
                        })
                    })
                    .collect();
                for h in handles {
                    h.join().unwrap();
                }
            })
        });
    }

    group.finish();
}

fn bench_enumerate(c: &mut Criterion) {
    let catalog = seeded_catalog(1_000);

    c.bench_function("enumerate_1000_products", |b| {
        b.iter(|| {
            catalog
                .enumerate(query::price_below(Decimal::new(200, 2)), query::rating_desc_then_price_desc)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_single_thread_review, bench_contended_reviews, bench_enumerate);
criterion_main!(benches);
