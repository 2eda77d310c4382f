use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use data_validator::{Column, Table};
use feature_engine::TransformPlan;
use model_search::{RandomizedSearch, Ridge, SearchConfig};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

const JOBS: [&str; 5] = ["at_home", "health", "other", "services", "teacher"];

fn create_student_like_table(n_rows: usize) -> Table {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let g1: Vec<i64> = (0..n_rows).map(|_| rng.gen_range(0..=20)).collect();
    let g2: Vec<i64> = g1.iter().map(|g| (g + rng.gen_range(-2..=2)).clamp(0, 20)).collect();
    let absences: Vec<i64> = (0..n_rows).map(|_| rng.gen_range(0..=30)).collect();
    let studytime: Vec<i64> = (0..n_rows).map(|_| rng.gen_range(1..=4)).collect();
    let job: Vec<&str> = (0..n_rows).map(|_| JOBS[rng.gen_range(0..JOBS.len())]).collect();
    let g3: Vec<i64> = g2.iter().map(|g| (g + rng.gen_range(-1..=1)).clamp(0, 20)).collect();

    Table::new(vec![
        Column::integer("G1", g1),
        Column::integer("G2", g2),
        Column::integer("absences", absences),
        Column::integer("studytime", studytime),
        Column::text("Mjob", job),
        Column::integer("G3", g3),
    ])
    .unwrap()
}

fn plan() -> TransformPlan {
    TransformPlan {
        standard: vec!["G1".into(), "G2".into()],
        robust: vec!["absences".into()],
        binary: Vec::new(),
        nominal: vec!["Mjob".into()],
        target: "G3".into(),
    }
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("randomized_search");
    group.sample_size(10);

    for n_rows in [100, 400, 1600].iter() {
        let table = create_student_like_table(*n_rows);
        let search = RandomizedSearch::new(SearchConfig {
            n_iter: 20,
            ..SearchConfig::default()
        });

        group.bench_with_input(BenchmarkId::new("fit", n_rows), &table, |b, table| {
            b.iter(|| search.fit(&plan(), &Ridge::default(), black_box(table)).unwrap())
        });
    }

    group.finish();
}

fn bench_ridge(c: &mut Criterion) {
    let table = create_student_like_table(2000);
    let fitted = plan().fit(&table).unwrap();
    let x = fitted.apply(&table).unwrap();
    let y = fitted.target(&table).unwrap();

    c.bench_function("ridge_fit_2000x9", |b| {
        b.iter(|| Ridge::new(1.0).fit(black_box(x.values()), black_box(&y)).unwrap())
    });
}

criterion_group!(benches, bench_search, bench_ridge);
criterion_main!(benches);
