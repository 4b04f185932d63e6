use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use minefield::solver::{
    model::Model,
    search::BacktrackingSearch,
    sum::add_sum_variable,
    variable::{Value, Variable},
};

/// A revealed clue over `n` unknown cells: exactly `target` of them are
/// hazardous. This is the model shape every deduction step produces.
fn clue_model(n: usize, target: i64) -> Model {
    let mut model = Model::new();
    let cells: Vec<Variable> = (0..n).map(|y| Variable::cell(0, y)).collect();
    for cell in &cells {
        model
            .add_variable(cell.clone(), [Value::Int(0), Value::Int(1)])
            .expect("fresh variable");
    }
    let total = add_sum_variable(&mut model, "clue", &cells, n as i64).expect("terms registered");
    model
        .add_unary_predicate(&total, move |v| *v == Value::Int(target))
        .expect("total registered");
    model
}

fn bench_clue_neighborhoods(c: &mut Criterion) {
    let mut group = c.benchmark_group("clue_neighborhood");
    for n in [4usize, 6, 8] {
        let model = clue_model(n, (n / 2) as i64);
        for (label, mcv, ac3) in [
            ("plain", false, false),
            ("mcv", true, false),
            ("ac3", false, true),
            ("mcv+ac3", true, true),
        ] {
            group.bench_with_input(
                BenchmarkId::new(label, n),
                &model,
                |bencher, model| {
                    let search = BacktrackingSearch::new(mcv, ac3);
                    bencher.iter(|| black_box(search.solve(model)));
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_clue_neighborhoods);
criterion_main!(benches);
