use criterion::{black_box, criterion_group, criterion_main, Criterion};

use permafrost::board::position::Position;
use permafrost::movegen::legal_moves::{generate_legal_moves, perft};
use permafrost::movegen::magic::init_attack_tables;

fn legal_moves_bench(c: &mut Criterion) {
    init_attack_tables();
    let pos = Position::startpos();

    c.bench_function("legal_moves_startpos", |b| {
        b.iter(|| {
            let moves = generate_legal_moves(black_box(&pos));
            black_box(moves);
        });
    });
}

fn perft_bench(c: &mut Criterion) {
    init_attack_tables();

    c.bench_function("perft_3_startpos", |b| {
        b.iter(|| {
            let mut pos = black_box(Position::startpos());
            black_box(perft(&mut pos, 3));
        });
    });
}

criterion_group!(
    name = movegen_benches;
    config = Criterion::default().sample_size(100);
    targets = legal_moves_bench, perft_bench,
);
criterion_main!(movegen_benches);
