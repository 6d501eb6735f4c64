use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rozhodci::controller::GameController;

fn perft_benchmark(c: &mut Criterion) {
    // Starting position perft benchmarks
    let mut group = c.benchmark_group("perft_starting_position");
    group
        .significance_level(0.1)
        .sample_size(20)
        .measurement_time(std::time::Duration::from_secs(20));

    // Each iteration replays the whole move tree, so keep the sample count small
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut controller = GameController::new();
                black_box(controller.perft(depth))
            });
        });
    }
    group.finish();

    // A busier middlegame position with castles, pins and an en passant square
    let mut group = c.benchmark_group("perft_kiwipete");
    group
        .significance_level(0.1)
        .sample_size(20)
        .measurement_time(std::time::Duration::from_secs(20));

    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut controller = GameController::new();
                controller
                    .new_game_from_fen(
                        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -",
                    )
                    .unwrap();
                black_box(controller.perft(depth))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, perft_benchmark);
criterion_main!(benches);
