use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use tempo::{
    prelude::*,
    search::move_ordering::{order_moves, promote_to_front},
};

const POSITIONS: &[(&str, &str)] = &[
    ("Start", START_FEN),
    ("Kiwipete", KIWIPETE),
    (
        "Tactical",
        "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 0 1",
    ),
    ("Endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
];

fn bench_order_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_moves");

    for (name, fen) in POSITIONS {
        let board = Board::from_fen(fen).unwrap();
        let move_count = board.legal_moves().len();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{name}_({move_count})_moves")),
            &board,
            |b, board| {
                b.iter_batched(
                    || board.legal_moves(),
                    |mut moves| {
                        let tactical = order_moves(board, &mut moves);
                        black_box((tactical, moves))
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

fn bench_promote_to_front(c: &mut Criterion) {
    let board = Board::from_fen(KIWIPETE).unwrap();
    let moves = board.legal_moves();
    let Some(&last) = moves.last() else {
        return;
    };

    c.bench_function("promote_last_to_front", |b| {
        b.iter_batched(
            || moves.clone(),
            |mut moves| black_box(promote_to_front(&mut moves, last)),
            BatchSize::SmallInput,
        )
    });
}

/// Fixed-depth material-only search, where ordering decides most of the cost.
fn bench_search_by_position(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_depth_4");
    group.sample_size(10);

    for (name, fen) in POSITIONS {
        let mut board = Board::from_fen(fen).unwrap();
        let mut searcher = Searcher::new(
            MaterialEvaluator::new(),
            SearchConfig {
                use_tt: false,
                collect_stats: false,
                ..Default::default()
            },
        );
        group.bench_function(*name, |b| {
            b.iter(|| black_box(searcher.search_depth(&mut board, 4)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_order_moves,
    bench_promote_to_front,
    bench_search_by_position
);
criterion_main!(benches);
