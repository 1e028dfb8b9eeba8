use criterion::{black_box, criterion_group, criterion_main, Criterion};
use swapem::core::moves::{adjacent_pairs, swap_creates_match};
use swapem::core::{
    find_matches, has_valid_move, resolve_cascade, CascadeContext, ColorPalette, GameSession,
    Grid, SeededRng,
};

fn bench_find_matches(c: &mut Criterion) {
    let palette = ColorPalette::new(5).unwrap();
    let grid = Grid::random(&palette, &mut SeededRng::new(12345));

    c.bench_function("find_matches", |b| b.iter(|| find_matches(black_box(&grid))));
}

fn bench_has_valid_move(c: &mut Criterion) {
    let palette = ColorPalette::new(8).unwrap();
    let grid = Grid::generate(&palette, &mut SeededRng::new(12345));

    c.bench_function("has_valid_move", |b| b.iter(|| has_valid_move(black_box(&grid))));
}

fn bench_all_swaps(c: &mut Criterion) {
    let palette = ColorPalette::new(8).unwrap();
    let grid = Grid::generate(&palette, &mut SeededRng::new(12345));

    c.bench_function("validate_all_112_swaps", |b| {
        b.iter(|| {
            adjacent_pairs()
                .filter(|mv| swap_creates_match(black_box(&grid), *mv))
                .count()
        })
    });
}

fn bench_resolve_cascade(c: &mut Criterion) {
    let palette = ColorPalette::new(5).unwrap();
    let mut rng = SeededRng::new(12345);

    c.bench_function("resolve_random_grid", |b| {
        b.iter(|| {
            let mut grid = Grid::random(&palette, &mut rng);
            let mut ctx = CascadeContext::new();
            resolve_cascade(&mut grid, &palette, &mut rng, &mut ctx, |_| {})
        })
    });
}

fn bench_session_move(c: &mut Criterion) {
    let mut session = GameSession::with_seed(ColorPalette::new(6).unwrap(), 12345);

    c.bench_function("session_hinted_move", |b| {
        b.iter(|| {
            let Some(mv) = session.hint() else {
                session.restart();
                return;
            };
            session.select(mv.from);
            session.select(mv.to);
            session.take_events();
        })
    });
}

criterion_group!(
    benches,
    bench_find_matches,
    bench_has_valid_move,
    bench_all_swaps,
    bench_resolve_cascade,
    bench_session_move
);
criterion_main!(benches);
