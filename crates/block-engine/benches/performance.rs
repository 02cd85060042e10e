use block_engine::{Block, BlockCommand, BlockKind, BlockModel, BlockPatch, CommandProcessor};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn large_document(block_count: usize) -> Vec<Block> {
    (0..block_count)
        .map(|i| {
            Block::new(
                BlockKind::Paragraph,
                format!("{i:06} the quick brown fox jumps over the lazy dog"),
            )
        })
        .collect()
}

fn bench_document_open(c: &mut Criterion) {
    let blocks = large_document(10_000);
    c.bench_function("document_open/10k_blocks", |b| {
        b.iter(|| {
            let model = BlockModel::new(black_box(blocks.clone()));
            black_box(model.len());
        })
    });
}

fn bench_split_in_middle(c: &mut Criterion) {
    let blocks = large_document(10_000);
    c.bench_function("split_middle/100_splits", |b| {
        b.iter_batched(
            || BlockModel::new(blocks.clone()),
            |mut model| {
                let middle = model.len() / 2;
                for _ in 0..100 {
                    CommandProcessor::apply(
                        &mut model,
                        BlockCommand::SplitAt { index: middle },
                    );
                }
                black_box(model.len());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_random_moves(c: &mut Criterion) {
    let blocks = large_document(10_000);
    c.bench_function("reorder/100_random_moves", |b| {
        b.iter_batched(
            || (BlockModel::new(blocks.clone()), StdRng::seed_from_u64(42)),
            |(mut model, mut rng)| {
                for _ in 0..100 {
                    let from = rng.gen_range(0..model.len());
                    let to = rng.gen_range(0..model.len());
                    model.move_to(from, to);
                }
                black_box(model.version());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_text_commits(c: &mut Criterion) {
    let blocks = large_document(10_000);
    c.bench_function("update_plain/1k_commits", |b| {
        b.iter_batched(
            || BlockModel::new(blocks.clone()),
            |mut model| {
                let index = model.len() / 2;
                for i in 0..1_000 {
                    model.update(index, BlockPatch::plain(format!("typed {i}")));
                }
                black_box(model.version());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_id_lookup(c: &mut Criterion) {
    let blocks = large_document(10_000);
    let model = BlockModel::new(blocks);
    let id = model.get_at(model.len() - 1).unwrap().id.clone();
    c.bench_function("index_of/last_of_10k", |b| {
        b.iter(|| black_box(model.index_of(black_box(&id))));
    });
}

criterion_group!(
    benches,
    bench_document_open,
    bench_split_in_middle,
    bench_random_moves,
    bench_text_commits,
    bench_id_lookup
);
criterion_main!(benches);
