use criterion::{Criterion, criterion_group, criterion_main};
use inline_mentions_engine::{
    Cmd, Document, EditorSession, GridLayout, GridMetrics, MentionDecorator, OverlayOptions,
    QueryMode, SpanRegistry, TriggerOverlayController, TextLayout,
};
use std::hint::black_box;

fn mention_heavy_blocks(count: usize) -> Vec<(String, String)> {
    (0..count)
        .map(|i| {
            (
                format!("b{i}"),
                format!("line {i} mentions @alice and @bob then asks @carol{i} about it"),
            )
        })
        .collect()
}

fn bench_decorate(c: &mut Criterion) {
    let mut group = c.benchmark_group("decorate");
    group.sample_size(20);

    let decorator = MentionDecorator::default();
    let text = "hey @alice, @bob and @carol: ".repeat(20);
    group.bench_function("decorate_block", |b| {
        b.iter(|| black_box(decorator.decorate(black_box(&text))));
    });

    group.finish();
}

fn bench_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompute");
    group.sample_size(20);

    let blocks = mention_heavy_blocks(200);
    let mut doc = Document::from_blocks(blocks.iter().map(|(k, t)| (k.as_str(), t.as_str())));
    let mut registry = SpanRegistry::new();
    doc.commit(&MentionDecorator::default(), &mut registry);
    doc.apply(Cmd::move_to("b150", 30)).unwrap();
    doc.commit(&MentionDecorator::default(), &mut registry);

    let layout = GridLayout::new(GridMetrics::cells(0, 0, 80));
    let native = layout.native_selection(&doc);
    let mut controller = TriggerOverlayController::new(OverlayOptions {
        trigger: '@',
        query_mode: QueryMode::UntilCursor,
    });

    group.bench_function("locate_extract_position", |b| {
        b.iter(|| {
            let state = controller.recompute(&doc, &registry, &native);
            black_box(state.left);
        });
    });

    group.finish();
}

fn bench_keystroke(c: &mut Criterion) {
    let mut group = c.benchmark_group("keystroke");
    group.sample_size(20);

    let blocks = mention_heavy_blocks(50);
    let layout = GridLayout::new(GridMetrics::cells(0, 0, 80));

    group.bench_function("type_and_delete", |b| {
        let doc = Document::from_blocks(blocks.iter().map(|(k, t)| (k.as_str(), t.as_str())));
        let mut session = EditorSession::new(doc, OverlayOptions::default());
        session.apply(Cmd::move_to("b25", 20), &layout).unwrap();
        b.iter(|| {
            session.apply(Cmd::insert("x"), &layout).unwrap();
            session.apply(Cmd::DeleteBackward, &layout).unwrap();
            black_box(session.overlay().is_visible());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_decorate, bench_recompute, bench_keystroke);
criterion_main!(benches);
