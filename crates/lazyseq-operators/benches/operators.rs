use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lazyseq_operators::SequenceExt;

fn make_input(rows: usize) -> Vec<(String, i64)> {
    (0..rows)
        .map(|i| (format!("group-{}", i % 16), ((i * 7919) % 1024) as i64))
        .collect()
}

fn bench_streaming(c: &mut Criterion) {
    let input = make_input(4096);
    c.bench_function("where_select", |b| {
        b.iter(|| {
            input
                .iter()
                .where_matching(|(_, v)| v % 3 == 0)
                .select(|(_, v)| v * 2)
                .fold(0i64, |acc, v| acc + v)
        })
    });
}

fn bench_buffering(c: &mut Criterion) {
    let input = make_input(4096);
    c.bench_function("group_by", |b| {
        b.iter(|| {
            input
                .iter()
                .group_by(|(g, _)| g.clone(), |(_, v)| *v, |_, vs| vs.len())
                .count()
        })
    });
    c.bench_function("order_by", |b| {
        b.iter(|| black_box(input.iter().order_by(|(_, v)| *v).count()))
    });
    c.bench_function("distinct", |b| {
        b.iter(|| black_box(input.iter().select(|(_, v)| *v).distinct().count()))
    });
    c.bench_function("distinct_by_scan", |b| {
        b.iter(|| black_box(input.iter().select(|(_, v)| *v).distinct_by_scan().count()))
    });
}

criterion_group!(operators, bench_streaming, bench_buffering);
criterion_main!(operators);
