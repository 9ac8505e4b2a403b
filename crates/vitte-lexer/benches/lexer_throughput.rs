//! Throughput of `Lexer::tokenize` over a handful of representative source
//! sizes, from a single function body up to a module with many of them.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vitte_lexer::Lexer;
use vitte_span::FileId;

fn repeated_fn(count: usize) -> String {
    let mut src = String::from("module demo\n");
    for i in 0..count {
        src.push_str(&format!(
            "fn f{i}(a, b) -> i32\n  let x = a + b * {i}\n  if x == 0\n    return 0\n  else\n    return x\n  .end\n.end\n"
        ));
    }
    src
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_tokenize");
    for count in [1usize, 16, 256] {
        let src = repeated_fn(count);
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &src, |b, src| {
            b.iter(|| Lexer::tokenize(black_box(src), FileId(1)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
