//! Throughput of `Parser::parse_core` over modules of increasing size,
//! each `fn` built from a small fixed statement grammar.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vitte_arena::Interner;
use vitte_diagnostics::DiagnosticBag;
use vitte_lexer::Lexer;
use vitte_parser::{ParseBudget, Parser};
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

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_parse_core");
    for count in [1usize, 16, 256] {
        let src = repeated_fn(count);
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &src, |b, src| {
            b.iter(|| {
                let tokens = Lexer::tokenize(black_box(src), FileId(1));
                let mut interner = Interner::new();
                let mut diags = DiagnosticBag::new();
                let p = Parser::new(tokens, &mut interner, &mut diags, ParseBudget::unlimited());
                p.parse_core()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
