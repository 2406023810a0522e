use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use goscan::{GoSource, TagSet};
use goscan_syntax::lexer::Lexer;
use std::fmt::Write;
use std::hint::black_box as bb;

/// A file with `n` tagged declarations of each shape and `n` methods.
fn generate(n: usize) -> String {
    let mut s = String::from("package bench\n\nimport \"context\"\n\ntype Svc struct{}\n\nvar (\n");
    for i in 0..n {
        let _ = write!(
            s,
            "\t// parser\n\tint{i} = {i}\n\n\t// parser\n\tname{i} = \"value-{i}\"\n\n\
             \t// parser\n\tlist{i} = []float64{{1.5, 2.5, {i}.25}}\n\n\
             \t// parser\n\ttable{i} = map[int]string{{{i}: \"a\", {}: \"b\"}}\n\n\
             \tplain{i} = {i}\n\n",
            i + 1
        );
    }
    s.push_str(")\n\n");
    for i in 0..n {
        let _ = writeln!(
            s,
            "func (s *Svc) Method{i}(ctx context.Context, id int) error {{\n\tif id > {i} {{\n\t\treturn nil\n\t}}\n\treturn nil\n}}\n"
        );
    }
    s
}

fn bench_lexer(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");
    for n in [10, 100, 1000] {
        let input = generate(n);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter(|| {
                let mut lx = Lexer::new(bb(input));
                let count = lx.by_ref().count();
                bb((count, lx.take_comments().len()))
            });
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for n in [10, 100, 1000] {
        let input = generate(n);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter(|| GoSource::parse(bb(input.as_str())).map(|s| s.tree().decls().len()));
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let n = 500;
    let src = match GoSource::parse(generate(n)) {
        Ok(src) => src,
        Err(err) => panic!("benchmark input does not parse: {err}"),
    };
    let tags = TagSet::from(["parser"]);
    group.throughput(Throughput::Elements(n as u64));

    group.bench_function("scalar_i64", |b| b.iter(|| bb(src.scalar_values::<i64>(bb(&tags)))));
    group.bench_function("scalar_string", |b| b.iter(|| bb(src.scalar_values::<String>(bb(&tags)))));
    group.bench_function("sequence_f64", |b| b.iter(|| bb(src.sequence_values::<f64>(bb(&tags)))));
    group.bench_function("mapping_i64_string", |b| {
        b.iter(|| bb(src.mapping_values::<i64, String>(bb(&tags))))
    });
    group.bench_function("function_names", |b| {
        b.iter(|| bb(src.function_names(bb("Svc"), &["Context", "int"])))
    });
    group.finish();
}

criterion_group!(benches, bench_lexer, bench_parse, bench_queries);
criterion_main!(benches);
