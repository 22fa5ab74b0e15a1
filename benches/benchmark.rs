//! Performance benchmarks for the VCF genotype editor
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vcf_editor::core::{filter, io, CellKey, EditLedger, PositionFilter};
use vcf_editor::formats::vcf::{parse, parse_text, serialize};
use vcf_editor::Compression;

/// Build a synthetic VCF with `rows` records and `samples` sample columns
fn synthetic_vcf(rows: usize, samples: usize) -> String {
    let mut text = String::from("##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT");
    for s in 0..samples {
        text.push_str(&format!("\tS{}", s));
    }
    text.push('\n');
    for i in 0..rows {
        text.push_str(&format!("chr{}\t{}\t.\tA\tG\t50\tPASS\tDP=30\tGT", i % 22 + 1, 1000 + i * 10));
        for s in 0..samples {
            text.push_str(if (i + s) % 3 == 0 { "\t0/1" } else { "\t0/0" });
        }
        text.push('\n');
    }
    text
}

/// Benchmark parsing plain and gzip input
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for rows in [1_000usize, 10_000] {
        let text = synthetic_vcf(rows, 10);
        let gz = io::compress(&text, 6).unwrap();
        group.throughput(Throughput::Elements(rows as u64));

        group.bench_with_input(BenchmarkId::new("plain", rows), &text, |b, text| {
            b.iter(|| black_box(parse_text(black_box(text)).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("gzip", rows), &gz, |b, gz| {
            b.iter(|| black_box(parse(black_box(gz), Compression::Gzip).unwrap()))
        });
    }
    group.finish();
}

/// Benchmark chromosome + range filtering
fn bench_filter(c: &mut Criterion) {
    let (_, table) = parse_text(&synthetic_vcf(10_000, 10)).unwrap();
    let range = PositionFilter::Range { start: 10_000, end: 60_000 };

    c.bench_function("filter_range", |b| {
        b.iter(|| black_box(filter(&table, black_box("chr5"), Some(&range))))
    });
}

/// Benchmark ledger application and serialization
fn bench_apply_serialize(c: &mut Criterion) {
    let (header, table) = parse_text(&synthetic_vcf(10_000, 10)).unwrap();
    let mut ledger = EditLedger::new();
    for i in (0..10_000).step_by(7) {
        ledger.set(CellKey::new(format!("chr{}", i % 22 + 1), 1000 + i * 10, "S3"), "1/1");
    }

    c.bench_function("apply_all", |b| {
        b.iter(|| {
            let mut working = table.clone();
            black_box(ledger.apply_all(&mut working))
        })
    });

    c.bench_function("serialize", |b| {
        b.iter(|| black_box(serialize(&header, &table)))
    });
}

criterion_group!(benches, bench_parse, bench_filter, bench_apply_serialize);
criterion_main!(benches);
