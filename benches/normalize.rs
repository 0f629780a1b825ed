//! Benchmarks for header location and row normalization over synthetic sheets.
//!
//! Run with: cargo bench --bench normalize

use std::hint::black_box;

use auction_ingest::ingestion::csv::decode_csv;
use auction_ingest::ingestion::{ImportOptions, normalize_rows, parse_workbook, resolve_columns};
use auction_ingest::schema::{AuctionSchema, PropertyAuction};
use auction_ingest::types::{Grid, grid_from_strings};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

const HEADER: [&str; 8] = [
    "Event No",
    "Event Type",
    "Property Type",
    "Reserve Price (Rs.)",
    "EMD Amount",
    "Auction Start Date & Time",
    "City",
    "Images",
];

fn synthetic_rows(n: usize) -> Vec<Vec<String>> {
    let mut rows = vec![
        vec!["Punjab National Bank - E-Auction Notice".to_string()],
        HEADER.iter().map(|h| h.to_string()).collect(),
    ];
    for i in 0..n {
        rows.push(vec![
            format!("PNB/{i}"),
            "Sale".to_string(),
            if i % 3 == 0 { "Plot" } else { "Residential Flat" }.to_string(),
            format!("{},00,000", 10 + i % 90),
            format!("{},000", 100 + i % 900),
            format!("{:02}-{:02}-2024 11:00", 1 + i % 28, 1 + i % 12),
            "Pune".to_string(),
            format!("https://cdn.example.in/lots/{i}.jpg"),
        ]);
        if i % 50 == 0 {
            rows.push(vec![String::new(); HEADER.len()]);
        }
    }
    rows
}

fn to_csv(rows: &[Vec<String>]) -> Vec<u8> {
    let mut out = String::new();
    for row in rows {
        let quoted: Vec<String> = row.iter().map(|c| format!("\"{c}\"")).collect();
        out.push_str(&quoted.join(","));
        out.push('\n');
    }
    out.into_bytes()
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_rows");
    let options = ImportOptions::default();

    for n in [1_000, 10_000, 50_000] {
        let grid: Grid = grid_from_strings(synthetic_rows(n));
        let columns = resolve_columns(&grid[1], PropertyAuction::synonyms());

        group.bench_with_input(BenchmarkId::new("property", n), &n, |b, _| {
            b.iter(|| {
                let res = normalize_rows::<PropertyAuction>(black_box(&grid), 2, &columns, &options);
                black_box(res.successful_rows())
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_import");
    let options = ImportOptions::default();

    for n in [1_000, 10_000] {
        let bytes = to_csv(&synthetic_rows(n));
        group.bench_with_input(BenchmarkId::new("decode_and_parse", n), &bytes, |b, bytes| {
            b.iter(|| {
                let wb = decode_csv(black_box(bytes), "lots").unwrap();
                let res = parse_workbook::<PropertyAuction>(&wb, &options).unwrap();
                black_box(res.total_rows)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_end_to_end);
criterion_main!(benches);
