//! Benchmarks for untable extraction and normalization.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic pages shaped like a college profile.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use untable::{
    EntityPages, ExtractOptions, FieldSpecTable, HtmlOptions, PageDocument, TableBlock,
};

const RULES: &str = r#"{
    "fields": [
        { "name": "Rainy Days (annual mean)", "sources": ["Rainy Days"],
          "extract": "(\\d+)", "range": { "min": 0, "max": 366 } },
        { "name": "Demographics pct Asian", "sources": ["Asian"],
          "extract": "([\\d\\.]+) Asian", "range": { "min": 0, "max": 100 } },
        { "name": "*delete*", "sources": [{ "pattern": "^Men\\*+$" }] }
    ]
}"#;

/// Creates a synthetic entity with `tables` tables per page over six pages.
fn create_entity(id: usize, tables: usize) -> EntityPages {
    let mut entity = EntityPages::new(id.to_string());
    for page in 0..6 {
        let mut doc = PageDocument::new(format!("page{}", page)).with_headline("Example College");
        for t in 0..tables {
            doc.add_table(
                TableBlock::new()
                    .row("Rainy Days", ["120 days"])
                    .row("Men", [format!("{}", t)])
                    .row("Asian", ["12.3 Asian"]),
            );
            doc.add_table(
                TableBlock::with_columns(["Very Important", "Important", "Considered"])
                    .heading("Factor")
                    .row("GPA", ["X", "", ""])
                    .row("Essay", ["", "X", ""]),
            );
            doc.add_table(
                TableBlock::with_columns(["Required", "Recommended"])
                    .heading("Subject")
                    .row("English", ["4", "4"])
                    .row("Math", ["3", "4"]),
            );
        }
        entity.pages.push(doc);
    }
    entity
}

/// Creates a synthetic HTML page with `rows` single-value rows.
fn create_html(rows: usize) -> String {
    let mut html = String::from("<html><body><h1>Example College</h1><div id=\"main\"><table>");
    for i in 0..rows {
        html.push_str(&format!("<tr><th>Label {}</th><td>{} units</td></tr>", i, i));
    }
    html.push_str("</table></div></body></html>");
    html
}

/// Benchmark extraction at various table counts.
fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");
    let options = ExtractOptions::default();

    for tables in [1, 5, 20].iter() {
        let entity = create_entity(1, *tables);
        group.bench_function(format!("{}_tables_per_page", tables), |b| {
            b.iter(|| untable::extract_entity(black_box(&entity), &options));
        });
    }

    group.finish();
}

/// Benchmark the full pipeline over many entities.
fn bench_pipeline(c: &mut Criterion) {
    let rules = FieldSpecTable::from_json(RULES).unwrap();
    let entities: Vec<_> = (0..100).map(|i| create_entity(i, 5)).collect();

    c.bench_function("pipeline_parallel_100", |b| {
        b.iter(|| untable::process_entities(black_box(&entities), &rules, &ExtractOptions::default()));
    });

    c.bench_function("pipeline_sequential_100", |b| {
        let options = ExtractOptions::new().sequential();
        b.iter(|| untable::process_entities(black_box(&entities), &rules, &options));
    });
}

/// Benchmark HTML reading.
fn bench_html(c: &mut Criterion) {
    let html = create_html(200);
    let reader = untable::HtmlReader::new(HtmlOptions::new().with_scope("#main")).unwrap();

    c.bench_function("read_html_200_rows", |b| {
        b.iter(|| reader.read(black_box(&html), "overview"));
    });
}

criterion_group!(benches, bench_extraction, bench_pipeline, bench_html);
criterion_main!(benches);
