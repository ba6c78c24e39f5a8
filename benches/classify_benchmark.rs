//! Benchmarks for folio classification and rendering.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use folio::{BookMetadata, Folio, FormatType, RenderOptions, TextUnit};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Cursor;

const WORDS: &[&str] = &[
    "the", "api", "layer", "book", "model", "chapter", "data", "system", "design", "query",
    "user", "cpu", "memory", "cache", "network", "service",
];

fn sentence(rng: &mut StdRng, words: usize) -> String {
    (0..words)
        .map(|_| WORDS[rng.gen_range(0..WORDS.len())])
        .collect::<Vec<_>>()
        .join(" ")
}

/// Creates manuscript lines mixing numbered headings, markers and body text.
fn create_units(count: usize) -> Vec<TextUnit> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut section = 0;
    let mut chapter = 0;

    (0..count)
        .map(|_| match rng.gen_range(0..20) {
            0 => {
                section += 1;
                chapter = 0;
                TextUnit::line(format!("{}. {}", section, sentence(&mut rng, 3)))
            }
            1 | 2 => {
                chapter += 1;
                TextUnit::line(format!("{}.{} {}", section, chapter, sentence(&mut rng, 4)))
            }
            3 => TextUnit::line(format!("CHAPTER {} — {}", chapter + 1, sentence(&mut rng, 3))),
            _ => TextUnit::line(sentence(&mut rng, 40)),
        })
        .collect()
}

/// Creates a synthetic DOCX manuscript with the given number of paragraphs.
fn create_test_docx(paragraph_count: usize) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));

    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(br#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#).unwrap();

    zip.start_file("word/styles.xml", options).unwrap();
    zip.write_all(br#"<?xml version="1.0" encoding="UTF-8"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/></w:style>
</w:styles>"#).unwrap();

    let mut body = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
    );

    for i in 0..paragraph_count {
        let style = match i % 25 {
            0 => r#"<w:pPr><w:pStyle w:val="Heading1"/></w:pPr>"#,
            5 | 15 => r#"<w:pPr><w:pStyle w:val="Heading2"/></w:pPr>"#,
            _ => "",
        };
        body.push_str(&format!(
            r#"<w:p>{}<w:r><w:t xml:space="preserve">Paragraph {} with some test content for benchmarking purposes. </w:t></w:r><w:r><w:t>Café déjà vu.</w:t></w:r></w:p>"#,
            style, i
        ));
    }
    body.push_str("</w:body></w:document>");

    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(body.as_bytes()).unwrap();

    zip.finish().unwrap();
    buffer
}

/// Benchmark heading classification at various sizes.
fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");

    for unit_count in [100, 1000, 10000].iter() {
        let units = create_units(*unit_count);

        group.throughput(Throughput::Elements(*unit_count as u64));
        group.bench_with_input(
            BenchmarkId::new("units", unit_count),
            &units,
            |b, units| {
                b.iter(|| folio::classify(black_box(units.clone())));
            },
        );
    }

    group.finish();
}

/// Benchmark heading normalization.
fn bench_normalization(c: &mut Criterion) {
    let structure = folio::classify(create_units(5000));

    c.bench_function("normalize_headings", |b| {
        b.iter(|| folio::normalize(black_box(&structure.headings)));
    });
}

/// Benchmark DOCX manuscript parsing.
fn bench_docx_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("docx_parsing");

    for para_count in [10, 100, 1000].iter() {
        let data = create_test_docx(*para_count);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("paragraphs", para_count),
            &data,
            |b, data| {
                b.iter(|| {
                    let _ = Folio::new().parse_bytes(black_box(data.clone()), FormatType::Docx);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark book rendering.
fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");
    let metadata = BookMetadata::new("Benchmark Book", "Bench Author");
    let options = RenderOptions::default();

    for unit_count in [100, 1000].iter() {
        let structure = folio::classify(create_units(*unit_count));

        group.bench_with_input(
            BenchmarkId::new("docx", unit_count),
            &structure,
            |b, structure| {
                b.iter(|| folio::render::render_docx(black_box(structure), &metadata, &options));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("pdf", unit_count),
            &structure,
            |b, structure| {
                b.iter(|| folio::render::render_pdf(black_box(structure), &metadata, &options));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_classification,
    bench_normalization,
    bench_docx_parsing,
    bench_rendering,
);
criterion_main!(benches);
