//! Cross-parser comparison benchmarks.
//!
//! Compares SDLang against:
//! - serde_json (JSON, into a DOM)
//! - toml (TOML, into a table)
//! - quick-xml (XML, streaming SAX parser)
//!
//! Each format gets the same records. Both the SDLang event stream and the
//! SDLang tree are measured, so the streaming rows compare with quick-xml
//! and the tree rows with the DOM parsers.
//!
//! Run with: cargo bench --bench compare

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader as XmlReader;
use sdlang_core::{push_value, EventLog, NullVisitor, Scanner, Tag};

struct Documents {
    sdl: String,
    json: String,
    toml: String,
    xml: String,
}

/// Flat documents of `count` records with an id, a name and a score.
fn generate_flat_documents(count: usize) -> Documents {
    let mut sdl = String::new();
    let mut json = String::from("{\"item\": [\n");
    let mut toml = String::new();
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<root>\n");

    for i in 0..count {
        sdl.push_str(&format!(
            "item id={} score={}.5d {{\n    name \"Item number {}\"\n}}\n",
            i, i, i
        ));

        let comma = if i + 1 < count { "," } else { "" };
        json.push_str(&format!(
            "  {{\"id\": {}, \"score\": {}.5, \"name\": \"Item number {}\"}}{}\n",
            i, i, i, comma
        ));

        toml.push_str(&format!(
            "[[item]]\nid = {}\nscore = {}.5\nname = \"Item number {}\"\n\n",
            i, i, i
        ));

        xml.push_str(&format!("  <item id=\"{}\" score=\"{}.5\">\n", i, i));
        xml.push_str(&format!("    <name>Item number {}</name>\n", i));
        xml.push_str("  </item>\n");
    }

    json.push_str("]}\n");
    xml.push_str("</root>\n");

    Documents { sdl, json, toml, xml }
}

fn parse_sdl_events(input: &str) -> usize {
    let mut log = EventLog::new();
    if push_value(&mut Scanner::new(input), &mut log).is_err() {
        return 0;
    }
    black_box(&log.events);
    log.events.len()
}

fn parse_sdl_tree(input: &str) -> usize {
    Tag::parse(input).map(|root| root.children.len()).unwrap_or(0)
}

fn parse_json(input: &str) -> usize {
    let value: serde_json::Value = serde_json::from_str(input).unwrap_or(serde_json::Value::Null);
    value["item"].as_array().map_or(0, Vec::len)
}

fn parse_toml(input: &str) -> usize {
    let table: toml::Table = input.parse().unwrap_or_default();
    table.get("item").and_then(|v| v.as_array()).map_or(0, Vec::len)
}

/// Parse XML and count element starts.
fn parse_xml(input: &str) -> usize {
    let mut reader = XmlReader::from_str(input);
    reader.config_mut().trim_text(true);
    let mut elements = 0;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(XmlEvent::Eof) => break,
            Ok(ref event) => {
                black_box(event);
                if matches!(event, XmlEvent::Start(_) | XmlEvent::Empty(_)) {
                    elements += 1;
                }
            }
            Err(e) => panic!("XML parse error: {:?}", e),
        }
        buf.clear();
    }
    elements
}

/// Records per second across parsers.
fn bench_parser_comparison(c: &mut Criterion) {
    for count in [50, 200, 1000] {
        let docs = generate_flat_documents(count);

        assert_eq!(parse_sdl_tree(&docs.sdl), count);
        assert_eq!(parse_json(&docs.json), count);
        assert_eq!(parse_toml(&docs.toml), count);

        println!(
            "\n{} records: SDL={}B  JSON={}B  TOML={}B  XML={}B/{}elem",
            count,
            docs.sdl.len(),
            docs.json.len(),
            docs.toml.len(),
            docs.xml.len(),
            parse_xml(&docs.xml)
        );

        let mut group = c.benchmark_group(format!("compare_{}records", count));
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("sdlang-null", ""), &docs.sdl, |b, doc| {
            b.iter(|| push_value(&mut Scanner::new(black_box(doc)), &mut NullVisitor))
        });

        group.bench_with_input(BenchmarkId::new("sdlang-events", ""), &docs.sdl, |b, doc| {
            b.iter(|| parse_sdl_events(black_box(doc)))
        });

        group.bench_with_input(BenchmarkId::new("sdlang-tree", ""), &docs.sdl, |b, doc| {
            b.iter(|| parse_sdl_tree(black_box(doc)))
        });

        group.bench_with_input(BenchmarkId::new("serde_json", ""), &docs.json, |b, doc| {
            b.iter(|| parse_json(black_box(doc)))
        });

        group.bench_with_input(BenchmarkId::new("toml", ""), &docs.toml, |b, doc| {
            b.iter(|| parse_toml(black_box(doc)))
        });

        group.bench_with_input(BenchmarkId::new("quick-xml", ""), &docs.xml, |b, doc| {
            b.iter(|| parse_xml(black_box(doc)))
        });

        group.finish();
    }
}

criterion_group!(benches, bench_parser_comparison);
criterion_main!(benches);
