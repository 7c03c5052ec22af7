//! Example: Parse SDLang to a tree and navigate it.
//!
//! Run with: cargo run --example tree_parse
//! Set RUST_LOG=sdlang_core=trace to watch the token stream.

use std::sync::Once;

use sdlang_core::Tag;

static TRACING_INIT: Once = Once::new();

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

const INPUT: &str = r#"# Server configuration
server:web port=8080 "primary" {
    path "/var/www" index=`index.html`
    started 2005/11/23 10:14:23.253-GMT+01:00 uptime=1d:02:03:04
    key [aGVsbG8gd29ybGQ=]
    matrix {
        1 2 3
        4 5 6
    }
}
"#;

fn main() {
    init_tracing();

    let root = match Tag::parse(INPUT) {
        Ok(root) => root,
        Err(err) => {
            eprintln!("parse failed: {}", err);
            std::process::exit(1);
        }
    };

    println!("=== Document Tree ===\n");
    for tag in &root.children {
        print_tag(tag, 0);
    }

    println!("\n=== Lookups ===\n");
    if let Some(server) = root.child("server:web") {
        println!("namespace: {:?}", server.name.namespace());
        println!("port:      {}", server.attribute_integer_or("port", 80));
        println!("label:     {}", server.value_str_or(0, "unnamed"));
        if let Some(started) = server.child("started") {
            println!("started:   {:?}", started.value_date_time(0));
            println!("uptime:    {:?}", started.attribute_time_span("uptime"));
        }
        if let Some(key) = server.child("key") {
            println!("key:       {:?}", key.value_binary(0).map(String::from_utf8_lossy));
        }
        if let Some(matrix) = server.child("matrix") {
            let sum: i64 = matrix
                .children_called("content")
                .flat_map(|row| row.values.iter())
                .filter_map(|v| v.as_integer().ok())
                .sum();
            println!("matrix sum: {}", sum);
        }
    }

    println!("\n=== Rendered ===\n");
    print!("{}", root.to_sdl_string());
}

fn print_tag(tag: &Tag, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{}{}", indent, tag.name);
    for value in &tag.values {
        println!("{}  - {} ({})", indent, value, value.kind());
    }
    for attr in tag.sorted_attributes() {
        println!("{}  {} = {}", indent, attr.name, attr.value);
    }
    for child in &tag.children {
        print_tag(child, depth + 1);
    }
}
