// SPDX-License-Identifier: Apache-2.0

// Example: parse a simplified config document pulled through small reads
//
// Run with RUST_LOG=trace to watch tokens and block recycling.

use dualjson::{parse_with_config, ChunkReader, Config, DocumentDialect, LoggerSink, Value};

const SAMPLE: &[u8] = br#"// demo settings
name = "stream demo"
workers = 4
-- the upstream list is long enough to cross many blocks
upstreams = [
    { host = "10.0.0.1", weight = 1.5 }
    { host = "10.0.0.2", weight = 2.5e0 }
]
debug = false
"#;

fn describe(value: &Value, indent: usize) {
    let pad = " ".repeat(indent);
    match value {
        Value::Object(object) => {
            for (key, member) in object {
                println!("{pad}🔑 {key} ({})", member.kind());
                describe(member, indent + 3);
            }
        }
        Value::Array(array) => {
            for (i, element) in array.iter().enumerate() {
                println!("{pad}📋 [{i}] ({})", element.kind());
                describe(element, indent + 3);
            }
        }
        Value::String(s) => println!("{pad}📝 {s:?}"),
        Value::Number(n) => println!("{pad}🔢 {n}"),
        Value::Boolean(b) => println!("{pad}✅ {b}"),
        Value::Null => println!("{pad}⭕ null"),
    }
}

fn main() {
    env_logger::init();

    println!("🚀 Simplified config parsed with 16-byte blocks and 5-byte reads");
    println!("📏 Total size: {} bytes", SAMPLE.len());

    let reader = ChunkReader::new(SAMPLE, 5);
    let mut sink = LoggerSink;
    match parse_with_config::<_, Config<16, 32>>(reader, Some(&mut sink), DocumentDialect::Unknown) {
        Ok(value) => describe(&value, 2),
        Err(e) => {
            println!("❌ Parse error: {e}");
            std::process::exit(1);
        }
    }
}
