use c5_canonical::{content_digest, to_canonical_string, JsonProps, Value};
use serde_json::json;

fn main() {
    let payload = Value::from(json!({
        "kind": "example",
        "data": {
            "value": 42.0,
            "tags": ["b", "a"]
        }
    }));

    let rendered = to_canonical_string(&payload, &JsonProps::indented(2))
        .and_then(|text| content_digest(&payload).map(|digest| (text, digest)));
    match rendered {
        Ok((text, digest)) => {
            println!("{}", text);
            println!("digest: {}", digest);
        }
        Err(err) => {
            eprintln!("canonicalization failed: {}", err);
            std::process::exit(1);
        }
    }
}
