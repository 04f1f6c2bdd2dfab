//! Canonicalize command implementation.

use c5_canonical::{to_canonical_string, JsonProps, Value};

use super::read_json;

pub fn run(input: Option<String>, indent: usize) -> Result<(), Box<dyn std::error::Error>> {
    let value = Value::from(read_json(input)?);
    let text = to_canonical_string(&value, &JsonProps::indented(indent))
        .map_err(|e| format!("Canonicalization failed: {}", e))?;
    println!("{}", text);
    Ok(())
}
