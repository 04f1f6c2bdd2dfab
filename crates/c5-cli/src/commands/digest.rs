//! Digest command implementation.

use c5_canonical::{content_digest, Value};

use super::read_json;

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let value = Value::from(read_json(input)?);
    let digest = content_digest(&value).map_err(|e| format!("Digest failed: {}", e))?;
    println!("{}", digest);
    Ok(())
}
