pub mod canonicalize;
pub mod digest;
pub mod verify;
pub mod wrap;

use std::io::{self, Read};

/// Reads the whole input from a file, or stdin when no path is given.
pub fn read_input(input: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    let text = if let Some(path) = input {
        std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read file {}: {}", path, e))?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };
    Ok(text)
}

/// Reads and parses JSON input.
pub fn read_json(input: Option<String>) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    let value = serde_json::from_str(&text).map_err(|e| format!("Invalid JSON: {}", e))?;
    Ok(value)
}
