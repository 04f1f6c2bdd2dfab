//! Verify command implementation.

use c5_envelope::{verify_envelope_id, Envelope};

use super::read_input;
use crate::output::{format_report, VerifyReport};

pub fn run(input: Option<String>, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let envelope = Envelope::from_json(&read_input(input)?)?;

    let result = verify_envelope_id(&envelope);
    let report = VerifyReport {
        id: &envelope.id,
        kind: &envelope.data.kind,
        error: result.as_ref().err().map(|e| e.to_string()),
    };
    println!("{}", format_report(&report, json_output));

    result.map_err(|e| format!("Verification failed: {}", e).into())
}
