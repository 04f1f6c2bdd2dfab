//! Wrap command implementation.

use c5_canonical::JsonProps;
use c5_envelope::{EnvelopeBuilder, EnvelopeOptions, EnvelopeProps, EnvelopeTime, Payload};

use super::read_json;

/// Envelope fields taken from the command line.
pub struct WrapArgs {
    pub src: String,
    pub dst: Vec<String>,
    pub id: Option<String>,
    pub t: Option<i64>,
    pub ttl: Option<u32>,
    pub indent: usize,
}

pub fn run(input: Option<String>, args: WrapArgs) -> Result<(), Box<dyn std::error::Error>> {
    let payload = Payload::from_value(read_json(input)?)?;

    let mut props = EnvelopeProps::new(args.src, payload);
    props.dst = args.dst;
    props.id = args.id;
    props.t = args.t.map(EnvelopeTime::Millis);
    props.ttl = args.ttl;

    let options = EnvelopeOptions::default().with_json(JsonProps::indented(args.indent));
    let mut builder = EnvelopeBuilder::new(props, options);
    println!("{}", builder.to_json()?);
    Ok(())
}
