use std::fmt::Write;
use std::sync::Arc;

use c5_canonical::{
    walk, CanonicalizationError, Collector, Event, HashCollector, JsonProps, Scalar, Tee,
    TextCollector, Value,
};
use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::errors::EnvelopeError;
use crate::id::{IdGenerator, TimeHashIdGenerator};
use crate::schema::{Envelope, Payload, Version, DEFAULT_TTL};

/// Nesting depth of the payload body inside an envelope (`data.data`).
const PAYLOAD_DEPTH: usize = 2;

/// Explicit envelope time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeTime {
    /// An instant; any timezone was normalized to UTC on conversion.
    At(DateTime<Utc>),
    /// Milliseconds since the Unix epoch.
    Millis(i64),
}

impl EnvelopeTime {
    fn millis(&self) -> i64 {
        match self {
            EnvelopeTime::At(at) => at.timestamp_millis(),
            EnvelopeTime::Millis(ms) => *ms,
        }
    }
}

impl From<DateTime<Utc>> for EnvelopeTime {
    fn from(at: DateTime<Utc>) -> Self {
        EnvelopeTime::At(at)
    }
}

impl From<i64> for EnvelopeTime {
    fn from(ms: i64) -> Self {
        EnvelopeTime::Millis(ms)
    }
}

/// Caller inputs for one envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeProps {
    /// Explicit id; when set no digest is computed.
    pub id: Option<String>,
    /// Sender identifier.
    pub src: String,
    /// Destinations.
    pub dst: Vec<String>,
    /// Explicit time; the clock is used when absent.
    pub t: Option<EnvelopeTime>,
    /// Hop limit, [`DEFAULT_TTL`] when absent.
    pub ttl: Option<u32>,
    /// Carried payload.
    pub data: Payload,
}

impl EnvelopeProps {
    /// Props with only the mandatory fields set.
    pub fn new(src: impl Into<String>, data: Payload) -> Self {
        Self {
            id: None,
            src: src.into(),
            dst: Vec::new(),
            t: None,
            ttl: None,
            data,
        }
    }
}

impl From<Envelope> for EnvelopeProps {
    fn from(envelope: Envelope) -> Self {
        Self {
            id: Some(envelope.id),
            src: envelope.src,
            dst: envelope.dst,
            t: Some(EnvelopeTime::Millis(envelope.t)),
            ttl: Some(envelope.ttl),
            data: envelope.data,
        }
    }
}

/// Rendering layout and injectable collaborators.
#[derive(Clone)]
pub struct EnvelopeOptions {
    /// Layout of the rendered envelope.
    pub json: JsonProps,
    /// Time source for envelopes without `t`.
    pub clock: Arc<dyn Clock>,
    /// Id builder for envelopes without `id`.
    pub id_generator: Arc<dyn IdGenerator>,
}

impl Default for EnvelopeOptions {
    fn default() -> Self {
        Self {
            json: JsonProps::default(),
            clock: Arc::new(SystemClock),
            id_generator: Arc::new(TimeHashIdGenerator),
        }
    }
}

impl EnvelopeOptions {
    /// Replaces the layout.
    pub fn with_json(mut self, json: JsonProps) -> Self {
        self.json = json;
        self
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replaces the id generator.
    pub fn with_id_generator(mut self, id_generator: impl IdGenerator + 'static) -> Self {
        self.id_generator = Arc::new(id_generator);
        self
    }
}

/// How the envelope id is obtained.
#[derive(Debug, Clone)]
enum IdSource {
    Explicit(String),
    Digest(String),
}

/// Payload body rendered at its position inside the envelope, together with
/// the props it was rendered from.
#[derive(Debug, Clone)]
struct PayloadRendering {
    props: EnvelopeProps,
    json: String,
    id: IdSource,
}

#[derive(Debug, Clone)]
struct Rendered {
    envelope: Envelope,
    json: String,
}

/// Builds an [`Envelope`] and its canonical JSON from [`EnvelopeProps`].
///
/// Work happens on first access and is cached: the payload body is walked
/// once (hashed too when no id was given), and the envelope text embeds that
/// rendering verbatim instead of walking the payload again. Once computed,
/// results stay fixed even if the props are edited afterwards. Errors are
/// returned without being cached.
pub struct EnvelopeBuilder {
    props: EnvelopeProps,
    options: EnvelopeOptions,
    payload: Option<PayloadRendering>,
    rendered: Option<Rendered>,
}

impl EnvelopeBuilder {
    /// Creates a builder; nothing is computed yet.
    pub fn new(props: EnvelopeProps, options: EnvelopeOptions) -> Self {
        Self {
            props,
            options,
            payload: None,
            rendered: None,
        }
    }

    /// Rebuilds from a received envelope document, keeping its id and time.
    pub fn from_envelope_json(text: &str, options: EnvelopeOptions) -> Result<Self, EnvelopeError> {
        let envelope = Envelope::from_json(text)?;
        Ok(Self::new(envelope.into(), options))
    }

    /// Mutable caller inputs; edits after the first successful access have no effect on results.
    pub fn props_mut(&mut self) -> &mut EnvelopeProps {
        &mut self.props
    }

    /// The assembled envelope record.
    pub fn envelope(&mut self) -> Result<&Envelope, EnvelopeError> {
        Ok(&self.rendered()?.envelope)
    }

    /// The canonical JSON text of the envelope.
    pub fn to_json(&mut self) -> Result<&str, EnvelopeError> {
        Ok(&self.rendered()?.json)
    }

    /// The canonical JSON text of the payload body, indented for its place in the envelope.
    pub fn payload_json(&mut self) -> Result<&str, EnvelopeError> {
        let payload = cached_payload(&mut self.payload, &self.props, &self.options)?;
        Ok(&payload.json)
    }

    /// The payload digest; `None` when the caller supplied the id.
    pub fn payload_digest(&mut self) -> Result<Option<&str>, EnvelopeError> {
        let payload = cached_payload(&mut self.payload, &self.props, &self.options)?;
        match &payload.id {
            IdSource::Digest(digest) => Ok(Some(digest.as_str())),
            IdSource::Explicit(_) => Ok(None),
        }
    }

    /// Consumes the builder, returning the envelope record.
    pub fn into_envelope(mut self) -> Result<Envelope, EnvelopeError> {
        Ok(self.take_rendered()?.envelope)
    }

    fn rendered(&mut self) -> Result<&Rendered, EnvelopeError> {
        let rendered = self.take_rendered()?;
        Ok(self.rendered.insert(rendered))
    }

    fn take_rendered(&mut self) -> Result<Rendered, EnvelopeError> {
        if let Some(rendered) = self.rendered.take() {
            trace!(id = %rendered.envelope.id, "envelope cache hit");
            return Ok(rendered);
        }
        let payload = cached_payload(&mut self.payload, &self.props, &self.options)?;
        assemble(&self.options, payload)
    }
}

fn cached_payload<'a>(
    slot: &'a mut Option<PayloadRendering>,
    props: &EnvelopeProps,
    options: &EnvelopeOptions,
) -> Result<&'a PayloadRendering, EnvelopeError> {
    let payload = match slot.take() {
        Some(payload) => payload,
        None => render_payload(props, options)?,
    };
    Ok(slot.insert(payload))
}

/// Walks the payload body once, into the text collector and, without an explicit id, the hash.
fn render_payload(
    props: &EnvelopeProps,
    options: &EnvelopeOptions,
) -> Result<PayloadRendering, EnvelopeError> {
    let layout = JsonProps {
        indent: options.json.indent,
        newline: format!(
            "{}{}",
            options.json.newline,
            " ".repeat(PAYLOAD_DEPTH * options.json.indent)
        ),
    };
    let mut text = TextCollector::new(String::new(), &layout);
    let id = match &props.id {
        Some(id) => {
            walk(&props.data.data, &mut text)?;
            IdSource::Explicit(id.clone())
        }
        None => {
            let mut hash = HashCollector::new();
            walk(&props.data.data, &mut Tee(&mut hash, &mut text))?;
            let digest = hash.digest();
            debug!(kind = %props.data.kind, %digest, "payload digest computed");
            IdSource::Digest(digest)
        }
    };
    Ok(PayloadRendering {
        props: props.clone(),
        json: text.into_inner(),
        id,
    })
}

/// Builds the envelope from the props snapshot taken when the payload was rendered.
fn assemble(options: &EnvelopeOptions, payload: &PayloadRendering) -> Result<Rendered, EnvelopeError> {
    let props = &payload.props;
    let t = match &props.t {
        Some(t) => t.millis(),
        None => options.clock.now().timestamp_millis(),
    };
    let id = match &payload.id {
        IdSource::Explicit(id) => id.clone(),
        IdSource::Digest(digest) => {
            let id = options.id_generator.generate(t, digest);
            debug!(%id, t, "derived envelope id");
            id
        }
    };

    let mut envelope = Envelope {
        v: Version::A,
        id,
        src: props.src.clone(),
        dst: props.dst.clone(),
        t,
        ttl: props.ttl.unwrap_or(DEFAULT_TTL),
        data: Payload {
            kind: props.data.kind.clone(),
            data: Value::Null,
        },
    };

    let mut text = TextCollector::new(String::new(), &options.json);
    walk(
        &envelope.to_value(),
        &mut PayloadSplice::new(&mut text, &payload.json),
    )?;
    envelope.data.data = props.data.data.clone();

    Ok(Rendered {
        envelope,
        json: text.into_inner(),
    })
}

/// Forwards envelope events to a text collector, writing the pre-rendered
/// payload body where the `data.data` placeholder would render.
struct PayloadSplice<'a, W> {
    text: &'a mut TextCollector<W>,
    fragment: &'a str,
    /// Attribute that opened each enclosing container; empty for the root.
    path: Vec<String>,
    attribute: Option<String>,
    spliced: bool,
}

impl<'a, W: Write> PayloadSplice<'a, W> {
    fn new(text: &'a mut TextCollector<W>, fragment: &'a str) -> Self {
        Self {
            text,
            fragment,
            path: Vec::new(),
            attribute: None,
            spliced: false,
        }
    }

    fn at_payload_body(&self) -> bool {
        self.path.len() == PAYLOAD_DEPTH
            && self.path[1] == "data"
            && self.attribute.as_deref() == Some("data")
    }
}

impl<W: Write> Collector for PayloadSplice<'_, W> {
    fn append(&mut self, event: &Event<'_>) -> Result<(), CanonicalizationError> {
        match event {
            Event::ArrayStart | Event::ObjectStart => {
                self.path.push(self.attribute.take().unwrap_or_default());
            }
            Event::ArrayEnd | Event::ObjectEnd => {
                self.path.pop();
            }
            Event::Attribute(name) => self.attribute = Some(name.to_string()),
            Event::Scalar(Scalar::Null) if !self.spliced && self.at_payload_body() => {
                self.attribute = None;
                self.spliced = true;
                return self.text.append_fragment(self.fragment);
            }
            Event::Scalar(_) => self.attribute = None,
        }
        self.text.append(event)
    }
}
