use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use c5_canonical::{JsonProps, Value};
use c5_envelope::{
    verify_envelope_id, Envelope, EnvelopeBuilder, EnvelopeError, EnvelopeOptions, EnvelopeProps,
    EnvelopeTime, FixedClock, HashIdGenerator, IntegrityError, Payload,
};
use chrono::{FixedOffset, TimeZone};
use serde_json::json;

const NOW: i64 = 1_624_140_000_000;

fn fixed_options() -> EnvelopeOptions {
    EnvelopeOptions::default().with_clock(FixedClock::from_millis(NOW).unwrap())
}

fn object_payload() -> Payload {
    Payload::new("test", json!({"name": "object", "date": "2021-05-20"}))
}

fn kind_payload() -> Payload {
    Payload::from_value(json!({"kind": "kind", "data": {"y": 4}})).unwrap()
}

#[test]
fn explicit_id_is_used_verbatim() {
    let mut props = EnvelopeProps::new("test case", object_payload());
    props.id = Some(
        "1624140000000-4a2a6fb97b3afe6a7ca4c13457c441664c7f6a6c2ea7782e1f2dea384cf97cb8".into(),
    );
    props.t = Some(EnvelopeTime::At(chrono::DateTime::from_timestamp_millis(444).unwrap()));
    props.ttl = Some(10);

    let mut builder = EnvelopeBuilder::new(props, EnvelopeOptions::default());
    assert_eq!(
        builder.to_json().unwrap(),
        r#"{"data":{"data":{"date":"2021-05-20","name":"object"},"kind":"test"},"dst":[],"id":"1624140000000-4a2a6fb97b3afe6a7ca4c13457c441664c7f6a6c2ea7782e1f2dea384cf97cb8","src":"test case","t":444,"ttl":10,"v":"A"}"#
    );
}

#[test]
fn derived_id_uses_clock_and_digest() {
    let mut builder = EnvelopeBuilder::new(
        EnvelopeProps::new("test case", object_payload()),
        fixed_options(),
    );
    assert_eq!(
        builder.to_json().unwrap(),
        r#"{"data":{"data":{"date":"2021-05-20","name":"object"},"kind":"test"},"dst":[],"id":"1624140000000-BbYxQMurpUmj1W6E4EwYM79Rm3quSz1wwtNZDSsFt1bp","src":"test case","t":1624140000000,"ttl":10,"v":"A"}"#
    );
}

#[test]
fn indented_envelope_matches_pretty_json() {
    let mut compact = EnvelopeBuilder::new(
        EnvelopeProps::new("test case", object_payload()),
        fixed_options(),
    );
    let mut indented = EnvelopeBuilder::new(
        EnvelopeProps::new("test case", object_payload()),
        fixed_options().with_json(JsonProps::indented(2)),
    );

    let parsed: serde_json::Value = serde_json::from_str(compact.to_json().unwrap()).unwrap();
    assert_eq!(
        indented.to_json().unwrap(),
        serde_json::to_string_pretty(&parsed).unwrap()
    );
}

#[test]
fn derived_id_matches_reference_vector() {
    let mut props = EnvelopeProps::new("test case", kind_payload());
    props.t = Some(EnvelopeTime::Millis(123));
    let mut builder = EnvelopeBuilder::new(props, EnvelopeOptions::default());
    assert_eq!(
        builder.envelope().unwrap().id,
        "123-GUKeStj4aGQRju7p2Dzf31Qi2d2MVuRCw68H1c8gMCnQ"
    );
    assert_eq!(
        builder.payload_digest().unwrap(),
        Some("GUKeStj4aGQRju7p2Dzf31Qi2d2MVuRCw68H1c8gMCnQ")
    );
}

#[test]
fn hash_only_generator_drops_time_prefix() {
    let mut builder = EnvelopeBuilder::new(
        EnvelopeProps::new("test case", kind_payload()),
        fixed_options().with_id_generator(HashIdGenerator),
    );
    assert_eq!(
        builder.envelope().unwrap().id,
        "GUKeStj4aGQRju7p2Dzf31Qi2d2MVuRCw68H1c8gMCnQ"
    );
}

#[test]
fn explicit_id_skips_hashing() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut props = EnvelopeProps::new("test case", kind_payload());
    props.id = Some("myId".into());
    let mut builder = EnvelopeBuilder::new(
        props,
        fixed_options().with_id_generator(move |t: i64, digest: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            format!("{}-{}", t, digest)
        }),
    );

    assert_eq!(builder.envelope().unwrap().id, "myId");
    assert_eq!(builder.payload_digest().unwrap(), None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn fixed_clock_gives_identical_ids() {
    let build = || {
        EnvelopeBuilder::new(EnvelopeProps::new("test case", kind_payload()), fixed_options())
            .into_envelope()
            .unwrap()
            .id
    };
    assert_eq!(build(), build());
    assert_eq!(build(), format!("{}-GUKeStj4aGQRju7p2Dzf31Qi2d2MVuRCw68H1c8gMCnQ", NOW));
}

#[test]
fn rebuilding_a_parsed_envelope_reproduces_it() {
    let mut original = EnvelopeBuilder::new(
        EnvelopeProps::new("test case", kind_payload()),
        fixed_options(),
    );
    let text = original.to_json().unwrap().to_string();

    let mut rebuilt = EnvelopeBuilder::from_envelope_json(&text, EnvelopeOptions::default()).unwrap();
    assert_eq!(rebuilt.to_json().unwrap(), text);
    assert_eq!(rebuilt.envelope().unwrap().data, kind_payload());
    assert_eq!(rebuilt.payload_digest().unwrap(), None);
}

#[test]
fn first_access_freezes_results() {
    let mut builder = EnvelopeBuilder::new(
        EnvelopeProps::new("test case", kind_payload()),
        fixed_options(),
    );
    let before = builder.to_json().unwrap().to_string();
    builder.props_mut().src = "someone else".into();
    builder.props_mut().data = Payload::new("other", json!([1, 2, 3]));

    assert_eq!(builder.to_json().unwrap(), before);
    assert_eq!(builder.envelope().unwrap().src, "test case");
    assert_eq!(builder.envelope().unwrap().data, kind_payload());
}

#[test]
fn payload_access_freezes_every_input() {
    let mut props = EnvelopeProps::new("test case", kind_payload());
    props.t = Some(EnvelopeTime::Millis(123));
    let mut builder = EnvelopeBuilder::new(props, EnvelopeOptions::default());
    assert_eq!(builder.payload_json().unwrap(), r#"{"y":4}"#);

    builder.props_mut().data = Payload::new("other", json!({"y": 5}));
    builder.props_mut().src = "someone else".into();
    builder.props_mut().t = Some(EnvelopeTime::Millis(999));

    let text = builder.to_json().unwrap().to_string();
    assert_eq!(
        text,
        r#"{"data":{"data":{"y":4},"kind":"kind"},"dst":[],"id":"123-GUKeStj4aGQRju7p2Dzf31Qi2d2MVuRCw68H1c8gMCnQ","src":"test case","t":123,"ttl":10,"v":"A"}"#
    );
    let envelope = builder.envelope().unwrap().clone();
    assert_eq!(envelope.data, kind_payload());
    assert_eq!(Envelope::from_json(&text).unwrap(), envelope);
    verify_envelope_id(&envelope).unwrap();
}

#[test]
fn dropping_the_id_after_payload_access_keeps_it() {
    let mut props = EnvelopeProps::new("test case", kind_payload());
    props.id = Some("myId".into());
    let mut builder = EnvelopeBuilder::new(props, fixed_options());
    assert_eq!(builder.payload_digest().unwrap(), None);

    builder.props_mut().id = None;
    assert_eq!(builder.envelope().unwrap().id, "myId");
    assert_eq!(builder.payload_digest().unwrap(), None);
}

#[test]
fn record_carries_real_payload_and_defaults() {
    let mut props = EnvelopeProps::new("test case", kind_payload());
    props.dst = vec!["a".into(), "b".into()];
    let envelope = EnvelopeBuilder::new(props, fixed_options())
        .into_envelope()
        .unwrap();
    assert_eq!(envelope.ttl, 10);
    assert_eq!(envelope.dst, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(envelope.t, NOW);
    assert_eq!(envelope.data.data, Value::from(json!({"y": 4})));
}

#[test]
fn integral_float_payloads_share_ids() {
    let build = |data: serde_json::Value| {
        let mut props = EnvelopeProps::new("test case", Payload::new("kind", data));
        props.t = Some(EnvelopeTime::Millis(123));
        let mut builder = EnvelopeBuilder::new(props, EnvelopeOptions::default());
        builder.to_json().unwrap().to_string()
    };
    assert_eq!(build(json!({"y": 4})), build(json!({"y": 4.0})));
}

#[test]
fn zoned_timestamps_render_in_utc() {
    let offset = FixedOffset::west_opt(5 * 3600).unwrap();
    let local = offset.with_ymd_and_hms(2021, 5, 20, 7, 30, 0).unwrap();
    let mut props = EnvelopeProps::new("test case", Payload::new("clock", vec![Value::from(local)]));
    props.id = Some("fixed".into());
    props.t = Some(EnvelopeTime::Millis(0));
    let mut builder = EnvelopeBuilder::new(props, EnvelopeOptions::default());
    assert_eq!(
        builder.payload_json().unwrap(),
        r#"["2021-05-20T12:30:00.000Z"]"#
    );
}

#[test]
fn verification_accepts_derived_ids() {
    let envelope = EnvelopeBuilder::new(
        EnvelopeProps::new("test case", kind_payload()),
        fixed_options(),
    )
    .into_envelope()
    .unwrap();
    verify_envelope_id(&envelope).unwrap();

    let hashed_only = EnvelopeBuilder::new(
        EnvelopeProps::new("test case", kind_payload()),
        fixed_options().with_id_generator(HashIdGenerator),
    )
    .into_envelope()
    .unwrap();
    verify_envelope_id(&hashed_only).unwrap();
}

#[test]
fn verification_detects_tampering() {
    let mut envelope = EnvelopeBuilder::new(
        EnvelopeProps::new("test case", kind_payload()),
        fixed_options(),
    )
    .into_envelope()
    .unwrap();
    envelope.data.data = Value::from(json!({"y": 5}));
    assert!(matches!(
        verify_envelope_id(&envelope),
        Err(IntegrityError::DigestMismatch { .. })
    ));

    envelope.id = "myId".into();
    assert!(matches!(
        verify_envelope_id(&envelope),
        Err(IntegrityError::NoDigest(_))
    ));
}

#[test]
fn malformed_envelope_documents_are_rejected() {
    let missing_kind = json!({
        "v": "A", "id": "x", "src": "s", "dst": [], "t": 1, "ttl": 10,
        "data": {"data": {}}
    });
    let result = EnvelopeBuilder::from_envelope_json(&missing_kind.to_string(), EnvelopeOptions::default());
    assert!(matches!(result, Err(EnvelopeError::Validation(_))));

    assert!(Envelope::from_json("{not json").is_err());
}
