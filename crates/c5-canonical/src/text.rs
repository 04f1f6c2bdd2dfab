//! Incremental canonical JSON renderer.

use std::fmt::Write;

use crate::canonicalizer::{walk, CanonicalizationError};
use crate::collector::Collector;
use crate::event::Event;
use crate::scalar::Scalar;
use crate::value::Value;

/// Layout options for rendered JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonProps {
    /// Spaces per nesting level; `0` selects compact output.
    pub indent: usize,
    /// Line break emitted before indentation; ignored in compact mode.
    pub newline: String,
}

impl Default for JsonProps {
    fn default() -> Self {
        Self {
            indent: 0,
            newline: "\n".to_string(),
        }
    }
}

impl JsonProps {
    /// Indented layout with the default newline.
    pub fn indented(indent: usize) -> Self {
        Self {
            indent,
            ..Self::default()
        }
    }
}

/// Renders the event stream into canonical JSON text.
///
/// Every fragment goes to the sink as soon as it is known, one `write_str`
/// call per fragment; the collector only keeps one frame per open container.
pub struct TextCollector<W> {
    out: W,
    indent: String,
    newline: String,
    /// Per open container: a comma is owed before the next value.
    commas: Vec<bool>,
    /// Per open container: members or items seen so far.
    elements: Vec<usize>,
    attribute: Option<String>,
}

impl<W: Write> TextCollector<W> {
    /// Creates a collector writing into `out`.
    pub fn new(out: W, props: &JsonProps) -> Self {
        Self {
            out,
            indent: " ".repeat(props.indent),
            newline: if props.indent > 0 {
                props.newline.clone()
            } else {
                String::new()
            },
            commas: vec![false],
            elements: vec![0],
            attribute: None,
        }
    }

    /// Writes pre-rendered JSON verbatim in the position of the next value.
    pub fn append_fragment(&mut self, fragment: &str) -> Result<(), CanonicalizationError> {
        let mut out = self.open_value();
        out.push_str(fragment);
        self.out.write_str(&out)?;
        Ok(())
    }

    /// Returns the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line_break(&self, depth: usize) -> String {
        if self.newline.is_empty() {
            return String::new();
        }
        let mut out = self.newline.clone();
        for _ in 0..depth {
            out.push_str(&self.indent);
        }
        out
    }

    /// Separator, line break and member prefix owed before the next value.
    ///
    /// Containers inside an array count as elements and start on their own
    /// line, so indented output is byte-for-byte standard pretty JSON
    /// (`},\n  {` between objects, never `},{`). A root value gets no
    /// leading line break.
    fn open_value(&mut self) -> String {
        let top = self.commas.len() - 1;
        if self.attribute.is_none() {
            self.elements[top] += 1;
        }
        let mut out = String::new();
        if self.commas[top] {
            out.push(',');
        }
        if top > 0 {
            out.push_str(&self.line_break(top));
        }
        if let Some(prefix) = self.attribute.take() {
            out.push_str(&prefix);
        }
        self.commas[top] = true;
        out
    }

    fn open(&mut self, bracket: char) -> Result<(), CanonicalizationError> {
        let mut out = self.open_value();
        out.push(bracket);
        self.commas.push(false);
        self.elements.push(0);
        self.out.write_str(&out)?;
        Ok(())
    }

    fn close(&mut self, bracket: char) -> Result<(), CanonicalizationError> {
        if self.commas.len() < 2 {
            return Err(CanonicalizationError::InvalidStructure(format!(
                "unmatched '{}'",
                bracket
            )));
        }
        self.commas.pop();
        let had_elements = self.elements.pop().unwrap_or(0) > 0;
        let mut out = if had_elements {
            self.line_break(self.commas.len() - 1)
        } else {
            String::new()
        };
        out.push(bracket);
        self.out.write_str(&out)?;
        Ok(())
    }

    fn attribute(&mut self, name: &str) -> Result<(), CanonicalizationError> {
        let quoted = Scalar::String(name).to_text()?;
        let space = if self.indent.is_empty() { "" } else { " " };
        self.attribute = Some(format!("{}:{}", quoted, space));
        if let Some(count) = self.elements.last_mut() {
            *count += 1;
        }
        Ok(())
    }
}

impl<W: Write> Collector for TextCollector<W> {
    fn append(&mut self, event: &Event<'_>) -> Result<(), CanonicalizationError> {
        match event {
            Event::ArrayStart => self.open('['),
            Event::ArrayEnd => self.close(']'),
            Event::ObjectStart => self.open('{'),
            Event::ObjectEnd => self.close('}'),
            Event::Attribute(name) => self.attribute(name),
            Event::Scalar(scalar) => {
                // Render first so a failing scalar leaves the frame untouched.
                let text = scalar.to_text()?;
                self.append_fragment(&text)
            }
        }
    }
}

/// Renders `value` as canonical JSON with the given layout.
pub fn to_canonical_string(value: &Value, props: &JsonProps) -> Result<String, CanonicalizationError> {
    let mut collector = TextCollector::new(String::new(), props);
    walk(value, &mut collector)?;
    Ok(collector.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Sink that records each fragment separately.
    #[derive(Default)]
    struct Fragments(Vec<String>);

    impl Write for Fragments {
        fn write_str(&mut self, s: &str) -> std::fmt::Result {
            self.0.push(s.to_string());
            Ok(())
        }
    }

    fn compact(value: serde_json::Value) -> String {
        to_canonical_string(&Value::from(value), &JsonProps::default()).unwrap()
    }

    #[test]
    fn compact_output_has_no_whitespace() {
        assert_eq!(
            compact(json!({"b": [1, {"c": null}], "a": "x y"})),
            r#"{"a":"x y","b":[1,{"c":null}]}"#
        );
    }

    #[test]
    fn compact_mode_ignores_newline_setting() {
        let props = JsonProps {
            indent: 0,
            newline: "\r\n".into(),
        };
        let text = to_canonical_string(&Value::from(json!({"a": [1]})), &props).unwrap();
        assert_eq!(text, r#"{"a":[1]}"#);
    }

    #[test]
    fn nested_arrays_indent_like_pretty_json() {
        let value = json!([1, [2, []], {"k": {}}]);
        let text = to_canonical_string(&Value::from(value.clone()), &JsonProps::indented(2)).unwrap();
        assert_eq!(text, serde_json::to_string_pretty(&value).unwrap());
    }

    #[test]
    fn objects_in_arrays_start_on_their_own_line() {
        let value = json!([{"a": 1}, {"b": 2}]);
        let text = to_canonical_string(&Value::from(value), &JsonProps::indented(2)).unwrap();
        assert_eq!(text, "[\n  {\n    \"a\": 1\n  },\n  {\n    \"b\": 2\n  }\n]");
    }

    #[test]
    fn custom_newline_prefixes_every_line() {
        let props = JsonProps {
            indent: 1,
            newline: "\n>".into(),
        };
        let text = to_canonical_string(&Value::from(json!({"a": [true]})), &props).unwrap();
        assert_eq!(text, "{\n> \"a\": [\n>  true\n> ]\n>}");
    }

    #[test]
    fn root_scalar_renders_alone() {
        let text = to_canonical_string(&Value::from(4.0), &JsonProps::indented(4)).unwrap();
        assert_eq!(text, "4");
    }

    #[test]
    fn fragments_stream_one_per_event() {
        let mut collector = TextCollector::new(Fragments::default(), &JsonProps::default());
        walk(&Value::from(json!({"a": 1, "b": [true]})), &mut collector).unwrap();
        assert_eq!(
            collector.into_inner().0,
            vec!["{", "\"a\":1", ",\"b\":[", "true", "]", "}"]
        );
    }

    #[test]
    fn unmatched_close_is_rejected() {
        let mut collector = TextCollector::new(String::new(), &JsonProps::default());
        assert!(matches!(
            collector.append(&Event::ObjectEnd),
            Err(CanonicalizationError::InvalidStructure(_))
        ));
    }

    #[test]
    fn fragment_takes_member_position() {
        let mut collector = TextCollector::new(String::new(), &JsonProps::default());
        collector.append(&Event::ObjectStart).unwrap();
        collector.append(&Event::Attribute("raw")).unwrap();
        collector.append_fragment("[1,2]").unwrap();
        collector.append(&Event::Attribute("z")).unwrap();
        collector.append(&Event::Scalar(Scalar::Bool(false))).unwrap();
        collector.append(&Event::ObjectEnd).unwrap();
        assert_eq!(collector.into_inner(), r#"{"raw":[1,2],"z":false}"#);
    }
}
