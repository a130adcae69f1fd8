//! JSON output with spaced separators.
//!
//! `serde_json` writes compact output (`{"a":1,"b":[0,1]}`). Devices on the
//! other end of the link look for markers such as `"job_id": "` byte for
//! byte, so every line on the wire is written as `{"a": 1, "b": [0, 1]}`.

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;

/// A [`Formatter`] emitting `": "` between keys and values and `", "` between
/// elements, with no newlines or indentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Serialize `value` as a single spaced JSON line (without the trailing `\n`).
pub fn to_spaced_string<T>(value: &T) -> serde_json::Result<String>
where
    T: ?Sized + Serialize,
{
    let mut buf = Vec::with_capacity(64);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_spaced_object() {
        let line = to_spaced_string(&json!({"job_id": "abc123"})).unwrap();
        assert_eq!(line, r#"{"job_id": "abc123"}"#);
    }

    #[test]
    fn test_spaced_array() {
        let line = to_spaced_string(&json!({"job_result": [0, 1, 1]})).unwrap();
        assert_eq!(line, r#"{"job_result": [0, 1, 1]}"#);
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(to_spaced_string(&json!({})).unwrap(), "{}");
        assert_eq!(to_spaced_string(&json!([])).unwrap(), "[]");
    }

    #[test]
    fn test_escapes_are_preserved() {
        let line = to_spaced_string(&json!({"token": "a\"b\nc"})).unwrap();
        assert_eq!(line, r#"{"token": "a\"b\nc"}"#);
        assert!(!line.contains('\n'));
    }
}
