//! Value extraction from response lines.
//!
//! Responses are treated as free-form text, never parsed as JSON. Bits come
//! from the first bracketed span; scalar fields and the token acknowledgment
//! are matched byte for byte against the spaced wire form, so a compact
//! `{"job_id":"x"}` carries no job id.

use crate::Bits;

/// Field carrying a job identifier.
pub const JOB_ID_FIELD: &str = "job_id";

/// Field carrying a job status.
pub const JOB_STATUS_FIELD: &str = "job_status";

/// Field carrying measured bits.
pub const JOB_RESULT_FIELD: &str = "job_result";

/// Status value acknowledging a stored IBM token.
pub const TOKEN_ACK_STATUS: &str = "IBM token configured";

/// Exact acknowledgment substring for `configure_ibm`.
pub const TOKEN_ACK: &str = "\"status\": \"IBM token configured\"";

/// Value returned in place of a job id or status when none could be read.
pub const ERROR_SENTINEL: &str = "ERROR";

/// Marker preceding the value of a string field, e.g. `"job_id": "`.
pub fn field_marker(field: &str) -> String {
    format!("\"{field}\": \"")
}

/// Extract 0/1 values from the first bracketed span of `text`.
///
/// Returns `None` when the first `[` or the first `]` is missing, or when the
/// first `]` comes before the first `[`. Between the brackets every `0` and
/// `1` becomes a bit and every other character is skipped. With
/// `limit = Some(n)` scanning stops after `n` bits; with `None` every bit in
/// the span is returned.
pub fn extract_bits(text: &str, limit: Option<usize>) -> Option<Bits> {
    let open = text.find('[')?;
    let close = text.find(']')?;
    if close < open {
        return None;
    }

    let cap = limit.unwrap_or(usize::MAX);
    let bits = text[open + 1..close]
        .bytes()
        .filter_map(|b| match b {
            b'0' => Some(0),
            b'1' => Some(1),
            _ => None,
        })
        .take(cap)
        .collect();
    Some(bits)
}

/// Extract the string value of `field` from `text`.
///
/// The first occurrence of the marker `"<field>": "` is located and the value
/// runs up to the next `"`. Returns `None` when the marker or the closing
/// quote is missing.
pub fn extract_field(text: &str, field: &str) -> Option<String> {
    let marker = field_marker(field);
    let start = text.find(&marker)? + marker.len();
    let len = text[start..].find('"')?;
    Some(text[start..start + len].to_string())
}

/// Check whether `text` contains the exact acknowledgment
/// `"status": "IBM token configured"`.
pub fn is_token_ack(text: &str) -> bool {
    text.contains(TOKEN_ACK)
}
