// Accelink - Upload Payload
//
// `{"data":[v0,v1,...]}` with every value rendered with exactly two
// fractional digits. Values are emitted as raw JSON numbers so serde_json
// does not re-format them.

use serde::Serialize;
use serde_json::value::RawValue;

use crate::error::NetworkError;

#[derive(Serialize)]
struct UploadBody {
    data: Vec<Box<RawValue>>,
}

fn two_decimals(value: f32) -> Result<Box<RawValue>, NetworkError> {
    // Non-finite values have no JSON representation and are rejected here.
    RawValue::from_string(format!("{:.2}", value))
        .map_err(|_| NetworkError::Malformed(format!("cannot encode {value}")))
}

/// Serialize a batch into the collector's JSON body.
pub fn encode_batch(values: &[f32]) -> Result<String, NetworkError> {
    let data = values
        .iter()
        .map(|&v| two_decimals(v))
        .collect::<Result<Vec<_>, _>>()?;

    serde_json::to_string(&UploadBody { data }).map_err(|e| NetworkError::Malformed(e.to_string()))
}

/// Largest body accepted for a scalar endpoint such as `/tempo`.
pub const MAX_SCALAR_BODY_LEN: usize = 64;

/// Drain a response body through `read_chunk` until it reports end of
/// stream. A body longer than `limit` is rejected instead of truncated, so
/// trailing bytes can never be silently dropped before parsing.
pub fn read_limited(
    limit: usize,
    mut read_chunk: impl FnMut(&mut [u8]) -> Result<usize, NetworkError>,
) -> Result<Vec<u8>, NetworkError> {
    let mut body = Vec::new();
    let mut chunk = [0u8; 32];
    loop {
        let n = read_chunk(&mut chunk)?;
        if n == 0 {
            return Ok(body);
        }
        if body.len() + n > limit {
            return Err(NetworkError::Malformed(format!("body exceeds {limit} bytes")));
        }
        body.extend_from_slice(&chunk[..n]);
    }
}

/// Parse a plain-text decimal integer body (no JSON envelope).
pub fn parse_scalar(body: &[u8]) -> Result<i32, NetworkError> {
    let text = std::str::from_utf8(body)
        .map_err(|_| NetworkError::Malformed("scalar body is not UTF-8".into()))?;

    text.trim()
        .parse::<i32>()
        .map_err(|_| NetworkError::Malformed(format!("not an integer: {:?}", text.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_compact_two_decimal_array() {
        let body = encode_batch(&[2.4517, -7.3561, 0.0, 10.0, 0.004]).unwrap();
        assert_eq!(body, r#"{"data":[2.45,-7.36,0.00,10.00,0.00]}"#);
    }

    #[test]
    fn empty_batch_is_still_an_object() {
        assert_eq!(encode_batch(&[]).unwrap(), r#"{"data":[]}"#);
    }

    #[test]
    fn full_batch_round_trips_to_rounded_values() {
        let values: Vec<f32> = (0..150).map(|i| i as f32 * 0.173 - 12.9).collect();
        let body = encode_batch(&values).unwrap();
        assert!(!body.ends_with(char::is_whitespace));

        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        let data = parsed["data"].as_array().unwrap();
        assert_eq!(data.len(), 150);

        for (input, output) in values.iter().zip(data) {
            let out = output.as_f64().unwrap();
            let expected = (*input as f64 * 100.0).round() / 100.0;
            assert!((out - expected).abs() < 1e-9, "{input} -> {out}");
        }
    }

    #[test]
    fn every_value_has_two_fraction_digits() {
        let body = encode_batch(&[1.0, -3.5, 123.456]).unwrap();
        let inner = body.trim_start_matches(r#"{"data":["#).trim_end_matches("]}");
        for item in inner.split(',') {
            let (_, frac) = item.split_once('.').unwrap();
            assert_eq!(frac.len(), 2, "{item}");
        }
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(matches!(encode_batch(&[1.0, f32::NAN]), Err(NetworkError::Malformed(_))));
        assert!(matches!(encode_batch(&[f32::INFINITY]), Err(NetworkError::Malformed(_))));
    }

    #[test]
    fn parses_plain_integer_bodies() {
        assert_eq!(parse_scalar(b"123"), Ok(123));
        assert_eq!(parse_scalar(b" 96\r\n"), Ok(96));
        assert_eq!(parse_scalar(b"-4"), Ok(-4));
        assert!(matches!(parse_scalar(b"12.5"), Err(NetworkError::Malformed(_))));
        assert!(matches!(parse_scalar(b""), Err(NetworkError::Malformed(_))));
        assert!(matches!(parse_scalar(&[0xFF, 0x31]), Err(NetworkError::Malformed(_))));
    }

    /// Serves `data` in pieces of at most `step` bytes.
    fn chunked(data: &[u8], step: usize) -> impl FnMut(&mut [u8]) -> Result<usize, NetworkError> + '_ {
        let mut pos = 0;
        move |buf: &mut [u8]| {
            let n = step.min(buf.len()).min(data.len() - pos);
            buf[..n].copy_from_slice(&data[pos..pos + n]);
            pos += n;
            Ok(n)
        }
    }

    #[test]
    fn short_body_is_read_across_chunks() {
        let body = read_limited(MAX_SCALAR_BODY_LEN, chunked(b"  128\r\n", 2)).unwrap();
        assert_eq!(parse_scalar(&body), Ok(128));
    }

    #[test]
    fn body_at_the_limit_is_accepted() {
        let mut data = vec![b' '; MAX_SCALAR_BODY_LEN - 2];
        data.extend_from_slice(b"42");
        let body = read_limited(MAX_SCALAR_BODY_LEN, chunked(&data, 32)).unwrap();
        assert_eq!(body.len(), MAX_SCALAR_BODY_LEN);
        assert_eq!(parse_scalar(&body), Ok(42));
    }

    #[test]
    fn oversized_body_is_rejected_not_truncated() {
        // The first 64 bytes alone would parse as 128.
        let mut data = b"128".to_vec();
        data.extend(std::iter::repeat(b' ').take(70));
        data.extend_from_slice(b"junk");

        let result = read_limited(MAX_SCALAR_BODY_LEN, chunked(&data, 32));
        assert!(matches!(result, Err(NetworkError::Malformed(_))));
    }

    #[test]
    fn read_errors_propagate() {
        let result = read_limited(MAX_SCALAR_BODY_LEN, |_| Err(NetworkError::Timeout));
        assert_eq!(result, Err(NetworkError::Timeout));
    }
}
