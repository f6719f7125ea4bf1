//! Text decoding of joystick samples.
//!
//! One sample per line, axis values separated by commas and/or whitespace.
//! Blank lines and `#` comments carry no sample.

use crate::common::AxisSample;
use crate::error::{Result, TeleopError};

/// Decode one input line. `line_no` is only used for error reporting.
pub fn decode_line(line_no: usize, line: &str) -> Result<Option<AxisSample>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let axes = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<f64>().map_err(|_| TeleopError::SampleDecode {
                line: line_no,
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(Some(AxisSample::new(axes)))
}

/// Decode one raw input line as read from the stream, newline included.
///
/// Bytes that are not UTF-8 make the line undecodable, like a bad token.
pub fn decode_raw_line(line_no: usize, raw: &[u8]) -> Result<Option<AxisSample>> {
    match std::str::from_utf8(raw) {
        Ok(line) => decode_line(line_no, line),
        Err(_) => Err(TeleopError::SampleDecode {
            line: line_no,
            token: String::from_utf8_lossy(raw).trim().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_comma_and_space_separated_axes() {
        let sample = decode_line(1, "0.5, -1.0 1").unwrap().unwrap();
        assert_eq!(sample.axes(), &[0.5, -1.0, 1.0]);

        let sample = decode_line(2, "  0\t0\t1  ").unwrap().unwrap();
        assert_eq!(sample.axes(), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert!(decode_line(1, "").unwrap().is_none());
        assert!(decode_line(2, "   ").unwrap().is_none());
        assert!(decode_line(3, "# steering throttle trigger").unwrap().is_none());
    }

    #[test]
    fn keeps_short_samples_for_the_transform_to_reject() {
        let sample = decode_line(1, "0.1,0.2").unwrap().unwrap();
        assert_eq!(sample.len(), 2);
    }

    #[test]
    fn raw_lines_with_newlines_decode() {
        let sample = decode_raw_line(1, b"0 1 -1\r\n").unwrap().unwrap();
        assert_eq!(sample.axes(), &[0.0, 1.0, -1.0]);
    }

    #[test]
    fn raw_lines_that_are_not_utf8_are_undecodable() {
        match decode_raw_line(4, b"\xff\xfe\n") {
            Err(TeleopError::SampleDecode { line, token }) => {
                assert_eq!(line, 4);
                assert_eq!(token, "\u{fffd}\u{fffd}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn reports_invalid_tokens() {
        match decode_line(7, "0.1, abc, 1.0") {
            Err(TeleopError::SampleDecode { line, token }) => {
                assert_eq!(line, 7);
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
