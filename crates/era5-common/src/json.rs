//! Single-line JSON rendering with `", "` and `": "` separators.
//!
//! serde_json's compact formatter writes `,` and `:` with no trailing space.
//! Number formatting is left to serde_json.

use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

use crate::error::Era5Result;

/// Compact formatter that writes a space after `,` and `:`.
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

/// Serialize `value` on a single line using [`SpacedFormatter`].
pub fn to_spaced_string<T: Serialize + ?Sized>(value: &T) -> Era5Result<String> {
    let mut buf = Vec::with_capacity(64);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_separators() {
        let s = to_spaced_string(&json!({"a": 1})).unwrap();
        assert_eq!(s, r#"{"a": 1}"#);
    }

    #[test]
    fn test_array_separators() {
        let s = to_spaced_string(&vec![1.5, 2.0, 3.25]).unwrap();
        assert_eq!(s, "[1.5, 2.0, 3.25]");
    }

    #[test]
    fn test_whole_floats_keep_decimal() {
        let s = to_spaced_string(&vec![100.0_f64, 0.0, -0.0]).unwrap();
        assert_eq!(s, "[100.0, 0.0, -0.0]");
    }
}
