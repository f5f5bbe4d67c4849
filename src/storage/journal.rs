use bytes::{BufMut, BytesMut};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::codec::{Decoder, Encoder};

use super::error::StorageError;
use crate::model::Payload;

/// One issued update request, as recorded in the journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub locator: String,
    pub payload: Payload,
    pub issued_at: DateTime<Utc>,
}

impl UpdateRequest {
    /// Creates a request stamped with the current time.
    pub fn new(locator: impl Into<String>, payload: Payload) -> Self {
        Self {
            locator: locator.into(),
            payload,
            issued_at: Utc::now(),
        }
    }
}

/// JSON-lines framing for [`UpdateRequest`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct JournalCodec;

impl<'a> Encoder<&'a UpdateRequest> for JournalCodec {
    type Error = StorageError;

    fn encode(&mut self, item: &'a UpdateRequest, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let line = serde_json::to_vec(item)?;
        dst.reserve(line.len() + 1);
        dst.extend_from_slice(&line);
        dst.put_u8(b'\n');
        Ok(())
    }
}

impl Decoder for JournalCodec {
    type Item = UpdateRequest;
    type Error = StorageError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            let Some(end) = src.iter().position(|b| *b == b'\n') else {
                return Ok(None);
            };
            let line = src.split_to(end + 1);
            let line = &line[..end];
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return Ok(Some(serde_json::from_slice(line)?));
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(item) = self.decode(src)? {
            return Ok(Some(item));
        }
        if src.iter().all(u8::is_ascii_whitespace) {
            src.clear();
            return Ok(None);
        }
        // Last line without a trailing newline.
        let line = src.split_to(src.len());
        Ok(Some(serde_json::from_slice(&line)?))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(locator: &str) -> UpdateRequest {
        UpdateRequest::new(locator, Payload::new().with_metadata("weight", "5"))
    }

    #[test]
    fn encodes_one_line_per_request() {
        let mut buf = BytesMut::new();
        let mut codec = JournalCodec;
        codec.encode(&request("u1"), &mut buf).unwrap();
        codec.encode(&request("u2"), &mut buf).unwrap();
        let text = String::from_utf8(buf.to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["locator"], json!("u1"));
        assert_eq!(first["payload"], json!({"metadata": {"weight": "5"}}));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn decodes_what_it_encodes() {
        let mut buf = BytesMut::new();
        let mut codec = JournalCodec;
        let original = request("u1");
        codec.encode(&original, &mut buf).unwrap();
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(original));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn partial_line_waits_for_more_input() {
        let mut buf = BytesMut::from(&br#"{"locator":"u1""#[..]);
        assert_eq!(JournalCodec.decode(&mut buf).unwrap(), None);
        assert!(!buf.is_empty());
    }

    #[test]
    fn skips_blank_lines() {
        let mut codec = JournalCodec;
        let mut buf = BytesMut::new();
        buf.extend_from_slice(b"\n  \n");
        codec.encode(&request("u1"), &mut buf).unwrap();
        let decoded = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded.locator, "u1");
    }

    #[test]
    fn eof_accepts_unterminated_last_line() {
        let mut codec = JournalCodec;
        let mut buf = BytesMut::new();
        codec.encode(&request("u1"), &mut buf).unwrap();
        buf.truncate(buf.len() - 1);
        let decoded = codec.decode_eof(&mut buf).unwrap().unwrap();
        assert_eq!(decoded.locator, "u1");
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), None);
    }

    #[test]
    fn corrupt_line_is_an_error() {
        let mut buf = BytesMut::from(&b"not json\n"[..]);
        assert!(matches!(
            JournalCodec.decode(&mut buf),
            Err(StorageError::Json(_))
        ));
    }
}
