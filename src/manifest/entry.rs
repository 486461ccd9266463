//! manifest/entry — per-request metadata record.
//!
//! The same record shape is written twice by the instrumented process: once
//! into index.data (keyed by tag) and once as the `summary` of `<tag>.data`.
//! On disk (JSON, camelCase):
//!   { "tag", "url", "ajax", "method", "ip", "time", "statusCode", "sqlCount", "mailCount", ... }
//! Only `tag` is essential; unknown fields are kept in `extra`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub url: String,
    /// Writers emit 0/1 as often as true/false.
    #[serde(default, deserialize_with = "de_flag")]
    pub ajax: bool,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub ip: String,
    /// Request start, seconds since epoch (fractional).
    #[serde(default)]
    pub time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail_count: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One row of the manifest.
pub type ManifestEntry = RequestRecord;

impl RequestRecord {
    pub fn new<S: Into<String>>(tag: S) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Request time as a local-independent UTC timestamp, when representable.
    pub fn timestamp(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        if !self.time.is_finite() || self.time <= 0.0 {
            return None;
        }
        let secs = self.time.trunc() as i64;
        let nanos = ((self.time - self.time.trunc()) * 1e9) as u32;
        chrono::DateTime::from_timestamp(secs, nanos)
    }
}

fn de_flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    use serde::de::Error;
    match Value::deserialize(d)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_f64().map(|v| v != 0.0).unwrap_or(false)),
        Value::String(s) => {
            let s = s.trim().to_ascii_lowercase();
            Ok(!(s.is_empty() || s == "0" || s == "false"))
        }
        other => Err(D::Error::custom(format!("expected flag, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_numeric_ajax_and_keeps_unknown_fields() {
        let r: RequestRecord = serde_json::from_str(
            r#"{"tag":"t1","url":"/site/index","ajax":1,"method":"GET","ip":"::1",
                "time":1700000000.25,"statusCode":200,"sqlCount":3,"mailCount":0,"route":"site/index"}"#,
        )
        .unwrap();
        assert_eq!(r.tag, "t1");
        assert!(r.ajax);
        assert_eq!(r.status_code, Some(200));
        assert_eq!(r.sql_count, Some(3));
        assert_eq!(r.extra.get("route"), Some(&Value::from("site/index")));
        let ts = r.timestamp().unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
    }

    #[test]
    fn missing_fields_default() {
        let r: RequestRecord = serde_json::from_str(r#"{"tag":"x","ajax":"0"}"#).unwrap();
        assert!(!r.ajax);
        assert_eq!(r.status_code, None);
        assert!(r.timestamp().is_none());
    }
}
