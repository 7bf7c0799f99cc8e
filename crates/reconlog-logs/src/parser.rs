use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use thiserror::Error;

use reconlog_types::{Fields, Level, Record};

/// klog header: level, date, time, thread id, location, quoted message, rest.
/// Separators are ASCII whitespace only; `\s` would also accept Unicode spaces.
/// Captures: 1=level 2=date 3=time 4=location 5=message 6=key/value tail
static KLOG_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^([IWEF])([0-9]{4})[\t\n\f\r ]+([0-9:.]+)[\t\n\f\r ]+[0-9]+[\t\n\f\r ]+([^\]]+)\][\t\n\f\r ]+"([^"]+)"(.*)$"#,
    )
    .unwrap()
});

/// `key=<...>`, `key="..."` or `key={...}`, tried in that order.
/// Captures: 1=key 2=angle value 3=quoted value 4=brace blob
static KLOG_KV_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z0-9_]+)=(?:<([^>]+)>|"((?:[^"\\]|\\.)*)"|(\{.*?\}))"#).unwrap()
});

/// Why a line could not be turned into a [`Record`]
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line does not match the klog header")]
    NoHeader,
}

/// Log parser for extracting structure from raw log lines
pub struct RecordParser;

impl RecordParser {
    /// Parse a raw (possibly reassembled) log line into a Record
    pub fn parse(raw: &str) -> Result<Record, ParseError> {
        let trimmed = raw.trim();
        if trimmed.starts_with('{') {
            Self::parse_json(trimmed)
        } else {
            Self::parse_klog(raw)
        }
    }

    /// Parse a structured (zap/logr JSON) log line
    fn parse_json(content: &str) -> Result<Record, ParseError> {
        let obj: Map<String, Value> = serde_json::from_str(content)?;

        let level = match obj.get("level") {
            Some(Value::String(s)) => Level::from_word(s).unwrap_or_default(),
            _ => Level::Info,
        };

        let mut record = Record {
            level,
            date: obj.get("ts").map(Self::scalar_text).unwrap_or_default(),
            message: obj.get("msg").map(Self::scalar_text).unwrap_or_default(),
            ..Record::default()
        };

        for (key, value) in &obj {
            if matches!(key.as_str(), "level" | "ts" | "msg") {
                continue;
            }
            let text = match (key.as_str(), value) {
                ("AWSCluster", Value::Object(cluster)) => Self::object_ref(cluster),
                _ => Self::scalar_text(value),
            };
            record.fields.insert(key.clone(), text);
        }

        Ok(record)
    }

    /// Flatten a `{"name": .., "namespace": ..}` reference to `namespace/name`
    fn object_ref(obj: &Map<String, Value>) -> String {
        let part = |key: &str| obj.get(key).and_then(Value::as_str).unwrap_or_default();
        format!("{}/{}", part("namespace"), part("name"))
    }

    /// Strings verbatim, anything else as its JSON text
    fn scalar_text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Parse a klog text line
    fn parse_klog(line: &str) -> Result<Record, ParseError> {
        let caps = KLOG_HEADER_RE.captures(line).ok_or(ParseError::NoHeader)?;

        let level = caps[1]
            .chars()
            .next()
            .and_then(Level::from_klog)
            .ok_or(ParseError::NoHeader)?;

        Ok(Record {
            level,
            date: caps[2].to_string(),
            time: caps[3].to_string(),
            location: Some(caps[4].to_string()),
            message: caps[5].to_string(),
            fields: Self::parse_kv(&caps[6]),
        })
    }

    /// Scan the trailing `key=value` segment of a klog line
    fn parse_kv(segment: &str) -> Fields {
        let mut fields = Fields::new();

        for caps in KLOG_KV_RE.captures_iter(segment) {
            let value = if let Some(angle) = caps.get(2) {
                angle.as_str().trim()
            } else if let Some(quoted) = caps.get(3) {
                quoted.as_str()
            } else {
                caps.get(4).map(|m| m.as_str()).unwrap_or_default()
            };
            fields.insert(caps[1].to_string(), value.to_string());
        }

        fields
    }
}
