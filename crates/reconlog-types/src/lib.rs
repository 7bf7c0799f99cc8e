//! Shared types for reconlog
//!
//! This crate contains the normalized log record and the key tables used by
//! both the parser and the renderer.

use indexmap::IndexMap;

// ============================================================================
// Key Tables
// ============================================================================

/// Keys shown in the headline, never repeated in the key/value section
pub const OMITTED_KEYS: &[&str] = &[
    "controller",
    "controllerGroup",
    "controllerKind",
    "namespace",
    "name",
    "err",
];

/// Keys rendered first in the key/value section, in this order
pub const PRIORITY_KEYS: &[&str] = &["cluster", "AWSCluster", "machinePool", "AWSMachinePool"];

/// Check if a key is already part of the headline
pub fn is_omitted(key: &str) -> bool {
    OMITTED_KEYS.contains(&key)
}

// ============================================================================
// Log Types
// ============================================================================

/// Log severity level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Level {
    #[default]
    Info,
    Warning,
    Error,
    Fatal,
    Debug,
}

impl Level {
    /// Parse the single-letter klog severity
    pub fn from_klog(c: char) -> Option<Self> {
        match c {
            'I' => Some(Self::Info),
            'W' => Some(Self::Warning),
            'E' => Some(Self::Error),
            'F' => Some(Self::Fatal),
            _ => None,
        }
    }

    /// Parse a level word (case-insensitive)
    ///
    /// Only the words structured loggers emit are recognized; `fatal` is a
    /// klog-only level and has no word form here.
    pub fn from_word(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "info" => Some(Self::Info),
            "warning" | "warn" => Some(Self::Warning),
            "error" => Some(Self::Error),
            "debug" => Some(Self::Debug),
            _ => None,
        }
    }

    /// Single-letter display marker
    pub fn as_char(&self) -> char {
        match self {
            Self::Info => 'I',
            Self::Warning => 'W',
            Self::Error => 'E',
            Self::Fatal => 'F',
            Self::Debug => 'D',
        }
    }
}

/// Attribute map, unique keys in first-insertion order
pub type Fields = IndexMap<String, String>;

/// A single normalized log record
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    /// Resolved severity
    pub level: Level,

    /// Date as written in the source (klog `MMDD`, JSON `ts`)
    pub date: String,

    /// Time of day as written in the source (empty for JSON)
    pub time: String,

    /// Source location (klog only)
    pub location: Option<String>,

    /// Log message
    pub message: String,

    /// Key/value attributes
    pub fields: Fields,
}

impl Record {
    /// Create a record with the given level and message
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            ..Self::default()
        }
    }

    /// Look up an attribute
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// The `controller` attribute, empty when absent
    pub fn controller(&self) -> &str {
        self.field("controller").unwrap_or_default()
    }

    /// `namespace/name` of the reconciled object; missing parts render empty
    pub fn object_ref(&self) -> String {
        format!(
            "{}/{}",
            self.field("namespace").unwrap_or_default(),
            self.field("name").unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_klog() {
        assert_eq!(Level::from_klog('E'), Some(Level::Error));
        assert_eq!(Level::from_klog('F'), Some(Level::Fatal));
        assert_eq!(Level::from_klog('D'), None);
    }

    #[test]
    fn test_level_from_word() {
        assert_eq!(Level::from_word("WARN"), Some(Level::Warning));
        assert_eq!(Level::from_word("Warning"), Some(Level::Warning));
        assert_eq!(Level::from_word("debug"), Some(Level::Debug));
        assert_eq!(Level::from_word("fatal"), None);
        assert_eq!(Level::from_word(""), None);
    }

    #[test]
    fn test_object_ref() {
        let mut record = Record::new(Level::Info, "msg");
        assert_eq!(record.object_ref(), "/");

        record.fields.insert("namespace".into(), "ns1".into());
        record.fields.insert("name".into(), "obj1".into());
        assert_eq!(record.object_ref(), "ns1/obj1");
    }

    #[test]
    fn test_omitted_keys() {
        assert!(is_omitted("controllerKind"));
        assert!(is_omitted("err"));
        assert!(!is_omitted("cluster"));
    }
}
