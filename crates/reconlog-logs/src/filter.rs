use reconlog_types::{Level, Record};

/// Filter for log records, built once at startup
///
/// Every constraint is optional; a record is kept only when all of the set
/// constraints hold.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Exact match on the `name` field
    name: Option<String>,

    /// Exact match on the `namespace` field
    namespace: Option<String>,

    /// Exact match on the `controller` field
    controller: Option<String>,

    /// Exact level match
    level: Option<Level>,
}

impl RecordFilter {
    /// Create a filter that keeps everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `fields["name"]` to equal `name` (empty = no constraint)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = non_empty(name.into());
        self
    }

    /// Require `fields["namespace"]` to equal `namespace` (empty = no constraint)
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = non_empty(namespace.into());
        self
    }

    /// Require `fields["controller"]` to equal `controller` (empty = no constraint)
    pub fn with_controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = non_empty(controller.into());
        self
    }

    /// Require an exact level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Check if a record passes every configured constraint
    pub fn keep(&self, record: &Record) -> bool {
        if let Some(level) = self.level {
            if record.level != level {
                return false;
            }
        }

        Self::field_matches(record, "name", self.name.as_deref())
            && Self::field_matches(record, "namespace", self.namespace.as_deref())
            && Self::field_matches(record, "controller", self.controller.as_deref())
    }

    /// Check if filter is empty (keeps everything)
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.namespace.is_none()
            && self.controller.is_none()
            && self.level.is_none()
    }

    fn field_matches(record: &Record, key: &str, wanted: Option<&str>) -> bool {
        match wanted {
            Some(wanted) => record.field(key).unwrap_or_default() == wanted,
            None => true,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
