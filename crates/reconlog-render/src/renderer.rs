use std::borrow::Cow;
use std::collections::HashSet;

use reconlog_types::{is_omitted, Level, Record, PRIORITY_KEYS};

use crate::theme::Theme;

/// Renders records as single colorized lines
#[derive(Clone, Copy, Debug, Default)]
pub struct Renderer {
    theme: Theme,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Render a record as `<headline>[ | key: value | ...]`
    pub fn render(&self, record: &Record) -> String {
        let mut line = self.headline(record);

        let pairs = Self::key_values(record);
        if !pairs.is_empty() {
            let sep = format!("{} | {}", self.theme.separator(), self.theme.reset());
            let kv = self.theme.key_value();
            let reset = self.theme.reset();

            let rendered: Vec<String> = pairs
                .iter()
                .map(|(k, v)| format!("{kv}{k}:{reset} {kv}{v}{reset}"))
                .collect();

            line.push_str(&sep);
            line.push_str(&rendered.join(sep.as_str()));
        }

        line
    }

    /// `<level><date> <time> <controller>[@<location>] <namespace>/<name> <message>`
    pub fn headline(&self, record: &Record) -> String {
        let theme = &self.theme;
        let reset = theme.reset();

        let slot = match &record.location {
            Some(location) if !location.is_empty() => {
                format!("{}@{}", record.controller(), location)
            }
            _ => record.controller().to_string(),
        };

        format!(
            "{}{}{} {} {}{} {}{}{} {}{}{}",
            theme.header(record.level),
            record.level.as_char(),
            record.date,
            record.time,
            slot,
            reset,
            theme.object(record.level),
            record.object_ref(),
            reset,
            theme.message(record.level),
            Self::message(record),
            reset,
        )
    }

    /// Message text, with `err` appended for error records
    pub fn message(record: &Record) -> Cow<'_, str> {
        match (record.level, record.field("err")) {
            (Level::Error, Some(err)) => Cow::Owned(format!("{}: {}", record.message, err)),
            _ => Cow::Borrowed(&record.message),
        }
    }

    /// Fields for the key/value section: priority keys first, then the rest
    /// in field order, headline keys left out
    pub fn key_values(record: &Record) -> Vec<(&str, &str)> {
        let mut pairs = Vec::with_capacity(record.fields.len());
        let mut printed = HashSet::new();

        for key in PRIORITY_KEYS {
            if let Some(value) = record.field(key) {
                pairs.push((*key, value));
                printed.insert(*key);
            }
        }

        for (key, value) in &record.fields {
            if !is_omitted(key) && !printed.contains(key.as_str()) {
                pairs.push((key.as_str(), value.as_str()));
            }
        }

        pairs
    }
}
