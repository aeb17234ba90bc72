use crate::models::{Field, NewTaskData};
use chrono::NaiveTime;

/// Marks a time range that has started but not ended.
pub const OPEN_RANGE_MARKER: &str = "∞";

/// Unsaved values of the new-row entry line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftRow {
    pub time: String,
    pub name: String,
    pub notes: String,
    /// Comma-separated tag names as typed.
    pub tag: String,
}

impl DraftRow {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Time => &self.time,
            Field::Name => &self.name,
            Field::Notes => &self.notes,
            Field::Tag => &self.tag,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Time => self.time = value,
            Field::Name => self.name = value,
            Field::Notes => self.notes = value,
            Field::Tag => self.tag = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        Field::DRAFT_ORDER.iter().all(|f| self.get(*f).is_empty())
    }

    pub fn to_new_task(&self) -> NewTaskData {
        NewTaskData {
            time: self.time.clone(),
            name: self.name.clone(),
            notes: self.notes.clone(),
            tags: split_tags(&self.tag),
        }
    }
}

/// Splits on commas, trims each term and drops empty ones.
pub fn split_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// `HH:MM - ∞`, a range starting at `now`.
pub fn open_range_from(now: NaiveTime) -> String {
    format!("{} - {}", now.format("%H:%M"), OPEN_RANGE_MARKER)
}
