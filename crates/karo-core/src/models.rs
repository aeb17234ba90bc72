use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Identifier the backend assigns to a task row.
pub type TaskId = i64;

/// Sessions this close to expiry are treated as already expired.
pub const EXPIRY_MARGIN_SECS: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A task row as the client holds it, with every column normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub time: String,
    pub name: String,
    pub notes: String,
    pub tags: Vec<Tag>,
}

impl Task {
    /// Text shown for `field`; tags are joined with `", "`.
    pub fn field_text(&self, field: Field) -> String {
        match field {
            Field::Tag => self
                .tags
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            Field::Time => self.time.clone(),
            Field::Name => self.name.clone(),
            Field::Notes => self.notes.clone(),
        }
    }
}

/// A task row exactly as the data service returns it. Any column may be null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    #[serde(rename = "samay", default)]
    pub time: Option<String>,
    #[serde(rename = "karya", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTaskData {
    pub time: String,
    pub name: String,
    pub notes: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskData {
    pub id: TaskId,
    pub time: String,
    pub name: String,
    pub notes: String,
    pub tags: Vec<String>,
}

impl From<&Task> for UpdateTaskData {
    /// Flattens tags to their names, dropping empty ones.
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            time: task.time.clone(),
            name: task.name.clone(),
            notes: task.notes.clone(),
            tags: task
                .tags
                .iter()
                .map(|t| t.name.clone())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }
}

/// An editable column of the task grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Tag,
    Time,
    Name,
    Notes,
}

impl Field {
    /// Column order of the rendered table.
    pub const DISPLAY_ORDER: [Field; 4] = [Field::Tag, Field::Time, Field::Name, Field::Notes];
    /// Cell order of the new-row draft.
    pub const DRAFT_ORDER: [Field; 4] = [Field::Time, Field::Name, Field::Notes, Field::Tag];

    pub fn header(self) -> &'static str {
        match self {
            Field::Tag => "Tag",
            Field::Time => "Samay",
            Field::Name => "Karya",
            Field::Notes => "Notes",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Field::Tag => "tag",
            Field::Time => "time",
            Field::Name => "name",
            Field::Notes => "notes",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid field: {0} (expected tag, time, name or notes)")]
pub struct ParseFieldError(String);

impl FromStr for Field {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tag" | "tags" => Ok(Field::Tag),
            "time" | "samay" => Ok(Field::Time),
            "name" | "task" | "karya" => Ok(Field::Name),
            "notes" | "note" => Ok(Field::Notes),
            _ => Err(ParseFieldError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
    /// Linked identities; an empty list on signup means the email is taken.
    #[serde(default)]
    pub identities: Option<Vec<serde_json::Value>>,
}

impl User {
    pub fn username(&self) -> Option<&str> {
        self.user_metadata.get("username")?.as_str()
    }
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix timestamp in seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

impl Session {
    /// Fills in `expires_at` from `expires_in` when the backend omitted it.
    pub fn stamped(mut self, issued_at: DateTime<Utc>) -> Self {
        if self.expires_at.is_none() {
            if let Some(expires_in) = self.expires_in {
                self.expires_at = Some((issued_at + Duration::seconds(expires_in)).timestamp());
            }
        }
        self
    }

    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expires_at
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }

    /// A session without a known expiry never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expiry() {
            Some(expiry) => expiry <= now + Duration::seconds(EXPIRY_MARGIN_SECS),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignUpResponse {
    pub user: Option<User>,
    /// Present when the project confirms emails automatically.
    pub session: Option<Session>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: Some("a@b.c".to_string()),
            user_metadata: serde_json::json!({ "username": "asha" }),
            identities: None,
        }
    }

    #[rstest]
    #[case("tag", Field::Tag)]
    #[case("Tags", Field::Tag)]
    #[case("samay", Field::Time)]
    #[case("time", Field::Time)]
    #[case("karya", Field::Name)]
    #[case(" name ", Field::Name)]
    #[case("notes", Field::Notes)]
    fn test_parse_field(#[case] input: &str, #[case] expected: Field) {
        assert_eq!(input.parse::<Field>(), Ok(expected));
    }

    #[test]
    fn test_parse_field_rejects_unknown() {
        assert!("priority".parse::<Field>().is_err());
    }

    #[test]
    fn test_record_with_nulls_deserializes() {
        let record: TaskRecord = serde_json::from_str(
            r#"{"id": 4, "samay": null, "karya": "write", "notes": null, "tags": null}"#,
        )
        .unwrap();
        assert_eq!(record.id, 4);
        assert_eq!(record.time, None);
        assert_eq!(record.name.as_deref(), Some("write"));
        assert_eq!(record.tags, None);
    }

    #[test]
    fn test_update_data_drops_empty_tag_names() {
        let task = Task {
            id: 9,
            tags: vec![Tag::new("x"), Tag::new(""), Tag::new("y")],
            ..Default::default()
        };
        let data = UpdateTaskData::from(&task);
        assert_eq!(data.tags, vec!["x", "y"]);
        assert_eq!(data.id, 9);
    }

    #[test]
    fn test_field_text_joins_tags() {
        let task = Task {
            tags: vec![Tag::new("home"), Tag::new("gym")],
            ..Default::default()
        };
        assert_eq!(task.field_text(Field::Tag), "home, gym");
    }

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let session = Session {
            access_token: "t".to_string(),
            refresh_token: None,
            token_type: default_token_type(),
            expires_in: Some(3600),
            expires_at: None,
            user: user(),
        }
        .stamped(now);

        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + Duration::seconds(3595)));
        assert_eq!(user().username(), Some("asha"));
    }
}
