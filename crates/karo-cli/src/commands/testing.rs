use async_trait::async_trait;
use karo_core::app::App;
use karo_core::backend::{AuthService, TaskStore};
use karo_core::error::CoreError;
use karo_core::models::{NewTaskData, Session, SignUpResponse, Tag, TaskRecord, UpdateTaskData};
use karo_core::session::{SessionHub, Subscription};
use std::sync::Mutex;

/// Signed-in backend whose fetches start failing after a set number of calls.
#[derive(Default)]
pub struct FlakyBackend {
    hub: SessionHub,
    records: Mutex<Vec<TaskRecord>>,
    fetch_calls: Mutex<usize>,
    pub fetches_before_failure: Option<usize>,
    pub fail_create: Option<String>,
}

impl FlakyBackend {
    pub fn signed_in() -> Self {
        let backend = Self::default();
        backend.hub.restore(session());
        backend
    }

    pub fn with_row(self, name: &str) -> Self {
        self.records.lock().unwrap().push(TaskRecord {
            id: 1,
            time: Some("09:00 - 10:00".to_string()),
            name: Some(name.to_string()),
            notes: None,
            tags: Some(vec![Tag::new("work")]),
        });
        self
    }

    pub fn failing_fetches_after(mut self, calls: usize) -> Self {
        self.fetches_before_failure = Some(calls);
        self
    }

    pub fn into_app(self) -> App<Self> {
        App::new(self)
    }
}

fn session() -> Session {
    serde_json::from_value(serde_json::json!({
        "access_token": "token",
        "refresh_token": "refresh",
        "user": {
            "id": "8f14e45f-ceea-467f-a8f5-1b1e3c6f3d11",
            "email": "asha@example.com"
        }
    }))
    .unwrap()
}

#[async_trait]
impl AuthService for FlakyBackend {
    async fn sign_in_with_password(&self, _: &str, _: &str) -> Result<Session, CoreError> {
        Ok(session())
    }

    async fn sign_up(&self, _: &str, _: &str, _: &str) -> Result<SignUpResponse, CoreError> {
        Ok(SignUpResponse {
            user: None,
            session: None,
        })
    }

    async fn get_session(&self) -> Result<Option<Session>, CoreError> {
        Ok(self.hub.current())
    }

    async fn sign_out(&self) -> Result<(), CoreError> {
        Ok(())
    }

    fn on_auth_state_change(&self) -> Subscription {
        self.hub.subscribe()
    }
}

#[async_trait]
impl TaskStore for FlakyBackend {
    async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, CoreError> {
        let mut calls = self.fetch_calls.lock().unwrap();
        *calls += 1;
        if self.fetches_before_failure.is_some_and(|limit| *calls > limit) {
            return Err(CoreError::Backend("JWT expired".to_string()));
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn create_task_with_tags(&self, data: NewTaskData) -> Result<(), CoreError> {
        if let Some(message) = &self.fail_create {
            return Err(CoreError::Backend(message.clone()));
        }
        let mut records = self.records.lock().unwrap();
        let id = records.len() as i64 + 1;
        records.push(TaskRecord {
            id,
            time: Some(data.time),
            name: Some(data.name),
            notes: Some(data.notes),
            tags: Some(data.tags.iter().map(Tag::new).collect()),
        });
        Ok(())
    }

    async fn update_task_with_tags(&self, data: UpdateTaskData) -> Result<(), CoreError> {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.id == data.id) {
            record.name = Some(data.name);
        }
        Ok(())
    }
}
