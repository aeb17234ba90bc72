#![allow(dead_code)]

use async_trait::async_trait;
use karo_core::backend::{AuthService, TaskStore};
use karo_core::error::CoreError;
use karo_core::grid::GridStatus;
use karo_core::models::{
    NewTaskData, Session, SignUpResponse, Tag, TaskId, TaskRecord, UpdateTaskData, User,
};
use karo_core::session::{AuthEvent, SessionHub, Subscription};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;
use uuid::Uuid;

/// Everything the fake backend stores or has been asked to do.
#[derive(Default)]
pub struct FakeState {
    pub records: Vec<TaskRecord>,
    pub next_id: TaskId,
    pub accounts: HashMap<String, String>,
    pub fetch_calls: usize,
    pub created: Vec<NewTaskData>,
    pub updated: Vec<UpdateTaskData>,
    pub fail_fetch: Option<String>,
    pub fail_create: Option<String>,
    pub fail_update: Option<String>,
    pub fail_session_check: bool,
    pub status_observer: Option<watch::Receiver<GridStatus>>,
    pub loading_during_fetch: Vec<bool>,
}

/// In-memory stand-in for the hosted backend.
#[derive(Default)]
pub struct FakeBackend {
    pub hub: SessionHub,
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.state().next_id = 1;
        backend
    }

    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.state()
            .accounts
            .insert(email.to_string(), password.to_string());
        self
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Seeds a row the way the backend would return it.
    pub fn seed(&self, record: TaskRecord) {
        let mut state = self.state();
        state.next_id = state.next_id.max(record.id + 1);
        state.records.push(record);
    }

    pub fn seed_row(&self, time: &str, name: &str, notes: &str, tags: &[&str]) -> TaskId {
        let id = self.state().next_id;
        self.seed(TaskRecord {
            id,
            time: Some(time.to_string()),
            name: Some(name.to_string()),
            notes: Some(notes.to_string()),
            tags: Some(tags.iter().map(|t| Tag::new(*t)).collect()),
        });
        id
    }

    pub fn sign_in_as(&self, email: &str) {
        self.hub.publish(AuthEvent::SignedIn, Some(session_for(email)));
    }

    /// Ends the session as if it expired elsewhere.
    pub fn sign_out_now(&self) {
        self.hub.publish(AuthEvent::SignedOut, None);
    }

    pub fn fetch_calls(&self) -> usize {
        self.state().fetch_calls
    }
}

pub fn session_for(email: &str) -> Session {
    Session {
        access_token: format!("token-for-{email}"),
        refresh_token: Some("refresh".to_string()),
        token_type: "bearer".to_string(),
        expires_in: Some(3600),
        expires_at: None,
        user: User {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
            user_metadata: serde_json::Value::Null,
            identities: Some(vec![serde_json::json!({ "provider": "email" })]),
        },
    }
}

#[async_trait]
impl AuthService for FakeBackend {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, CoreError> {
        let known = self.state().accounts.get(email) == Some(&password.to_string());
        if !known {
            return Err(CoreError::Backend("Invalid login credentials".to_string()));
        }
        let session = session_for(email);
        self.hub.publish(AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<SignUpResponse, CoreError> {
        if password.len() < 6 {
            return Err(CoreError::Backend(
                "Password should be at least 6 characters.".to_string(),
            ));
        }
        let mut state = self.state();
        let identities = if state.accounts.contains_key(email) {
            vec![]
        } else {
            state
                .accounts
                .insert(email.to_string(), password.to_string());
            vec![serde_json::json!({ "provider": "email" })]
        };
        Ok(SignUpResponse {
            user: Some(User {
                id: Uuid::new_v4(),
                email: Some(email.to_string()),
                user_metadata: serde_json::json!({ "username": username }),
                identities: Some(identities),
            }),
            session: None,
        })
    }

    async fn get_session(&self) -> Result<Option<Session>, CoreError> {
        if self.state().fail_session_check {
            return Err(CoreError::Backend("auth service unavailable".to_string()));
        }
        Ok(self.hub.current())
    }

    async fn sign_out(&self) -> Result<(), CoreError> {
        self.hub.publish(AuthEvent::SignedOut, None);
        Ok(())
    }

    fn on_auth_state_change(&self) -> Subscription {
        self.hub.subscribe()
    }
}

#[async_trait]
impl TaskStore for FakeBackend {
    async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, CoreError> {
        let mut state = self.state();
        state.fetch_calls += 1;
        if let Some(observer) = &state.status_observer {
            let loading = observer.borrow().loading;
            state.loading_during_fetch.push(loading);
        }
        if let Some(message) = &state.fail_fetch {
            return Err(CoreError::Backend(message.clone()));
        }
        Ok(state.records.clone())
    }

    async fn create_task_with_tags(&self, data: NewTaskData) -> Result<(), CoreError> {
        let mut state = self.state();
        if let Some(message) = &state.fail_create {
            return Err(CoreError::Backend(message.clone()));
        }
        let id = state.next_id;
        state.next_id += 1;
        state.records.push(TaskRecord {
            id,
            time: Some(data.time.clone()),
            name: Some(data.name.clone()),
            notes: Some(data.notes.clone()),
            tags: Some(data.tags.iter().map(Tag::new).collect()),
        });
        state.created.push(data);
        Ok(())
    }

    async fn update_task_with_tags(&self, data: UpdateTaskData) -> Result<(), CoreError> {
        let mut state = self.state();
        if let Some(message) = &state.fail_update {
            return Err(CoreError::Backend(message.clone()));
        }
        let record = state
            .records
            .iter_mut()
            .find(|r| r.id == data.id)
            .ok_or_else(|| CoreError::Backend(format!("task {} not found", data.id)))?;
        record.time = Some(data.time.clone());
        record.name = Some(data.name.clone());
        record.notes = Some(data.notes.clone());
        record.tags = Some(data.tags.iter().map(Tag::new).collect());
        state.updated.push(data);
        Ok(())
    }
}
