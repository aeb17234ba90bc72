use crate::error::CoreError;
use crate::models::{NewTaskData, Session, SignUpResponse, TaskRecord, UpdateTaskData};
use crate::session::Subscription;
use async_trait::async_trait;

/// Authentication half of the backend.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str)
        -> Result<Session, CoreError>;
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<SignUpResponse, CoreError>;
    async fn get_session(&self) -> Result<Option<Session>, CoreError>;
    async fn sign_out(&self) -> Result<(), CoreError>;
    /// Registers for session changes until the returned subscription is dropped.
    fn on_auth_state_change(&self) -> Subscription;
}

/// Data half of the backend: the `tasks` table and its two procedures.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Every task with its tag names, oldest first.
    async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, CoreError>;
    async fn create_task_with_tags(&self, data: NewTaskData) -> Result<(), CoreError>;
    async fn update_task_with_tags(&self, data: UpdateTaskData) -> Result<(), CoreError>;
}

/// The full backend the application runs against.
pub trait Backend: AuthService + TaskStore {}

impl<T: AuthService + TaskStore> Backend for T {}
