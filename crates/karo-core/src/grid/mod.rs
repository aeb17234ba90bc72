//! Editable task grid.
//!
//! The grid caches the rows of the task table and mediates the two ways of
//! changing them: the new-row draft at the bottom of the table and inline
//! editing of a single cell. Every successful mutation is followed by a
//! full reload; rows are never patched locally.

use crate::backend::TaskStore;
use crate::error::CoreError;
use crate::loader;
use crate::models::{Field, Task, UpdateTaskData};
use chrono::NaiveTime;
use tokio::sync::watch;
use tracing::{debug, error, info};

pub mod draft;
pub mod edit;

pub use draft::{open_range_from, split_tags, DraftRow};
pub use edit::EditCursor;

/// Loading flag and error banner, observable while a call is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridStatus {
    pub loading: bool,
    pub error: Option<String>,
}

/// What a save trigger ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Nothing to send, no backend call was made.
    Skipped,
    Saved,
    /// The backend rejected the call; the error banner is set.
    Failed,
}

#[derive(Debug)]
pub struct Grid {
    rows: Vec<Task>,
    draft: DraftRow,
    active_field: Option<Field>,
    editing: Option<EditCursor>,
    status: watch::Sender<GridStatus>,
}

impl Grid {
    pub fn new() -> Self {
        let (status, _) = watch::channel(GridStatus::default());
        Self {
            rows: Vec::new(),
            draft: DraftRow::default(),
            active_field: None,
            editing: None,
            status,
        }
    }

    pub fn rows(&self) -> &[Task] {
        &self.rows
    }

    pub fn draft(&self) -> &DraftRow {
        &self.draft
    }

    pub fn active_field(&self) -> Option<Field> {
        self.active_field
    }

    pub fn editing(&self) -> Option<&EditCursor> {
        self.editing.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.status.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.status.borrow().error.clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<GridStatus> {
        self.status.subscribe()
    }

    fn set_loading(&self, loading: bool) {
        self.status.send_modify(|s| s.loading = loading);
    }

    fn set_error(&self, message: Option<String>) {
        self.status.send_modify(|s| s.error = message);
    }

    /// Replaces the rows with a fresh fetch. On failure the old rows stay
    /// and the error banner carries the backend's message.
    pub async fn load_tasks<S>(&mut self, store: &S)
    where
        S: TaskStore + ?Sized,
    {
        self.set_loading(true);
        match loader::fetch_rows(store).await {
            Ok(rows) => self.rows = rows,
            Err(err) => {
                error!(error = %err, "failed to load tasks");
                self.set_error(Some(format!("Failed to load tasks: {err}")));
            }
        }
        self.set_loading(false);
    }

    /// Moves focus to a draft cell, stamping an open time range if the
    /// draft has no time yet.
    pub fn focus_new_field(&mut self, field: Field, now: NaiveTime) -> Result<(), CoreError> {
        if self.editing.is_some() {
            return Err(CoreError::InvalidInput(
                "Finish editing the current cell first.".to_string(),
            ));
        }
        self.active_field = Some(field);
        if self.draft.time.is_empty() {
            self.draft.time = open_range_from(now);
        }
        Ok(())
    }

    pub fn type_into_draft(&mut self, value: impl Into<String>) -> Result<(), CoreError> {
        let field = self.active_field.ok_or_else(|| {
            CoreError::InvalidInput("No new-row field is focused.".to_string())
        })?;
        self.draft.set(field, value);
        Ok(())
    }

    /// Focus left the new row: create it if anything was typed.
    ///
    /// The draft is reset afterwards whether or not the create succeeded.
    pub async fn leave_new_row<S>(&mut self, store: &S) -> MutationOutcome
    where
        S: TaskStore + ?Sized,
    {
        self.active_field = None;
        if self.draft.is_empty() {
            return MutationOutcome::Skipped;
        }

        self.set_loading(true);
        self.set_error(None);
        let data = self.draft.to_new_task();
        debug!(name = %data.name, tags = ?data.tags, "creating task");

        let outcome = match store.create_task_with_tags(data).await {
            Ok(()) => {
                info!("task created");
                self.load_tasks(store).await;
                MutationOutcome::Saved
            }
            Err(err) => {
                error!(error = %err, "failed to create task");
                self.set_error(Some(format!("Failed to save task: {err}")));
                MutationOutcome::Failed
            }
        };
        self.set_loading(false);
        self.draft = DraftRow::default();
        outcome
    }

    /// Opens a cell for editing, pre-filled with its current text.
    pub fn begin_edit(&mut self, row_index: usize, field: Field) -> Result<(), CoreError> {
        if self.active_field.is_some() {
            return Err(CoreError::InvalidInput(
                "Finish the new row first.".to_string(),
            ));
        }
        if self.editing.is_some() {
            return Err(CoreError::InvalidInput(
                "Finish editing the current cell first.".to_string(),
            ));
        }
        let row = self
            .rows
            .get(row_index)
            .ok_or_else(|| CoreError::NotFound(format!("No row at position {}", row_index + 1)))?;

        self.editing = Some(EditCursor {
            row_index,
            field,
            value: row.field_text(field),
        });
        Ok(())
    }

    pub fn type_into_edit(&mut self, value: impl Into<String>) -> Result<(), CoreError> {
        let cursor = self
            .editing
            .as_mut()
            .ok_or_else(|| CoreError::InvalidInput("No cell is being edited.".to_string()))?;
        cursor.value = value.into();
        Ok(())
    }

    /// The edited cell lost focus: send the whole row as an update.
    ///
    /// The cursor is cleared afterwards whether or not the update succeeded.
    pub async fn commit_edit<S>(&mut self, store: &S) -> Result<MutationOutcome, CoreError>
    where
        S: TaskStore + ?Sized,
    {
        let Some(cursor) = self.editing.clone() else {
            return Ok(MutationOutcome::Skipped);
        };
        let Some(row) = self.rows.get(cursor.row_index) else {
            self.editing = None;
            return Err(CoreError::NotFound(format!(
                "No row at position {}",
                cursor.row_index + 1
            )));
        };

        self.set_loading(true);
        self.set_error(None);
        let updated = cursor.apply_to(row);
        let data = UpdateTaskData::from(&updated);
        debug!(id = data.id, field = %cursor.field, "updating task");

        let outcome = match store.update_task_with_tags(data).await {
            Ok(()) => {
                info!(id = updated.id, "task updated");
                self.load_tasks(store).await;
                MutationOutcome::Saved
            }
            Err(err) => {
                error!(id = updated.id, error = %err, "failed to update task");
                self.set_error(Some(format!("Failed to update task: {err}")));
                MutationOutcome::Failed
            }
        };
        self.editing = None;
        self.set_loading(false);
        Ok(outcome)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
