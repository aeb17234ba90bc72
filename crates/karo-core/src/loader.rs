use crate::backend::TaskStore;
use crate::error::CoreError;
use crate::models::{Task, TaskRecord};
use tracing::debug;

/// Maps null columns to empty strings and a null tag list to no tags.
pub fn normalize(record: TaskRecord) -> Task {
    Task {
        id: record.id,
        time: record.time.unwrap_or_default(),
        name: record.name.unwrap_or_default(),
        notes: record.notes.unwrap_or_default(),
        tags: record.tags.unwrap_or_default(),
    }
}

/// Fetches every task in creation order, normalized for display.
pub async fn fetch_rows<S>(store: &S) -> Result<Vec<Task>, CoreError>
where
    S: TaskStore + ?Sized,
{
    let records = store.fetch_tasks().await?;
    debug!(count = records.len(), "fetched task rows");
    Ok(records.into_iter().map(normalize).collect())
}
