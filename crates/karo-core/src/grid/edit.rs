use crate::models::{Field, Tag, Task};

/// The cell being edited and its in-progress text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditCursor {
    pub row_index: usize,
    pub field: Field,
    pub value: String,
}

impl EditCursor {
    /// Copy of `row` with the edited value written into the cursor's field.
    ///
    /// Tag text becomes one tag per comma-separated term. Empty terms are
    /// kept here and only dropped when the update call is built.
    pub fn apply_to(&self, row: &Task) -> Task {
        let mut updated = row.clone();
        match self.field {
            Field::Tag => {
                updated.tags = self.value.split(',').map(|t| Tag::new(t.trim())).collect();
            }
            Field::Time => updated.time = self.value.clone(),
            Field::Name => updated.name = self.value.clone(),
            Field::Notes => updated.notes = self.value.clone(),
        }
        updated
    }
}
