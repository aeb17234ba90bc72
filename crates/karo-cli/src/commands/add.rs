use anyhow::{anyhow, Result};
use chrono::Local;
use karo_core::app::App;
use karo_core::backend::Backend;
use karo_core::error::CoreError;
use karo_core::grid::MutationOutcome;
use karo_core::models::Field;
use owo_colors::{OwoColorize, Style};

use crate::cli::AddCommand;
use crate::util::{grid_result, open_grid};
use crate::views::table::display_tasks;

pub async fn add_task<B: Backend + 'static>(app: &mut App<B>, command: AddCommand) -> Result<()> {
    open_grid(app).await?;

    let values = command.values();
    let grid = app.grid_mut();
    if values.is_empty() {
        // Focusing the time cell alone starts a row at the current time.
        grid.focus_new_field(Field::Time, Local::now().time())?;
    }
    for (field, value) in values {
        grid.focus_new_field(field, Local::now().time())?;
        grid.type_into_draft(value)?;
    }

    match app.leave_new_row().await {
        MutationOutcome::Saved => {
            grid_result(app)?;
            let success_style = Style::new().green().bold();
            println!("{} Added task", "✓".style(success_style));
            display_tasks(app.grid().rows());
            Ok(())
        }
        MutationOutcome::Skipped => {
            println!("Nothing to add.");
            Ok(())
        }
        MutationOutcome::Failed => Err(anyhow!(CoreError::Backend(
            app.grid()
                .error()
                .unwrap_or_else(|| "Failed to save task".to_string())
        ))),
    }
}
