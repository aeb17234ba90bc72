use anyhow::{anyhow, Result};
use karo_core::app::App;
use karo_core::backend::Backend;
use karo_core::error::CoreError;
use karo_core::grid::MutationOutcome;
use owo_colors::{OwoColorize, Style};

use crate::cli::EditCommand;
use crate::util::{grid_result, open_grid};
use crate::views::table::display_tasks;

pub async fn edit_task<B: Backend + 'static>(app: &mut App<B>, command: EditCommand) -> Result<()> {
    let row_index = command.row.checked_sub(1).ok_or_else(|| {
        anyhow!(CoreError::InvalidInput(
            "Row numbers start at 1.".to_string()
        ))
    })?;

    open_grid(app).await?;

    let grid = app.grid_mut();
    grid.begin_edit(row_index, command.field)?;
    grid.type_into_edit(command.value)?;

    match app.commit_edit().await? {
        MutationOutcome::Saved => {
            grid_result(app)?;
            let success_style = Style::new().green().bold();
            println!(
                "{} Updated {} of row {}",
                "✓".style(success_style),
                command.field,
                command.row
            );
            display_tasks(app.grid().rows());
            Ok(())
        }
        MutationOutcome::Skipped => Ok(()),
        MutationOutcome::Failed => Err(anyhow!(CoreError::Backend(
            app.grid()
                .error()
                .unwrap_or_else(|| "Failed to update task".to_string())
        ))),
    }
}
