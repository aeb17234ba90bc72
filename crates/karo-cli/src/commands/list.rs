use anyhow::Result;
use karo_core::app::App;
use karo_core::backend::Backend;

use crate::util::{grid_result, open_grid};
use crate::views::table::display_tasks;

pub async fn list_tasks<B: Backend + 'static>(app: &mut App<B>) -> Result<()> {
    open_grid(app).await?;
    grid_result(app)?;
    display_tasks(app.grid().rows());
    Ok(())
}
