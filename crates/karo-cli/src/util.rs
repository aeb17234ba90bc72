use anyhow::{anyhow, Result};
use karo_core::app::App;
use karo_core::backend::Backend;
use karo_core::error::CoreError;
use karo_core::routes::Route;

/// Mounts the task grid, failing if the guard sent us to the login view.
pub async fn open_grid<B: Backend + 'static>(app: &mut App<B>) -> Result<()> {
    app.visit(Route::Tasks).await;
    if app.current_route() == Route::Login {
        return Err(anyhow!(CoreError::NotSignedIn));
    }
    Ok(())
}

/// Turns the grid's error banner into a command failure.
pub fn grid_result<B: Backend + 'static>(app: &App<B>) -> Result<()> {
    match app.grid().error() {
        Some(message) => Err(anyhow!(CoreError::Backend(message))),
        None => Ok(()),
    }
}
