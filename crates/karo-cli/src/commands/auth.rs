use anyhow::{anyhow, Result};
use dialoguer::{Input, Password};
use karo_core::app::App;
use karo_core::backend::Backend;
use karo_core::error::CoreError;
use karo_core::forms::{LoginForm, SignupForm};
use karo_core::routes::Route;
use owo_colors::{OwoColorize, Style};

use crate::cli::{LoginCommand, SignupCommand};
use crate::util::grid_result;
use crate::views::table::display_tasks;

pub async fn login<B: Backend + 'static>(app: &mut App<B>, command: LoginCommand) -> Result<()> {
    let email = match command.email {
        Some(email) => email,
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };
    let password = match command.password {
        Some(password) => password,
        None => Password::new().with_prompt("Password").interact()?,
    };

    app.visit(Route::Login).await;
    let mut form = LoginForm::new(email, password);
    if !app.login(&mut form).await {
        let message = form.error.unwrap_or_else(|| "Sign-in failed".to_string());
        return Err(anyhow!(CoreError::Backend(message)));
    }

    let success_style = Style::new().green().bold();
    println!(
        "{} Signed in as {}",
        "✓".style(success_style),
        form.email.bright_white().bold()
    );
    grid_result(app)?;
    display_tasks(app.grid().rows());
    Ok(())
}

pub async fn signup<B: Backend + 'static>(app: &mut App<B>, command: SignupCommand) -> Result<()> {
    let password = match command.password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?,
    };

    app.visit(Route::Signup).await;
    let mut form = SignupForm::new(command.username, command.email, password);
    app.signup(&mut form).await;

    if let Some(error) = form.error {
        return Err(anyhow!(CoreError::Backend(error)));
    }
    if let Some(message) = form.message {
        let success_style = Style::new().green().bold();
        println!("{} {}", "✓".style(success_style), message);
    }
    Ok(())
}

pub async fn logout<B: Backend + 'static>(app: &mut App<B>) -> Result<()> {
    app.logout().await?;
    println!("Signed out.");
    Ok(())
}
