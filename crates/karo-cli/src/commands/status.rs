use anyhow::Result;
use chrono_humanize::Humanize;
use karo_core::app::App;
use karo_core::backend::{AuthService, Backend};
use owo_colors::{OwoColorize, Style};

pub async fn show_status<B: Backend + 'static>(app: &App<B>) -> Result<()> {
    let Some(session) = app.backend().get_session().await? else {
        println!("Not signed in. Run `karo login` to sign in.");
        return Ok(());
    };

    let info_style = Style::new().blue();
    let who = session.user.email.as_deref().unwrap_or("unknown user");
    println!("Signed in as {}", who.bright_white().bold());
    if let Some(username) = session.user.username() {
        println!("  {} Username: {}", "→".style(info_style), username);
    }
    if let Some(expiry) = session.expiry() {
        println!(
            "  {} Session expires {}",
            "→".style(info_style),
            expiry.humanize()
        );
    }
    Ok(())
}
