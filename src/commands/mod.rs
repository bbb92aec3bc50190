//! Command handlers: the text front end driving the session controller.
//!
//! Each command reads or acts through the shared `AuthContext` and renders
//! the resulting session view.

mod views;

use std::io::{self, Write};

use clap::Subcommand;

use crate::config::schema_json;
use crate::models::SessionPhase;
use crate::state::AppState;

pub use views::{render_session, Palette};

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Show who is signed in
    Status,
    /// Sign in through the identity provider
    Login,
    /// End the current session
    Logout,
    /// Re-validate the session and show the refreshed profile
    Refresh,
    /// Print the JSON schema of the configuration file
    PrintSchema,
}

/// Runs one command against the mounted application.
pub async fn execute<W: Write>(
    state: &AppState,
    command: Command,
    out: &mut W,
    color: bool,
) -> io::Result<()> {
    let palette = Palette::new(color);
    let auth = &state.auth;

    match command {
        Command::Status => {
            let session = auth.wait_until_settled().await;
            render_session(out, &session, &auth.login_url(), &palette)
        }
        Command::Login => {
            auth.login();
            writeln!(out, "Sign-in page: {}", auth.login_url())?;
            writeln!(
                out,
                "Finish signing in in your browser, then run `chronotes status`."
            )?;
            if state.config.gateway.session_cookie.is_none() {
                writeln!(
                    out,
                    "{}Tip:{} set gateway.session_cookie to reuse the browser session here.",
                    palette.bold, palette.reset_style
                )?;
            }
            Ok(())
        }
        Command::Logout => {
            auth.wait_until_settled().await;
            auth.logout().await;
            let session = auth.state();
            if session.phase() == SessionPhase::Authenticated {
                writeln!(
                    out,
                    "{}Logout failed;{} the session is still active (see logs for details).",
                    palette.red, palette.reset_color
                )?;
            }
            render_session(out, &session, &auth.login_url(), &palette)
        }
        Command::Refresh => {
            auth.wait_until_settled().await;
            auth.refresh_user().await;
            render_session(out, &auth.state(), &auth.login_url(), &palette)
        }
        Command::PrintSchema => {
            let schema = schema_json().map_err(io::Error::other)?;
            writeln!(out, "{}", schema)
        }
    }
}
