use std::io::{self, Write};

use inline_colorization::*;

use crate::models::{SessionPhase, SessionState};

/// Terminal escape codes, or empty strings when output is not a terminal.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bold: &'static str,
    pub reset_style: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub red: &'static str,
    pub reset_color: &'static str,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        if color {
            Palette {
                bold: style_bold,
                reset_style: style_reset,
                green: color_green,
                yellow: color_yellow,
                red: color_red,
                reset_color: color_reset,
            }
        } else {
            Palette {
                bold: "",
                reset_style: "",
                green: "",
                yellow: "",
                red: "",
                reset_color: "",
            }
        }
    }
}

/// Writes the loading, signed-in or signed-out view for `session`.
pub fn render_session<W: Write>(
    out: &mut W,
    session: &SessionState,
    login_url: &str,
    p: &Palette,
) -> io::Result<()> {
    match (session.phase(), &session.user) {
        (SessionPhase::Authenticated, Some(user)) => {
            writeln!(
                out,
                "{}●{} Signed in as {}{}{} <{}>",
                p.green, p.reset_color, p.bold, user.name, p.reset_style, user.email
            )?;
            if let Some(id) = &user.id {
                writeln!(out, "  id:     {}", id)?;
            }
            if let Some(avatar) = &user.avatar {
                writeln!(out, "  avatar: {}", avatar)?;
            }
            Ok(())
        }
        (SessionPhase::Probing, _) => {
            writeln!(out, "{}●{} Checking session...", p.yellow, p.reset_color)
        }
        _ => {
            writeln!(out, "{}●{} Not signed in.", p.red, p.reset_color)?;
            writeln!(out, "  Run `chronotes login` or open {}", login_url)
        }
    }
}
