//! Terminal output with termimad
//!
//! Results arrive as markdown through their `Display` implementations and are
//! printed either styled or as-is. JSON output bypasses styling entirely.

use std::fmt::Display;

use anyhow::{Context, Result};
use serde::Serialize;
use termimad::{crossterm::style::Color, MadSkin};

/// Prints command results, styled or plain.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::DarkGrey);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Prints markdown produced by `content`'s `Display` implementation.
    pub fn render(&self, content: &impl Display) -> Result<()> {
        let markdown = content.to_string();
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        for line in markdown.lines() {
            // Keep the hashes so heading levels stay visible
            if line.starts_with('#') {
                println!("\x1b[34m{line}\x1b[0m");
            } else {
                self.skin.print_inline(line);
                println!();
            }
        }
        Ok(())
    }

    /// Prints `value` as pretty JSON.
    pub fn json(&self, value: &impl Serialize) -> Result<()> {
        let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        println!("{json}");
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
