//! `save_history`, `load_history` and `delete_history`

use std::path::PathBuf;

use tracing::error;

use crate::commands::{confirmed, Command, CommandRegistry};
use crate::core::error::Result;
use crate::shell::AppContext;

/// Read a path, `None` meaning the store default.
fn ask_path(ctx: &mut AppContext, message: &str) -> Result<Option<PathBuf>> {
    let answer = ctx.console.ask(message)?;
    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
}

/// Writes the history table to CSV.
pub struct SaveHistoryCommand;

impl Command for SaveHistoryCommand {
    fn name(&self) -> &'static str {
        "save_history"
    }

    fn description(&self) -> &'static str {
        "Save calculation history to a CSV file"
    }

    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let path = ask_path(ctx, "Enter file path to save history (or press Enter for default): ")?;

        match ctx.history.save_history(path.as_deref()) {
            Ok(saved) => ctx
                .console
                .println(format!("History saved successfully to: {}", saved.display())),
            Err(e) => {
                error!(error = %e, "saving history failed");
                ctx.console.println(format!("Error saving history: {}", e))
            }
        }
    }
}

/// Replaces the history table with a CSV file's contents.
pub struct LoadHistoryCommand;

impl Command for LoadHistoryCommand {
    fn name(&self) -> &'static str {
        "load_history"
    }

    fn description(&self) -> &'static str {
        "Load calculation history from a CSV file"
    }

    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let path = ask_path(ctx, "Enter file path to load history (or press Enter for default): ")?;

        if ctx.history.load_history(path.as_deref()) {
            ctx.console.println("History loaded successfully.")
        } else {
            ctx.console
                .println("Error loading history. File may not exist or is invalid.")
        }
    }
}

/// Removes a history file after a y/n confirmation.
pub struct DeleteHistoryCommand;

impl Command for DeleteHistoryCommand {
    fn name(&self) -> &'static str {
        "delete_history"
    }

    fn description(&self) -> &'static str {
        "Delete a calculation history file"
    }

    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let path = ask_path(ctx, "Enter the path to the history file (or press Enter for default): ")?
            .unwrap_or_else(|| ctx.history.default_path().to_path_buf());
        let shown = path.display().to_string();

        let answer = ctx
            .console
            .ask(&format!("Are you sure you want to delete '{}'? (y/n): ", shown))?;
        if !confirmed(&answer) {
            return ctx.console.println("Operation canceled.");
        }

        if ctx.history.delete_history_file(Some(path.as_path())) {
            ctx.console.println(format!("History file deleted: {}", shown))
        } else {
            ctx.console
                .println(format!("Error: Could not delete history file '{}'.", shown))
        }
    }
}

pub fn register(registry: &mut CommandRegistry) -> Result<()> {
    registry.register(Box::new(SaveHistoryCommand))?;
    registry.register(Box::new(LoadHistoryCommand))?;
    registry.register(Box::new(DeleteHistoryCommand))
}
