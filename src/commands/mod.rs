//! Interactive command handlers
//!
//! Each handler implements [`Command`] and is registered under a unique name
//! in a [`CommandRegistry`]. The builtin set is a static table of module
//! registration functions run once at startup.
//!
//! # Builtin Commands
//!
//! - **arithmetic**: `add`, `subtract`, `multiply`, `divide`
//! - **menu**: `menu`
//! - **history**: `history`, `clear_history`
//! - **persistence**: `save_history`, `load_history`, `delete_history`
//! - **statistics**: `statistics`, `distribution`
//! - **filter**: `filter_history`
//! - **export**: `export_excel`

pub mod arithmetic;
pub mod export;
pub mod filter;
pub mod history;
pub mod menu;
pub mod persistence;
pub mod statistics;

use crate::core::error::{CalcError, Result};
use crate::shell::AppContext;

// =============================================================================
// Command Trait
// =============================================================================

/// A named handler invoked from the shell prompt.
///
/// Handlers read any further input they need through the context console
/// and render expected failures themselves; an `Err` is reported by the
/// dispatcher and the shell carries on.
pub trait Command {
    /// Exact name typed at the prompt.
    fn name(&self) -> &'static str;

    /// One-line summary shown by `menu`.
    fn description(&self) -> &'static str;

    fn execute(&self, ctx: &mut AppContext) -> Result<()>;
}

/// Name and description of a registered command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// A module-level registration function.
pub type Registration = fn(&mut CommandRegistry) -> Result<()>;

/// Registration functions for the builtin command modules, in menu order.
pub const BUILTINS: &[Registration] = &[
    arithmetic::register,
    menu::register,
    history::register,
    persistence::register,
    statistics::register,
    filter::register,
    export::register,
];

// =============================================================================
// Command Registry
// =============================================================================

/// Registry of command handlers keyed by name.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every builtin command.
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        for registration in BUILTINS {
            registration(&mut registry)?;
        }
        Ok(registry)
    }

    /// Register a handler; a name can only be claimed once.
    pub fn register(&mut self, command: Box<dyn Command>) -> Result<()> {
        if self.get(command.name()).is_some() {
            return Err(CalcError::DuplicateCommand {
                name: command.name().to_string(),
            });
        }
        tracing::debug!(command = command.name(), "registered command");
        self.commands.push(command);
        Ok(())
    }

    /// Find a handler by its exact name.
    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    /// Registered commands in registration order.
    pub fn catalog(&self) -> Vec<CommandInfo> {
        self.commands
            .iter()
            .map(|c| CommandInfo {
                name: c.name(),
                description: c.description(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Treat `y`/`Y` as confirmation.
pub(crate) fn confirmed(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

// =============================================================================
// Tests
// =============================================================================
