//! Interactive shell
//!
//! [`AppContext`] owns the one history table of the process together with
//! the console and configuration; the [`Dispatcher`] resolves typed lines to
//! registered handlers and the [`Shell`] drives the prompt loop.

pub mod console;

pub use console::{CapturedOutput, Console};

use std::panic::{self, AssertUnwindSafe};

use tracing::{error, info, warn};

use crate::commands::{CommandInfo, CommandRegistry};
use crate::config::AppConfig;
use crate::core::error::Result;
use crate::core::export::{WorkbookWriter, XlsxWorkbookWriter};
use crate::core::history::HistoryStore;

pub const WELCOME: &str = "Welcome to the calculator! Type 'exit' to quit.";
pub const PROMPT: &str = ">>> ";
pub const GOODBYE: &str = "Goodbye!";

// =============================================================================
// Application Context
// =============================================================================

/// State shared by every handler for the lifetime of a session.
pub struct AppContext {
    pub history: HistoryStore,
    pub console: Console,
    pub config: AppConfig,
    pub workbook_writer: Box<dyn WorkbookWriter>,
    catalog: Vec<CommandInfo>,
}

impl AppContext {
    /// Context with an empty history defaulting to the configured file.
    pub fn new(config: AppConfig, console: Console) -> Self {
        Self {
            history: HistoryStore::new(config.history_path()),
            console,
            config,
            workbook_writer: Box::new(XlsxWorkbookWriter),
            catalog: Vec::new(),
        }
    }

    /// Replace the spreadsheet writer used by `export_excel`.
    pub fn with_workbook_writer(mut self, writer: Box<dyn WorkbookWriter>) -> Self {
        self.workbook_writer = writer;
        self
    }

    /// Commands available in this session.
    pub fn catalog(&self) -> &[CommandInfo] {
        &self.catalog
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

/// What the shell should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Continue,
    Exit,
}

/// Resolves lines to handlers and contains their failures.
pub struct Dispatcher {
    registry: CommandRegistry,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Handle one input line.
    ///
    /// Only console write failures are returned; handler errors and panics
    /// are reported and the loop continues.
    pub fn dispatch(&self, line: &str, ctx: &mut AppContext) -> Result<Dispatch> {
        let name = line.trim();
        if name.is_empty() {
            return Ok(Dispatch::Continue);
        }
        if name.eq_ignore_ascii_case("exit") || name.eq_ignore_ascii_case("quit") {
            return Ok(Dispatch::Exit);
        }

        let Some(command) = self.registry.get(name) else {
            warn!(command = name, "unknown command");
            ctx.console.println(format!("No such command: {}", name))?;
            return Ok(Dispatch::Continue);
        };

        info!(command = name, "executing command");
        match panic::catch_unwind(AssertUnwindSafe(|| command.execute(ctx))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!(command = name, error = %e, "command failed");
                ctx.console.println(format!("Error: {}", e))?;
            }
            Err(_) => {
                error!(command = name, "command panicked");
                ctx.console
                    .println(format!("Error: command '{}' failed unexpectedly", name))?;
            }
        }
        ctx.console.flush()?;
        Ok(Dispatch::Continue)
    }
}

// =============================================================================
// Shell
// =============================================================================

/// The read-dispatch loop.
pub struct Shell {
    dispatcher: Dispatcher,
    ctx: AppContext,
}

impl Shell {
    pub fn new(registry: CommandRegistry, mut ctx: AppContext) -> Self {
        ctx.catalog = registry.catalog();
        Self {
            dispatcher: Dispatcher::new(registry),
            ctx,
        }
    }

    /// Loop until `exit`, `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        info!(commands = self.dispatcher.registry().len(), "shell started");
        self.ctx.console.println(WELCOME)?;
        self.dispatcher.dispatch("menu", &mut self.ctx)?;

        loop {
            let Some(line) = self.ctx.console.prompt(PROMPT)? else {
                break;
            };
            if self.dispatcher.dispatch(&line, &mut self.ctx)? == Dispatch::Exit {
                break;
            }
        }

        self.ctx.console.println(GOODBYE)?;
        self.ctx.console.flush()?;
        info!("shell exited");
        Ok(())
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut AppContext {
        &mut self.ctx
    }
}
