//! `menu`

use crate::commands::{Command, CommandRegistry};
use crate::core::error::Result;
use crate::shell::AppContext;

/// Lists the commands registered in this session.
pub struct MenuCommand;

impl Command for MenuCommand {
    fn name(&self) -> &'static str {
        "menu"
    }

    fn description(&self) -> &'static str {
        "Show this menu"
    }

    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let mut lines = vec!["Available commands:".to_string()];
        for (i, info) in ctx.catalog().iter().enumerate() {
            lines.push(format!("{}. {} - {}", i + 1, info.name, info.description));
        }
        lines.push(format!("{}. exit - Exit the application", lines.len()));

        ctx.console.println(lines.join("\n"))
    }
}

pub fn register(registry: &mut CommandRegistry) -> Result<()> {
    registry.register(Box::new(MenuCommand))
}
