mod core;
mod item_sets;

pub use item_sets::{register_item_sets, ELEVATED_PERMISSION};

use crate::commands::{
    argument::ArgumentType,
    context::ExecutionContext,
    error::{CommandError, CommandResult},
    node::{CommandNode, NodeType},
    parser, usage, CommandRegistry, CommandSender,
};
use crate::permissions::PermissionLevel;
use crate::server::Message;
use std::sync::mpsc::Sender;

pub fn register_commands(registry: &mut CommandRegistry) {
    register_execute(registry);
    register_help(registry);
}

/// Registers the commands that queue work for the server loop on `actions`.
pub fn register_server_commands(registry: &mut CommandRegistry, actions: Sender<Message>) {
    core::register_commands(registry, actions);
}

fn register_execute(registry: &mut CommandRegistry) {
    fn exec_execute_as(ctx: &mut ExecutionContext<'_>) -> CommandResult<()> {
        let name = ctx.args().get_player("player")?;
        let command = ctx.args().get_greedy("command")?;
        let uuid = ctx.host().find_player(&name)?;

        let status = ctx.execute_as(CommandSender::Player(uuid), &command);
        if !status.is_success() {
            return Err(CommandError::runtime(format!(
                "Command failed when executed as {}",
                name
            )));
        }
        Ok(())
    }

    registry.register(
        CommandNode::literal("execute")
            .require_permission(PermissionLevel::Gamemaster)
            .then(CommandNode::literal("as").then(
                CommandNode::argument("player", ArgumentType::player()).then(
                    CommandNode::literal("run").then(
                        CommandNode::argument("command", ArgumentType::greedy_string())
                            .executes(exec_execute_as),
                    ),
                ),
            )),
    );
}

fn register_help(registry: &mut CommandRegistry) {
    fn exec_help_command(ctx: &mut ExecutionContext<'_>) -> CommandResult<()> {
        let command = ctx.args().get_greedy("command")?;

        if command.is_empty() {
            let mut commands = Vec::new();

            for child in &ctx.registry().get_root().children {
                if let Some(level) = child.permission {
                    if !ctx.has_permission(level) {
                        continue;
                    }
                }
                if let NodeType::Literal { name, aliases } = &child.node_type {
                    if aliases.is_empty() {
                        commands.push(format!("/{}", name));
                    } else {
                        commands.push(format!("/{} (Aliases: {})", name, aliases.join(", ")));
                    }
                }
            }

            commands.sort();
            ctx.reply("Run /help <command> for more information.");
            ctx.reply("Available commands:");
            for cmd in commands {
                ctx.reply(&format!(" {}", cmd));
            }
        } else {
            let message = match parser::parse(ctx.registry().get_root(), &command) {
                parser::ParseResult::Success { path, .. }
                | parser::ParseResult::Partial { path, .. }
                | parser::ParseResult::TooManyArguments { path, .. }
                | parser::ParseResult::InvalidArgument { path, .. } => {
                    format!("Usage: {}", usage::generate_usage(&path))
                }
                parser::ParseResult::NothingMatched => format!("Command not found: {}", command),
            };
            ctx.reply(&message);
        }
        Ok(())
    }

    registry.register(CommandNode::literal("help").then(
        CommandNode::argument("command", ArgumentType::greedy_string()).executes(exec_help_command),
    ));
}
