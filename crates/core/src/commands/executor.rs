use crate::{
    commands::{
        argument_set::ArgumentSet,
        context::ExecutionContext,
        error::{CommandError, CommandResult, InternalError},
        node::CommandNode,
        parser::{self, ParseResult},
        registry::CommandRegistry,
        usage, CommandSender,
    },
    host::Host,
};
use tracing::{debug, error};

/// The outcome of one command invocation. Hosts that expect brigadier style
/// integer results can use [`CommandStatus::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure,
}

impl CommandStatus {
    pub fn code(self) -> i32 {
        match self {
            CommandStatus::Success => 1,
            CommandStatus::Failure => 0,
        }
    }

    pub fn is_success(self) -> bool {
        self == CommandStatus::Success
    }
}

impl CommandRegistry {
    /// Parses and runs `command_line` for `sender`. Every failure is reported
    /// to the sender here; nothing escapes a single invocation.
    pub fn execute(
        &self,
        host: &mut dyn Host,
        sender: CommandSender,
        command_line: &str,
    ) -> CommandStatus {
        let command_line = command_line.trim();
        let command_line = command_line.strip_prefix('/').unwrap_or(command_line);
        if command_line.is_empty() {
            return CommandStatus::Failure;
        }

        let command_line = self.expand_custom_aliases(command_line);
        debug!("Executing '{}' for {:?}", command_line, sender);
        let parse_result = parser::parse(self.get_root(), &command_line);

        match parse_result {
            ParseResult::Success {
                node,
                arguments,
                path,
            } => {
                let mut ctx =
                    ExecutionContext::new(self, host, sender, ArgumentSet::new(arguments));
                match Self::execute_impl(&mut ctx, node, &path) {
                    Ok(()) => CommandStatus::Success,
                    Err(CommandError::Runtime(err)) => {
                        ctx.error(&err.to_string());
                        CommandStatus::Failure
                    }
                    Err(CommandError::Internal(err)) => {
                        error!("Unexpected error running '{}': {}", command_line, err);
                        ctx.error("An unexpected error occurred.");
                        CommandStatus::Failure
                    }
                }
            }

            ParseResult::Partial { path } => {
                self.handle_parse_error(host, sender, &path, "Not enough arguments")
            }
            ParseResult::TooManyArguments { path, remaining } => {
                let message = format!("Too many arguments: {remaining}");
                self.handle_parse_error(host, sender, &path, &message)
            }
            ParseResult::InvalidArgument { path, remaining } => {
                let message = format!("Invalid argument: {remaining}");
                self.handle_parse_error(host, sender, &path, &message)
            }

            ParseResult::NothingMatched => {
                let mut ctx = ExecutionContext::new(self, host, sender, ArgumentSet::empty());
                ctx.error("Command not found!");
                CommandStatus::Failure
            }
        }
    }

    fn execute_impl(
        ctx: &mut ExecutionContext<'_>,
        node: &CommandNode,
        path: &[&CommandNode],
    ) -> CommandResult<()> {
        let Some(executor) = &node.executor else {
            return Err(InternalError::Message {
                message: "parsed command node has no executor".to_string(),
            }
            .into());
        };

        for node in path {
            if let Some(level) = node.permission {
                ctx.require_permission(level)?;
            }
        }

        executor(ctx)
    }

    fn expand_custom_aliases(&self, command_line: &str) -> String {
        for (alias, expansion) in self.get_custom_aliases() {
            let Some(rest) = command_line.strip_prefix(alias.as_str()) else {
                continue;
            };
            // Only whole words expand, so `kit` doesn't rewrite `kits`
            if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
                continue;
            }
            if expansion.contains("{}") {
                return expansion.replace("{}", rest.trim_start());
            } else {
                return format!("{}{}", expansion, rest);
            }
        }

        command_line.to_string()
    }

    fn handle_parse_error(
        &self,
        host: &mut dyn Host,
        sender: CommandSender,
        path: &[&CommandNode],
        error_message: &str,
    ) -> CommandStatus {
        let mut ctx = ExecutionContext::new(self, host, sender, ArgumentSet::empty());

        ctx.error(error_message);

        let usage = usage::generate_usage(path);
        ctx.reply_legacy(&format!("&6Usage: &e{}", usage));
        let base_name = usage::generate_base_name(path);
        ctx.reply_legacy(&format!(
            "&eRun &e/help {}&e for more information.",
            base_name.trim_start_matches('/')
        ));

        CommandStatus::Failure
    }
}
