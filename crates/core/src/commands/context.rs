use super::{argument_set::ArgumentSet, CommandSender};
use crate::commands::error::{CommandResult, RuntimeError};
use crate::commands::executor::CommandStatus;
use crate::commands::registry::CommandRegistry;
use crate::gate::UsageGate;
use crate::host::Host;
use crate::permissions::PermissionLevel;
use itemsets_text::{ColorCode, TextComponent, TextComponentBuilder};

pub struct ExecutionContext<'a> {
    registry: &'a CommandRegistry,
    host: &'a mut dyn Host,
    sender: CommandSender,
    arguments: ArgumentSet,
}

impl<'a> ExecutionContext<'a> {
    pub(super) fn new(
        registry: &'a CommandRegistry,
        host: &'a mut dyn Host,
        sender: CommandSender,
        arguments: ArgumentSet,
    ) -> Self {
        Self {
            registry,
            host,
            sender,
            arguments,
        }
    }

    pub fn args(&self) -> &ArgumentSet {
        &self.arguments
    }

    pub fn sender(&self) -> CommandSender {
        self.sender
    }

    pub fn registry(&self) -> &'a CommandRegistry {
        self.registry
    }

    pub fn host(&mut self) -> &mut dyn Host {
        &mut *self.host
    }

    pub fn gate(&mut self) -> UsageGate<'_> {
        UsageGate::new(self.host.usage_store())
    }

    /// Sends the sender a yellow system message
    pub fn reply(&mut self, message: &str) {
        self.reply_component(
            TextComponentBuilder::new(message)
                .color_code(ColorCode::Yellow)
                .finish(),
        );
    }

    pub fn reply_legacy(&mut self, message: &str) {
        self.reply_component(TextComponent::from_legacy_text(message));
    }

    pub fn reply_component(&mut self, message: TextComponent) {
        self.host.send_message(self.sender, message);
    }

    pub fn error(&mut self, message: &str) {
        self.reply_component(TextComponent::failure(message));
    }

    /// The console holds every permission level.
    pub fn has_permission(&self, level: PermissionLevel) -> bool {
        match self.sender {
            CommandSender::Player(uuid) => self.host.permission_level(uuid) >= level,
            CommandSender::Console => true,
        }
    }

    pub fn require_permission(&self, level: PermissionLevel) -> CommandResult<()> {
        if !self.has_permission(level) {
            return Err(RuntimeError::PermissionDenied { level }.into());
        }
        Ok(())
    }

    pub fn player(&self) -> CommandResult<u128> {
        match self.sender {
            CommandSender::Player(uuid) => Ok(uuid),
            CommandSender::Console => Err(RuntimeError::PlayerOnly.into()),
        }
    }

    /// A name for the sender suitable for log lines.
    pub fn sender_name(&self) -> String {
        match self.sender {
            CommandSender::Player(uuid) => self
                .host
                .player_name(uuid)
                .unwrap_or_else(|_| format!("{:032x}", uuid)),
            CommandSender::Console => "Console".to_string(),
        }
    }

    /// Runs another command line on behalf of `sender`.
    pub fn execute_as(&mut self, sender: CommandSender, command_line: &str) -> CommandStatus {
        self.registry.execute(&mut *self.host, sender, command_line)
    }
}
