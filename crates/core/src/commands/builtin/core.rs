use crate::commands::error::{CommandResult, InternalError};
use crate::commands::{
    argument::ArgumentType, context::ExecutionContext, node::CommandNode, registry::CommandRegistry,
};
use crate::permissions::PermissionLevel;
use crate::server::Message;
use std::sync::mpsc::Sender;
use tracing::debug;

fn queue(actions: &Sender<Message>, message: Message) -> CommandResult<()> {
    actions.send(message).map_err(|_| {
        InternalError::Message {
            message: "server action channel is closed".to_string(),
        }
        .into()
    })
}

fn player_action(
    literal: &str,
    actions: &Sender<Message>,
    make_message: impl Fn(String) -> Message + 'static,
) -> CommandNode {
    let actions = actions.clone();
    CommandNode::literal(literal)
        .require_permission(PermissionLevel::Owner)
        .then(
            CommandNode::argument("player", ArgumentType::player()).executes(move |ctx| {
                let username = ctx.args().get_player("player")?;
                queue(&actions, make_message(username))
            }),
        )
}

/// Commands that manage the server itself. They are only meant for the
/// console, so they require the owner level.
pub(super) fn register_commands(registry: &mut CommandRegistry, actions: Sender<Message>) {
    registry.register(player_action("join", &actions, Message::PlayerJoin));
    registry.register(player_action("leave", &actions, Message::PlayerLeave));

    registry.register(player_action("op", &actions, |username| {
        Message::SetOperator(username, true)
    }));
    registry.register(player_action("deop", &actions, |username| {
        Message::SetOperator(username, false)
    }));

    registry.register(
        CommandNode::literal("list").executes(|ctx: &mut ExecutionContext<'_>| {
            let sender = ctx.sender_name();
            debug!("{} listed online players", sender);
            let mut names = ctx.host().online_players();
            names.sort_by_key(|name| name.to_lowercase());
            ctx.reply(&format!(
                "There are {} players online: {}",
                names.len(),
                names.join(", ")
            ));
            Ok(())
        }),
    );

    registry.register(
        CommandNode::literal("stop")
            .require_permission(PermissionLevel::Owner)
            .executes(move |_| queue(&actions, Message::Shutdown)),
    );
}
