use crate::commands::{
    argument::ArgumentType,
    context::ExecutionContext,
    error::{CommandResult, RuntimeError},
    node::CommandNode,
    CommandRegistry,
};
use crate::grant::give_items;
use crate::item_set::ItemSetDefinition;
use crate::permissions::PermissionLevel;
use itemsets_text::TextComponent;
use std::sync::Arc;
use tracing::{info, warn};

/// Holders of this level bypass usage limits and may target other players.
pub const ELEVATED_PERMISSION: PermissionLevel = PermissionLevel::Gamemaster;

/// Registers `/<command>`, `/<command> <player>` and
/// `/<command> <player> clear` for every item set.
pub fn register_item_sets(registry: &mut CommandRegistry, item_sets: &[ItemSetDefinition]) {
    for item_set in item_sets {
        if registry.contains(&item_set.command) {
            warn!(
                "Not registering item set '{}': a command with that name already exists",
                item_set.command
            );
            continue;
        }
        registry.register(item_set_command(Arc::new(item_set.clone())));
    }
}

fn item_set_command(item_set: Arc<ItemSetDefinition>) -> CommandNode {
    let self_set = Arc::clone(&item_set);
    let target_set = Arc::clone(&item_set);
    let clear_set = Arc::clone(&item_set);

    CommandNode::literal(item_set.command.as_str())
        .executes(move |ctx| exec_self(ctx, &self_set))
        .then(
            CommandNode::argument("player", ArgumentType::player())
                .require_permission(ELEVATED_PERMISSION)
                .executes(move |ctx| exec_targeted(ctx, &target_set))
                .then(CommandNode::literal("clear").executes(move |ctx| exec_clear(ctx, &clear_set))),
        )
}

fn grant(ctx: &mut ExecutionContext<'_>, uuid: u128, item_set: &ItemSetDefinition) -> CommandResult<()> {
    give_items(ctx.host(), uuid, item_set).map_err(|err| RuntimeError::GrantFailed {
        command: item_set.command.clone(),
        message: err.to_string(),
    })?;
    Ok(())
}

/// `/<command>`: operators are never limited and never marked.
fn exec_self(ctx: &mut ExecutionContext<'_>, item_set: &ItemSetDefinition) -> CommandResult<()> {
    let uuid = ctx.player()?;
    let elevated = ctx.has_permission(ELEVATED_PERMISSION);

    if !elevated && !ctx.gate().can_run(uuid, &item_set.command, item_set.one_use)? {
        return Err(RuntimeError::AlreadyReceived {
            command: item_set.command.clone(),
        }
        .into());
    }

    grant(ctx, uuid, item_set)?;
    if item_set.one_use && !elevated {
        ctx.gate().mark_run(uuid, &item_set.command)?;
    }
    Ok(())
}

/// `/<command> <player>`: the target's usage is checked and marked no matter
/// who they are.
fn exec_targeted(ctx: &mut ExecutionContext<'_>, item_set: &ItemSetDefinition) -> CommandResult<()> {
    let name = ctx.args().get_player("player")?;
    let target = ctx.host().find_player(&name)?;

    if !ctx.gate().can_run(target, &item_set.command, item_set.one_use)? {
        return Err(RuntimeError::TargetAlreadyReceived {
            command: item_set.command.clone(),
        }
        .into());
    }

    grant(ctx, target, item_set)?;
    if item_set.one_use {
        ctx.gate().mark_run(target, &item_set.command)?;
    }
    Ok(())
}

/// `/<command> <player> clear`
fn exec_clear(ctx: &mut ExecutionContext<'_>, item_set: &ItemSetDefinition) -> CommandResult<()> {
    let name = ctx.args().get_player("player")?;
    let target = ctx.host().find_player(&name)?;
    let target_name = ctx.host().player_name(target)?;

    ctx.gate().clear_run(target, &item_set.command)?;
    info!(
        "{} cleared '{}' for {}",
        ctx.sender_name(),
        item_set.command,
        target_name
    );

    ctx.reply_component(TextComponent::success(format!(
        "Command '{}' cleared for {}.",
        item_set.command, target_name
    )));
    ctx.host().broadcast(TextComponent::from(format!(
        "Command '{}' has been cleared by an operator.",
        item_set.command
    )));
    Ok(())
}
