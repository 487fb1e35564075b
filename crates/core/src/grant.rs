use crate::host::{Host, HostError};
use crate::item_set::{ItemSetDefinition, ItemStack};
use itemsets_text::TextComponent;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum GrantError {
    #[error("could not give {item}: {source}")]
    Item {
        item: ItemStack,
        #[source]
        source: HostError,
    },
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Gives every item of `item_set` to the player and announces it. Stops at
/// the first item the host refuses; items already given are kept.
pub fn give_items(
    host: &mut dyn Host,
    uuid: u128,
    item_set: &ItemSetDefinition,
) -> Result<(), GrantError> {
    let username = host.player_name(uuid)?;

    for stack in item_set.items.iter().filter_map(|entry| entry.to_stack()) {
        if let Err(source) = host.give_item(uuid, &stack) {
            error!(
                "Error giving items from '{}' to {}: {}",
                item_set.command, username, source
            );
            return Err(GrantError::Item {
                item: stack,
                source,
            });
        }
    }

    info!("Gave items from '{}' to {}", item_set.command, username);
    host.broadcast(TextComponent::from(format!(
        "Items from '{}' given to {}",
        item_set.command, username
    )));
    Ok(())
}
