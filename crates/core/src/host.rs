//! The surface of the game server that item set commands rely on.

use crate::commands::CommandSender;
use crate::item_set::ItemStack;
use crate::permissions::PermissionLevel;
use crate::store::UsageStore;
use itemsets_text::TextComponent;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("No player was found")]
    PlayerNotFound,
    #[error("Unknown item '{0}'")]
    UnknownItem(String),
    #[error("{0}")]
    Other(String),
}

pub trait Host {
    /// Looks up an online player by name.
    fn find_player(&self, name: &str) -> Result<u128, HostError>;

    fn player_name(&self, uuid: u128) -> Result<String, HostError>;

    fn online_players(&self) -> Vec<String>;

    fn permission_level(&self, uuid: u128) -> PermissionLevel;

    fn give_item(&mut self, uuid: u128, item: &ItemStack) -> Result<(), HostError>;

    fn send_message(&mut self, recipient: CommandSender, message: TextComponent);

    /// Sends a message to every online player and the console.
    fn broadcast(&mut self, message: TextComponent);

    /// Per-player data that outlives the player's session.
    fn usage_store(&mut self) -> &mut dyn UsageStore;
}
