use crate::item_set::ItemStack;
use crate::permissions::PermissionLevel;
use crate::utils::offline_uuid;
use itemsets_text::TextComponent;
use std::collections::VecDeque;
use tracing::info;

/// How many received chat lines a player keeps.
const CHAT_HISTORY_LEN: usize = 100;

/// An online player as the console server tracks it.
#[derive(Debug, Clone)]
pub struct Player {
    pub uuid: u128,
    pub username: String,
    pub permission_level: PermissionLevel,
    pub inventory: Vec<ItemStack>,
    /// The most recent chat lines sent to this player, oldest first.
    pub chat: VecDeque<String>,
}

impl Player {
    pub fn new(username: impl Into<String>, permission_level: PermissionLevel) -> Player {
        let username = username.into();
        Player {
            uuid: offline_uuid(&username),
            username,
            permission_level,
            inventory: Vec::new(),
            chat: VecDeque::new(),
        }
    }

    /// Adds the stack to the inventory, merging it with a stack of the same
    /// item if there is one.
    pub fn give(&mut self, stack: ItemStack) {
        match self.inventory.iter_mut().find(|slot| slot.id == stack.id) {
            Some(slot) => slot.count = slot.count.saturating_add(stack.count),
            None => self.inventory.push(stack),
        }
    }

    pub fn count_of(&self, id: &str) -> u32 {
        self.inventory
            .iter()
            .filter(|slot| slot.id == id)
            .map(|slot| slot.count)
            .sum()
    }

    pub fn send_chat_message(&mut self, message: &TextComponent) {
        let text = message.to_plain_text();
        info!("[-> {}] {}", self.username, text);
        if self.chat.len() == CHAT_HISTORY_LEN {
            self.chat.pop_front();
        }
        self.chat.push_back(text);
    }
}
