#![allow(dead_code)]

use itemsets_core::commands::{
    register_commands, register_item_sets, CommandRegistry, CommandSender, CommandStatus,
};
use itemsets_core::host::{Host, HostError};
use itemsets_core::item_set::{
    collect_definitions, default_item_sets, ItemSetDefinition, ItemStack,
};
use itemsets_core::permissions::PermissionLevel;
use itemsets_core::store::{MemoryUsageStore, UsageStore};
use itemsets_core::utils::offline_uuid;
use itemsets_text::TextComponent;

pub struct TestPlayer {
    pub uuid: u128,
    pub username: String,
    pub permission_level: PermissionLevel,
    pub given: Vec<ItemStack>,
    pub messages: Vec<String>,
}

/// A host that records everything sent to it.
#[derive(Default)]
pub struct TestHost {
    pub players: Vec<TestPlayer>,
    pub console: Vec<String>,
    pub broadcasts: Vec<String>,
    pub store: MemoryUsageStore,
    /// Items with this id are refused by `give_item`.
    pub refused_item: Option<String>,
}

impl TestHost {
    pub fn new() -> TestHost {
        Default::default()
    }

    pub fn join(&mut self, username: &str, permission_level: PermissionLevel) -> u128 {
        let uuid = offline_uuid(username);
        self.players.push(TestPlayer {
            uuid,
            username: username.to_string(),
            permission_level,
            given: Vec::new(),
            messages: Vec::new(),
        });
        uuid
    }

    pub fn player(&self, uuid: u128) -> &TestPlayer {
        self.players
            .iter()
            .find(|player| player.uuid == uuid)
            .expect("player is not online")
    }

    pub fn count_of(&self, uuid: u128, id: &str) -> u32 {
        self.player(uuid)
            .given
            .iter()
            .filter(|stack| stack.id == id)
            .map(|stack| stack.count)
            .sum()
    }

    pub fn last_message(&self, uuid: u128) -> Option<&str> {
        self.player(uuid).messages.last().map(String::as_str)
    }

    pub fn messages(&self, uuid: u128) -> &[String] {
        &self.player(uuid).messages
    }

    pub fn clear_messages(&mut self) {
        self.console.clear();
        self.broadcasts.clear();
        for player in &mut self.players {
            player.messages.clear();
        }
    }
}

impl Host for TestHost {
    fn find_player(&self, name: &str) -> Result<u128, HostError> {
        self.players
            .iter()
            .find(|player| player.username.eq_ignore_ascii_case(name))
            .map(|player| player.uuid)
            .ok_or(HostError::PlayerNotFound)
    }

    fn player_name(&self, uuid: u128) -> Result<String, HostError> {
        self.players
            .iter()
            .find(|player| player.uuid == uuid)
            .map(|player| player.username.clone())
            .ok_or(HostError::PlayerNotFound)
    }

    fn online_players(&self) -> Vec<String> {
        self.players
            .iter()
            .map(|player| player.username.clone())
            .collect()
    }

    fn permission_level(&self, uuid: u128) -> PermissionLevel {
        self.players
            .iter()
            .find(|player| player.uuid == uuid)
            .map(|player| player.permission_level)
            .unwrap_or_default()
    }

    fn give_item(&mut self, uuid: u128, item: &ItemStack) -> Result<(), HostError> {
        if self.refused_item.as_deref() == Some(item.id.as_str()) {
            return Err(HostError::UnknownItem(item.id.clone()));
        }
        let player = self
            .players
            .iter_mut()
            .find(|player| player.uuid == uuid)
            .ok_or(HostError::PlayerNotFound)?;
        player.given.push(item.clone());
        Ok(())
    }

    fn send_message(&mut self, recipient: CommandSender, message: TextComponent) {
        let text = message.to_plain_text();
        match recipient {
            CommandSender::Console => self.console.push(text),
            CommandSender::Player(uuid) => {
                if let Some(player) = self.players.iter_mut().find(|player| player.uuid == uuid) {
                    player.messages.push(text);
                }
            }
        }
    }

    fn broadcast(&mut self, message: TextComponent) {
        self.broadcasts.push(message.to_plain_text());
    }

    fn usage_store(&mut self) -> &mut dyn UsageStore {
        &mut self.store
    }
}

/// A registry with the builtin commands and the given item sets.
pub fn registry_with(item_sets: &[ItemSetDefinition]) -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    register_commands(&mut registry);
    register_item_sets(&mut registry, item_sets);
    registry
}

pub struct TestServer {
    pub registry: CommandRegistry,
    pub host: TestHost,
}

impl TestServer {
    /// A server with the item sets a fresh config starts with.
    pub fn new() -> TestServer {
        TestServer::with_item_sets(&collect_definitions(&default_item_sets()))
    }

    pub fn with_item_sets(item_sets: &[ItemSetDefinition]) -> TestServer {
        TestServer {
            registry: registry_with(item_sets),
            host: TestHost::new(),
        }
    }

    pub fn run(&mut self, sender: u128, command: &str) -> CommandStatus {
        self.registry
            .execute(&mut self.host, CommandSender::Player(sender), command)
    }

    pub fn run_console(&mut self, command: &str) -> CommandStatus {
        self.registry
            .execute(&mut self.host, CommandSender::Console, command)
    }
}
