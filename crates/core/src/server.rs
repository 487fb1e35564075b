use crate::commands::{
    register_commands, register_item_sets, register_server_commands, CommandRegistry,
    CommandSender,
};
use crate::config::ServerConfig;
use crate::host::{Host, HostError};
use crate::item_set::{collect_definitions, ItemStack};
use crate::permissions::PermissionLevel;
use crate::player::Player;
use crate::store::{FileUsageStore, UsageStore};
use crate::utils::HyphenatedUUID;
use anyhow::{Context, Result};
use backtrace::Backtrace;
use itemsets_text::TextComponent;
use rustc_hash::FxHashMap;
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// `Message` gets sent to the server thread, either from the console reader
/// or from a command that needs the server to act once it has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A line typed into the console.
    ConsoleCommand(String),
    /// Sent when a player joins the server through the `join` command.
    PlayerJoin(String),
    /// Sent when a player leaves the server through the `leave` command.
    PlayerLeave(String),
    /// Sent by `op` and `deop`.
    SetOperator(String, bool),
    /// Sent by `stop`, the ctrl+c handler, or when the console closes.
    Shutdown,
}

/// Item identifiers are `namespace:path`, with the namespace defaulting to
/// `minecraft`.
fn normalize_item_id(id: &str) -> Option<String> {
    let (namespace, path) = id.split_once(':').unwrap_or(("minecraft", id));
    let valid_namespace = !namespace.is_empty()
        && namespace
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.'));
    let valid_path = !path.is_empty()
        && path
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/'));
    (valid_namespace && valid_path).then(|| format!("{}:{}", namespace, path))
}

/// A host whose players exist only in memory and whose output goes to the
/// terminal.
pub struct ConsoleHost {
    players: FxHashMap<u128, Player>,
    store: FileUsageStore,
}

impl ConsoleHost {
    pub fn new(store: FileUsageStore) -> ConsoleHost {
        ConsoleHost {
            players: FxHashMap::default(),
            store,
        }
    }

    pub fn player(&self, uuid: u128) -> Option<&Player> {
        self.players.get(&uuid)
    }

    /// Returns `false` if a player with the same name is already online.
    pub fn add_player(&mut self, player: Player) -> bool {
        if self.find_player(&player.username).is_ok() {
            return false;
        }
        self.players.insert(player.uuid, player);
        true
    }

    pub fn remove_player(&mut self, username: &str) -> Option<Player> {
        let uuid = self.find_player(username).ok()?;
        self.store.unload(uuid);
        self.players.remove(&uuid)
    }

    pub fn set_permission_level(
        &mut self,
        username: &str,
        level: PermissionLevel,
    ) -> Result<String, HostError> {
        let uuid = self.find_player(username)?;
        let player = self
            .players
            .get_mut(&uuid)
            .ok_or(HostError::PlayerNotFound)?;
        player.permission_level = level;
        Ok(player.username.clone())
    }

    fn remove_all(&mut self) -> Vec<Player> {
        let players: Vec<Player> = self.players.drain().map(|(_, player)| player).collect();
        for player in &players {
            self.store.unload(player.uuid);
        }
        players
    }
}

impl Host for ConsoleHost {
    fn find_player(&self, name: &str) -> Result<u128, HostError> {
        self.players
            .values()
            .find(|player| player.username.eq_ignore_ascii_case(name))
            .map(|player| player.uuid)
            .ok_or(HostError::PlayerNotFound)
    }

    fn player_name(&self, uuid: u128) -> Result<String, HostError> {
        self.players
            .get(&uuid)
            .map(|player| player.username.clone())
            .ok_or(HostError::PlayerNotFound)
    }

    fn online_players(&self) -> Vec<String> {
        self.players
            .values()
            .map(|player| player.username.clone())
            .collect()
    }

    fn permission_level(&self, uuid: u128) -> PermissionLevel {
        self.players
            .get(&uuid)
            .map(|player| player.permission_level)
            .unwrap_or_default()
    }

    fn give_item(&mut self, uuid: u128, item: &ItemStack) -> Result<(), HostError> {
        let id = normalize_item_id(&item.id).ok_or_else(|| HostError::UnknownItem(item.id.clone()))?;
        let player = self
            .players
            .get_mut(&uuid)
            .ok_or(HostError::PlayerNotFound)?;
        player.give(ItemStack {
            id,
            count: item.count,
        });
        Ok(())
    }

    fn send_message(&mut self, recipient: CommandSender, message: TextComponent) {
        match recipient {
            CommandSender::Console => println!("{}", message.to_ansi_string()),
            CommandSender::Player(uuid) => match self.players.get_mut(&uuid) {
                Some(player) => player.send_chat_message(&message),
                None => debug!(
                    "Dropping message for offline player {}: {}",
                    HyphenatedUUID(uuid),
                    message.to_plain_text()
                ),
            },
        }
    }

    fn broadcast(&mut self, message: TextComponent) {
        for player in self.players.values_mut() {
            player.send_chat_message(&message);
        }
        println!("{}", message.to_ansi_string());
    }

    fn usage_store(&mut self) -> &mut dyn UsageStore {
        &mut self.store
    }
}

fn build_registry(config: &ServerConfig, actions: Sender<Message>) -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    register_commands(&mut registry);
    register_server_commands(&mut registry, actions);
    register_item_sets(&mut registry, &collect_definitions(&config.item_sets));
    for (alias, replacement) in &config.command_aliases {
        registry.add_custom_alias(alias.trim(), replacement.trim());
    }
    registry
}

/// Runs item set commands typed into the console.
pub struct ItemSetServer {
    config: ServerConfig,
    registry: CommandRegistry,
    host: ConsoleHost,
    actions: Receiver<Message>,
    running: bool,
}

impl ItemSetServer {
    pub fn new(config: ServerConfig) -> Result<ItemSetServer> {
        let store = FileUsageStore::open(&config.data_dir)
            .with_context(|| format!("failed to open usage data directory {}", config.data_dir))?;
        let (action_sender, actions) = mpsc::channel();
        let registry = build_registry(&config, action_sender);

        Ok(ItemSetServer {
            config,
            registry,
            host: ConsoleHost::new(store),
            actions,
            running: true,
        })
    }

    pub fn host(&self) -> &ConsoleHost {
        &self.host
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(config: ServerConfig) -> Result<()> {
        std::panic::set_hook(Box::new(|panic_info| {
            let backtrace = Backtrace::new();
            error!("{}\n{:?}", panic_info, backtrace);
        }));

        info!("Starting server...");
        let start_time = Instant::now();

        let (sender, receiver) = mpsc::channel();

        let ctrl_handler_sender = sender.clone();
        ctrlc::set_handler(move || {
            let _ = ctrl_handler_sender.send(Message::Shutdown);
        })
        .context("There was an error setting the ctrlc handler")?;

        thread::Builder::new()
            .name("Console".to_string())
            .spawn(move || read_console(sender))
            .context("failed to spawn the console thread")?;

        let mut server = ItemSetServer::new(config)?;

        info!("Done! Start took {:?}", start_time.elapsed());
        info!("Type \"help\" for a list of commands");

        while server.running {
            match receiver.recv() {
                Ok(message) => server.handle_message(message),
                Err(_) => break,
            }
        }

        server.graceful_shutdown();
        Ok(())
    }

    /// Handles one message, then any work the message queued.
    pub fn handle_message(&mut self, message: Message) {
        self.handle_single(message);
        while let Ok(action) = self.actions.try_recv() {
            self.handle_single(action);
        }
    }

    fn handle_single(&mut self, message: Message) {
        match message {
            Message::ConsoleCommand(line) => self.handle_console_command(&line),
            Message::PlayerJoin(username) => self.handle_player_join(username),
            Message::PlayerLeave(username) => self.handle_player_leave(&username),
            Message::SetOperator(username, op) => self.handle_set_operator(&username, op),
            Message::Shutdown => self.running = false,
        }
    }

    fn handle_console_command(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        let status = self
            .registry
            .execute(&mut self.host, CommandSender::Console, line);
        debug!("Console ran '{}' with result {}", line.trim(), status.code());
    }

    fn handle_player_join(&mut self, username: String) {
        let level = if self.config.is_op(&username) {
            self.config.op_permission_level
        } else {
            PermissionLevel::Normal
        };
        let player = Player::new(username, level);
        let uuid = player.uuid;
        let username = player.username.clone();
        if !self.host.add_player(player) {
            self.reply_console(TextComponent::failure(format!("{} is already online", username)));
            return;
        }
        info!(
            "UUID of player {} is {}",
            username,
            HyphenatedUUID(uuid)
        );
        info!("{} joined the game", username);
    }

    fn handle_player_leave(&mut self, username: &str) {
        match self.host.remove_player(username) {
            Some(player) => info!("{} left the game", player.username),
            None => self.reply_console(TextComponent::failure("Player not found!")),
        }
    }

    fn handle_set_operator(&mut self, username: &str, op: bool) {
        let level = if op {
            self.config.op_permission_level
        } else {
            PermissionLevel::Normal
        };
        match self.host.set_permission_level(username, level) {
            Ok(username) if op => info!("Made {} a server operator", username),
            Ok(username) => info!("Made {} no longer a server operator", username),
            Err(err) => {
                warn!("Couldn't change the permission level of {}: {}", username, err);
                self.reply_console(TextComponent::failure("Player not found!"));
            }
        }
    }

    fn reply_console(&mut self, message: TextComponent) {
        self.host.send_message(CommandSender::Console, message);
    }

    fn graceful_shutdown(&mut self) {
        info!("Commencing graceful shutdown...");
        for player in self.host.remove_all() {
            info!("{} left the game", player.username);
        }
    }
}

fn read_console(sender: Sender<Message>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                error!("Failed to read from the console: {}", err);
                break;
            }
        };
        if sender.send(Message::ConsoleCommand(line)).is_err() {
            return;
        }
    }
    let _ = sender.send(Message::Shutdown);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(dir: &std::path::Path) -> ItemSetServer {
        let config = ServerConfig {
            data_dir: dir.to_string_lossy().into_owned(),
            ops: vec!["Alice".to_string()],
            ..Default::default()
        };
        ItemSetServer::new(config).unwrap()
    }

    fn run(server: &mut ItemSetServer, line: &str) {
        server.handle_message(Message::ConsoleCommand(line.to_string()));
    }

    #[test]
    fn item_ids_default_to_minecraft_namespace() {
        assert_eq!(
            normalize_item_id("diamond").as_deref(),
            Some("minecraft:diamond")
        );
        assert_eq!(
            normalize_item_id("mymod:gear/iron").as_deref(),
            Some("mymod:gear/iron")
        );
        assert_eq!(normalize_item_id("Diamond"), None);
        assert_eq!(normalize_item_id("minecraft:"), None);
    }

    #[test]
    fn console_commands_manage_players() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = server(dir.path());

        run(&mut server, "join Alice");
        run(&mut server, "join Bob");
        let alice = server.host().find_player("alice").unwrap();
        let bob = server.host().find_player("Bob").unwrap();
        assert_eq!(
            server.host().permission_level(alice),
            PermissionLevel::Gamemaster
        );
        assert_eq!(server.host().permission_level(bob), PermissionLevel::Normal);

        run(&mut server, "op Bob");
        assert_eq!(
            server.host().permission_level(bob),
            PermissionLevel::Gamemaster
        );
        run(&mut server, "deop Bob");
        assert_eq!(server.host().permission_level(bob), PermissionLevel::Normal);

        run(&mut server, "leave Bob");
        assert!(server.host().find_player("Bob").is_err());

        assert!(server.is_running());
        run(&mut server, "stop");
        assert!(!server.is_running());
    }

    #[test]
    fn one_use_sets_persist_between_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = server(dir.path());

        run(&mut server, "join Bob");
        run(&mut server, "execute as Bob run giveItemSet2");
        let bob = server.host().find_player("Bob").unwrap();
        assert_eq!(
            server.host().player(bob).unwrap().count_of("minecraft:diamond"),
            8
        );

        run(&mut server, "leave Bob");
        run(&mut server, "join Bob");
        run(&mut server, "execute as Bob run giveItemSet2");
        assert_eq!(
            server.host().player(bob).unwrap().count_of("minecraft:diamond"),
            0
        );

        let mut store = FileUsageStore::open(dir.path()).unwrap();
        assert_eq!(store.get(bob, "giveItemSet2").unwrap(), Some(true));
    }

    #[test]
    fn broadcasts_reach_every_online_player() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = server(dir.path());

        run(&mut server, "join Alice");
        run(&mut server, "join Bob");
        run(&mut server, "execute as Alice run giveItemSet2 Bob");
        run(&mut server, "execute as Alice run giveItemSet2 Bob clear");

        let bob = server.host().find_player("Bob").unwrap();
        let alice = server.host().find_player("Alice").unwrap();
        let bob_chat = &server.host().player(bob).unwrap().chat;
        assert!(bob_chat.contains(&"Items from 'giveItemSet2' given to Bob".to_string()));
        assert_eq!(
            bob_chat.back().map(String::as_str),
            Some("Command 'giveItemSet2' has been cleared by an operator.")
        );
        let alice_chat = &server.host().player(alice).unwrap().chat;
        assert!(alice_chat.contains(&"Command 'giveItemSet2' cleared for Bob.".to_string()));
    }

    #[test]
    fn repeated_huge_grants_do_not_stop_the_server() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            data_dir: dir.path().to_string_lossy().into_owned(),
            item_sets: vec![
                crate::item_set::ItemSetDefinition::new(
                    "big",
                    false,
                    vec![crate::item_set::ItemEntry::new("minecraft:dirt", u32::MAX)],
                )
                .into(),
            ],
            ..Default::default()
        };
        let mut server = ItemSetServer::new(config).unwrap();

        run(&mut server, "join Bob");
        run(&mut server, "execute as Bob run big");
        run(&mut server, "execute as Bob run big");

        let bob = server.host().find_player("Bob").unwrap();
        assert_eq!(
            server.host().player(bob).unwrap().count_of("minecraft:dirt"),
            u32::MAX
        );
        assert!(server.is_running());
    }

    #[test]
    fn players_can_not_run_console_commands() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = server(dir.path());

        run(&mut server, "join Bob");
        run(&mut server, "execute as Bob run stop");
        assert!(server.is_running());
    }
}
