use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// A stack of items handed to a player by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    pub id: String,
    pub count: u32,
}

impl fmt::Display for ItemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x {}", self.count, self.id)
    }
}

fn default_count() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_count")]
    pub count: u32,
}

impl ItemEntry {
    pub fn new(id: impl Into<String>, count: u32) -> Self {
        Self {
            id: id.into(),
            count,
        }
    }

    /// Entries without an identifier are placeholders and grant nothing.
    pub fn to_stack(&self) -> Option<ItemStack> {
        let id = self.id.trim();
        if id.is_empty() {
            return None;
        }
        Some(ItemStack {
            id: id.to_string(),
            count: self.count.max(1),
        })
    }
}

/// A named, ordered set of items granted together by one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSetDefinition {
    pub command: String,
    #[serde(default, alias = "oneUse")]
    pub one_use: bool,
    #[serde(default)]
    pub items: Vec<ItemEntry>,
}

impl ItemSetDefinition {
    pub fn new(command: impl Into<String>, one_use: bool, items: Vec<ItemEntry>) -> Self {
        Self {
            command: command.into(),
            one_use,
            items,
        }
    }

    fn is_valid(&self) -> bool {
        !self.command.trim().is_empty()
            && !self.command.contains(char::is_whitespace)
            && !self.items.is_empty()
    }
}

/// One element of an item set written in sequence form. The first element
/// carries the command header, the rest carry items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SequenceEntry {
    pub command: Option<String>,
    #[serde(alias = "oneUse")]
    pub one_use: Option<bool>,
    pub id: Option<String>,
    pub count: Option<u32>,
}

/// An item set as it appears in the config file, either as a table or in
/// sequence form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ItemSetConfig {
    Definition(ItemSetDefinition),
    Sequence(Vec<SequenceEntry>),
}

impl ItemSetConfig {
    /// Returns `None` for sets that can't be registered: no command name, or
    /// no items.
    pub fn into_definition(self) -> Option<ItemSetDefinition> {
        let definition = match self {
            ItemSetConfig::Definition(definition) => definition,
            ItemSetConfig::Sequence(entries) => {
                let mut entries = entries.into_iter();
                let header = entries.next()?;
                ItemSetDefinition {
                    command: header.command?,
                    one_use: header.one_use.unwrap_or(false),
                    items: entries
                        .map(|entry| ItemEntry {
                            id: entry.id.unwrap_or_default(),
                            count: entry.count.unwrap_or(1),
                        })
                        .collect(),
                }
            }
        };
        definition.is_valid().then_some(definition)
    }
}

impl From<ItemSetDefinition> for ItemSetConfig {
    fn from(definition: ItemSetDefinition) -> Self {
        ItemSetConfig::Definition(definition)
    }
}

/// Converts configured sets into definitions, dropping the ones that can't
/// be registered.
pub fn collect_definitions(configs: &[ItemSetConfig]) -> Vec<ItemSetDefinition> {
    configs
        .iter()
        .enumerate()
        .filter_map(|(index, config)| {
            let definition = config.clone().into_definition();
            if definition.is_none() {
                warn!("Ignoring item set #{}: it needs a command and at least one item", index);
            }
            definition
        })
        .collect()
}

/// The item sets written to a fresh config.
pub fn default_item_sets() -> Vec<ItemSetConfig> {
    vec![
        ItemSetDefinition::new(
            "giveItemSet1",
            false,
            vec![
                ItemEntry::new("minecraft:stone_sword", 1),
                ItemEntry::new("minecraft:stone_pickaxe", 1),
                ItemEntry::new("minecraft:stone_axe", 1),
                ItemEntry::new("minecraft:stone_shovel", 1),
            ],
        )
        .into(),
        ItemSetDefinition::new(
            "giveItemSet2",
            true,
            vec![
                ItemEntry::new("minecraft:iron_ingot", 32),
                ItemEntry::new("minecraft:gold_ingot", 16),
                ItemEntry::new("minecraft:diamond", 8),
            ],
        )
        .into(),
    ]
}
