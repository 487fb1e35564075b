use crate::item_set::{default_item_sets, ItemSetConfig};
use crate::permissions::PermissionLevel;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use toml_edit::{value, Array, ArrayOfTables, DocumentMut, InlineTable, Item, Table};
use tracing::info;

trait ConfigSerializeDefault {
    fn fix_config(self, name: &str, doc: &mut DocumentMut);
}

macro_rules! impl_simple_default {
    ( $( $type:ty ),* ) => {
        $(
            impl ConfigSerializeDefault for $type {
                fn fix_config(self, name: &str, doc: &mut DocumentMut) {
                    doc.entry(name).or_insert_with(|| value(self));
                }
            }
        )*
    }
}

impl_simple_default!(String);

impl ConfigSerializeDefault for PermissionLevel {
    fn fix_config(self, name: &str, doc: &mut DocumentMut) {
        doc.entry(name).or_insert_with(|| value(self as u8 as i64));
    }
}

impl ConfigSerializeDefault for Vec<String> {
    fn fix_config(self, name: &str, doc: &mut DocumentMut) {
        doc.entry(name)
            .or_insert_with(|| value(self.into_iter().collect::<Array>()));
    }
}

impl ConfigSerializeDefault for IndexMap<String, String> {
    fn fix_config(self, name: &str, doc: &mut DocumentMut) {
        doc.entry(name).or_insert_with(|| {
            let mut table = Table::new();
            for (key, replacement) in self {
                table[key.as_str()] = value(replacement);
            }
            Item::Table(table)
        });
    }
}

impl ConfigSerializeDefault for Vec<ItemSetConfig> {
    fn fix_config(self, name: &str, doc: &mut DocumentMut) {
        doc.entry(name).or_insert_with(|| {
            let mut sets = ArrayOfTables::new();
            for item_set in self.into_iter().filter_map(ItemSetConfig::into_definition) {
                let mut table = Table::new();
                table["command"] = value(item_set.command);
                table["one_use"] = value(item_set.one_use);
                let mut items = Array::new();
                for item in item_set.items {
                    let mut entry = InlineTable::new();
                    entry.insert("id", item.id.into());
                    entry.insert("count", i64::from(item.count).into());
                    items.push(entry);
                }
                table["items"] = value(items);
                sets.push(table);
            }
            Item::ArrayOfTables(sets)
        });
    }
}

macro_rules! gen_config {
    (
        $( $(#[$doc:meta])* $name:ident: $type:ty = $default:expr ),* $(,)?
    ) => {
        #[derive(Debug, Deserialize)]
        pub struct ServerConfig {
            $(
                $(#[$doc])*
                pub $name: $type,
            )*
        }

        impl Default for ServerConfig {
            fn default() -> Self {
                ServerConfig {
                    $( $name: $default, )*
                }
            }
        }

        impl ServerConfig {
            /// Reads the config at `config_file`, adding any missing keys with
            /// their default value and writing the result back to disk.
            pub fn load(config_file: impl AsRef<Path>) -> Result<ServerConfig> {
                let config_file = config_file.as_ref();
                let str = if config_file.exists() {
                    fs::read_to_string(config_file)
                        .with_context(|| format!("failed to read {}", config_file.display()))?
                } else {
                    String::new()
                };
                let mut doc = str
                    .parse::<DocumentMut>()
                    .with_context(|| format!("{} is not valid toml", config_file.display()))?;

                $(
                    <$type as ConfigSerializeDefault>::fix_config($default, stringify!($name), &mut doc);
                )*

                let patched = doc.to_string();
                if str != patched {
                    info!("Writing missing defaults to {}", config_file.display());
                    fs::write(config_file, &patched)
                        .with_context(|| format!("failed to write {}", config_file.display()))?;
                }

                toml::from_str(&patched)
                    .with_context(|| format!("failed to parse {}", config_file.display()))
            }
        }
    };
}

gen_config! {
    /// Directory holding one usage data file per player.
    data_dir: String = "./world/itemsets".to_string(),
    /// Players that get `op_permission_level` when they join.
    ops: Vec<String> = Vec::new(),
    op_permission_level: PermissionLevel = PermissionLevel::Gamemaster,
    /// Command prefixes rewritten before parsing, e.g. `kit = "giveItemSet1"`.
    command_aliases: IndexMap<String, String> = IndexMap::new(),
    item_sets: Vec<ItemSetConfig> = default_item_sets(),
}

impl ServerConfig {
    pub fn is_op(&self, username: &str) -> bool {
        self.ops.iter().any(|op| op.eq_ignore_ascii_case(username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item_set::collect_definitions;

    #[test]
    fn fresh_config_gets_default_item_sets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Config.toml");

        let config = ServerConfig::load(&path).unwrap();
        let definitions = collect_definitions(&config.item_sets);
        assert_eq!(definitions.len(), 2);
        assert_eq!(definitions[0].command, "giveItemSet1");
        assert!(!definitions[0].one_use);
        assert_eq!(definitions[1].command, "giveItemSet2");
        assert!(definitions[1].one_use);
        assert_eq!(definitions[1].items[0].count, 32);
        assert_eq!(config.op_permission_level, PermissionLevel::Gamemaster);

        // The defaults were written out and load back the same way
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("[[item_sets]]"));
        let reloaded = ServerConfig::load(&path).unwrap();
        assert_eq!(collect_definitions(&reloaded.item_sets), definitions);
    }

    #[test]
    fn existing_values_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Config.toml");
        fs::write(
            &path,
            r#"
ops = ["Alice"]

[command_aliases]
kit = "giveItemSet1"

[[item_sets]]
command = "starter"
items = [{ id = "minecraft:bread", count = 3 }]
"#,
        )
        .unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert!(config.is_op("alice"));
        assert!(!config.is_op("Bob"));
        assert_eq!(config.command_aliases["kit"], "giveItemSet1");
        let definitions = collect_definitions(&config.item_sets);
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].command, "starter");
        assert_eq!(config.data_dir, "./world/itemsets");
    }

    #[test]
    fn rejects_unknown_permission_levels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Config.toml");
        fs::write(&path, "op_permission_level = 7\n").unwrap();
        assert!(ServerConfig::load(&path).is_err());
    }
}
