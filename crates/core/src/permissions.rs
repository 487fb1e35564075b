use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Represents a command source's permission level.
///
/// - `Normal` (0): basic commands.
/// - `Moderator` (1): may bypass spawn protection.
/// - `Gamemaster` (2): operator commands. This is the level item set commands
///   treat as elevated.
/// - `Admin` (3): multiplayer management.
/// - `Owner` (4): everything, including server management. The console always
///   holds this level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PermissionLevel {
    #[default]
    Normal = 0,
    Moderator = 1,
    Gamemaster = 2,
    Admin = 3,
    Owner = 4,
}

impl PermissionLevel {
    pub fn from_level(level: u8) -> Option<PermissionLevel> {
        Some(match level {
            0 => PermissionLevel::Normal,
            1 => PermissionLevel::Moderator,
            2 => PermissionLevel::Gamemaster,
            3 => PermissionLevel::Admin,
            4 => PermissionLevel::Owner,
            _ => return None,
        })
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

impl Serialize for PermissionLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for PermissionLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        PermissionLevel::from_level(value).ok_or_else(|| {
            serde::de::Error::custom(format!("Invalid value for permission level: {}", value))
        })
    }
}
