#![deny(rust_2018_idioms)]

pub mod commands;
pub mod config;
pub mod gate;
pub mod grant;
pub mod host;
pub mod item_set;
pub mod permissions;
pub mod player;
pub mod server;
pub mod store;
pub mod utils;
