mod argument;
mod argument_parser;
mod argument_set;
mod builtin;
mod context;
mod error;
mod executor;
mod node;
mod parser;
mod registry;
mod usage;
mod value;

pub use argument::ArgumentType;
pub use argument_set::ArgumentSet;
pub use builtin::{
    register_commands, register_item_sets, register_server_commands, ELEVATED_PERMISSION,
};
pub use context::ExecutionContext;
pub use error::{CommandError, CommandResult, InternalError, RuntimeError};
pub use executor::CommandStatus;
pub use node::CommandNode;
pub use registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSender {
    Player(u128),
    Console,
}
