use crate::host::HostError;
use crate::permissions::PermissionLevel;
use crate::store::StoreError;
use thiserror::Error;

/// Errors caused by the sender. Their message is shown to the sender.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Permission denied: requires permission level {level}")]
    PermissionDenied { level: PermissionLevel },
    #[error("This command can only be executed by players")]
    PlayerOnly,
    #[error("Player not found!")]
    PlayerNotFound,
    #[error("You've already received items from '{command}'.")]
    AlreadyReceived { command: String },
    #[error("The player has already received items from '{command}'.")]
    TargetAlreadyReceived { command: String },
    #[error("Error giving items from '{command}': {message}")]
    GrantFailed { command: String, message: String },
    #[error("{0}")]
    Message(String),
}

/// Errors the sender can't do anything about. They are logged, and the
/// sender only gets a generic notice.
#[derive(Debug, Error)]
pub enum InternalError {
    #[error(
        "Internal error: Argument '{name}' not found in ArgumentSet (command registration bug)"
    )]
    MissingArgument { name: String },
    #[error("Internal error: Argument '{name}' has wrong type, expected {expected} (command registration bug)")]
    WrongArgumentType { name: String, expected: String },
    #[error("Internal error: usage store failure: {0}")]
    Store(#[from] StoreError),
    #[error("Internal error: host failure: {0}")]
    Host(HostError),
    #[error("Internal error (bug): {message}")]
    Message { message: String },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl CommandError {
    pub fn runtime(message: impl Into<String>) -> Self {
        CommandError::Runtime(RuntimeError::Message(message.into()))
    }
}

impl From<HostError> for CommandError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::PlayerNotFound => RuntimeError::PlayerNotFound.into(),
            err => InternalError::Host(err).into(),
        }
    }
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        InternalError::Store(err).into()
    }
}

pub type CommandResult<T> = Result<T, CommandError>;
