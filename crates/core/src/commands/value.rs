use crate::commands::error::{CommandResult, InternalError};

#[derive(Debug, Clone)]
pub enum Value {
    Player(String),
    GreedyString(String),
}

impl Value {
    fn type_error(&self, expected: &str) -> InternalError {
        InternalError::WrongArgumentType {
            name: format!("{:?}", self),
            expected: expected.to_string(),
        }
    }

    pub(super) fn as_player(&self) -> CommandResult<&String> {
        match self {
            Value::Player(p) => Ok(p),
            _ => Err(self.type_error("Player").into()),
        }
    }

    pub(super) fn as_greedy(&self) -> CommandResult<&String> {
        match self {
            Value::GreedyString(s) => Ok(s),
            _ => Err(self.type_error("Greedy").into()),
        }
    }
}
