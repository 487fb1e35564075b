use crate::commands::{
    error::{CommandResult, InternalError},
    value::Value,
};
use rustc_hash::FxHashMap;

pub struct ArgumentSet {
    args: FxHashMap<String, Value>,
}

impl ArgumentSet {
    pub(super) fn empty() -> Self {
        Self {
            args: FxHashMap::default(),
        }
    }

    pub(super) fn new(args: Vec<(String, Value)>) -> Self {
        Self {
            args: args.into_iter().collect(),
        }
    }

    fn get(&self, name: &str) -> CommandResult<&Value> {
        self.args.get(name).ok_or_else(|| {
            InternalError::MissingArgument {
                name: name.to_string(),
            }
            .into()
        })
    }

    pub fn get_player(&self, name: &str) -> CommandResult<String> {
        Ok(self.get(name)?.as_player()?.clone())
    }

    pub fn get_greedy(&self, name: &str) -> CommandResult<String> {
        Ok(self.get(name)?.as_greedy()?.clone())
    }
}
