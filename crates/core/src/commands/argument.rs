use super::argument_parser::*;

#[derive(Clone)]
pub enum ArgumentType {
    Player,
    GreedyString,
}

impl ArgumentType {
    pub(super) fn parse<'a>(&self, input: &'a str) -> ArgumentParseResult<'a> {
        match self {
            ArgumentType::Player => parse_player(input),
            ArgumentType::GreedyString => parse_greedy_string(input),
        }
    }

    pub fn player() -> Self {
        ArgumentType::Player
    }

    pub fn greedy_string() -> Self {
        ArgumentType::GreedyString
    }

    pub(super) fn is_greedy(&self) -> bool {
        matches!(self, ArgumentType::GreedyString)
    }
}
