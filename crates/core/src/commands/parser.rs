use crate::commands::{
    argument_parser,
    node::{CommandNode, NodeType},
    value::Value,
};

pub enum ParseResult<'a> {
    Success {
        node: &'a CommandNode,
        arguments: Vec<(String, Value)>,
        path: Vec<&'a CommandNode>,
    },
    Partial {
        path: Vec<&'a CommandNode>,
    },
    TooManyArguments {
        path: Vec<&'a CommandNode>,
        remaining: String,
    },
    InvalidArgument {
        path: Vec<&'a CommandNode>,
        remaining: String,
    },
    NothingMatched,
}

pub(super) fn parse<'a>(root: &'a CommandNode, input: &str) -> ParseResult<'a> {
    let mut remaining_input = input;
    let mut path: Vec<&'a CommandNode> = vec![root];
    let mut arguments: Vec<(String, Value)> = Vec::new();

    while parse_next(&mut path, &mut arguments, &mut remaining_input) {}

    let final_node = path[path.len() - 1];

    if matches!(final_node.node_type, NodeType::Root) {
        return ParseResult::NothingMatched;
    }

    let remainder = remaining_input.trim();

    if !remainder.is_empty() {
        if final_node.has_executor() && final_node.children.is_empty() {
            ParseResult::TooManyArguments {
                path,
                remaining: remainder.to_string(),
            }
        } else {
            ParseResult::InvalidArgument {
                path,
                remaining: remainder.to_string(),
            }
        }
    } else if final_node.has_executor() {
        ParseResult::Success {
            node: final_node,
            arguments,
            path,
        }
    } else {
        ParseResult::Partial { path }
    }
}

/// Descends into the first child of the current node that accepts the next
/// token. Literals are tried before arguments so `clear` isn't taken for a
/// player name.
fn parse_next<'a>(
    path: &mut Vec<&'a CommandNode>,
    arguments: &mut Vec<(String, Value)>,
    remaining_input: &mut &str,
) -> bool {
    let current_node = path[path.len() - 1];
    let input = *remaining_input;

    if let Some((token, rest)) = argument_parser::consume_token(input) {
        if let Some(child) = current_node
            .children
            .iter()
            .find(|child| child.matches_literal(token))
        {
            path.push(child);
            *remaining_input = rest;
            return true;
        }
    }

    for child in &current_node.children {
        if let NodeType::Argument { name, arg_type } = &child.node_type {
            if let Ok((value, rest)) = arg_type.parse(input) {
                path.push(child);
                arguments.push((name.clone(), value));
                *remaining_input = rest;
                return true;
            }
        }
    }

    false
}
