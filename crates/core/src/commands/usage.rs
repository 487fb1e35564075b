use super::node::{CommandNode, NodeType};
use itertools::Itertools;

/// Builds a usage line such as `/giveItemSet2 [<player> [clear]]` for the
/// node at the end of `path`.
pub fn generate_usage(path: &[&CommandNode]) -> String {
    let mut parts = path.iter().skip(1).map(|node| get_display_name(node)).collect_vec();

    if let Some(current_node) = path.last() {
        let suffix = describe_children(current_node);
        if !suffix.is_empty() {
            parts.push(suffix);
        }
    }

    format!("/{}", parts.join(" "))
}

fn describe_children(node: &CommandNode) -> String {
    if node.children.is_empty() {
        return String::new();
    }

    let alternatives = node
        .children
        .iter()
        .map(|child| {
            let rest = describe_children(child);
            let name = get_display_name(child);
            if rest.is_empty() {
                name
            } else {
                format!("{} {}", name, rest)
            }
        })
        .collect_vec();

    let children_optional = node.has_executor() || node.children.iter().all(is_greedy);
    let joined = alternatives.join(" | ");
    if children_optional {
        format!("[{}]", joined)
    } else if alternatives.len() > 1 {
        format!("({})", joined)
    } else {
        joined
    }
}

fn is_greedy(node: &CommandNode) -> bool {
    matches!(&node.node_type, NodeType::Argument { arg_type, .. } if arg_type.is_greedy())
}

fn get_display_name(node: &CommandNode) -> String {
    match &node.node_type {
        NodeType::Root => String::new(),
        NodeType::Literal { name, .. } => name.clone(),
        NodeType::Argument { name, .. } => format!("<{}>", name),
    }
}

/// The literal prefix of `path`, e.g. `/execute as` for `/execute as <player>`.
pub fn generate_base_name(path: &[&CommandNode]) -> String {
    let mut parts = Vec::new();

    for node in path {
        match &node.node_type {
            NodeType::Root => {}
            NodeType::Literal { name, .. } => parts.push(name),
            NodeType::Argument { .. } => break,
        }
    }

    format!("/{}", parts.into_iter().join(" "))
}
