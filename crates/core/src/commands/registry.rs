use super::node::CommandNode;

pub struct CommandRegistry {
    root: CommandNode,
    custom_aliases: Vec<(String, String)>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            root: CommandNode::root(),
            custom_aliases: Vec::new(),
        }
    }

    pub fn register(&mut self, command: CommandNode) {
        self.root.children.push(command);
    }

    /// Whether a top level command already answers to `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.root
            .children
            .iter()
            .any(|child| child.matches_literal(name))
    }

    pub fn get_root(&self) -> &CommandNode {
        &self.root
    }

    pub fn add_custom_alias(&mut self, prefix: impl Into<String>, replacement: impl Into<String>) {
        self.custom_aliases
            .push((prefix.into(), replacement.into()));
    }

    pub fn get_custom_aliases(&self) -> &[(String, String)] {
        &self.custom_aliases
    }
}
