use crate::commands::{argument::ArgumentType, context::ExecutionContext, error::CommandResult};
use crate::permissions::PermissionLevel;
use std::sync::Arc;

pub type Executor = Arc<dyn Fn(&mut ExecutionContext<'_>) -> CommandResult<()>>;

#[derive(Clone)]
pub struct CommandNode {
    pub(super) node_type: NodeType,
    pub(super) children: Vec<CommandNode>,
    pub(super) executor: Option<Executor>,
    pub(super) permission: Option<PermissionLevel>,
}

#[derive(Clone)]
pub enum NodeType {
    Root,
    Literal {
        name: String,
        aliases: Vec<String>,
    },
    Argument {
        name: String,
        arg_type: ArgumentType,
    },
}

impl CommandNode {
    fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            children: Vec::new(),
            executor: None,
            permission: None,
        }
    }

    pub fn root() -> Self {
        Self::new(NodeType::Root)
    }

    pub fn literal(name: impl Into<String>) -> Self {
        Self::new(NodeType::Literal {
            name: name.into(),
            aliases: Vec::new(),
        })
    }

    pub fn argument(name: impl Into<String>, arg_type: impl Into<ArgumentType>) -> Self {
        Self::new(NodeType::Argument {
            name: name.into(),
            arg_type: arg_type.into(),
        })
    }

    pub fn then(mut self, child: CommandNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn executes<F>(mut self, executor: F) -> Self
    where
        F: Fn(&mut ExecutionContext<'_>) -> CommandResult<()> + 'static,
    {
        self.executor = Some(Arc::new(executor));
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        let NodeType::Literal { aliases, .. } = &mut self.node_type else {
            panic!("Can not create alias for non-literal command nodes")
        };
        aliases.push(alias.into());
        self
    }

    /// The sender needs at least `level` to run this node or anything below it.
    pub fn require_permission(mut self, level: PermissionLevel) -> Self {
        self.permission = Some(self.permission.map_or(level, |current| current.max(level)));
        self
    }

    pub(super) fn has_executor(&self) -> bool {
        self.executor.is_some()
    }

    pub(super) fn matches_literal(&self, token: &str) -> bool {
        match &self.node_type {
            NodeType::Literal { name, aliases } => {
                name == token || aliases.iter().any(|alias| alias == token)
            }
            _ => false,
        }
    }
}
