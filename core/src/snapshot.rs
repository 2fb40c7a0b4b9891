//! Serializable views of command trees.
//!
//! A [`NodeSnapshot`] captures the shape of a tree (names, variants,
//! executability, gating) with children sorted by name, so the result is
//! deterministic and can be compared, printed or stored as JSON/YAML.
//!
//! # Example
//!
//! ```
//! use marshal_core::{NodeSnapshot, arguments};
//! use marshal_core::commands::{argument, literal};
//!
//! let tree = literal::<u8>("time")
//!     .then(literal("query").executes(|_| Ok(0)))
//!     .then(
//!         literal("set")
//!             .requires(|level: &u8| *level >= 2)
//!             .then(argument("ticks", arguments::integer()).executes(|_| Ok(1))),
//!     )
//!     .build();
//!
//! let full = NodeSnapshot::capture(&tree);
//! assert_eq!(full.paths(), vec!["time query", "time set <ticks>"]);
//!
//! let guest = NodeSnapshot::capture_visible(&tree, &0).unwrap();
//! assert_eq!(guest.paths(), vec!["time query"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::CommandNode;

/// Variant tag of a snapshotted node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKind {
    Literal,
    Argument,
}

/// Structural view of one node and its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub name: String,
    pub kind: SnapshotKind,
    /// Set for literals only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
    /// Short name of the parsed value type; set for arguments only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    pub executable: bool,
    /// Whether a requirement gates this node.
    pub restricted: bool,
    /// Children sorted by name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    /// Captures `node` and its whole subtree.
    pub fn capture<S>(node: &CommandNode<S>) -> Self {
        let mut snapshot = Self::header(node);
        snapshot.children = node.children().map(Self::capture).collect();
        snapshot.children.sort_by(|a, b| a.name.cmp(&b.name));
        snapshot
    }

    /// Captures only the nodes `source` can use. Returns `None` if `node`
    /// itself is not usable; unusable children are pruned with their
    /// subtrees.
    pub fn capture_visible<S>(node: &CommandNode<S>, source: &S) -> Option<Self> {
        if !node.can_use(source) {
            return None;
        }
        let mut snapshot = Self::header(node);
        snapshot.children = node
            .children()
            .filter_map(|child| Self::capture_visible(child, source))
            .collect();
        snapshot.children.sort_by(|a, b| a.name.cmp(&b.name));
        Some(snapshot)
    }

    fn header<S>(node: &CommandNode<S>) -> Self {
        Self {
            name: node.name().to_string(),
            kind: if node.is_literal() {
                SnapshotKind::Literal
            } else {
                SnapshotKind::Argument
            },
            case_sensitive: node.case_sensitive(),
            value_type: node.parser().map(|parser| parser.value_type().to_string()),
            executable: node.is_executable(),
            restricted: node.requirement().is_some(),
            children: Vec::new(),
        }
    }

    /// How this node appears in a command path: the keyword for literals,
    /// `<name>` for arguments.
    pub fn label(&self) -> String {
        match self.kind {
            SnapshotKind::Literal => self.name.clone(),
            SnapshotKind::Argument => format!("<{}>", self.name),
        }
    }

    /// Every executable path through this subtree, space-joined, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        self.collect_paths(&mut prefix, &mut out);
        out.sort();
        out
    }

    fn collect_paths(&self, prefix: &mut Vec<String>, out: &mut Vec<String>) {
        prefix.push(self.label());
        if self.executable {
            out.push(prefix.join(" "));
        }
        for child in &self.children {
            child.collect_paths(prefix, out);
        }
        prefix.pop();
    }

    /// Follows child names from this node.
    pub fn find(&self, path: &[&str]) -> Option<&NodeSnapshot> {
        let Some((first, rest)) = path.split_first() else {
            return Some(self);
        };
        self.children
            .iter()
            .find(|child| child.name == *first)
            .and_then(|child| child.find(rest))
    }

    /// Counts this node and all descendants.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Propagates [`serde_json::Error`]; a snapshot always serializes, so
    /// this only fails on writer-level problems.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
