//! Point-in-time view of every node's stored status.

use std::fmt::{self, Write as _};

use arbor_bt::{Breakpoint, Tree};
use arbor_core::Status;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Arena index of the node.
    pub id: usize,
    pub depth: usize,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub status: Status,
    #[serde(default)]
    pub breakpoint: Breakpoint,
}

impl NodeSnapshot {
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.kind)
    }
}

/// Nodes in depth-first pre-order, root first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub nodes: Vec<NodeSnapshot>,
}

impl TreeSnapshot {
    pub fn capture(tree: &Tree) -> Self {
        let nodes = tree
            .walk()
            .into_iter()
            .filter_map(|(id, depth)| {
                let node = tree.node(id)?;
                Some(NodeSnapshot {
                    id: id.index(),
                    depth,
                    kind: node.kind().name().to_string(),
                    title: node.title().map(str::to_string),
                    status: node.status(),
                    breakpoint: node.breakpoint(),
                })
            })
            .collect();
        Self { nodes }
    }

    pub fn root_status(&self) -> Status {
        self.nodes.first().map(|n| n.status).unwrap_or_default()
    }

    /// Labels along the chain of running nodes from the root down to the
    /// first running leaf-most node.
    pub fn running_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut depth = 0;
        for node in &self.nodes {
            if node.depth == depth && node.status.is_running() {
                path.push(node.label());
                depth += 1;
            } else if node.depth < depth {
                break;
            }
        }
        path
    }

    /// Indented one-line-per-node text rendering.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            let _ = write!(
                out,
                "{:indent$}{} #{} [{}]",
                "",
                node.label(),
                node.id,
                node.status,
                indent = node.depth * 2
            );
            if node.breakpoint != Breakpoint::None {
                out.push_str(" (break)");
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for TreeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: usize, depth: usize, kind: &str, status: Status) -> NodeSnapshot {
        NodeSnapshot {
            id,
            depth,
            kind: kind.to_string(),
            title: None,
            status,
            breakpoint: Breakpoint::None,
        }
    }

    #[test]
    fn running_path_stops_at_the_running_frontier() {
        let snapshot = TreeSnapshot {
            nodes: vec![
                node(0, 0, "root", Status::Running),
                node(3, 1, "sequence", Status::Running),
                node(1, 2, "succeed", Status::Success),
                node(2, 2, "wait", Status::Running),
                node(4, 1, "log", Status::Running),
            ],
        };
        assert_eq!(snapshot.running_path(), ["root", "sequence", "wait"]);
        assert_eq!(snapshot.root_status(), Status::Running);
    }
}
