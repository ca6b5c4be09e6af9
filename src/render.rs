// src/render.rs

//! Tree and graph rendering
//!
//! Pure views over a [`ResolutionResult`]: a lazy ASCII-tree line iterator
//! for terminal output, and an exportable node/edge structure (JSON or
//! Graphviz DOT) for an external image-drawing collaborator. Rendering never
//! prunes the tree; the filter substring only annotates matching nodes.

use crate::error::{Error, Result};
use crate::resolver::{DependencyNode, ResolutionResult, Truncation};
use serde::Serialize;

/// Render a resolution result as a lazy sequence of ASCII tree lines.
///
/// Nodes whose name contains `filter` (case-sensitive substring match) are
/// suffixed with ` *`; truncated nodes carry a marker naming why expansion
/// stopped. Lines are produced on demand in depth-first order.
pub fn ascii_tree<'a>(result: &'a ResolutionResult, filter: Option<&'a str>) -> AsciiTree<'a> {
    AsciiTree {
        filter,
        stack: vec![Frame {
            node: &result.root,
            prefix: String::new(),
            branch: None,
        }],
    }
}

struct Frame<'a> {
    node: &'a DependencyNode,
    /// Accumulated continuation glyphs for this node's line
    prefix: String,
    /// `None` for the root, otherwise whether this is the last sibling
    branch: Option<bool>,
}

/// Iterator over rendered tree lines, driven by an explicit stack
pub struct AsciiTree<'a> {
    filter: Option<&'a str>,
    stack: Vec<Frame<'a>>,
}

impl<'a> AsciiTree<'a> {
    fn annotations(&self, node: &DependencyNode) -> String {
        let mut suffix = String::new();

        match node.truncated {
            Some(Truncation::Cycle) => suffix.push_str(" (cycle)"),
            Some(Truncation::DepthLimit) => suffix.push_str(" (depth limit)"),
            Some(Truncation::Missing) => suffix.push_str(" (missing)"),
            None => {}
        }

        if let Some(filter) = self.filter {
            if node.name.contains(filter) {
                suffix.push_str(" *");
            }
        }

        suffix
    }
}

impl<'a> Iterator for AsciiTree<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let frame = self.stack.pop()?;
        let node = frame.node;

        let line = match frame.branch {
            None => format!("{}{}", node.name, self.annotations(node)),
            Some(is_last) => {
                let connector = if is_last { "└── " } else { "├── " };
                format!("{}{}{}{}", frame.prefix, connector, node.name, self.annotations(node))
            }
        };

        let child_prefix = match frame.branch {
            None => String::new(),
            Some(is_last) => {
                let continuation = if is_last { "    " } else { "│   " };
                format!("{}{}", frame.prefix, continuation)
            }
        };

        // Push in reverse so children pop in listed order
        let last_index = node.children.len().saturating_sub(1);
        for (i, child) in node.children.iter().enumerate().rev() {
            self.stack.push(Frame {
                node: child,
                prefix: child_prefix.clone(),
                branch: Some(i == last_index),
            });
        }

        Some(line)
    }
}

/// One exported graph node.
///
/// Ids are the slash-joined name path from the root, so the same package at
/// two tree positions exports as two distinct nodes (diamonds preserved).
#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated: Option<Truncation>,
}

/// One parent -> child edge, referencing node ids
#[derive(Debug, Clone, Serialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

/// Node/edge structure handed to an external image renderer.
///
/// This crate draws no pixels; it emits the structure as Graphviz DOT or
/// JSON and leaves layout to the consumer.
#[derive(Debug, Clone, Serialize)]
pub struct GraphExport {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphExport {
    pub fn from_result(result: &ResolutionResult) -> Self {
        let mut export = Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        };
        export.collect(&result.root, None);
        export
    }

    fn collect(&mut self, node: &DependencyNode, parent_id: Option<&str>) {
        let id = match parent_id {
            Some(parent_id) => format!("{parent_id}/{}", node.name),
            None => node.name.clone(),
        };

        self.nodes.push(GraphNode {
            id: id.clone(),
            name: node.name.clone(),
            truncated: node.truncated,
        });

        if let Some(parent_id) = parent_id {
            self.edges.push(GraphEdge {
                from: parent_id.to_string(),
                to: id.clone(),
            });
        }

        for child in &node.children {
            self.collect(child, Some(&id));
        }
    }

    /// Render as Graphviz DOT, with truncated nodes styled distinctly
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph dependencies {\n");
        out.push_str("    rankdir=LR;\n");
        out.push_str("    node [shape=box];\n");

        for node in &self.nodes {
            let style = match node.truncated {
                Some(Truncation::Cycle) => ", style=dashed, color=red",
                Some(Truncation::DepthLimit) => ", style=dashed",
                Some(Truncation::Missing) => ", style=dotted, color=gray",
                None => "",
            };
            out.push_str(&format!("    {:?} [label={:?}{}];\n", node.id, node.name, style));
        }

        for edge in &self.edges {
            out.push_str(&format!("    {:?} -> {:?};\n", edge.from, edge.to));
        }

        out.push_str("}\n");
        out
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::FormatError(format!("Failed to serialize graph export: {e}")))
    }
}
