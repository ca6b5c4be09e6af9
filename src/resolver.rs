// src/resolver.rs

//! Dependency graph resolver
//!
//! Recursive depth-first expansion of a package's transitive dependencies.
//! The result is tree-shaped: a package reachable via two independent paths
//! is expanded once per path (diamonds are preserved), while a package that
//! reappears on its own ancestor path is collapsed into a truncated leaf
//! (cycles terminate). Missing packages and cycles are data, not errors.

use crate::error::{Error, Result};
use crate::index::Index;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// Why a node's expansion stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Truncation {
    /// The configured maximum depth was reached with dependencies remaining
    DepthLimit,
    /// The package already appears among its own ancestors
    Cycle,
    /// The package is referenced but absent from the index
    Missing,
}

/// One node of the resolved dependency tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    pub name: String,
    /// Root = 0
    pub depth: usize,
    pub truncated: Option<Truncation>,
    /// Children in the order the owning record lists its dependencies
    pub children: Vec<DependencyNode>,
}

impl DependencyNode {
    fn leaf(name: &str, depth: usize, truncated: Option<Truncation>) -> Self {
        Self {
            name: name.to_string(),
            depth,
            truncated,
            children: Vec::new(),
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated.is_some()
    }
}

/// Resolution parameters.
///
/// An absent `max_depth` means unbounded expansion, bounded only by cycle
/// detection. `max_depth = 0` expands nothing below the root.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub max_depth: Option<usize>,
}

/// A resolved tree plus diagnostic metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub root: DependencyNode,
    /// Total number of nodes created, truncated leaves included
    pub visited_count: usize,
    /// Names referenced as dependencies but absent from the index
    pub missing: BTreeSet<String>,
}

/// Resolve the transitive dependency tree of `root_package`.
///
/// Fails only on an empty root name. A root absent from the index is not an
/// error: the result is a single `Missing`-truncated node with the root name
/// recorded in `missing`.
pub fn resolve(index: &Index, root_package: &str, options: &ResolveOptions) -> Result<ResolutionResult> {
    if root_package.trim().is_empty() {
        return Err(Error::InitError("Root package name is empty".to_string()));
    }

    let mut missing = BTreeSet::new();
    let mut visited_count = 0usize;

    let root = match index.get(root_package) {
        Some(record) => {
            let mut path = Vec::new();
            expand(
                index,
                record.name.as_str(),
                0,
                options.max_depth,
                &mut path,
                &mut missing,
                &mut visited_count,
            )
        }
        None => {
            missing.insert(root_package.to_string());
            visited_count += 1;
            DependencyNode::leaf(root_package, 0, Some(Truncation::Missing))
        }
    };

    debug!(
        "Resolved '{}': {} nodes, {} missing packages",
        root_package,
        visited_count,
        missing.len()
    );

    Ok(ResolutionResult {
        root,
        visited_count,
        missing,
    })
}

/// Expand one package known to be present in the index.
///
/// `path` holds the names from the root down to (and including) the node
/// being expanded; cycle detection is by exact name match against it. The
/// path is local to the current branch, so the same package reached via two
/// independent paths is expanded twice.
fn expand(
    index: &Index,
    name: &str,
    depth: usize,
    max_depth: Option<usize>,
    path: &mut Vec<String>,
    missing: &mut BTreeSet<String>,
    visited_count: &mut usize,
) -> DependencyNode {
    *visited_count += 1;

    let record = match index.get(name) {
        Some(record) => record,
        // Callers only expand names they already looked up
        None => return DependencyNode::leaf(name, depth, Some(Truncation::Missing)),
    };

    if record.depends.is_empty() {
        return DependencyNode::leaf(name, depth, None);
    }

    // A node at the limit with dependencies remaining stops here, marked as
    // depth-truncated; with max_depth = 0 that leaves a root-only tree.
    if let Some(limit) = max_depth {
        if depth >= limit {
            return DependencyNode::leaf(name, depth, Some(Truncation::DepthLimit));
        }
    }

    path.push(name.to_string());
    let mut children = Vec::with_capacity(record.depends.len());

    for dep in &record.depends {
        if path.iter().any(|ancestor| ancestor == dep) {
            *visited_count += 1;
            children.push(DependencyNode::leaf(dep, depth + 1, Some(Truncation::Cycle)));
        } else if index.contains(dep) {
            children.push(expand(
                index,
                dep,
                depth + 1,
                max_depth,
                path,
                missing,
                visited_count,
            ));
        } else {
            missing.insert(dep.clone());
            *visited_count += 1;
            children.push(DependencyNode::leaf(dep, depth + 1, Some(Truncation::Missing)));
        }
    }

    path.pop();

    DependencyNode {
        name: name.to_string(),
        depth,
        truncated: None,
        children,
    }
}
