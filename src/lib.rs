// src/lib.rs

//! apkgraph
//!
//! Dependency graph visualizer for Alpine-style APK repositories.
//!
//! # Architecture
//!
//! - Index source: fetches one snapshot of raw APKINDEX bytes, from a remote
//!   repository (HTTP + gzip tar extraction) or a local fixture file
//! - Index parser: decodes the record format into a name -> record map
//! - Resolver: recursive depth-first expansion with path-local cycle
//!   detection, depth limiting, and missing-package accounting
//! - Renderer: lazy ASCII tree, or a node/edge export for image rendering

mod error;
pub mod index;
pub mod render;
pub mod repository;
pub mod resolver;

pub use error::{Error, Result};
pub use index::{Index, PackageRecord};
pub use render::{ascii_tree, AsciiTree, GraphEdge, GraphExport, GraphNode};
pub use repository::{IndexSource, LocalFileSource, RemoteSource};
pub use resolver::{resolve, DependencyNode, ResolutionResult, ResolveOptions, Truncation};
