//! Tag configuration tree
//!
//! Node model, path parsing and resolution, dependency ordering of UDT definitions, and the
//! structure builder that the merge engine composes.

pub mod builder;
pub mod document;
pub mod node;
pub mod path;
pub mod resolver;
pub mod sorter;
pub mod walker;

pub use builder::{Replacement, StructureBuilder};
pub use document::TagDocument;
pub use node::{TagKind, TreeNode};
pub use path::TagPath;
pub use resolver::{resolve, Resolution};
