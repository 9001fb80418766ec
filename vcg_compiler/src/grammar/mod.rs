//! Grammar data model for the VCG compiler

pub mod ast;
pub mod builders;

pub use ast::nodes::{HierarchicalNode, ImportEntry, VcgModule, UNBOUNDED_REPEAT};
pub use builders::{BuildEvent, BuilderError, RuleBuilder};
