//! Builders that assemble parsed rule bodies into node trees

mod rule_builder;

pub use rule_builder::{BuildEvent, BuilderError, RuleBuilder};
