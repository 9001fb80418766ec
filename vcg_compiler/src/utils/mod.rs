//! Shared utility types for the VCG compiler

mod span;

pub use span::{Position, Span};
