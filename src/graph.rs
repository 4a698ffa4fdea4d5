//! Fluent resource builders.
//!
//! Each builder holds the borrowed client, its own composed [`ResourcePath`], and the item
//! identifier where it denotes a single resource. Navigation never mutates a builder, so
//! intermediate values can be stored and reused.

pub mod groups;
pub mod path;
pub mod planner;

pub use groups::*;
pub use path::*;
pub use planner::*;
