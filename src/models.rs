//! Payload shapes for groups and Planner resources.
//!
//! Every field tolerates absence so partial (`$select`) responses still decode. Patch bodies
//! skip unset fields, so only what the caller sets is sent.

pub mod collection;
pub mod group;
pub mod identity;
pub mod planner;

pub use collection::*;
pub use group::*;
pub use identity::*;
pub use planner::*;
