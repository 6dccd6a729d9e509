//! Generic utility primitives with zero domain knowledge.
//!
//! - `suggest` - Did-you-mean ranking for unrecognized names
//! - `template` - String template rendering
//! - `validation` - Input validation helpers

pub mod suggest;
pub mod template;
pub mod validation;
