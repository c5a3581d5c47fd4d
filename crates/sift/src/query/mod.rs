//! Query builder: ordered conditions joined by `and`/`or`.

mod compiler;
mod condition;

pub use compiler::compile;
pub use condition::{ConditionSpec, Connective, Query};
