//! Join engine: key type checking, optional coercion and relational merge.

mod engine;
mod pool;

pub use engine::{check_key_types, join, JoinKind, JoinReport, JoinSpec, KeyCompatibility};
pub use pool::DatasetPool;
