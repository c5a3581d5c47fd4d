//! Column typing and classification.

mod column;
mod table;
mod types;

pub use column::ColumnDescriptor;
pub use table::{classify, ColumnInfo};
pub use types::{ColumnKind, DataType};
