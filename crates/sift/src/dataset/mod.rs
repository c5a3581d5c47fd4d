//! Tabular data model: values, columns and datasets.

mod column;
mod table;
mod value;

pub use column::Column;
pub use table::Dataset;
pub use value::{parse_date, parse_datetime, Value};
