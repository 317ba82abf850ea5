// Core types shared across the report pipeline

pub mod column;
pub mod value;

pub use column::{col_letter, col_number, ColRange};
pub use value::Value;
