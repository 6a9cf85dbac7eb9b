//! Utility functions for check implementations.

pub mod color;
pub mod naming;
pub mod sql;

// Re-export commonly used utilities for check implementations
#[doc(inline)]
pub use color::{is_color_literal, normalize_color};
#[doc(inline)]
pub use naming::{is_snake_case, summarize_names};
#[doc(inline)]
pub use sql::{sql_references, SqlReference};
