//! Configuration sources, added to the builder in precedence order.

pub mod explicit_file;
pub mod global_file;
