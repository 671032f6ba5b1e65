// src/extractors/mod.rs
pub mod cells;
pub mod districts;
pub mod results;

// Re-export key extraction types for convenience
pub use districts::extract_districts;
pub use results::{ColumnHeader, ResultRow};
