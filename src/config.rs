//! Connection settings: serde structs and file persistence.

pub mod types;
pub mod persistence;
