//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Plain input structs for inserts/updates

pub mod font;
pub mod project;
