//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod font_repo;
pub mod project_repo;

pub use font_repo::FontRepo;
pub use project_repo::ProjectRepo;
