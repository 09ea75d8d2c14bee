pub mod fonts;
pub mod projects;
pub mod public;
