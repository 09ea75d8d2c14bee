//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use typevault_core::types::{DbId, Timestamp};

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub owner_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating a project. The slug is derived from the
/// name server-side; the owner comes from the authenticated caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub url: Option<String>,
    pub description: Option<String>,
}

/// Request body for updating a project. All fields are optional; a
/// name change re-derives the slug.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

/// Fully resolved insert input for the repository.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub slug: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub owner_id: DbId,
}
