//! Repository for the `projects` table.

use sqlx::PgPool;
use typevault_core::types::DbId;

use crate::models::project::{NewProject, Project};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug, url, description, owner_id, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// A slug collision violates `uq_projects_slug` and surfaces as a
    /// conflict at the API layer.
    pub async fn create(pool: &PgPool, input: &NewProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, slug, url, description, owner_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.url)
            .bind(&input.description)
            .bind(input.owner_id)
            .fetch_one(pool)
            .await
    }

    /// Find a project by id, scoped to its owner.
    pub async fn find_by_id_for_owner(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a project by its public slug. Deliberately not scoped
    /// to an owner: the slug is the unauthenticated embed key.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE slug = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List all projects owned by a user, newest first.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE owner_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields are applied; the slug
    /// is passed pre-derived when the name changed.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        name: Option<&str>,
        slug: Option<&str>,
        url: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET \
                name = COALESCE($3, name), \
                slug = COALESCE($4, slug), \
                url = COALESCE($5, url), \
                description = COALESCE($6, description), \
                updated_at = now() \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(name)
            .bind(slug)
            .bind(url)
            .bind(description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project row. Member fonts are dissociated by the
    /// `ON DELETE SET NULL` foreign key, never cascade-deleted.
    pub async fn delete(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
