//! Project CRUD and font association.
//!
//! Projects are the public embed surface: each carries a URL-safe slug
//! derived from its name, unique across all users. Everything here is
//! owner-scoped; cross-tenant ids behave as if they do not exist.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use typevault_core::error::CoreError;
use typevault_core::slug::slugify;
use typevault_core::types::DbId;
use typevault_db::models::font::{AssociateFont, Font, FontWithAssets};
use typevault_db::models::project::{CreateProject, NewProject, Project, UpdateProject};
use typevault_db::repositories::{FontRepo, ProjectRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A project together with its member fonts.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub fonts: Vec<FontWithAssets>,
}

/// POST /api/v1/projects
pub async fn create_project(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<impl IntoResponse> {
    let slug = derive_slug(&input.name)?;

    let project = ProjectRepo::create(
        &state.pool,
        &NewProject {
            name: input.name,
            slug,
            url: input.url,
            description: input.description,
            owner_id: user.user_id,
        },
    )
    .await?;

    tracing::info!(project_id = project.id, slug = %project.slug, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(project))))
}

/// GET /api/v1/projects
pub async fn list_projects(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = ProjectRepo::list_by_owner(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse::new(projects)))
}

/// GET /api/v1/projects/{id} -- the project plus its member fonts.
pub async fn get_project(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let project = find_owned_project(&state, id, user.user_id).await?;
    let fonts = FontRepo::list_by_project(&state.pool, project.id).await?;

    Ok(Json(DataResponse::new(ProjectDetail { project, fonts })))
}

/// PUT /api/v1/projects/{id}
///
/// Renaming re-derives the slug, so previously published embed URLs
/// stop resolving. That is accepted behaviour: the slug mirrors the
/// current name.
pub async fn update_project(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    let slug = match &input.name {
        Some(name) => Some(derive_slug(name)?),
        None => None,
    };

    let project = ProjectRepo::update(
        &state.pool,
        id,
        user.user_id,
        input.name.as_deref(),
        slug.as_deref(),
        input.url.as_deref(),
        input.description.as_deref(),
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "Project",
        id,
    })?;

    Ok(Json(DataResponse::new(project)))
}

/// DELETE /api/v1/projects/{id}
///
/// Member fonts survive; only their association is cleared.
pub async fn delete_project(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProjectRepo::delete(&state.pool, id, user.user_id).await?;
    if !deleted {
        return Err(CoreError::NotFound {
            entity: "Project",
            id,
        }
        .into());
    }

    tracing::info!(project_id = id, user_id = user.user_id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{id}/fonts -- associate a font.
///
/// Both the project and the font must belong to the caller. Moving a
/// font that is already in another project re-homes it (a font belongs
/// to at most one project).
pub async fn add_font_to_project(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssociateFont>,
) -> AppResult<Json<DataResponse<Font>>> {
    let project = find_owned_project(&state, id, user.user_id).await?;

    let font = FontRepo::set_project(&state.pool, input.font_id, user.user_id, Some(project.id))
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Font",
            id: input.font_id,
        })?;

    Ok(Json(DataResponse::new(font)))
}

/// DELETE /api/v1/projects/{id}/fonts/{font_id} -- dissociate a font.
pub async fn remove_font_from_project(
    user: AuthUser,
    State(state): State<AppState>,
    Path((id, font_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Font>>> {
    let project = find_owned_project(&state, id, user.user_id).await?;

    let font = FontRepo::find_by_id_for_owner(&state.pool, font_id, user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Font",
            id: font_id,
        })?;
    if font.font.project_id != Some(project.id) {
        return Err(CoreError::Validation(format!(
            "Font {font_id} is not a member of project {id}"
        ))
        .into());
    }

    let font = FontRepo::set_project(&state.pool, font_id, user.user_id, None)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Font",
            id: font_id,
        })?;

    Ok(Json(DataResponse::new(font)))
}

async fn find_owned_project(state: &AppState, id: DbId, owner_id: DbId) -> AppResult<Project> {
    Ok(ProjectRepo::find_by_id_for_owner(&state.pool, id, owner_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id,
        })?)
}

/// Derive the public slug from a project name, rejecting names that
/// slugify to nothing.
fn derive_slug(name: &str) -> Result<String, CoreError> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(CoreError::Validation(
            "Project name must contain at least one alphanumeric character".into(),
        ));
    }
    Ok(slug)
}
