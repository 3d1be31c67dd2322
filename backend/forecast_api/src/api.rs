//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use forecast_workflow::{Action, JurisdictionTable, ProjectAttributes, StateEntry};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::activity::{ActivityKind, ActivityRecord};
use crate::db;
use crate::errors::Result;
use crate::forecast::ForecastClient;
use crate::models::{ProjectView, UserProfile};
use crate::projects;
use crate::users::{self, Registration};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
    pub jurisdictions: JurisdictionTable,
    pub forecaster: ForecastClient,
}

// ─────────────────────────────────────────────────────────
// Request shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ActorQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub email: String,
    pub input_features: ProjectAttributes,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub email: String,
    /// `approve` / `decline`; the older `approved` / `declined` spellings
    /// are also accepted.
    #[serde(alias = "status")]
    pub action: Action,
}

#[derive(Debug, Deserialize)]
pub struct DeleteProjectRequest {
    pub email: String,
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProjectsResponse {
    pub count: usize,
    pub projects: Vec<ProjectView>,
}

#[derive(Serialize)]
pub struct ProjectResponse {
    pub project: ProjectView,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub user: UserProfile,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub id: i64,
    pub deleted: bool,
}

#[derive(Serialize)]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub project_id: Option<i64>,
    pub detail: String,
    pub created_at: i64,
}

impl From<ActivityRecord> for ActivityEntry {
    fn from(record: ActivityRecord) -> Self {
        Self {
            kind: ActivityKind::from_column(&record.kind),
            project_id: record.project_id,
            detail: record.detail,
            created_at: record.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct ActivityResponse {
    pub count: usize,
    pub activity: Vec<ActivityEntry>,
}

#[derive(Serialize)]
pub struct JurisdictionsResponse<'a> {
    pub states: &'a [StateEntry],
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /jurisdictions`
///
/// Lists every supported state with its cities.
pub async fn get_jurisdictions(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    Json(JurisdictionsResponse {
        states: state.jurisdictions.entries(),
    })
    .into_response()
}

/// `POST /auth/signup`
pub async fn signup(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<Registration>,
) -> Result<impl IntoResponse> {
    let user = users::register_actor(&state.pool, &state.jurisdictions, body).await?;
    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

/// `GET /auth/profile?email=`
pub async fn get_profile(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ActorQuery>,
) -> Result<impl IntoResponse> {
    let user = users::get_profile(&state.pool, &query.email).await?;
    Ok(Json(UserResponse { user }))
}

/// `GET /projects?email=`
///
/// Returns the projects the caller may see, newest first.
pub async fn get_projects(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ActorQuery>,
) -> Result<impl IntoResponse> {
    let actor = users::load_actor(&state.pool, &query.email).await?;
    let projects: Vec<ProjectView> =
        projects::fetch_projects_for_actor(&state.pool, &state.jurisdictions, &actor.email)
            .await?
            .into_iter()
            .map(|p| ProjectView::new(p, &actor, &state.jurisdictions))
            .collect();
    Ok(Json(ProjectsResponse {
        count: projects.len(),
        projects,
    }))
}

/// `POST /projects`
///
/// Runs the forecast, then stores the project with its initial status.
pub async fn create_project(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse> {
    // Unknown callers and unroutable submissions never reach the model.
    let actor = users::load_actor(&state.pool, &body.email).await?;
    projects::check_submission(&state.jurisdictions, &body.input_features)?;

    let forecasts = state.forecaster.forecast(&body.input_features).await?;
    let stored = projects::create_project(
        &state.pool,
        &state.jurisdictions,
        &body.email,
        body.input_features,
        forecasts,
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse {
            project: ProjectView::new(stored, &actor, &state.jurisdictions),
        }),
    ))
}

/// `PUT /projects/:id`
pub async fn update_project(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse> {
    let actor = users::load_actor(&state.pool, &body.email).await?;
    let stored = projects::update_project_status(
        &state.pool,
        &state.jurisdictions,
        id,
        &body.email,
        body.action,
    )
    .await?;
    Ok(Json(ProjectResponse {
        project: ProjectView::new(stored, &actor, &state.jurisdictions),
    }))
}

/// `DELETE /projects/:id`
pub async fn delete_project(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
    Json(body): Json<DeleteProjectRequest>,
) -> Result<impl IntoResponse> {
    projects::delete_project(&state.pool, id, &body.email).await?;
    Ok(Json(DeletedResponse { id, deleted: true }))
}

/// `GET /activity?email=`
pub async fn get_activity(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ActorQuery>,
) -> Result<impl IntoResponse> {
    users::load_actor(&state.pool, &query.email).await?;
    let activity: Vec<ActivityEntry> = db::get_activity_for_actor(&state.pool, &query.email)
        .await?
        .into_iter()
        .map(ActivityEntry::from)
        .collect();
    Ok(Json(ActivityResponse {
        count: activity.len(),
        activity,
    }))
}
