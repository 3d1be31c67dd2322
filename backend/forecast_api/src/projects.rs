//! Project operations: every mutation asks the workflow engine first.
//!
//! Each call re-reads the actor and the project so decisions are never made
//! on a stale snapshot, and status writes are conditional on the status the
//! decision was made from. A row change and its activity entry commit
//! together or not at all.

use chrono::Utc;
use forecast_workflow::{
    authorize_delete, decide, initial_status, visible_projects, Action, Actor, Jurisdiction,
    JurisdictionResolver, Project, ProjectAttributes, ProjectStatus, Role,
};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::activity::{ActivityKind, NewActivity};
use crate::db;
use crate::errors::{ApiError, Result};
use crate::models::{Forecasts, ProjectRecord, StoredProject};
use crate::users::load_actor;

/// Projects `email` is allowed to see, newest first.
pub async fn fetch_projects_for_actor(
    pool: &SqlitePool,
    resolver: &dyn JurisdictionResolver,
    email: &str,
) -> Result<Vec<StoredProject>> {
    let actor = load_actor(pool, email).await?;

    let rows = match actor.role {
        Role::Employee => db::get_projects_by_creator(pool, &actor.email).await?,
        Role::Admin => db::get_all_projects(pool).await?,
    };
    let projects = rows
        .into_iter()
        .map(StoredProject::try_from)
        .collect::<Result<Vec<_>>>()?;

    Ok(visible_projects(&actor, projects, resolver))
}

/// Check a submission before anything expensive happens: required
/// attributes present and a location some state covers.
pub fn check_submission(
    resolver: &dyn JurisdictionResolver,
    attributes: &ProjectAttributes,
) -> Result<Jurisdiction> {
    validate_attributes(attributes)?;

    let jurisdiction = resolver.resolve(&attributes.location);
    if !jurisdiction.is_known() {
        warn!(
            "Rejected submission: location {:?} resolves to no state",
            attributes.location
        );
        return Err(ApiError::UnknownLocation(attributes.location.clone()));
    }
    Ok(jurisdiction)
}

/// Submit a new project on behalf of `email`.
pub async fn create_project(
    pool: &SqlitePool,
    resolver: &dyn JurisdictionResolver,
    email: &str,
    attributes: ProjectAttributes,
    forecasts: Option<Forecasts>,
) -> Result<StoredProject> {
    let actor = load_actor(pool, email).await?;
    let jurisdiction = check_submission(resolver, &attributes)?;

    let status = initial_status(&actor);
    let now = Utc::now().timestamp();
    let forecasts_json = forecasts.as_ref().map(serde_json::to_string).transpose()?;

    let mut record = ProjectRecord {
        id: 0,
        project_name: attributes.project_name,
        budget: attributes.budget,
        location: attributes.location,
        tower_type: attributes.tower_type,
        substation_type: attributes.substation_type,
        geo: attributes.geo,
        taxes: attributes.taxes,
        forecasts: forecasts_json,
        created_by: actor.email.clone(),
        status: status.as_str().to_string(),
        created_at: now,
        updated_at: now,
    };

    let mut tx = pool.begin().await?;
    record.id = db::insert_project(&mut *tx, &record).await?;
    record_activity(
        &mut tx,
        ActivityKind::ProjectCreated,
        record.id,
        &actor.email,
        format!(
            "Created project ID {} for: {} (Status: {})",
            record.id, record.location, status
        ),
    )
    .await?;
    tx.commit().await?;

    info!(
        "Project {} created by {} in {} with status {}",
        record.id, actor.email, jurisdiction, status
    );
    StoredProject::try_from(record)
}

/// Apply a reviewer's `action` to project `id`.
pub async fn update_project_status(
    pool: &SqlitePool,
    resolver: &dyn JurisdictionResolver,
    id: i64,
    email: &str,
    action: Action,
) -> Result<StoredProject> {
    let actor = load_actor(pool, email).await?;
    let current = load_project(pool, id).await?;

    apply_decision(pool, resolver, &actor, &current.project, action).await?;
    load_project(pool, id).await
}

/// Decide `action` on `snapshot` and persist the outcome with its activity
/// entry. The write only lands while the row still holds the snapshot's
/// status; otherwise the caller gets `Conflict`.
async fn apply_decision(
    pool: &SqlitePool,
    resolver: &dyn JurisdictionResolver,
    actor: &Actor,
    snapshot: &Project,
    action: Action,
) -> Result<ProjectStatus> {
    let id = snapshot.id;
    let next = match decide(snapshot, actor, action, resolver) {
        Ok(next) => next,
        Err(reason) => {
            warn!("Refused {action} on project {id} by {}: {reason}", actor.email);
            return Err(reason.into());
        }
    };

    let now = Utc::now().timestamp();
    let mut tx = pool.begin().await?;
    if !db::update_project_status(&mut *tx, id, snapshot.status, next, now).await? {
        return Err(ApiError::Conflict(format!(
            "project {id} changed while {action} was being applied; reload and retry"
        )));
    }

    let kind = match action {
        Action::Approve => ActivityKind::ProjectApproved,
        Action::Decline => ActivityKind::ProjectDeclined,
    };
    record_activity(
        &mut tx,
        kind,
        id,
        &actor.email,
        format!("{} project ID: {id} ({} → {next})", past_tense(action), snapshot.status),
    )
    .await?;
    tx.commit().await?;

    info!("Project {id}: {} → {next} by {}", snapshot.status, actor.email);
    Ok(next)
}

/// Remove project `id`; only its creator may do so.
pub async fn delete_project(pool: &SqlitePool, id: i64, email: &str) -> Result<()> {
    let current = load_project(pool, id).await?;
    authorize_delete(&current.project, email)?;

    let mut tx = pool.begin().await?;
    if !db::delete_project(&mut *tx, id, email).await? {
        return Err(ApiError::NotFound(id));
    }
    record_activity(
        &mut tx,
        ActivityKind::ProjectDeleted,
        id,
        email,
        format!("Deleted project ID {id} for: {}", current.project.location),
    )
    .await?;
    tx.commit().await?;

    info!("Project {id} deleted by {email}");
    Ok(())
}

async fn load_project(pool: &SqlitePool, id: i64) -> Result<StoredProject> {
    db::get_project(pool, id)
        .await?
        .ok_or(ApiError::NotFound(id))?
        .try_into()
}

async fn record_activity(
    conn: &mut SqliteConnection,
    kind: ActivityKind,
    project_id: i64,
    actor: &str,
    detail: String,
) -> Result<()> {
    let entry = NewActivity {
        kind,
        project_id: Some(project_id),
        actor: actor.to_string(),
        detail,
    };
    db::insert_activity(conn, &entry, Utc::now().timestamp()).await
}

fn past_tense(action: Action) -> &'static str {
    match action {
        Action::Approve => "Approved",
        Action::Decline => "Declined",
    }
}

fn validate_attributes(attributes: &ProjectAttributes) -> Result<()> {
    let required = [
        ("projectName", &attributes.project_name),
        ("budget", &attributes.budget),
        ("location", &attributes.location),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ApiError::Validation(format!("{field} is required")));
        }
    }
    Ok(())
}
