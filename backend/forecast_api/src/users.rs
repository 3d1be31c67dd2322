//! Actor registry. Profiles only; credentials live elsewhere.

use chrono::Utc;
use forecast_workflow::{Actor, AdminLevel, JurisdictionTable, Role};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::activity::{ActivityKind, NewActivity};
use crate::db;
use crate::errors::{ApiError, Result};
use crate::models::{UserProfile, UserRecord};

/// Sign-up request body.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub admin_level: Option<AdminLevel>,
    #[serde(default)]
    pub state: Option<String>,
}

/// Validate and store a new actor profile.
pub async fn register_actor(
    pool: &SqlitePool,
    jurisdictions: &JurisdictionTable,
    registration: Registration,
) -> Result<UserProfile> {
    let name = registration.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::Validation("name is required".to_string()));
    }

    let actor = Actor {
        email: registration.email.trim().to_string(),
        role: registration.role,
        admin_level: registration.admin_level.unwrap_or_default(),
        home_state: registration.state.map(|s| s.trim().to_string()),
    };
    actor.validate()?;
    let actor = actor.normalized();

    if let Some(state) = actor.home_state.as_deref() {
        if !jurisdictions.contains_state(state) {
            return Err(ApiError::Validation(format!("unknown state {state:?}")));
        }
    }

    let record = UserRecord {
        email: actor.email.clone(),
        name,
        role: actor.role.as_str().to_string(),
        admin_level: actor.admin_level.as_str().to_string(),
        home_state: actor.home_state.clone(),
        created_at: Utc::now().timestamp(),
    };

    let mut tx = pool.begin().await?;
    if !db::insert_user(&mut *tx, &record).await? {
        return Err(ApiError::Conflict(format!(
            "{} is already registered",
            record.email
        )));
    }

    db::insert_activity(
        &mut *tx,
        &NewActivity {
            kind: ActivityKind::ActorRegistered,
            project_id: None,
            actor: record.email.clone(),
            detail: format!("Registered as {}", describe(&actor)),
        },
        record.created_at,
    )
    .await?;
    tx.commit().await?;

    info!("Registered {} as {}", record.email, describe(&actor));
    UserProfile::from_record(&record)
}

/// Load the profile for `email`.
pub async fn get_profile(pool: &SqlitePool, email: &str) -> Result<UserProfile> {
    let record = db::get_user(pool, email)
        .await?
        .ok_or_else(|| ApiError::UnknownActor(email.to_string()))?;
    UserProfile::from_record(&record)
}

/// Load the actor behind `email`; unknown callers are unauthorized.
pub async fn load_actor(pool: &SqlitePool, email: &str) -> Result<Actor> {
    db::get_user(pool, email)
        .await?
        .ok_or_else(|| ApiError::UnknownActor(email.to_string()))?
        .to_actor()
}

fn describe(actor: &Actor) -> String {
    match (actor.role, actor.admin_level, actor.home_state.as_deref()) {
        (Role::Admin, AdminLevel::Central, _) => "central admin".to_string(),
        (Role::Admin, AdminLevel::State, Some(state)) => format!("state admin for {state}"),
        (Role::Employee, _, Some(state)) => format!("employee in {state}"),
        (role, _, _) => role.as_str().to_string(),
    }
}
