//! Rows as stored in SQLite and the shapes returned to clients.

use std::collections::BTreeMap;

use forecast_workflow::{
    is_actionable, Actor, AdminLevel, JurisdictionResolver, Project, ProjectAttributes,
    ProjectStatus, Role,
};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Material → forecast demand in metric tonnes.
pub type Forecasts = BTreeMap<String, f64>;

/// A registered actor as stored in the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub email: String,
    pub name: String,
    pub role: String,
    pub admin_level: String,
    pub home_state: Option<String>,
    pub created_at: i64,
}

impl UserRecord {
    pub fn to_actor(&self) -> Result<Actor> {
        Ok(Actor {
            email: self.email.clone(),
            role: self.role.parse::<Role>()?,
            admin_level: self.admin_level.parse::<AdminLevel>()?,
            home_state: self.home_state.clone(),
        })
    }
}

/// Public view of an actor profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub admin_level: AdminLevel,
    pub state: Option<String>,
}

impl UserProfile {
    pub fn from_record(record: &UserRecord) -> Result<Self> {
        let actor = record.to_actor()?;
        Ok(Self {
            name: record.name.clone(),
            email: actor.email,
            role: actor.role,
            admin_level: actor.admin_level,
            state: actor.home_state,
        })
    }
}

/// A project row from the `projects` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectRecord {
    pub id: i64,
    pub project_name: String,
    pub budget: String,
    pub location: String,
    pub tower_type: String,
    pub substation_type: String,
    pub geo: String,
    pub taxes: String,
    pub forecasts: Option<String>,
    pub created_by: String,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A decoded project: the workflow snapshot plus its opaque payload.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProject {
    pub project: Project,
    pub attributes: ProjectAttributes,
    pub forecasts: Option<Forecasts>,
    pub updated_at: i64,
}

impl AsRef<Project> for StoredProject {
    fn as_ref(&self) -> &Project {
        &self.project
    }
}

impl TryFrom<ProjectRecord> for StoredProject {
    type Error = crate::errors::ApiError;

    fn try_from(row: ProjectRecord) -> Result<Self> {
        let forecasts = row
            .forecasts
            .as_deref()
            .map(serde_json::from_str::<Forecasts>)
            .transpose()?;
        Ok(Self {
            project: Project {
                id: row.id,
                location: row.location.clone(),
                created_by: row.created_by,
                status: row.status.parse::<ProjectStatus>()?,
                created_at: row.created_at,
            },
            attributes: ProjectAttributes {
                project_name: row.project_name,
                budget: row.budget,
                location: row.location,
                tower_type: row.tower_type,
                substation_type: row.substation_type,
                geo: row.geo,
                taxes: row.taxes,
            },
            forecasts,
            updated_at: row.updated_at,
        })
    }
}

/// Project as returned by the REST API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: i64,
    #[serde(flatten)]
    pub attributes: ProjectAttributes,
    pub state: String,
    pub created_by: String,
    pub status: ProjectStatus,
    pub status_label: &'static str,
    /// Whether the viewer can approve or decline this project right now.
    pub actionable: bool,
    pub forecasts: Option<Forecasts>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ProjectView {
    /// Render `stored` for `viewer`.
    pub fn new(stored: StoredProject, viewer: &Actor, resolver: &dyn JurisdictionResolver) -> Self {
        let state = resolver.resolve(&stored.project.location).to_string();
        let actionable = is_actionable(viewer, &stored.project, resolver);
        Self {
            id: stored.project.id,
            attributes: stored.attributes,
            state,
            created_by: stored.project.created_by,
            status: stored.project.status,
            status_label: stored.project.status.label(),
            actionable,
            forecasts: stored.forecasts,
            created_at: stored.project.created_at,
            updated_at: stored.updated_at,
        }
    }
}
