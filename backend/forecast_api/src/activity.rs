//! Activity log entries written for every project mutation.

use serde::{Deserialize, Serialize};

/// All recognised activity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// A project was submitted.
    ProjectCreated,
    /// A reviewer approved a project (state or central tier).
    ProjectApproved,
    /// A reviewer declined a project.
    ProjectDeclined,
    /// The creator removed a project.
    ProjectDeleted,
    /// An actor profile was registered.
    ActorRegistered,
    /// A kind stored by a newer version that we don't recognise.
    Unknown,
}

impl ActivityKind {
    pub fn from_column(kind: &str) -> Self {
        match kind {
            "project_created" => Self::ProjectCreated,
            "project_approved" => Self::ProjectApproved,
            "project_declined" => Self::ProjectDeclined,
            "project_deleted" => Self::ProjectDeleted,
            "actor_registered" => Self::ActorRegistered,
            _ => Self::Unknown,
        }
    }

    /// Short identifier stored in the `kind` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectCreated => "project_created",
            Self::ProjectApproved => "project_approved",
            Self::ProjectDeclined => "project_declined",
            Self::ProjectDeleted => "project_deleted",
            Self::ActorRegistered => "actor_registered",
            Self::Unknown => "unknown",
        }
    }
}

/// An activity entry ready to be written.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub kind: ActivityKind,
    pub project_id: Option<i64>,
    pub actor: String,
    pub detail: String,
}

/// An activity entry as read back from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityRecord {
    pub id: i64,
    pub kind: String,
    pub project_id: Option<i64>,
    pub actor: String,
    pub detail: String,
    pub created_at: i64,
}
