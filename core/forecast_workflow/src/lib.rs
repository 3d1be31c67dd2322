//! # Forecast Workflow
//!
//! Approval engine for material demand forecasting projects. Every project
//! passes through two review tiers before it is final:
//!
//! | Phase        | Function(s)                                  |
//! |--------------|----------------------------------------------|
//! | Submission   | [`initial_status`]                           |
//! | Review       | [`decide`]                                   |
//! | Removal      | [`authorize_delete`]                         |
//! | Listing      | [`can_view`], [`visible_projects`]           |
//! | Jurisdiction | [`JurisdictionResolver`], [`JurisdictionTable`] |
//!
//! ## Architecture
//!
//! The crate performs no I/O and holds no state. Persistence, concurrency
//! control and transport belong to the caller; see `backend/forecast_api`.

use thiserror::Error;

pub mod jurisdiction;
mod types;
mod workflow;

#[cfg(test)]
mod test_visibility;
#[cfg(test)]
mod test_workflow;

pub use jurisdiction::{Jurisdiction, JurisdictionResolver, JurisdictionTable, StateEntry};
pub use types::{
    Action, Actor, AdminLevel, Project, ProjectAttributes, ProjectStatus, Role,
};
pub use workflow::{
    authorize_delete, can_view, decide, initial_status, is_actionable, visible_projects,
};

/// Why a review or delete request was refused.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum RejectionReason {
    #[error("actor is not permitted to perform this action")]
    Unauthorized,

    #[error("cannot {action} a project with status {from}")]
    InvalidTransition {
        from: ProjectStatus,
        action: Action,
    },

    #[error("project is in {project_state}, outside the reviewer's state ({})", .home_state.as_deref().unwrap_or("none"))]
    WrongJurisdiction {
        project_state: Jurisdiction,
        home_state: Option<String>,
    },
}

/// Invalid actor profile or unrecognised enum value.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ProfileError {
    #[error("email is required")]
    MissingEmail,

    #[error("employees and state admins must have a home state")]
    MissingHomeState,

    #[error("employees cannot have an admin level")]
    EmployeeWithAdminLevel,

    #[error("unknown {field}: {value:?}")]
    UnknownValue { field: &'static str, value: String },
}
