//! # Types
//!
//! Shared data structures used across the workflow engine.
//!
//! ## Status as a Finite-State Machine
//!
//! [`ProjectStatus`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! Pending ──► PendingCentralApproval ──► Approved
//!    │                 │
//!    └──► Declined ◄───┘
//! ```
//!
//! The initial status is chosen at creation time from the creator's role, so
//! a project may also *start* in `PendingCentralApproval` or `Approved`.
//! `Approved` and `Declined` are terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProfileError;

/// Whether an actor submits projects or reviews them.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee,
    Admin,
}

/// Review tier of an admin. Employees always carry `None`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminLevel {
    #[default]
    None,
    State,
    Central,
}

/// The authenticated user performing an action.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub admin_level: AdminLevel,
    /// Required for employees and state admins; ignored for central admins.
    #[serde(default)]
    pub home_state: Option<String>,
}

impl Actor {
    pub fn employee(email: impl Into<String>, home_state: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: Role::Employee,
            admin_level: AdminLevel::None,
            home_state: Some(home_state.into()),
        }
    }

    pub fn state_admin(email: impl Into<String>, home_state: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: Role::Admin,
            admin_level: AdminLevel::State,
            home_state: Some(home_state.into()),
        }
    }

    pub fn central_admin(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: Role::Admin,
            admin_level: AdminLevel::Central,
            home_state: None,
        }
    }

    pub fn is_state_admin(&self) -> bool {
        self.role == Role::Admin && self.admin_level == AdminLevel::State
    }

    pub fn is_central_admin(&self) -> bool {
        self.role == Role::Admin && self.admin_level == AdminLevel::Central
    }

    /// Check that the profile carries the fields its role needs.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.email.trim().is_empty() {
            return Err(ProfileError::MissingEmail);
        }
        if self.role == Role::Employee && self.admin_level != AdminLevel::None {
            return Err(ProfileError::EmployeeWithAdminLevel);
        }
        let needs_state = self.role == Role::Employee || self.is_state_admin();
        let has_state = self
            .home_state
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());
        if needs_state && !has_state {
            return Err(ProfileError::MissingHomeState);
        }
        Ok(())
    }

    /// Drop fields that carry no meaning for this role.
    pub fn normalized(mut self) -> Self {
        if self.is_central_admin() {
            self.home_state = None;
        }
        if self.role == Role::Employee {
            self.admin_level = AdminLevel::None;
        }
        self
    }
}

/// Lifecycle status of a project.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Submitted by an employee; waiting on the state admin.
    Pending,
    /// Cleared at state level (or submitted by a state admin).
    #[serde(alias = "pending central approval")]
    PendingCentralApproval,
    /// Final sign-off given.
    Approved,
    /// Rejected at either tier.
    Declined,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::PendingCentralApproval => "pending_central_approval",
            Self::Approved => "approved",
            Self::Declined => "declined",
        }
    }

    /// Human-readable label shown next to a project.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending State Approval",
            Self::PendingCentralApproval => "Pending Central Approval",
            Self::Approved => "Approved",
            Self::Declined => "Declined",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Declined)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(Self::Pending),
            "pending_central_approval" | "pending central approval" => {
                Ok(Self::PendingCentralApproval)
            }
            "approved" => Ok(Self::Approved),
            "declined" => Ok(Self::Declined),
            other => Err(ProfileError::UnknownValue {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// A reviewer's verdict on a project.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[serde(alias = "approved")]
    Approve,
    #[serde(alias = "declined")]
    Decline,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Decline => "decline",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "employee" => Ok(Self::Employee),
            "admin" => Ok(Self::Admin),
            other => Err(ProfileError::UnknownValue {
                field: "role",
                value: other.to_string(),
            }),
        }
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for AdminLevel {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" => Ok(Self::None),
            "state" => Ok(Self::State),
            "central" => Ok(Self::Central),
            other => Err(ProfileError::UnknownValue {
                field: "admin_level",
                value: other.to_string(),
            }),
        }
    }
}

impl AdminLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::State => "state",
            Self::Central => "central",
        }
    }
}

/// Inputs to the forecasting model. Never interpreted by the workflow.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAttributes {
    pub project_name: String,
    pub budget: String,
    pub location: String,
    pub tower_type: String,
    pub substation_type: String,
    pub geo: String,
    pub taxes: String,
}

/// Snapshot of a project as the engine sees it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Assigned by the persistence layer.
    pub id: i64,
    /// City the project is located in.
    pub location: String,
    /// Creator's email; immutable.
    pub created_by: String,
    pub status: ProjectStatus,
    /// Unix seconds; immutable.
    pub created_at: i64,
}
