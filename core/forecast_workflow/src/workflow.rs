//! # Workflow
//!
//! Authorization and transition rules for the two-tier review pipeline.
//!
//! | Reviewer      | Acts on                    | approve ─►                 | decline ─► |
//! |---------------|----------------------------|----------------------------|------------|
//! | state admin   | `Pending`, own state only  | `PendingCentralApproval`   | `Declined` |
//! | central admin | `PendingCentralApproval`   | `Approved`                 | `Declined` |
//!
//! Everything here is a pure function of its inputs. Callers must re-read the
//! project before deciding and persist the result with a compare-and-swap on
//! the status they decided from.

use crate::jurisdiction::JurisdictionResolver;
use crate::types::{Action, Actor, AdminLevel, Project, ProjectStatus, Role};
use crate::RejectionReason;

/// Status a new project starts in, chosen by its creator's tier.
pub fn initial_status(creator: &Actor) -> ProjectStatus {
    match (creator.role, creator.admin_level) {
        (Role::Admin, AdminLevel::Central) => ProjectStatus::Approved,
        (Role::Admin, AdminLevel::State) => ProjectStatus::PendingCentralApproval,
        _ => ProjectStatus::Pending,
    }
}

/// Decide whether `actor` may apply `action` to `project`, returning the
/// status the project moves to.
pub fn decide(
    project: &Project,
    actor: &Actor,
    action: Action,
    resolver: &dyn JurisdictionResolver,
) -> Result<ProjectStatus, RejectionReason> {
    if actor.role != Role::Admin {
        return Err(RejectionReason::Unauthorized);
    }

    match actor.admin_level {
        AdminLevel::State => {
            require_status(project, ProjectStatus::Pending, action)?;

            let project_state = resolver.resolve(&project.location);
            if !project_state.matches(actor.home_state.as_deref()) {
                return Err(RejectionReason::WrongJurisdiction {
                    project_state,
                    home_state: actor.home_state.clone(),
                });
            }

            Ok(match action {
                Action::Approve => ProjectStatus::PendingCentralApproval,
                Action::Decline => ProjectStatus::Declined,
            })
        }
        AdminLevel::Central => {
            require_status(project, ProjectStatus::PendingCentralApproval, action)?;

            Ok(match action {
                Action::Approve => ProjectStatus::Approved,
                Action::Decline => ProjectStatus::Declined,
            })
        }
        AdminLevel::None => Err(RejectionReason::Unauthorized),
    }
}

fn require_status(
    project: &Project,
    expected: ProjectStatus,
    action: Action,
) -> Result<(), RejectionReason> {
    if project.status == expected {
        Ok(())
    } else {
        Err(RejectionReason::InvalidTransition {
            from: project.status,
            action,
        })
    }
}

/// Only the creator may delete a project, whatever their role.
pub fn authorize_delete(project: &Project, actor_email: &str) -> Result<(), RejectionReason> {
    if project.created_by == actor_email {
        Ok(())
    } else {
        Err(RejectionReason::Unauthorized)
    }
}

/// Whether `actor` may see `project` in their listing.
pub fn can_view(actor: &Actor, project: &Project, resolver: &dyn JurisdictionResolver) -> bool {
    match (actor.role, actor.admin_level) {
        (Role::Employee, _) => project.created_by == actor.email,
        (Role::Admin, AdminLevel::Central) => true,
        (Role::Admin, AdminLevel::State) => resolver
            .resolve(&project.location)
            .matches(actor.home_state.as_deref()),
        (Role::Admin, AdminLevel::None) => false,
    }
}

/// Keep only the projects `actor` may see, preserving order.
pub fn visible_projects<P>(
    actor: &Actor,
    projects: impl IntoIterator<Item = P>,
    resolver: &dyn JurisdictionResolver,
) -> Vec<P>
where
    P: AsRef<Project>,
{
    projects
        .into_iter()
        .filter(|p| can_view(actor, p.as_ref(), resolver))
        .collect()
}

impl AsRef<Project> for Project {
    fn as_ref(&self) -> &Project {
        self
    }
}

/// Whether `actor` could currently act on `project` at all. Used to decide
/// which listings get review controls.
pub fn is_actionable(actor: &Actor, project: &Project, resolver: &dyn JurisdictionResolver) -> bool {
    decide(project, actor, Action::Approve, resolver).is_ok()
}
