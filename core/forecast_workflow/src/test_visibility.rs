use crate::{
    can_view, visible_projects, Actor, AdminLevel, JurisdictionTable, ProfileError, Project,
    ProjectStatus, Role,
};

fn project(id: i64, location: &str, created_by: &str, status: ProjectStatus) -> Project {
    Project {
        id,
        location: location.to_string(),
        created_by: created_by.to_string(),
        status,
        created_at: 1_700_000_000 + id,
    }
}

fn sample() -> Vec<Project> {
    vec![
        project(1, "Lucknow", "a@x", ProjectStatus::Pending),
        project(2, "Mumbai", "b@x", ProjectStatus::Pending),
        project(3, "Kanpur", "b@x", ProjectStatus::PendingCentralApproval),
        project(4, "Timbuktu", "a@x", ProjectStatus::Pending),
        project(5, "Pune", "a@x", ProjectStatus::Approved),
    ]
}

fn ids(projects: &[&Project]) -> Vec<i64> {
    projects.iter().map(|p| p.id).collect()
}

#[test]
fn test_state_admin_sees_own_state_only() {
    let table = JurisdictionTable::india();
    let projects = sample();
    let admin = Actor::state_admin("up@x", "Uttar Pradesh");
    let visible = visible_projects(&admin, projects.iter(), &table);
    assert_eq!(ids(&visible), vec![1, 3]);
}

#[test]
fn test_central_admin_sees_everything() {
    let table = JurisdictionTable::india();
    let projects = sample();
    let admin = Actor::central_admin("c@x");
    let visible = visible_projects(&admin, projects.iter(), &table);
    assert_eq!(ids(&visible), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_employee_sees_own_projects() {
    let table = JurisdictionTable::india();
    let projects = sample();
    let employee = Actor::employee("a@x", "Uttar Pradesh");
    let visible = visible_projects(&employee, projects.iter(), &table);
    assert_eq!(ids(&visible), vec![1, 4, 5]);
}

#[test]
fn test_unknown_location_hidden_from_state_admins() {
    let table = JurisdictionTable::india();
    let p = project(9, "Timbuktu", "a@x", ProjectStatus::Pending);
    for state in table.states() {
        assert!(!can_view(&Actor::state_admin("s@x", state), &p, &table));
    }
    assert!(can_view(&Actor::central_admin("c@x"), &p, &table));
}

#[test]
fn test_admin_without_level_sees_nothing() {
    let table = JurisdictionTable::india();
    let actor = Actor {
        email: "a@x".into(),
        role: Role::Admin,
        admin_level: AdminLevel::None,
        home_state: Some("Uttar Pradesh".into()),
    };
    assert!(visible_projects(&actor, sample(), &table).is_empty());
}

#[test]
fn test_visible_projects_accepts_owned_items() {
    let table = JurisdictionTable::india();
    let admin = Actor::state_admin("mh@x", "Maharashtra");
    let visible = visible_projects(&admin, sample(), &table);
    assert_eq!(visible.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2, 5]);
}

#[test]
fn test_actor_validation() {
    assert!(Actor::employee("e@x", "Delhi").validate().is_ok());
    assert!(Actor::state_admin("s@x", "Delhi").validate().is_ok());
    assert!(Actor::central_admin("c@x").validate().is_ok());

    let mut employee = Actor::employee("e@x", "Delhi");
    employee.home_state = None;
    assert_eq!(employee.validate(), Err(ProfileError::MissingHomeState));

    let mut state = Actor::state_admin("s@x", "Delhi");
    state.home_state = Some("  ".into());
    assert_eq!(state.validate(), Err(ProfileError::MissingHomeState));

    let mut employee = Actor::employee("e@x", "Delhi");
    employee.admin_level = AdminLevel::Central;
    assert_eq!(
        employee.validate(),
        Err(ProfileError::EmployeeWithAdminLevel)
    );

    assert_eq!(
        Actor::central_admin("").validate(),
        Err(ProfileError::MissingEmail)
    );
}

#[test]
fn test_actor_normalization() {
    let mut central = Actor::central_admin("c@x");
    central.home_state = Some("Delhi".into());
    assert_eq!(central.normalized().home_state, None);

    let state = Actor::state_admin("s@x", "Delhi").normalized();
    assert_eq!(state.home_state.as_deref(), Some("Delhi"));
}

#[test]
fn test_status_parsing_and_labels() {
    assert_eq!(
        "pending central approval".parse::<ProjectStatus>(),
        Ok(ProjectStatus::PendingCentralApproval)
    );
    assert_eq!(
        "pending_central_approval".parse::<ProjectStatus>(),
        Ok(ProjectStatus::PendingCentralApproval)
    );
    assert!("archived".parse::<ProjectStatus>().is_err());

    assert_eq!(ProjectStatus::Pending.label(), "Pending State Approval");
    assert_eq!(
        ProjectStatus::PendingCentralApproval.label(),
        "Pending Central Approval"
    );
    assert!(ProjectStatus::Declined.is_terminal());
    assert!(!ProjectStatus::PendingCentralApproval.is_terminal());
}

#[test]
fn test_status_serde_accepts_legacy_spelling() {
    let status: ProjectStatus = serde_json::from_str("\"pending central approval\"").unwrap();
    assert_eq!(status, ProjectStatus::PendingCentralApproval);
    assert_eq!(
        serde_json::to_string(&status).unwrap(),
        "\"pending_central_approval\""
    );
}
