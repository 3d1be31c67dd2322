use crate::invariants::apply;
use crate::{
    authorize_delete, decide, initial_status, is_actionable, Action, Actor, AdminLevel,
    Jurisdiction, JurisdictionTable, Project, ProjectStatus, RejectionReason, Role,
};

const ALL_STATUSES: [ProjectStatus; 4] = [
    ProjectStatus::Pending,
    ProjectStatus::PendingCentralApproval,
    ProjectStatus::Approved,
    ProjectStatus::Declined,
];

const ALL_ACTIONS: [Action; 2] = [Action::Approve, Action::Decline];

fn project(location: &str, status: ProjectStatus) -> Project {
    Project {
        id: 7,
        location: location.to_string(),
        created_by: "emp@example.com".to_string(),
        status,
        created_at: 1_700_000_000,
    }
}

fn table() -> JurisdictionTable {
    JurisdictionTable::india()
}

#[test]
fn test_initial_status_by_creator() {
    assert_eq!(
        initial_status(&Actor::employee("e@x", "Delhi")),
        ProjectStatus::Pending
    );
    assert_eq!(
        initial_status(&Actor::state_admin("s@x", "Delhi")),
        ProjectStatus::PendingCentralApproval
    );
    assert_eq!(
        initial_status(&Actor::central_admin("c@x")),
        ProjectStatus::Approved
    );
}

#[test]
fn test_initial_status_for_admin_without_level() {
    let actor = Actor {
        email: "a@x".into(),
        role: Role::Admin,
        admin_level: AdminLevel::None,
        home_state: None,
    };
    assert_eq!(initial_status(&actor), ProjectStatus::Pending);
}

#[test]
fn test_employee_cannot_review() {
    let employee = Actor::employee("e@x", "Uttar Pradesh");
    for status in ALL_STATUSES {
        for action in ALL_ACTIONS {
            assert_eq!(
                decide(&project("Lucknow", status), &employee, action, &table()),
                Err(RejectionReason::Unauthorized)
            );
        }
    }
}

#[test]
fn test_admin_without_level_cannot_review() {
    let actor = Actor {
        email: "a@x".into(),
        role: Role::Admin,
        admin_level: AdminLevel::None,
        home_state: Some("Uttar Pradesh".into()),
    };
    assert_eq!(
        decide(
            &project("Lucknow", ProjectStatus::Pending),
            &actor,
            Action::Approve,
            &table()
        ),
        Err(RejectionReason::Unauthorized)
    );
}

#[test]
fn test_state_admin_jurisdiction_scenario() {
    let p = project("Lucknow", ProjectStatus::Pending);

    let outsider = Actor::state_admin("mh@x", "Maharashtra");
    assert_eq!(
        decide(&p, &outsider, Action::Approve, &table()),
        Err(RejectionReason::WrongJurisdiction {
            project_state: Jurisdiction::State("Uttar Pradesh".into()),
            home_state: Some("Maharashtra".into()),
        })
    );

    let local = Actor::state_admin("up@x", "Uttar Pradesh");
    let next = decide(&p, &local, Action::Approve, &table()).unwrap();
    assert_eq!(next, ProjectStatus::PendingCentralApproval);
    apply(&p, Action::Approve, next);
}

#[test]
fn test_state_admin_decline_yields_declined() {
    let p = project("Kanpur", ProjectStatus::Pending);
    let admin = Actor::state_admin("up@x", "Uttar Pradesh");
    let next = decide(&p, &admin, Action::Decline, &table()).unwrap();
    assert_eq!(next, ProjectStatus::Declined);
    apply(&p, Action::Decline, next);
}

#[test]
fn test_state_admin_only_acts_on_pending() {
    let admin = Actor::state_admin("up@x", "Uttar Pradesh");
    for status in [
        ProjectStatus::PendingCentralApproval,
        ProjectStatus::Approved,
        ProjectStatus::Declined,
    ] {
        for action in ALL_ACTIONS {
            assert_eq!(
                decide(&project("Lucknow", status), &admin, action, &table()),
                Err(RejectionReason::InvalidTransition {
                    from: status,
                    action
                })
            );
        }
    }
}

#[test]
fn test_state_admin_cannot_skip_central_review() {
    let admin = Actor::state_admin("up@x", "Uttar Pradesh");
    let mut p = project("Agra", ProjectStatus::Pending);
    let next = decide(&p, &admin, Action::Approve, &table()).unwrap();
    assert_ne!(next, ProjectStatus::Approved);
    p = apply(&p, Action::Approve, next);

    // A second state-level approve does not push the project any further.
    assert!(matches!(
        decide(&p, &admin, Action::Approve, &table()),
        Err(RejectionReason::InvalidTransition { .. })
    ));
}

#[test]
fn test_state_admin_without_home_state_is_rejected() {
    let admin = Actor {
        email: "s@x".into(),
        role: Role::Admin,
        admin_level: AdminLevel::State,
        home_state: None,
    };
    assert!(matches!(
        decide(
            &project("Lucknow", ProjectStatus::Pending),
            &admin,
            Action::Approve,
            &table()
        ),
        Err(RejectionReason::WrongJurisdiction { .. })
    ));
}

#[test]
fn test_unknown_location_blocks_every_state_admin() {
    let p = project("Timbuktu", ProjectStatus::Pending);
    for state in table().states() {
        let admin = Actor::state_admin("s@x", state);
        for action in ALL_ACTIONS {
            assert_eq!(
                decide(&p, &admin, action, &table()),
                Err(RejectionReason::WrongJurisdiction {
                    project_state: Jurisdiction::Unknown,
                    home_state: Some(state.to_string()),
                })
            );
        }
    }

    // Not even an admin whose home state is literally "Unknown".
    let admin = Actor::state_admin("s@x", "Unknown");
    assert!(decide(&p, &admin, Action::Approve, &table()).is_err());
}

#[test]
fn test_central_admin_only_acts_on_escalated() {
    let central = Actor::central_admin("c@x");
    for status in [
        ProjectStatus::Pending,
        ProjectStatus::Approved,
        ProjectStatus::Declined,
    ] {
        for action in ALL_ACTIONS {
            assert_eq!(
                decide(&project("Mumbai", status), &central, action, &table()),
                Err(RejectionReason::InvalidTransition {
                    from: status,
                    action
                })
            );
        }
    }
}

#[test]
fn test_central_admin_has_no_jurisdiction_limit() {
    let central = Actor::central_admin("c@x");
    for city in ["Lucknow", "Chennai", "Timbuktu"] {
        let p = project(city, ProjectStatus::PendingCentralApproval);
        assert_eq!(
            decide(&p, &central, Action::Approve, &table()),
            Ok(ProjectStatus::Approved)
        );
    }
}

#[test]
fn test_central_decline_then_approve_scenario() {
    let central = Actor::central_admin("c@x");
    let p = project("Pune", ProjectStatus::PendingCentralApproval);

    let next = decide(&p, &central, Action::Decline, &table()).unwrap();
    assert_eq!(next, ProjectStatus::Declined);
    let p = apply(&p, Action::Decline, next);

    let reviewers = [
        Actor::central_admin("c2@x"),
        Actor::state_admin("mh@x", "Maharashtra"),
    ];
    for reviewer in &reviewers {
        assert_eq!(
            decide(&p, reviewer, Action::Approve, &table()),
            Err(RejectionReason::InvalidTransition {
                from: ProjectStatus::Declined,
                action: Action::Approve,
            })
        );
    }
}

#[test]
fn test_terminal_rejection_is_stable() {
    let central = Actor::central_admin("c@x");
    let p = project("Surat", ProjectStatus::Approved);
    let first = decide(&p, &central, Action::Decline, &table());
    let second = decide(&p, &central, Action::Decline, &table());
    assert!(first.is_err());
    assert_eq!(first, second);
}

#[test]
fn test_full_pipeline() {
    let state = Actor::state_admin("gj@x", "Gujarat");
    let central = Actor::central_admin("c@x");
    let p = project("Ahmedabad", initial_status(&Actor::employee("e@x", "Gujarat")));

    let next = decide(&p, &state, Action::Approve, &table()).unwrap();
    let p = apply(&p, Action::Approve, next);
    let next = decide(&p, &central, Action::Approve, &table()).unwrap();
    let p = apply(&p, Action::Approve, next);

    assert_eq!(p.status, ProjectStatus::Approved);
    assert!(p.status.is_terminal());
}

#[test]
fn test_smaller_injected_table() {
    let table = JurisdictionTable::from_pairs([("Goa", vec!["Panaji"])]);
    let admin = Actor::state_admin("g@x", "Goa");
    assert_eq!(
        decide(
            &project("Panaji", ProjectStatus::Pending),
            &admin,
            Action::Approve,
            &table
        ),
        Ok(ProjectStatus::PendingCentralApproval)
    );
    // Lucknow is not in this table.
    let admin = Actor::state_admin("up@x", "Uttar Pradesh");
    assert!(decide(
        &project("Lucknow", ProjectStatus::Pending),
        &admin,
        Action::Approve,
        &table
    )
    .is_err());
}

#[test]
fn test_delete_only_by_creator() {
    let p = project("Delhi", ProjectStatus::Approved);
    assert_eq!(authorize_delete(&p, "emp@example.com"), Ok(()));
    assert_eq!(
        authorize_delete(&p, "central@example.com"),
        Err(RejectionReason::Unauthorized)
    );
    assert_eq!(
        authorize_delete(&p, "EMP@example.com"),
        Err(RejectionReason::Unauthorized)
    );
}

#[test]
fn test_delete_ignores_status() {
    for status in ALL_STATUSES {
        assert!(authorize_delete(&project("Delhi", status), "emp@example.com").is_ok());
    }
}

#[test]
fn test_is_actionable() {
    let state = Actor::state_admin("d@x", "Delhi");
    let central = Actor::central_admin("c@x");
    let pending = project("Delhi", ProjectStatus::Pending);
    let escalated = project("Delhi", ProjectStatus::PendingCentralApproval);

    assert!(is_actionable(&state, &pending, &table()));
    assert!(!is_actionable(&state, &escalated, &table()));
    assert!(!is_actionable(&central, &pending, &table()));
    assert!(is_actionable(&central, &escalated, &table()));
}

#[test]
fn test_rejection_messages() {
    let err = RejectionReason::InvalidTransition {
        from: ProjectStatus::Approved,
        action: Action::Approve,
    };
    assert_eq!(err.to_string(), "cannot approve a project with status approved");

    let err = RejectionReason::WrongJurisdiction {
        project_state: Jurisdiction::Unknown,
        home_state: None,
    };
    assert_eq!(
        err.to_string(),
        "project is in Unknown, outside the reviewer's state (none)"
    );
}
