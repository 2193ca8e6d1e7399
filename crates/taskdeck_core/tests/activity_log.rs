use taskdeck_core::db::open_db_in_memory;
use taskdeck_core::model::activity::AssigneeRef;
use taskdeck_core::{
    ActivityKind, ActivityListQuery, ActivityRepository, ActivityService, NewActivityEvent,
    RepoError, SqliteActivityRepository,
};
use uuid::Uuid;

fn event(kind: ActivityKind, description: &str) -> NewActivityEvent {
    NewActivityEvent::new(kind, description)
}

#[test]
fn append_and_read_back_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    let project = Uuid::new_v4();
    let task = Uuid::new_v4();
    let old = AssigneeRef {
        id: Uuid::new_v4(),
        name: "Dana".to_string(),
    };
    let new = AssigneeRef {
        id: Uuid::new_v4(),
        name: "Sam".to_string(),
    };

    let mut payload = event(ActivityKind::TaskAutoReassigned, "moved for capacity");
    payload.project = Some(project);
    payload.task = Some(task);
    payload.old_assignee = Some(old.clone());
    payload.new_assignee = Some(new.clone());
    payload.reason = Some("Auto reassignment due to capacity".to_string());

    let id = repo.append(&payload).unwrap();

    let page = repo.list(&ActivityListQuery::default()).unwrap();
    assert_eq!(page.total, 1);
    let stored = &page.events[0];
    assert_eq!(stored.uuid, id);
    assert_eq!(stored.kind, ActivityKind::TaskAutoReassigned);
    assert_eq!(stored.project, Some(project));
    assert_eq!(stored.task, Some(task));
    assert_eq!(stored.old_assignee.as_ref(), Some(&old));
    assert_eq!(stored.new_assignee.as_ref(), Some(&new));
    assert!(stored.created_at > 0);
}

#[test]
fn blank_description_blocks_append() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    let err = repo
        .append(&event(ActivityKind::TaskCreated, "   "))
        .unwrap_err();
    assert!(matches!(err, RepoError::ActivityValidation(_)));
}

#[test]
fn list_filters_by_kind() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    repo.append(&event(ActivityKind::TaskCreated, "created a")).unwrap();
    repo.append(&event(ActivityKind::TaskDeleted, "deleted a")).unwrap();
    repo.append(&event(ActivityKind::TaskCreated, "created b")).unwrap();

    let page = repo
        .list(&ActivityListQuery {
            kind: Some(ActivityKind::TaskCreated),
            ..ActivityListQuery::default()
        })
        .unwrap();

    assert_eq!(page.total, 2);
    assert!(page
        .events
        .iter()
        .all(|event| event.kind == ActivityKind::TaskCreated));
}

#[test]
fn list_filters_by_project_and_team() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    let project = Uuid::new_v4();
    let team = Uuid::new_v4();

    let mut scoped = event(ActivityKind::TaskUpdated, "scoped");
    scoped.project = Some(project);
    scoped.team = Some(team);
    repo.append(&scoped).unwrap();
    repo.append(&event(ActivityKind::TaskUpdated, "unscoped")).unwrap();

    let by_project = repo
        .list(&ActivityListQuery {
            project: Some(project),
            ..ActivityListQuery::default()
        })
        .unwrap();
    assert_eq!(by_project.total, 1);
    assert_eq!(by_project.events[0].description, "scoped");

    let by_team = repo
        .list(&ActivityListQuery {
            team: Some(team),
            ..ActivityListQuery::default()
        })
        .unwrap();
    assert_eq!(by_team.total, 1);

    let by_other_project = repo
        .list(&ActivityListQuery {
            project: Some(Uuid::new_v4()),
            ..ActivityListQuery::default()
        })
        .unwrap();
    assert_eq!(by_other_project.total, 0);
}

#[test]
fn pagination_reports_full_total() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();

    for index in 0..7 {
        repo.append(&event(ActivityKind::TaskCreated, &format!("event {index}")))
            .unwrap();
    }

    let page = repo
        .list(&ActivityListQuery {
            limit: Some(3),
            offset: 3,
            ..ActivityListQuery::default()
        })
        .unwrap();

    assert_eq!(page.total, 7);
    assert_eq!(page.events.len(), 3);
}

#[test]
fn service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let service = ActivityService::new(SqliteActivityRepository::try_new(&conn).unwrap());

    let id = service
        .append(&event(ActivityKind::TeamCreated, "team made"))
        .unwrap();

    let page = service.list(&ActivityListQuery::default()).unwrap();
    assert_eq!(page.events.len(), 1);
    assert_eq!(page.events[0].uuid, id);
}
