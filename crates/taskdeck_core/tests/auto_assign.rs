use rusqlite::Connection;
use taskdeck_core::db::open_db_in_memory;
use taskdeck_core::{
    AssignError, Assignment, AssignmentCheck, AssignmentService, CreateTaskOptions, Project,
    ProjectRepository, SqliteProjectRepository, SqliteTaskRepository, SqliteTeamRepository, Task,
    TaskRepository, TaskStatus, Team, TeamMember, TeamRepository, TaskDraft,
};
use uuid::Uuid;

fn seed_team_and_project(conn: &Connection) -> (Team, Project) {
    let teams = SqliteTeamRepository::try_new(conn).unwrap();
    let projects = SqliteProjectRepository::try_new(conn).unwrap();

    let team = Team::new("Platform");
    teams.create_team(&team).unwrap();

    let mut project = Project::new("Rollout");
    project.team = Some(team.uuid);
    projects.create_project(&project).unwrap();

    (team, project)
}

fn add_member(conn: &Connection, team: &Team, name: &str, capacity: u8) -> TeamMember {
    let teams = SqliteTeamRepository::try_new(conn).unwrap();
    let member = TeamMember::new(team.uuid, name, "Dev", capacity);
    teams.add_member(&member).unwrap();
    member
}

fn assign_tasks(conn: &Connection, project: &Project, member: &TeamMember, count: usize) {
    let tasks = SqliteTaskRepository::try_new(conn).unwrap();
    for index in 0..count {
        let mut task = Task::new(project.uuid, format!("task {index}"));
        task.assignment = Assignment::Member(member.uuid);
        task.status = TaskStatus::Pending;
        tasks.create_task(&task).unwrap();
    }
}

#[test]
fn empty_team_has_no_members_available() {
    let mut conn = open_db_in_memory().unwrap();
    let (_, project) = seed_team_and_project(&conn);

    let service = AssignmentService::new(&mut conn);
    let err = service.auto_assign_member(project.uuid).unwrap_err();
    assert!(matches!(err, AssignError::NoMembersAvailable));
}

#[test]
fn idle_member_beats_saturated_member() {
    let mut conn = open_db_in_memory().unwrap();
    let (team, project) = seed_team_and_project(&conn);
    let a = add_member(&conn, &team, "A", 2);
    let b = add_member(&conn, &team, "B", 1);
    assign_tasks(&conn, &project, &b, 1);

    let service = AssignmentService::new(&mut conn);
    let picked = service.auto_assign_member(project.uuid).unwrap();
    assert_eq!(picked, a.uuid);
}

#[test]
fn over_capacity_member_is_never_picked_when_alternative_exists() {
    let mut conn = open_db_in_memory().unwrap();
    let (team, project) = seed_team_and_project(&conn);
    let over = add_member(&conn, &team, "Over", 1);
    let busy = add_member(&conn, &team, "Busy", 2);
    assign_tasks(&conn, &project, &over, 3);
    assign_tasks(&conn, &project, &busy, 1);

    let service = AssignmentService::new(&mut conn);
    let picked = service.auto_assign_member(project.uuid).unwrap();
    assert_eq!(picked, busy.uuid);
}

#[test]
fn sole_member_is_picked_even_when_over_capacity() {
    let mut conn = open_db_in_memory().unwrap();
    let (team, project) = seed_team_and_project(&conn);
    let only = add_member(&conn, &team, "Only", 1);
    assign_tasks(&conn, &project, &only, 2);

    let service = AssignmentService::new(&mut conn);
    let picked = service.auto_assign_member(project.uuid).unwrap();
    assert_eq!(picked, only.uuid);
}

#[test]
fn guard_warns_at_exact_capacity() {
    let mut conn = open_db_in_memory().unwrap();
    let (team, project) = seed_team_and_project(&conn);
    let dana = add_member(&conn, &team, "Dana", 2);
    assign_tasks(&conn, &project, &dana, 2);

    let service = AssignmentService::new(&mut conn);
    let check = service.check_assignment(project.uuid, dana.uuid).unwrap();
    match check {
        AssignmentCheck::Warning(warning) => {
            assert_eq!(warning.member_name, "Dana");
            assert_eq!(warning.current_tasks, 2);
            assert_eq!(warning.capacity, 2);
            assert!(warning.message.ends_with("Assign anyway?"));
        }
        AssignmentCheck::Ok => panic!("expected a capacity warning"),
    }
}

#[test]
fn guard_passes_below_capacity() {
    let mut conn = open_db_in_memory().unwrap();
    let (team, project) = seed_team_and_project(&conn);
    let dana = add_member(&conn, &team, "Dana", 2);
    assign_tasks(&conn, &project, &dana, 1);

    let service = AssignmentService::new(&mut conn);
    let check = service.check_assignment(project.uuid, dana.uuid).unwrap();
    assert_eq!(check, AssignmentCheck::Ok);
}

#[test]
fn guard_rejects_member_outside_the_team() {
    let mut conn = open_db_in_memory().unwrap();
    let (_, project) = seed_team_and_project(&conn);

    let service = AssignmentService::new(&mut conn);
    let stranger = Uuid::new_v4();
    let err = service.check_assignment(project.uuid, stranger).unwrap_err();
    assert!(matches!(err, AssignError::MemberNotInTeam(id) if id == stranger));
}

#[test]
fn create_task_with_auto_assign_picks_least_loaded() {
    let mut conn = open_db_in_memory().unwrap();
    let (team, project) = seed_team_and_project(&conn);
    let idle = add_member(&conn, &team, "Idle", 2);
    let busy = add_member(&conn, &team, "Busy", 2);
    assign_tasks(&conn, &project, &busy, 1);

    let service = AssignmentService::new(&mut conn);
    let task = service
        .create_task(
            TaskDraft::new(project.uuid, "new work"),
            CreateTaskOptions {
                auto_assign: true,
                force_assign: false,
            },
        )
        .unwrap();

    assert_eq!(task.assignment, Assignment::Member(idle.uuid));
}

#[test]
fn create_task_at_capacity_is_soft_blocked_then_forced() {
    let mut conn = open_db_in_memory().unwrap();
    let (team, project) = seed_team_and_project(&conn);
    let dana = add_member(&conn, &team, "Dana", 1);
    assign_tasks(&conn, &project, &dana, 1);

    let mut draft = TaskDraft::new(project.uuid, "one more");
    draft.assignment = Assignment::Member(dana.uuid);

    {
        let service = AssignmentService::new(&mut conn);
        let err = service
            .create_task(draft.clone(), CreateTaskOptions::default())
            .unwrap_err();
        match err {
            AssignError::CapacityExceeded(warning) => {
                assert_eq!(warning.member_name, "Dana");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    let service = AssignmentService::new(&mut conn);
    let task = service
        .create_task(
            draft,
            CreateTaskOptions {
                auto_assign: false,
                force_assign: true,
            },
        )
        .unwrap();
    assert_eq!(task.assignment, Assignment::Member(dana.uuid));

    let load = service.team_load(project.uuid).unwrap();
    assert_eq!(load.members[0].current_tasks, 2);
    assert!(load.members[0].is_over_capacity);
}

#[test]
fn create_task_for_missing_project_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let _ = seed_team_and_project(&conn);

    let service = AssignmentService::new(&mut conn);
    let missing = Uuid::new_v4();
    let err = service
        .create_task(TaskDraft::new(missing, "nowhere"), CreateTaskOptions::default())
        .unwrap_err();
    assert!(matches!(err, AssignError::ProjectNotFound(id) if id == missing));
}

#[test]
fn create_unassigned_task_skips_the_guard() {
    let mut conn = open_db_in_memory().unwrap();
    let (team, project) = seed_team_and_project(&conn);
    let dana = add_member(&conn, &team, "Dana", 0);
    assign_tasks(&conn, &project, &dana, 2);

    let service = AssignmentService::new(&mut conn);
    let task = service
        .create_task(
            TaskDraft::new(project.uuid, "backlog item"),
            CreateTaskOptions::default(),
        )
        .unwrap();
    assert_eq!(task.assignment, Assignment::Unassigned);
}
