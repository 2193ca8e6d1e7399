use rusqlite::Connection;
use taskdeck_core::db::migrations::latest_version;
use taskdeck_core::db::open_db_in_memory;
use taskdeck_core::{
    Assignment, Project, ProjectRepository, RepoError, SqliteProjectRepository,
    SqliteTaskRepository, SqliteTeamRepository, Task, TaskPriority, TaskRepository, TaskStatus,
    Team, TeamMember, TeamRepository,
};

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

#[test]
fn create_and_get_project_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let (team, project) = seed_team_and_project(&conn);

    let projects = SqliteProjectRepository::try_new(&conn).unwrap();
    let loaded = projects.get_project(project.uuid).unwrap().unwrap();
    assert_eq!(loaded.name, "Rollout");
    assert_eq!(loaded.team, Some(team.uuid));
}

#[test]
fn create_and_get_task_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let (_, project) = seed_team_and_project(&conn);
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut task = Task::new(project.uuid, "ship the feature");
    task.description = Some("behind a flag".to_string());
    task.priority = TaskPriority::High;
    tasks.create_task(&task).unwrap();

    let loaded = tasks.get_task(task.uuid).unwrap().unwrap();
    assert_eq!(loaded.title, "ship the feature");
    assert_eq!(loaded.description.as_deref(), Some("behind a flag"));
    assert_eq!(loaded.priority, TaskPriority::High);
    assert_eq!(loaded.status, TaskStatus::Pending);
    assert_eq!(loaded.assignment, Assignment::Unassigned);
}

#[test]
fn update_task_status_and_assignee() {
    let conn = open_db_in_memory().unwrap();
    let (team, project) = seed_team_and_project(&conn);

    let teams = SqliteTeamRepository::try_new(&conn).unwrap();
    let member = TeamMember::new(team.uuid, "Dana", "Backend", 3);
    teams.add_member(&member).unwrap();

    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut task = Task::new(project.uuid, "ship the feature");
    tasks.create_task(&task).unwrap();

    task.status = TaskStatus::InProgress;
    task.assignment = Assignment::Member(member.uuid);
    tasks.update_task(&task).unwrap();

    let loaded = tasks.get_task(task.uuid).unwrap().unwrap();
    assert_eq!(loaded.status, TaskStatus::InProgress);
    assert_eq!(loaded.assignment, Assignment::Member(member.uuid));
}

#[test]
fn update_missing_task_is_an_error() {
    let conn = open_db_in_memory().unwrap();
    let (_, project) = seed_team_and_project(&conn);
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();

    let task = Task::new(project.uuid, "never stored");
    let err = tasks.update_task(&task).unwrap_err();
    assert!(matches!(err, RepoError::TaskNotFound(id) if id == task.uuid));
}

#[test]
fn blank_title_blocks_create() {
    let conn = open_db_in_memory().unwrap();
    let (_, project) = seed_team_and_project(&conn);
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();

    let task = Task::new(project.uuid, "  ");
    let err = tasks.create_task(&task).unwrap_err();
    assert!(matches!(err, RepoError::TaskValidation(_)));
}

#[test]
fn deleting_project_removes_its_tasks() {
    let conn = open_db_in_memory().unwrap();
    let (_, project) = seed_team_and_project(&conn);

    let projects = SqliteProjectRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();

    let task = Task::new(project.uuid, "doomed");
    tasks.create_task(&task).unwrap();

    projects.delete_project(project.uuid).unwrap();

    assert!(projects.get_project(project.uuid).unwrap().is_none());
    assert!(tasks.get_task(task.uuid).unwrap().is_none());
}

#[test]
fn removing_member_unassigns_their_tasks() {
    let conn = open_db_in_memory().unwrap();
    let (team, project) = seed_team_and_project(&conn);

    let teams = SqliteTeamRepository::try_new(&conn).unwrap();
    let member = TeamMember::new(team.uuid, "Dana", "Backend", 3);
    teams.add_member(&member).unwrap();

    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut task = Task::new(project.uuid, "orphaned soon");
    task.assignment = Assignment::Member(member.uuid);
    tasks.create_task(&task).unwrap();

    teams.remove_member(member.uuid).unwrap();

    let loaded = tasks.get_task(task.uuid).unwrap().unwrap();
    assert_eq!(loaded.assignment, Assignment::Unassigned);
}

#[test]
fn list_by_project_returns_only_that_projects_tasks() {
    let conn = open_db_in_memory().unwrap();
    let (team, project) = seed_team_and_project(&conn);

    let projects = SqliteProjectRepository::try_new(&conn).unwrap();
    let mut other = Project::new("Other");
    other.team = Some(team.uuid);
    projects.create_project(&other).unwrap();

    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    tasks.create_task(&Task::new(project.uuid, "mine")).unwrap();
    tasks.create_task(&Task::new(other.uuid, "theirs")).unwrap();

    let listed = tasks.list_by_project(project.uuid).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "mine");
}

#[test]
fn repository_rejects_connection_without_required_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteTaskRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("tasks"))
    ));
}
