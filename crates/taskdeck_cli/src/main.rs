//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskdeck_core` linkage.
//! - Exercise one seeded rebalance end to end against an in-memory store.

use taskdeck_core::db::migrations::latest_version;
use taskdeck_core::db::open_db_in_memory;
use taskdeck_core::{
    Assignment, AssignmentService, Project, SqliteProjectRepository, SqliteTaskRepository,
    SqliteTeamRepository, Task, TaskPriority, Team, TeamMember, TeamRepository,
};
use taskdeck_core::{ProjectRepository, TaskRepository};

fn main() {
    println!("taskdeck_core version={}", taskdeck_core::core_version());
    println!("taskdeck_core schema_version={}", latest_version());

    match smoke_rebalance() {
        Ok(moved) => println!("taskdeck_core smoke_rebalance moved={moved}"),
        Err(err) => {
            eprintln!("taskdeck_core smoke_rebalance failed: {err}");
            std::process::exit(1);
        }
    }
}

/// Seeds one overloaded and one idle member, then runs a rebalance.
fn smoke_rebalance() -> Result<usize, Box<dyn std::error::Error>> {
    let mut conn = open_db_in_memory()?;

    let team = Team::new("Demo Team");
    let overloaded = TeamMember::new(team.uuid, "Ada", "Backend", 1);
    let idle = TeamMember::new(team.uuid, "Grace", "Frontend", 3);
    let mut project = Project::new("Demo Project");
    project.team = Some(team.uuid);

    {
        let teams = SqliteTeamRepository::try_new(&conn)?;
        teams.create_team(&team)?;
        teams.add_member(&overloaded)?;
        teams.add_member(&idle)?;

        let projects = SqliteProjectRepository::try_new(&conn)?;
        projects.create_project(&project)?;

        let tasks = SqliteTaskRepository::try_new(&conn)?;
        for title in ["triage inbox", "write changelog"] {
            let mut task = Task::new(project.uuid, title);
            task.assignment = Assignment::Member(overloaded.uuid);
            task.priority = TaskPriority::Low;
            tasks.create_task(&task)?;
        }
    }

    let mut service = AssignmentService::new(&mut conn);
    let outcome = service.rebalance(project.uuid, None)?;
    Ok(outcome.moved_count())
}
