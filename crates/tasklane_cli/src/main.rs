//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `tasklane_core` linkage with a ping/version probe.
//! - Run a short in-memory session and print its analytics as JSON.
//!
//! Set `TASKLANE_LOG_DIR` to an absolute path to capture core logs.

use log::info;
use std::error::Error;
use tasklane_core::{
    default_log_level, init_logging, IndexConfig, InMemoryTaskRepository, SearchOptions,
    TaskDraft, TaskIndexService, TaskPatch, TemplateCatalog,
};

fn main() -> Result<(), Box<dyn Error>> {
    println!("tasklane_core ping={}", tasklane_core::ping());
    println!("tasklane_core version={}", tasklane_core::core_version());

    if let Ok(log_dir) = std::env::var("TASKLANE_LOG_DIR") {
        init_logging(default_log_level(), &log_dir)?;
    }

    run_demo()
}

fn run_demo() -> Result<(), Box<dyn Error>> {
    let mut service = TaskIndexService::new(
        InMemoryTaskRepository::new(),
        IndexConfig::default(),
        TemplateCatalog::builtin(),
    )?;

    let design = service.create_task(TaskDraft::new("Design storage layout", 4))?;
    let build = service.create_task_from_template(
        "development",
        &TaskPatch {
            title: Some("Implement storage layer".to_string()),
            ..TaskPatch::default()
        },
    )?;
    let review = service.create_task_from_template("review", &TaskPatch::default())?;

    service.add_dependency(&build.id, &design.id)?;
    service.add_dependency(&review.id, &build.id)?;
    service.update_task(
        &design.id,
        &TaskPatch {
            completed: Some(true),
            ..TaskPatch::default()
        },
    )?;
    info!("event=cli_demo module=cli status=ok tasks=3");

    let order: Vec<String> = service
        .get_tasks_by_dependency_order()?
        .into_iter()
        .map(|task| task.title)
        .collect();
    println!("dependency_order={}", serde_json::to_string(&order)?);

    let blocked: Vec<String> = service
        .get_blocked_tasks()?
        .into_iter()
        .map(|task| task.id)
        .collect();
    println!("blocked={}", serde_json::to_string(&blocked)?);

    let hits = service.search_tasks("stor", &SearchOptions::default()).len();
    println!("search_hits={hits}");

    let analytics = service.get_task_analytics()?;
    println!("{}", serde_json::to_string_pretty(&analytics)?);
    Ok(())
}
