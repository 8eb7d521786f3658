use serde_json::json;
use tasklane_core::{
    IndexConfig, InMemoryTaskRepository, ManualClock, TaskDraft, TaskIndexService, TaskPatch,
    TemplateCatalog,
};

const NOW: i64 = 1_700_000_000_000;

fn service(clock: &ManualClock) -> TaskIndexService<InMemoryTaskRepository> {
    TaskIndexService::new(
        InMemoryTaskRepository::new(),
        IndexConfig::default(),
        TemplateCatalog::builtin(),
    )
    .unwrap()
    .with_clock(clock.clone())
}

#[test]
fn empty_store_reports_zeroes() {
    let service = service(&ManualClock::new(NOW));
    let analytics = service.get_task_analytics().unwrap();

    assert_eq!(analytics.total_tasks, 0);
    assert_eq!(analytics.average_priority, 0.0);
    assert!(analytics.tasks_by_category.is_empty());
    assert!(analytics.tasks_by_priority.values().all(|count| *count == 0));
    assert_eq!(analytics.tasks_by_priority.len(), 5);
}

#[test]
fn counts_and_average_priority() {
    let mut service = service(&ManualClock::new(NOW));
    for (title, priority, completed) in [("a", 1, true), ("b", 3, true), ("c", 5, false)] {
        let mut draft = TaskDraft::new(title, priority);
        draft.completed = completed;
        service.create_task(draft).unwrap();
    }

    let analytics = service.get_task_analytics().unwrap();
    assert_eq!(analytics.total_tasks, 3);
    assert_eq!(analytics.completed_tasks, 2);
    assert_eq!(analytics.pending_tasks, 1);
    assert_eq!(analytics.average_priority, 3.0);
    assert_eq!(analytics.tasks_by_priority[&1], 1);
    assert_eq!(analytics.tasks_by_priority[&2], 0);
    assert_eq!(analytics.tasks_by_priority[&5], 1);
}

#[test]
fn overdue_follows_the_service_clock() {
    let clock = ManualClock::new(NOW);
    let mut service = service(&clock);

    let mut due_soon = TaskDraft::new("due soon", 3);
    due_soon.due_date = Some(NOW + 60_000);
    let due_soon = service.create_task(due_soon).unwrap();

    let mut done_late = TaskDraft::new("done late", 3);
    done_late.due_date = Some(NOW - 60_000);
    done_late.completed = true;
    service.create_task(done_late).unwrap();

    assert_eq!(service.get_task_analytics().unwrap().overdue_tasks, 0);

    clock.advance_minutes(2);
    assert_eq!(service.get_task_analytics().unwrap().overdue_tasks, 1);

    service
        .update_task(
            &due_soon.id,
            &TaskPatch {
                completed: Some(true),
                ..TaskPatch::default()
            },
        )
        .unwrap();
    assert_eq!(service.get_task_analytics().unwrap().overdue_tasks, 0);
}

#[test]
fn time_sums_and_categories_serialize() {
    let mut service = service(&ManualClock::new(NOW));
    service
        .create_task_from_template("meeting", &TaskPatch::default())
        .unwrap();
    service
        .create_task_from_template(
            "development",
            &TaskPatch {
                actual_time: Some(Some(45)),
                ..TaskPatch::default()
            },
        )
        .unwrap();
    service.create_task(TaskDraft::new("loose end", 2)).unwrap();

    let analytics = service.get_task_analytics().unwrap();
    assert_eq!(analytics.total_estimated_time, 180);
    assert_eq!(analytics.total_actual_time, 45);

    let value = serde_json::to_value(&analytics).unwrap();
    assert_eq!(
        value["tasks_by_category"],
        json!({"Development": 1, "Work": 1})
    );
    assert_eq!(value["tasks_by_priority"]["3"], json!(2));
    assert_eq!(value["tasks_by_priority"]["2"], json!(1));
}
