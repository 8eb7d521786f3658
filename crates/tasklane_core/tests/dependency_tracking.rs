use tasklane_core::{
    IndexConfig, InMemoryTaskRepository, ServiceError, Task, TaskDraft, TaskIndexService,
    TaskPatch, TaskRepository, TemplateCatalog,
};

fn service() -> TaskIndexService<InMemoryTaskRepository> {
    TaskIndexService::new(
        InMemoryTaskRepository::new(),
        IndexConfig::default(),
        TemplateCatalog::builtin(),
    )
    .unwrap()
}

fn ids(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.id.as_str()).collect()
}

fn position(order: &[Task], id: &str) -> usize {
    order.iter().position(|task| task.id == id).unwrap()
}

fn complete(service: &mut TaskIndexService<InMemoryTaskRepository>, id: &str) {
    service
        .update_task(
            id,
            &TaskPatch {
                completed: Some(true),
                ..TaskPatch::default()
            },
        )
        .unwrap();
}

#[test]
fn reverse_link_is_rejected_and_first_link_survives() {
    let mut service = service();
    let a = service.create_task(TaskDraft::new("A", 3)).unwrap();
    let b = service.create_task(TaskDraft::new("B", 3)).unwrap();

    service.add_dependency(&a.id, &b.id).unwrap();
    let err = service.add_dependency(&b.id, &a.id).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::CycleDetected { ref task_id, ref dependency_id }
            if *task_id == b.id && *dependency_id == a.id
    ));
    assert_eq!(service.get_task_by_id(&a.id).unwrap().dependencies, vec![b.id.clone()]);
    assert!(service.get_task_by_id(&b.id).unwrap().dependencies.is_empty());

    let order = service.get_tasks_by_dependency_order().unwrap();
    assert!(position(&order, &b.id) < position(&order, &a.id));
}

#[test]
fn longer_cycle_is_rejected() {
    let mut service = service();
    let one = service.create_task(TaskDraft::new("1", 3)).unwrap();
    let two = service.create_task(TaskDraft::new("2", 3)).unwrap();
    let three = service.create_task(TaskDraft::new("3", 3)).unwrap();

    service.add_dependency(&one.id, &two.id).unwrap();
    service.add_dependency(&two.id, &three.id).unwrap();
    assert!(matches!(
        service.add_dependency(&three.id, &one.id),
        Err(ServiceError::CycleDetected { .. })
    ));

    let order = service.get_tasks_by_dependency_order().unwrap();
    assert_eq!(ids(&order), vec![three.id.as_str(), two.id.as_str(), one.id.as_str()]);
}

#[test]
fn self_and_unknown_links_are_rejected() {
    let mut service = service();
    let a = service.create_task(TaskDraft::new("A", 3)).unwrap();

    assert!(matches!(
        service.add_dependency(&a.id, &a.id),
        Err(ServiceError::SelfDependency(_))
    ));
    assert!(matches!(
        service.add_dependency(&a.id, "77"),
        Err(ServiceError::NotFound(id)) if id == "77"
    ));
    assert!(matches!(
        service.add_dependency("77", &a.id),
        Err(ServiceError::NotFound(id)) if id == "77"
    ));
}

#[test]
fn repeated_link_is_a_no_op() {
    let mut service = service();
    let a = service.create_task(TaskDraft::new("A", 3)).unwrap();
    let b = service.create_task(TaskDraft::new("B", 3)).unwrap();

    service.add_dependency(&a.id, &b.id).unwrap();
    let again = service.add_dependency(&a.id, &b.id).unwrap();

    assert_eq!(again.dependencies, vec![b.id.clone()]);
}

#[test]
fn update_with_cyclic_dependency_list_writes_nothing() {
    let mut service = service();
    let a = service.create_task(TaskDraft::new("A", 3)).unwrap();
    let b = service.create_task(TaskDraft::new("B", 3)).unwrap();
    service.add_dependency(&a.id, &b.id).unwrap();

    let err = service
        .update_task(
            &b.id,
            &TaskPatch {
                dependencies: Some(vec![a.id.clone()]),
                title: Some("B renamed".to_string()),
                ..TaskPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::CycleDetected { dependency_id, .. } if dependency_id == a.id
    ));
    assert_eq!(service.get_task_by_id(&b.id).unwrap().title, "B");

    let err = service
        .update_task(
            &b.id,
            &TaskPatch {
                dependencies: Some(vec![b.id.clone()]),
                ..TaskPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::SelfDependency(_)));
}

#[test]
fn replacing_dependencies_through_update_rebuilds_graph() {
    let mut service = service();
    let a = service.create_task(TaskDraft::new("A", 3)).unwrap();
    let b = service.create_task(TaskDraft::new("B", 3)).unwrap();
    service.add_dependency(&a.id, &b.id).unwrap();

    service
        .update_task(
            &a.id,
            &TaskPatch {
                dependencies: Some(Vec::new()),
                ..TaskPatch::default()
            },
        )
        .unwrap();

    // The old edge is gone, so the reverse link is now legal.
    service.add_dependency(&b.id, &a.id).unwrap();
    let order = service.get_tasks_by_dependency_order().unwrap();
    assert!(position(&order, &a.id) < position(&order, &b.id));
}

#[test]
fn completing_the_prerequisite_unblocks_the_dependent() {
    let mut service = service();
    let urgent = service.create_task(TaskDraft::new("urgent", 5)).unwrap();
    let dependent = service.create_task(TaskDraft::new("dependent", 2)).unwrap();
    service.create_task(TaskDraft::new("other", 4)).unwrap();
    service.add_dependency(&dependent.id, &urgent.id).unwrap();

    assert_eq!(service.get_tasks_by_priority()[0].id, urgent.id);
    assert_eq!(ids(&service.get_blocked_tasks().unwrap()), vec![dependent.id.as_str()]);

    complete(&mut service, &urgent.id);
    assert!(service.get_blocked_tasks().unwrap().is_empty());
}

#[test]
fn missing_prerequisite_blocks_and_completed_dependents_never_do() {
    let mut repo = InMemoryTaskRepository::new();
    let mut draft = TaskDraft::new("waits on ghost", 3);
    draft.dependencies = vec!["ghost".to_string()];
    let waiting = repo.create_task(&draft).unwrap();
    let mut service =
        TaskIndexService::new(repo, IndexConfig::default(), TemplateCatalog::builtin()).unwrap();

    let prerequisite = service.create_task(TaskDraft::new("prerequisite", 3)).unwrap();
    let finished = service.create_task(TaskDraft::new("finished", 3)).unwrap();
    service.add_dependency(&finished.id, &prerequisite.id).unwrap();
    complete(&mut service, &finished.id);

    assert_eq!(ids(&service.get_blocked_tasks().unwrap()), vec![waiting.id.as_str()]);
}

#[test]
fn forward_reference_on_create_is_rejected_and_nothing_is_stored() {
    let mut service = service();
    let mut draft = TaskDraft::new("A", 3);
    draft.dependencies = vec!["2".to_string()];

    let err = service.create_task(draft).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref id) if id == "2"));
    assert!(service.get_all_tasks().unwrap().is_empty());

    let first = service.create_task(TaskDraft::new("B", 3)).unwrap();
    let second = service.create_task(TaskDraft::new("C", 3)).unwrap();
    let third = service.create_task(TaskDraft::new("D", 3)).unwrap();
    assert_eq!(second.id, "2");

    let mut draft = TaskDraft::new("E", 3);
    draft.dependencies = vec![first.id.clone()];
    service.create_task(draft).unwrap();
    service.add_dependency(&second.id, &third.id).unwrap();

    let order = service.get_tasks_by_dependency_order().unwrap();
    assert_eq!(order.len(), 4);
    assert!(position(&order, &third.id) < position(&order, &second.id));
}

#[test]
fn update_naming_an_unknown_dependency_writes_nothing() {
    let mut service = service();
    let a = service.create_task(TaskDraft::new("A", 3)).unwrap();

    let err = service
        .update_task(
            &a.id,
            &TaskPatch {
                dependencies: Some(vec!["99".to_string()]),
                title: Some("A renamed".to_string()),
                ..TaskPatch::default()
            },
        )
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound(ref id) if id == "99"));
    let stored = service.get_task_by_id(&a.id).unwrap();
    assert_eq!(stored.title, "A");
    assert!(stored.dependencies.is_empty());

    let b = service.create_task(TaskDraft::new("B", 3)).unwrap();
    service.add_dependency(&b.id, &a.id).unwrap();
    assert!(service.get_tasks_by_dependency_order().is_ok());
}

#[test]
fn dangling_link_left_by_a_delete_survives_later_updates() {
    let mut service = service();
    let base = service.create_task(TaskDraft::new("base", 3)).unwrap();
    let top = service.create_task(TaskDraft::new("top", 3)).unwrap();
    service.add_dependency(&top.id, &base.id).unwrap();
    service.delete_task(&base.id).unwrap();

    let updated = service
        .update_task(
            &top.id,
            &TaskPatch {
                dependencies: Some(vec![base.id.clone()]),
                title: Some("top renamed".to_string()),
                ..TaskPatch::default()
            },
        )
        .unwrap();

    assert_eq!(updated.title, "top renamed");
    assert_eq!(updated.dependencies, vec![base.id.clone()]);
    assert_eq!(ids(&service.get_blocked_tasks().unwrap()), vec![top.id.as_str()]);
}

#[test]
fn deleting_a_prerequisite_blocks_its_dependents() {
    let mut service = service();
    let base = service.create_task(TaskDraft::new("base", 3)).unwrap();
    let top = service.create_task(TaskDraft::new("top", 3)).unwrap();
    service.add_dependency(&top.id, &base.id).unwrap();
    complete(&mut service, &base.id);
    assert!(service.get_blocked_tasks().unwrap().is_empty());

    service.delete_task(&base.id).unwrap();

    assert_eq!(ids(&service.get_blocked_tasks().unwrap()), vec![top.id.as_str()]);
    assert_eq!(ids(&service.get_tasks_by_dependency_order().unwrap()), vec![top.id.as_str()]);
}

#[test]
fn dependencies_in_created_drafts_are_ordered() {
    let mut service = service();
    let base = service.create_task(TaskDraft::new("base", 3)).unwrap();
    let mut draft = TaskDraft::new("built on base", 3);
    draft.dependencies = vec![base.id.clone()];
    let top = service.create_task(draft).unwrap();

    assert!(matches!(
        service.add_dependency(&base.id, &top.id),
        Err(ServiceError::CycleDetected { .. })
    ));
    let order = service.get_tasks_by_dependency_order().unwrap();
    assert_eq!(ids(&order), vec![base.id.as_str(), top.id.as_str()]);
}
