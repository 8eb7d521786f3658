use tasklane_core::{
    FuzzyMode, IndexConfig, InMemoryTaskRepository, SearchOptions, Task, TaskDraft,
    TaskIndexService, TaskPatch, TemplateCatalog,
};

fn service_with(config: IndexConfig) -> TaskIndexService<InMemoryTaskRepository> {
    TaskIndexService::new(
        InMemoryTaskRepository::new(),
        config,
        TemplateCatalog::builtin(),
    )
    .unwrap()
}

fn seeded(config: IndexConfig) -> TaskIndexService<InMemoryTaskRepository> {
    let mut service = service_with(config);

    let mut meeting = TaskDraft::new("Meeting with design", 3);
    meeting.category = Some("Work".to_string());
    meeting.tags = vec!["meeting".to_string(), "design".to_string()];
    service.create_task(meeting).unwrap();

    let mut budget = TaskDraft::new("Budget review", 5);
    budget.description = Some("Quarterly numbers".to_string());
    budget.category = Some("Finance".to_string());
    budget.tags = vec!["review".to_string()];
    service.create_task(budget).unwrap();

    let mut groceries = TaskDraft::new("Buy groceries", 1);
    groceries.category = Some("Home".to_string());
    groceries.tags = vec!["errand".to_string()];
    service.create_task(groceries).unwrap();

    service
}

fn titles(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.title.as_str()).collect()
}

fn sorted_titles(tasks: &[Task]) -> Vec<&str> {
    let mut titles = titles(tasks);
    titles.sort_unstable();
    titles
}

#[test]
fn prefix_search_is_case_insensitive_and_deduplicated() {
    let service = seeded(IndexConfig::default());

    // "meeting" is the title prefix, a title word and a tag of the same task.
    let hits = service.search_tasks("MEET", &SearchOptions::default());
    assert_eq!(titles(&hits), vec!["Meeting with design"]);
}

#[test]
fn words_inside_titles_and_descriptions_are_searchable() {
    let service = seeded(IndexConfig::default());

    assert_eq!(
        titles(&service.search_tasks("quarter", &SearchOptions::default())),
        vec!["Budget review"]
    );
    assert_eq!(
        titles(&service.search_tasks("groc", &SearchOptions::default())),
        vec!["Buy groceries"]
    );
    assert_eq!(
        sorted_titles(&service.search_tasks("b", &SearchOptions::default())),
        vec!["Budget review", "Buy groceries"]
    );
}

#[test]
fn whole_phrase_matching_only_without_word_indexing() {
    let service = seeded(IndexConfig {
        index_words: false,
        ..IndexConfig::default()
    });

    assert!(service
        .search_tasks("groc", &SearchOptions::default())
        .is_empty());
    assert_eq!(
        titles(&service.search_tasks("buy gro", &SearchOptions::default())),
        vec!["Buy groceries"]
    );
}

#[test]
fn filters_are_combined_with_and_and_tags_with_or() {
    let service = seeded(IndexConfig::default());
    let everything = |options: SearchOptions| titles(&service.search_tasks("", &options))
        .into_iter()
        .map(str::to_owned)
        .collect::<Vec<_>>();

    assert_eq!(
        everything(SearchOptions {
            category: Some("Finance".to_string()),
            ..SearchOptions::default()
        }),
        vec!["Budget review"]
    );

    let mut by_tags = everything(SearchOptions {
        tags: vec!["errand".to_string(), "design".to_string()],
        ..SearchOptions::default()
    });
    by_tags.sort();
    assert_eq!(by_tags, vec!["Buy groceries", "Meeting with design"]);

    assert!(everything(SearchOptions {
        tags: vec!["errand".to_string()],
        priority: Some(5),
        ..SearchOptions::default()
    })
    .is_empty());

    assert_eq!(
        everything(SearchOptions {
            priority: Some(1),
            completed: Some(false),
            ..SearchOptions::default()
        }),
        vec!["Buy groceries"]
    );
}

#[test]
fn substitution_fuzzy_search_tolerates_typos_of_equal_length() {
    let service = seeded(IndexConfig::default());
    let fuzzy = SearchOptions {
        fuzzy: true,
        ..SearchOptions::default()
    };

    assert_eq!(titles(&service.search_tasks("revuew", &fuzzy)), vec!["Budget review"]);
    // Needs an insertion, which substitution matching never allows.
    assert!(service.search_tasks("reviw", &fuzzy).is_empty());
}

#[test]
fn levenshtein_fuzzy_search_allows_insertions() {
    let service = seeded(IndexConfig {
        fuzzy_mode: FuzzyMode::Levenshtein,
        ..IndexConfig::default()
    });
    let fuzzy = SearchOptions {
        fuzzy: true,
        ..SearchOptions::default()
    };

    assert_eq!(titles(&service.search_tasks("reviw", &fuzzy)), vec!["Budget review"]);
    assert_eq!(titles(&service.search_tasks("erand", &fuzzy)), vec!["Buy groceries"]);
}

#[test]
fn renaming_replaces_search_tokens() {
    let mut service = seeded(IndexConfig::default());
    let id = service.search_tasks("groceries", &SearchOptions::default())[0]
        .id
        .clone();

    service
        .update_task(
            &id,
            &TaskPatch {
                title: Some("Pick up parcel".to_string()),
                tags: Some(Vec::new()),
                ..TaskPatch::default()
            },
        )
        .unwrap();

    assert!(service
        .search_tasks("groceries", &SearchOptions::default())
        .is_empty());
    assert!(service
        .search_tasks("errand", &SearchOptions::default())
        .is_empty());
    let hits = service.search_tasks("parcel", &SearchOptions::default());
    assert_eq!(titles(&hits), vec!["Pick up parcel"]);
}

#[test]
fn deleted_tasks_disappear_from_search() {
    let mut service = seeded(IndexConfig::default());
    let id = service.search_tasks("budget", &SearchOptions::default())[0]
        .id
        .clone();

    assert!(service.delete_task(&id).unwrap());

    assert!(service
        .search_tasks("budget", &SearchOptions::default())
        .is_empty());
    assert!(service
        .search_tasks("quarterly", &SearchOptions::default())
        .is_empty());
}

#[test]
fn completion_changes_are_visible_to_search_filters() {
    let mut service = seeded(IndexConfig::default());
    let id = service.search_tasks("buy", &SearchOptions::default())[0]
        .id
        .clone();
    service
        .update_task(
            &id,
            &TaskPatch {
                completed: Some(true),
                ..TaskPatch::default()
            },
        )
        .unwrap();

    let done = SearchOptions {
        completed: Some(true),
        ..SearchOptions::default()
    };
    assert_eq!(titles(&service.search_tasks("buy", &done)), vec!["Buy groceries"]);
}
