#![allow(missing_docs, unused_results)]

use chrono::{TimeZone, Utc};
use tasker_tasks::{
    FileSlot, KeyValueSlot, Priority, Repeat, SortKey, TaskBoard, TaskDraft, TaskError, TaskQuery,
    TaskStore,
};

fn open(dir: &std::path::Path) -> TaskBoard<FileSlot> {
    TaskBoard::open(TaskStore::new(FileSlot::new(dir)))
}

fn draft(name: &str, category: &str, priority: Option<Priority>, deadline: Option<&str>) -> TaskDraft {
    TaskDraft {
        name: name.to_string(),
        category: category.to_string(),
        deadline: deadline.map(|d| d.parse().unwrap()),
        priority,
        repeat: Repeat::None,
    }
}

#[test]
fn corrupt_file_opens_empty_and_is_overwritten_on_first_mutation() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("tasks.json"), "not json at all").unwrap();

    let mut board = open(tmp.path());
    assert!(board.is_empty());

    board.add(TaskDraft::named("Fresh start")).unwrap();
    let reopened = open(tmp.path());
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.get(0).unwrap().name, "Fresh start");
}

#[test]
fn full_session_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let now = Utc.with_ymd_and_hms(2024, 12, 28, 12, 0, 0).unwrap();

    {
        let mut board = open(tmp.path());
        board.add(draft("Homework", "School", Some(Priority::Low), Some("2024-06-01"))).unwrap();
        board.add(draft("Gym", "Personal", Some(Priority::High), None)).unwrap();
        board
            .add(TaskDraft {
                repeat: Repeat::Weekly,
                ..draft("Review", "Work", Some(Priority::High), Some("2024-12-28T10:00"))
            })
            .unwrap();
        let outcome = board.toggle(2, now).unwrap();
        assert_eq!(outcome.spawned, Some(3));
    }

    let board = open(tmp.path());
    assert_eq!(board.len(), 4);
    assert_eq!(board.get(3).unwrap().deadline.unwrap().to_string(), "2025-01-04T10:00");
    for task in board.tasks() {
        assert_eq!(task.done, task.done_at.is_some());
    }

    let query = TaskQuery {
        sort: SortKey::PriorityAsc,
        ..TaskQuery::default()
    };
    // Open tasks by priority (Gym, spawned Review, Homework), then the done Review.
    assert_eq!(board.query(&query).indices(), [1, 3, 0, 2]);

    let work = TaskQuery {
        search: "WORK".into(),
        ..TaskQuery::default()
    };
    // "Homework" by name, both "Review" tasks by category.
    assert_eq!(board.query(&work).indices(), [0, 3, 2]);

    let view = board.query(&TaskQuery::default());
    let categories: Vec<_> = view.categories.iter().map(String::as_str).collect();
    assert_eq!(categories, ["Personal", "School", "Work"]);
}

#[test]
fn json_export_import_round_trip_through_files() {
    let source_dir = tempfile::tempdir().unwrap();
    let target_dir = tempfile::tempdir().unwrap();

    let mut source = open(source_dir.path());
    source.add(draft("Essay", "School", Some(Priority::Medium), Some("2024-05-01T17:30"))).unwrap();
    source.add(draft("Laundry", "", None, None)).unwrap();
    source
        .toggle(1, Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap())
        .unwrap();
    let exported = source.export_json().unwrap();

    let mut target = open(target_dir.path());
    target.add(TaskDraft::named("To be replaced")).unwrap();
    let pending = target.stage_import(&exported).unwrap();
    target.apply_import(pending).unwrap();

    assert_eq!(open(target_dir.path()).tasks(), source.tasks());
}

#[test]
fn rejected_import_does_not_touch_the_file() {
    let tmp = tempfile::tempdir().unwrap();
    let mut board = open(tmp.path());
    board.add(TaskDraft::named("Keep")).unwrap();
    let before = FileSlot::new(tmp.path()).read("tasks").unwrap();

    let err = board.stage_import("{\"a\":1}").unwrap_err();
    assert!(matches!(err, TaskError::InvalidImport(_)));
    assert_eq!(FileSlot::new(tmp.path()).read("tasks").unwrap(), before);
}
