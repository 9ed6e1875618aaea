use std::path::Path;

use tempfile::tempdir;

use crate::engine::core::artifact::catalog::latest_artifact;
use crate::engine::core::executor::{DisposalPolicy, MergeExecutor, StepKind};
use crate::engine::core::planner::{AppendStep, MergePlan, NewArtifactBatch};
use crate::engine::core::store::LocalStore;
use crate::engine::core::Entry;
use crate::shared::datetime::DateCodec;
use crate::test_helpers::factories::{ArtifactFactory, EntryFactory};

fn iso() -> DateCodec {
    DateCodec::new("%Y-%m-%d")
}

fn entry_at(dir: &Path, stem: &str) -> Entry {
    Entry::from_path(dir.join(format!("{stem}.md")), &iso()).unwrap()
}

struct Setup {
    _root: tempfile::TempDir,
    source: std::path::PathBuf,
    output: std::path::PathBuf,
    backup: std::path::PathBuf,
    executor: MergeExecutor,
}

fn setup() -> Setup {
    let root = tempdir().unwrap();
    let source = root.path().join("diary");
    let output = root.path().join("mergeds");
    let backup = root.path().join("backups");
    std::fs::create_dir_all(&source).unwrap();
    std::fs::create_dir_all(&output).unwrap();
    let executor = MergeExecutor::new(output.clone(), backup.clone(), iso());
    Setup {
        _root: root,
        source,
        output,
        backup,
        executor,
    }
}

fn batch_plan(entries: Vec<Entry>) -> MergePlan {
    MergePlan {
        append: None,
        batches: vec![NewArtifactBatch { entries }],
    }
}

#[tokio::test]
async fn new_artifact_is_named_by_batch_range() {
    let s = setup();
    EntryFactory::new(&s.source).create_many(&["2024-01-01", "2024-01-02", "2024-01-03"]);
    let entries = vec![
        entry_at(&s.source, "2024-01-01"),
        entry_at(&s.source, "2024-01-02"),
        entry_at(&s.source, "2024-01-03"),
    ];

    let report = s
        .executor
        .execute(&LocalStore, batch_plan(entries), DisposalPolicy::Delete)
        .await;

    assert_eq!(report.artifacts_created, 1);
    assert_eq!(report.entries_merged, 3);
    assert!(report.failures.is_empty());

    let artifact = s.output.join("merged-2024-01-01_to_2024-01-03.md");
    let content = std::fs::read_to_string(&artifact).unwrap();
    assert_eq!(
        content,
        "# 2024-01-01\n\nDiary for 2024-01-01.\n\n\
         # 2024-01-02\n\nDiary for 2024-01-02.\n\n\
         # 2024-01-03\n\nDiary for 2024-01-03.\n"
    );
}

#[tokio::test]
async fn delete_policy_removes_entries_everywhere() {
    let s = setup();
    EntryFactory::new(&s.source).create_many(&["2024-01-01", "2024-01-02"]);
    let entries = vec![
        entry_at(&s.source, "2024-01-01"),
        entry_at(&s.source, "2024-01-02"),
    ];

    s.executor
        .execute(&LocalStore, batch_plan(entries), DisposalPolicy::Delete)
        .await;

    assert!(!s.source.join("2024-01-01.md").exists());
    assert!(!s.source.join("2024-01-02.md").exists());
    assert!(!s.backup.exists());
}

#[tokio::test]
async fn backup_policy_copies_byte_identical_then_removes() {
    let s = setup();
    let body = "Some day.\nWith two lines.\n";
    EntryFactory::new(&s.source)
        .with_body(body)
        .create("2024-01-01");
    let entries = vec![entry_at(&s.source, "2024-01-01")];

    s.executor
        .execute(&LocalStore, batch_plan(entries), DisposalPolicy::Backup)
        .await;

    assert!(!s.source.join("2024-01-01.md").exists());
    let backed_up = std::fs::read(s.backup.join("2024-01-01.md")).unwrap();
    assert_eq!(backed_up, body.as_bytes());
}

#[tokio::test]
async fn append_extends_artifact_and_renames() {
    let s = setup();
    ArtifactFactory::new(&s.output).create(
        "merged-2024-01-01_to_2024-01-02.md",
        &[("2024-01-01", "one"), ("2024-01-02", "two")],
    );
    EntryFactory::new(&s.source).create("2024-01-05");

    let latest = latest_artifact(&LocalStore, &s.output, &iso())
        .await
        .unwrap()
        .unwrap();
    let plan = MergePlan {
        append: Some(AppendStep {
            artifact: latest,
            entries: vec![entry_at(&s.source, "2024-01-05")],
        }),
        batches: Vec::new(),
    };

    let report = s
        .executor
        .execute(&LocalStore, plan, DisposalPolicy::Delete)
        .await;
    assert_eq!(report.artifacts_extended, 1);
    assert_eq!(report.entries_merged, 1);

    // old name gone, extended name present, start date preserved
    assert!(!s.output.join("merged-2024-01-01_to_2024-01-02.md").exists());
    let renamed = s.output.join("merged-2024-01-01_to_2024-01-05.md");
    let content = std::fs::read_to_string(&renamed).unwrap();
    assert!(content.ends_with("# 2024-01-05\n\nDiary for 2024-01-05."));
    assert!(!s.source.join("2024-01-05.md").exists());
}

#[tokio::test]
async fn renamed_end_date_matches_max_header() {
    let s = setup();
    ArtifactFactory::new(&s.output)
        .create("merged-2024-01-01_to_2024-01-01.md", &[("2024-01-01", "a")]);
    EntryFactory::new(&s.source).create_many(&["2024-01-02", "2024-01-03"]);

    let latest = latest_artifact(&LocalStore, &s.output, &iso())
        .await
        .unwrap()
        .unwrap();
    let plan = MergePlan {
        append: Some(AppendStep {
            artifact: latest,
            entries: vec![
                entry_at(&s.source, "2024-01-02"),
                entry_at(&s.source, "2024-01-03"),
            ],
        }),
        batches: Vec::new(),
    };
    s.executor
        .execute(&LocalStore, plan, DisposalPolicy::Delete)
        .await;

    let state = latest_artifact(&LocalStore, &s.output, &iso())
        .await
        .unwrap()
        .unwrap();
    let content = std::fs::read_to_string(&state.path).unwrap();
    let max_header = crate::engine::core::artifact::header::date_range(&content, &iso())
        .unwrap()
        .1;
    assert_eq!(state.name.end, max_header);
}

#[tokio::test]
async fn rerun_after_partial_failure_does_not_duplicate() {
    let s = setup();
    // the artifact already holds 2024-01-02 (a previous run wrote it but
    // crashed before disposal), and the source file is still there
    ArtifactFactory::new(&s.output).create(
        "merged-2024-01-01_to_2024-01-02.md",
        &[("2024-01-01", "one"), ("2024-01-02", "two")],
    );
    EntryFactory::new(&s.source).create("2024-01-02");

    let latest = latest_artifact(&LocalStore, &s.output, &iso())
        .await
        .unwrap()
        .unwrap();
    let plan = MergePlan {
        append: Some(AppendStep {
            artifact: latest.clone(),
            entries: vec![entry_at(&s.source, "2024-01-02")],
        }),
        batches: Vec::new(),
    };

    let report = s
        .executor
        .execute(&LocalStore, plan, DisposalPolicy::Backup)
        .await;

    // disposal completed, content untouched, nothing counted as merged
    assert_eq!(report.entries_skipped_duplicate, 1);
    assert_eq!(report.entries_merged, 0);
    assert_eq!(report.artifacts_extended, 0);
    assert!(!s.source.join("2024-01-02.md").exists());
    assert!(s.backup.join("2024-01-02.md").exists());

    let content = std::fs::read_to_string(&latest.path).unwrap();
    assert_eq!(content.matches("# 2024-01-02").count(), 1);
}

#[tokio::test]
async fn create_conflict_cancels_remaining_batches() {
    let s = setup();
    EntryFactory::new(&s.source).create_many(&[
        "2024-01-01",
        "2024-01-02",
        "2024-01-03",
        "2024-01-04",
    ]);
    // occupy the path the first batch would create
    std::fs::write(
        s.output.join("merged-2024-01-01_to_2024-01-02.md"),
        "already here\n",
    )
    .unwrap();

    let plan = MergePlan {
        append: None,
        batches: vec![
            NewArtifactBatch {
                entries: vec![
                    entry_at(&s.source, "2024-01-01"),
                    entry_at(&s.source, "2024-01-02"),
                ],
            },
            NewArtifactBatch {
                entries: vec![
                    entry_at(&s.source, "2024-01-03"),
                    entry_at(&s.source, "2024-01-04"),
                ],
            },
        ],
    };

    let report = s
        .executor
        .execute(&LocalStore, plan, DisposalPolicy::Delete)
        .await;

    assert_eq!(report.artifacts_created, 0);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].step, StepKind::NewArtifact);

    // conflicting file untouched, all four entries still in place
    assert_eq!(
        std::fs::read_to_string(s.output.join("merged-2024-01-01_to_2024-01-02.md")).unwrap(),
        "already here\n"
    );
    for stem in ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"] {
        assert!(s.source.join(format!("{stem}.md")).exists());
    }
}

#[tokio::test]
async fn failed_step_leaves_entries_and_artifact_untouched() {
    let s = setup();
    ArtifactFactory::new(&s.output)
        .create("merged-2024-01-01_to_2024-01-01.md", &[("2024-01-01", "a")]);
    EntryFactory::new(&s.source).create("2024-01-02");
    let latest = latest_artifact(&LocalStore, &s.output, &iso())
        .await
        .unwrap()
        .unwrap();
    let before = std::fs::read_to_string(&latest.path).unwrap();

    // one entry in the plan has vanished from disk: the read fails before
    // any artifact mutation, so the step is a no-op
    let mut ghost = entry_at(&s.source, "2024-01-02");
    ghost.path = s.source.join("2024-01-03.md");
    let plan = MergePlan {
        append: Some(AppendStep {
            artifact: latest.clone(),
            entries: vec![ghost],
        }),
        batches: Vec::new(),
    };

    let report = s
        .executor
        .execute(&LocalStore, plan, DisposalPolicy::Delete)
        .await;

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.entries_merged, 0);
    assert_eq!(std::fs::read_to_string(&latest.path).unwrap(), before);
    assert!(s.source.join("2024-01-02.md").exists());
}

#[tokio::test]
async fn io_failure_in_one_step_does_not_stop_later_steps() {
    let s = setup();
    EntryFactory::new(&s.source).create_many(&["2024-01-03", "2024-01-04"]);

    // first batch references a missing entry file, second batch is fine
    let mut missing = entry_at(&s.source, "2024-01-03");
    missing.path = s.source.join("2024-01-01.md");
    missing.stem = "2024-01-01".to_string();
    missing.date = iso().parse("2024-01-01").unwrap();

    let plan = MergePlan {
        append: None,
        batches: vec![
            NewArtifactBatch {
                entries: vec![missing],
            },
            NewArtifactBatch {
                entries: vec![
                    entry_at(&s.source, "2024-01-03"),
                    entry_at(&s.source, "2024-01-04"),
                ],
            },
        ],
    };

    let report = s
        .executor
        .execute(&LocalStore, plan, DisposalPolicy::Delete)
        .await;

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.artifacts_created, 1);
    assert!(s.output.join("merged-2024-01-03_to_2024-01-04.md").exists());
}
