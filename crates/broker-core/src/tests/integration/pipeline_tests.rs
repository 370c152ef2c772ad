#![cfg(test)]

use std::fs;

use tempfile::tempdir;

use crate::plugin_system::Content;
use crate::task_manager::builder::TaskBuilder;
use crate::task_manager::error::{PluginRole, TaskBuildError};
use crate::task_manager::spec::{PluginSpec, TaskSpec};
use crate::task_manager::task::TaskOutcome;
use crate::tests::integration::common::{registry, Probe};

#[tokio::test]
async fn test_file_to_file_copy() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, b"hello").unwrap();

    let probe = Probe::new();
    let registry = registry(&probe);
    let spec = TaskSpec::new(
        PluginSpec::new("pkg.FileSource").with_arg("path", input.to_str().unwrap()),
        PluginSpec::new("pkg.FileSink").with_arg("path", output.to_str().unwrap()),
    )
    .named("copy");

    let tasks = TaskBuilder::new(&registry).build(&[spec]).unwrap();
    assert_eq!(tasks.len(), 1);

    let outcome = tasks.get(0).unwrap().run().await;
    assert!(outcome.is_success(), "copy failed: {}", outcome);
    assert_eq!(fs::read(&output).unwrap(), b"hello");
}

#[tokio::test]
async fn test_missing_destination_aborts_before_any_pull() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.txt");
    fs::write(&input, b"hello").unwrap();

    let probe = Probe::new();
    let registry = registry(&probe);
    let spec = TaskSpec {
        source: Some(PluginSpec::new("pkg.FileSource").with_arg("path", input.to_str().unwrap())),
        ..TaskSpec::default()
    };

    let err = TaskBuilder::new(&registry).build(&[spec]).unwrap_err();
    match &err {
        TaskBuildError::MissingKey { task, key } => {
            assert_eq!(task, "#0");
            assert_eq!(*key, "destination");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.to_string(), "Task '#0': 'destination' not found in config");
    assert_eq!(probe.pull_count(), 0);
    assert!(!probe.constructed().contains(&"FileSink".to_string()));
}

#[tokio::test]
async fn test_interceptors_apply_in_listed_order() {
    let probe = Probe::new();
    let registry = registry(&probe);
    let spec = TaskSpec::new(
        PluginSpec::new("test.MemorySource").with_arg("content", "x"),
        PluginSpec::new("test.MemorySink"),
    )
    .with_interceptors(&["test.A", "test.B"]);

    let tasks = TaskBuilder::new(&registry).build(&[spec]).unwrap();
    let outcome = tasks.get(0).unwrap().run().await;

    assert!(outcome.is_success());
    assert_eq!(probe.transforms(), vec!["A", "B"]);
    assert_eq!(probe.pushed(), vec![Content::Text("x+A+B".to_string())]);
}

#[tokio::test]
async fn test_reversed_interceptor_order_changes_result() {
    let probe = Probe::new();
    let registry = registry(&probe);
    let spec = TaskSpec::new(
        PluginSpec::new("test.MemorySource").with_arg("content", "x"),
        PluginSpec::new("test.MemorySink"),
    )
    .with_interceptors(&["test.B", "test.A"]);

    let tasks = TaskBuilder::new(&registry).build(&[spec]).unwrap();
    tasks.get(0).unwrap().run().await;

    assert_eq!(probe.pushed(), vec![Content::Text("x+B+A".to_string())]);
}

#[tokio::test]
async fn test_failing_task_does_not_stop_later_tasks() {
    let probe = Probe::new();
    let registry = registry(&probe);
    let specs = vec![
        TaskSpec::new(
            PluginSpec::new("test.FailingSource"),
            PluginSpec::new("test.MemorySink"),
        )
        .named("broken"),
        TaskSpec::new(
            PluginSpec::new("test.MemorySource").with_arg("content", "second"),
            PluginSpec::new("test.MemorySink"),
        )
        .named("healthy"),
    ];

    let tasks = TaskBuilder::new(&registry).build(&specs).unwrap();
    let mut outcomes = Vec::new();
    for task in &tasks {
        outcomes.push(task.run().await);
    }

    assert!(matches!(outcomes[0], TaskOutcome::Failed(_)));
    assert!(outcomes[1].is_success());
    assert_eq!(probe.pushed(), vec![Content::Text("second".to_string())]);
}

#[tokio::test]
async fn test_unknown_interceptor_fails_whole_build() {
    let probe = Probe::new();
    let registry = registry(&probe);
    let specs = vec![
        TaskSpec::new(
            PluginSpec::new("test.MemorySource"),
            PluginSpec::new("test.MemorySink"),
        ),
        TaskSpec::new(
            PluginSpec::new("test.MemorySource"),
            PluginSpec::new("test.MemorySink"),
        )
        .named("second")
        .with_interceptors(&["test.A", "test.Missing"]),
    ];

    let err = TaskBuilder::new(&registry).build(&specs).unwrap_err();
    match err {
        TaskBuildError::PluginNotFound {
            task,
            role,
            identifier,
        } => {
            assert_eq!(task, "second");
            assert_eq!(role, PluginRole::Interceptor(1));
            assert_eq!(identifier, "test.Missing");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(probe.pull_count(), 0);
}
