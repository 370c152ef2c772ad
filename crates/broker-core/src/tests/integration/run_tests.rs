#![cfg(test)]

use std::fs;

use tempfile::tempdir;

use crate::config::{BrokerConfig, ConfigFormat};
use crate::kernel::bootstrap::Runner;
use crate::kernel::error::Error;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::Content;
use crate::task_manager::error::TaskBuildError;
use crate::task_manager::spec::{PluginSpec, TaskSpec};
use crate::tests::integration::common::{registry, Probe};

fn runner(probe: &std::sync::Arc<Probe>) -> Runner {
    Runner::new(registry(probe)).without_logger_installation()
}

#[cfg(feature = "toml-config")]
#[tokio::test]
async fn test_run_from_toml_document() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, "from toml").unwrap();

    let document = format!(
        r#"
[[tasks]]
name = "copy"
source = {{ class = "pkg.FileSource", args = {{ path = "{}" }} }}
destination = {{ class = "pkg.FileSink", args = {{ path = "{}" }} }}
"#,
        input.display(),
        output.display()
    );
    let config = BrokerConfig::parse(&document, ConfigFormat::Toml).unwrap();

    let probe = Probe::new();
    let report = runner(&probe).run(&config).await.unwrap();

    assert_eq!(report.total(), 1);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(fs::read_to_string(&output).unwrap(), "from toml");
}

#[tokio::test]
async fn test_run_without_tasks_is_empty_success() {
    let probe = Probe::new();
    let report = runner(&probe).run(&BrokerConfig::new()).await.unwrap();

    assert_eq!(report.total(), 0);
    assert!(probe.constructed().is_empty());
}

#[tokio::test]
async fn test_run_with_empty_task_list() {
    let probe = Probe::new();
    let config = BrokerConfig::new().with_tasks(Vec::new());
    let report = runner(&probe).run(&config).await.unwrap();

    assert_eq!(report.total(), 0);
}

#[tokio::test]
async fn test_task_failures_are_reported_not_fatal() {
    let probe = Probe::new();
    let config = BrokerConfig::new().with_tasks(vec![
        TaskSpec::new(
            PluginSpec::new("test.MemorySource").with_arg("content", "one"),
            PluginSpec::new("test.FailingSink"),
        )
        .named("push-fails"),
        TaskSpec::new(
            PluginSpec::new("test.PanickingSource"),
            PluginSpec::new("test.MemorySink"),
        )
        .named("panics"),
        TaskSpec::new(
            PluginSpec::new("test.MemorySource").with_arg("content", "three"),
            PluginSpec::new("test.MemorySink"),
        )
        .with_interceptors(&["test.Broken"]),
        TaskSpec::new(
            PluginSpec::new("test.MemorySource").with_arg("content", "four"),
            PluginSpec::new("test.MemorySink"),
        ),
    ]);

    let report = runner(&probe).run(&config).await.unwrap();

    assert_eq!(report.total(), 4);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 3);
    let labels: Vec<&str> = report.outcomes.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(labels, vec!["push-fails", "panics", "#2", "#3"]);
    assert_eq!(probe.pushed(), vec![Content::Text("four".to_string())]);
}

#[tokio::test]
async fn test_build_error_is_fatal_and_nothing_runs() {
    let probe = Probe::new();
    let config = BrokerConfig::new().with_tasks(vec![
        TaskSpec::new(
            PluginSpec::new("test.MemorySource"),
            PluginSpec::new("test.MemorySink"),
        ),
        TaskSpec::new(
            PluginSpec::new("test.MemorySource"),
            PluginSpec::new("test.Nope"),
        ),
    ]);

    let err = runner(&probe).run(&config).await.unwrap_err();

    assert!(matches!(
        err,
        Error::TaskBuild(TaskBuildError::PluginNotFound { .. })
    ));
    assert_eq!(probe.pull_count(), 0);
    assert!(probe.pushed().is_empty());
}

#[tokio::test]
async fn test_unknown_logger_namespace_is_fatal() {
    let probe = Probe::new();
    let config = BrokerConfig::new().with_logger("nowhere.Logger");

    let err = runner(&probe).run(&config).await.unwrap_err();

    assert!(matches!(
        err,
        Error::PluginSystem(PluginSystemError::NamespaceNotFound { .. })
    ));
}

#[tokio::test]
async fn test_logger_without_capability_falls_back() {
    let probe = Probe::new();
    let config = BrokerConfig::new().with_logger("test.A").with_tasks(vec![TaskSpec::new(
        PluginSpec::new("test.MemorySource"),
        PluginSpec::new("test.MemorySink"),
    )]);

    let runner = runner(&probe);
    assert!(runner.select_logger(&config).unwrap().is_default());

    let report = runner.run(&config).await.unwrap();
    assert_eq!(report.succeeded(), 1);
}
