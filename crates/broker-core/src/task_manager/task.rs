use std::fmt;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::plugin_system::identifier::PluginIdentifier;
use crate::plugin_system::registry::panic_message;
use crate::plugin_system::traits::{DestinationEndpoint, Interceptor, SourceEndpoint};
use crate::task_manager::error::TaskExecutionError;

/// A plugin instance accepted for a role, kept with the identifier it was
/// resolved from.
pub struct Bound<T: ?Sized> {
    identifier: PluginIdentifier,
    plugin: Box<T>,
}

impl<T: ?Sized> Bound<T> {
    pub(crate) fn new(identifier: PluginIdentifier, plugin: Box<T>) -> Self {
        Self { identifier, plugin }
    }

    pub fn identifier(&self) -> &PluginIdentifier {
        &self.identifier
    }
}

/// Result of running one task through its error boundary
#[derive(Debug)]
pub enum TaskOutcome {
    Succeeded,
    Failed(TaskExecutionError),
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Succeeded)
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskOutcome::Succeeded => write!(f, "Success"),
            TaskOutcome::Failed(e) => write!(f, "Failure: {}", e),
        }
    }
}

/// One bound pipeline. Built only by the task builder and never modified.
pub struct Task {
    label: String,
    source: Bound<dyn SourceEndpoint>,
    destination: Bound<dyn DestinationEndpoint>,
    interceptors: Vec<Bound<dyn Interceptor>>,
}

impl Task {
    pub(crate) fn new(
        label: String,
        source: Bound<dyn SourceEndpoint>,
        destination: Bound<dyn DestinationEndpoint>,
        interceptors: Vec<Bound<dyn Interceptor>>,
    ) -> Self {
        Self {
            label,
            source,
            destination,
            interceptors,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> &PluginIdentifier {
        self.source.identifier()
    }

    pub fn destination(&self) -> &PluginIdentifier {
        self.destination.identifier()
    }

    /// Interceptor identifiers in application order
    pub fn interceptors(&self) -> impl Iterator<Item = &PluginIdentifier> {
        self.interceptors.iter().map(Bound::identifier)
    }

    /// Pull, fold through the interceptors left to right, push.
    pub async fn execute(&self) -> Result<(), TaskExecutionError> {
        let mut content =
            self.source
                .plugin
                .pull()
                .await
                .map_err(|source| TaskExecutionError::Pull {
                    task: self.label.clone(),
                    identifier: self.source.identifier.to_string(),
                    source,
                })?;
        log::debug!(
            "Task '{}': pulled {} content ({} bytes)",
            self.label,
            content.kind(),
            content.len()
        );

        for (index, interceptor) in self.interceptors.iter().enumerate() {
            content = interceptor.plugin.transform(content).map_err(|source| {
                TaskExecutionError::Transform {
                    task: self.label.clone(),
                    index,
                    identifier: interceptor.identifier.to_string(),
                    source,
                }
            })?;
        }

        self.destination
            .plugin
            .push(content)
            .await
            .map_err(|source| TaskExecutionError::Push {
                task: self.label.clone(),
                identifier: self.destination.identifier.to_string(),
                source,
            })
    }

    /// Error boundary around [`Task::execute`]: failures and panics are logged
    /// and returned as an outcome, never propagated.
    pub async fn run(&self) -> TaskOutcome {
        let result = AssertUnwindSafe(self.execute()).catch_unwind().await;
        let error = match result {
            Ok(Ok(())) => {
                log::info!("Task '{}' completed", self.label);
                return TaskOutcome::Succeeded;
            }
            Ok(Err(e)) => e,
            Err(panic_obj) => TaskExecutionError::Panicked {
                task: self.label.clone(),
                message: panic_message(panic_obj.as_ref()),
            },
        };

        log::error!("{}", error_chain(&error));
        TaskOutcome::Failed(error)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("label", &self.label)
            .field("source", &self.source.identifier)
            .field("destination", &self.destination.identifier)
            .field("interceptors", &self.interceptors().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.source.identifier)?;
        for interceptor in &self.interceptors {
            write!(f, " -> {}", interceptor.identifier)?;
        }
        write!(f, " -> {}", self.destination.identifier)
    }
}

/// Render an error and its `source()` chain on one line.
pub(crate) fn error_chain(error: &dyn std::error::Error) -> String {
    let mut rendered = error.to_string();
    let mut current = error.source();
    while let Some(cause) = current {
        let cause_text = cause.to_string();
        if !rendered.contains(&cause_text) {
            rendered.push_str(": ");
            rendered.push_str(&cause_text);
        }
        current = cause.source();
    }
    rendered
}

/// The ordered tasks built for one run.
#[derive(Debug, Default)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }
}

impl<'a> IntoIterator for &'a TaskSet {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
