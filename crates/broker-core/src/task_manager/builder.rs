use serde_json::Value;

use crate::plugin_system::args::{PluginArgs, TASK_NAME_ARG};
use crate::plugin_system::capability::{self, Capability};
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::identifier::PluginIdentifier;
use crate::plugin_system::registry::PluginRegistry;
use crate::plugin_system::traits::{Interceptor, Plugin};
use crate::task_manager::error::{PluginRole, TaskBuildError};
use crate::task_manager::spec::{PluginSpec, TaskSpec};
use crate::task_manager::task::{Bound, Task, TaskSet};

/// Assembles tasks from specifications using a plugin registry.
pub struct TaskBuilder<'a> {
    registry: &'a PluginRegistry,
}

impl<'a> TaskBuilder<'a> {
    pub fn new(registry: &'a PluginRegistry) -> Self {
        Self { registry }
    }

    /// Build every task in order. The first invalid task aborts the build and
    /// no tasks are returned.
    pub fn build(&self, specs: &[TaskSpec]) -> Result<TaskSet, TaskBuildError> {
        let mut tasks = TaskSet::new();
        for (index, spec) in specs.iter().enumerate() {
            tasks.push(self.build_task(index, spec)?);
        }
        log::info!("Built {} task(s)", tasks.len());
        Ok(tasks)
    }

    /// Build the task at position `index` of the configured list.
    pub fn build_task(&self, index: usize, spec: &TaskSpec) -> Result<Task, TaskBuildError> {
        let label = spec.label(index);
        let implicit = PluginArgs::new().with(TASK_NAME_ARG, Value::from(spec.name.clone()));

        let source_spec = required(&label, "source", spec.source.as_ref())?;
        let source = self.build_endpoint(
            &label,
            PluginRole::Source,
            source_spec,
            &implicit,
            capability::expect_source,
        )?;

        let destination_spec = required(&label, "destination", spec.destination.as_ref())?;
        let destination = self.build_endpoint(
            &label,
            PluginRole::Destination,
            destination_spec,
            &implicit,
            capability::expect_destination,
        )?;

        // Interceptors take no constructor arguments.
        let interceptors = spec
            .interceptors
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, identifier)| -> Result<Bound<dyn Interceptor>, TaskBuildError> {
                let role = PluginRole::Interceptor(i);
                let (id, instance) = self.resolve(&label, role, identifier, &PluginArgs::new())?;
                let plugin = capability::expect_interceptor(&id, instance)
                    .map_err(|source| rejected(&label, role, source))?;
                Ok(Bound::new(id, plugin))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let task = Task::new(label, source, destination, interceptors);
        log::debug!("Assembled task {}", task);
        Ok(task)
    }

    fn build_endpoint<T: ?Sized>(
        &self,
        label: &str,
        role: PluginRole,
        spec: &PluginSpec,
        implicit: &PluginArgs,
        expect: fn(&PluginIdentifier, Box<dyn Plugin>) -> Result<Box<T>, PluginSystemError>,
    ) -> Result<Bound<T>, TaskBuildError> {
        let mut args = implicit.clone();
        args.merge(&spec.args);

        let (id, instance) = self.resolve(label, role, &spec.identifier, &args)?;
        capability::validate(&id, instance.as_ref(), Capability::Endpoint)
            .map_err(|source| rejected(label, role, source))?;
        let plugin = expect(&id, instance).map_err(|source| rejected(label, role, source))?;
        Ok(Bound::new(id, plugin))
    }

    fn resolve(
        &self,
        label: &str,
        role: PluginRole,
        identifier: &str,
        args: &PluginArgs,
    ) -> Result<(PluginIdentifier, Box<dyn Plugin>), TaskBuildError> {
        match self.registry.resolve(identifier, args) {
            Ok(Some(resolved)) => Ok(resolved),
            Ok(None) => Err(TaskBuildError::PluginNotFound {
                task: label.to_string(),
                role,
                identifier: identifier.to_string(),
            }),
            Err(source) => Err(rejected(label, role, source)),
        }
    }
}

fn required<'s>(
    label: &str,
    key: &'static str,
    value: Option<&'s PluginSpec>,
) -> Result<&'s PluginSpec, TaskBuildError> {
    value.ok_or_else(|| TaskBuildError::MissingKey {
        task: label.to_string(),
        key,
    })
}

fn rejected(label: &str, role: PluginRole, source: PluginSystemError) -> TaskBuildError {
    TaskBuildError::Plugin {
        task: label.to_string(),
        role,
        source,
    }
}
