use crate::config::BrokerConfig;
use crate::kernel::constants;
use crate::kernel::error::Result;
use crate::kernel::logging::{self, LoggerSelection};
use crate::plugin_system::registry::PluginRegistry;
use crate::task_manager::builder::TaskBuilder;
use crate::task_manager::task::{TaskOutcome, TaskSet};

/// Summary of one run: every task's outcome, in execution order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<(String, TaskOutcome)>,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }
}

/// Drives a run: logger installation, task assembly, sequential execution.
pub struct Runner {
    registry: PluginRegistry,
    install_logger: bool,
}

impl Runner {
    /// Creates a runner over a fully populated registry.
    pub fn new(registry: PluginRegistry) -> Self {
        Self {
            registry,
            install_logger: true,
        }
    }

    /// Leave the process logger alone (embedding, tests).
    pub fn without_logger_installation(mut self) -> Self {
        self.install_logger = false;
        self
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Choose the process logger named by the configuration, if any.
    pub fn select_logger(&self, config: &BrokerConfig) -> Result<LoggerSelection> {
        Ok(logging::select(&self.registry, config.logger.as_deref())?)
    }

    fn prepare_logging(&self, config: &BrokerConfig) -> Result<()> {
        let selection = self.select_logger(config)?;
        if self.install_logger {
            logging::install(selection);
        }
        Ok(())
    }

    /// Build the configured task set. `None` tasks means zero tasks.
    pub fn build_tasks(&self, config: &BrokerConfig) -> Result<TaskSet> {
        match &config.tasks {
            Some(specs) => Ok(TaskBuilder::new(&self.registry).build(specs)?),
            None => {
                log::warn!("No tasks in config file.");
                Ok(TaskSet::new())
            }
        }
    }

    /// Execute every task in order. Task failures are contained.
    pub async fn execute(&self, tasks: &TaskSet) -> RunReport {
        let mut report = RunReport::default();
        for task in tasks {
            log::info!("Running task {}", task);
            let outcome = task.run().await;
            report.outcomes.push((task.label().to_string(), outcome));
        }
        report
    }

    /// Dry run: install the logger and build every task without executing any.
    pub fn check(&self, config: &BrokerConfig) -> Result<TaskSet> {
        self.prepare_logging(config)?;
        self.build_tasks(config)
    }

    /// Full run. Errors returned here are fatal: no task has executed.
    pub async fn run(&self, config: &BrokerConfig) -> Result<RunReport> {
        self.prepare_logging(config)?;
        log::info!("Starting {} v{}", constants::APP_NAME, constants::APP_VERSION);

        let tasks = self.build_tasks(config)?;
        let report = self.execute(&tasks).await;
        log::info!(
            "Run finished: {} task(s), {} succeeded, {} failed",
            report.total(),
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }
}
