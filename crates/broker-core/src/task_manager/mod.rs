//! # Broker Core Task Manager
//!
//! Turns task specifications into executable tasks and runs them.
//!
//! - **[`spec`]**: [`TaskSpec`] / [`PluginSpec`], the configured shape of a task.
//! - **[`builder`]**: [`TaskBuilder`], which resolves and validates every plugin a
//!   task names and produces an immutable [`TaskSet`]. Building is all-or-nothing.
//! - **[`task`]**: [`Task`], one source, one destination and an ordered
//!   interceptor chain, with the per-task error boundary used by the runner.
//! - **[`error`]**: [`TaskBuildError`] and [`TaskExecutionError`].
pub mod builder;
pub mod error;
pub mod spec;
pub mod task;

pub use builder::TaskBuilder;
pub use error::{PluginRole, TaskBuildError, TaskExecutionError};
pub use spec::{PluginSpec, TaskSpec};
pub use task::{Task, TaskOutcome, TaskSet};
