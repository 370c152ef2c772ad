//! # Broker Core Kernel
//!
//! Process-level orchestration for a broker run.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Run Orchestration**: [`Runner`](bootstrap::Runner) in the `bootstrap`
//!   submodule selects and installs the logging sink, builds the task set from
//!   configuration and executes every task in order.
//! - **Logging**: The `logging` submodule owns the default sink and the
//!   write-once installation of the process logger.
//! - **Core Constants**: System-wide constants via the `constants` submodule.
//! - **Error Handling**: The kernel [`Error`](error::Error) wraps every
//!   subsystem error, with a `Result` alias in the `error` submodule.
pub mod bootstrap;
pub mod constants;
pub mod error;
pub mod logging;

pub use bootstrap::{RunReport, Runner};
pub use error::{Error, Result};
