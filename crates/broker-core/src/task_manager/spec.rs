use serde::{Deserialize, Serialize};

use crate::plugin_system::args::PluginArgs;

/// A configured plugin: identifier plus constructor arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSpec {
    #[serde(rename = "class", alias = "identifier")]
    pub identifier: String,
    #[serde(default)]
    pub args: PluginArgs,
}

impl PluginSpec {
    pub fn new(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            args: PluginArgs::new(),
        }
    }

    pub fn with_arg(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.args.set(key, value);
        self
    }
}

/// One entry of the configured task list.
///
/// `source` and `destination` are optional here so that a missing key is
/// reported by the task builder with the task's name, not by the parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PluginSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<PluginSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interceptors: Option<Vec<String>>,
}

impl TaskSpec {
    pub fn new(source: PluginSpec, destination: PluginSpec) -> Self {
        Self {
            name: None,
            source: Some(source),
            destination: Some(destination),
            interceptors: None,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_interceptors(mut self, interceptors: &[&str]) -> Self {
        self.interceptors = Some(interceptors.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Name used in diagnostics: the task name, or its position.
    pub fn label(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("#{}", index))
    }
}
