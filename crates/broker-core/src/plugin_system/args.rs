use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which the owning task's name is passed to endpoint factories.
pub const TASK_NAME_ARG: &str = "task_name";

/// Constructor arguments for a plugin factory.
///
/// Keys are plugin-defined; the resolver never inspects them. Factories
/// usually call [`PluginArgs::deserialize`] into their own `#[derive(Deserialize)]`
/// struct, so a shape mismatch becomes a construction failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginArgs {
    values: Map<String, Value>,
}

impl PluginArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Get a single argument, `None` if absent or of the wrong shape
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The task name injected by the task builder, if the task had one.
    pub fn task_name(&self) -> Option<String> {
        self.get(TASK_NAME_ARG)
    }

    /// Merge `other` on top of `self`; keys in `other` win.
    pub fn merge(&mut self, other: &PluginArgs) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Deserialize the whole mapping into a typed argument struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.values.clone()))
    }
}

impl From<Map<String, Value>> for PluginArgs {
    fn from(values: Map<String, Value>) -> Self {
        Self::from_map(values)
    }
}
