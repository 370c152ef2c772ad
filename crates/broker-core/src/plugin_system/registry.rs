use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::kernel::constants;
use crate::plugin_system::args::PluginArgs;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::identifier::{NAMESPACE_SEPARATOR, PluginIdentifier};
use crate::plugin_system::traits::{BoxError, Plugin};
use crate::plugin_system::version::{ApiVersion, VersionRange};

/// Constructor for one plugin type.
pub type PluginFactory =
    Arc<dyn Fn(&PluginArgs) -> Result<Box<dyn Plugin>, BoxError> + Send + Sync>;

/// A named group of plugin types registered together.
pub struct Namespace {
    name: String,
    version: String,
    compatible_api_versions: Vec<VersionRange>,
    types: BTreeMap<String, PluginFactory>,
    duplicate_types: Vec<String>,
}

impl Namespace {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            compatible_api_versions: Vec::new(),
            types: BTreeMap::new(),
            duplicate_types: Vec::new(),
        }
    }

    /// Declare a supported core API range, e.g. `"^0.1"`.
    pub fn compatible_with(mut self, constraint: &str) -> Result<Self, PluginSystemError> {
        self.compatible_api_versions
            .push(VersionRange::from_constraint(constraint)?);
        Ok(self)
    }

    /// Add a plugin type. The factory receives the merged constructor arguments.
    ///
    /// Adding a name twice keeps the later factory and makes
    /// [`PluginRegistry::register_namespace`] reject the namespace.
    pub fn with_type<F>(mut self, type_name: &str, factory: F) -> Self
    where
        F: Fn(&PluginArgs) -> Result<Box<dyn Plugin>, BoxError> + Send + Sync + 'static,
    {
        if self.types.contains_key(type_name) {
            self.duplicate_types.push(type_name.to_string());
        }
        self.types.insert(type_name.to_string(), Arc::new(factory));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    fn factory(&self, type_name: &str) -> Option<&PluginFactory> {
        self.types.get(type_name)
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("compatible_api_versions", &self.compatible_api_versions)
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Registry of plugin namespaces and the resolver over them.
///
/// Populated once at startup, then only read.
#[derive(Debug)]
pub struct PluginRegistry {
    namespaces: BTreeMap<String, Namespace>,
    api_version: ApiVersion,
}

impl PluginRegistry {
    /// Create a registry for the given core API version
    pub fn new(api_version: ApiVersion) -> Self {
        Self {
            namespaces: BTreeMap::new(),
            api_version,
        }
    }

    /// Create a registry for the API version this crate was built with
    pub fn with_current_api() -> Result<Self, PluginSystemError> {
        let api_version = constants::API_VERSION.parse::<ApiVersion>()?;
        Ok(Self::new(api_version))
    }

    pub fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Register a namespace of plugin types
    pub fn register_namespace(&mut self, namespace: Namespace) -> Result<(), PluginSystemError> {
        let registration_error = |message: String| PluginSystemError::RegistrationError {
            namespace: namespace.name.clone(),
            message,
        };

        if namespace.name.is_empty()
            || namespace.name.starts_with(NAMESPACE_SEPARATOR)
            || namespace.name.ends_with(NAMESPACE_SEPARATOR)
        {
            return Err(registration_error("namespace name is malformed".to_string()));
        }
        if self.namespaces.contains_key(&namespace.name) {
            return Err(registration_error("namespace already registered".to_string()));
        }
        if let Some(bad) = namespace
            .type_names()
            .find(|name| name.is_empty() || name.contains(NAMESPACE_SEPARATOR))
        {
            return Err(registration_error(format!("invalid type name '{}'", bad)));
        }
        if let Some(duplicate) = namespace.duplicate_types.first() {
            return Err(registration_error(format!(
                "type '{}' registered more than once",
                duplicate
            )));
        }

        let compatible = namespace
            .compatible_api_versions
            .iter()
            .any(|range| range.includes_api(&self.api_version));
        if !compatible {
            return Err(registration_error(format!(
                "not compatible with API version {}",
                self.api_version
            )));
        }

        log::debug!(
            "Registered plugin namespace '{}' v{} ({} types)",
            namespace.name,
            namespace.version,
            namespace.types.len()
        );
        self.namespaces.insert(namespace.name.clone(), namespace);
        Ok(())
    }

    pub fn has_namespace(&self, name: &str) -> bool {
        self.namespaces.contains_key(name)
    }

    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.get(name)
    }

    /// Whether `identifier` names a registered type.
    pub fn contains(&self, identifier: &str) -> bool {
        match PluginIdentifier::parse(identifier) {
            Ok(id) => self
                .namespaces
                .get(id.namespace())
                .is_some_and(|ns| ns.factory(id.type_name()).is_some()),
            Err(_) => false,
        }
    }

    /// Every registered `<namespace>.<Type>`, sorted.
    pub fn identifiers(&self) -> Vec<String> {
        self.namespaces
            .values()
            .flat_map(|ns| {
                ns.type_names()
                    .map(move |type_name| format!("{}{}{}", ns.name, NAMESPACE_SEPARATOR, type_name))
            })
            .collect()
    }

    /// Resolve `identifier` and construct it with `args`.
    ///
    /// Returns `Ok(None)` when the namespace exists but has no such type; the
    /// caller decides whether that is fatal. A factory that errors or panics
    /// is reported as `ConstructionFailed`.
    pub fn resolve(
        &self,
        identifier: &str,
        args: &PluginArgs,
    ) -> Result<Option<(PluginIdentifier, Box<dyn Plugin>)>, PluginSystemError> {
        let id = PluginIdentifier::parse(identifier)?;

        let namespace = self.namespaces.get(id.namespace()).ok_or_else(|| {
            PluginSystemError::NamespaceNotFound {
                identifier: identifier.to_string(),
                namespace: id.namespace().to_string(),
            }
        })?;

        let Some(factory) = namespace.factory(id.type_name()) else {
            log::debug!("Type '{}' not found in namespace '{}'", id.type_name(), id.namespace());
            return Ok(None);
        };

        let instance = construct(&id, factory, args)?;
        Ok(Some((id, instance)))
    }
}

fn construct(
    id: &PluginIdentifier,
    factory: &PluginFactory,
    args: &PluginArgs,
) -> Result<Box<dyn Plugin>, PluginSystemError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| factory(args)));
    match result {
        Ok(Ok(instance)) => Ok(instance),
        Ok(Err(e)) => Err(PluginSystemError::ConstructionFailed {
            identifier: id.to_string(),
            message: e.to_string(),
        }),
        Err(panic_obj) => Err(PluginSystemError::ConstructionFailed {
            identifier: id.to_string(),
            message: format!("panic: {}", panic_message(panic_obj.as_ref())),
        }),
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic reason".to_string()
    }
}
