/// Application name
pub const APP_NAME: &str = "Broker";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current plugin API version; namespaces declare ranges against it
pub const API_VERSION: &str = "0.1.0";

/// Configuration file used when none is given
pub const DEFAULT_CONFIG_FILE: &str = "broker.toml";

/// Environment variable overriding the configuration path
pub const CONFIG_ENV_VAR: &str = "BROKER_CONFIG";

/// Environment variable read by the default logging sink
pub const LOG_ENV_VAR: &str = "RUST_LOG";

/// Filter used by the default logging sink when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";
