//! `core.endpoints`: file, static and stdout endpoints.
//!
//! Register with [`namespace`]. Endpoint arguments are read from the plugin
//! specification's `args`; the implicit `task_name` is accepted and ignored.
use std::path::PathBuf;

use async_trait::async_trait;
use broker_core::declare_plugin;
use broker_core::plugin_system::{
    BoxError, Content, DestinationEndpoint, Endpoint, Namespace, Plugin, PluginArgs,
    PluginSystemError, SourceEndpoint,
};
use log::debug;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;

pub const NAMESPACE: &str = "core.endpoints";
const COMPATIBLE_API_REQ: &str = "^0.1";

type FactoryResult = Result<Box<dyn Plugin>, BoxError>;

/// The `core.endpoints` namespace with all its types.
pub fn namespace() -> Result<Namespace, PluginSystemError> {
    Ok(Namespace::new(NAMESPACE, env!("CARGO_PKG_VERSION"))
        .compatible_with(COMPATIBLE_API_REQ)?
        .with_type("FileSource", FileSource::from_args)
        .with_type("FileSink", FileSink::from_args)
        .with_type("StaticSource", StaticSource::from_args)
        .with_type("StdoutSink", StdoutSink::from_args))
}

// --- File Endpoints ---

#[derive(Debug, Deserialize)]
struct FileSourceArgs {
    path: PathBuf,
}

/// Reads a whole file. Valid UTF-8 becomes `Text`, anything else `Bytes`.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn from_args(args: &PluginArgs) -> FactoryResult {
        let FileSourceArgs { path } = args.deserialize()?;
        Ok(Box::new(Self::new(path)))
    }
}

impl Endpoint for FileSource {}

#[async_trait]
impl SourceEndpoint for FileSource {
    async fn pull(&self) -> Result<Content, BoxError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| format!("cannot read '{}': {}", self.path.display(), e))?;
        debug!("Read {} bytes from {}", bytes.len(), self.path.display());
        Ok(match String::from_utf8(bytes) {
            Ok(text) => Content::Text(text),
            Err(e) => Content::Bytes(e.into_bytes()),
        })
    }
}

declare_plugin!(FileSource: Endpoint, SourceEndpoint);

#[derive(Debug, Deserialize)]
struct FileSinkArgs {
    path: PathBuf,
    #[serde(default)]
    append: bool,
}

/// Writes content to a file, truncating unless `append` is set.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    append: bool,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>, append: bool) -> Self {
        Self {
            path: path.into(),
            append,
        }
    }

    fn from_args(args: &PluginArgs) -> FactoryResult {
        let FileSinkArgs { path, append } = args.deserialize()?;
        Ok(Box::new(Self::new(path, append)))
    }
}

impl Endpoint for FileSink {}

#[async_trait]
impl DestinationEndpoint for FileSink {
    async fn push(&self, content: Content) -> Result<(), BoxError> {
        let mut options = tokio::fs::OpenOptions::new();
        options.create(true);
        if self.append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }

        let mut file = options
            .open(&self.path)
            .await
            .map_err(|e| format!("cannot open '{}': {}", self.path.display(), e))?;
        let bytes = content.into_bytes();
        file.write_all(&bytes).await?;
        file.flush().await?;
        debug!("Wrote {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }
}

declare_plugin!(FileSink: Endpoint, DestinationEndpoint);

// --- Static / Stdout Endpoints ---

#[derive(Debug, Deserialize)]
struct StaticSourceArgs {
    content: String,
}

/// Yields the text given in its `content` argument.
#[derive(Debug)]
pub struct StaticSource {
    content: String,
}

impl StaticSource {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    fn from_args(args: &PluginArgs) -> FactoryResult {
        let StaticSourceArgs { content } = args.deserialize()?;
        Ok(Box::new(Self::new(content)))
    }
}

impl Endpoint for StaticSource {}

#[async_trait]
impl SourceEndpoint for StaticSource {
    async fn pull(&self) -> Result<Content, BoxError> {
        Ok(Content::Text(self.content.clone()))
    }
}

declare_plugin!(StaticSource: Endpoint, SourceEndpoint);

/// Prints content to standard output, newline-terminated.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl StdoutSink {
    fn from_args(_args: &PluginArgs) -> FactoryResult {
        Ok(Box::new(Self))
    }
}

impl Endpoint for StdoutSink {}

#[async_trait]
impl DestinationEndpoint for StdoutSink {
    async fn push(&self, content: Content) -> Result<(), BoxError> {
        let mut bytes = content.into_bytes();
        if bytes.last() != Some(&b'\n') {
            bytes.push(b'\n');
        }
        let mut stdout = tokio::io::stdout();
        stdout.write_all(&bytes).await?;
        stdout.flush().await?;
        Ok(())
    }
}

declare_plugin!(StdoutSink: Endpoint, DestinationEndpoint);
