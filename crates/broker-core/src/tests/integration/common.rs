#![cfg(test)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Deserialize;

use crate::declare_plugin;
use crate::plugin_system::{
    BoxError, Capability, CapabilitySet, Content, DestinationEndpoint, Endpoint, Interceptor,
    Namespace, Plugin, PluginArgs, PluginRegistry, SourceEndpoint,
};

type Built = Result<Box<dyn Plugin>, BoxError>;

/// Shared recorder the mock plugins report into.
#[derive(Default)]
pub struct Probe {
    pub constructed: Mutex<Vec<String>>,
    pub args: Mutex<Vec<(String, PluginArgs)>>,
    pub pulls: AtomicUsize,
    pub transforms: Mutex<Vec<String>>,
    pub pushed: Mutex<Vec<Content>>,
}

impl Probe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn record_construction(&self, type_name: &str, args: &PluginArgs) {
        self.constructed.lock().unwrap().push(type_name.to_string());
        self.args
            .lock()
            .unwrap()
            .push((type_name.to_string(), args.clone()));
    }

    pub fn constructed(&self) -> Vec<String> {
        self.constructed.lock().unwrap().clone()
    }

    pub fn args_for(&self, type_name: &str) -> Option<PluginArgs> {
        self.args
            .lock()
            .unwrap()
            .iter()
            .find(|(name, _)| name == type_name)
            .map(|(_, args)| args.clone())
    }

    pub fn pull_count(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }

    pub fn transforms(&self) -> Vec<String> {
        self.transforms.lock().unwrap().clone()
    }

    pub fn pushed(&self) -> Vec<Content> {
        self.pushed.lock().unwrap().clone()
    }
}

// ===== MOCK PLUGINS =====

pub struct MemorySource {
    content: String,
    fail: bool,
    panic: bool,
    probe: Arc<Probe>,
}

impl Endpoint for MemorySource {}

#[async_trait]
impl SourceEndpoint for MemorySource {
    async fn pull(&self) -> Result<Content, BoxError> {
        self.probe.pulls.fetch_add(1, Ordering::SeqCst);
        if self.panic {
            panic!("source exploded");
        }
        if self.fail {
            return Err("source offline".into());
        }
        Ok(Content::Text(self.content.clone()))
    }
}

declare_plugin!(MemorySource: Endpoint, SourceEndpoint);

pub struct MemorySink {
    fail: bool,
    probe: Arc<Probe>,
}

impl Endpoint for MemorySink {}

#[async_trait]
impl DestinationEndpoint for MemorySink {
    async fn push(&self, content: Content) -> Result<(), BoxError> {
        if self.fail {
            return Err("sink rejected content".into());
        }
        self.probe.pushed.lock().unwrap().push(content);
        Ok(())
    }
}

declare_plugin!(MemorySink: Endpoint, DestinationEndpoint);

/// Appends `+<tag>` to text content.
pub struct Append {
    tag: &'static str,
    fail: bool,
    probe: Arc<Probe>,
}

impl Interceptor for Append {
    fn transform(&self, content: Content) -> Result<Content, BoxError> {
        self.probe.transforms.lock().unwrap().push(self.tag.to_string());
        if self.fail {
            return Err(format!("interceptor {} failed", self.tag).into());
        }
        let text = content.as_text().ok_or("not text")?.into_owned();
        Ok(Content::Text(format!("{}+{}", text, self.tag)))
    }
}

declare_plugin!(Append: Interceptor);

/// Declares the source capability without providing the conversion.
pub struct Liar;

impl Plugin for Liar {
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::of(&[Capability::Endpoint, Capability::SourceEndpoint])
    }
}

pub struct NullLogger;

impl log::Log for NullLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        false
    }
    fn log(&self, _record: &log::Record) {}
    fn flush(&self) {}
}

declare_plugin!(NullLogger: Logger);

#[derive(Deserialize)]
struct PathArgs {
    path: PathBuf,
}

pub struct FileSource {
    path: PathBuf,
    probe: Arc<Probe>,
}

impl Endpoint for FileSource {}

#[async_trait]
impl SourceEndpoint for FileSource {
    async fn pull(&self) -> Result<Content, BoxError> {
        self.probe.pulls.fetch_add(1, Ordering::SeqCst);
        Ok(Content::Bytes(std::fs::read(&self.path)?))
    }
}

declare_plugin!(FileSource: Endpoint, SourceEndpoint);

pub struct FileSink {
    path: PathBuf,
}

impl Endpoint for FileSink {}

#[async_trait]
impl DestinationEndpoint for FileSink {
    async fn push(&self, content: Content) -> Result<(), BoxError> {
        std::fs::write(&self.path, content.into_bytes())?;
        Ok(())
    }
}

declare_plugin!(FileSink: Endpoint, DestinationEndpoint);

// ===== REGISTRY SETUP =====

/// `test` namespace: in-memory endpoints, interceptors and failure modes.
pub fn test_namespace(probe: &Arc<Probe>) -> Namespace {
    let p = probe.clone();
    let source = move |args: &PluginArgs| -> Built {
        p.record_construction("MemorySource", args);
        Ok(Box::new(MemorySource {
            content: args.get_or("content", "payload".to_string()),
            fail: false,
            panic: false,
            probe: p.clone(),
        }) as Box<dyn Plugin>)
    };
    let p = probe.clone();
    let failing_source = move |args: &PluginArgs| -> Built {
        p.record_construction("FailingSource", args);
        Ok(Box::new(MemorySource {
            content: String::new(),
            fail: true,
            panic: false,
            probe: p.clone(),
        }) as Box<dyn Plugin>)
    };
    let p = probe.clone();
    let panicking_source = move |args: &PluginArgs| -> Built {
        p.record_construction("PanickingSource", args);
        Ok(Box::new(MemorySource {
            content: String::new(),
            fail: false,
            panic: true,
            probe: p.clone(),
        }) as Box<dyn Plugin>)
    };
    let p = probe.clone();
    let sink = move |args: &PluginArgs| -> Built {
        p.record_construction("MemorySink", args);
        Ok(Box::new(MemorySink {
            fail: false,
            probe: p.clone(),
        }) as Box<dyn Plugin>)
    };
    let p = probe.clone();
    let failing_sink = move |args: &PluginArgs| -> Built {
        p.record_construction("FailingSink", args);
        Ok(Box::new(MemorySink {
            fail: true,
            probe: p.clone(),
        }) as Box<dyn Plugin>)
    };

    let append = |tag: &'static str, fail: bool, probe: &Arc<Probe>| {
        let p = probe.clone();
        move |args: &PluginArgs| -> Built {
            p.record_construction(tag, args);
            Ok(Box::new(Append {
                tag,
                fail,
                probe: p.clone(),
            }) as Box<dyn Plugin>)
        }
    };

    Namespace::new("test", "1.0.0")
        .compatible_with("^0.1")
        .unwrap()
        .with_type("MemorySource", source)
        .with_type("FailingSource", failing_source)
        .with_type("PanickingSource", panicking_source)
        .with_type("MemorySink", sink)
        .with_type("FailingSink", failing_sink)
        .with_type("A", append("A", false, probe))
        .with_type("B", append("B", false, probe))
        .with_type("C", append("C", false, probe))
        .with_type("Broken", append("Broken", true, probe))
        .with_type("Liar", |_args: &PluginArgs| -> Built {
            Ok(Box::new(Liar) as Box<dyn Plugin>)
        })
        .with_type("NullLogger", |_args: &PluginArgs| -> Built {
            Ok(Box::new(NullLogger) as Box<dyn Plugin>)
        })
        .with_type("NeedsPath", |args: &PluginArgs| -> Built {
            let parsed: PathArgs = args.deserialize()?;
            Ok(Box::new(FileSink { path: parsed.path }) as Box<dyn Plugin>)
        })
        .with_type("Panics", |_args: &PluginArgs| -> Built {
            panic!("constructor panicked")
        })
}

/// `pkg` namespace: file endpoints.
pub fn pkg_namespace(probe: &Arc<Probe>) -> Namespace {
    let p = probe.clone();
    let source = move |args: &PluginArgs| -> Built {
        p.record_construction("FileSource", args);
        let parsed: PathArgs = args.deserialize()?;
        Ok(Box::new(FileSource {
            path: parsed.path,
            probe: p.clone(),
        }) as Box<dyn Plugin>)
    };
    let p = probe.clone();
    let sink = move |args: &PluginArgs| -> Built {
        p.record_construction("FileSink", args);
        let parsed: PathArgs = args.deserialize()?;
        Ok(Box::new(FileSink { path: parsed.path }) as Box<dyn Plugin>)
    };

    Namespace::new("pkg", "1.0.0")
        .compatible_with("^0.1")
        .unwrap()
        .with_type("FileSource", source)
        .with_type("FileSink", sink)
}

/// Registry with the `test` and `pkg` namespaces registered.
pub fn registry(probe: &Arc<Probe>) -> PluginRegistry {
    let mut registry = PluginRegistry::with_current_api().unwrap();
    registry.register_namespace(test_namespace(probe)).unwrap();
    registry.register_namespace(pkg_namespace(probe)).unwrap();
    registry
}
