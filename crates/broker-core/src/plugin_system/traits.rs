use std::borrow::Cow;
use std::fmt;

use async_trait::async_trait;

use crate::plugin_system::capability::CapabilitySet;

/// Error type plugins report through their capability methods.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The payload moved by a task. Opaque to the core.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Bytes(Vec<u8>),
    Text(String),
    Structured(serde_json::Value),
}

impl Content {
    /// Text view of the content. Bytes must be valid UTF-8; structured
    /// content is rendered as compact JSON.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Content::Text(text) => Some(Cow::Borrowed(text)),
            Content::Bytes(bytes) => std::str::from_utf8(bytes).ok().map(Cow::Borrowed),
            Content::Structured(value) => Some(Cow::Owned(value.to_string())),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Content::Bytes(bytes) => bytes,
            Content::Text(text) => text.into_bytes(),
            Content::Structured(value) => value.to_string().into_bytes(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Content::Bytes(_) => "bytes",
            Content::Text(_) => "text",
            Content::Structured(_) => "structured",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Content::Bytes(bytes) => bytes.len(),
            Content::Text(text) => text.len(),
            Content::Structured(value) => value.to_string().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => f.write_str(&text),
            None => write!(f, "<{} bytes>", self.len()),
        }
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Content {
    fn from(bytes: Vec<u8>) -> Self {
        Content::Bytes(bytes)
    }
}

impl From<serde_json::Value> for Content {
    fn from(value: serde_json::Value) -> Self {
        Content::Structured(value)
    }
}

/// Marker capability shared by every source and destination.
pub trait Endpoint: Send + Sync {}

#[async_trait]
pub trait SourceEndpoint: Endpoint {
    async fn pull(&self) -> Result<Content, BoxError>;
}

#[async_trait]
pub trait DestinationEndpoint: Endpoint {
    async fn push(&self, content: Content) -> Result<(), BoxError>;
}

pub trait Interceptor: Send + Sync {
    fn transform(&self, content: Content) -> Result<Content, BoxError>;
}

/// Core trait that every resolvable plugin implements.
///
/// `capabilities` is the declared set the validator checks; the `into_*`
/// conversions hand out the typed trait object for an accepted role. Use
/// [`declare_plugin!`](crate::declare_plugin) to keep the two in sync.
pub trait Plugin: Send + Sync + 'static {
    fn capabilities(&self) -> CapabilitySet;

    fn into_source(self: Box<Self>) -> Option<Box<dyn SourceEndpoint>> {
        None
    }

    fn into_destination(self: Box<Self>) -> Option<Box<dyn DestinationEndpoint>> {
        None
    }

    fn into_interceptor(self: Box<Self>) -> Option<Box<dyn Interceptor>> {
        None
    }

    fn into_logger(self: Box<Self>) -> Option<Box<dyn log::Log>> {
        None
    }
}

/// Implement [`Plugin`] for a type from the list of capabilities it satisfies.
///
/// ```ignore
/// declare_plugin!(FileSource: Endpoint, SourceEndpoint);
/// declare_plugin!(Uppercase: Interceptor);
/// ```
#[macro_export]
macro_rules! declare_plugin {
    (@into Endpoint) => {};
    (@into SourceEndpoint) => {
        fn into_source(
            self: Box<Self>,
        ) -> Option<Box<dyn $crate::plugin_system::SourceEndpoint>> {
            Some(self)
        }
    };
    (@into DestinationEndpoint) => {
        fn into_destination(
            self: Box<Self>,
        ) -> Option<Box<dyn $crate::plugin_system::DestinationEndpoint>> {
            Some(self)
        }
    };
    (@into Interceptor) => {
        fn into_interceptor(
            self: Box<Self>,
        ) -> Option<Box<dyn $crate::plugin_system::Interceptor>> {
            Some(self)
        }
    };
    (@into Logger) => {
        fn into_logger(self: Box<Self>) -> Option<Box<dyn $crate::log::Log>> {
            Some(self)
        }
    };
    ($plugin:ty : $($capability:ident),+ $(,)?) => {
        impl $crate::plugin_system::Plugin for $plugin {
            fn capabilities(&self) -> $crate::plugin_system::CapabilitySet {
                $crate::plugin_system::CapabilitySet::empty()
                    $(.with($crate::plugin_system::Capability::$capability))+
            }

            $( $crate::declare_plugin!(@into $capability); )+
        }
    };
}
