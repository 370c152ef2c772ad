//! `core.interceptors`: text transforms.
//!
//! All interceptors operate on text. `Bytes` content must be valid UTF-8;
//! `Structured` content is rejected rather than rendered.
use broker_core::declare_plugin;
use broker_core::plugin_system::{
    BoxError, Content, Interceptor, Namespace, Plugin, PluginArgs, PluginSystemError,
};

pub const NAMESPACE: &str = "core.interceptors";
const COMPATIBLE_API_REQ: &str = "^0.1";

pub fn namespace() -> Result<Namespace, PluginSystemError> {
    Ok(Namespace::new(NAMESPACE, env!("CARGO_PKG_VERSION"))
        .compatible_with(COMPATIBLE_API_REQ)?
        .with_type("Uppercase", |_: &PluginArgs| boxed(Uppercase))
        .with_type("Lowercase", |_: &PluginArgs| boxed(Lowercase))
        .with_type("Trim", |_: &PluginArgs| boxed(Trim)))
}

fn boxed(plugin: impl Plugin) -> Result<Box<dyn Plugin>, BoxError> {
    Ok(Box::new(plugin))
}

/// Extract the text of `content`, keeping the variant so the result can be
/// re-wrapped the same way.
fn map_text(content: Content, f: impl FnOnce(&str) -> String) -> Result<Content, BoxError> {
    match content {
        Content::Text(text) => Ok(Content::Text(f(&text))),
        Content::Bytes(bytes) => {
            let text = String::from_utf8(bytes)
                .map_err(|e| format!("content is not valid UTF-8: {}", e))?;
            Ok(Content::Bytes(f(&text).into_bytes()))
        }
        Content::Structured(_) => Err("structured content is not text".into()),
    }
}

#[derive(Debug, Default)]
pub struct Uppercase;

impl Interceptor for Uppercase {
    fn transform(&self, content: Content) -> Result<Content, BoxError> {
        map_text(content, str::to_uppercase)
    }
}

declare_plugin!(Uppercase: Interceptor);

#[derive(Debug, Default)]
pub struct Lowercase;

impl Interceptor for Lowercase {
    fn transform(&self, content: Content) -> Result<Content, BoxError> {
        map_text(content, str::to_lowercase)
    }
}

declare_plugin!(Lowercase: Interceptor);

/// Strips leading and trailing whitespace.
#[derive(Debug, Default)]
pub struct Trim;

impl Interceptor for Trim {
    fn transform(&self, content: Content) -> Result<Content, BoxError> {
        map_text(content, |text| text.trim().to_string())
    }
}

declare_plugin!(Trim: Interceptor);
