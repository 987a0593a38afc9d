//! Output rendering
//!
//! Turns response payloads into text. Raw mode echoes the response body untouched; human
//! mode dispatches through the [`RenderRegistry`] on the payload's type tag and shape and
//! falls back to the generic `Field:\tvalue` formatter when nothing is registered.

pub mod generic;
mod registry;

pub use registry::{
    RegistryKey, RenderRegistry, SequenceRenderFn, Shape, SingleRenderFn, TypeTag,
};

use crate::error::CliError;
use serde::Serialize;
use tracing::debug;

/// Output mode selected by the global `--output-raw` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Human,
    Raw,
}

impl OutputMode {
    pub fn from_raw_flag(raw: bool) -> Self {
        if raw {
            OutputMode::Raw
        } else {
            OutputMode::Human
        }
    }
}

/// Formatting hints passed to renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Plural resource name used for the empty-list sentence ("apps" -> "you have no apps").
    pub resource: Option<String>,
}

impl RenderOptions {
    pub fn resource(name: impl Into<String>) -> Self {
        Self {
            resource: Some(name.into()),
        }
    }
}

/// A payload type the CLI knows how to print.
pub trait Resource: Serialize + 'static {
    const TAG: TypeTag;
}

/// The value being rendered: one instance or an ordered sequence.
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a, T> {
    One(&'a T),
    Many(&'a [T]),
}

impl<T> Payload<'_, T> {
    pub fn shape(&self) -> Shape {
        match self {
            Payload::One(_) => Shape::Single,
            Payload::Many(_) => Shape::Sequence,
        }
    }
}

/// One command's output step.
#[derive(Debug, Clone)]
pub struct RenderRequest<'a, T> {
    pub value: Payload<'a, T>,
    pub mode: OutputMode,
    pub options: RenderOptions,
    /// Response body the value was decoded from; echoed verbatim in raw mode.
    pub raw_body: Option<&'a [u8]>,
}

impl<'a, T> RenderRequest<'a, T> {
    pub fn one(value: &'a T, mode: OutputMode) -> Self {
        Self {
            value: Payload::One(value),
            mode,
            options: RenderOptions::default(),
            raw_body: None,
        }
    }

    pub fn many(values: &'a [T], mode: OutputMode) -> Self {
        Self {
            value: Payload::Many(values),
            mode,
            options: RenderOptions::default(),
            raw_body: None,
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_raw_body(mut self, body: &'a [u8]) -> Self {
        self.raw_body = Some(body);
        self
    }
}

/// Dispatches render requests against a frozen registry.
#[derive(Clone, Copy)]
pub struct Renderer<'r> {
    registry: &'r RenderRegistry,
}

impl<'r> Renderer<'r> {
    pub fn new(registry: &'r RenderRegistry) -> Self {
        Self { registry }
    }

    pub fn render<T: Resource>(&self, request: RenderRequest<'_, T>) -> Result<String, CliError> {
        match request.mode {
            OutputMode::Raw => self.render_raw(&request),
            OutputMode::Human => self.render_human(&request),
        }
    }

    fn render_raw<T: Resource>(&self, request: &RenderRequest<'_, T>) -> Result<String, CliError> {
        debug!(tag = ?T::TAG, shape = ?request.value.shape(), "raw render");
        if let Some(body) = request.raw_body {
            return Ok(match String::from_utf8(body.to_vec()) {
                Ok(text) => text,
                Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
            });
        }
        let text = match request.value {
            Payload::One(value) => serde_json::to_string_pretty(value)?,
            Payload::Many(values) => serde_json::to_string_pretty(values)?,
        };
        Ok(text)
    }

    fn render_human<T: Resource>(
        &self,
        request: &RenderRequest<'_, T>,
    ) -> Result<String, CliError> {
        let options = &request.options;
        match request.value {
            Payload::Many(values) if values.is_empty() => {
                debug!(tag = ?T::TAG, "empty sequence");
                Ok(match &options.resource {
                    Some(resource) => format!("you have no {}\n", resource),
                    None => String::new(),
                })
            }
            Payload::One(value) => match self.registry.lookup_single::<T>()? {
                Some(render) => {
                    debug!(tag = ?T::TAG, shape = ?Shape::Single, "registry hit");
                    render(value, options)
                }
                None => {
                    debug!(tag = ?T::TAG, shape = ?Shape::Single, "registry miss; generic fallback");
                    generic::format_value(value)
                }
            },
            Payload::Many(values) => match self.registry.lookup_sequence::<T>()? {
                Some(render) => {
                    debug!(tag = ?T::TAG, shape = ?Shape::Sequence, count = values.len(), "registry hit");
                    render(values, options)
                }
                None => {
                    debug!(tag = ?T::TAG, shape = ?Shape::Sequence, count = values.len(), "registry miss; generic fallback");
                    generic::format_sequence(values)
                }
            },
        }
    }
}
