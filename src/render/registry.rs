//! Render registry: (type tag, shape) -> rendering function.
//!
//! Entries are type-erased on insert and downcast back to the concrete function type on
//! lookup, so a tag can only ever hand out a renderer for the type it was registered with.

use crate::error::CliError;
use crate::render::{RenderOptions, Resource};
use std::any::Any;
use std::collections::HashMap;
use tracing::debug;

/// Discriminant selecting a renderer. One variant per payload type the CLI can print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    App,
    AppSummary,
    Binary,
    BinarySummary,
    PlanName,
    Plan,
    CallStats,
    DurationStats,
    Network,
    TaskList,
    Task,
    ProfileView,
    ProfileName,
}

/// Whether a renderer handles one value or an ordered sequence of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shape {
    Single,
    Sequence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistryKey {
    pub tag: TypeTag,
    pub shape: Shape,
}

impl RegistryKey {
    pub fn new(tag: TypeTag, shape: Shape) -> Self {
        Self { tag, shape }
    }
}

pub type SingleRenderFn<T> =
    Box<dyn Fn(&T, &RenderOptions) -> Result<String, CliError> + Send + Sync>;
pub type SequenceRenderFn<T> =
    Box<dyn Fn(&[T], &RenderOptions) -> Result<String, CliError> + Send + Sync>;

/// Process-wide table of custom renderers.
///
/// Populated once at startup, then only read. Registering a key twice overwrites the
/// earlier entry (last wins).
#[derive(Default)]
pub struct RenderRegistry {
    entries: HashMap<RegistryKey, Box<dyn Any + Send + Sync>>,
}

impl RenderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer for single values of `T`. Returns true if it replaced one.
    pub fn register_single<T, F>(&mut self, render: F) -> bool
    where
        T: Resource,
        F: Fn(&T, &RenderOptions) -> Result<String, CliError> + Send + Sync + 'static,
    {
        let boxed: SingleRenderFn<T> = Box::new(render);
        self.insert(RegistryKey::new(T::TAG, Shape::Single), Box::new(boxed))
    }

    /// Register a renderer for sequences of `T`. Returns true if it replaced one.
    pub fn register_sequence<T, F>(&mut self, render: F) -> bool
    where
        T: Resource,
        F: Fn(&[T], &RenderOptions) -> Result<String, CliError> + Send + Sync + 'static,
    {
        let boxed: SequenceRenderFn<T> = Box::new(render);
        self.insert(RegistryKey::new(T::TAG, Shape::Sequence), Box::new(boxed))
    }

    fn insert(&mut self, key: RegistryKey, entry: Box<dyn Any + Send + Sync>) -> bool {
        let replaced = self.entries.insert(key, entry).is_some();
        if replaced {
            debug!(tag = ?key.tag, shape = ?key.shape, "renderer replaced");
        }
        replaced
    }

    /// Renderer for single `T`, if one is registered.
    pub fn lookup_single<T: Resource>(&self) -> Result<Option<&SingleRenderFn<T>>, CliError> {
        self.lookup::<SingleRenderFn<T>>(RegistryKey::new(T::TAG, Shape::Single))
    }

    /// Renderer for sequences of `T`, if one is registered.
    pub fn lookup_sequence<T: Resource>(&self) -> Result<Option<&SequenceRenderFn<T>>, CliError> {
        self.lookup::<SequenceRenderFn<T>>(RegistryKey::new(T::TAG, Shape::Sequence))
    }

    fn lookup<F: 'static>(&self, key: RegistryKey) -> Result<Option<&F>, CliError> {
        match self.entries.get(&key) {
            None => Ok(None),
            Some(entry) => entry.downcast_ref::<F>().map(Some).ok_or_else(|| {
                CliError::Render(format!(
                    "renderer registered for {:?}/{:?} belongs to a different type",
                    key.tag, key.shape
                ))
            }),
        }
    }

    pub fn contains(&self, key: RegistryKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Registered keys in a stable order.
    pub fn keys(&self) -> Vec<RegistryKey> {
        let mut keys: Vec<RegistryKey> = self.entries.keys().copied().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
