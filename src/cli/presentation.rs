//! CLI presentation: renderer registrations per command family, plus plain formatters.

mod fastedge;
mod init;
mod network;
mod settings;

pub use fastedge::{format_app, format_app_list};
pub use init::format_init_summary;
pub use network::NetworkView;

use crate::render::RenderRegistry;
use tracing::debug;

/// Register every custom renderer. Called once at startup, before any command runs.
pub fn register_all(registry: &mut RenderRegistry) {
    fastedge::register(registry);
    network::register(registry);
    settings::register(registry);
    debug!(renderers = registry.len(), "render registry populated");
}

/// Fresh registry with every custom renderer registered.
pub fn default_registry() -> RenderRegistry {
    let mut registry = RenderRegistry::new();
    register_all(&mut registry);
    registry
}
