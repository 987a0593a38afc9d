//! Config command presentation.

use crate::commands::{ProfileName, ProfileView};
use crate::render::generic;
use crate::render::RenderRegistry;

pub fn register(registry: &mut RenderRegistry) {
    registry.register_single::<ProfileView, _>(|view, _| generic::format_value(view));
    registry.register_sequence::<ProfileName, _>(|profiles, _| {
        Ok(profiles
            .iter()
            .map(|p| {
                let marker = if p.active { "*" } else { " " };
                match &p.api_url {
                    Some(url) => format!("{} {}\t{}\n", marker, p.name, url),
                    None => format!("{} {}\n", marker, p.name),
                }
            })
            .collect())
    });
}
