//! Built-in effects
//!
//! The stock goal-bar effects that ship with the designer. Each is an
//! interchangeable leaf implementing [`FxModule`].

mod flow;
mod glass;
mod glitch;
mod gloss_sweep;
mod glow;
mod heartbeat;
mod rainbow_pulse;
mod segmented;
mod stripes;

use std::sync::Arc;

pub use flow::FlowDefinition;
pub use glass::GlassDefinition;
pub use glitch::GlitchDefinition;
pub use gloss_sweep::GlossSweepDefinition;
pub use glow::GlowDefinition;
pub use heartbeat::HeartbeatDefinition;
pub use rainbow_pulse::RainbowPulseDefinition;
pub use segmented::SegmentedDefinition;
pub use stripes::StripesDefinition;

use super::{FxModule, FxRegistry, RegistryError};

/// Catalog names of the built-in effects, in a stable order
pub const BUILTIN_SOURCES: &[&str] = &[
    "flow",
    "fx_gloss_sweep",
    "fx_heartbeat",
    "fx_rainbow_pulse",
    "glass",
    "glitch",
    "glow",
    "segmented",
    "stripes",
];

/// Construct a built-in effect by catalog name or module id
///
/// Accepts the bare name (`"glow"`), a script-style file name
/// (`"glow.js"`), or the module id (`"fx_glow_pulse"`).
pub fn create(source: &str) -> Option<Arc<dyn FxModule>> {
    let key = source
        .strip_suffix(".js")
        .or_else(|| source.strip_suffix(".json"))
        .unwrap_or(source);

    let module: Arc<dyn FxModule> = match key {
        "flow" | "fx_original_flow" => Arc::new(FlowDefinition),
        "fx_gloss_sweep" | "gloss_sweep" => Arc::new(GlossSweepDefinition),
        "fx_heartbeat" | "heartbeat" => Arc::new(HeartbeatDefinition),
        "fx_rainbow_pulse" | "rainbow_pulse" => Arc::new(RainbowPulseDefinition),
        "glass" | "fx_glass" => Arc::new(GlassDefinition),
        "glitch" | "fx_glitch" => Arc::new(GlitchDefinition),
        "glow" | "fx_glow_pulse" => Arc::new(GlowDefinition),
        "segmented" | "fx_segmented" => Arc::new(SegmentedDefinition),
        "stripes" | "fx_stripes" => Arc::new(StripesDefinition),
        _ => return None,
    };
    Some(module)
}

/// Register all built-in effects with the registry
pub fn register_builtin_effects(registry: &mut FxRegistry) -> Result<(), RegistryError> {
    for source in BUILTIN_SOURCES {
        if let Some(module) = create(source) {
            registry.register_arc(module)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::{compose, GlobalContext};

    #[test]
    fn test_create_accepts_aliases() {
        assert_eq!(create("glow.js").unwrap().id(), "fx_glow_pulse");
        assert_eq!(create("fx_glow_pulse").unwrap().id(), "fx_glow_pulse");
        assert_eq!(create("flow").unwrap().id(), "fx_original_flow");
        assert!(create("sparkles.js").is_none());
    }

    #[test]
    fn test_builtin_ids_are_unique() {
        let mut registry = FxRegistry::new();
        register_builtin_effects(&mut registry).unwrap();
        assert_eq!(registry.len(), BUILTIN_SOURCES.len());
    }

    #[test]
    fn test_all_builtins_generate_with_defaults() {
        let mut registry = FxRegistry::new();
        register_builtin_effects(&mut registry).unwrap();
        for id in registry.order().to_vec() {
            registry.set_enabled(&id, true);
        }

        let css = compose(&registry, &GlobalContext::new());
        for entry in registry.entries() {
            assert!(css.contains(&format!("/* FX: {} */", entry.module.name())));
        }
        assert!(css.contains("@keyframes glowBreath_fx_glow_pulse"));
        assert!(css.contains("mask-image: repeating-linear-gradient("));
    }
}
