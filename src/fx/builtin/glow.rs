//! Breathing Neon Glow Effect
//!
//! The glow lives on the track's `::before` so its animation isn't
//! overridden by the base stylesheet's `!important` rules.

use crate::fx::traits::{FxModule, ParamValues, StyleError};
use crate::fx::types::{GlobalContext, ParameterSpec};

/// Breathing glow effect definition
pub struct GlowDefinition;

impl FxModule for GlowDefinition {
    fn id(&self) -> &str {
        "fx_glow_pulse"
    }

    fn name(&self) -> &str {
        "Breathing Neon Glow"
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::range("intensity", "Max Intensity", 30.0, 10.0, 100.0),
            ParameterSpec::range_with_step("speed", "Breath Speed (s)", 2.0, 0.5, 5.0, 0.1),
            ParameterSpec::color("glowColor", "Glow Color", "#00eaff"),
        ]
    }

    fn generate_style(&self, params: &ParamValues<'_>, _globals: &GlobalContext) -> Result<String, StyleError> {
        let size = params.number("intensity")?;
        let half = size * 0.5;
        let speed = params.number("speed")?;
        let color = params.color("glowColor")?;
        let anim = format!("glowBreath_{}", params.module_id());

        Ok(format!(
            r#"
@keyframes {anim} {{
    0% {{ box-shadow: 0 0 {half}px {color}33; }}
    100% {{ box-shadow: 0 0 {size}px {color}; }}
}}

#goalDiv .progress {{
    overflow: visible !important;
}}

#goalDiv .progress::before {{
    content: "" !important;
    position: absolute !important;
    top: 0 !important; left: 0 !important; width: 100% !important; height: 100% !important;
    border-radius: inherit !important;
    z-index: -1 !important;
    animation: {anim} {speed}s ease-in-out infinite alternate !important;
}}

#goalDiv .progress .progress-bar {{
    overflow: hidden !important;
    border-radius: inherit !important;
    box-shadow: 0 0 {half}px {color}80 !important;
}}
"#
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::{compose, FxRegistry};
    use serde_json::json;

    #[test]
    fn test_shorthand_color_keeps_alpha_suffix_valid() {
        let mut registry = FxRegistry::new();
        registry.register(GlowDefinition).unwrap();
        registry.set_enabled("fx_glow_pulse", true);
        registry.set_parameter("fx_glow_pulse", "glowColor", json!("#fff"));

        let css = compose(&registry, &GlobalContext::new());
        assert!(css.contains("box-shadow: 0 0 15px #ffffff33;"));
        assert!(css.contains("#ffffff80 !important;"));
        assert!(!css.contains("#fff33"));
    }
}
