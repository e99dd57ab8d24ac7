//! Glitch Effect
//!
//! Clip-path jitter on the fill plus red/blue split layers.

use crate::fx::traits::{FxModule, ParamValues, StyleError};
use crate::fx::types::{GlobalContext, ParameterSpec};

/// Seconds per glitch cycle
const CYCLE: f64 = 2.5;

/// Glitch effect definition
pub struct GlitchDefinition;

impl FxModule for GlitchDefinition {
    fn id(&self) -> &str {
        "fx_glitch"
    }

    fn name(&self) -> &str {
        "Glitch"
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![ParameterSpec::range("intensity", "Glitch Intensity", 5.0, 1.0, 10.0)]
    }

    fn generate_style(&self, params: &ParamValues<'_>, _globals: &GlobalContext) -> Result<String, StyleError> {
        let anim = format!("glitch_anim_{}", params.module_id());
        let rgb = format!("glitch_rgb_{}", params.module_id());
        let i = params.number("intensity")?;
        let red_cycle = CYCLE * 0.8;
        let blue_cycle = CYCLE * 1.1;

        Ok(format!(
            r#"
#goalDiv .progress .progress-bar {{
    position: relative !important;
    animation: {anim} {CYCLE}s infinite linear alternate-reverse !important;
}}

#goalDiv .progress .progress-bar::before {{
    content: "" !important;
    position: absolute !important;
    top: 0; left: 0; width: 100%; height: 100%;
    background: red !important;
    mix-blend-mode: screen !important;
    opacity: 0.5 !important;
    z-index: -1 !important;
    animation: {rgb} {red_cycle}s infinite steps(2) !important;
    display: block !important;
}}

#goalDiv .progress .progress-bar::after {{
    content: "" !important;
    position: absolute !important;
    top: 0; left: 0; width: 100%; height: 100%;
    background: blue !important;
    mix-blend-mode: screen !important;
    opacity: 0.5 !important;
    z-index: -1 !important;
    animation: {rgb} {blue_cycle}s infinite steps(2) reverse !important;
    display: block !important;
}}

@keyframes {anim} {{
    0% {{ clip-path: inset(0 0 0 0); transform: translate(0); }}
    5% {{ clip-path: inset(10% 0 60% 0); transform: translate(-2px, 1px); }}
    10% {{ clip-path: inset(80% 0 5% 0); transform: translate(2px, -1px); }}
    15% {{ clip-path: inset(0 0 0 0); transform: translate(0); }}
    60% {{ clip-path: inset(0 0 0 0); transform: translate(0); }}
    65% {{ clip-path: inset(40% 0 40% 0); transform: translate(1px, 1px); }}
    70% {{ clip-path: inset(0 0 0 0); transform: translate(0); }}
    100% {{ clip-path: inset(0 0 0 0); transform: translate(0); }}
}}

@keyframes {rgb} {{
    0% {{ transform: translate(0); }}
    20% {{ transform: translate(-{i}px, {i}px); }}
    40% {{ transform: translate(-{i}px, -{i}px); }}
    60% {{ transform: translate({i}px, {i}px); }}
    80% {{ transform: translate({i}px, -{i}px); }}
    100% {{ transform: translate(0); }}
}}
"#
        ))
    }
}
