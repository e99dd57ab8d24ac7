//! Rainbow Flow Effect
//!
//! Rotates the hue of the fill through a full turn.

use crate::fx::traits::{FxModule, ParamValues, StyleError};
use crate::fx::types::{GlobalContext, ParameterSpec};

/// Rainbow flow effect definition
pub struct RainbowPulseDefinition;

impl FxModule for RainbowPulseDefinition {
    fn id(&self) -> &str {
        "fx_rainbow_pulse"
    }

    fn name(&self) -> &str {
        "Rainbow Flow"
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![ParameterSpec::range_with_step("speed", "Cycle Length (s)", 3.0, 0.5, 10.0, 0.1)]
    }

    fn generate_style(&self, params: &ParamValues<'_>, _globals: &GlobalContext) -> Result<String, StyleError> {
        let anim = format!("rainbow_{}", params.module_id());
        let speed = params.number("speed")?;
        // 0deg -> 360deg lands back on the start hue, so the loop is seamless
        Ok(format!(
            r#"
#goalDiv .progress .progress-bar {{
    animation: {anim} {speed}s linear infinite !important;
}}

@keyframes {anim} {{
    0%   {{ filter: hue-rotate(0deg); }}
    100% {{ filter: hue-rotate(360deg); }}
}}
"#
        ))
    }
}
