//! Gloss Sweep Effect

use crate::fx::traits::{FxModule, ParamValues, StyleError};
use crate::fx::types::{GlobalContext, ParameterSpec};

/// Gloss sweep effect definition
pub struct GlossSweepDefinition;

impl FxModule for GlossSweepDefinition {
    fn id(&self) -> &str {
        "fx_gloss_sweep"
    }

    fn name(&self) -> &str {
        "Gloss Sweep"
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![ParameterSpec::range_with_step("speed", "Sweep Speed (s)", 1.2, 0.3, 5.0, 0.1)]
    }

    fn generate_style(&self, params: &ParamValues<'_>, _globals: &GlobalContext) -> Result<String, StyleError> {
        let anim = format!("gloss_{}", params.module_id());
        let speed = params.number("speed")?;
        Ok(format!(
            r#"
#goalDiv .progress .progress-bar::before {{
    content: "";
    position: absolute;
    inset: 0;
    background: linear-gradient(
        60deg,
        transparent 0%,
        #ffffff55 40%,
        transparent 100%
    );
    animation: {anim} {speed}s infinite linear !important;
}}
@keyframes {anim} {{
    from {{ transform: translateX(-100%); }}
    to   {{ transform: translateX(100%); }}
}}
"#
        ))
    }
}
