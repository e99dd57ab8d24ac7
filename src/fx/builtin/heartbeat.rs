//! Heartbeat Effect
//!
//! Scales the fill in a double-beat rhythm.

use crate::fx::traits::{FxModule, ParamValues, StyleError};
use crate::fx::types::{GlobalContext, ParameterSpec};

/// Heartbeat effect definition
pub struct HeartbeatDefinition;

impl FxModule for HeartbeatDefinition {
    fn id(&self) -> &str {
        "fx_heartbeat"
    }

    fn name(&self) -> &str {
        "Heartbeat"
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![ParameterSpec::range_with_step("speed", "Beat Speed (s)", 1.0, 0.3, 3.0, 0.1)]
    }

    fn generate_style(&self, params: &ParamValues<'_>, _globals: &GlobalContext) -> Result<String, StyleError> {
        let anim = format!("heartbeat_{}", params.module_id());
        let speed = params.number("speed")?;
        Ok(format!(
            r#"
#goalDiv .progress .progress-bar {{
    animation: {anim} {speed}s infinite ease-in-out !important;
}}
@keyframes {anim} {{
    0%   {{ transform: scale(1); }}
    30%  {{ transform: scale(1.1); }}
    60%  {{ transform: scale(1); }}
    100% {{ transform: scale(1); }}
}}
"#
        ))
    }
}
