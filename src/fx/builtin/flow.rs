//! Flow Shimmer Effect
//!
//! A bright highlight band that sweeps across the fill on `::after`.

use crate::fx::traits::{FxModule, ParamValues, StyleError};
use crate::fx::types::{GlobalContext, ParameterSpec};

const SHIMMER_GRADIENT: &str = "linear-gradient(
        120deg,
        rgba(255,255,255,0.0) 0%,
        rgba(255,255,255,0.04) 15%,
        rgba(255,255,255,0.12) 30%,
        rgba(255,255,255,0.25) 40%,
        rgba(255,255,255,0.95) 50%,
        rgba(255,255,255,0.25) 60%,
        rgba(255,255,255,0.12) 70%,
        rgba(255,255,255,0.04) 85%,
        rgba(255,255,255,0.0) 100%
    )";

/// Flow shimmer effect definition
pub struct FlowDefinition;

impl FxModule for FlowDefinition {
    fn id(&self) -> &str {
        "fx_original_flow"
    }

    fn name(&self) -> &str {
        "Flow Shimmer"
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![ParameterSpec::range_with_step("speed", "Flow Speed (s)", 2.5, 0.5, 10.0, 0.1)]
    }

    fn generate_style(&self, params: &ParamValues<'_>, _globals: &GlobalContext) -> Result<String, StyleError> {
        let speed = params.number("speed")?;
        // Keyframe name is fixed; older exported stylesheets reference it
        Ok(format!(
            r#"
#goalDiv .progress .progress-bar::after {{
    content: "" !important;
    position: absolute !important;
    top: 0 !important;
    left: -30% !important;
    width: 30% !important;
    height: 100% !important;
    background: {SHIMMER_GRADIENT} !important;
    animation: flowShimmerOriginal {speed}s linear infinite !important;
    z-index: 999 !important;
    pointer-events: none !important;
}}

@keyframes flowShimmerOriginal {{
    0%   {{ transform: translateX(0%); }}
    100% {{ transform: translateX(400%); }}
}}
"#
        ))
    }
}
