//! Frosted Glass Effect
//!
//! Tints the track with the host track color and blurs what's behind it.

use crate::css::hex_to_rgb;
use crate::fx::traits::{FxModule, ParamValues, StyleError};
use crate::fx::types::{GlobalContext, ParameterSpec};

/// Frosted glass effect definition
pub struct GlassDefinition;

impl FxModule for GlassDefinition {
    fn id(&self) -> &str {
        "fx_glass"
    }

    fn name(&self) -> &str {
        "Frosted Glass"
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::range("blur", "Blur (px)", 10.0, 0.0, 20.0),
            ParameterSpec::range("opacity", "Glass Opacity", 30.0, 0.0, 100.0),
            ParameterSpec::range("border", "Border Brightness", 30.0, 0.0, 100.0),
        ]
    }

    fn generate_style(&self, params: &ParamValues<'_>, globals: &GlobalContext) -> Result<String, StyleError> {
        let blur = params.number("blur")?;
        let op = params.number("opacity")? / 100.0;
        let border_op = params.number("border")? / 100.0;
        let track_rgb = hex_to_rgb(globals.str("trackColor").unwrap_or("#333333"));
        let inner_op = op * 0.5;

        Ok(format!(
            r#"
#goalDiv .progress {{
    background-color: rgba({track_rgb}, {op}) !important;
    backdrop-filter: blur({blur}px) !important;
    -webkit-backdrop-filter: blur({blur}px) !important;
    border: 1px solid rgba(255, 255, 255, {border_op}) !important;
    box-shadow:
        0 4px 6px rgba(0,0,0,0.1),
        inset 0 0 10px rgba({track_rgb}, {inner_op}) !important;
}}
"#
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::types::ModuleState;

    #[test]
    fn test_reads_track_color_from_globals() {
        let def = GlassDefinition;
        let specs = def.parameters();
        let state = ModuleState::seeded(true, &specs);
        let values = ParamValues::new(def.id(), &state, &specs);

        let css = def
            .generate_style(&values, &GlobalContext::new().with("trackColor", "#ff0000"))
            .unwrap();
        assert!(css.contains("background-color: rgba(255, 0, 0, 0.3) !important;"));
        assert!(css.contains("inset 0 0 10px rgba(255, 0, 0, 0.15) !important;"));

        let css = def.generate_style(&values, &GlobalContext::new()).unwrap();
        assert!(css.contains("rgba(51, 51, 51, 0.3)"));
    }
}
