//! Segmented Blocks Effect
//!
//! Cuts the fill into angled blocks with a repeating mask.

use crate::fx::traits::{FxModule, ParamValues, StyleError};
use crate::fx::types::{GlobalContext, ParameterSpec};

/// Segmented blocks effect definition
pub struct SegmentedDefinition;

impl FxModule for SegmentedDefinition {
    fn id(&self) -> &str {
        "fx_segmented"
    }

    fn name(&self) -> &str {
        "Segmented Blocks"
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::range("gap", "Gap Width (px)", 4.0, 1.0, 20.0),
            ParameterSpec::range("width", "Block Width (px)", 15.0, 5.0, 50.0),
            ParameterSpec::range("angle", "Cut Angle", 110.0, 0.0, 180.0),
        ]
    }

    fn generate_style(&self, params: &ParamValues<'_>, _globals: &GlobalContext) -> Result<String, StyleError> {
        let gap = params.number("gap")?;
        let width = params.number("width")?;
        let angle = params.number("angle")?;
        // Period is computed on whole pixels
        let total = width.trunc() + gap.trunc();

        // Opaque stops show the fill, transparent stops cut it
        let mask = format!(
            "repeating-linear-gradient(
        {angle}deg,
        #000 0px,
        #000 {width}px,
        transparent {width}px,
        transparent {total}px
    )"
        );

        Ok(format!(
            r#"
#goalDiv .progress .progress-bar {{
    -webkit-mask-image: {mask} !important;
    mask-image: {mask} !important;
    -webkit-mask-size: 100% 100% !important;
}}
"#
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::types::ModuleState;
    use serde_json::json;

    #[test]
    fn test_period_uses_whole_pixels() {
        let def = SegmentedDefinition;
        let specs = def.parameters();
        let mut state = ModuleState::seeded(true, &specs);
        state.set("gap", json!("4.7"));
        state.set("width", json!(15));

        let css = def
            .generate_style(&ParamValues::new(def.id(), &state, &specs), &GlobalContext::new())
            .unwrap();
        assert!(css.contains("transparent 15px,"));
        assert!(css.contains("transparent 19px"));
    }
}
