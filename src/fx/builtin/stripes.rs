//! Diagonal Stripes Effect

use crate::fx::traits::{FxModule, ParamValues, StyleError};
use crate::fx::types::{GlobalContext, ParameterSpec};

/// Diagonal stripes effect definition
pub struct StripesDefinition;

impl FxModule for StripesDefinition {
    fn id(&self) -> &str {
        "fx_stripes"
    }

    fn name(&self) -> &str {
        "Diagonal Stripes"
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![ParameterSpec::boolean("enableStripes", "Show Stripe Overlay", true)]
    }

    fn generate_style(&self, params: &ParamValues<'_>, _globals: &GlobalContext) -> Result<String, StyleError> {
        if !params.flag("enableStripes")? {
            return Ok(String::new());
        }

        Ok(r#"
#goalDiv .progress .progress-bar::before {
    content: "";
    position: absolute;
    inset: 0;
    pointer-events: none;
    background-image: linear-gradient(
        45deg,
        rgba(255,255,255,0.10) 25%,
        transparent 25%,
        transparent 50%,
        rgba(255,255,255,0.10) 50%,
        rgba(255,255,255,0.10) 75%,
        transparent 75%,
        transparent
    );
    background-size: 40px 40px;
}
"#
        .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::types::ModuleState;

    #[test]
    fn test_overlay_flag_off_contributes_nothing() {
        let def = StripesDefinition;
        let specs = def.parameters();
        let mut state = ModuleState::seeded(true, &specs);
        state.set("enableStripes", serde_json::Value::Bool(false));

        let css = def
            .generate_style(&ParamValues::new(def.id(), &state, &specs), &GlobalContext::new())
            .unwrap();
        assert!(css.is_empty());
    }
}
