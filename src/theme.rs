//! Host theme and the full overlay stylesheet
//!
//! Theme values are the global context handed to every FX module. The base
//! goal-bar rules are rendered here and the composed FX section is appended.

use serde_json::{json, Value};

use crate::css::hex_to_rgb;
use crate::fx::{value_as_bool, value_as_f64, GlobalContext};

/// Theme fields the base stylesheet understands, with their defaults
pub fn default_theme() -> GlobalContext {
    let defaults = json!({
        "fontSize": 50, "fontColor": "#ffffff", "fontY": 0, "fontX": 0,
        "fontStroke": false, "fontShadow": true,
        "barHeight": 60, "barRadius": 80, "borderWidth": 0, "barPadding": 0,
        "trackColor": "#333333", "trackOpacity": 100,
        "fillColor1": "#00ffcc", "fillColor2": "#0099ff", "fillAngle": 90
    });
    match defaults {
        Value::Object(fields) => GlobalContext::from_fields(fields),
        _ => GlobalContext::new(),
    }
}

/// Theme lookup falling back to the defaults per field
struct ThemeView<'a> {
    theme: &'a GlobalContext,
    defaults: GlobalContext,
}

impl ThemeView<'_> {
    fn value(&self, key: &str) -> Option<&Value> {
        self.theme
            .get(key)
            .filter(|v| !v.is_null())
            .or_else(|| self.defaults.get(key))
    }

    /// Raw value as it should appear in CSS
    fn text(&self, key: &str) -> String {
        match self.value(key) {
            Some(Value::String(s)) => s.clone(),
            Some(v) => v.to_string(),
            None => String::new(),
        }
    }

    fn number(&self, key: &str) -> f64 {
        self.value(key)
            .and_then(value_as_f64)
            .or_else(|| self.defaults.number(key))
            .unwrap_or(0.0)
    }

    fn flag(&self, key: &str) -> bool {
        self.value(key).and_then(value_as_bool).unwrap_or(false)
    }
}

/// Render the complete stylesheet: base rules followed by the FX section
pub fn render_stylesheet(theme: &GlobalContext, fx_css: &str) -> String {
    let v = ThemeView {
        theme,
        defaults: default_theme(),
    };

    let track_rgba = format!("rgba({}, {})", hex_to_rgb(&v.text("trackColor")), v.number("trackOpacity") / 100.0);
    let fill1_rgb = hex_to_rgb(&v.text("fillColor1"));
    let font_rgb = hex_to_rgb(&v.text("fontColor"));

    let text_shadow = if v.flag("fontShadow") {
        format!("0 0 5px rgba({font_rgb}, 0.8), 0 0 10px rgba({fill1_rgb}, 0.5)")
    } else {
        "none".to_string()
    };
    let text_stroke = if v.flag("fontStroke") {
        "-webkit-text-stroke: 1px rgba(0,0,0,0.8);"
    } else {
        ""
    };

    let font_y = v.text("fontY");
    let font_x = v.text("fontX");
    let font_color = v.text("fontColor");
    let font_size = v.text("fontSize");
    let bar_height = v.text("barHeight");
    let bar_radius = v.text("barRadius");
    let border_width = v.text("borderWidth");
    let bar_padding = v.text("barPadding");
    let fill_angle = v.text("fillAngle");
    let fill1 = v.text("fillColor1");
    let fill2 = v.text("fillColor2");

    format!(
        r#"/* Generated by overlay-fx */
body, html {{ overflow: hidden !important; margin: 0 !important; padding: 0 !important; }}
body::-webkit-scrollbar {{ display: none !important; }}

/* Goal container */
#goalDiv {{ position: relative !important; }}

/* Label */
#goalDiv #goalBackground {{
    position: absolute !important; top: 50% !important; left: 0 !important; width: 100% !important; text-align: center !important; transform: translateY(-50%) !important;
    margin-top: {font_y}px !important; margin-left: {font_x}px !important; z-index: 100 !important;
    font-family: "Microsoft JhengHei", system-ui, sans-serif !important; font-weight: 800 !important; color: {font_color} !important; font-size: {font_size}px !important;
    background: none !important; -webkit-background-clip: border-box !important; text-shadow: {text_shadow} !important; {text_stroke}
}}

/* Track */
#goalDiv .progress {{
    --bs-progress-bg: {track_rgba} !important;
    width: 100% !important; height: {bar_height}px !important;
    background: {track_rgba} !important; background-color: {track_rgba} !important;
    border-radius: {bar_radius}px !important; border: {border_width}px solid rgba(255,255,255,0.1) !important;
    padding: {bar_padding}px !important; box-shadow: inset 0 0 10px rgba(0,0,0,0.5) !important;
    overflow: hidden !important; position: relative !important; z-index: 1 !important;
    transform: translateZ(0);
}}

/* Fill */
#goalDiv .progress .progress-bar {{
    height: 100% !important; border-radius: inherit !important;
    background: linear-gradient({fill_angle}deg, {fill1}, {fill2}) !important;
    position: relative !important; z-index: 10 !important; overflow: hidden !important; transition: width 0.3s ease !important;
}}

/* ==================
   Plugin FX Section
   ================== */
{fx_css}
"#
    )
}
