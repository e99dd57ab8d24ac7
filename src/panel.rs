//! Control panel
//!
//! Builds the editing widgets for every registered module from its declared
//! parameters and current state, and renders them as HTML for the designer
//! page. The panel is a thin consumer of the registry; it never mutates it.

use serde::Serialize;

use crate::fx::{FxRegistry, ModuleState, ParamKind, ParamValues, ParameterSpec};

/// Editing widget with its current value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Widget {
    Range { min: f64, max: f64, step: f64, value: f64 },
    Color { value: String },
    Checkbox { checked: bool },
}

/// One parameter row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control {
    pub param_id: String,
    pub label: String,
    #[serde(flatten)]
    pub widget: Widget,
}

/// Header toggle plus parameter rows for one module
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSection {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    /// Parameters are shown but inert while the module is off
    pub dimmed: bool,
    pub controls: Vec<Control>,
}

/// The whole control panel, sections in registration order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PanelModel {
    pub sections: Vec<PanelSection>,
}

/// Build the panel model from the registry's current state
pub fn build(registry: &FxRegistry) -> PanelModel {
    let sections = registry
        .entries()
        .map(|entry| {
            let seeded;
            let state = match entry.state {
                Some(state) => state,
                None => {
                    seeded = ModuleState::seeded(entry.module.default_enabled(), entry.parameters);
                    &seeded
                }
            };
            let values = ParamValues::new(entry.id, state, entry.parameters);
            let enabled = state.enabled();
            PanelSection {
                id: entry.id.to_string(),
                name: entry.module.name().to_string(),
                enabled,
                dimmed: !enabled,
                controls: entry.parameters.iter().map(|spec| control(spec, &values)).collect(),
            }
        })
        .collect();
    PanelModel { sections }
}

fn control(spec: &ParameterSpec, values: &ParamValues<'_>) -> Control {
    let widget = match spec.kind {
        ParamKind::Range { min, max, step } => Widget::Range {
            min,
            max,
            step,
            value: values.number(&spec.id).unwrap_or(min),
        },
        ParamKind::Color => Widget::Color {
            value: values.color(&spec.id).unwrap_or_else(|_| "#ffffff".to_string()),
        },
        ParamKind::Boolean => Widget::Checkbox {
            checked: values.flag(&spec.id).unwrap_or(false),
        },
    };
    Control {
        param_id: spec.id.clone(),
        label: spec.label.clone(),
        widget,
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the widget markup for the panel container
pub fn render_html(model: &PanelModel) -> String {
    if model.sections.is_empty() {
        return r#"<div class="fx-empty">No effects available</div>"#.to_string();
    }

    let mut html = String::new();
    for section in &model.sections {
        let id = escape(&section.id);
        let checked = if section.enabled { " checked" } else { "" };
        html.push_str(&format!(
            "<div class=\"fx-module\" data-fx=\"{id}\">\n  <label class=\"checkbox-label\"><input type=\"checkbox\" data-fx-toggle=\"{id}\"{checked}> {}</label>\n",
            escape(&section.name)
        ));

        if !section.controls.is_empty() {
            let dimmed = if section.dimmed { " dimmed" } else { "" };
            html.push_str(&format!("  <div class=\"fx-params{dimmed}\" id=\"fx-params-{id}\">\n"));
            for control in &section.controls {
                html.push_str(&render_control(&id, control));
            }
            html.push_str("  </div>\n");
        }
        html.push_str("</div>\n");
    }
    html
}

fn render_control(module_id: &str, control: &Control) -> String {
    let param = escape(&control.param_id);
    let label = escape(&control.label);
    let attrs = format!("data-fx-module=\"{module_id}\" data-fx-param=\"{param}\"");
    let input = match &control.widget {
        Widget::Range { min, max, step, value } => format!(
            "<div class=\"input-group\"><input type=\"range\" min=\"{min}\" max=\"{max}\" step=\"{step}\" value=\"{value}\" {attrs}><input type=\"number\" step=\"{step}\" value=\"{value}\" {attrs}></div>"
        ),
        Widget::Color { value } => format!("<input type=\"color\" value=\"{}\" {attrs}>", escape(value)),
        Widget::Checkbox { checked } => {
            let checked = if *checked { " checked" } else { "" };
            format!("<input type=\"checkbox\"{checked} {attrs}>")
        }
    };
    format!("    <div class=\"control-row\"><label>{label}</label>{input}</div>\n")
}

/// Full designer page: live preview styles plus the panel
pub fn render_page(model: &PanelModel, stylesheet: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Overlay FX Designer</title>
<style id="dynamic-styles">{}</style>
</head>
<body>
<div id="goalDiv"><div id="goalBackground">Goal</div><div class="progress"><div class="progress-bar" style="width: 60%"></div></div></div>
<div id="fx-dynamic-container">
{}</div>
<script>
async function send(url, body) {{
  await fetch(url, {{ method: 'PUT', headers: {{ 'Content-Type': 'application/json' }}, body: JSON.stringify(body) }});
  const css = await (await fetch('/api/css')).text();
  document.getElementById('dynamic-styles').textContent = css;
}}
document.querySelectorAll('[data-fx-toggle]').forEach(el => el.addEventListener('change', () => {{
  send(`/api/fx/${{el.dataset.fxToggle}}/enabled`, {{ enabled: el.checked }});
  const params = document.getElementById(`fx-params-${{el.dataset.fxToggle}}`);
  if (params) params.classList.toggle('dimmed', !el.checked);
}}));
document.querySelectorAll('[data-fx-param]').forEach(el => el.addEventListener('input', () => {{
  const value = el.type === 'checkbox' ? el.checked : el.value;
  el.closest('.control-row').querySelectorAll('[data-fx-param]').forEach(s => {{ if (s !== el) s.value = value; }});
  send(`/api/fx/${{el.dataset.fxModule}}/params/${{el.dataset.fxParam}}`, {{ value }});
}}));
</script>
</body>
</html>
"#,
        stylesheet.replace("</style", "<\\/style"),
        render_html(model)
    )
}
