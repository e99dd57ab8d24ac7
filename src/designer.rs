//! Designer application context
//!
//! Owns the registry together with the host theme and the last composed
//! output. Every mutation recomposes the cached stylesheet and bumps the
//! panel revision so watchers can re-render controls.

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::watch;

use crate::fx::{
    compose, import_state, DesignDocument, FxModule, FxRegistry, GlobalContext, ImportError, ImportSummary,
    RegistryError,
};
use crate::panel::{self, PanelModel};
use crate::theme::{default_theme, render_stylesheet};

/// Registry, theme and composed output for one overlay design
pub struct Designer {
    registry: FxRegistry,
    theme: GlobalContext,
    fx_css: String,
    stylesheet: String,
    panel_revision: watch::Sender<u64>,
    ready: bool,
}

impl Default for Designer {
    fn default() -> Self {
        Self::new()
    }
}

impl Designer {
    /// Empty registry with the default theme
    pub fn new() -> Self {
        Self::with_theme(default_theme())
    }

    pub fn with_theme(theme: GlobalContext) -> Self {
        let (panel_revision, _) = watch::channel(0);
        let mut designer = Self {
            registry: FxRegistry::new(),
            theme,
            fx_css: String::new(),
            stylesheet: String::new(),
            panel_revision,
            ready: false,
        };
        designer.recompose();
        designer
    }

    pub fn registry(&self) -> &FxRegistry {
        &self.registry
    }

    pub fn theme(&self) -> &GlobalContext {
        &self.theme
    }

    /// Full stylesheet as of the last mutation
    pub fn stylesheet(&self) -> &str {
        &self.stylesheet
    }

    /// Composed FX section only
    pub fn fx_css(&self) -> &str {
        &self.fx_css
    }

    pub fn panel(&self) -> PanelModel {
        panel::build(&self.registry)
    }

    /// Receiver that changes whenever the panel needs rebuilding
    pub fn subscribe_panel(&self) -> watch::Receiver<u64> {
        self.panel_revision.subscribe()
    }

    pub fn panel_revision(&self) -> u64 {
        *self.panel_revision.borrow()
    }

    /// Whether the initial catalog load has finished
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn mark_ready(&mut self) {
        self.ready = true;
        self.bump_panel();
    }

    pub fn register(&mut self, module: Arc<dyn FxModule>) -> Result<(), RegistryError> {
        self.registry.register_arc(module)?;
        self.recompose();
        self.bump_panel();
        Ok(())
    }

    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        let applied = self.registry.set_enabled(id, enabled);
        if applied {
            self.recompose();
        }
        applied
    }

    pub fn set_parameter(&mut self, id: &str, param: &str, value: Value) -> bool {
        let applied = self.registry.set_parameter(id, param, value);
        if applied {
            self.recompose();
        }
        applied
    }

    /// Reseed one module from its declared defaults
    pub fn reset(&mut self, id: &str) -> bool {
        let applied = self.registry.reset(id);
        if applied {
            self.recompose();
            self.bump_panel();
        }
        applied
    }

    /// Merge scalar theme fields; rejects the whole patch on any non-scalar
    pub fn set_theme(&mut self, patch: &Map<String, Value>) -> Result<(), ImportError> {
        if let Some((key, _)) = patch.iter().find(|(_, v)| v.is_array() || v.is_object()) {
            return Err(ImportError::ThemeNotScalar(key.clone()));
        }
        self.merge_theme(patch);
        self.recompose();
        Ok(())
    }

    /// Apply a persisted document; nothing changes unless it is valid as a whole
    pub fn import_document(&mut self, json: &str) -> Result<ImportSummary, ImportError> {
        let document = DesignDocument::parse(json)?;
        self.apply(document)
    }

    pub fn import_value(&mut self, value: Value) -> Result<ImportSummary, ImportError> {
        let document = DesignDocument::from_value(value)?;
        self.apply(document)
    }

    /// Theme fields plus the `fx` mapping
    pub fn export_document(&self) -> Value {
        DesignDocument {
            theme: self.theme.fields().clone(),
            fx: Some(self.registry.export_state()),
        }
        .to_value()
    }

    fn apply(&mut self, document: DesignDocument) -> Result<ImportSummary, ImportError> {
        let summary = match &document.fx {
            Some(fx) => import_state(&mut self.registry, fx)?,
            None => ImportSummary::default(),
        };
        self.merge_theme(&document.theme);
        self.recompose();
        self.bump_panel();
        Ok(summary)
    }

    fn merge_theme(&mut self, patch: &Map<String, Value>) {
        let fields = self.theme.fields_mut();
        for (key, value) in patch {
            fields.insert(key.clone(), value.clone());
        }
    }

    fn recompose(&mut self) {
        self.fx_css = compose(&self.registry, &self.theme);
        self.stylesheet = render_stylesheet(&self.theme, &self.fx_css);
    }

    fn bump_panel(&self) {
        self.panel_revision.send_modify(|revision| *revision += 1);
    }
}
