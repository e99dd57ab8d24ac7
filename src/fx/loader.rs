//! Catalog-driven module loading
//!
//! A catalog lists opaque module source identifiers. Each identifier is
//! resolved to an implementation concurrently; modules are handed to the
//! registration callback in the order their loads *complete*. A failed entry
//! is logged and skipped, and a failed catalog yields an empty load.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::stream::{FuturesUnordered, StreamExt};
use thiserror::Error;

use super::builtin;
use super::registry::RegistryError;
use super::template::TemplateModule;
use super::traits::FxModule;

/// Errors fetching the catalog itself
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("catalog is not a JSON array of strings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors resolving or registering one catalog entry
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("no module named '{0}'")]
    UnknownModule(String),
    #[error("invalid module source '{0}'")]
    InvalidSource(String),
    #[error("failed to read module descriptor {path}: {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("invalid module descriptor {path}: {error}")]
    Descriptor {
        path: PathBuf,
        #[source]
        error: serde_json::Error,
    },
    #[error("module rejected by registry: {0}")]
    Rejected(#[from] RegistryError),
}

/// Source of module identifiers
pub trait CatalogSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<Vec<String>, CatalogError>> + Send;
}

/// Resolves one catalog identifier to an implementation
pub trait ModuleResolver: Send + Sync {
    fn resolve(&self, source: &str) -> impl Future<Output = Result<Arc<dyn FxModule>, LoadError>> + Send;
}

/// Fixed in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    sources: Vec<String>,
}

impl StaticCatalog {
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
        }
    }

    /// Catalog of every built-in effect
    pub fn builtin() -> Self {
        Self::new(builtin::BUILTIN_SOURCES.iter().copied())
    }
}

impl CatalogSource for StaticCatalog {
    fn fetch(&self) -> impl Future<Output = Result<Vec<String>, CatalogError>> + Send {
        let sources = self.sources.clone();
        async move { Ok(sources) }
    }
}

/// Catalog stored as a JSON array in a file
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for FileCatalog {
    fn fetch(&self) -> impl Future<Output = Result<Vec<String>, CatalogError>> + Send {
        let path = self.path.clone();
        async move {
            let contents = tokio::fs::read_to_string(&path)
                .await
                .map_err(|error| CatalogError::Io { path: path.clone(), error })?;
            Ok(serde_json::from_str(&contents)?)
        }
    }
}

/// Resolver for built-in effects and `.json` template descriptors
///
/// Descriptor identifiers are plain file names looked up inside `fx_dir`;
/// anything with a path component is rejected.
#[derive(Debug, Clone, Default)]
pub struct BuiltinResolver {
    fx_dir: Option<PathBuf>,
}

impl BuiltinResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also resolve template descriptors from this directory
    pub fn with_fx_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fx_dir = Some(dir.into());
        self
    }

    fn descriptor_path(&self, source: &str) -> Result<Option<PathBuf>, LoadError> {
        if !source.ends_with(".json") {
            return Ok(None);
        }
        let Some(dir) = &self.fx_dir else {
            return Ok(None);
        };
        let is_plain_name = Path::new(source).file_name().map(|n| n == source).unwrap_or(false);
        if !is_plain_name || source.starts_with('.') {
            return Err(LoadError::InvalidSource(source.to_string()));
        }
        Ok(Some(dir.join(source)))
    }
}

impl ModuleResolver for BuiltinResolver {
    fn resolve(&self, source: &str) -> impl Future<Output = Result<Arc<dyn FxModule>, LoadError>> + Send {
        let source = source.to_string();
        let builtin = builtin::create(&source);
        let descriptor = self.descriptor_path(&source);

        async move {
            if let Some(module) = builtin {
                return Ok(module);
            }
            let Some(path) = descriptor? else {
                return Err(LoadError::UnknownModule(source));
            };
            let contents = tokio::fs::read_to_string(&path)
                .await
                .map_err(|error| LoadError::Io { path: path.clone(), error })?;
            let module = TemplateModule::from_json(&contents).map_err(|error| LoadError::Descriptor { path, error })?;
            Ok(Arc::new(module) as Arc<dyn FxModule>)
        }
    }
}

/// One catalog entry that did not make it into the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub source_id: String,
    pub reason: String,
}

/// Outcome of a full load pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of catalog entries attempted
    pub requested: usize,
    /// Registered module ids, in completion order
    pub loaded: Vec<String>,
    /// Entries that failed to resolve or register
    pub failed: Vec<LoadFailure>,
    /// Set when the catalog itself could not be fetched
    pub catalog_error: Option<String>,
}

/// Resolves catalog entries concurrently and registers them as they settle
///
/// There is no per-module timeout: a load that never settles delays the
/// returned report but never blocks modules that already registered.
#[derive(Debug, Clone, Default)]
pub struct Loader<R> {
    resolver: R,
}

impl<R: ModuleResolver> Loader<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Fetch the catalog and register every module that resolves
    ///
    /// `register` is called once per resolved module, in completion order.
    pub async fn load_all<C, F>(&self, catalog: &C, mut register: F) -> LoadReport
    where
        C: CatalogSource,
        F: FnMut(Arc<dyn FxModule>) -> Result<(), RegistryError>,
    {
        let sources = match catalog.fetch().await {
            Ok(sources) => sources,
            Err(e) => {
                tracing::warn!(error = %e, "FX catalog unavailable, continuing with no modules");
                return LoadReport {
                    catalog_error: Some(e.to_string()),
                    ..LoadReport::default()
                };
            }
        };

        let mut report = LoadReport {
            requested: sources.len(),
            ..LoadReport::default()
        };

        let mut pending: FuturesUnordered<_> = sources
            .iter()
            .map(|source| async move { (source.as_str(), self.resolver.resolve(source).await) })
            .collect();

        while let Some((source, result)) = pending.next().await {
            let registered = result.and_then(|module| {
                let id = module.id().to_string();
                register(module)?;
                Ok(id)
            });
            match registered {
                Ok(id) => {
                    tracing::debug!(source, module = %id, "FX module loaded");
                    report.loaded.push(id);
                }
                Err(e) => {
                    tracing::warn!(source, error = %e, "Failed to load FX module");
                    report.failed.push(LoadFailure {
                        source_id: source.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            requested = report.requested,
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "FX load complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::registry::tests::MockModule;
    use crate::fx::{compose, import_state, FxRegistry, GlobalContext};
    use std::time::Duration;

    /// Resolves `mock:<id>:<delay_ms>` after the given delay
    struct DelayedResolver;

    impl ModuleResolver for DelayedResolver {
        fn resolve(&self, source: &str) -> impl Future<Output = Result<Arc<dyn FxModule>, LoadError>> + Send {
            let parts: Vec<String> = source.split(':').map(str::to_string).collect();
            async move {
                let [kind, id, delay] = parts.as_slice() else {
                    return Err(LoadError::InvalidSource(parts.join(":")));
                };
                if kind != "mock" {
                    return Err(LoadError::UnknownModule(id.clone()));
                }
                let delay: u64 = delay.parse().map_err(|_| LoadError::InvalidSource(id.clone()))?;
                tokio::time::sleep(Duration::from_millis(delay)).await;
                let id: &'static str = Box::leak(id.clone().into_boxed_str());
                Ok(Arc::new(MockModule::new(id)) as Arc<dyn FxModule>)
            }
        }
    }

    struct FailingCatalog;

    impl CatalogSource for FailingCatalog {
        fn fetch(&self) -> impl Future<Output = Result<Vec<String>, CatalogError>> + Send {
            async {
                Err(CatalogError::Io {
                    path: PathBuf::from("catalog.json"),
                    error: std::io::Error::new(std::io::ErrorKind::NotFound, "offline"),
                })
            }
        }
    }

    #[tokio::test]
    async fn test_one_bad_entry_does_not_block_others() {
        let mut registry = FxRegistry::new();
        let saved = serde_json::json!({
            "fx_glow_pulse": {"enabled": true},
            "fx_heartbeat": {"enabled": true},
            "fx_glass": {"enabled": true}
        });
        import_state(&mut registry, saved.as_object().unwrap()).unwrap();
        let loader = Loader::new(BuiltinResolver::new());
        let catalog = StaticCatalog::new(["glow.js", "missing.js", "fx_heartbeat", "glass.js"]);

        let report = loader.load_all(&catalog, |m| registry.register_arc(m)).await;

        assert_eq!(report.requested, 4);
        assert_eq!(report.loaded.len(), 3);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].source_id, "missing.js");
        assert!(registry.contains("fx_glow_pulse"));
        assert!(registry.contains("fx_heartbeat"));
        assert!(registry.contains("fx_glass"));

        let css = compose(&registry, &GlobalContext::new());
        assert!(css.contains("/* FX: Breathing Neon Glow */"));
        assert!(css.contains("/* FX: Heartbeat */"));
        assert!(css.contains("/* FX: Frosted Glass */"));
    }

    #[tokio::test]
    async fn test_catalog_failure_yields_empty_load() {
        let mut registry = FxRegistry::new();
        let loader = Loader::new(BuiltinResolver::new());

        let report = loader.load_all(&FailingCatalog, |m| registry.register_arc(m)).await;
        assert_eq!(report.requested, 0);
        assert!(report.catalog_error.is_some());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_registration_follows_completion_order() {
        let mut registry = FxRegistry::new();
        let loader = Loader::new(DelayedResolver);
        let catalog = StaticCatalog::new(["mock:slow:120", "mock:fast:0", "mock:mid:50"]);

        let report = loader.load_all(&catalog, |m| registry.register_arc(m)).await;
        assert_eq!(report.loaded, vec!["fast", "mid", "slow"]);
        assert_eq!(registry.order(), ["fast".to_string(), "mid".to_string(), "slow".to_string()]);
    }

    #[tokio::test]
    async fn test_registry_rejection_is_a_failure() {
        let mut registry = FxRegistry::new();
        let loader = Loader::new(DelayedResolver);
        let catalog = StaticCatalog::new(["mock::0", "mock:ok:0"]);

        let report = loader.load_all(&catalog, |m| registry.register_arc(m)).await;
        assert_eq!(report.loaded, vec!["ok"]);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].reason.contains("must not be empty"));
    }

    #[tokio::test]
    async fn test_file_catalog_and_descriptor_modules() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("catalog.json"), r#"["stripes.js", "pulse.json", "broken.json", "../x.json"]"#)
            .unwrap();
        std::fs::write(
            dir.path().join("pulse.json"),
            r#"{"id": "fx_pulse", "name": "Pulse", "params": [], "css": ".bar { opacity: 0.9; }"}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let mut registry = FxRegistry::new();
        let loader = Loader::new(BuiltinResolver::new().with_fx_dir(dir.path()));
        let catalog = FileCatalog::new(dir.path().join("catalog.json"));

        let report = loader.load_all(&catalog, |m| registry.register_arc(m)).await;
        assert_eq!(report.requested, 4);
        assert!(registry.contains("fx_stripes"));
        assert!(registry.contains("fx_pulse"));
        assert_eq!(report.failed.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_catalog_file() {
        let catalog = FileCatalog::new("/nonexistent/overlay-fx/catalog.json");
        assert!(matches!(catalog.fetch().await, Err(CatalogError::Io { .. })));
    }
}
