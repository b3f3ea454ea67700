//! Build Runner
//!
//! Drives one packaging pass and keeps the incremental cache in step with it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use serde::Serialize;
use tracing::{debug, info, warn};

use r_droid_core::Project;
use r_droid_facet::FacetManager;

use crate::compiler::{AndroidPackagingCompiler, PackagingCompiler, ProcessingItem};
use crate::context::{BuildContext, CompileContext, CompileScope};
use crate::messages::{CompilerMessage, CompilerMessageCategory};
use crate::validity::{IncrementalCache, ResourcesValidityState};
use crate::{BuildConfig, BuildError};

/// Outcome of one pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct PassReport {
    /// Items packaged successfully
    pub processed: Vec<String>,
    /// Items whose inputs did not change
    pub skipped: Vec<String>,
    /// Items dropped from the pass; they are retried next time
    pub failed: Vec<String>,
    pub messages: Vec<CompilerMessage>,
    pub duration_secs: f64,
}

impl PassReport {
    pub fn error_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.category == CompilerMessageCategory::Error)
            .count()
    }

    pub fn succeeded(&self) -> bool {
        self.error_count() == 0
    }
}

/// Runs a packaging compiler against an incremental cache
pub struct BuildRunner<C> {
    compiler: C,
    cache: IncrementalCache,
    force: bool,
}

impl<C: PackagingCompiler> BuildRunner<C> {
    pub fn new(compiler: C, cache: IncrementalCache) -> Self {
        Self {
            compiler,
            cache,
            force: false,
        }
    }

    /// Process every item even when its inputs are unchanged
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn cache(&self) -> &IncrementalCache {
        &self.cache
    }

    /// Run one pass over the context's scope
    pub async fn run_pass(&mut self, context: &BuildContext) -> Result<PassReport, BuildError> {
        let start = std::time::Instant::now();
        info!("Starting {}", self.compiler.description());

        if !self.compiler.validate_configuration(context.compile_scope()) {
            return Err(BuildError::ConfigError(format!(
                "{}: invalid configuration",
                self.compiler.description()
            )));
        }

        let items = self.compiler.processing_items(context);
        self.drop_outdated(context, &items);

        let mut report = PassReport::default();
        let mut states: HashMap<String, ResourcesValidityState> = HashMap::new();
        let mut pending = Vec::new();

        for item in items {
            let key = item.cache_key().to_string();
            let state = match item.validity_state() {
                Ok(state) => Some(state),
                Err(e) => {
                    warn!("Could not fingerprint {}: {}", key, e);
                    None
                }
            };

            if !self.force && state.is_some() && state.as_ref() == self.cache.get(&key) {
                debug!("{} is up to date", key);
                report.skipped.push(key);
                continue;
            }
            if let Some(state) = state {
                states.insert(key, state);
            }
            pending.push(item);
        }

        let pending_keys: Vec<String> = pending.iter().map(|i| i.cache_key().to_string()).collect();
        let compiled = self.compiler.process(context, pending).await;
        let compiled_keys: HashSet<String> = compiled.iter().map(|i| i.cache_key().to_string()).collect();

        for key in pending_keys {
            if compiled_keys.contains(&key) {
                if let Some(state) = states.remove(&key) {
                    self.cache.insert(key.clone(), state);
                }
                report.processed.push(key);
            } else {
                self.cache.remove(&key);
                report.failed.push(key);
            }
        }

        self.cache.save()?;

        report.messages = context.messages();
        report.duration_secs = start.elapsed().as_secs_f64();
        info!(
            "Pass finished in {:.2}s: {} packaged, {} up to date, {} failed",
            report.duration_secs,
            report.processed.len(),
            report.skipped.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Forget recorded items of in-scope modules that no longer produce an item
    fn drop_outdated(&mut self, context: &BuildContext, items: &[C::Item]) {
        let current: HashSet<&str> = items.iter().map(|i| i.cache_key()).collect();
        let in_scope: HashSet<&str> = context
            .compile_scope()
            .affected_modules()
            .iter()
            .map(|m| m.name())
            .collect();

        let outdated: Vec<String> = self
            .cache
            .keys()
            .filter(|k| in_scope.contains(k) && !current.contains(k))
            .map(str::to_string)
            .collect();

        for key in outdated {
            debug!("Dropping outdated item {}", key);
            self.compiler.process_outdated_item(context, &key, self.cache.get(&key));
            self.cache.remove(&key);
        }
    }
}

/// Open the project at `config.project_dir` and package it with the SDK tools
pub async fn build_project(config: &BuildConfig) -> Result<PassReport, BuildError> {
    let project = Arc::new(Project::open(&config.project_dir)?);
    let facets = Arc::new(FacetManager::for_project(project.clone()));
    let scope = CompileScope::for_modules(&project, &config.modules)?;
    let context = BuildContext::new(scope);

    let compiler = AndroidPackagingCompiler::with_sdk_tools(facets);
    let cache = IncrementalCache::load(config.effective_cache_file());
    let mut runner = BuildRunner::new(compiler, cache).with_force(config.force);
    runner.run_pass(&context).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::tests::{android_project, FakeTools};

    async fn pass(root: &std::path::Path, tools: &FakeTools, force: bool) -> PassReport {
        let project = android_project(root);
        let facets = Arc::new(FacetManager::for_project(project.clone()));
        let context = BuildContext::new(CompileScope::project(&project));
        let compiler = AndroidPackagingCompiler::new(facets, tools, tools);
        let cache = IncrementalCache::load(IncrementalCache::default_path(root));
        let mut runner = BuildRunner::new(compiler, cache).with_force(force);
        runner.run_pass(&context).await.unwrap()
    }

    #[tokio::test]
    async fn test_unchanged_items_are_skipped() {
        let dir = tempfile::tempdir().unwrap();

        let first = pass(dir.path(), &FakeTools::default(), false).await;
        assert_eq!(first.processed, vec!["app", "lib"]);
        assert!(first.succeeded());
        assert!(IncrementalCache::default_path(dir.path()).exists());

        let tools = FakeTools::default();
        let second = pass(dir.path(), &tools, false).await;
        assert!(second.processed.is_empty());
        assert_eq!(second.skipped, vec!["app", "lib"]);
        assert!(tools.calls.lock().is_empty());

        std::fs::write(dir.path().join("lib/res/values/strings.xml"), "<resources><string name=\"x\">y</string></resources>").unwrap();
        let third = pass(dir.path(), &FakeTools::default(), false).await;
        assert_eq!(third.processed, vec!["lib"]);
        assert_eq!(third.skipped, vec!["app"]);

        let forced = pass(dir.path(), &FakeTools::default(), true).await;
        assert_eq!(forced.processed.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_items_are_retried() {
        let dir = tempfile::tempdir().unwrap();
        let failing = FakeTools {
            failing: [dir.path().join("app/res")].into_iter().collect(),
            ..FakeTools::default()
        };

        let report = pass(dir.path(), &failing, false).await;
        assert!(!report.succeeded());
        assert_eq!(report.failed, vec!["app", "lib"]);

        let retry = pass(dir.path(), &FakeTools::default(), false).await;
        assert_eq!(retry.processed, vec!["app", "lib"]);
    }

    #[tokio::test]
    async fn test_removed_module_is_dropped_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        pass(dir.path(), &FakeTools::default(), false).await;

        let project = android_project(dir.path());
        std::fs::remove_file(dir.path().join("lib/AndroidManifest.xml")).unwrap();

        let facets = Arc::new(FacetManager::for_project(project.clone()));
        let context = BuildContext::new(CompileScope::project(&project));
        let tools = FakeTools::default();
        let compiler = AndroidPackagingCompiler::new(facets, &tools, &tools);
        let mut runner = BuildRunner::new(compiler, IncrementalCache::load(IncrementalCache::default_path(dir.path())));
        let report = runner.run_pass(&context).await.unwrap();

        assert_eq!(report.skipped, vec!["app"]);
        assert!(runner.cache().get("lib").is_none());
        assert!(runner.cache().get("app").is_some());
    }
}
