//! Compile context
//!
//! What a compiler sees of the running build: the modules in scope, where
//! their output goes, and a sink for messages.

use std::path::PathBuf;
use std::sync::Arc;
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use r_droid_core::{Module, Project};

use crate::messages::{CompilerMessage, CompilerMessageCategory};
use crate::BuildError;

/// Modules affected by a build
#[derive(Debug, Clone, Default)]
pub struct CompileScope {
    modules: Vec<Arc<Module>>,
}

impl CompileScope {
    pub fn new(modules: Vec<Arc<Module>>) -> Self {
        Self { modules }
    }

    /// Every module of the project
    pub fn project(project: &Project) -> Self {
        Self::new(project.modules().to_vec())
    }

    /// The named modules of the project; an empty list means all of them
    pub fn for_modules(project: &Project, names: &[String]) -> Result<Self, BuildError> {
        if names.is_empty() {
            return Ok(Self::project(project));
        }

        let modules = names
            .iter()
            .map(|name| {
                project
                    .module(name)
                    .ok_or_else(|| BuildError::ConfigError(format!("Unknown module: {}", name)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(modules))
    }

    pub fn affected_modules(&self) -> &[Arc<Module>] {
        &self.modules
    }
}

/// Services a compiler uses during a build pass
pub trait CompileContext {
    fn compile_scope(&self) -> &CompileScope;

    /// Output directory of `module`, `None` if it has none configured
    fn module_output_directory(&self, module: &Module) -> Option<PathBuf>;

    fn add_message(&self, message: CompilerMessage);

    /// Messages of one category reported so far in this pass
    fn message_count(&self, category: CompilerMessageCategory) -> usize;

    fn set_progress_text(&self, text: &str);
}

/// Compile context for one build pass over a project
pub struct BuildContext {
    scope: CompileScope,
    messages: Mutex<Vec<CompilerMessage>>,
    progress: Mutex<String>,
}

impl BuildContext {
    pub fn new(scope: CompileScope) -> Self {
        Self {
            scope,
            messages: Mutex::new(Vec::new()),
            progress: Mutex::new(String::new()),
        }
    }

    /// Snapshot of all messages reported so far
    pub fn messages(&self) -> Vec<CompilerMessage> {
        self.messages.lock().clone()
    }

    /// Takes all messages, leaving the context empty
    pub fn take_messages(&self) -> Vec<CompilerMessage> {
        std::mem::take(&mut *self.messages.lock())
    }

    pub fn progress_text(&self) -> String {
        self.progress.lock().clone()
    }
}

impl CompileContext for BuildContext {
    fn compile_scope(&self) -> &CompileScope {
        &self.scope
    }

    fn module_output_directory(&self, module: &Module) -> Option<PathBuf> {
        module.compiler_output_path().map(|p| p.to_path_buf())
    }

    fn add_message(&self, message: CompilerMessage) {
        match message.category {
            CompilerMessageCategory::Error => error!("{}", message),
            CompilerMessageCategory::Warning => warn!("{}", message),
            CompilerMessageCategory::Info => debug!("{}", message),
        }
        self.messages.lock().push(message);
    }

    fn message_count(&self, category: CompilerMessageCategory) -> usize {
        self.messages
            .lock()
            .iter()
            .filter(|m| m.category == category)
            .count()
    }

    fn set_progress_text(&self, text: &str) {
        info!("{}", text);
        *self.progress.lock() = text.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use r_droid_core::{ModuleDescriptor, ProjectDescriptor};

    fn project() -> Project {
        let descriptor = ProjectDescriptor {
            modules: ["app", "lib"]
                .iter()
                .map(|name| ModuleDescriptor {
                    name: name.to_string(),
                    content_roots: vec![PathBuf::from(name)],
                    output_dir: Some(PathBuf::from("out").join(name)),
                    android: None,
                })
                .collect(),
        };
        Project::from_descriptor("/work", descriptor).unwrap()
    }

    #[test]
    fn test_scope_selection() {
        let project = project();
        assert_eq!(CompileScope::for_modules(&project, &[]).unwrap().affected_modules().len(), 2);

        let scope = CompileScope::for_modules(&project, &["lib".to_string()]).unwrap();
        assert_eq!(scope.affected_modules()[0].name(), "lib");

        assert!(matches!(
            CompileScope::for_modules(&project, &["nope".to_string()]),
            Err(BuildError::ConfigError(_))
        ));
    }

    #[test]
    fn test_message_counts() {
        let ctx = BuildContext::new(CompileScope::project(&project()));
        ctx.add_message(CompilerMessage::error("boom"));
        ctx.add_message(CompilerMessage::warning("hmm"));
        ctx.set_progress_text("Building Android package...");

        assert_eq!(ctx.message_count(CompilerMessageCategory::Error), 1);
        assert_eq!(ctx.message_count(CompilerMessageCategory::Info), 0);
        assert_eq!(ctx.progress_text(), "Building Android package...");
        assert_eq!(ctx.take_messages().len(), 2);
        assert!(ctx.messages().is_empty());
    }
}
