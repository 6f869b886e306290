//! The plugin entry points a language-service host loads.
//!
//! The host calls [`init`] once with its type-system classification, then
//! [`PluginModule::create`] for every project. The returned proxy stands in
//! for the host's own service and adds the naming findings to its semantic
//! diagnostics.

use std::collections::BTreeMap;
use std::path::PathBuf;

use log::{debug, info, warn};

use crate::analysis::{Diagnostic, SemanticAnalyzer};
use crate::host::{LanguageService, Program};
use crate::types::TypeFlags;

/// What the host hands the plugin at load time
#[derive(Debug, Clone, Copy)]
pub struct HostModules {
    /// Flags the host classifies as boolean-like
    pub boolean_like: TypeFlags,
}

impl Default for HostModules {
    fn default() -> Self {
        Self {
            boolean_like: TypeFlags::BOOLEAN_LIKE,
        }
    }
}

/// Per-project configuration passed in by the host
#[derive(Debug, Clone, Default)]
pub struct PluginConfig {
    pub project_root: PathBuf,
    /// Read and logged, never validated
    pub compiler_options: BTreeMap<String, String>,
    /// Rule ids the host switched off
    pub disabled_rules: Vec<String>,
}

pub struct PluginCreateInfo<S> {
    pub language_service: S,
    pub config: PluginConfig,
}

/// Initializes the plugin
pub fn init(modules: HostModules) -> PluginModule {
    debug!("plugin initialized, boolean-like flags {:#x}", modules.boolean_like.bits());
    PluginModule {
        boolean_like: modules.boolean_like,
    }
}

/// Factory returned by [`init`]
#[derive(Debug, Clone, Copy)]
pub struct PluginModule {
    boolean_like: TypeFlags,
}

impl PluginModule {
    /// Wraps the host's service
    pub fn create<S: LanguageService>(&self, info: PluginCreateInfo<S>) -> LanguageServiceProxy<S> {
        let PluginCreateInfo {
            language_service,
            config,
        } = info;

        info!(
            "creating dotJS proxy for {} ({} compiler option(s))",
            config.project_root.display(),
            config.compiler_options.len()
        );
        for (key, value) in &config.compiler_options {
            debug!("compiler option {key} = {value}");
        }

        LanguageServiceProxy {
            inner: language_service,
            analyzer: SemanticAnalyzer::with_boolean_like(self.boolean_like),
            config,
        }
    }
}

/// A language service that adds the naming findings to the semantic
/// diagnostics of the service it wraps.
///
/// Every other request is forwarded unchanged.
pub struct LanguageServiceProxy<S> {
    inner: S,
    analyzer: SemanticAnalyzer,
    config: PluginConfig,
}

impl<S: LanguageService> LanguageServiceProxy<S> {
    /// The wrapped service's semantic diagnostics followed by the findings
    /// for `file_name`, in source order.
    ///
    /// Without a program, or for a file outside it, only the wrapped
    /// service's diagnostics are returned.
    pub fn compute_diagnostics(&self, file_name: &str) -> Vec<Diagnostic> {
        let mut diagnostics = self.inner.get_semantic_diagnostics(file_name);

        let Some(program) = self.inner.get_program() else {
            debug!("no program yet, {file_name} gets no additional diagnostics");
            return diagnostics;
        };
        let Some(source_file) = program.source_file(file_name) else {
            warn!("{file_name} is not part of the program, skipping");
            return diagnostics;
        };

        let findings = self.analyzer.analyze(
            source_file,
            program.type_checker(),
            &self.config.disabled_rules,
        );
        diagnostics.extend(findings);
        diagnostics
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }
}

impl<S: LanguageService> LanguageService for LanguageServiceProxy<S> {
    fn get_syntactic_diagnostics(&self, file_name: &str) -> Vec<Diagnostic> {
        self.inner.get_syntactic_diagnostics(file_name)
    }

    fn get_semantic_diagnostics(&self, file_name: &str) -> Vec<Diagnostic> {
        self.compute_diagnostics(file_name)
    }

    fn get_program(&self) -> Option<&dyn Program> {
        self.inner.get_program()
    }
}
