use std::collections::HashSet;

use crate::analysis::diagnostic::DiagnosticCollector;
use crate::host::TypeChecker;
use crate::parser::ast::SourceFile;

/// State for one analysis run over one file.
///
/// Borrows the file and the host's type checker read-only; only the
/// collected diagnostics are owned, and they are handed back to the caller
/// when the run ends.
pub struct AnalysisContext<'a> {
    pub diagnostics: DiagnosticCollector,
    pub source_file: &'a SourceFile,
    pub checker: &'a dyn TypeChecker,
    pub disabled_rules: HashSet<String>,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(source_file: &'a SourceFile, checker: &'a dyn TypeChecker) -> Self {
        Self {
            diagnostics: DiagnosticCollector::new(&source_file.file_name),
            source_file,
            checker,
            disabled_rules: HashSet::new(),
        }
    }

    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        !self.disabled_rules.contains(rule_id)
    }
}
