use std::fmt;

use crate::parser::ast::TextRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        })
    }
}

/// A single reported issue in a file.
///
/// `start` and `length` are byte offsets into the file's text. `source`
/// names the rule or tool that produced the diagnostic; the host's own
/// diagnostics leave it empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file_name: String,
    pub start: usize,
    pub length: usize,
    pub message: String,
    pub category: DiagnosticCategory,
    pub source: Option<String>,
    pub code: u32,
}

impl Diagnostic {
    pub fn range(&self) -> TextRange {
        TextRange::new(self.start, self.start + self.length)
    }
}

/// Accumulates diagnostics for one file during one analysis run
#[derive(Debug)]
pub struct DiagnosticCollector {
    file_name: String,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn report(
        &mut self,
        category: DiagnosticCategory,
        source: Option<&str>,
        code: u32,
        message: String,
        range: TextRange,
    ) {
        self.add(Diagnostic {
            file_name: self.file_name.clone(),
            start: range.start,
            length: range.len(),
            message,
            category,
            source: source.map(str::to_string),
            code,
        });
    }

    pub fn report_error(&mut self, source: Option<&str>, code: u32, message: String, range: TextRange) {
        self.report(DiagnosticCategory::Error, source, code, message, range);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.category == DiagnosticCategory::Error)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_stamps_file_name_and_range() {
        let mut collector = DiagnosticCollector::new("main.ts");
        assert!(!collector.has_errors());

        collector.report_error(Some("dotJS"), 42, "bad".to_string(), TextRange::new(4, 11));
        collector.report(
            DiagnosticCategory::Warning,
            None,
            7,
            "meh".to_string(),
            TextRange::empty(0),
        );

        assert!(collector.has_errors());
        let diagnostics = collector.into_diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].file_name, "main.ts");
        assert_eq!(diagnostics[0].start, 4);
        assert_eq!(diagnostics[0].length, 7);
        assert_eq!(diagnostics[0].range(), TextRange::new(4, 11));
        assert_eq!(diagnostics[0].source.as_deref(), Some("dotJS"));
        assert_eq!(diagnostics[1].source, None);
    }

    #[test]
    fn category_display() {
        assert_eq!(DiagnosticCategory::Error.to_string(), "error");
        assert_eq!(DiagnosticCategory::Suggestion.to_string(), "suggestion");
    }
}
