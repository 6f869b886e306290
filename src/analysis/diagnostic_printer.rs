use std::fmt::Write;

use colored::Colorize;

use crate::analysis::diagnostic::{Diagnostic, DiagnosticCategory};

/// Byte offsets of every line start in a text
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(memchr::memchr_iter(b'\n', text.as_bytes()).map(|i| i + 1));
        Self { line_starts }
    }

    /// Zero-based line containing `offset`
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        }
    }

    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts[line]
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

pub struct DiagnosticPrinter {
    pub use_colors: bool,
    pub source_code: String,
    pub file_name: String,
    line_index: LineIndex,
}

impl DiagnosticPrinter {
    pub fn new(source_code: String, file_name: String, use_colors: Option<bool>) -> Self {
        Self {
            use_colors: use_colors.unwrap_or(false),
            line_index: LineIndex::new(&source_code),
            source_code,
            file_name,
        }
    }

    /// One-based line and column (in characters) of a byte offset
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source_code.len());
        let line = self.line_index.line_of(offset);
        let line_start = self.line_index.line_start(line);
        let column = self
            .source_code
            .get(line_start..offset)
            .map_or(0, |prefix| prefix.chars().count());
        (line + 1, column + 1)
    }

    fn line_text(&self, line: usize) -> &str {
        let start = self.line_index.line_start(line);
        let end = if line + 1 < self.line_index.line_count() {
            self.line_index.line_start(line + 1)
        } else {
            self.source_code.len()
        };
        self.source_code
            .get(start..end)
            .unwrap_or_default()
            .trim_end_matches(['\n', '\r'])
    }

    /// Characters covered by the diagnostic on its first line, at least one
    fn underline_width(&self, diagnostic: &Diagnostic) -> usize {
        self.source_code
            .get(diagnostic.start..)
            .unwrap_or_default()
            .char_indices()
            .take_while(|&(i, c)| i < diagnostic.length && c != '\n' && c != '\r')
            .count()
            .max(1)
    }

    fn paint(&self, text: &str, category: DiagnosticCategory) -> String {
        if !self.use_colors {
            return text.to_string();
        }
        match category {
            DiagnosticCategory::Error => text.red().bold().to_string(),
            DiagnosticCategory::Warning => text.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => text.cyan().to_string(),
            DiagnosticCategory::Message => text.blue().to_string(),
        }
    }

    /// Renders `file:line:col - category source(code): message`, the source
    /// line and a caret underline
    pub fn sprint_errors(&mut self, diagnostics: Vec<Diagnostic>) -> String {
        let mut out = String::new();

        for diagnostic in &diagnostics {
            let (line, column) = self.position(diagnostic.start);
            let code = match &diagnostic.source {
                Some(source) => format!("{source}({})", diagnostic.code),
                None => format!("TS{}", diagnostic.code),
            };
            let header = self.paint(&diagnostic.category.to_string(), diagnostic.category);

            let _ = writeln!(
                out,
                "{}:{}:{} - {} {}: {}",
                self.file_name, line, column, header, code, diagnostic.message
            );

            let text = self.line_text(line - 1);
            let underline = self.paint(&"~".repeat(self.underline_width(diagnostic)), diagnostic.category);

            let gutter = line.to_string();
            let _ = writeln!(out, "{gutter} {text}");
            let _ = writeln!(
                out,
                "{} {}{}",
                " ".repeat(gutter.len()),
                " ".repeat(column - 1),
                underline
            );
            out.push('\n');
        }

        out
    }

    pub fn print_errors(&mut self, diagnostics: Vec<Diagnostic>) {
        print!("{}", self.sprint_errors(diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "let count = 1;\nlet isReady = 1;\n";

    fn diagnostic(start: usize, length: usize) -> Diagnostic {
        Diagnostic {
            file_name: "main.ts".to_string(),
            start,
            length,
            message: "Rename isReady or make it type \"boolean\"".to_string(),
            category: DiagnosticCategory::Error,
            source: Some("dotJS".to_string()),
            code: 42,
        }
    }

    #[test]
    fn line_index_finds_lines() {
        let index = LineIndex::new(SOURCE);
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_of(0), 0);
        assert_eq!(index.line_of(14), 0);
        assert_eq!(index.line_of(15), 1);
        assert_eq!(index.line_start(1), 15);
    }

    #[test]
    fn positions_are_one_based() {
        let printer = DiagnosticPrinter::new(SOURCE.to_string(), "main.ts".to_string(), None);
        assert_eq!(printer.position(0), (1, 1));
        assert_eq!(printer.position(19), (2, 5));
    }

    #[test]
    fn renders_plain_diagnostic() {
        let mut printer = DiagnosticPrinter::new(SOURCE.to_string(), "main.ts".to_string(), None);
        let out = printer.sprint_errors(vec![diagnostic(19, 7)]);

        let expected = "main.ts:2:5 - error dotJS(42): Rename isReady or make it type \"boolean\"\n\
                        2 let isReady = 1;\n\
                        \x20     ~~~~~~~\n\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn host_diagnostics_use_ts_prefix() {
        let mut printer = DiagnosticPrinter::new(SOURCE.to_string(), "main.ts".to_string(), None);
        let mut host = diagnostic(4, 5);
        host.source = None;
        host.code = 2304;
        let out = printer.sprint_errors(vec![host]);
        assert!(out.starts_with("main.ts:1:5 - error TS2304:"));
    }

    #[test]
    fn colors_can_be_enabled() {
        colored::control::set_override(true);
        let mut printer =
            DiagnosticPrinter::new(SOURCE.to_string(), "main.ts".to_string(), Some(true));
        let out = printer.sprint_errors(vec![diagnostic(19, 7)]);
        colored::control::unset_override();
        assert!(out.contains("\u{1b}["));
    }

    #[test]
    fn underline_counts_characters() {
        let text = "let s = \"ééé\"; let isÉtat = 1;\n";
        let start = text.find("isÉtat").unwrap();
        let mut printer = DiagnosticPrinter::new(text.to_string(), "main.ts".to_string(), None);
        let out = printer.sprint_errors(vec![diagnostic(start, "isÉtat".len())]);

        assert!(out.starts_with("main.ts:1:20 - "));
        assert!(out.contains(&format!("\n{}{}\n", " ".repeat(21), "~".repeat(6))));
    }

    #[test]
    fn underline_stops_at_line_end() {
        let mut printer = DiagnosticPrinter::new(SOURCE.to_string(), "main.ts".to_string(), None);
        let out = printer.sprint_errors(vec![diagnostic(4, 40)]);
        assert!(out.contains(&format!("\n  {}{}\n", " ".repeat(4), "~".repeat(10))));
    }
}
