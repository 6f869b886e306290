//! A language-service plugin that flags variables named `is…` whose type is
//! not boolean, plus the small script host it runs against.

use thiserror::Error;

pub mod analysis;
pub mod external_api;
pub mod host;
pub mod lexer;
pub mod parser;
pub mod types;

pub use analysis::{Diagnostic, DiagnosticCategory, DiagnosticPrinter, SemanticAnalyzer};
pub use external_api::{HostModules, LanguageServiceProxy, PluginConfig, PluginCreateInfo, PluginModule, init};
pub use host::{InMemoryLanguageService, LanguageService, Program, TypeChecker};
pub use types::{TypeFlags, TypeInfo};

use crate::host::Checker;
use crate::lexer::{LexError, Lexer, SpannedToken};
use crate::parser::ParseError;

#[derive(Debug, Error)]
pub enum DotJsError {
    #[error("Lexer encountered an error while tokenizing input: {0}")]
    Lex(#[from] LexError),
    #[error("Failed to parse {file_name}: {} syntax error(s)", errors.len())]
    Parse {
        file_name: String,
        errors: Vec<ParseError>,
    },
    #[error("File is not part of the project: {0}")]
    UnknownFile(String),
}

/// Tokenizes `text`, failing on the first invalid token
pub fn tokenize(text: &str) -> Result<Vec<SpannedToken>, DotJsError> {
    Ok(Lexer::new(text).tokenize()?)
}

/// Checks a single well-formed source file outside any project: the
/// checker's diagnostics followed by the naming findings
pub fn lint_source(file_name: &str, text: &str) -> Result<Vec<Diagnostic>, DotJsError> {
    let file = parser::parse(file_name, text)?;
    let checked = Checker::check(&file);

    let mut diagnostics = checked.diagnostics().to_vec();
    diagnostics.extend(SemanticAnalyzer::new().analyze(&file, &checked, &[]));
    Ok(diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lint_source_reports_checker_then_rule() {
        let diagnostics = lint_source("main.ts", "let isReady = 1;\nlet isOk: boolean = \"x\";").unwrap();
        let codes: Vec<_> = diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, [2322, 42]);
        assert_eq!(diagnostics[1].message, "Rename isReady or make it type \"boolean\"");
    }

    #[test]
    fn lint_source_rejects_syntax_errors() {
        let err = lint_source("main.ts", "let = 1;").unwrap_err();
        assert!(matches!(err, DotJsError::Parse { .. }));
        assert!(err.to_string().starts_with("Failed to parse main.ts"));
    }

    #[test]
    fn tokenize_surfaces_lex_errors() {
        assert_eq!(tokenize("let a = 1;").unwrap().len(), 6);
        assert!(matches!(tokenize("let a = \"open"), Err(DotJsError::Lex(_))));
        assert!(matches!(
            DotJsError::UnknownFile("x.ts".to_string()).to_string().as_str(),
            "File is not part of the project: x.ts"
        ));
    }
}
