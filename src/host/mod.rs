//! The language-service host boundary.
//!
//! A host parses files, type-checks them and answers diagnostic requests.
//! Plugins only ever see it through these traits, so any host (the
//! in-memory one in [`service`] or an embedding editor) can be wrapped.

pub mod checker;
pub mod service;
mod symbols;

use crate::analysis::Diagnostic;
use crate::parser::ast::{SourceFile, VariableDeclaration};
use crate::types::TypeInfo;

pub use checker::{CheckedFile, Checker};
pub use service::InMemoryLanguageService;

/// Read-only access to resolved static types
pub trait TypeChecker {
    /// Type of the variable declared by `declaration` in `file`, or `None`
    /// when the checker could not resolve it
    fn type_at_location(&self, file: &SourceFile, declaration: &VariableDeclaration) -> Option<TypeInfo>;
}

/// A resolved project: its parsed files and the checker that typed them
pub trait Program {
    fn source_file(&self, file_name: &str) -> Option<&SourceFile>;

    fn type_checker(&self) -> &dyn TypeChecker;

    fn root_file_names(&self) -> Vec<String>;
}

/// The operations a host answers per file
pub trait LanguageService {
    fn get_syntactic_diagnostics(&self, file_name: &str) -> Vec<Diagnostic>;

    fn get_semantic_diagnostics(&self, file_name: &str) -> Vec<Diagnostic>;

    /// The current program, `None` while the project is still unresolved
    fn get_program(&self) -> Option<&dyn Program>;
}

impl<S: LanguageService + ?Sized> LanguageService for Box<S> {
    fn get_syntactic_diagnostics(&self, file_name: &str) -> Vec<Diagnostic> {
        (**self).get_syntactic_diagnostics(file_name)
    }

    fn get_semantic_diagnostics(&self, file_name: &str) -> Vec<Diagnostic> {
        (**self).get_semantic_diagnostics(file_name)
    }

    fn get_program(&self) -> Option<&dyn Program> {
        (**self).get_program()
    }
}

impl<S: LanguageService + ?Sized> LanguageService for &S {
    fn get_syntactic_diagnostics(&self, file_name: &str) -> Vec<Diagnostic> {
        (**self).get_syntactic_diagnostics(file_name)
    }

    fn get_semantic_diagnostics(&self, file_name: &str) -> Vec<Diagnostic> {
        (**self).get_semantic_diagnostics(file_name)
    }

    fn get_program(&self) -> Option<&dyn Program> {
        (**self).get_program()
    }
}
