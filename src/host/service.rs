use log::{debug, warn};

use crate::DotJsError;
use crate::analysis::Diagnostic;
use crate::host::checker::{CheckedFile, Checker};
use crate::host::{LanguageService, Program, TypeChecker};
use crate::parser::ast::{SourceFile, VariableDeclaration};
use crate::parser::{ParseError, parse_source_file};
use crate::types::TypeInfo;

/// One file of a project, parsed and checked
#[derive(Debug, Clone)]
struct ProjectFile {
    source: SourceFile,
    parse_errors: Vec<ParseError>,
    checked: CheckedFile,
}

impl ProjectFile {
    fn new(file_name: &str, text: &str) -> Self {
        let (source, parse_errors) = parse_source_file(file_name, text);
        let checked = Checker::check(&source);
        Self {
            source,
            parse_errors,
            checked,
        }
    }
}

/// The files of a project, in the order they were added
#[derive(Debug, Clone, Default)]
pub struct Project {
    files: Vec<ProjectFile>,
}

impl Project {
    fn file(&self, file_name: &str) -> Option<&ProjectFile> {
        self.files.iter().find(|f| f.source.file_name == file_name)
    }

    fn position(&self, file_name: &str) -> Option<usize> {
        self.files.iter().position(|f| f.source.file_name == file_name)
    }
}

impl Program for Project {
    fn source_file(&self, file_name: &str) -> Option<&SourceFile> {
        self.file(file_name).map(|f| &f.source)
    }

    fn type_checker(&self) -> &dyn TypeChecker {
        self
    }

    fn root_file_names(&self) -> Vec<String> {
        self.files.iter().map(|f| f.source.file_name.clone()).collect()
    }
}

impl TypeChecker for Project {
    fn type_at_location(&self, file: &SourceFile, declaration: &VariableDeclaration) -> Option<TypeInfo> {
        self.file(&file.file_name)?
            .checked
            .type_at_location(file, declaration)
    }
}

/// A language service over files held in memory.
///
/// Every edit re-parses and re-checks the edited file; files do not see
/// each other's declarations.
#[derive(Debug, Clone)]
pub struct InMemoryLanguageService {
    project: Project,
    resolved: bool,
}

impl InMemoryLanguageService {
    pub fn new() -> Self {
        Self {
            project: Project::default(),
            resolved: true,
        }
    }

    /// A service whose project has not been resolved yet; it has no program
    /// until [`resolve`](Self::resolve) is called
    pub fn unresolved() -> Self {
        Self {
            project: Project::default(),
            resolved: false,
        }
    }

    pub fn resolve(&mut self) {
        self.resolved = true;
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Adds a file, replacing any file with the same name
    pub fn add_file(&mut self, file_name: &str, text: &str) {
        let file = ProjectFile::new(file_name, text);
        debug!(
            "added {file_name}: {} syntax error(s), {} semantic diagnostic(s)",
            file.parse_errors.len(),
            file.checked.diagnostics().len()
        );

        match self.project.position(file_name) {
            Some(index) => self.project.files[index] = file,
            None => self.project.files.push(file),
        }
    }

    /// Replaces the text of a file already in the project
    pub fn update_file(&mut self, file_name: &str, text: &str) -> Result<(), DotJsError> {
        let index = self
            .project
            .position(file_name)
            .ok_or_else(|| DotJsError::UnknownFile(file_name.to_string()))?;
        self.project.files[index] = ProjectFile::new(file_name, text);
        debug!("updated {file_name}");
        Ok(())
    }

    pub fn remove_file(&mut self, file_name: &str) -> Result<(), DotJsError> {
        let index = self
            .project
            .position(file_name)
            .ok_or_else(|| DotJsError::UnknownFile(file_name.to_string()))?;
        self.project.files.remove(index);
        debug!("removed {file_name}");
        Ok(())
    }

    fn file(&self, file_name: &str) -> Option<&ProjectFile> {
        let file = self.project.file(file_name);
        if file.is_none() {
            warn!("{file_name} is not part of the project");
        }
        file
    }
}

impl Default for InMemoryLanguageService {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageService for InMemoryLanguageService {
    fn get_syntactic_diagnostics(&self, file_name: &str) -> Vec<Diagnostic> {
        self.file(file_name)
            .map(|f| {
                f.parse_errors
                    .iter()
                    .map(|err| err.to_diagnostic(file_name))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn get_semantic_diagnostics(&self, file_name: &str) -> Vec<Diagnostic> {
        self.file(file_name)
            .map(|f| f.checked.diagnostics().to_vec())
            .unwrap_or_default()
    }

    fn get_program(&self) -> Option<&dyn Program> {
        if !self.resolved {
            return None;
        }
        let program: &dyn Program = &self.project;
        Some(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Statement;
    use crate::types::TypeFlags;

    #[test]
    fn program_exposes_files_and_types() {
        let mut service = InMemoryLanguageService::new();
        service.add_file("a.ts", "let isReady = 1;");
        service.add_file("b.ts", "let count = 2;");

        let program = service.get_program().unwrap();
        assert_eq!(program.root_file_names(), ["a.ts", "b.ts"]);

        let file = program.source_file("a.ts").unwrap();
        let Some(Statement::Variable(var_stmt)) = file.statements.first() else {
            panic!("expected a variable statement");
        };
        let ty = program
            .type_checker()
            .type_at_location(file, &var_stmt.list.declarations[0])
            .unwrap();
        assert_eq!(ty.flags, TypeFlags::NUMBER);
        assert!(program.source_file("missing.ts").is_none());
    }

    #[test]
    fn syntactic_and_semantic_diagnostics() {
        let mut service = InMemoryLanguageService::new();
        service.add_file("main.ts", "let a = ;\nlet b = missing;");

        let syntactic = service.get_syntactic_diagnostics("main.ts");
        assert_eq!(syntactic.len(), 1);
        assert_eq!(syntactic[0].code, 1109);
        assert_eq!(syntactic[0].file_name, "main.ts");

        let semantic = service.get_semantic_diagnostics("main.ts");
        assert_eq!(semantic.len(), 1);
        assert_eq!(semantic[0].code, 2304);
        assert_eq!(semantic[0].source, None);
    }

    #[test]
    fn unknown_files_have_no_diagnostics() {
        let service = InMemoryLanguageService::new();
        assert!(service.get_syntactic_diagnostics("nope.ts").is_empty());
        assert!(service.get_semantic_diagnostics("nope.ts").is_empty());
    }

    #[test]
    fn editing_files() {
        let mut service = InMemoryLanguageService::new();
        service.add_file("main.ts", "let a = missing;");
        assert_eq!(service.get_semantic_diagnostics("main.ts").len(), 1);

        service.update_file("main.ts", "let a = 1;").unwrap();
        assert!(service.get_semantic_diagnostics("main.ts").is_empty());

        service.remove_file("main.ts").unwrap();
        assert!(service.get_program().unwrap().root_file_names().is_empty());

        assert!(matches!(
            service.remove_file("main.ts"),
            Err(DotJsError::UnknownFile(name)) if name == "main.ts"
        ));
        assert!(service.update_file("main.ts", "").is_err());
    }

    #[test]
    fn unresolved_service_has_no_program() {
        let mut service = InMemoryLanguageService::unresolved();
        service.add_file("main.ts", "let isReady = 1;");
        assert!(!service.is_resolved());
        assert!(service.get_program().is_none());

        service.resolve();
        assert!(service.get_program().is_some());
    }
}
