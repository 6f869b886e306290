use log::{debug, warn};

use crate::analysis::context::AnalysisContext;
use crate::analysis::diagnostic::DiagnosticCategory;
use crate::analysis::rule::SemanticRule;
use crate::parser::ast::AstNode;
use crate::types::TypeFlags;

pub const RULE_ID: &str = "boolean-naming";
pub const RULE_SOURCE: &str = "dotJS";
pub const RULE_CODE: u32 = 42;

const BOOLEAN_PREFIX: &str = "is";

/// Flags variables named `is…` whose type is not boolean-like.
///
/// The prefix match is literal and case-sensitive: `isReady`, `is_ok` and
/// `island` all match, `IsReady` does not. Declarations the checker cannot
/// type are skipped.
pub struct BooleanNamingRule {
    boolean_like: TypeFlags,
}

impl BooleanNamingRule {
    pub fn new(boolean_like: TypeFlags) -> Self {
        Self { boolean_like }
    }
}

impl Default for BooleanNamingRule {
    fn default() -> Self {
        Self::new(TypeFlags::BOOLEAN_LIKE)
    }
}

impl SemanticRule for BooleanNamingRule {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn source(&self) -> &'static str {
        RULE_SOURCE
    }

    fn description(&self) -> &'static str {
        "Variables whose name starts with `is` must have a boolean type"
    }

    fn category(&self) -> DiagnosticCategory {
        DiagnosticCategory::Error
    }

    fn code(&self) -> u32 {
        RULE_CODE
    }

    fn check(&self, ctx: &mut AnalysisContext<'_>, node: AstNode<'_>) {
        let AstNode::VariableDeclaration(decl) = node else {
            return;
        };

        let name = &decl.name;
        if !name.text.starts_with(BOOLEAN_PREFIX) {
            return;
        }

        let Some(ty) = ctx.checker.type_at_location(ctx.source_file, decl) else {
            debug!("no type for `{}` in {}, skipping", name.text, ctx.source_file.file_name);
            return;
        };

        if ty.flags.intersects(self.boolean_like) {
            return;
        }

        if !ctx.source_file.range().contains_range(name.range) {
            warn!(
                "`{}` at {} lies outside {}, not reporting",
                name.text, name.range, ctx.source_file.file_name
            );
            return;
        }

        debug!(
            "{}: `{}` has type `{}`, expected boolean",
            ctx.source_file.file_name, name.text, ty
        );

        ctx.diagnostics.report(
            self.category(),
            Some(self.source()),
            self.code(),
            format!("Rename {} or make it type \"boolean\"", name.text),
            name.range,
        );
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::analysis::SemanticAnalyzer;
    use crate::host::TypeChecker;
    use crate::parser::ast::{SourceFile, VariableDeclaration};
    use crate::parser::parse;
    use crate::types::TypeInfo;

    /// Answers with a fixed type per declared name
    struct FixedTypes(HashMap<&'static str, TypeInfo>);

    impl TypeChecker for FixedTypes {
        fn type_at_location(&self, _file: &SourceFile, decl: &VariableDeclaration) -> Option<TypeInfo> {
            self.0.get(decl.name.text.as_str()).cloned()
        }
    }

    fn run(text: &str, types: &[(&'static str, TypeInfo)]) -> Vec<crate::analysis::Diagnostic> {
        let file = parse("test.ts", text).unwrap();
        let checker = FixedTypes(types.iter().cloned().collect());
        let mut analyzer = SemanticAnalyzer::empty();
        analyzer.register(BooleanNamingRule::default());
        analyzer.analyze(&file, &checker, &[])
    }

    #[test]
    fn reports_numeric_is_variable() {
        let diagnostics = run("let isReady = 1;", &[("isReady", TypeInfo::number())]);
        assert_eq!(diagnostics.len(), 1);

        let diagnostic = &diagnostics[0];
        assert_eq!(diagnostic.start, 4);
        assert_eq!(diagnostic.length, "isReady".len());
        assert_eq!(diagnostic.message, "Rename isReady or make it type \"boolean\"");
        assert_eq!(diagnostic.category, DiagnosticCategory::Error);
        assert_eq!(diagnostic.source.as_deref(), Some(RULE_SOURCE));
        assert_eq!(diagnostic.code, RULE_CODE);
        assert_eq!(diagnostic.file_name, "test.ts");
    }

    #[test]
    fn accepts_boolean_like_types() {
        let diagnostics = run(
            "let isA = true; const isB = false; let isC: boolean;",
            &[
                ("isA", TypeInfo::boolean()),
                ("isB", TypeInfo::boolean_literal(false)),
                ("isC", TypeInfo::boolean()),
            ],
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn ignores_names_without_prefix() {
        let diagnostics = run(
            "let count = 1; let IsBig = 2; let i = 3;",
            &[
                ("count", TypeInfo::number()),
                ("IsBig", TypeInfo::number()),
                ("i", TypeInfo::number()),
            ],
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn prefix_match_is_literal() {
        let diagnostics = run("let island = 'x';", &[("island", TypeInfo::string())]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Rename island or make it type \"boolean\"");
    }

    #[test]
    fn skips_declarations_without_type() {
        let diagnostics = run("let isMissing = thing;", &[]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn custom_boolean_like_mask() {
        let file = parse("test.ts", "let isNum = 1;").unwrap();
        let checker = FixedTypes([("isNum", TypeInfo::number())].into_iter().collect());
        let mut analyzer = SemanticAnalyzer::empty();
        analyzer.register(BooleanNamingRule::new(TypeFlags::BOOLEAN_LIKE | TypeFlags::NUMBER));
        assert!(analyzer.analyze(&file, &checker, &[]).is_empty());
    }

    #[test]
    fn names_outside_the_file_text_are_not_reported() {
        let mut file = parse("test.ts", "let isReady = 1;\nlet isLate = 2;").unwrap();
        // a tree that outlived an edit shortening the text
        file.text.truncate("let isReady = 1;".len());

        let checker = FixedTypes([("isReady", TypeInfo::number()), ("isLate", TypeInfo::number())].into_iter().collect());
        let mut analyzer = SemanticAnalyzer::empty();
        analyzer.register(BooleanNamingRule::default());
        let diagnostics = analyzer.analyze(&file, &checker, &[]);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Rename isReady or make it type \"boolean\"");
        assert!(diagnostics[0].start + diagnostics[0].length <= file.text.len());
    }
}
