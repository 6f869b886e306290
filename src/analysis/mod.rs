mod context;
mod diagnostic;
mod diagnostic_printer;
mod rule;
mod rule_registry;
pub mod rules;

use log::debug;

use crate::host::TypeChecker;
use crate::parser::ast::{AstNode, SourceFile};
use crate::types::TypeFlags;

pub use context::AnalysisContext;
pub use diagnostic::{Diagnostic, DiagnosticCategory, DiagnosticCollector};
pub use diagnostic_printer::{DiagnosticPrinter, LineIndex};
pub use rule::SemanticRule;
pub use rule_registry::RuleRegistry;
pub use rules::BooleanNamingRule;

/// Runs the registered rules over a syntax tree.
///
/// Nodes are visited in pre-order (a node before its children, children in
/// source order) and every enabled rule sees every node, so findings come
/// out in the order their nodes appear in the file.
pub struct SemanticAnalyzer {
    rule_registry: RuleRegistry,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self::with_boolean_like(TypeFlags::BOOLEAN_LIKE)
    }

    /// Analyzer with the built-in rules, treating `boolean_like` as boolean
    pub fn with_boolean_like(boolean_like: TypeFlags) -> Self {
        let mut analyzer = Self::empty();

        // Register built-in rules
        analyzer.register(BooleanNamingRule::new(boolean_like));

        analyzer
    }

    pub fn empty() -> Self {
        Self {
            rule_registry: RuleRegistry::new(),
        }
    }

    pub fn register<R: SemanticRule + 'static>(&mut self, rule: R) {
        self.rule_registry.register(rule);
    }

    pub fn rule(&self, rule_id: &str) -> Option<&dyn SemanticRule> {
        self.rule_registry.get_rule(rule_id)
    }

    /// Checks one file and returns the findings, in traversal order
    pub fn analyze(
        &self,
        source_file: &SourceFile,
        checker: &dyn TypeChecker,
        disabled_rules: &[String],
    ) -> Vec<Diagnostic> {
        let mut ctx = AnalysisContext::new(source_file, checker);
        ctx.disabled_rules.extend(disabled_rules.iter().cloned());

        self.visit(&mut ctx, AstNode::SourceFile(source_file));

        let diagnostics = ctx.diagnostics.into_diagnostics();
        debug!(
            "{}: {} finding(s)",
            source_file.file_name,
            diagnostics.len()
        );
        diagnostics
    }

    fn visit(&self, ctx: &mut AnalysisContext<'_>, node: AstNode<'_>) {
        for rule in self.rule_registry.get_all_rules() {
            if ctx.is_rule_enabled(rule.id()) {
                rule.check(ctx, node);
            }
        }

        node.for_each_child(|child| self.visit(ctx, child));
    }

    // Method to get all available rules
    pub fn list_rules(&self) -> Vec<(&'static str, &'static str, DiagnosticCategory)> {
        self.rule_registry
            .get_all_rules()
            .map(|rule| (rule.id(), rule.description(), rule.category()))
            .collect()
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::parser::ast::{SyntaxKind, VariableDeclaration};
    use crate::parser::parse;
    use crate::types::TypeInfo;

    const TEST_SOURCE: &str = r#"
let isFirst = 1;
function check(n: number) {
    let isSecond = n;
    if (n > 0) {
        let isThird = "yes";
    }
    for (let isFourth = 0; isFourth < 3; isFourth += 1) {}
    return isSecond;
}
let isLast = [1];
"#;

    /// Every declaration is a number
    struct AllNumbers;

    impl TypeChecker for AllNumbers {
        fn type_at_location(&self, _: &SourceFile, _: &VariableDeclaration) -> Option<TypeInfo> {
            Some(TypeInfo::number())
        }
    }

    /// Records the kind of every node it is shown
    struct KindRecorder(Rc<RefCell<Vec<SyntaxKind>>>);

    impl SemanticRule for KindRecorder {
        fn id(&self) -> &'static str {
            "kind-recorder"
        }
        fn description(&self) -> &'static str {
            "records node kinds"
        }
        fn category(&self) -> DiagnosticCategory {
            DiagnosticCategory::Message
        }
        fn code(&self) -> u32 {
            0
        }
        fn check(&self, _: &mut AnalysisContext<'_>, node: AstNode<'_>) {
            self.0.borrow_mut().push(node.kind());
        }
    }

    #[test]
    fn test_analysis() {
        let file = parse("test.ts", TEST_SOURCE).unwrap();
        let diagnostics = SemanticAnalyzer::new().analyze(&file, &AllNumbers, &[]);

        let names: Vec<_> = diagnostics
            .iter()
            .map(|d| &file.text[d.start..d.start + d.length])
            .collect();
        assert_eq!(names, ["isFirst", "isSecond", "isThird", "isFourth", "isLast"]);
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let file = parse("test.ts", TEST_SOURCE).unwrap();
        let diagnostics = SemanticAnalyzer::new().analyze(
            &file,
            &AllNumbers,
            &[rules::boolean_naming::RULE_ID.to_string()],
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn visits_parents_before_children() {
        let file = parse("test.ts", "let a = f(1);").unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let mut analyzer = SemanticAnalyzer::empty();
        analyzer.register(KindRecorder(Rc::clone(&seen)));
        assert!(analyzer.analyze(&file, &AllNumbers, &[]).is_empty());

        assert_eq!(
            *seen.borrow(),
            [
                SyntaxKind::SourceFile,
                SyntaxKind::VariableStatement,
                SyntaxKind::VariableDeclarationList,
                SyntaxKind::VariableDeclaration,
                SyntaxKind::Identifier,
                SyntaxKind::CallExpression,
                SyntaxKind::Identifier,
                SyntaxKind::NumericLiteral,
            ]
        );
    }

    #[test]
    fn list_rules_reports_builtin_rule() {
        let analyzer = SemanticAnalyzer::new();
        let listed = analyzer.list_rules();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0, rules::boolean_naming::RULE_ID);
        assert_eq!(listed[0].2, DiagnosticCategory::Error);
        assert!(analyzer.rule(rules::boolean_naming::RULE_ID).is_some());
    }
}
