use crate::analysis::context::AnalysisContext;
use crate::analysis::diagnostic::DiagnosticCategory;
use crate::parser::ast::AstNode;

pub trait SemanticRule {
    // Unique identifier for this rule
    fn id(&self) -> &'static str;

    // Tag stamped on reported diagnostics to name their origin
    fn source(&self) -> &'static str {
        self.id()
    }

    // Short description of what this rule checks
    fn description(&self) -> &'static str;

    // Category of reported violations
    fn category(&self) -> DiagnosticCategory;

    // Stable numeric code attached to every diagnostic of this rule
    fn code(&self) -> u32;

    // Apply the rule to a single node; called for every node in pre-order
    fn check(&self, ctx: &mut AnalysisContext<'_>, node: AstNode<'_>);
}
