use crate::analysis::rule::SemanticRule;

/// Rules in registration order; checks run in this order at every node
pub struct RuleRegistry {
    rules: Vec<Box<dyn SemanticRule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Registers `rule`, replacing a previously registered rule with the same id
    pub fn register<R: SemanticRule + 'static>(&mut self, rule: R) {
        self.rules.retain(|r| r.id() != rule.id());
        self.rules.push(Box::new(rule));
    }

    pub fn get_rule(&self, rule_id: &str) -> Option<&dyn SemanticRule> {
        self.rules
            .iter()
            .find(|r| r.id() == rule_id)
            .map(|r| r.as_ref())
    }

    pub fn get_all_rules(&self) -> impl Iterator<Item = &dyn SemanticRule> {
        self.rules.iter().map(|r| r.as_ref())
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::rules::BooleanNamingRule;
    use crate::types::TypeFlags;

    #[test]
    fn register_replaces_same_id() {
        let mut registry = RuleRegistry::default();
        registry.register(BooleanNamingRule::default());
        registry.register(BooleanNamingRule::new(TypeFlags::BOOLEAN));

        assert_eq!(registry.get_all_rules().count(), 1);
        assert!(registry.get_rule("boolean-naming").is_some());
        assert!(registry.get_rule("unknown").is_none());
    }
}
