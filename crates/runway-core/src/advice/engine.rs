//! Advice Engine - evaluates the rule table and ranks the results

use crate::config::AdviceConfig;
use crate::models::{AdviceItem, DerivedMetrics, ExpenseRecord, Profile};

use super::rules::{AdviceRule, RuleContext, BASELINE_RULES};

/// Holds an ordered rule table and the category bindings it runs with
#[derive(Debug, Clone)]
pub struct AdviceEngine {
    rules: Vec<AdviceRule>,
    config: AdviceConfig,
}

impl Default for AdviceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AdviceEngine {
    /// Engine with the baseline rules and default bindings
    pub fn new() -> Self {
        Self::with_config(AdviceConfig::default())
    }

    /// Engine with the baseline rules and custom bindings
    pub fn with_config(config: AdviceConfig) -> Self {
        Self {
            rules: BASELINE_RULES.to_vec(),
            config,
        }
    }

    /// Append a rule after the existing ones
    pub fn register(&mut self, rule: AdviceRule) {
        self.rules.push(rule);
    }

    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id).collect()
    }

    /// Evaluate every rule and return at most `max_items`, most severe first
    pub fn advise(
        &self,
        profile: &Profile,
        metrics: &DerivedMetrics,
        records: &[ExpenseRecord],
    ) -> Vec<AdviceItem> {
        let ctx = RuleContext {
            profile,
            metrics,
            records,
            config: &self.config,
        };

        let mut items: Vec<AdviceItem> = self
            .rules
            .iter()
            .filter_map(|rule| rule.evaluate(&ctx))
            .collect();
        let fired = items.len();

        // Stable: rules of equal severity keep table order
        items.sort_by_key(|item| item.severity.rank());
        items.truncate(self.config.max_items);

        tracing::debug!(
            fired,
            returned = items.len(),
            "Advice evaluation complete"
        );

        items
    }
}

/// Advice with the baseline rules and default bindings
pub fn generate_advice(
    profile: &Profile,
    metrics: &DerivedMetrics,
    records: &[ExpenseRecord],
) -> Vec<AdviceItem> {
    AdviceEngine::new().advise(profile, metrics, records)
}

/// Advice with the baseline rules and the given bindings
pub fn generate_advice_with(
    config: &AdviceConfig,
    profile: &Profile,
    metrics: &DerivedMetrics,
    records: &[ExpenseRecord],
) -> Vec<AdviceItem> {
    AdviceEngine::with_config(config.clone()).advise(profile, metrics, records)
}
