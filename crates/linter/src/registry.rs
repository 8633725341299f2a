/// Registry of all available analyzers
use crate::rules::{
    AttributeRuleImpl, BackingMemberRuleImpl, ClrMethodRuleImpl, ClrPropertyRuleImpl,
    ResourceKeyRuleImpl, RoutedCommandRuleImpl, ValueConverterRuleImpl,
};
use crate::traits::NodeAnalyzer;
use std::sync::{Arc, LazyLock};

/// Lazily initialized node analyzers.
/// Analyzers are created once and reused across all calls.
static ANALYZERS: LazyLock<Vec<Arc<dyn NodeAnalyzer>>> = LazyLock::new(|| {
    vec![
        Arc::new(BackingMemberRuleImpl),
        Arc::new(ClrPropertyRuleImpl),
        Arc::new(ClrMethodRuleImpl),
        Arc::new(AttributeRuleImpl),
        Arc::new(ValueConverterRuleImpl),
        Arc::new(ResourceKeyRuleImpl),
        Arc::new(RoutedCommandRuleImpl),
    ]
});

#[must_use]
pub fn analyzers() -> &'static [Arc<dyn NodeAnalyzer>] {
    &ANALYZERS
}

#[must_use]
pub fn all_rule_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = analyzers().iter().map(|rule| rule.name()).collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors;

    #[test]
    fn test_rule_names_are_unique() {
        let mut names = all_rule_names();
        let count = names.len();
        names.dedup();
        assert_eq!(names.len(), count);
    }

    #[test]
    fn test_every_descriptor_has_exactly_one_analyzer() {
        for descriptor in descriptors::all() {
            let owners = analyzers()
                .iter()
                .filter(|rule| rule.descriptors().iter().any(|d| d.id == descriptor.id))
                .count();
            assert_eq!(owners, 1, "{}", descriptor.id);
        }
    }
}
