use rayon::prelude::*;
use wpf_hir::SemanticModel;
use wpf_syntax::visit_nodes;
use wpf_types::{CancellationToken, Cancelled};

use crate::config::LintConfig;
use crate::context::NodeContext;
use crate::diagnostics::LintDiagnostic;
use crate::registry;

/// Analysis driver that runs the registered analyzers under a configuration
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: LintConfig,
}

impl Analyzer {
    /// Create a new analyzer with the given configuration
    #[must_use]
    pub const fn new(config: LintConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Run every enabled analyzer registered for the node's kind.
    ///
    /// Findings for descriptors the configuration turns off are dropped; the
    /// rest get the configured severity. Cancellation discards everything
    /// found for this node so far.
    pub fn analyze_node(&self, ctx: &NodeContext) -> Result<Vec<LintDiagnostic>, Cancelled> {
        let kind = ctx.node.kind();
        let file = ctx.tree().file_id();
        let mut diagnostics = Vec::new();

        for rule in registry::analyzers() {
            if !rule.kinds().contains(&kind) {
                continue;
            }
            let rule_name = rule.name();

            // Skip if none of the rule's descriptors is enabled
            if !rule
                .descriptors()
                .iter()
                .any(|descriptor| self.config.is_enabled(descriptor))
            {
                tracing::trace!(rule = rule_name, "Rule not enabled, skipping");
                continue;
            }

            if let Err(cancelled) = ctx.check() {
                tracing::debug!(rule = rule_name, "Cancelled before running rule");
                return Err(cancelled);
            }

            tracing::trace!(rule = rule_name, "Running rule");
            let rule_diagnostics: Vec<LintDiagnostic> = rule
                .analyze(ctx)?
                .into_iter()
                .filter_map(|finding| {
                    let severity = self.config.get_severity(finding.descriptor).to_severity()?;
                    Some(finding.into_diagnostic(file, severity))
                })
                .collect();

            if !rule_diagnostics.is_empty() {
                tracing::debug!(
                    rule = rule_name,
                    diagnostics = rule_diagnostics.len(),
                    "Rule found issues"
                );
            }

            diagnostics.extend(rule_diagnostics);
        }

        Ok(diagnostics)
    }

    /// Analyze every node of the model's tree.
    ///
    /// Nodes are analyzed in parallel; the result is sorted by span, rule id
    /// and message so it does not depend on scheduling.
    #[tracing::instrument(skip(self, model, token), fields(file = ?model.tree().file_id()))]
    pub fn analyze_tree(
        &self,
        model: &dyn SemanticModel,
        token: &CancellationToken,
    ) -> Result<Vec<LintDiagnostic>, Cancelled> {
        let visits = visit_nodes(model.tree());
        tracing::debug!(nodes = visits.len(), "Analyzing tree");

        let per_node: Vec<Vec<LintDiagnostic>> = visits
            .par_iter()
            .map(|visit| self.analyze_node(&NodeContext::new(*visit, model, token)))
            .collect::<Result<_, _>>()?;

        let mut diagnostics: Vec<LintDiagnostic> = per_node.into_iter().flatten().collect();
        diagnostics.sort_by(|a, b| {
            let (a_range, b_range) = (a.range(), b.range());
            (a_range.start, a_range.end, a.rule_id, &a.message).cmp(&(
                b_range.start,
                b_range.end,
                b.rule_id,
                &b.message,
            ))
        });

        tracing::debug!(
            total_diagnostics = diagnostics.len(),
            "Tree analysis complete"
        );
        Ok(diagnostics)
    }
}
