use wpf_syntax::NodeKind;
use wpf_types::Cancelled;

use crate::context::NodeContext;
use crate::descriptors::RuleDescriptor;
use crate::diagnostics::Finding;

/// Base trait for all analyzers
pub trait LintRule: Send + Sync {
    /// Unique identifier for the analyzer (e.g., `"backing_member"`)
    fn name(&self) -> &'static str;

    /// Human-readable description of what the analyzer checks
    fn description(&self) -> &'static str;

    /// Descriptors of every diagnostic this analyzer can report
    fn descriptors(&self) -> &'static [&'static RuleDescriptor];
}

/// Analyzer invoked once per syntax node of the kinds it registers for
///
/// Implementations must be pure: no state survives between calls and the
/// tree and model are only read. Findings for descriptors the configuration
/// disables are dropped by the driver.
pub trait NodeAnalyzer: LintRule {
    /// Node kinds this analyzer wants to see
    fn kinds(&self) -> &'static [NodeKind];

    /// Analyze one node
    fn analyze(&self, ctx: &NodeContext) -> Result<Vec<Finding>, Cancelled>;
}
