//! # WPF Analyzers
//!
//! Static checks for C# sources that declare WPF dependency properties,
//! attached properties, value converters, markup extensions, routed
//! commands and component resource keys.
//!
//! Hosts hand the linter a [`SyntaxTree`](wpf_syntax::SyntaxTree) plus a
//! [`SemanticModel`](wpf_hir::SemanticModel) for it; the [`Analyzer`] walks
//! the analyzable nodes, runs every registered [`NodeAnalyzer`] and returns
//! sorted [`LintDiagnostic`]s. Diagnostics carry a fix payload that the
//! providers in [`fixes`] turn into text edits.
//!
//! ```rust,ignore
//! use wpf_linter::prelude::*;
//!
//! let config = LintConfig::from_yaml_str("rules:\n  WPF0060: off\n")?;
//! let diagnostics = Analyzer::new(config).analyze_tree(&model, &CancellationToken::new())?;
//! let result = fix_all(&diagnostics, model.tree());
//! let fixed = result.apply(model.tree().text())?;
//! ```

mod analyzer;
mod config;
mod context;
pub mod descriptors;
mod diagnostics;
pub mod fixes;
mod matchers;
mod registry;
mod resolvers;
mod rules;
mod traits;

pub use analyzer::Analyzer;
pub use config::{ConfigError, ExtendsConfig, FullLintConfig, LintConfig, LintRuleConfig};
pub use context::NodeContext;
pub use descriptors::{Category, RuleDescriptor};
pub use diagnostics::{keys, Finding, LintDiagnostic};
pub use fixes::{fix_all, propose_fix, FixAll, FixProvider};
pub use registry::{all_rule_names, analyzers};
pub use traits::{LintRule, NodeAnalyzer};
pub use wpf_types::{
    CancellationToken, Cancelled, CodeFix, EditError, Location, OffsetRange, RuleSeverity,
    Severity, TextEdit,
};

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types for working with
/// the linter. Import with:
///
/// ```rust,ignore
/// use wpf_linter::prelude::*;
/// ```
pub mod prelude {
    pub use crate::analyzer::Analyzer;
    pub use crate::config::LintConfig;
    pub use crate::diagnostics::LintDiagnostic;
    pub use crate::fixes::{fix_all, propose_fix};
    pub use wpf_types::{CancellationToken, CodeFix, OffsetRange, Severity};
}
