use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use wpf_types::{FileId, Location, OffsetRange, Severity};

use crate::descriptors::RuleDescriptor;

/// Keys of the fix payload carried in [`LintDiagnostic::properties`].
pub mod keys {
    /// Identifier a declaration should be renamed to
    pub const EXPECTED_NAME: &str = "ExpectedName";
    /// Type syntax that should replace the declared type
    pub const TYPE_SYNTAX: &str = "TypeSyntax";
    /// Display name of the type an argument should name, without `typeof`
    pub const EXPECTED_TYPE: &str = "ExpectedType";
    /// Expression text that should replace an argument
    pub const EXPECTED_ARGUMENT: &str = "ExpectedArgument";
    /// Name of the member a declaration should be moved in front of
    pub const MOVE_BEFORE: &str = "MoveBefore";
    /// Complete attribute text including brackets
    pub const ATTRIBUTE_TEXT: &str = "AttributeText";
    /// Arguments to add to an empty argument list, without parentheses
    pub const ARGUMENT_LIST: &str = "ArgumentList";
}

/// A diagnostic reported by one of the analyzers.
///
/// Diagnostics are immutable once created. Locations are byte ranges; hosts
/// convert them to line/column when presenting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintDiagnostic {
    /// Stable id such as `WPF0001`
    pub rule_id: &'static str,
    /// Severity after applying the configuration
    pub severity: Severity,
    pub location: Location,
    /// Message with all placeholders substituted
    pub message: String,
    /// Arguments the message was formatted with
    pub message_args: Vec<String>,
    /// Fix payload for the code fix providers
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl LintDiagnostic {
    #[must_use]
    pub const fn range(&self) -> OffsetRange {
        self.location.range
    }

    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

impl fmt::Display for LintDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] {}", self.severity, self.rule_id, self.message)
    }
}

/// What a rule found, before the driver attaches file and severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub descriptor: &'static RuleDescriptor,
    pub range: OffsetRange,
    pub args: Vec<String>,
    pub properties: BTreeMap<String, String>,
}

impl Finding {
    #[must_use]
    pub const fn new(descriptor: &'static RuleDescriptor, range: OffsetRange) -> Self {
        Self {
            descriptor,
            range,
            args: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    /// Appends a message argument.
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds a fix payload entry.
    #[must_use]
    pub fn with_property(mut self, key: &str, value: impl Into<String>) -> Self {
        self.properties.insert(key.to_owned(), value.into());
        self
    }

    #[must_use]
    pub fn into_diagnostic(self, file: FileId, severity: Severity) -> LintDiagnostic {
        LintDiagnostic {
            rule_id: self.descriptor.id,
            severity,
            location: Location::new(file, self.range),
            message: self.descriptor.format_message(&self.args),
            message_args: self.args,
            properties: self.properties,
        }
    }
}
