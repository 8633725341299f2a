use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use wpf_types::RuleSeverity;

use crate::descriptors::{self, RuleDescriptor};

/// Presets accepted by `extends`.
const PRESETS: &[&str] = &["recommended", "all"];

/// Configuration for a single rule
///
/// Supports multiple formats:
/// ```yaml
/// # Simple severity
/// WPF0001: warn
///
/// # Array style
/// backing_field_matches_registered_name: [error]
///
/// # Object style
/// WPF0073:
///   enabled: true
/// WPF0060:
///   severity: off
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LintRuleConfig {
    /// Just a severity level (simple case)
    Severity(RuleSeverity),

    /// Detailed config; either field may be omitted
    Detailed {
        #[serde(skip_serializing_if = "Option::is_none")]
        severity: Option<RuleSeverity>,
        #[serde(skip_serializing_if = "Option::is_none")]
        enabled: Option<bool>,
    },
}

impl LintRuleConfig {
    /// Severity this entry assigns to `descriptor`, if it assigns one.
    ///
    /// `enabled: false` always wins; `enabled: true` without a severity turns
    /// the rule on at its default severity.
    #[must_use]
    pub fn severity_for(&self, descriptor: &RuleDescriptor) -> Option<RuleSeverity> {
        match self {
            Self::Severity(severity) => Some(*severity),
            Self::Detailed {
                enabled: Some(false),
                ..
            } => Some(RuleSeverity::Off),
            Self::Detailed {
                severity: Some(severity),
                ..
            } => Some(*severity),
            Self::Detailed {
                enabled: Some(true),
                ..
            } => Some(RuleSeverity::from(descriptor.default_severity)),
            Self::Detailed { .. } => None,
        }
    }
}

/// Custom deserializer for `LintRuleConfig` to accept the string, array and object forms
impl<'de> Deserialize<'de> for LintRuleConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, SeqAccess, Visitor};

        struct LintRuleConfigVisitor;

        impl<'de> Visitor<'de> for LintRuleConfigVisitor {
            type Value = LintRuleConfig;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str(
                    "a severity string ('off', 'warn', 'error'), \
                     an array [severity], \
                     or an object { severity, enabled }",
                )
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                RuleSeverity::parse(value)
                    .map(LintRuleConfig::Severity)
                    .ok_or_else(|| E::custom(format!("unknown severity: {value}")))
            }

            // YAML 1.1 readers turn a bare `off` into `false`
            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(LintRuleConfig::Detailed {
                    severity: None,
                    enabled: Some(value),
                })
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let severity: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &"array with severity"))?;
                self.visit_str(&severity)
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                #[derive(Deserialize)]
                #[serde(deny_unknown_fields)]
                struct DetailedConfig {
                    #[serde(default)]
                    severity: Option<RuleSeverity>,
                    #[serde(default)]
                    enabled: Option<bool>,
                }

                let config =
                    DetailedConfig::deserialize(de::value::MapAccessDeserializer::new(map))?;
                Ok(LintRuleConfig::Detailed {
                    severity: config.severity,
                    enabled: config.enabled,
                })
            }
        }

        deserializer.deserialize_any(LintRuleConfigVisitor)
    }
}

/// Extends configuration - can be a single preset or multiple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtendsConfig {
    /// Single preset: `extends: recommended`
    Single(String),
    /// Multiple presets: `extends: [recommended, all]`
    Multiple(Vec<String>),
}

impl ExtendsConfig {
    /// Get all presets as a vector (normalizes single to vec)
    #[must_use]
    pub fn presets(&self) -> Vec<&str> {
        match self {
            Self::Single(s) => vec![s.as_str()],
            Self::Multiple(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

/// Full configuration with extends and rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FullLintConfig {
    /// Presets to extend (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<ExtendsConfig>,

    /// Rule configurations keyed by rule id (`WPF0001`) or rule name
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub rules: HashMap<String, LintRuleConfig>,
}

/// Analyzer configuration
///
/// Supports multiple formats:
///
/// ```yaml
/// # Just the descriptor defaults
/// recommended
///
/// # Every rule, including the ones disabled by default
/// [recommended, all]
///
/// # Preset with overrides
/// extends: recommended
/// rules:
///   WPF0060: off
///   clr_property_avoid_side_effects: error
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LintConfig {
    /// Preset(s): `recommended` or `[recommended, all]`
    Preset(ExtendsConfig),

    /// Full configuration with optional extends and rules
    Full(FullLintConfig),
}

impl Default for LintConfig {
    fn default() -> Self {
        Self::Full(FullLintConfig {
            extends: None,
            rules: HashMap::new(),
        })
    }
}

/// Errors found while loading or validating a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown preset '{name}', valid presets are: recommended, all")]
    UnknownPreset { name: String },

    #[error("unknown rule '{name}'{}", format_suggestions(.suggestions))]
    UnknownRule {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("invalid configuration: {0}")]
    Parse(String),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(", did you mean: {}?", suggestions.join(", "))
    }
}

/// Rule ids and names closest to `name`, best match first.
fn suggest(name: &str) -> Vec<String> {
    const THRESHOLD: f64 = 0.7;
    const MAX_SUGGESTIONS: usize = 3;

    let needle = name.to_lowercase();
    let mut scored: Vec<(f64, &str)> = descriptors::all()
        .iter()
        .flat_map(|d| [d.id, d.name])
        .map(|candidate| {
            let score =
                strsim::normalized_damerau_levenshtein(&needle, &candidate.to_lowercase());
            (score, candidate)
        })
        .filter(|(score, _)| *score >= THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, candidate)| candidate.to_owned())
        .collect()
}

impl LintConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse a configuration from YAML.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        serde_saphyr::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate presets and rule keys against the descriptor catalog
    ///
    /// Keys are checked in sorted order so the reported error is stable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (extends, rules) = match self {
            Self::Preset(presets) => (Some(presets), None),
            Self::Full(FullLintConfig { extends, rules }) => (extends.as_ref(), Some(rules)),
        };

        if let Some(ext) = extends {
            if let Some(preset) = ext.presets().into_iter().find(|p| !PRESETS.contains(p)) {
                return Err(ConfigError::UnknownPreset {
                    name: preset.to_owned(),
                });
            }
        }

        let mut keys: Vec<&str> = rules
            .map(|rules| rules.keys().map(String::as_str).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        match keys.into_iter().find(|key| descriptors::find(key).is_none()) {
            Some(name) => Err(ConfigError::UnknownRule {
                name: name.to_owned(),
                suggestions: suggest(name),
            }),
            None => Ok(()),
        }
    }

    /// Get the severity for a rule, considering presets and overrides
    ///
    /// Rule entries may use the id or the name; the id wins when both are present.
    #[must_use]
    pub fn get_severity(&self, descriptor: &RuleDescriptor) -> RuleSeverity {
        match self {
            Self::Preset(presets) => Self::severity_from_presets(presets, descriptor),
            Self::Full(FullLintConfig { extends, rules }) => {
                let configured = [descriptor.id, descriptor.name]
                    .into_iter()
                    .find_map(|key| rules.get(key)?.severity_for(descriptor));
                configured.unwrap_or_else(|| match extends {
                    Some(ext) => Self::severity_from_presets(ext, descriptor),
                    None => descriptor.default_rule_severity(),
                })
            }
        }
    }

    /// Get severity from a list of presets (later presets override earlier)
    fn severity_from_presets(presets: &ExtendsConfig, descriptor: &RuleDescriptor) -> RuleSeverity {
        let mut severity = descriptor.default_rule_severity();
        for preset in presets.presets() {
            match preset {
                "recommended" => severity = descriptor.default_rule_severity(),
                "all" => severity = RuleSeverity::from(descriptor.default_severity),
                _ => {}
            }
        }
        severity
    }

    /// Check if a rule is enabled (not Off)
    #[must_use]
    pub fn is_enabled(&self, descriptor: &RuleDescriptor) -> bool {
        self.get_severity(descriptor).is_enabled()
    }

    /// Get recommended configuration
    #[must_use]
    pub fn recommended() -> Self {
        Self::Preset(ExtendsConfig::Single("recommended".to_string()))
    }

    /// Every rule enabled at its default severity
    #[must_use]
    pub fn all() -> Self {
        Self::Preset(ExtendsConfig::Single("all".to_string()))
    }

    /// Merge another config into this one (host-specific overrides)
    #[must_use]
    pub fn merge(&self, override_config: &Self) -> Self {
        match (self, override_config) {
            // If override is a preset, use it directly
            (_, Self::Preset(name)) => Self::Preset(name.clone()),

            // If override is empty Full config, keep base
            (
                base,
                Self::Full(FullLintConfig {
                    extends: None,
                    rules,
                }),
            ) if rules.is_empty() => base.clone(),

            // Merge Full configs
            (
                Self::Full(FullLintConfig {
                    extends: base_ext,
                    rules: base_rules,
                }),
                Self::Full(FullLintConfig {
                    extends: override_ext,
                    rules: override_rules,
                }),
            ) => {
                let mut merged_rules = base_rules.clone();
                merged_rules.extend(override_rules.clone());
                Self::Full(FullLintConfig {
                    extends: override_ext.clone().or_else(|| base_ext.clone()),
                    rules: merged_rules,
                })
            }

            // Preset + Full override: convert preset to extends and merge
            (
                Self::Preset(presets),
                Self::Full(FullLintConfig {
                    extends: override_ext,
                    rules: override_rules,
                }),
            ) => Self::Full(FullLintConfig {
                extends: override_ext.clone().or_else(|| Some(presets.clone())),
                rules: override_rules.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::{WPF0001, WPF0010, WPF0060, WPF0073};

    #[test]
    fn test_simple_preset() {
        let config = LintConfig::from_yaml_str("recommended").unwrap();
        assert!(matches!(
            config,
            LintConfig::Preset(ExtendsConfig::Single(ref s)) if s == "recommended"
        ));
        assert!(config.is_enabled(&WPF0001));
        assert!(!config.is_enabled(&WPF0073));
        assert_eq!(config.get_severity(&WPF0010), RuleSeverity::Error);
    }

    #[test]
    fn test_preset_list_later_presets_win() {
        let config = LintConfig::from_yaml_str("[recommended, all]").unwrap();
        assert!(matches!(config, LintConfig::Preset(ExtendsConfig::Multiple(_))));
        assert_eq!(config.get_severity(&WPF0073), RuleSeverity::Warn);
    }

    #[test]
    fn test_default_config_uses_descriptor_defaults() {
        let config = LintConfig::default();
        assert_eq!(config.get_severity(&WPF0001), RuleSeverity::Warn);
        assert_eq!(config.get_severity(&WPF0010), RuleSeverity::Error);
        assert_eq!(config.get_severity(&WPF0073), RuleSeverity::Off);
    }

    #[test]
    fn test_rules_by_id_and_name() {
        let yaml = r#"
extends: recommended
rules:
  WPF0001: error
  document_backing_member: "off"
"#;
        let config = LintConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.get_severity(&WPF0001), RuleSeverity::Error);
        assert_eq!(config.get_severity(&WPF0060), RuleSeverity::Off);
        assert_eq!(config.get_severity(&WPF0010), RuleSeverity::Error);
    }

    #[test]
    fn test_id_entry_wins_over_name_entry() {
        let json = r#"{ "rules": { "WPF0001": "error", "backing_field_matches_registered_name": "off" } }"#;
        let config = LintConfig::from_json_str(json).unwrap();
        assert_eq!(config.get_severity(&WPF0001), RuleSeverity::Error);
    }

    #[test]
    fn test_array_and_object_forms() {
        let yaml = r"
rules:
  WPF0001: [error]
  WPF0073:
    enabled: true
  WPF0060:
    severity: warn
    enabled: false
";
        let config = LintConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.get_severity(&WPF0001), RuleSeverity::Error);
        assert_eq!(config.get_severity(&WPF0073), RuleSeverity::Warn);
        assert_eq!(config.get_severity(&WPF0060), RuleSeverity::Off);
    }

    #[test]
    fn test_boolean_entries() {
        let json = r#"{ "rules": { "WPF0060": false, "WPF0073": true } }"#;
        let config = LintConfig::from_json_str(json).unwrap();
        assert!(!config.is_enabled(&WPF0060));
        assert!(config.is_enabled(&WPF0073));
    }

    #[test]
    fn test_unknown_severity_is_parse_error() {
        let err = LintConfig::from_json_str(r#"{ "rules": { "WPF0001": "fatal" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validate_accepts_ids_and_names() {
        let config = LintConfig::from_json_str(
            r#"{ "extends": "all", "rules": { "WPF0001": "warn", "routed_command_owner": "error" } }"#,
        )
        .unwrap();
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_suggests_close_rule_names() {
        let config =
            LintConfig::from_json_str(r#"{ "rules": { "routed_command_onwer": "error" } }"#).unwrap();
        let err = config.validate().unwrap_err();
        let ConfigError::UnknownRule { name, suggestions } = &err else {
            panic!("expected unknown rule, got {err:?}");
        };
        assert_eq!(name, "routed_command_onwer");
        assert_eq!(suggestions.first().map(String::as_str), Some("routed_command_owner"));
        assert!(err.to_string().contains("did you mean: routed_command_owner"));
    }

    #[test]
    fn test_validate_rejects_unknown_preset() {
        let config = LintConfig::from_yaml_str("strict").unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownPreset {
                name: "strict".to_owned()
            })
        );
    }

    #[test]
    fn test_merge_full_configs() {
        let base = LintConfig::from_json_str(
            r#"{ "extends": "recommended", "rules": { "WPF0001": "error", "WPF0060": "off" } }"#,
        )
        .unwrap();
        let overrides = LintConfig::from_json_str(r#"{ "rules": { "WPF0001": "off" } }"#).unwrap();
        let merged = base.merge(&overrides);
        assert_eq!(merged.get_severity(&WPF0001), RuleSeverity::Off);
        assert_eq!(merged.get_severity(&WPF0060), RuleSeverity::Off);
        assert!(matches!(
            merged,
            LintConfig::Full(FullLintConfig { extends: Some(_), .. })
        ));
    }

    #[test]
    fn test_merge_empty_override_keeps_base() {
        let base = LintConfig::all();
        assert_eq!(base.merge(&LintConfig::default()), base);
    }

    #[test]
    fn test_merge_preset_base_with_rules() {
        let overrides = LintConfig::from_json_str(r#"{ "rules": { "WPF0010": "warn" } }"#).unwrap();
        let merged = LintConfig::all().merge(&overrides);
        assert_eq!(merged.get_severity(&WPF0010), RuleSeverity::Warn);
        assert_eq!(merged.get_severity(&WPF0073), RuleSeverity::Warn);
    }

    #[test]
    fn test_merge_preset_override_replaces() {
        let base = LintConfig::from_json_str(r#"{ "rules": { "WPF0010": "off" } }"#).unwrap();
        assert_eq!(base.merge(&LintConfig::recommended()), LintConfig::recommended());
    }
}
