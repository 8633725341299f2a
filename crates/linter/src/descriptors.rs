//! Static catalog of rule descriptors
//!
//! Every diagnostic the analyzers can report is described by one
//! [`RuleDescriptor`]. The catalog is built once and never mutated; rules refer
//! to the descriptors by `&'static` reference.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::Serialize;
use wpf_types::{RuleSeverity, Severity};

/// Grouping of rules for documentation. Carries no behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    DependencyProperty,
    MarkupExtension,
    ValueConverter,
    ComponentResourceKey,
    RoutedCommand,
    ControlTemplate,
    XmlnsDefinition,
    Documentation,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DependencyProperty => "WpfAnalyzers.DependencyProperty",
            Self::MarkupExtension => "WpfAnalyzers.MarkupExtension",
            Self::ValueConverter => "WpfAnalyzers.IValueConverter",
            Self::ComponentResourceKey => "WpfAnalyzers.ComponentResourceKey",
            Self::RoutedCommand => "WpfAnalyzers.RoutedCommand",
            Self::ControlTemplate => "WpfAnalyzers.ControlTemplate",
            Self::XmlnsDefinition => "WpfAnalyzers.XmlnsDefinition",
            Self::Documentation => "WpfAnalyzers.Documentation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata for one diagnostic id.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct RuleDescriptor {
    /// Stable id such as `WPF0001`
    pub id: &'static str,
    /// Configuration name such as `backing_field_matches_registered_name`
    pub name: &'static str,
    pub title: &'static str,
    /// Message with `{0}`, `{1}`, ... placeholders for the finding's arguments
    pub message_format: &'static str,
    pub category: Category,
    pub default_severity: Severity,
    pub enabled_by_default: bool,
    pub description: &'static str,
}

impl RuleDescriptor {
    #[must_use]
    pub fn help_url(&self) -> String {
        format!(
            "https://github.com/DotNetAnalyzers/WpfAnalyzers/tree/master/documentation/{}.md",
            self.id
        )
    }

    /// Severity used when the configuration says nothing about this rule.
    #[must_use]
    pub fn default_rule_severity(&self) -> RuleSeverity {
        if self.enabled_by_default {
            RuleSeverity::from(self.default_severity)
        } else {
            RuleSeverity::Off
        }
    }

    /// Substitutes `{n}` placeholders with `args[n]`.
    ///
    /// Placeholders without a matching argument are kept verbatim.
    #[must_use]
    pub fn format_message(&self, args: &[String]) -> String {
        let format = self.message_format;
        let mut message = String::with_capacity(format.len());
        let mut rest = format;
        while let Some(open) = rest.find('{') {
            message.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let substituted = after.find('}').and_then(|close| {
                let index: usize = after[..close].parse().ok()?;
                Some((args.get(index)?, close))
            });
            match substituted {
                Some((arg, close)) => {
                    message.push_str(arg);
                    rest = &after[close + 1..];
                }
                None => {
                    message.push('{');
                    rest = after;
                }
            }
        }
        message.push_str(rest);
        message
    }
}

impl fmt::Display for RuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.id, self.name, self.title)
    }
}

pub static WPF0001: RuleDescriptor = RuleDescriptor {
    id: "WPF0001",
    name: "backing_field_matches_registered_name",
    title: "Backing field for a DependencyProperty should match registered name.",
    message_format: "Field '{0}' that is backing field for the DependencyProperty registered as '{1}' must be named '{1}Property'",
    category: Category::DependencyProperty,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "A dependency property's backing field should be named with the name it is registered with suffixed by 'Property'.",
};

pub static WPF0002: RuleDescriptor = RuleDescriptor {
    id: "WPF0002",
    name: "key_backing_field_matches_registered_name",
    title: "Backing field for a DependencyPropertyKey should match registered name.",
    message_format: "Field '{0}' that is backing field for the DependencyPropertyKey registered as '{1}' must be named '{1}PropertyKey'",
    category: Category::DependencyProperty,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "A DependencyPropertyKey's backing field should be named with the name it is registered with suffixed by 'PropertyKey'.",
};

pub static WPF0003: RuleDescriptor = RuleDescriptor {
    id: "WPF0003",
    name: "clr_property_matches_registered_name",
    title: "CLR property for a DependencyProperty should match registered name.",
    message_format: "Property '{0}' must be named {1}",
    category: Category::DependencyProperty,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "A CLR property accessor for a DependencyProperty must have the same name as the DependencyProperty is registered with.",
};

pub static WPF0004: RuleDescriptor = RuleDescriptor {
    id: "WPF0004",
    name: "clr_method_matches_registered_name",
    title: "CLR method for a DependencyProperty must match registered name.",
    message_format: "Method '{0}' must be named '{1}'",
    category: Category::DependencyProperty,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "CLR methods for accessing a DependencyProperty must have names matching the name the DependencyProperty is registered with.",
};

pub static WPF0010: RuleDescriptor = RuleDescriptor {
    id: "WPF0010",
    name: "default_value_matches_registered_type",
    title: "Default value type must match registered type.",
    message_format: "Default value for '{0}' must be of type {1}",
    category: Category::DependencyProperty,
    default_severity: Severity::Error,
    enabled_by_default: true,
    description: "A DependencyProperty is registered with a type and a default value. The type of the default value must be the same as the registered type.",
};

pub static WPF0011: RuleDescriptor = RuleDescriptor {
    id: "WPF0011",
    name: "registered_owner_is_containing_type",
    title: "Containing type should be used as registered owner.",
    message_format: "Register containing type: '{0}' as owner.",
    category: Category::DependencyProperty,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "When registering a DependencyProperty register containing type as owner type.",
};

pub static WPF0012: RuleDescriptor = RuleDescriptor {
    id: "WPF0012",
    name: "clr_property_matches_registered_type",
    title: "CLR property type should match registered type.",
    message_format: "Property '{0}' must be of type {1}",
    category: Category::DependencyProperty,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "CLR property type should match registered type.",
};

pub static WPF0013: RuleDescriptor = RuleDescriptor {
    id: "WPF0013",
    name: "clr_method_matches_registered_type",
    title: "CLR accessor for attached property must match registered type.",
    message_format: "{0} must match registered type {1}",
    category: Category::DependencyProperty,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "CLR accessor for attached property must match registered type.",
};

pub static WPF0016: RuleDescriptor = RuleDescriptor {
    id: "WPF0016",
    name: "default_value_is_not_shared_instance",
    title: "Default value is shared reference type.",
    message_format: "Default value for '{0}' is a reference type that will be shared among all instances.",
    category: Category::DependencyProperty,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "When registering a new instance of a reference type as default value the value is shared for all instances of the control.",
};

pub static WPF0030: RuleDescriptor = RuleDescriptor {
    id: "WPF0030",
    name: "backing_member_static_readonly",
    title: "Backing field for a DependencyProperty should be static and readonly.",
    message_format: "Backing member '{0}' of type {1} should be static and readonly.",
    category: Category::DependencyProperty,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "Backing field for a DependencyProperty should be static and readonly. Backing properties should be static and get-only.",
};

pub static WPF0031: RuleDescriptor = RuleDescriptor {
    id: "WPF0031",
    name: "key_field_declared_first",
    title: "DependencyPropertyKey member must be declared before DependencyProperty member.",
    message_format: "Field '{0}' must be declared before '{1}'",
    category: Category::DependencyProperty,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "DependencyPropertyKey member must be declared before DependencyProperty member, otherwise the DependencyProperty is initialized from a null key.",
};

pub static WPF0032: RuleDescriptor = RuleDescriptor {
    id: "WPF0032",
    name: "clr_property_same_property_in_get_and_set",
    title: "Use same dependency property in get and set.",
    message_format: "Property '{0}' must access the same dependency property in getter and setter",
    category: Category::DependencyProperty,
    default_severity: Severity::Error,
    enabled_by_default: true,
    description: "Use same dependency property in get and set.",
};

pub static WPF0033: RuleDescriptor = RuleDescriptor {
    id: "WPF0033",
    name: "add_attached_property_browsable_for_type",
    title: "Add [AttachedPropertyBrowsableForType]",
    message_format: "Add [AttachedPropertyBrowsableForType(typeof({0}))]",
    category: Category::DependencyProperty,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "Add [AttachedPropertyBrowsableForType] so the designer shows the attached property for the right types.",
};

pub static WPF0034: RuleDescriptor = RuleDescriptor {
    id: "WPF0034",
    name: "attached_property_browsable_for_type_argument",
    title: "Use correct argument for [AttachedPropertyBrowsableForType]",
    message_format: "Use [AttachedPropertyBrowsableForType(typeof({0}))]",
    category: Category::DependencyProperty,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "Use correct argument for [AttachedPropertyBrowsableForType]",
};

pub static WPF0035: RuleDescriptor = RuleDescriptor {
    id: "WPF0035",
    name: "clr_property_uses_set_value",
    title: "Use SetValue in setter.",
    message_format: "Use SetValue in setter.",
    category: Category::DependencyProperty,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "Use SetValue in setter. SetCurrentValue does not change the value source.",
};

pub static WPF0036: RuleDescriptor = RuleDescriptor {
    id: "WPF0036",
    name: "clr_property_avoid_side_effects",
    title: "Avoid side effects in CLR accessors.",
    message_format: "Avoid side effects in CLR accessors.",
    category: Category::DependencyProperty,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "Bindings do not call accessors when updating value. Use callbacks.",
};

pub static WPF0042: RuleDescriptor = RuleDescriptor {
    id: "WPF0042",
    name: "clr_method_avoid_side_effects",
    title: "Avoid side effects in CLR accessors.",
    message_format: "Avoid side effects in CLR accessors.",
    category: Category::DependencyProperty,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "Bindings do not call accessor methods when updating value. Use callbacks.",
};

pub static WPF0051: RuleDescriptor = RuleDescriptor {
    id: "WPF0051",
    name: "xmlns_definition_namespace_exists",
    title: "XmlnsDefinition must map to existing namespace.",
    message_format: "[XmlnsDefinition] maps to '{0}' that does not exist.",
    category: Category::XmlnsDefinition,
    default_severity: Severity::Error,
    enabled_by_default: true,
    description: "The CLR namespace an XmlnsDefinition maps must contain at least one type.",
};

pub static WPF0060: RuleDescriptor = RuleDescriptor {
    id: "WPF0060",
    name: "document_backing_member",
    title: "Backing member for DependencyProperty should have documentation.",
    message_format: "Backing member for DependencyProperty should have documentation.",
    category: Category::Documentation,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "Backing member for DependencyProperty should have documentation.",
};

pub static WPF0061: RuleDescriptor = RuleDescriptor {
    id: "WPF0061",
    name: "document_clr_method",
    title: "Accessor method for attached property should have documentation.",
    message_format: "CLR accessor for attached property should have documentation.",
    category: Category::Documentation,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "Accessor method for attached property should have documentation.",
};

pub static WPF0070: RuleDescriptor = RuleDescriptor {
    id: "WPF0070",
    name: "converter_has_default_instance",
    title: "Add default field to converter.",
    message_format: "Add default field to converter.",
    category: Category::ValueConverter,
    default_severity: Severity::Warning,
    enabled_by_default: false,
    description: "A stateless converter can expose a shared `Default` instance so XAML can use `x:Static` instead of allocating one per use.",
};

pub static WPF0071: RuleDescriptor = RuleDescriptor {
    id: "WPF0071",
    name: "converter_has_value_conversion",
    title: "Add ValueConversion attribute.",
    message_format: "Add ValueConversion attribute.",
    category: Category::ValueConverter,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "Add ValueConversion attribute so tools know the source and target types of the converter.",
};

pub static WPF0072: RuleDescriptor = RuleDescriptor {
    id: "WPF0072",
    name: "value_conversion_types",
    title: "ValueConversion must use correct types.",
    message_format: "ValueConversion must use correct types. Expected: {0}",
    category: Category::ValueConverter,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "ValueConversion must use the types the converter actually converts from and to.",
};

pub static WPF0073: RuleDescriptor = RuleDescriptor {
    id: "WPF0073",
    name: "converter_has_value_conversion_unknown_types",
    title: "Add ValueConversion attribute (unknown types).",
    message_format: "Add ValueConversion attribute (unknown types).",
    category: Category::ValueConverter,
    default_severity: Severity::Warning,
    enabled_by_default: false,
    description: "Add ValueConversion attribute even when the conversion types cannot be inferred.",
};

pub static WPF0074: RuleDescriptor = RuleDescriptor {
    id: "WPF0074",
    name: "default_converter_instance_type",
    title: "Use containing type.",
    message_format: "Use containing type.",
    category: Category::ValueConverter,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "The default instance of a converter must be an instance of the converter itself.",
};

pub static WPF0081: RuleDescriptor = RuleDescriptor {
    id: "WPF0081",
    name: "markup_extension_return_type",
    title: "MarkupExtensionReturnType must use correct return type.",
    message_format: "MarkupExtensionReturnType must use correct return type. Expected: {0}",
    category: Category::MarkupExtension,
    default_severity: Severity::Error,
    enabled_by_default: true,
    description: "MarkupExtensionReturnType must use the type ProvideValue returns.",
};

pub static WPF0082: RuleDescriptor = RuleDescriptor {
    id: "WPF0082",
    name: "constructor_argument_name",
    title: "[ConstructorArgument] must match.",
    message_format: "[ConstructorArgument] must match. Expected: {0}",
    category: Category::MarkupExtension,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "[ConstructorArgument] must name the constructor parameter the property is assigned from.",
};

pub static WPF0084: RuleDescriptor = RuleDescriptor {
    id: "WPF0084",
    name: "xaml_set_markup_extension_target",
    title: "Target of [XamlSetMarkupExtension] should exist and have correct signature.",
    message_format: "Expected a method with signature void ReceiveMarkupExtension(object, XamlSetMarkupExtensionEventArgs).",
    category: Category::MarkupExtension,
    default_severity: Severity::Error,
    enabled_by_default: true,
    description: "Target of [XamlSetMarkupExtension] should exist and have correct signature.",
};

pub static WPF0085: RuleDescriptor = RuleDescriptor {
    id: "WPF0085",
    name: "xaml_set_type_converter_target",
    title: "Target of [XamlSetTypeConverter] should exist and have correct signature.",
    message_format: "Expected a method with signature void ReceiveTypeConverter(object, XamlSetTypeConverterEventArgs).",
    category: Category::MarkupExtension,
    default_severity: Severity::Error,
    enabled_by_default: true,
    description: "Target of [XamlSetTypeConverter] should exist and have correct signature.",
};

pub static WPF0120: RuleDescriptor = RuleDescriptor {
    id: "WPF0120",
    name: "routed_command_name",
    title: "Register containing member name as name for routed command.",
    message_format: "Register {0} as name.",
    category: Category::RoutedCommand,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "Register containing member name as name for routed command.",
};

pub static WPF0121: RuleDescriptor = RuleDescriptor {
    id: "WPF0121",
    name: "routed_command_owner",
    title: "Register containing type as owner for routed command.",
    message_format: "Register {0} as owner.",
    category: Category::RoutedCommand,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "Register containing type as owner for routed command.",
};

pub static WPF0132: RuleDescriptor = RuleDescriptor {
    id: "WPF0132",
    name: "template_part_prefix",
    title: "Use PART prefix.",
    message_format: "Use 'PART_' prefix for template part {0}.",
    category: Category::ControlTemplate,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "Template part names should start with 'PART_'.",
};

pub static WPF0140: RuleDescriptor = RuleDescriptor {
    id: "WPF0140",
    name: "component_resource_key_type",
    title: "Use containing type when creating a ComponentResourceKey.",
    message_format: "Use containing type: {0}.",
    category: Category::ComponentResourceKey,
    default_severity: Severity::Error,
    enabled_by_default: true,
    description: "Use containing type when creating a ComponentResourceKey.",
};

pub static WPF0141: RuleDescriptor = RuleDescriptor {
    id: "WPF0141",
    name: "component_resource_key_member",
    title: "Use containing member as key.",
    message_format: "Use containing member: {0}.",
    category: Category::ComponentResourceKey,
    default_severity: Severity::Warning,
    enabled_by_default: true,
    description: "Use containing member as resource id when creating a ComponentResourceKey.",
};

static CATALOG: LazyLock<Vec<&'static RuleDescriptor>> = LazyLock::new(|| {
    let mut catalog = vec![
        &WPF0001, &WPF0002, &WPF0003, &WPF0004, &WPF0010, &WPF0011, &WPF0012, &WPF0013,
        &WPF0016, &WPF0030, &WPF0031, &WPF0032, &WPF0033, &WPF0034, &WPF0035, &WPF0036,
        &WPF0042, &WPF0051, &WPF0060, &WPF0061, &WPF0070, &WPF0071, &WPF0072, &WPF0073,
        &WPF0074, &WPF0081, &WPF0082, &WPF0084, &WPF0085, &WPF0120, &WPF0121, &WPF0132,
        &WPF0140, &WPF0141,
    ];
    catalog.sort_by_key(|descriptor| descriptor.id);
    catalog
});

/// Descriptors indexed by both id and name.
static BY_KEY: LazyLock<HashMap<&'static str, &'static RuleDescriptor>> = LazyLock::new(|| {
    CATALOG
        .iter()
        .flat_map(|&descriptor| [(descriptor.id, descriptor), (descriptor.name, descriptor)])
        .collect()
});

/// All descriptors, ordered by id.
#[must_use]
pub fn all() -> &'static [&'static RuleDescriptor] {
    &CATALOG
}

/// Looks a descriptor up by id (`WPF0001`) or name (`backing_field_matches_registered_name`).
#[must_use]
pub fn find(key: &str) -> Option<&'static RuleDescriptor> {
    BY_KEY.get(key).copied()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_ids_and_names_are_unique() {
        let ids: HashSet<_> = all().iter().map(|d| d.id).collect();
        let names: HashSet<_> = all().iter().map(|d| d.name).collect();
        assert_eq!(ids.len(), all().len());
        assert_eq!(names.len(), all().len());
    }

    #[test]
    fn test_catalog_is_sorted_by_id() {
        let ids: Vec<_> = all().iter().map(|d| d.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_find_by_id_or_name() {
        assert_eq!(find("WPF0031"), Some(&WPF0031));
        assert_eq!(find("key_field_declared_first"), Some(&WPF0031));
        assert_eq!(find("WPF9999"), None);
    }

    #[test]
    fn test_format_message_substitutes_repeated_placeholders() {
        let message = WPF0001.format_message(&["BazProperty".to_owned(), "Bar".to_owned()]);
        insta::assert_snapshot!(message, @"Field 'BazProperty' that is backing field for the DependencyProperty registered as 'Bar' must be named 'BarProperty'");
    }

    #[test]
    fn test_format_message_keeps_unmatched_placeholders() {
        assert_eq!(WPF0013.format_message(&["Return type".to_owned()]), "Return type must match registered type {1}");
        assert_eq!(WPF0035.format_message(&[]), "Use SetValue in setter.");
    }

    #[test]
    fn test_disabled_rule_defaults_to_off() {
        assert_eq!(WPF0073.default_rule_severity(), RuleSeverity::Off);
        assert_eq!(WPF0070.default_rule_severity(), RuleSeverity::Off);
        assert_eq!(WPF0051.default_rule_severity(), RuleSeverity::Error);
        assert_eq!(WPF0010.default_rule_severity(), RuleSeverity::Error);
        assert_eq!(WPF0001.default_rule_severity(), RuleSeverity::Warn);
    }

    #[test]
    fn test_help_url_uses_id() {
        assert!(WPF0140.help_url().ends_with("/WPF0140.md"));
    }
}
