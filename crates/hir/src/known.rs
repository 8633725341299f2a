//! Well-known framework types and members.
//!
//! Analyzers never compare symbols by display string. Instead the static
//! tables below map fully qualified names to tags, resolved once per
//! compilation and looked up by [`SymbolId`].

use std::collections::HashMap;

use crate::compilation::Compilation;
use crate::symbols::{Symbol, SymbolId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownType {
    Object,
    String,
    Void,
    Type,
    Boolean,
    Int32,
    Double,
    Nullable,
    Array,
    DependencyObject,
    DependencyProperty,
    DependencyPropertyKey,
    PropertyMetadata,
    ComponentResourceKey,
    TemplatePartAttribute,
    AttachedPropertyBrowsableForTypeAttribute,
    IValueConverter,
    IMultiValueConverter,
    ValueConversionAttribute,
    MarkupExtension,
    MarkupExtensionReturnTypeAttribute,
    ConstructorArgumentAttribute,
    XamlSetMarkupExtensionAttribute,
    XamlSetTypeConverterAttribute,
    XamlSetMarkupExtensionEventArgs,
    XamlSetTypeConverterEventArgs,
    XmlnsDefinitionAttribute,
    RoutedCommand,
    RoutedUICommand,
}

impl KnownType {
    pub const ALL: &'static [KnownType] = &[
        Self::Object,
        Self::String,
        Self::Void,
        Self::Type,
        Self::Boolean,
        Self::Int32,
        Self::Double,
        Self::Nullable,
        Self::Array,
        Self::DependencyObject,
        Self::DependencyProperty,
        Self::DependencyPropertyKey,
        Self::PropertyMetadata,
        Self::ComponentResourceKey,
        Self::TemplatePartAttribute,
        Self::AttachedPropertyBrowsableForTypeAttribute,
        Self::IValueConverter,
        Self::IMultiValueConverter,
        Self::ValueConversionAttribute,
        Self::MarkupExtension,
        Self::MarkupExtensionReturnTypeAttribute,
        Self::ConstructorArgumentAttribute,
        Self::XamlSetMarkupExtensionAttribute,
        Self::XamlSetTypeConverterAttribute,
        Self::XamlSetMarkupExtensionEventArgs,
        Self::XamlSetTypeConverterEventArgs,
        Self::XmlnsDefinitionAttribute,
        Self::RoutedCommand,
        Self::RoutedUICommand,
    ];

    #[must_use]
    pub const fn metadata_name(self) -> &'static str {
        match self {
            Self::Object => "System.Object",
            Self::String => "System.String",
            Self::Void => "System.Void",
            Self::Type => "System.Type",
            Self::Boolean => "System.Boolean",
            Self::Int32 => "System.Int32",
            Self::Double => "System.Double",
            Self::Nullable => "System.Nullable`1",
            Self::Array => "System.Array",
            Self::DependencyObject => "System.Windows.DependencyObject",
            Self::DependencyProperty => "System.Windows.DependencyProperty",
            Self::DependencyPropertyKey => "System.Windows.DependencyPropertyKey",
            Self::PropertyMetadata => "System.Windows.PropertyMetadata",
            Self::ComponentResourceKey => "System.Windows.ComponentResourceKey",
            Self::TemplatePartAttribute => "System.Windows.TemplatePartAttribute",
            Self::AttachedPropertyBrowsableForTypeAttribute => {
                "System.Windows.AttachedPropertyBrowsableForTypeAttribute"
            }
            Self::IValueConverter => "System.Windows.Data.IValueConverter",
            Self::IMultiValueConverter => "System.Windows.Data.IMultiValueConverter",
            Self::ValueConversionAttribute => "System.Windows.Data.ValueConversionAttribute",
            Self::MarkupExtension => "System.Windows.Markup.MarkupExtension",
            Self::MarkupExtensionReturnTypeAttribute => {
                "System.Windows.Markup.MarkupExtensionReturnTypeAttribute"
            }
            Self::ConstructorArgumentAttribute => {
                "System.Windows.Markup.ConstructorArgumentAttribute"
            }
            Self::XamlSetMarkupExtensionAttribute => {
                "System.Windows.Markup.XamlSetMarkupExtensionAttribute"
            }
            Self::XamlSetTypeConverterAttribute => {
                "System.Windows.Markup.XamlSetTypeConverterAttribute"
            }
            Self::XamlSetMarkupExtensionEventArgs => {
                "System.Windows.Markup.XamlSetMarkupExtensionEventArgs"
            }
            Self::XamlSetTypeConverterEventArgs => {
                "System.Windows.Markup.XamlSetTypeConverterEventArgs"
            }
            Self::XmlnsDefinitionAttribute => "System.Windows.Markup.XmlnsDefinitionAttribute",
            Self::RoutedCommand => "System.Windows.Input.RoutedCommand",
            Self::RoutedUICommand => "System.Windows.Input.RoutedUICommand",
        }
    }
}

/// Framework members the analyzers care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownMember {
    Register,
    RegisterReadOnly,
    RegisterAttached,
    RegisterAttachedReadOnly,
    AddOwner,
    UnsetValue,
    /// `DependencyPropertyKey.DependencyProperty`
    KeyDependencyProperty,
    GetValue,
    SetValue,
    SetCurrentValue,
}

impl KnownMember {
    pub const ALL: &'static [KnownMember] = &[
        Self::Register,
        Self::RegisterReadOnly,
        Self::RegisterAttached,
        Self::RegisterAttachedReadOnly,
        Self::AddOwner,
        Self::UnsetValue,
        Self::KeyDependencyProperty,
        Self::GetValue,
        Self::SetValue,
        Self::SetCurrentValue,
    ];

    #[must_use]
    pub const fn containing_type(self) -> KnownType {
        match self {
            Self::Register
            | Self::RegisterReadOnly
            | Self::RegisterAttached
            | Self::RegisterAttachedReadOnly
            | Self::AddOwner
            | Self::UnsetValue => KnownType::DependencyProperty,
            Self::KeyDependencyProperty => KnownType::DependencyPropertyKey,
            Self::GetValue | Self::SetValue | Self::SetCurrentValue => KnownType::DependencyObject,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Register => "Register",
            Self::RegisterReadOnly => "RegisterReadOnly",
            Self::RegisterAttached => "RegisterAttached",
            Self::RegisterAttachedReadOnly => "RegisterAttachedReadOnly",
            Self::AddOwner => "AddOwner",
            Self::UnsetValue => "UnsetValue",
            Self::KeyDependencyProperty => "DependencyProperty",
            Self::GetValue => "GetValue",
            Self::SetValue => "SetValue",
            Self::SetCurrentValue => "SetCurrentValue",
        }
    }
}

/// Known symbols of one compilation.
#[derive(Debug, Default)]
pub struct KnownSymbols {
    types: HashMap<KnownType, SymbolId>,
    by_symbol: HashMap<SymbolId, KnownType>,
    members: HashMap<SymbolId, KnownMember>,
}

impl KnownSymbols {
    pub(crate) fn resolve(compilation: &Compilation) -> Self {
        let mut known = Self::default();
        for &tag in KnownType::ALL {
            if let Some(id) = compilation.type_by_metadata_name(tag.metadata_name()) {
                known.types.insert(tag, id);
                known.by_symbol.insert(id, tag);
            }
        }
        for &member in KnownMember::ALL {
            let Some(&owner) = known.types.get(&member.containing_type()) else {
                continue;
            };
            for id in compilation.members_named(owner, member.name()) {
                if matches!(
                    compilation.symbol(id),
                    Symbol::Method(_) | Symbol::Field(_) | Symbol::Property(_)
                ) {
                    known.members.insert(id, member);
                }
            }
        }
        tracing::trace!(
            types = known.types.len(),
            members = known.members.len(),
            "resolved known symbols"
        );
        known
    }

    #[must_use]
    pub fn get(&self, tag: KnownType) -> Option<SymbolId> {
        self.types.get(&tag).copied()
    }

    /// Tag of a type symbol; constructed generics report their definition's tag.
    #[must_use]
    pub fn classify(&self, compilation: &Compilation, ty: SymbolId) -> Option<KnownType> {
        self.by_symbol.get(&compilation.definition(ty)).copied()
    }

    #[must_use]
    pub fn is(&self, compilation: &Compilation, ty: SymbolId, tag: KnownType) -> bool {
        self.classify(compilation, ty) == Some(tag)
    }

    #[must_use]
    pub fn member(&self, symbol: SymbolId) -> Option<KnownMember> {
        self.members.get(&symbol).copied()
    }
}
