//! Declaration-only stubs of the framework types fixtures compile against.
//!
//! The stubs are parsed with the fixture parser and bound before the fixture
//! sources. Bodies are omitted, so framework symbols have no declarations.

pub(crate) const FRAMEWORK_SOURCE: &str = r"
using System;
using System.Collections;
using System.Collections.Generic;
using System.Globalization;
using System.Windows;
using System.Windows.Controls;
using System.Windows.Input;
using System.Windows.Markup;

namespace System
{
    public class Object
    {
        public virtual bool Equals(object obj);
        public virtual int GetHashCode();
        public virtual string ToString();
        public Type GetType();
    }

    public abstract class ValueType { }
    public struct Void { }
    public struct Boolean { }
    public struct Char { }
    public struct Byte { }
    public struct Int16 { }
    public struct Int32 { public const int MaxValue = 2147483647; }
    public struct Int64 { }
    public struct Single { }
    public struct Double { public static readonly double NaN; }
    public struct Decimal { }

    public struct Nullable<T> where T : struct
    {
        public bool HasValue { get; }
        public T Value { get; }
    }

    public sealed class String
    {
        public static readonly string Empty;
        public int Length { get; }
        public static bool IsNullOrEmpty(string value);
    }

    public abstract class Type
    {
        public string Name { get; }
    }

    public abstract class Array
    {
        public int Length { get; }
    }

    public abstract class Attribute { }
    public class EventArgs { }
    public class Exception
    {
        public Exception();
        public Exception(string message);
    }
    public class ArgumentException : Exception
    {
        public ArgumentException();
        public ArgumentException(string message);
    }
    public class InvalidOperationException : Exception
    {
        public InvalidOperationException();
        public InvalidOperationException(string message);
    }
    public class NotSupportedException : Exception
    {
        public NotSupportedException();
        public NotSupportedException(string message);
    }
    public class NotImplementedException : Exception
    {
        public NotImplementedException();
        public NotImplementedException(string message);
    }

    public interface IServiceProvider
    {
        object GetService(Type serviceType);
    }

    public static class Console
    {
        public static void WriteLine(string value);
    }
}

namespace System.Collections
{
    public interface IEnumerable { }
    public interface IList : IEnumerable { }
}

namespace System.Collections.Generic
{
    public interface IEnumerable<T> : IEnumerable { }
    public interface IList<T> : IEnumerable<T> { }
    public class List<T> : IList<T>, IList
    {
        public List();
        public void Add(T item);
    }
}

namespace System.Collections.ObjectModel
{
    public class ObservableCollection<T> : IList<T>, IList
    {
        public ObservableCollection();
    }
}

namespace System.Globalization
{
    public class CultureInfo
    {
        public static CultureInfo InvariantCulture { get; }
        public static CultureInfo CurrentCulture { get; }
    }
}

namespace System.Windows
{
    public class DependencyObject
    {
        public object GetValue(DependencyProperty dp);
        public void SetValue(DependencyProperty dp, object value);
        public void SetValue(DependencyPropertyKey key, object value);
        public void SetCurrentValue(DependencyProperty dp, object value);
        public void ClearValue(DependencyProperty dp);
    }

    public sealed class DependencyProperty
    {
        public static readonly object UnsetValue;
        public string Name { get; }
        public Type PropertyType { get; }
        public Type OwnerType { get; }

        public static DependencyProperty Register(string name, Type propertyType, Type ownerType);
        public static DependencyProperty Register(string name, Type propertyType, Type ownerType, PropertyMetadata typeMetadata);
        public static DependencyProperty Register(string name, Type propertyType, Type ownerType, PropertyMetadata typeMetadata, ValidateValueCallback validateValueCallback);
        public static DependencyPropertyKey RegisterReadOnly(string name, Type propertyType, Type ownerType, PropertyMetadata typeMetadata);
        public static DependencyPropertyKey RegisterReadOnly(string name, Type propertyType, Type ownerType, PropertyMetadata typeMetadata, ValidateValueCallback validateValueCallback);
        public static DependencyProperty RegisterAttached(string name, Type propertyType, Type ownerType);
        public static DependencyProperty RegisterAttached(string name, Type propertyType, Type ownerType, PropertyMetadata defaultMetadata);
        public static DependencyProperty RegisterAttached(string name, Type propertyType, Type ownerType, PropertyMetadata defaultMetadata, ValidateValueCallback validateValueCallback);
        public static DependencyPropertyKey RegisterAttachedReadOnly(string name, Type propertyType, Type ownerType, PropertyMetadata defaultMetadata);
        public static DependencyPropertyKey RegisterAttachedReadOnly(string name, Type propertyType, Type ownerType, PropertyMetadata defaultMetadata, ValidateValueCallback validateValueCallback);
        public DependencyProperty AddOwner(Type ownerType);
        public DependencyProperty AddOwner(Type ownerType, PropertyMetadata typeMetadata);
    }

    public sealed class DependencyPropertyKey
    {
        public DependencyProperty DependencyProperty { get; }
    }

    public class DependencyPropertyChangedEventArgs { }
    public class PropertyChangedCallback { }
    public class CoerceValueCallback { }
    public class ValidateValueCallback { }

    public class PropertyMetadata
    {
        public PropertyMetadata();
        public PropertyMetadata(object defaultValue);
        public PropertyMetadata(PropertyChangedCallback propertyChangedCallback);
        public PropertyMetadata(object defaultValue, PropertyChangedCallback propertyChangedCallback);
        public PropertyMetadata(object defaultValue, PropertyChangedCallback propertyChangedCallback, CoerceValueCallback coerceValueCallback);
        public object DefaultValue { get; set; }
    }

    public class UIPropertyMetadata : PropertyMetadata
    {
        public UIPropertyMetadata();
        public UIPropertyMetadata(object defaultValue);
        public UIPropertyMetadata(object defaultValue, PropertyChangedCallback propertyChangedCallback);
    }

    public struct FrameworkPropertyMetadataOptions
    {
        public static readonly FrameworkPropertyMetadataOptions None;
        public static readonly FrameworkPropertyMetadataOptions AffectsMeasure;
        public static readonly FrameworkPropertyMetadataOptions AffectsArrange;
        public static readonly FrameworkPropertyMetadataOptions AffectsRender;
        public static readonly FrameworkPropertyMetadataOptions Inherits;
        public static readonly FrameworkPropertyMetadataOptions BindsTwoWayByDefault;
    }

    public class FrameworkPropertyMetadata : UIPropertyMetadata
    {
        public FrameworkPropertyMetadata();
        public FrameworkPropertyMetadata(object defaultValue);
        public FrameworkPropertyMetadata(object defaultValue, PropertyChangedCallback propertyChangedCallback);
        public FrameworkPropertyMetadata(object defaultValue, FrameworkPropertyMetadataOptions flags);
        public FrameworkPropertyMetadata(object defaultValue, FrameworkPropertyMetadataOptions flags, PropertyChangedCallback propertyChangedCallback);
    }

    public struct Visibility
    {
        public static readonly Visibility Visible;
        public static readonly Visibility Hidden;
        public static readonly Visibility Collapsed;
    }

    public abstract class Freezable : DependencyObject { }
    public abstract class Visual : DependencyObject { }
    public class UIElement : Visual { }
    public class FrameworkElement : UIElement
    {
        public object DataContext { get; set; }
    }

    public abstract class ResourceKey { }

    public class ComponentResourceKey : ResourceKey
    {
        public ComponentResourceKey();
        public ComponentResourceKey(Type typeInTargetAssembly, object resourceId);
        public Type TypeInTargetAssembly { get; set; }
        public object ResourceId { get; set; }
    }

    public sealed class TemplatePartAttribute : Attribute
    {
        public TemplatePartAttribute();
        public string Name { get; set; }
        public Type Type { get; set; }
    }

    public sealed class AttachedPropertyBrowsableForTypeAttribute : Attribute
    {
        public AttachedPropertyBrowsableForTypeAttribute(Type targetType);
        public Type TargetType { get; }
    }
}

namespace System.Windows.Controls
{
    public class Control : FrameworkElement { }
    public class ContentControl : Control { }
    public class Button : ContentControl { }
    public class TextBox : Control { }
    public class UserControl : ContentControl { }
    public class Panel : FrameworkElement { }
}

namespace System.Windows.Data
{
    public interface IValueConverter
    {
        object Convert(object value, Type targetType, object parameter, CultureInfo culture);
        object ConvertBack(object value, Type targetType, object parameter, CultureInfo culture);
    }

    public interface IMultiValueConverter
    {
        object Convert(object[] values, Type targetType, object parameter, CultureInfo culture);
        object[] ConvertBack(object value, Type[] targetTypes, object parameter, CultureInfo culture);
    }

    public sealed class ValueConversionAttribute : Attribute
    {
        public ValueConversionAttribute(Type sourceType, Type targetType);
        public Type SourceType { get; }
        public Type TargetType { get; }
        public Type ParameterType { get; set; }
    }

    public class Binding
    {
        public static readonly object DoNothing;
    }
}

namespace System.Windows.Markup
{
    public abstract class MarkupExtension
    {
        public abstract object ProvideValue(IServiceProvider serviceProvider);
    }

    public sealed class MarkupExtensionReturnTypeAttribute : Attribute
    {
        public MarkupExtensionReturnTypeAttribute();
        public MarkupExtensionReturnTypeAttribute(Type returnType);
        public Type ReturnType { get; }
    }

    public sealed class ConstructorArgumentAttribute : Attribute
    {
        public ConstructorArgumentAttribute(string argumentName);
        public string ArgumentName { get; }
    }

    public sealed class XamlSetMarkupExtensionAttribute : Attribute
    {
        public XamlSetMarkupExtensionAttribute(string xamlSetMarkupExtensionHandler);
        public string XamlSetMarkupExtensionHandler { get; }
    }

    public sealed class XamlSetTypeConverterAttribute : Attribute
    {
        public XamlSetTypeConverterAttribute(string xamlSetTypeConverterHandler);
        public string XamlSetTypeConverterHandler { get; }
    }

    public class XamlSetMarkupExtensionEventArgs : EventArgs { }
    public class XamlSetTypeConverterEventArgs : EventArgs { }

    public sealed class XmlnsDefinitionAttribute : Attribute
    {
        public XmlnsDefinitionAttribute(string xmlNamespace, string clrNamespace);
        public string XmlNamespace { get; }
        public string ClrNamespace { get; }
        public string AssemblyName { get; set; }
    }
}

namespace System.Windows.Input
{
    public interface ICommand { }

    public class RoutedCommand : ICommand
    {
        public RoutedCommand();
        public RoutedCommand(string name, Type ownerType);
        public string Name { get; }
        public Type OwnerType { get; }
    }

    public class RoutedUICommand : RoutedCommand
    {
        public RoutedUICommand();
        public RoutedUICommand(string text, string name, Type ownerType);
        public string Text { get; set; }
    }
}
";
