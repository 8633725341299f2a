//! Integration tests for the analysis driver
//!
//! These tests run every registered analyzer over fixture sources through
//! the public API, the way a host would.

use wpf_hir::SemanticModel;
use wpf_linter::{keys, Analyzer, LintConfig, LintDiagnostic, NodeContext};
use wpf_syntax::{visit_nodes, NodeKind};
use wpf_test_utils::{format_diagnostics, init_tracing, Fixture};
use wpf_types::{CancellationToken, Cancelled};

fn analyze(fixture: &Fixture) -> Vec<LintDiagnostic> {
    init_tracing();
    Analyzer::new(LintConfig::recommended())
        .analyze_tree(&fixture.model(0), &CancellationToken::new())
        .unwrap()
}

fn ids(diagnostics: &[LintDiagnostic]) -> Vec<&'static str> {
    diagnostics.iter().map(|d| d.rule_id).collect()
}

#[test]
fn test_matching_backing_field_name_passes() {
    let fixture = Fixture::new(
        r#"
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    /// <summary>Identifies the <see cref="Bar"/> dependency property.</summary>
    public static readonly DependencyProperty BarProperty = DependencyProperty.Register(
        "Bar", typeof(int), typeof(FooControl), new PropertyMetadata(default(int)));

    public int Bar
    {
        get => (int)this.GetValue(BarProperty);
        set => this.SetValue(BarProperty, value);
    }
}"#,
    );
    let diagnostics = analyze(&fixture);
    assert!(diagnostics.is_empty(), "{}", format_diagnostics(&diagnostics));
}

#[test]
fn test_renamed_backing_field_proposes_registered_name() {
    let fixture = Fixture::new(
        r#"
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    /// <summary>Identifies the <see cref="Bar"/> dependency property.</summary>
    public static readonly DependencyProperty ↓BazProperty = DependencyProperty.Register(
        "Bar", typeof(int), typeof(FooControl), new PropertyMetadata(default(int)));

    public int Bar
    {
        get => (int)this.GetValue(BazProperty);
        set => this.SetValue(BazProperty, value);
    }
}"#,
    );
    let diagnostics = analyze(&fixture);
    insta::assert_snapshot!(format_diagnostics(&diagnostics), @"[1] warning[WPF0001] Field 'BazProperty' that is backing field for the DependencyProperty registered as 'Bar' must be named 'BarProperty'");
    assert_eq!(diagnostics[0].range().start, fixture.markers(0)[0]);
    assert_eq!(diagnostics[0].property(keys::EXPECTED_NAME), Some("BarProperty"));
}

#[test]
fn test_side_effect_in_setter_is_reported_at_statement() {
    let source = r#"
using System;
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    /// <summary>Identifies the <see cref="Bar"/> dependency property.</summary>
    public static readonly DependencyProperty BarProperty = DependencyProperty.Register(
        nameof(Bar), typeof(int), typeof(FooControl), new PropertyMetadata(default(int)));

    public int Bar
    {
        get { return (int)this.GetValue(BarProperty); }
        set
        {
            this.SetValue(BarProperty, value);
            ↓this.Log();
        }
    }

    private void Log()
    {
        Console.WriteLine("Bar changed");
    }
}"#;
    let fixture = Fixture::new(source);
    let diagnostics = analyze(&fixture);
    assert_eq!(ids(&diagnostics), ["WPF0036"]);
    let range = diagnostics[0].range();
    assert_eq!(range.start, fixture.markers(0)[0]);
    assert_eq!(fixture.tree(0).text_of(range), "this.Log();");
}

#[test]
fn test_key_declared_after_public_field() {
    let fixture = Fixture::new(
        r#"
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    /// <summary>Identifies the <see cref="Bar"/> dependency property.</summary>
    public static readonly DependencyProperty BarProperty = BarPropertyKey.DependencyProperty;

    ↓private static readonly DependencyPropertyKey BarPropertyKey = DependencyProperty.RegisterReadOnly(
        nameof(Bar), typeof(int), typeof(FooControl), new PropertyMetadata(default(int)));

    public int Bar
    {
        get => (int)this.GetValue(BarProperty);
        private set => this.SetValue(BarPropertyKey, value);
    }
}"#,
    );
    let diagnostics = analyze(&fixture);
    insta::assert_snapshot!(format_diagnostics(&diagnostics), @"[1] warning[WPF0031] Field 'BarPropertyKey' must be declared before 'BarProperty'");
    assert_eq!(diagnostics[0].range().start, fixture.markers(0)[0]);
}

#[test]
fn test_backing_field_name_must_match_exactly() {
    let fixture = Fixture::new(
        r#"
using System.Windows;

public static class Foo
{
    public static readonly DependencyProperty ↓BarPropertyX = DependencyProperty.RegisterAttached(
        "Bar", typeof(int), typeof(Foo), new PropertyMetadata(0));

    public static readonly DependencyProperty ↓bazProperty = DependencyProperty.RegisterAttached(
        "Baz", typeof(int), typeof(Foo), new PropertyMetadata(0));

    public static readonly DependencyProperty ↓Meh = DependencyProperty.RegisterAttached(
        "Meh", typeof(int), typeof(Foo), new PropertyMetadata(0));

    public static readonly DependencyProperty QuxProperty = DependencyProperty.RegisterAttached(
        "Qux", typeof(int), typeof(Foo), new PropertyMetadata(0));
}"#,
    );
    let diagnostics = analyze(&fixture);
    assert_eq!(ids(&diagnostics), ["WPF0001", "WPF0001", "WPF0001"]);
    let starts: Vec<_> = diagnostics.iter().map(|d| d.range().start).collect();
    assert_eq!(starts, fixture.markers(0));
    let expected: Vec<_> = diagnostics
        .iter()
        .filter_map(|d| d.property(keys::EXPECTED_NAME))
        .collect();
    assert_eq!(expected, ["BarProperty", "BazProperty", "MehProperty"]);
}

#[test]
fn test_non_constant_registered_name_is_not_reported() {
    let fixture = Fixture::new(
        r#"
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    private static readonly string Name = "Bar";

    private static readonly DependencyProperty ErrorProperty = DependencyProperty.Register(
        Name.ToString(), typeof(int), typeof(FooControl), new PropertyMetadata(default(int)));
}"#,
    );
    let diagnostics = analyze(&fixture);
    assert!(diagnostics.is_empty(), "{}", format_diagnostics(&diagnostics));
}

#[test]
fn test_node_order_does_not_change_results() {
    let fixture = Fixture::new(
        r#"
using System;
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    public static readonly DependencyProperty ErrorProperty = DependencyProperty.Register(
        nameof(Bar), typeof(int), typeof(Button), new PropertyMetadata(1.0));

    public static readonly DependencyProperty BazProperty = BazPropertyKey.DependencyProperty;

    private static readonly DependencyPropertyKey BazPropertyKey = DependencyProperty.RegisterReadOnly(
        nameof(Baz), typeof(string), typeof(FooControl), new PropertyMetadata(null));

    public double Bar
    {
        get => (double)this.GetValue(ErrorProperty);
        set
        {
            this.SetValue(ErrorProperty, value);
            Console.WriteLine(value);
        }
    }

    public string Baz
    {
        get => (string)this.GetValue(BazProperty);
        private set => this.SetValue(BazPropertyKey, value);
    }
}"#,
    );
    let model = fixture.model(0);
    let token = CancellationToken::new();
    let analyzer = Analyzer::default();

    let parallel = analyzer.analyze_tree(&model, &token).unwrap();
    assert!(parallel.len() > 3, "{}", format_diagnostics(&parallel));

    let mut reversed: Vec<LintDiagnostic> = visit_nodes(model.tree())
        .into_iter()
        .rev()
        .map(|visit| analyzer.analyze_node(&NodeContext::new(visit, &model, &token)))
        .collect::<Result<Vec<_>, Cancelled>>()
        .unwrap()
        .into_iter()
        .flatten()
        .collect();
    reversed.sort_by_key(|d| (d.range().start, d.range().end, d.rule_id, d.message.clone()));
    assert_eq!(reversed, parallel);

    for _ in 0..4 {
        assert_eq!(analyzer.analyze_tree(&model, &token).unwrap(), parallel);
    }
}

#[test]
fn test_cancellation_discards_diagnostics() {
    let fixture = Fixture::new(
        r#"
using System.Windows;
using System.Windows.Controls;

public class FooControl : Control
{
    public static readonly DependencyProperty ErrorProperty = DependencyProperty.Register(
        "Bar", typeof(int), typeof(FooControl));
}"#,
    );
    let model = fixture.model(0);
    let token = CancellationToken::new();
    let analyzer = Analyzer::default();
    assert_eq!(ids(&analyzer.analyze_tree(&model, &token).unwrap()), ["WPF0001"]);

    token.cancel();
    assert_eq!(analyzer.analyze_tree(&model, &token), Err(Cancelled));
    let field = visit_nodes(model.tree())
        .into_iter()
        .find(|visit| visit.node.kind() == NodeKind::FieldDeclaration)
        .unwrap();
    assert_eq!(
        analyzer.analyze_node(&NodeContext::new(field, &model, &token)),
        Err(Cancelled)
    );
}
