//! # WPF Analyzer Test Utilities
//!
//! An in-memory analysis host for the analyzer crates. Fixtures are written
//! as C# source, parsed by a small recursive-descent parser, bound against
//! declaration stubs of the WPF framework and exposed through
//! [`wpf_hir::SemanticModel`].

// Test utilities are less strict than production code
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::too_many_lines)]
//!
//! ## Quick Start
//!
//! ```ignore
//! use wpf_test_utils::Fixture;
//!
//! let fixture = Fixture::new(r#"
//! public class FooControl : Control
//! {
//!     public static readonly DependencyProperty ↓BarProperty = ...;
//! }"#);
//! let model = fixture.model(0);
//! ```
//!
//! ## Modules
//!
//! - [`fixture`] - Parsed and bound fixture projects
//! - [`markers`] - `↓` position markers in fixture sources
//! - [`assertions`] - Snapshot formatting helpers

pub mod assertions;
mod binder;
pub mod fixture;
mod framework;
mod lexer;
pub mod markers;
mod parser;

pub use assertions::{format_diagnostic_messages, format_diagnostics, insert_markers};
pub use fixture::{Fixture, FixtureModel};
pub use markers::{strip_markers, MARKER};
pub use parser::parse;

use thiserror::Error;

/// A fixture source outside the supported C# subset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// Installs a test-writer tracing subscriber once per process.
///
/// Filtering follows `RUST_LOG` and is off by default.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
