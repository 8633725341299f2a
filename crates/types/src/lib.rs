//! Foundation types for the WPF analyzer.
//!
//! This crate provides shared types used across the analyzer crates.
//!
//! # Type Categories
//!
//! - **File types**: [`FileId`]
//! - **Position types**: [`OffsetRange`], [`Location`], [`LineCol`]
//! - **Severity types**: [`Severity`], [`RuleSeverity`]
//! - **Edit types**: [`TextEdit`], [`CodeFix`], [`apply_edits`]
//! - **Cancellation**: [`CancellationToken`], [`Cancelled`]

mod cancel;
mod edits;
mod position;
mod severity;

pub use cancel::{CancellationToken, Cancelled};
pub use edits::{apply_edits, CodeFix, EditError, TextEdit};
pub use position::{FileId, LineCol, Location, OffsetRange};
pub use severity::{RuleSeverity, Severity};
