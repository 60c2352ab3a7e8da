//! Diagnostic Infrastructure
//!
//! Collects translation errors and warnings keyed by AST spans. Nothing in
//! the translator aborts on the first failure: every component reports into
//! a `DiagnosticBag` and falls back to a conservative default, so a single
//! run surfaces as many issues as possible.
//!
//! # Components
//!
//! - `Diagnostic` - A single diagnostic message with location and severity
//! - `DiagnosticBag` - A collection of diagnostics for one translation unit
//! - `ErrorCode` - The closed set of translator error kinds

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Severity
// =============================================================================

/// The severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A warning; translation output is still usable.
    Warning = 2,
    /// An error; the offending node fell back to default emission.
    Error = 1,
}

impl Severity {
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// Error Codes
// =============================================================================

/// The closed set of error kinds the translator reports.
///
/// Each kind has a stable numeric code (rendered as `TD<code>`) so test
/// assertions and downstream tooling can match on kind rather than message
/// text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// A textually matching identifier has no static type information; the
    /// user must add a type annotation before the call can be translated.
    UnresolvedCandidateSymbol,
    /// A symbol has neither a value declaration nor any declaration at all;
    /// the node is left untranslated.
    NoDeclarationForSymbol,
    /// A symbol used to define a named-parameter shape is not a plain
    /// property declaration or signature.
    InvalidPropertyForNamedParameter,
    /// A multi-declarator variable list carries an explicit type.
    MalformedVariableDeclarationList,
    /// Enums without members have no target-language analogue.
    EmptyEnumUnsupported,
    /// `const enum` has no target-language analogue.
    ConstEnumUnsupported,
    /// `protected` visibility has no target-language analogue.
    ProtectedVisibilityUnsupported,
    /// A private modifier and a private-by-convention name disagree.
    NamingConventionMismatch,
    /// A named-parameter field has both an inline and an outer default.
    AmbiguousInitializer,
    /// Rest parameters have no positional translation.
    UnsupportedRestParameter,
}

impl ErrorCode {
    /// Stable numeric code for this kind.
    pub fn code(&self) -> u32 {
        match self {
            ErrorCode::UnresolvedCandidateSymbol => 1001,
            ErrorCode::NoDeclarationForSymbol => 1002,
            ErrorCode::InvalidPropertyForNamedParameter => 1003,
            ErrorCode::MalformedVariableDeclarationList => 1004,
            ErrorCode::EmptyEnumUnsupported => 1005,
            ErrorCode::ConstEnumUnsupported => 1006,
            ErrorCode::ProtectedVisibilityUnsupported => 1007,
            ErrorCode::NamingConventionMismatch => 1008,
            ErrorCode::AmbiguousInitializer => 1009,
            ErrorCode::UnsupportedRestParameter => 1010,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::UnresolvedCandidateSymbol => "UnresolvedCandidateSymbol",
            ErrorCode::NoDeclarationForSymbol => "NoDeclarationForSymbol",
            ErrorCode::InvalidPropertyForNamedParameter => "InvalidPropertyForNamedParameter",
            ErrorCode::MalformedVariableDeclarationList => "MalformedVariableDeclarationList",
            ErrorCode::EmptyEnumUnsupported => "EmptyEnumUnsupported",
            ErrorCode::ConstEnumUnsupported => "ConstEnumUnsupported",
            ErrorCode::ProtectedVisibilityUnsupported => "ProtectedVisibilityUnsupported",
            ErrorCode::NamingConventionMismatch => "NamingConventionMismatch",
            ErrorCode::AmbiguousInitializer => "AmbiguousInitializer",
            ErrorCode::UnsupportedRestParameter => "UnsupportedRestParameter",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TD{}", self.code())
    }
}

// =============================================================================
// Diagnostic
// =============================================================================

/// A diagnostic message with location, severity, and error code.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The file containing the diagnostic
    pub file_name: String,
    /// The source span (byte offsets)
    pub span: Span,
    /// The diagnostic message
    pub message: String,
    /// The severity level
    pub severity: Severity,
    /// The error kind
    pub code: ErrorCode,
}

impl Diagnostic {
    pub fn new(
        file_name: impl Into<String>,
        span: Span,
        code: ErrorCode,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Diagnostic {
            file_name: file_name.into(),
            span,
            message: message.into(),
            severity,
            code,
        }
    }

    /// Create an error diagnostic.
    pub fn error(
        file_name: impl Into<String>,
        span: Span,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self::new(file_name, span, code, message, Severity::Error)
    }

    /// Create a warning diagnostic.
    pub fn warning(
        file_name: impl Into<String>,
        span: Span,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self::new(file_name, span, code, message, Severity::Warning)
    }

    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }

    /// Format the diagnostic in a simple format.
    ///
    /// Returns a string like: `error[TD1001]: receiver has no type information`
    pub fn format_simple(&self) -> String {
        format!("{}[{}]: {}", self.severity, self.code, self.message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

// =============================================================================
// DiagnosticBag
// =============================================================================

/// A collection of diagnostics for one translation unit.
///
/// Tracks error counts and provides filtering; components append and keep
/// going rather than returning early.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
    /// The file name for diagnostics added without explicit file
    default_file: String,
    error_count: usize,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        DiagnosticBag::default()
    }

    /// Create a new diagnostic bag with a default file name.
    pub fn with_file(file_name: impl Into<String>) -> Self {
        DiagnosticBag {
            diagnostics: Vec::new(),
            default_file: file_name.into(),
            error_count: 0,
        }
    }

    pub fn default_file(&self) -> &str {
        &self.default_file
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity.is_error() {
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Add an error diagnostic at `span`.
    pub fn error(&mut self, span: Span, code: ErrorCode, message: impl Into<String>) {
        self.add(Diagnostic::error(&self.default_file, span, code, message));
    }

    /// Add a warning diagnostic at `span`.
    pub fn warning(&mut self, span: Span, code: ErrorCode, message: impl Into<String>) {
        self.add(Diagnostic::warning(&self.default_file, span, code, message));
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Get only errors.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Filter diagnostics by code.
    pub fn by_code(&self, code: ErrorCode) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }

    /// Sort diagnostics by file, then by position.
    pub fn sort(&mut self) {
        self.diagnostics
            .sort_by(|a, b| match a.file_name.cmp(&b.file_name) {
                std::cmp::Ordering::Equal => a.span.start.cmp(&b.span.start),
                other => other,
            });
    }

    /// Take all diagnostics, leaving the bag empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        self.error_count = 0;
        std::mem::take(&mut self.diagnostics)
    }

    /// Merge another DiagnosticBag into this one.
    pub fn merge(&mut self, other: DiagnosticBag) {
        for diag in other.diagnostics {
            self.add(diag);
        }
    }

    /// Get error codes as a vector (for testing).
    pub fn error_codes(&self) -> Vec<ErrorCode> {
        self.errors().map(|d| d.code).collect()
    }
}

impl IntoIterator for DiagnosticBag {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

impl<'a> IntoIterator for &'a DiagnosticBag {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}
